//! VNDK dataset updater CLI
//!
//! Updates the eligible-library tag file from the outputs of a build.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vndk_core::{update_dataset, MergeOptions, TagPolicy, UpdateRequest};

#[derive(Parser)]
#[command(name = "vndk-update-dataset")]
#[command(about = "Update the VNDK eligible library tag file", long_about = None)]
#[command(version)]
struct Cli {
    /// Existing tag CSV file
    #[arg(required_unless_present = "dump_policy")]
    tag_file: Option<PathBuf>,

    /// Output CSV file
    #[arg(short, long, required_unless_present = "dump_policy")]
    output: Option<PathBuf>,

    /// out/soong/make_vars-$(TARGET).mk
    #[arg(long, required_unless_present = "dump_policy")]
    make_vars: Option<PathBuf>,

    /// out/target/product/$(TARGET)/module-info.json
    #[arg(long, required_unless_present = "dump_policy")]
    module_info: Option<PathBuf>,

    /// Delete removed shared libs
    #[arg(long)]
    delete_removed_entries: bool,

    /// Tag policy file (JSON); the built-in policy is used if omitted
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Print the effective tag policy as JSON and exit
    #[arg(long)]
    dump_policy: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> vndk_core::Result<()> {
    if cli.dump_policy {
        return cmd_dump_policy(cli.policy, &mut io::stdout().lock());
    }

    let (Some(tag_file), Some(output), Some(make_vars), Some(module_info)) =
        (cli.tag_file, cli.output, cli.make_vars, cli.module_info)
    else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "tag_file, --output, --make-vars and --module-info are required",
            )
            .exit();
    };

    let request = UpdateRequest {
        tag_file,
        output,
        make_vars,
        module_info,
        policy: cli.policy,
        options: MergeOptions {
            delete_removed_entries: cli.delete_removed_entries,
        },
    };

    let report = update_dataset(&request)?;

    info!(
        output = %request.output.display(),
        pruned = report.pruned,
        reset = report.reset,
        updated = report.updated,
        inserted = report.inserted,
        rows = report.total_rows + report.regex_rows,
        "updated tag file"
    );

    Ok(())
}

fn cmd_dump_policy<W: Write>(path: Option<PathBuf>, out: &mut W) -> vndk_core::Result<()> {
    let policy = match path {
        Some(path) => TagPolicy::load(path)?,
        None => TagPolicy::default(),
    };

    writeln!(out, "{}", policy.to_json()?)?;
    Ok(())
}
