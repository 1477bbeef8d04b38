//! vndk-core: Core library for updating VNDK library tag datasets
//!
//! This library provides functionality to:
//! - Load library sets from Soong `make_vars-<TARGET>.mk` dumps
//! - Load normalized installation paths from `module-info.json`
//! - Parse the tag CSV, keeping `[regex]` rows as passthrough entries
//! - Reclassify rows from the build outputs and a tag policy
//! - Write the table back out sorted

pub mod error;
pub mod install_paths;
pub mod make_vars;
pub mod merger;
pub mod parser;
pub mod policy;
pub mod table;
pub mod writer;

pub use error::{Error, Result};
pub use install_paths::{load_install_paths, normalize_install_path, InstallPaths};
pub use make_vars::{load_make_vars, MakeVars};
pub use merger::{merge, MergeOptions, MergeReport};
pub use parser::parse_tag_file;
pub use policy::{PolicyRule, TagPolicy};
pub use table::{tags, TagRow, TagTable};
pub use writer::write_tag_file;

use std::path::PathBuf;

/// Inputs and output of one dataset update
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// Existing tag CSV
    pub tag_file: PathBuf,
    /// Destination CSV
    pub output: PathBuf,
    /// `out/soong/make_vars-<TARGET>.mk`
    pub make_vars: PathBuf,
    /// `out/target/product/<TARGET>/module-info.json`
    pub module_info: PathBuf,
    /// Optional JSON policy; the built-in policy is used when absent
    pub policy: Option<PathBuf>,
    pub options: MergeOptions,
}

/// Load every input, merge, and write the output file
pub fn update_dataset(request: &UpdateRequest) -> Result<MergeReport> {
    let vars = load_make_vars(&request.make_vars)?;
    let mut table = parse_tag_file(&request.tag_file)?;
    let installed = load_install_paths(&request.module_info)?;

    let policy = match &request.policy {
        Some(path) => TagPolicy::load(path)?,
        None => TagPolicy::default(),
    };

    let report = merge(&mut table, &vars, &installed, &policy, request.options);
    write_tag_file(&table, &request.output)?;

    Ok(report)
}
