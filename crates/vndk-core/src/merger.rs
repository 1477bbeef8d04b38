//! Merge engine that reclassifies the tag table from build outputs

use crate::install_paths::InstallPaths;
use crate::make_vars::MakeVars;
use crate::policy::TagPolicy;
use crate::table::{system_lib_path, tags, TagTable, SYSTEM_LIB_DIR};

/// Switches for a merge run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Drop rows whose path is not installed by the current build
    pub delete_removed_entries: bool,
}

/// Counts describing what a merge changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Rows dropped because they are no longer installed
    pub pruned: usize,
    /// Rows in the system library directory reset to `FWK-ONLY`
    pub reset: usize,
    /// Tag assignments that hit an existing row
    pub updated: usize,
    /// Rows created by a tag assignment
    pub inserted: usize,
    /// Concrete rows after the merge
    pub total_rows: usize,
    /// Passthrough rows carried through unchanged
    pub regex_rows: usize,
}

/// Applies tag assignments to a table while counting them
struct Tagger<'a> {
    table: &'a mut TagTable,
    report: &'a mut MergeReport,
}

impl Tagger<'_> {
    fn set(&mut self, subdir: Option<&str>, name: &str, tag: &str) {
        if self.table.upsert_tag(&system_lib_path(subdir, name), tag) {
            self.report.inserted += 1;
        } else {
            self.report.updated += 1;
        }
    }

    fn set_all<'n>(
        &mut self,
        names: impl IntoIterator<Item = &'n String>,
        subdir: Option<&str>,
        tag: &str,
    ) {
        for name in names {
            self.set(None, name, tag);
            if subdir.is_some() {
                self.set(subdir, name, tag);
            }
        }
    }
}

/// Reclassify `table` in place.
///
/// Order of application, each step overriding the previous ones:
/// pruning, reset of `/system/${LIB}` rows to `FWK-ONLY`, LL-NDK, VNDK-SP
/// (also under `vndk-sp/`), VNDK (also under `vndk/`), then the policy rules
/// in order. Regex rows are left alone.
pub fn merge(
    table: &mut TagTable,
    vars: &MakeVars,
    installed: &InstallPaths,
    policy: &TagPolicy,
    options: MergeOptions,
) -> MergeReport {
    let mut report = MergeReport::default();

    if options.delete_removed_entries {
        let before = table.rows.len();
        table.rows.retain(|path, _| installed.contains(path));
        report.pruned = before - table.rows.len();
    }

    for row in table.rows.values_mut() {
        if row.dir() == SYSTEM_LIB_DIR {
            row.tag = tags::FWK_ONLY.to_string();
            report.reset += 1;
        }
    }

    let mut tagger = Tagger {
        table: &mut *table,
        report: &mut report,
    };

    tagger.set_all(&vars.llndk, None, tags::LL_NDK);
    tagger.set_all(&vars.vndk_sp, Some("vndk-sp"), tags::VNDK_SP);
    tagger.set_all(&vars.vndk_core, Some("vndk"), tags::VNDK);

    for rule in &policy.rules {
        tagger.set_all(&rule.libs, rule.subdir.as_deref(), &rule.tag);
    }

    report.total_rows = table.rows.len();
    report.regex_rows = table.regex_rows.len();

    tracing::debug!(?report, "merged tag table");
    report
}
