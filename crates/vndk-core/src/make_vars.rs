//! Loader for Soong `make_vars-<TARGET>.mk` variable dumps

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const LLNDK_KEY: &str = "SOONG_LLNDK_LIBRARIES";
pub const VNDK_SP_KEY: &str = "SOONG_VNDK_SAMEPROCESS_LIBRARIES";
pub const VNDK_CORE_KEY: &str = "SOONG_VNDK_CORE_LIBRARIES";

const ASSIGN: &str = " := ";

/// Library module names (no path, no extension) declared by the build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MakeVars {
    /// `SOONG_LLNDK_LIBRARIES`
    pub llndk: BTreeSet<String>,
    /// `SOONG_VNDK_SAMEPROCESS_LIBRARIES`
    pub vndk_sp: BTreeSet<String>,
    /// `SOONG_VNDK_CORE_LIBRARIES`
    pub vndk_core: BTreeSet<String>,
}

impl MakeVars {
    fn set_for_key(&mut self, key: &str) -> Option<&mut BTreeSet<String>> {
        match key {
            LLNDK_KEY => Some(&mut self.llndk),
            VNDK_SP_KEY => Some(&mut self.vndk_sp),
            VNDK_CORE_KEY => Some(&mut self.vndk_core),
            _ => None,
        }
    }
}

/// Load the three library sets from a make-vars file
pub fn load_make_vars<P: AsRef<Path>>(path: P) -> Result<MakeVars> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let vars = parse_make_vars(&content);
    tracing::debug!(
        path = %path.display(),
        llndk = vars.llndk.len(),
        vndk_sp = vars.vndk_sp.len(),
        vndk_core = vars.vndk_core.len(),
        "loaded make vars"
    );
    Ok(vars)
}

/// Parse make-vars content.
///
/// Every `KEY := a b c` line for a recognized key adds its values to that
/// key's set; repeated assignments accumulate. Other lines are ignored.
pub fn parse_make_vars(content: &str) -> MakeVars {
    let mut vars = MakeVars::default();

    for line in content.lines() {
        for key in [LLNDK_KEY, VNDK_SP_KEY, VNDK_CORE_KEY] {
            let Some(value) = line
                .strip_prefix(key)
                .and_then(|rest| rest.strip_prefix(ASSIGN))
            else {
                continue;
            };

            if let Some(set) = vars.set_for_key(key) {
                set.extend(value.trim().split(' ').map(str::to_string));
            }
        }
    }

    vars
}
