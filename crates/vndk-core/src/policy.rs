//! Tag policy: fixed library lists applied after the build-derived sets
//!
//! Rules are applied in order, so a later rule wins over an earlier one for
//! the same path, and every rule wins over the make-vars sets.

use crate::error::{Error, Result};
use crate::table::tags;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One policy entry: every library in `libs` gets `tag`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Tag to assign
    pub tag: String,
    /// Library module names
    pub libs: Vec<String>,
    /// Also tag the copy under `/system/${LIB}/<subdir>/`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdir: Option<String>,
}

impl PolicyRule {
    /// Create a new rule without a subdirectory copy
    pub fn new(tag: impl Into<String>, libs: &[&str]) -> Self {
        Self {
            tag: tag.into(),
            libs: libs.iter().map(|s| s.to_string()).collect(),
            subdir: None,
        }
    }

    /// Also apply the tag under `subdir`
    pub fn with_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.subdir = Some(subdir.into());
        self
    }
}

/// Ordered list of policy rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPolicy {
    pub rules: Vec<PolicyRule>,
}

impl Default for TagPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                PolicyRule::new(
                    tags::SP_NDK,
                    &[
                        "libEGL",
                        "libGLESv1_CM",
                        "libGLESv2",
                        "libGLESv3",
                        "libnativewindow",
                        "libsync",
                        "libvulkan",
                    ],
                ),
                PolicyRule::new(tags::FWK_ONLY_RS, &["libft2", "libmediandk"]),
                PolicyRule::new(
                    tags::VNDK_SP_INDIRECT,
                    &["libbacktrace", "liblzma", "libunwind", "libunwindstack"],
                )
                .with_subdir("vndk-sp"),
                PolicyRule::new(tags::VNDK_SP_INDIRECT_PRIVATE, &["libblas", "libcompiler_rt"])
                    .with_subdir("vndk-sp"),
                PolicyRule::new(
                    tags::LL_NDK_INDIRECT,
                    &["ld-android", "libc_malloc_debug", "libnetd_client"],
                ),
            ],
        }
    }
}

impl TagPolicy {
    /// Load a policy from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the policy to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_json()?;
        fs::write(path.as_ref(), content).map_err(|e| Error::FileWrite {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Pretty JSON form of the policy
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
