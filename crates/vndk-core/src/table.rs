//! Core table types for representing the tag dataset

use std::collections::BTreeMap;

/// Path prefix marking a passthrough row
pub const REGEX_PREFIX: &str = "[regex]";

/// Directory holding the platform libraries, with the lib/lib64 placeholder
pub const SYSTEM_LIB_DIR: &str = "/system/${LIB}";

/// Tag labels written by the updater
pub mod tags {
    pub const FWK_ONLY: &str = "FWK-ONLY";
    pub const FWK_ONLY_RS: &str = "FWK-ONLY-RS";
    pub const LL_NDK: &str = "LL-NDK";
    pub const LL_NDK_INDIRECT: &str = "LL-NDK-Indirect";
    pub const SP_NDK: &str = "SP-NDK";
    pub const VNDK: &str = "VNDK";
    pub const VNDK_SP: &str = "VNDK-SP";
    pub const VNDK_SP_INDIRECT: &str = "VNDK-SP-Indirect";
    pub const VNDK_SP_INDIRECT_PRIVATE: &str = "VNDK-SP-Indirect-Private";
}

/// A single `(path, tag, comment)` row.
///
/// Field order matters: the derived `Ord` is the output sort order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagRow {
    /// Library path, e.g. `/system/${LIB}/libc.so`
    pub path: String,
    /// Tag label
    pub tag: String,
    /// Free-form comment
    pub comment: String,
}

impl TagRow {
    /// Create a new row
    pub fn new(path: impl Into<String>, tag: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tag: tag.into(),
            comment: comment.into(),
        }
    }

    /// Check if this row is a `[regex]` passthrough entry
    pub fn is_regex(&self) -> bool {
        self.path.starts_with(REGEX_PREFIX)
    }

    /// Parent directory of the path, `posixpath.dirname` style.
    ///
    /// Trailing slashes are dropped unless the directory is only slashes.
    pub fn dir(&self) -> &str {
        let Some(idx) = self.path.rfind('/') else {
            return "";
        };
        let head = &self.path[..=idx];
        match head.trim_end_matches('/') {
            "" => head,
            trimmed => trimmed,
        }
    }
}

/// The working tag table: header, concrete rows keyed by path, and
/// passthrough rows kept apart from all merge logic.
#[derive(Debug, Clone, Default)]
pub struct TagTable {
    /// Header record, written back unchanged
    pub header: Vec<String>,
    /// Concrete rows keyed by path
    pub rows: BTreeMap<String, TagRow>,
    /// `[regex]` rows in file order
    pub regex_rows: Vec<TagRow>,
}

impl TagTable {
    /// Create an empty table with the given header
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: BTreeMap::new(),
            regex_rows: Vec::new(),
        }
    }

    /// Add a row read from a file, routing regex rows aside.
    ///
    /// A repeated concrete path replaces the earlier row.
    pub fn insert(&mut self, row: TagRow) {
        if row.is_regex() {
            self.regex_rows.push(row);
        } else {
            self.rows.insert(row.path.clone(), row);
        }
    }

    /// Look up a concrete row by path
    pub fn get(&self, path: &str) -> Option<&TagRow> {
        self.rows.get(path)
    }

    /// Number of concrete rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Set the tag of `path`, inserting a row with an empty comment if absent.
    ///
    /// Returns `true` when a new row was inserted.
    pub fn upsert_tag(&mut self, path: &str, tag: &str) -> bool {
        match self.rows.get_mut(path) {
            Some(row) => {
                row.tag = tag.to_string();
                false
            }
            None => {
                self.rows
                    .insert(path.to_string(), TagRow::new(path, tag, ""));
                true
            }
        }
    }

    /// All rows (regex rows reattached by literal path) in tuple order
    pub fn sorted_rows(&self) -> Vec<TagRow> {
        let mut merged: BTreeMap<&str, &TagRow> =
            self.rows.iter().map(|(k, v)| (k.as_str(), v)).collect();
        for row in &self.regex_rows {
            merged.insert(row.path.as_str(), row);
        }

        let mut rows: Vec<TagRow> = merged.into_values().cloned().collect();
        rows.sort();
        rows
    }
}

/// Build the path of a library placed directly in, or under `subdir` of,
/// the system library directory.
pub fn system_lib_path(subdir: Option<&str>, name: &str) -> String {
    match subdir {
        Some(dir) => format!("{}/{}/{}.so", SYSTEM_LIB_DIR, dir, name),
        None => format!("{}/{}.so", SYSTEM_LIB_DIR, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_is_regex() {
        assert!(TagRow::new("[regex].*\\.so", "FWK-ONLY", "").is_regex());
        assert!(!TagRow::new("/system/${LIB}/libc.so", "LL-NDK", "").is_regex());
    }

    #[test]
    fn test_row_dir() {
        assert_eq!(TagRow::new("/system/${LIB}/libc.so", "", "").dir(), "/system/${LIB}");
        assert_eq!(
            TagRow::new("/system/${LIB}/vndk/libc.so", "", "").dir(),
            "/system/${LIB}/vndk"
        );
        assert_eq!(TagRow::new("/libc.so", "", "").dir(), "/");
        assert_eq!(TagRow::new("libc.so", "", "").dir(), "");
    }

    #[test]
    fn test_row_dir_repeated_slashes() {
        assert_eq!(TagRow::new("/system/${LIB}//libc.so", "", "").dir(), "/system/${LIB}");
        assert_eq!(TagRow::new("//libc.so", "", "").dir(), "//");
    }

    #[test]
    fn test_row_ordering_is_tuple_order() {
        let a = TagRow::new("/a", "Z", "");
        let b = TagRow::new("/b", "A", "");
        let c = TagRow::new("/b", "A", "x");
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_upsert_keeps_comment() {
        let mut table = TagTable::new(vec![]);
        table.insert(TagRow::new("/system/${LIB}/libz.so", "FWK-ONLY", "zlib"));

        assert!(!table.upsert_tag("/system/${LIB}/libz.so", "VNDK"));
        assert!(table.upsert_tag("/system/${LIB}/libm.so", "LL-NDK"));

        assert_eq!(
            table.get("/system/${LIB}/libz.so"),
            Some(&TagRow::new("/system/${LIB}/libz.so", "VNDK", "zlib"))
        );
        assert_eq!(table.get("/system/${LIB}/libm.so").unwrap().comment, "");
    }

    #[test]
    fn test_insert_routes_regex_rows() {
        let mut table = TagTable::new(vec![]);
        table.insert(TagRow::new("[regex].*\\.so", "FWK-ONLY", ""));
        table.insert(TagRow::new("/system/${LIB}/libc.so", "LL-NDK", ""));

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.regex_rows.len(), 1);
    }

    #[test]
    fn test_sorted_rows_includes_regex() {
        let mut table = TagTable::new(vec![]);
        table.insert(TagRow::new("/system/${LIB}/libc.so", "LL-NDK", ""));
        table.insert(TagRow::new("[regex].*\\.so", "FWK-ONLY", ""));
        table.insert(TagRow::new("/system/${LIB}/libb.so", "VNDK", ""));

        let paths: Vec<String> = table.sorted_rows().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec!["/system/${LIB}/libb.so", "/system/${LIB}/libc.so", "[regex].*\\.so"]
        );
    }

    #[test]
    fn test_system_lib_path() {
        assert_eq!(system_lib_path(None, "libc"), "/system/${LIB}/libc.so");
        assert_eq!(
            system_lib_path(Some("vndk-sp"), "libc"),
            "/system/${LIB}/vndk-sp/libc.so"
        );
    }
}
