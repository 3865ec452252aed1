//! External limit table
//!
//! Optional per-project limit definitions keyed by parameter name. The
//! table is an external collaborator input; entries arrive already split
//! into named columns and are copied into limit records verbatim.

use std::collections::BTreeMap;
use std::path::Path;

/// One parameter's entry in the external limit table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitEntry {
    pub unit: String,
    pub lsl: String,
    pub usl: String,
    pub req_id: String,
    pub description: String,
    pub typical: String,
    pub test_nr: String,
}

/// Parameter name to limit entry lookup, empty when the project defines
/// no external limits
#[derive(Debug, Clone, Default)]
pub struct LimitTable {
    entries: BTreeMap<String, LimitEntry>,
}

impl LimitTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, parameter: &str, entry: LimitEntry) {
        self.entries.insert(parameter.to_string(), entry);
    }

    pub fn get(&self, parameter: &str) -> Option<&LimitEntry> {
        self.entries.get(parameter)
    }

    pub fn contains(&self, parameter: &str) -> bool {
        self.entries.contains_key(parameter)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a semicolon-separated limits file, one parameter per line:
    /// `name;Unit;LSL;USL;ReqID;Description;Typ;TestNr`. Lines starting
    /// with '#' and blank lines are skipped. A missing file yields an
    /// empty table; limits are optional.
    pub fn load(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Self::new();
        };
        let mut table = Self::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut cols = line.split(';').map(str::trim);
            let Some(name) = cols.next().filter(|n| !n.is_empty()) else {
                continue;
            };
            let mut next = || cols.next().unwrap_or("").to_string();
            let entry = LimitEntry {
                unit: next(),
                lsl: next(),
                usl: next(),
                req_id: next(),
                description: next(),
                typical: next(),
                test_nr: next(),
            };
            table.insert(name, entry);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut table = LimitTable::new();
        table.insert(
            "ibat_stb",
            LimitEntry {
                unit: "uA".to_string(),
                lsl: "1".to_string(),
                usl: "5".to_string(),
                test_nr: "12".to_string(),
                ..Default::default()
            },
        );
        assert!(table.contains("ibat_stb"));
        assert_eq!(table.get("ibat_stb").unwrap().test_nr, "12");
        assert!(table.get("other").is_none());
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testlimits.txt");
        std::fs::write(
            &path,
            "# project limits\nibat_stb;uA;1;5;REQ-9;standby current;3;12\n\n",
        )
        .unwrap();

        let table = LimitTable::load(&path);
        assert_eq!(table.len(), 1);
        let entry = table.get("ibat_stb").unwrap();
        assert_eq!(entry.unit, "uA");
        assert_eq!(entry.lsl, "1");
        assert_eq!(entry.usl, "5");
        assert_eq!(entry.req_id, "REQ-9");
        assert_eq!(entry.description, "standby current");
        assert_eq!(entry.typical, "3");
        assert_eq!(entry.test_nr, "12");
    }

    #[test]
    fn test_missing_file_is_empty_table() {
        let table = LimitTable::load(Path::new("/nonexistent/testlimits.txt"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_short_lines_pad_with_empty_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testlimits.txt");
        std::fs::write(&path, "iq;mA\n").unwrap();
        let table = LimitTable::load(&path);
        let entry = table.get("iq").unwrap();
        assert_eq!(entry.unit, "mA");
        assert_eq!(entry.test_nr, "");
    }
}
