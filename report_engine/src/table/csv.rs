//! CSV acquisition shim
//!
//! Vendor matrix access is an external collaborator; the binary ingests the
//! project's CSV export layout instead. Every .csv file under the input
//! folder is one dataset, the dataset id is the file stem.

use super::cell::Cell;
use super::source::{MemoryDatasets, MemoryTable};
use std::fs;
use std::path::Path;

/// Tabular acquisition errors, all fatal
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Source table not found: {path}")]
    NotFound { path: String },

    #[error("Source table could not be read: {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("No source tables found under: {path}")]
    NoSources { path: String },
}

/// Parse one CSV export into a table of tagged cells
pub fn read_table(path: &Path) -> Result<MemoryTable, TableError> {
    if !path.exists() {
        return Err(TableError::NotFound {
            path: path.display().to_string(),
        });
    }
    let contents = fs::read_to_string(path).map_err(|e| TableError::Unreadable {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut table = MemoryTable::new();
    for line in contents.lines() {
        // ignore fully blank trailing lines
        if line.is_empty() {
            continue;
        }
        let row: Vec<Cell> = line
            .split(',')
            .map(|raw| Cell::from_raw(raw.trim()))
            .collect();
        table.push_row(row);
    }
    Ok(table)
}

/// Load every .csv file found in `paths` as one dataset each
pub fn read_datasets(paths: &[std::path::PathBuf]) -> Result<MemoryDatasets, TableError> {
    let mut datasets = MemoryDatasets::new();
    for path in paths {
        let id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let table = read_table(path)?;
        datasets.push(id, table);
    }
    if datasets.is_empty() {
        let shown = paths
            .first()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string());
        return Err(TableError::NoSources { path: shown });
    }
    Ok(datasets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::source::TabularSource;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_read_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "#FIELD,cond,out").unwrap();
        writeln!(file, "#name,VIO,current").unwrap();
        writeln!(file, ",3.3,12.5").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.rows(), 3);
        assert_eq!(table.cols(), 3);
        assert_matches!(table.cell(0, 0), Cell::Text(_));
        assert_matches!(table.cell(2, 0), Cell::Empty);
        assert_eq!(table.cell(2, 2).render(), "12.5");
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let result = read_table(Path::new("/nonexistent/data.csv"));
        assert_matches!(result, Err(TableError::NotFound { .. }));
    }

    #[test]
    fn test_read_datasets_uses_file_stem_as_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vbat_sweep.csv");
        fs::write(&path, "#FIELD,cond\n").unwrap();

        let datasets = read_datasets(&[path]).unwrap();
        assert_eq!(datasets.len(), 1);
        use crate::table::source::DatasetSource;
        assert_eq!(datasets.datasets()[0].0, "vbat_sweep");
    }

    #[test]
    fn test_no_sources() {
        let result = read_datasets(&[]);
        assert_matches!(result, Err(TableError::NoSources { .. }));
    }
}
