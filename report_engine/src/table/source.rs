//! Generic tabular source capability interface
//!
//! The engine never depends on a vendor storage format; classification and
//! assembly operate purely on these traits.

use super::cell::Cell;

/// Minimal capability interface over one table of cells
pub trait TabularSource {
    /// Number of rows, header rows included
    fn rows(&self) -> usize;

    /// Number of columns, fixed for all rows
    fn cols(&self) -> usize;

    /// Cell accessor; out-of-range access yields Empty
    fn cell(&self, row: usize, col: usize) -> Cell;
}

/// A source made of one or more datasets, yielded in stable order
pub trait DatasetSource {
    fn datasets(&self) -> Vec<(String, &dyn TabularSource)>;
}

/// Scalar metadata looked up outside the tabular body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMetadata {
    pub basic_type: String,
    pub product_sales_code: String,
    pub product_design_step: String,
    pub package: String,
    pub dut_id: String,
    pub username: String,
    pub email: String,
    pub api_id: String,
    pub global_id: String,
    pub test_program_name: String,
    pub testunit_version: String,
    /// Software component names in discovery order
    pub sw_names: Vec<String>,
}

/// In-memory table, the generic implementation used by tests and the CSV shim
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    cells: Vec<Vec<Cell>>,
    cols: usize,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rows of cells; column count is the widest row
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let cols = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        Self { cells: rows, cols }
    }

    /// Build from raw textual rows via Cell::from_raw
    pub fn from_raw_rows(rows: &[Vec<&str>]) -> Self {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|raw| Cell::from_raw(raw)).collect())
                .collect(),
        )
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.cols = self.cols.max(row.len());
        self.cells.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl TabularSource for MemoryTable {
    fn rows(&self) -> usize {
        self.cells.len()
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(col))
            .cloned()
            .unwrap_or(Cell::Empty)
    }
}

/// Named in-memory datasets in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryDatasets {
    datasets: Vec<(String, MemoryTable)>,
}

impl MemoryDatasets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: String, table: MemoryTable) {
        self.datasets.push((id, table));
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl DatasetSource for MemoryDatasets {
    fn datasets(&self) -> Vec<(String, &dyn TabularSource)> {
        self.datasets
            .iter()
            .map(|(id, table)| (id.clone(), table as &dyn TabularSource))
            .collect()
    }
}
