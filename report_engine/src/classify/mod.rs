//! Row classification
//!
//! Tags each row of the table as a header row or a data row and fills the
//! header vectors as header rows are encountered. Row roles are a closed
//! set of variants rather than ad hoc string checks in the assembly loop.

use crate::config::constants::markers;
use crate::table::{Cell, TabularSource};

/// Role of one table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    FieldHeader,
    NameHeader,
    UnitHeader,
    UpperLimitHeader,
    LowerLimitHeader,
    /// Anything whose first cell is not a recognized header marker. A
    /// malformed header row also lands here; that ambiguity is inherited
    /// from the source format and deliberately preserved.
    Data,
}

/// Five parallel per-column header sequences, populated incrementally
#[derive(Debug, Clone, Default)]
pub struct HeaderVectors {
    pub field: Vec<String>,
    pub name: Vec<String>,
    pub unit: Vec<String>,
    pub usl: Vec<String>,
    pub lsl: Vec<String>,
}

impl HeaderVectors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field and name rows are the minimum needed to assemble a data row
    pub fn is_ready(&self) -> bool {
        !self.field.is_empty() && !self.name.is_empty()
    }

    /// Both limit vectors present, required for row-embedded limits
    pub fn has_limit_rows(&self) -> bool {
        !self.usl.is_empty() && !self.lsl.is_empty()
    }

    pub fn field_at(&self, col: usize) -> &str {
        self.field.get(col).map(String::as_str).unwrap_or("")
    }

    pub fn name_at(&self, col: usize) -> &str {
        self.name.get(col).map(String::as_str).unwrap_or("")
    }

    pub fn unit_at(&self, col: usize) -> &str {
        self.unit.get(col).map(String::as_str).unwrap_or("")
    }

    pub fn usl_at(&self, col: usize) -> &str {
        self.usl.get(col).map(String::as_str).unwrap_or("")
    }

    pub fn lsl_at(&self, col: usize) -> &str {
        self.lsl.get(col).map(String::as_str).unwrap_or("")
    }
}

/// Classify one row by its first cell. Header markers are matched as
/// case-sensitive substrings, mirroring the source format.
pub fn classify_row(table: &dyn TabularSource, row: usize) -> RowKind {
    let first = table.cell(row, 0);
    let Cell::Text(text) = first else {
        return RowKind::Data;
    };
    if text.contains(markers::FIELD) {
        RowKind::FieldHeader
    } else if text.contains(markers::UPPER_LIMIT) {
        RowKind::UpperLimitHeader
    } else if text.contains(markers::LOWER_LIMIT) {
        RowKind::LowerLimitHeader
    } else if text.contains(markers::UNIT) {
        RowKind::UnitHeader
    } else if text.contains(markers::NAME) {
        RowKind::NameHeader
    } else {
        RowKind::Data
    }
}

/// Read a whole row into rendered strings, one entry per column
pub fn read_row(table: &dyn TabularSource, row: usize) -> Vec<String> {
    (0..table.cols())
        .map(|col| table.cell(row, col).render())
        .collect()
}

/// Classify a row and, for header rows, fill the matching header vector.
/// Returns the classification so the caller can route data rows.
pub fn classify_and_fill(
    table: &dyn TabularSource,
    row: usize,
    headers: &mut HeaderVectors,
) -> RowKind {
    let kind = classify_row(table, row);
    match kind {
        RowKind::FieldHeader => headers.field = read_row(table, row),
        RowKind::NameHeader => headers.name = read_row(table, row),
        RowKind::UnitHeader => headers.unit = read_row(table, row),
        RowKind::UpperLimitHeader => headers.usl = read_row(table, row),
        RowKind::LowerLimitHeader => headers.lsl = read_row(table, row),
        RowKind::Data => {}
    }
    kind
}
