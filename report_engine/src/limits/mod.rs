//! Limit resolution
//!
//! Resolves `{scale, unit, bounds, metadata, test number}` for each output
//! parameter from three sources in priority order: limit rows embedded in
//! the table, the external limit table, and an empty fallback. A record is
//! materialized once per unique parameter name per dataset and reused for
//! every later occurrence.

pub mod registry;
pub mod table;
pub mod unit;

pub use registry::TestNumberRegistry;
pub use table::{LimitEntry, LimitTable};
pub use unit::{get_unit_scale, scale_value, trim_number, UnitError};

use crate::classify::HeaderVectors;
use crate::log_warning;
use crate::logging::codes;
use std::collections::BTreeMap;

// ============================================================================
// LIMIT RECORD
// ============================================================================

/// Resolved limit data for one output parameter. `scale` is the
/// intermediate normalization exponent; bounds are already scaled by it and
/// the emitted limit payload always carries scale 0 since the consuming
/// tool rescales on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitRecord {
    pub scale: i32,
    pub unit: String,
    pub lower_limit: String,
    pub upper_limit: String,
    pub req_id: String,
    pub description: String,
    pub typical: String,
    pub test_number: String,
}

/// Which of the three sources produced a record, kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitSource {
    RowEmbedded,
    ExternalTable,
    Fallback,
}

/// Outcome of one resolution call
#[derive(Debug, Clone)]
pub struct Resolution {
    pub record: LimitRecord,
    pub source: LimitSource,
    /// True the first time this parameter name is seen in the dataset; the
    /// caller pushes a limit object exactly once, on first sight
    pub first_seen: bool,
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Per-dataset limit resolver. Owns the test number registry and the
/// record cache; reset along with them at each dataset boundary.
pub struct LimitResolver<'a> {
    dataset_id: String,
    limit_table: &'a LimitTable,
    registry: TestNumberRegistry,
    cache: BTreeMap<String, (LimitRecord, LimitSource)>,
    no_limit_match: Vec<String>,
}

impl<'a> LimitResolver<'a> {
    pub fn new(dataset_id: &str, limit_table: &'a LimitTable) -> Self {
        Self {
            dataset_id: dataset_id.to_string(),
            limit_table,
            registry: TestNumberRegistry::new(),
            cache: BTreeMap::new(),
            no_limit_match: Vec::new(),
        }
    }

    /// Resolve the limit record for a validated parameter name found at
    /// `col`. Later occurrences of the same name return the cached record.
    pub fn resolve(
        &mut self,
        parameter: &str,
        col: usize,
        headers: &HeaderVectors,
    ) -> Result<Resolution, UnitError> {
        if let Some((record, source)) = self.cache.get(parameter) {
            return Ok(Resolution {
                record: record.clone(),
                source: *source,
                first_seen: false,
            });
        }

        let (record, source) = if self.has_row_limits(col, headers) {
            (self.from_row(parameter, col, headers)?, LimitSource::RowEmbedded)
        } else if let Some(entry) = self.limit_table.get(parameter) {
            let entry = entry.clone();
            (self.from_table(parameter, &entry)?, LimitSource::ExternalTable)
        } else {
            (self.fallback(parameter, col, headers)?, LimitSource::Fallback)
        };

        self.cache
            .insert(parameter.to_string(), (record.clone(), source));
        Ok(Resolution {
            record,
            source,
            first_seen: true,
        })
    }

    /// Cached record for a parameter already resolved in this dataset
    pub fn resolved(&self, parameter: &str) -> Option<&LimitRecord> {
        self.cache.get(parameter).map(|(record, _)| record)
    }

    /// Parameter names that fell through to the empty fallback
    pub fn no_limit_parameters(&self) -> &[String] {
        &self.no_limit_match
    }

    fn has_row_limits(&self, col: usize, headers: &HeaderVectors) -> bool {
        if !headers.has_limit_rows() {
            return false;
        }
        let lsl = headers.lsl_at(col);
        let usl = headers.usl_at(col);
        !lsl.is_empty() && !usl.is_empty() && !lsl.starts_with("NaN") && !usl.starts_with("NaN")
    }

    fn from_row(
        &mut self,
        parameter: &str,
        col: usize,
        headers: &HeaderVectors,
    ) -> Result<LimitRecord, UnitError> {
        let (scale, unit) = get_unit_scale(headers.unit_at(col))?;
        Ok(LimitRecord {
            scale,
            unit,
            lower_limit: scale_value(scale, headers.lsl_at(col)),
            upper_limit: scale_value(scale, headers.usl_at(col)),
            req_id: String::new(),
            description: String::new(),
            typical: String::new(),
            test_number: self.registry.assign(parameter).to_string(),
        })
    }

    fn from_table(
        &mut self,
        parameter: &str,
        entry: &LimitEntry,
    ) -> Result<LimitRecord, UnitError> {
        let (scale, unit) = get_unit_scale(&entry.unit)?;
        // seed the registry so auto-allocation never collides with a
        // table-sourced number
        let test_number = match entry.test_nr.parse::<u32>() {
            Ok(number) => {
                self.registry.seed(parameter, number);
                entry.test_nr.clone()
            }
            Err(_) => self.registry.assign(parameter).to_string(),
        };
        Ok(LimitRecord {
            scale,
            unit,
            lower_limit: scale_value(scale, &entry.lsl),
            upper_limit: scale_value(scale, &entry.usl),
            req_id: entry.req_id.clone(),
            description: entry.description.clone(),
            typical: entry.typical.clone(),
            test_number,
        })
    }

    fn fallback(
        &mut self,
        parameter: &str,
        col: usize,
        headers: &HeaderVectors,
    ) -> Result<LimitRecord, UnitError> {
        let (_, unit) = get_unit_scale(headers.unit_at(col))?;
        self.no_limit_match.push(parameter.to_string());
        log_warning!(codes::limits::NO_LIMIT_MATCH, "No limit source for parameter",
            "dataset" => self.dataset_id,
            "parameter" => parameter
        );
        Ok(LimitRecord {
            scale: 0,
            unit,
            lower_limit: String::new(),
            upper_limit: String::new(),
            req_id: String::new(),
            description: String::new(),
            typical: String::new(),
            test_number: self.registry.assign(parameter).to_string(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
