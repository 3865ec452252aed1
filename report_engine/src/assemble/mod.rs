//! Record assembly
//!
//! Drives one dataset through classification, condition key construction,
//! limit resolution and artifact matching, and accumulates the resulting
//! data objects. Limit objects are pushed eagerly, once per unique
//! parameter; value objects are buffered in a working set keyed by the
//! parameter+condition composite and flushed in insertion order when the
//! dataset finishes.

pub mod metadata;

use crate::artifact::ArtifactMatcher;
use crate::classify::{classify_and_fill, read_row, HeaderVectors, RowKind};
use crate::condition::ConditionKeyBuilder;
use crate::config::constants::{fields, reserved};
use crate::limits::{LimitResolver, LimitTable, UnitError};
use crate::log_warning;
use crate::logging::codes;
use crate::table::{SourceMetadata, TabularSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// DATA OBJECT
// ============================================================================

/// One reportable record: descriptive tags plus the measured value and its
/// linked artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataObject {
    #[serde(rename = "metaData")]
    pub meta_data: BTreeMap<String, String>,
    pub payload: BTreeMap<String, String>,
}

/// Replace characters the downstream tool cannot digest in field names
/// with underscores; a single leading underscore is stripped
pub fn validate_parameter_name(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| match c {
            '-' | '(' | ')' | '!' | '#' | ',' | '.' => '_',
            other => other,
        })
        .collect();
    match replaced.strip_prefix('_') {
        Some(stripped) => stripped.to_string(),
        None => replaced,
    }
}

// ============================================================================
// DATASET ASSEMBLER
// ============================================================================

/// Everything produced from one dataset
#[derive(Debug, Default)]
pub struct AssembledDataset {
    /// Limit objects first, then value objects in working-set insertion order
    pub objects: Vec<DataObject>,
    pub value_count: usize,
    pub limit_count: usize,
    pub repeated_keys: Vec<String>,
    pub no_limit_parameters: Vec<String>,
}

/// Sequential assembler for one dataset. All per-dataset state lives here;
/// nothing leaks across datasets.
pub struct DatasetAssembler<'a> {
    dataset_id: String,
    source_meta: &'a SourceMetadata,
    common: &'a BTreeMap<String, String>,
    builder: ConditionKeyBuilder,
    resolver: LimitResolver<'a>,
    matcher: &'a ArtifactMatcher,
    /// First artifact-match token, the raw data folder as spelled on disk
    parent_folder: String,
    /// file:/// link to the raw data folder, forward slashes
    folder_link: String,
    headers: HeaderVectors,
    limit_objects: Vec<DataObject>,
    working: Vec<(String, DataObject)>,
    repeated_keys: Vec<String>,
}

impl<'a> DatasetAssembler<'a> {
    pub fn new(
        dataset_id: &str,
        source_meta: &'a SourceMetadata,
        common: &'a BTreeMap<String, String>,
        limit_table: &'a LimitTable,
        matcher: &'a ArtifactMatcher,
        parent_folder: &str,
    ) -> Self {
        let folder_link = format!(
            "file:///{}",
            parent_folder
                .trim_end_matches(['/', '\\'])
                .replace('\\', "/")
        );
        Self {
            dataset_id: dataset_id.to_string(),
            source_meta,
            common,
            builder: ConditionKeyBuilder::new(dataset_id, source_meta),
            resolver: LimitResolver::new(dataset_id, limit_table),
            matcher,
            parent_folder: parent_folder.to_string(),
            folder_link,
            headers: HeaderVectors::new(),
            limit_objects: Vec::new(),
            working: Vec::new(),
            repeated_keys: Vec::new(),
        }
    }

    /// Classify one row, filling header vectors or assembling data objects
    pub fn process_row(&mut self, table: &dyn TabularSource, row: usize) -> Result<(), UnitError> {
        let kind = classify_and_fill(table, row, &mut self.headers);
        if kind != RowKind::Data {
            return Ok(());
        }
        // data before the field and name headers cannot be attributed to
        // a column role and is dropped
        if !self.headers.is_ready() {
            return Ok(());
        }

        let values = read_row(table, row);
        let conditions = self.builder.build(row, &values, &self.headers);

        let mut base_meta: BTreeMap<String, String> =
            conditions.condition_meta.iter().cloned().collect();
        base_meta.insert("cond_link_screenshots".to_string(), self.folder_link.clone());
        base_meta.insert("cond_link_raw_data".to_string(), self.folder_link.clone());
        base_meta.insert("subset_id".to_string(), self.dataset_id.clone());
        for (col, value) in values.iter().enumerate() {
            if self.headers.field_at(col) == fields::AUXILIARY
                && self.headers.name_at(col) == reserved::INDEX
            {
                base_meta.insert("idx".to_string(), value.clone());
            }
        }

        let mut tokens = Vec::with_capacity(conditions.match_tokens.len() + 1);
        tokens.push(self.parent_folder.clone());
        tokens.extend(conditions.match_tokens.iter().cloned());

        for (col, value) in values.iter().enumerate() {
            let name = self.headers.name_at(col);
            if name.is_empty() {
                continue;
            }
            let field = self.headers.field_at(col);
            if field != fields::OUTPUT && field != fields::AUXILIARY {
                continue;
            }
            if name == reserved::INDEX || value.is_empty() {
                continue;
            }

            let parameter = validate_parameter_name(name);
            let composite = format!("{}{}", parameter, conditions.condition_string);

            let mut payload = BTreeMap::new();
            payload.insert(parameter.clone(), value.clone());
            for (i, file) in self.matcher.matching_pictures(&tokens).iter().enumerate() {
                payload.insert(format!("png_filename___{i}"), file.replace('\\', "/"));
            }
            for (i, file) in self.matcher.matching_waveforms(&tokens).iter().enumerate() {
                payload.insert(format!("mat_filename___{i}"), file.replace('\\', "/"));
            }
            for (i, comment) in conditions.comments.iter().enumerate() {
                payload.insert(format!("comment___{i}"), comment.clone());
            }

            let resolution = self.resolver.resolve(&parameter, col, &self.headers)?;

            let mut meta = base_meta.clone();
            meta.insert("test_name".to_string(), parameter.clone());
            meta.insert("data_object_type".to_string(), "value".to_string());
            meta.insert("dut_id".to_string(), self.source_meta.dut_id.clone());
            meta.insert("package".to_string(), self.source_meta.package.clone());
            meta.insert("user_name".to_string(), self.source_meta.username.clone());
            meta.insert(
                "test_program_name".to_string(),
                self.source_meta.test_program_name.clone(),
            );
            meta.insert(
                "test_program_revision".to_string(),
                self.source_meta.testunit_version.clone(),
            );
            meta.insert(
                "rddf_tc_id".to_string(),
                format!("{}:{}", self.source_meta.api_id, self.source_meta.global_id),
            );
            meta.insert(
                "test_number".to_string(),
                resolution.record.test_number.clone(),
            );

            if resolution.first_seen {
                let record = &resolution.record;
                let mut limit_payload = BTreeMap::new();
                limit_payload.insert("scale".to_string(), "0".to_string());
                limit_payload.insert("unit".to_string(), record.unit.clone());
                limit_payload.insert("lower_limit".to_string(), record.lower_limit.clone());
                limit_payload.insert("upper_limit".to_string(), record.upper_limit.clone());
                self.limit_objects.push(DataObject {
                    meta_data: metadata::limit_meta_data(self.common, record, &parameter),
                    payload: limit_payload,
                });
            }

            let key = self.disambiguated_key(composite, row);
            self.working.push((
                key,
                DataObject {
                    meta_data: meta,
                    payload,
                },
            ));
        }
        Ok(())
    }

    /// Append a `_repN` suffix when the composite key was already stored,
    /// so physically distinct measurements never overwrite each other
    fn disambiguated_key(&mut self, composite: String, row: usize) -> String {
        let already_stored = self.working.iter().any(|(key, _)| *key == composite);
        if !already_stored {
            return composite;
        }
        let rep_times = self
            .working
            .iter()
            .filter(|(key, _)| key.contains(&composite))
            .count();
        let key = format!("{}_rep{}", composite, rep_times);
        log_warning!(codes::assembly::CONDITION_REPEATED, "Condition key repeated",
            "dataset" => self.dataset_id,
            "key" => composite,
            "row" => row
        );
        self.repeated_keys.push(key.clone());
        key
    }

    /// Flush the working set and hand back all objects for this dataset
    pub fn finish(self) -> AssembledDataset {
        let limit_count = self.limit_objects.len();
        let value_count = self.working.len();
        let mut objects = self.limit_objects;
        objects.extend(self.working.into_iter().map(|(_, object)| object));
        AssembledDataset {
            objects,
            value_count,
            limit_count,
            repeated_keys: self.repeated_keys,
            no_limit_parameters: self.resolver.no_limit_parameters().to_vec(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
