//! Condition key construction
//!
//! Walks one data row in column order and produces the condition string,
//! the per-column condition metadata entries, the artifact-match tokens,
//! and the free-text comments. Key construction order follows column
//! order, never column name, so repeated runs produce identical keys.

use crate::classify::HeaderVectors;
use crate::config::constants::{fields, reserved};
use crate::log_warning;
use crate::logging::codes;
use crate::table::SourceMetadata;

/// Everything condition-related extracted from one data row
#[derive(Debug, Clone, Default)]
pub struct RowConditions {
    /// Concatenation of all condition values plus the per-table suffix,
    /// appended once per condition column
    pub condition_string: String,
    /// `cond_<Name>` metadata entries in column order
    pub condition_meta: Vec<(String, String)>,
    /// `name=value[` tokens for artifact file matching
    pub match_tokens: Vec<String>,
    pub comments: Vec<String>,
}

/// Builds condition keys for every row of one dataset. The identity
/// suffix is constant for the whole table and makes keys unique across
/// parallel product lines, not just within the table.
pub struct ConditionKeyBuilder {
    dataset_id: String,
    suffix: String,
}

impl ConditionKeyBuilder {
    pub fn new(dataset_id: &str, metadata: &SourceMetadata) -> Self {
        let suffix = format!(
            "{}_{}_{}_{}_{}_{}",
            metadata.username,
            metadata.basic_type,
            metadata.product_sales_code,
            metadata.product_design_step,
            metadata.package,
            metadata.dut_id
        );
        Self {
            dataset_id: dataset_id.to_string(),
            suffix,
        }
    }

    /// Extract conditions and comments from one data row, given the
    /// rendered row values and the current header vectors
    pub fn build(&self, row: usize, values: &[String], headers: &HeaderVectors) -> RowConditions {
        let mut out = RowConditions::default();

        for (col, value) in values.iter().enumerate() {
            let name = headers.name_at(col);
            if name.is_empty() {
                continue;
            }
            let field = headers.field_at(col);

            if field == fields::CONDITION {
                let mut key_name = format!("cond_{}", name);
                let mut value = value.clone();
                if key_name.to_lowercase() == "cond_tambient" {
                    // an empty temperature is recorded as 0
                    if value.is_empty() {
                        log_warning!(codes::assembly::EMPTY_TEMPERATURE,
                            "Temperature condition empty, defaulted to 0",
                            "dataset" => self.dataset_id,
                            "row" => row
                        );
                        value = "0".to_string();
                    }
                } else if key_name.to_lowercase() == "cond_vio" {
                    key_name = "cond_VIO".to_string();
                }

                out.condition_string.push('_');
                out.condition_string.push_str(&value);
                out.condition_string.push_str(&self.suffix);
                // the trailing bracket marks the end of a numeric value so
                // that vio=3 never matches vio=33 in a file name
                out.match_tokens.push(format!("{}={}[", name, value));
                out.condition_meta.push((key_name, value));
            }

            if field.to_lowercase().contains(fields::COMMENT)
                && name != reserved::PICTURE_PATH
                && name != reserved::WAVEFORM_PATH
                && !value.is_empty()
            {
                out.comments.push(value.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_and_fill;
    use crate::table::{MemoryTable, TabularSource};

    fn test_metadata() -> SourceMetadata {
        SourceMetadata {
            username: "Xing Jin".to_string(),
            basic_type: "S1234".to_string(),
            product_sales_code: "TLS1234".to_string(),
            product_design_step: "A21".to_string(),
            package: "TSON10".to_string(),
            dut_id: "1".to_string(),
            ..Default::default()
        }
    }

    fn headers_from(rows: &[Vec<&str>]) -> HeaderVectors {
        let table = MemoryTable::from_raw_rows(rows);
        let mut headers = HeaderVectors::new();
        for row in 0..table.rows() {
            classify_and_fill(&table, row, &mut headers);
        }
        headers
    }

    const SUFFIX: &str = "Xing Jin_S1234_TLS1234_A21_TSON10_1";

    #[test]
    fn test_condition_string_and_tokens() {
        let headers = headers_from(&[
            vec!["#FIELD", "cond", "cond", "out"],
            vec!["#name", "vbat", "Tambient", "iq"],
        ]);
        let builder = ConditionKeyBuilder::new("ds", &test_metadata());
        let values = vec![
            "".to_string(),
            "3.3".to_string(),
            "25".to_string(),
            "12.5".to_string(),
        ];
        let out = builder.build(0, &values, &headers);

        // the identity suffix is appended after every condition column
        assert_eq!(
            out.condition_string,
            format!("_3.3{SUFFIX}_25{SUFFIX}")
        );
        assert_eq!(
            out.match_tokens,
            vec!["vbat=3.3[".to_string(), "Tambient=25[".to_string()]
        );
        assert_eq!(
            out.condition_meta,
            vec![
                ("cond_vbat".to_string(), "3.3".to_string()),
                ("cond_Tambient".to_string(), "25".to_string()),
            ]
        );
        assert!(out.comments.is_empty());
    }

    #[test]
    fn test_empty_temperature_defaults_to_zero() {
        let headers = headers_from(&[vec!["#FIELD", "cond"], vec!["#name", "Tambient"]]);
        let builder = ConditionKeyBuilder::new("ds", &test_metadata());
        let out = builder.build(3, &["".to_string(), "".to_string()], &headers);
        assert_eq!(out.condition_meta, vec![("cond_Tambient".to_string(), "0".to_string())]);
        assert_eq!(out.match_tokens, vec!["Tambient=0[".to_string()]);
    }

    #[test]
    fn test_vio_is_canonicalized() {
        let headers = headers_from(&[vec!["#FIELD", "cond", "cond"], vec!["#name", "vio", "Vio"]]);
        let builder = ConditionKeyBuilder::new("ds", &test_metadata());
        let values = vec!["".to_string(), "3".to_string(), "5".to_string()];
        let out = builder.build(0, &values, &headers);
        assert_eq!(out.condition_meta[0].0, "cond_VIO");
        assert_eq!(out.condition_meta[1].0, "cond_VIO");
        // match tokens keep the raw column name
        assert_eq!(out.match_tokens[0], "vio=3[");
    }

    #[test]
    fn test_comment_collection_skips_reserved_names() {
        let headers = headers_from(&[
            vec!["#FIELD", "comment", "Comment", "comment", "comment"],
            vec!["#name", "note", "extra", "picture_path", "wfm_path"],
        ]);
        let builder = ConditionKeyBuilder::new("ds", &test_metadata());
        let values = vec![
            "".to_string(),
            "looks noisy".to_string(),
            "rerun later".to_string(),
            "a/b.png".to_string(),
            "a/b.mat".to_string(),
        ];
        let out = builder.build(0, &values, &headers);
        assert_eq!(
            out.comments,
            vec!["looks noisy".to_string(), "rerun later".to_string()]
        );
    }

    #[test]
    fn test_unnamed_columns_are_skipped() {
        let headers = headers_from(&[vec!["#FIELD", "cond"], vec!["#name", ""]]);
        let builder = ConditionKeyBuilder::new("ds", &test_metadata());
        let out = builder.build(0, &["".to_string(), "3".to_string()], &headers);
        assert!(out.condition_string.is_empty());
        assert!(out.match_tokens.is_empty());
    }
}
