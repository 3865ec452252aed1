//! Metadata map construction
//!
//! Builds the flat string maps the downstream reporting tool expects: the
//! document-wide common metadata and the per-limit metadata derived from
//! it. Key names are part of the output schema and must not change.

use crate::limits::LimitRecord;
use crate::table::SourceMetadata;
use chrono::Local;
use std::collections::BTreeMap;

/// Creation date as `YYYYMMDD`, zero-padded. Always serialized as a quoted
/// string; see the writer's precision rule.
pub fn ts_data_created() -> String {
    Local::now().format("%Y%m%d").to_string()
}

/// Document-wide metadata written once under `commonMetaData` and copied
/// into each limit object
pub fn common_meta_data(metadata: &SourceMetadata) -> BTreeMap<String, String> {
    let mut common = BTreeMap::new();
    common.insert("basic_type".to_string(), metadata.basic_type.clone());
    common.insert(
        "product_design_step".to_string(),
        metadata.product_design_step.clone(),
    );
    common.insert(
        "product_sales_code".to_string(),
        metadata.product_sales_code.clone(),
    );
    common.insert("ts_data_created".to_string(), ts_data_created());
    common.insert("generator".to_string(), "Rust".to_string());
    common.insert("generator_version".to_string(), "V11".to_string());
    common.insert("generator_domain".to_string(), "CV".to_string());
    common.insert("simulator_name".to_string(), "simulator".to_string());
    common.insert("simulation_type".to_string(), "type".to_string());
    common.insert("data_object_type".to_string(), "value".to_string());
    common.insert("data_object_type_version".to_string(), "1".to_string());
    common.insert("netlist_label".to_string(), "netlist_label".to_string());
    common.insert("user_name".to_string(), metadata.username.clone());
    common.insert("user_email_address".to_string(), metadata.email.clone());
    common
}

/// Metadata for one limit object: the common metadata minus `user_name`,
/// plus the resolved limit descriptors
pub fn limit_meta_data(
    common: &BTreeMap<String, String>,
    record: &LimitRecord,
    parameter: &str,
) -> BTreeMap<String, String> {
    let mut meta: BTreeMap<String, String> = common
        .iter()
        .filter(|(key, _)| key.as_str() != "user_name")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    meta.insert("reqID".to_string(), record.req_id.clone());
    meta.insert("description".to_string(), record.description.clone());
    meta.insert("typical".to_string(), record.typical.clone());
    meta.insert("test_number".to_string(), record.test_number.clone());
    meta.insert("p_number".to_string(), String::new());
    meta.insert("parameter_name".to_string(), parameter.to_string());
    meta.insert("data_object_type".to_string(), "limit".to_string());
    meta.insert("limit_type".to_string(), "spec".to_string());
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_source_metadata() -> SourceMetadata {
        SourceMetadata {
            basic_type: "S1234".to_string(),
            product_sales_code: "TLS1234".to_string(),
            product_design_step: "A21".to_string(),
            username: "Xing Jin".to_string(),
            email: "user@example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_ts_data_created_format() {
        let ts = ts_data_created();
        assert_eq!(ts.len(), 8);
        assert!(ts.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_common_meta_data() {
        let common = common_meta_data(&test_source_metadata());
        assert_eq!(common["basic_type"], "S1234");
        assert_eq!(common["data_object_type"], "value");
        assert_eq!(common["user_name"], "Xing Jin");
        assert_eq!(common["user_email_address"], "user@example.com");
        assert_eq!(common.len(), 14);
    }

    #[test]
    fn test_limit_meta_data_drops_user_name() {
        let common = common_meta_data(&test_source_metadata());
        let record = LimitRecord {
            req_id: "REQ-1".to_string(),
            description: "quiescent".to_string(),
            typical: "3".to_string(),
            test_number: "42".to_string(),
            ..Default::default()
        };
        let meta = limit_meta_data(&common, &record, "iq");
        assert!(!meta.contains_key("user_name"));
        assert_eq!(meta["data_object_type"], "limit");
        assert_eq!(meta["limit_type"], "spec");
        assert_eq!(meta["parameter_name"], "iq");
        assert_eq!(meta["test_number"], "42");
        assert_eq!(meta["p_number"], "");
        // common fields are carried over
        assert_eq!(meta["basic_type"], "S1234");
    }
}
