//! Consolidated error codes and classification system
//!
//! Single source of truth for all diagnostic codes emitted while a table
//! is normalized into a report document, together with their metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a diagnostic code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Configuration error codes
pub mod configuration {
    use super::Code;

    pub const CONFIG_NOT_FOUND: Code = Code::new("E005");
    pub const CONFIG_UNREADABLE: Code = Code::new("E006");
    pub const DEFAULT_EMAIL_USED: Code = Code::new("W010");
}

/// Tabular source error codes
pub mod table {
    use super::Code;

    pub const SOURCE_NOT_FOUND: Code = Code::new("E020");
    pub const SOURCE_UNREADABLE: Code = Code::new("E021");
    pub const EMPTY_SOURCE: Code = Code::new("E022");
}

/// Limit resolution codes
pub mod limits {
    use super::Code;

    pub const MALFORMED_UNIT: Code = Code::new("E030");
    pub const NO_LIMIT_MATCH: Code = Code::new("W031");
}

/// Record assembly codes
pub mod assembly {
    use super::Code;

    pub const EMPTY_TEMPERATURE: Code = Code::new("W040");
    pub const CONDITION_REPEATED: Code = Code::new("W041");
}

/// Document writer codes
pub mod writer {
    use super::Code;

    pub const WRITE_FAILED: Code = Code::new("E050");
}

/// Staging area codes
pub mod staging {
    use super::Code;

    pub const COPY_FAILED: Code = Code::new("W060");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const CONFIG_LOADED: Code = Code::new("I002");
    pub const DATASET_PROCESSED: Code = Code::new("I003");
    pub const DOCUMENT_WRITTEN: Code = Code::new("I004");
    pub const STAGING_COMPLETED: Code = Code::new("I005");
}

// ============================================================================
// METADATA TABLE
// ============================================================================

fn metadata_table() -> &'static HashMap<&'static str, CodeMetadata> {
    static TABLE: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let entries = [
            CodeMetadata {
                code: "ERR001",
                category: "System",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Internal engine error",
            },
            CodeMetadata {
                code: "ERR002",
                category: "System",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Logging or pipeline initialization failed",
            },
            CodeMetadata {
                code: "E005",
                category: "Configuration",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Configuration file not found",
            },
            CodeMetadata {
                code: "E006",
                category: "Configuration",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Configuration file could not be read",
            },
            CodeMetadata {
                code: "W010",
                category: "Configuration",
                severity: Severity::Low,
                recoverable: true,
                requires_halt: false,
                description: "No email configured, default address used",
            },
            CodeMetadata {
                code: "E020",
                category: "Table",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Source table not found",
            },
            CodeMetadata {
                code: "E021",
                category: "Table",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Source table could not be read",
            },
            CodeMetadata {
                code: "E022",
                category: "Table",
                severity: Severity::High,
                recoverable: false,
                requires_halt: true,
                description: "No source tables found for the run",
            },
            CodeMetadata {
                code: "E030",
                category: "Limits",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Malformed unit token in limit source",
            },
            CodeMetadata {
                code: "W031",
                category: "Limits",
                severity: Severity::Medium,
                recoverable: true,
                requires_halt: false,
                description: "Parameter has no resolvable limit, bounds left empty",
            },
            CodeMetadata {
                code: "W040",
                category: "Assembly",
                severity: Severity::Low,
                recoverable: true,
                requires_halt: false,
                description: "Empty temperature condition defaulted to 0",
            },
            CodeMetadata {
                code: "W041",
                category: "Assembly",
                severity: Severity::Medium,
                recoverable: true,
                requires_halt: false,
                description: "Condition key collision disambiguated with repetition suffix",
            },
            CodeMetadata {
                code: "E050",
                category: "Writer",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Report document could not be written",
            },
            CodeMetadata {
                code: "W060",
                category: "Staging",
                severity: Severity::Low,
                recoverable: true,
                requires_halt: false,
                description: "Artifact copy to staging area failed",
            },
        ];
        entries
            .into_iter()
            .map(|meta| (meta.code, meta))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_description(code: &str) -> &'static str {
    metadata_table()
        .get(code)
        .map(|meta| meta.description)
        .unwrap_or("Unknown code")
}

pub fn get_category(code: &str) -> &'static str {
    metadata_table()
        .get(code)
        .map(|meta| meta.category)
        .unwrap_or("Unknown")
}

pub fn get_severity(code: &str) -> Severity {
    metadata_table()
        .get(code)
        .map(|meta| meta.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    metadata_table()
        .get(code)
        .map(|meta| meta.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    metadata_table()
        .get(code)
        .map(|meta| meta.requires_halt)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(limits::MALFORMED_UNIT.as_str(), "E030");
        assert_eq!(format!("{}", limits::MALFORMED_UNIT), "E030");
    }

    #[test]
    fn test_metadata_lookup() {
        assert_eq!(get_category("E030"), "Limits");
        assert_eq!(get_severity("E030"), Severity::Critical);
        assert!(requires_halt("E030"));
        assert!(!is_recoverable("E030"));
    }

    #[test]
    fn test_warning_codes_are_recoverable() {
        for code in ["W010", "W031", "W040", "W041", "W060"] {
            assert!(is_recoverable(code), "{} should be recoverable", code);
            assert!(!requires_halt(code), "{} should not halt", code);
        }
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("E999"), "Unknown code");
        assert_eq!(get_category("E999"), "Unknown");
        assert!(!requires_halt("E999"));
    }
}
