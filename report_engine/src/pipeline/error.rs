use crate::config::settings::ConfigError;
use crate::limits::UnitError;
use crate::logging::{codes, Code};
use crate::table::TableError;
use crate::writer::WriterError;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration failed: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Table acquisition failed: {0}")]
    TableAcquisition(#[from] TableError),

    #[error("Limit resolution failed: {0}")]
    LimitResolution(#[from] UnitError),

    #[error("Document serialization failed: {0}")]
    Serialization(#[from] WriterError),

    #[error("I/O failed: {path}: {message}")]
    Io { path: String, message: String },

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    /// Diagnostic code logged when this error aborts the run
    pub fn code(&self) -> Code {
        match self {
            Self::Configuration(ConfigError::NotFound { .. }) => {
                codes::configuration::CONFIG_NOT_FOUND
            }
            Self::Configuration(ConfigError::Unreadable { .. }) => {
                codes::configuration::CONFIG_UNREADABLE
            }
            Self::TableAcquisition(TableError::NotFound { .. }) => codes::table::SOURCE_NOT_FOUND,
            Self::TableAcquisition(TableError::Unreadable { .. }) => codes::table::SOURCE_UNREADABLE,
            Self::TableAcquisition(TableError::NoSources { .. }) => codes::table::EMPTY_SOURCE,
            Self::LimitResolution(_) => codes::limits::MALFORMED_UNIT,
            Self::Serialization(_) => codes::writer::WRITE_FAILED,
            Self::Io { .. } | Self::Pipeline { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    pub fn io_error(path: &std::path::Path, error: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }

    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_error_conversion() {
        let unit_error = UnitError::MalformedUnit {
            unit: "[V]".to_string(),
        };
        let pipeline_error: PipelineError = unit_error.into();
        assert_matches!(pipeline_error, PipelineError::LimitResolution(_));
        assert!(pipeline_error.to_string().contains("[V]"));
    }

    #[test]
    fn test_fatal_code_follows_the_failing_stage() {
        let cases: Vec<(PipelineError, &str)> = vec![
            (
                ConfigError::Unreadable {
                    path: "Config_Tembo.txt".to_string(),
                    message: "permission denied".to_string(),
                }
                .into(),
                "E006",
            ),
            (
                TableError::Unreadable {
                    path: "sweep.csv".to_string(),
                    message: "permission denied".to_string(),
                }
                .into(),
                "E021",
            ),
            (
                TableError::NoSources {
                    path: "30_RawData".to_string(),
                }
                .into(),
                "E022",
            ),
            (
                WriterError::Io {
                    path: "report.json".to_string(),
                    message: "disk full".to_string(),
                }
                .into(),
                "E050",
            ),
            (PipelineError::pipeline_error("unexpected state"), "ERR001"),
        ];
        for (error, code) in cases {
            assert_eq!(error.code().as_str(), code);
        }
    }
}
