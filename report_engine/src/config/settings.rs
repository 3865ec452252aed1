//! Runtime configuration loaded from the line-oriented key:value file

use super::constants::defaults;
use crate::logging::codes;
use crate::{log_info, log_warning};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Configuration errors; a missing or unreadable file is fatal
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: String },

    #[error("Configuration file could not be read: {path}: {message}")]
    Unreadable { path: String, message: String },
}

/// Resolved configuration with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub project: String,
    pub report_template: String,
    pub report_name: String,
    pub email: String,
    pub api_id_perl: String,
    pub username: String,
    /// Unrecognized keys are retained but unused
    pub extra: BTreeMap<String, String>,
}

impl Settings {
    /// Read and resolve the configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let pairs = read_config_file(path)?;
        Ok(Self::from_pairs(pairs))
    }

    /// Apply defaults and case-normalized key lookup over raw pairs
    pub fn from_pairs(pairs: BTreeMap<String, String>) -> Self {
        let mut settings = Self {
            project: defaults::PROJECT.to_string(),
            report_template: defaults::REPORT_TEMPLATE.to_string(),
            report_name: defaults::REPORT_NAME.to_string(),
            email: defaults::EMAIL.to_string(),
            api_id_perl: String::new(),
            username: String::new(),
            extra: BTreeMap::new(),
        };
        let mut default_email = true;

        for (raw_key, value) in pairs {
            match raw_key.to_lowercase().as_str() {
                "project" => settings.project = value,
                "report_template" => settings.report_template = value,
                "name_report" => settings.report_name = value,
                "email" => {
                    settings.email = value;
                    default_email = false;
                }
                "api_id_perl" => settings.api_id_perl = value,
                "username" => settings.username = value,
                _ => {
                    settings.extra.insert(raw_key, value);
                }
            }
        }

        if default_email {
            log_warning!(
                codes::configuration::DEFAULT_EMAIL_USED,
                "No email configured, using default",
                "email" => settings.email
            );
        }
        log_info!("Configuration resolved",
            "project" => settings.project,
            "report_name" => settings.report_name,
            "report_template" => settings.report_template
        );

        settings
    }
}

/// Read the raw key:value file. Lines split on the first ':'; keys and
/// values are trimmed. Only the exact `Project` spelling lowercases its
/// value at read time; other casings of the key are still recognized by
/// the resolver but keep the value as written, and the staging path and
/// recipe index follow that casing.
pub fn read_config_file(path: &Path) -> Result<BTreeMap<String, String>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.display().to_string(),
        });
    }
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut pairs = BTreeMap::new();
    for line in contents.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_string();
        let mut value = value.trim().to_string();
        if key.is_empty() {
            continue;
        }
        if key == "Project" {
            value = value.to_lowercase();
        }
        pairs.insert(key, value);
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = Settings::load(Path::new("/nonexistent/Config_Tembo.txt"));
        assert_matches!(result, Err(ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_read_config_file_trims_and_skips() {
        let file = write_config("Project : DEMO\n\nname_report: Weekly Report\nnocolonhere\n");
        let pairs = read_config_file(file.path()).unwrap();
        // project value lowercased at read time
        assert_eq!(pairs.get("Project"), Some(&"demo".to_string()));
        assert_eq!(pairs.get("name_report"), Some(&"Weekly Report".to_string()));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_defaults_applied() {
        let settings = Settings::from_pairs(BTreeMap::new());
        assert_eq!(settings.project, "psn-general");
        assert_eq!(settings.report_name, "Simple Report");
        assert_eq!(settings.report_template, "48292680-1751-43d9-beb3-e511e156641e");
        assert!(settings.username.is_empty());
    }

    #[test]
    fn test_case_normalized_lookup() {
        let file = write_config("PROJECT: demo\nName_Report: My Report\nEmail: a@b.c\n");
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.project, "demo");
        assert_eq!(settings.report_name, "My Report");
        assert_eq!(settings.email, "a@b.c");
    }

    #[test]
    fn test_project_lowercasing_requires_exact_key_spelling() {
        // "Project" lowercases its value, any other casing keeps it
        let file = write_config("PROJECT: DEMO\n");
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.project, "DEMO");

        let file = write_config("Project: DEMO\n");
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.project, "demo");
    }

    #[test]
    fn test_unrecognized_keys_retained() {
        let file = write_config("Project: demo\ncustom_key: custom_value\n");
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(
            settings.extra.get("custom_key"),
            Some(&"custom_value".to_string())
        );
    }
}
