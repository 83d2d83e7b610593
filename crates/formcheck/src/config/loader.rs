use std::path::Path;

use crate::config::schema::{Config, VerificationMode};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();

    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

pub(crate) fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.ocr.dpi == 0 {
        return Err(ConfigError::Validation {
            message: "ocr.dpi must be greater than zero".to_string(),
        });
    }

    if config.mode == VerificationMode::Fields
        && config.fields.keywords.iter().all(|k| k.trim().is_empty())
    {
        return Err(ConfigError::Validation {
            message: "fields mode requires at least one non-blank keyword".to_string(),
        });
    }

    if config.headings.context_lines == 0 {
        return Err(ConfigError::Validation {
            message: "headings.context_lines must be at least 1".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::UnknownFormatPolicy;

    #[test]
    fn test_load_valid_config() {
        let config_json = r#"
        {
            "version": "1.0",
            "mode": "headings",
            "ocr": { "languages": ["eng", "deu"], "dpi": 200, "timeout_secs": 30 },
            "conversion": { "unknown_format": "reject" },
            "headings": { "context_lines": 2 }
        }
        "#;

        let config = load_config_from_str(config_json).unwrap();
        assert_eq!(config.mode, VerificationMode::Headings);
        assert_eq!(config.ocr.languages, vec!["eng", "deu"]);
        assert_eq!(config.ocr.dpi, 200);
        assert_eq!(config.ocr.timeout_secs, 30);
        assert_eq!(config.conversion.unknown_format, UnknownFormatPolicy::Reject);
        assert_eq!(config.headings.context_lines, 2);
        assert_eq!(config.headings.max_uppercase_words, 6);
    }

    #[test]
    fn test_custom_keywords() {
        let config_json = r#"
        {
            "version": "1.0",
            "fields": { "keywords": ["passport", "nationality"], "tolerance_px": 12 }
        }
        "#;

        let config = load_config_from_str(config_json).unwrap();
        assert_eq!(config.fields.keywords, vec!["passport", "nationality"]);
        assert_eq!(config.fields.tolerance_px, 12);
    }

    #[test]
    fn test_invalid_version() {
        let result = load_config_from_str(r#"{"version": "2.0"}"#);
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_missing_version_fails_schema() {
        let result = load_config_from_str(r#"{"mode": "fields"}"#);
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn test_unknown_mode_fails_schema() {
        let result = load_config_from_str(r#"{"version": "1.0", "mode": "layout"}"#);
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn test_unknown_top_level_key_fails_schema() {
        let result = load_config_from_str(r#"{"version": "1.0", "rules": []}"#);
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn test_blank_keywords_rejected_in_fields_mode() {
        let result = load_config_from_str(
            r#"{"version": "1.0", "mode": "fields", "fields": {"keywords": ["", "  "]}}"#,
        );
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_blank_keywords_allowed_in_headings_mode() {
        let result = load_config_from_str(
            r#"{"version": "1.0", "mode": "headings", "fields": {"keywords": []}}"#,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let result = load_config_from_str("{ not json");
        assert!(matches!(result, Err(ConfigError::ParseJson(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/formcheck.json");
        match result {
            Err(ConfigError::ReadFile { path, .. }) => {
                assert_eq!(path.to_str().unwrap(), "/nonexistent/formcheck.json");
            }
            _ => panic!("Expected ReadFile error"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }
}
