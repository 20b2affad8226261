// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::AskdbConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &AskdbConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let addr = config.server.host.trim();
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{addr}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let base_url = config.nlq.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "nlq.base_url must not be empty".to_string(),
        });
    } else if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("nlq.base_url `{base_url}` must start with http:// or https://"),
        });
    }

    if config.nlq.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "nlq.timeout_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = AskdbConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = AskdbConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn non_http_base_url_fails_validation() {
        let mut config = AskdbConfig::default();
        config.nlq.base_url = "ftp://nlq.internal".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("base_url"))));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let mut config = AskdbConfig::default();
        config.nlq.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("timeout_secs"))));
    }

    #[test]
    fn multiple_errors_are_collected() {
        let mut config = AskdbConfig::default();
        config.server.host = "".to_string();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
