//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, addresses parse)
//! - Reject prefixes that would produce malformed route paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use crate::config::schema::{AppConfig, RouterConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("router.prefix {0:?} must be empty or start with '/'")]
    PrefixMissingSlash(String),

    #[error("router.prefix {0:?} must not end with '/'")]
    PrefixTrailingSlash(String),

    #[error("{field} {value:?} is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Validate a full application configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_router(&config.router);

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::Zero("limits.max_body_size"));
    }
    if config.limits.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("limits.request_timeout_secs"));
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Router checks, shared with CLI overrides.
pub fn validate_router(router: &RouterConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let prefix = &router.prefix;

    if !prefix.is_empty() && !prefix.starts_with('/') {
        errors.push(ValidationError::PrefixMissingSlash(prefix.clone()));
    }
    if prefix.ends_with('/') {
        errors.push(ValidationError::PrefixTrailingSlash(prefix.clone()));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_prefix_rules() {
        let mut router = RouterConfig::default();
        router.prefix = String::new();
        assert!(validate_router(&router).is_empty());

        router.prefix = "api".to_string();
        assert_eq!(
            validate_router(&router),
            vec![ValidationError::PrefixMissingSlash("api".to_string())]
        );

        router.prefix = "/".to_string();
        assert_eq!(
            validate_router(&router),
            vec![ValidationError::PrefixTrailingSlash("/".to_string())]
        );
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.router.prefix = "api/".to_string();
        config.server.bind_address = "localhost".to_string();
        config.limits.max_body_size = 0;
        config.observability.log_level = "loud".to_string();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.contains(&ValidationError::Zero("limits.max_body_size")));
    }
}
