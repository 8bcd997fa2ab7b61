//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile rewrite patterns and parse their targets up front
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::rewrite::{RequestRewrite, RewriteError};
use crate::route::Route;

/// A single semantic problem with a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("repository path must not be empty")]
    EmptyRepositoryPath,

    #[error("theme route {0:?} must be a non-root route")]
    ThemeRoute(String),

    #[error("rewrite rule #{index}: {source}")]
    Rewrite {
        index: usize,
        #[source]
        source: RewriteError,
    },

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.repository.path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyRepositoryPath);
    }

    match Route::parse(&config.repository.theme_route) {
        Ok(route) if !route.is_root() => {}
        _ => errors.push(ValidationError::ThemeRoute(config.repository.theme_route.clone())),
    }

    for (index, rule) in config.rewrites.iter().enumerate() {
        if let Err(source) = RequestRewrite::new(&rule.pattern, &rule.target) {
            errors.push(ValidationError::Rewrite { index, source });
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
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
    use crate::config::RewriteConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.repository.theme_route = "/".into();
        config.rewrites.push(RewriteConfig::new("(", "x"));
        config.rewrites.push(RewriteConfig::new("^ok", "a/../b"));
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(matches!(errors[0], ValidationError::BindAddress(_)));
        assert!(matches!(errors[1], ValidationError::ThemeRoute(_)));
        assert!(matches!(errors[2], ValidationError::Rewrite { index: 1, .. }));
        assert!(matches!(errors[3], ValidationError::Rewrite { index: 2, .. }));
        assert!(matches!(errors[4], ValidationError::ZeroTimeout));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
