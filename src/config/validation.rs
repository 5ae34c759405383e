//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. Returns every problem found,
//! not just the first.

use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::hosts::node::Node;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("at least one node must be configured")]
    NoNodes,

    #[error("invalid node address '{address}': {reason}")]
    InvalidNode { address: String, reason: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("retries.base_delay_ms ({base}) exceeds retries.max_delay_ms ({max})")]
    BackoffRange { base: u64, max: u64 },

    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.nodes.is_empty() {
        errors.push(ValidationError::NoNodes);
    }
    for address in &config.nodes {
        if let Err(e) = Node::parse(address) {
            errors.push(ValidationError::InvalidNode {
                address: address.clone(),
                reason: e.to_string(),
            });
        }
    }

    for (name, value) in &config.default_headers {
        let valid = reqwest::header::HeaderName::from_bytes(name.as_bytes()).is_ok()
            && reqwest::header::HeaderValue::from_str(value).is_ok();
        if !valid {
            errors.push(ValidationError::InvalidHeader { name: name.clone() });
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.connect_secs" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }
    if config.health_check.enabled && config.health_check.interval_secs == 0 {
        errors.push(ValidationError::Zero { field: "health_check.interval_secs" });
    }
    if config.retries.enabled {
        if config.retries.max_attempts == 0 {
            errors.push(ValidationError::Zero { field: "retries.max_attempts" });
        }
        if config.retries.base_delay_ms > config.retries.max_delay_ms {
            errors.push(ValidationError::BackoffRange {
                base: config.retries.base_delay_ms,
                max: config.retries.max_delay_ms,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
