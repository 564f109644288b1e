//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (groups reference existing proxies, tunnels existing groups)
//! - Validate value ranges and address formats
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: Config → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::Config;
use crate::outbound::{Destination, OutboundKind};
use crate::probe::TargetUrl;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duplicate proxy name '{0}'")]
    DuplicateProxy(String),

    #[error("duplicate group name '{0}'")]
    DuplicateGroup(String),

    #[error("http proxy '{0}' needs a valid host:port address")]
    BadProxyAddress(String),

    #[error("group '{0}' has no proxies")]
    EmptyGroup(String),

    #[error("group '{group}' references unknown proxy '{proxy}'")]
    UnknownProxy { group: String, proxy: String },

    #[error("group '{group}' has an invalid url: {reason}")]
    BadUrl { group: String, reason: String },

    #[error("group '{0}' must have an interval greater than 0")]
    ZeroInterval(String),

    #[error("tunnel '{listen}' references unknown group '{group}'")]
    UnknownGroup { listen: String, group: String },

    #[error("tunnel '{0}' has an invalid listen address or target")]
    BadTunnel(String),

    #[error("probe timeouts must be greater than 0")]
    ZeroProbeTimeout,
}

/// Check a parsed configuration.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.probe.timeout_secs == 0 || config.probe.cycle_deadline_secs == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }

    let mut proxies = HashSet::new();
    for proxy in &config.proxies {
        if !proxies.insert(proxy.name.as_str()) {
            errors.push(ValidationError::DuplicateProxy(proxy.name.clone()));
        }
        if proxy.kind == OutboundKind::Http {
            let valid = proxy
                .address
                .as_deref()
                .is_some_and(|a| a.parse::<Destination>().is_ok());
            if !valid {
                errors.push(ValidationError::BadProxyAddress(proxy.name.clone()));
            }
        }
    }

    let mut groups = HashSet::new();
    for group in &config.groups {
        if !groups.insert(group.name.as_str()) {
            errors.push(ValidationError::DuplicateGroup(group.name.clone()));
        }
        if group.proxies.is_empty() {
            errors.push(ValidationError::EmptyGroup(group.name.clone()));
        }
        for member in &group.proxies {
            if !proxies.contains(member.as_str()) {
                errors.push(ValidationError::UnknownProxy {
                    group: group.name.clone(),
                    proxy: member.clone(),
                });
            }
        }
        if let Err(e) = TargetUrl::parse(&group.url) {
            errors.push(ValidationError::BadUrl {
                group: group.name.clone(),
                reason: e.to_string(),
            });
        }
        if group.interval == 0 {
            errors.push(ValidationError::ZeroInterval(group.name.clone()));
        }
    }

    for tunnel in &config.tunnels {
        if !groups.contains(tunnel.group.as_str()) {
            errors.push(ValidationError::UnknownGroup {
                listen: tunnel.listen.clone(),
                group: tunnel.group.clone(),
            });
        }
        let listen_ok = tunnel.listen.parse::<SocketAddr>().is_ok();
        let target_ok = tunnel.target.parse::<Destination>().is_ok();
        if !listen_ok || !target_ok || tunnel.max_connections == 0 {
            errors.push(ValidationError::BadTunnel(tunnel.listen.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
