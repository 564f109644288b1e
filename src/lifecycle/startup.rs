//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn validated proxy configs into shared candidates
//! - Build URL-test groups over those candidates (each starts probing)
//!
//! # Design Decisions
//! - Fail fast: any construction error is fatal
//! - One candidate instance per proxy name, shared by every group that lists it

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, ProxyConfig};
use crate::group::{GroupError, UrlTestGroup};
use crate::outbound::{Candidate, Destination, Direct, HttpConnect, OutboundKind, Proxy};
use crate::probe::{ConcurrentProber, GroupProber};

/// Candidates keyed by proxy name.
pub type CandidateSet = HashMap<String, Arc<dyn Candidate>>;

/// Build one candidate per configured proxy.
pub fn build_candidates(config: &Config) -> Result<CandidateSet, GroupError> {
    let timeout = Duration::from_secs(config.probe.timeout_secs);
    config
        .proxies
        .iter()
        .map(|proxy| Ok((proxy.name.clone(), build_candidate(proxy, timeout)?)))
        .collect()
}

fn build_candidate(
    proxy: &ProxyConfig,
    timeout: Duration,
) -> Result<Arc<dyn Candidate>, GroupError> {
    let candidate: Arc<dyn Candidate> = match proxy.kind {
        OutboundKind::Direct => Arc::new(Proxy::new(Direct::new(&proxy.name, timeout), timeout)),
        OutboundKind::Http => {
            let server: Destination = proxy
                .address
                .as_deref()
                .unwrap_or_default()
                .parse()
                .map_err(|e: crate::outbound::types::DestinationParseError| {
                    GroupError::InvalidConfiguration(e.to_string())
                })?;
            Arc::new(Proxy::new(HttpConnect::new(&proxy.name, server, timeout), timeout))
        }
    };
    tracing::debug!(proxy = %proxy.name, kind = %proxy.kind, "Candidate built");
    Ok(candidate)
}

/// Build every configured group. Must be called inside a Tokio runtime.
pub fn build_groups(
    config: &Config,
    candidates: &CandidateSet,
) -> Result<Vec<Arc<UrlTestGroup>>, GroupError> {
    let prober: Arc<dyn GroupProber> = Arc::new(ConcurrentProber::new(Duration::from_secs(
        config.probe.cycle_deadline_secs,
    )));

    let mut groups = Vec::with_capacity(config.groups.len());
    for group in &config.groups {
        let roster = group
            .proxies
            .iter()
            .map(|name| {
                candidates.get(name).cloned().ok_or_else(|| {
                    GroupError::InvalidConfiguration(format!(
                        "group '{}' references unknown proxy '{}'",
                        group.name, name
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        groups.push(Arc::new(UrlTestGroup::new(
            group.name.clone(),
            roster,
            &group.url,
            Duration::from_secs(group.interval),
            prober.clone(),
        )?));
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    const CONFIG: &str = r#"
[[proxies]]
name = "direct"
kind = "direct"

[[proxies]]
name = "hk-01"
kind = "http"
address = "127.0.0.1:3128"

[[groups]]
name = "auto"
proxies = ["hk-01", "direct"]
url = "http://127.0.0.1:1/generate_204"
interval = 3600

[[groups]]
name = "backup"
proxies = ["direct"]
url = "http://127.0.0.1:1/generate_204"
interval = 3600
"#;

    #[tokio::test]
    async fn test_groups_share_candidates() {
        let config = parse_config(CONFIG).unwrap();
        let candidates = build_candidates(&config).unwrap();
        assert_eq!(candidates.len(), 2);

        let groups = build_groups(&config, &candidates).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].describe().members, ["hk-01", "direct"]);

        let shared = &candidates["direct"];
        assert!(Arc::ptr_eq(&groups[1].candidates()[0], shared));
        assert!(Arc::ptr_eq(&groups[0].candidates()[1], shared));

        for group in &groups {
            group.stop().await;
        }
    }
}
