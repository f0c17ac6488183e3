// src/config.rs
//! Run and relay configuration.

use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "DocSignals/1.0";

/// Settings for one analysis run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of samples fetched per run (at least 1)
    pub fetch_count: usize,

    /// Pause between consecutive fetches
    pub fetch_delay: Duration,

    /// Per-request timeout
    pub timeout: Duration,

    /// Relay endpoint used when a direct fetch fails at the transport level
    pub relay_url: Option<String>,

    pub user_agent: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fetch_count: 3,
            fetch_delay: Duration::from_millis(300),
            timeout: Duration::from_secs(10),
            relay_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl RunConfig {
    pub fn with_fetch_count(mut self, count: usize) -> Self {
        self.fetch_count = count.max(1);
        self
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_relay(mut self, relay_url: Option<String>) -> Self {
        self.relay_url = relay_url.filter(|u| !u.trim().is_empty());
        self
    }
}

/// Settings for the CORS relay server.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: SocketAddr,

    /// Redirect hops followed before answering 502
    pub max_redirects: usize,

    /// Whole-request upstream timeout
    pub timeout: Duration,

    pub connect_timeout: Duration,

    /// Permit loopback/private/link-local upstream hosts
    pub allow_private_targets: bool,

    pub user_agent: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8787)),
            max_redirects: 5,
            timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(5),
            allow_private_targets: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl RelayConfig {
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_private_targets(mut self, allow: bool) -> Self {
        self.allow_private_targets = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let run = RunConfig::default();
        assert_eq!(run.fetch_count, 3);
        assert_eq!(run.fetch_delay, Duration::from_millis(300));
        assert!(run.relay_url.is_none());

        let relay = RelayConfig::default();
        assert_eq!(relay.max_redirects, 5);
        assert!(!relay.allow_private_targets);
    }

    #[test]
    fn test_fetch_count_is_at_least_one() {
        assert_eq!(RunConfig::default().with_fetch_count(0).fetch_count, 1);
        assert_eq!(RunConfig::default().with_fetch_count(5).fetch_count, 5);
    }

    #[test]
    fn test_blank_relay_is_ignored() {
        let config = RunConfig::default().with_relay(Some("  ".to_string()));
        assert!(config.relay_url.is_none());
    }
}
