// src/fetch.rs
//! Page Fetching
//!
//! URL validation and HTML retrieval. A direct request is tried first; when it
//! fails at the transport level and a relay is configured, the same URL is
//! requested through the relay instead.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::redirect::Policy;
use reqwest::{header, Client, StatusCode};
use std::net::{Ipv4Addr, Ipv6Addr};
use thiserror::Error;
use url::{Host, Url};

use crate::config::RunConfig;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL")]
    InvalidUrl,

    #[error("HTTP(S) only")]
    UnsupportedScheme,

    #[error("Cannot analyze local/private addresses")]
    BlockedHost,

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("{0}")]
    Relay(String),

    #[error("Unable to reach relay server")]
    RelayUnreachable,

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Parse user input into a fetchable URL. Input without a scheme is treated
/// as `https://`; only http/https to public hosts is accepted.
pub fn validate_url(input: &str) -> Result<Url, FetchError> {
    let input = input.trim();
    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{input}")
    };

    let url = Url::parse(&candidate).map_err(|_| FetchError::InvalidUrl)?;
    check_target(&url)?;
    Ok(url)
}

/// Scheme and host checks shared by the fetcher and the relay.
pub fn check_target(url: &Url) -> Result<(), FetchError> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::UnsupportedScheme);
    }
    match url.host() {
        None => Err(FetchError::InvalidUrl),
        Some(host) if is_blocked_host(&host) => Err(FetchError::BlockedHost),
        Some(_) => Ok(()),
    }
}

/// Loopback, private, link-local and unspecified addresses, plus `localhost`.
pub fn is_blocked_host(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Host::Ipv4(ip) => is_blocked_ipv4(ip),
        Host::Ipv6(ip) => is_blocked_ipv6(ip),
    }
}

fn is_blocked_ipv4(ip: &Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
}

fn is_blocked_ipv6(ip: &Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_blocked_ipv4(&mapped);
    }

    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || (first & 0xffc0) == 0xfe80 // link-local fe80::/10
        || (first & 0xfe00) == 0xfc00 // unique local fc00::/7
}

/// Redirect hops followed by a direct fetch.
const MAX_REDIRECTS: usize = 10;

/// Carried through reqwest when a redirect hop points at a blocked host.
#[derive(Error, Debug)]
#[error("redirect to a local/private address")]
struct BlockedRedirect;

/// Follow redirects like reqwest's default policy, but stop at any hop whose
/// host `validate_url` would have refused.
fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        let blocked = attempt.url().host().is_some_and(|host| is_blocked_host(&host));
        if blocked {
            attempt.error(BlockedRedirect)
        } else if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}

fn is_blocked_redirect(e: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(e);
    while let Some(err) = source {
        if err.is::<BlockedRedirect>() {
            return true;
        }
        source = err.source();
    }
    false
}

/// Source of raw HTML for one URL.
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    async fn fetch_html(&self, url: &Url) -> Result<String, FetchError>;
}

/// HTTP fetcher with an optional relay fallback.
pub struct HttpFetcher {
    client: Client,
    relay_url: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: &RunConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(redirect_policy())
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            relay_url: config.relay_url.clone(),
        })
    }

    async fn fetch_direct(&self, url: &Url) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url.as_str())
            .header(header::ACCEPT, "text/html")
            .send()
            .await
            .map_err(classify_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        resp.text().await.map_err(classify_error)
    }

    async fn fetch_via_relay(&self, relay: &str, url: &Url) -> Result<String, FetchError> {
        let relay_request = relay_request_url(relay, url);
        debug!("Fetching {} via relay {}", url, relay);

        let resp = self
            .client
            .get(&relay_request)
            .header(header::ACCEPT, "text/html")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::RelayUnreachable
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(relay_failure(status, body));
        }

        resp.text().await.map_err(classify_error)
    }
}

#[async_trait]
impl HtmlFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &Url) -> Result<String, FetchError> {
        match self.fetch_direct(url).await {
            Err(FetchError::Transport(reason)) => match &self.relay_url {
                Some(relay) => {
                    info!("Direct fetch of {} failed ({}), retrying through relay", url, reason);
                    self.fetch_via_relay(relay, url).await
                }
                None => {
                    warn!("Direct fetch of {} failed: {}", url, reason);
                    Err(FetchError::Transport(reason))
                }
            },
            other => other,
        }
    }
}

/// `<relay>?url=<percent-encoded target>`, appending to an existing query if any.
pub fn relay_request_url(relay: &str, target: &Url) -> String {
    let separator = if relay.contains('?') { '&' } else { '?' };
    format!(
        "{}{}url={}",
        relay,
        separator,
        urlencoding::encode(target.as_str())
    )
}

fn relay_failure(status: StatusCode, body: String) -> FetchError {
    let body = body.trim();
    if body.is_empty() {
        FetchError::Relay(format!("Relay error: {}", status.as_u16()))
    } else {
        FetchError::Relay(body.to_string())
    }
}

fn classify_error(e: reqwest::Error) -> FetchError {
    if is_blocked_redirect(&e) {
        FetchError::BlockedHost
    } else if e.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = e.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::Transport(e.to_string())
    }
}
