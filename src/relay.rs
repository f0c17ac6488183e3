// src/relay.rs
//! CORS Relay
//!
//! Same-origin pass-through for pages a browser cannot fetch cross-origin:
//! `GET /proxy?url=<percent-encoded absolute URL>`. The relay follows
//! redirects itself (bounded, every hop re-checked), streams the final
//! status, content type and body through untouched, and stamps every
//! response with a permissive `Access-Control-Allow-Origin`.

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::{debug, error, info, warn};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;
use url::Url;

use crate::config::RelayConfig;
use crate::fetch::{check_target, FetchError};

/// Relay failures, each mapped to the status the client sees.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Missing url parameter")]
    MissingUrl,

    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Only http/https allowed")]
    UnsupportedScheme,

    #[error("Cannot relay to local/private addresses")]
    BlockedHost,

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("Invalid redirect URL")]
    InvalidRedirect,

    #[error("Proxy error: {0}")]
    Upstream(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingUrl | RelayError::InvalidUrl | RelayError::UnsupportedScheme => {
                StatusCode::BAD_REQUEST
            }
            RelayError::BlockedHost => StatusCode::FORBIDDEN,
            RelayError::TooManyRedirects
            | RelayError::InvalidRedirect
            | RelayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct RelayParams {
    url: Option<String>,
}

struct RelayState {
    client: reqwest::Client,
    config: RelayConfig,
}

impl RelayState {
    fn check(&self, url: &Url) -> Result<(), RelayError> {
        match check_target(url) {
            Ok(()) => Ok(()),
            Err(FetchError::BlockedHost) if self.config.allow_private_targets => Ok(()),
            Err(FetchError::BlockedHost) => Err(RelayError::BlockedHost),
            Err(FetchError::UnsupportedScheme) => Err(RelayError::UnsupportedScheme),
            Err(_) => Err(RelayError::InvalidUrl),
        }
    }
}

/// Build the relay router. Redirects are handled by the relay, so the
/// upstream client never follows them.
pub fn router(config: RelayConfig) -> Result<Router> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.clone())
        .build()
        .context("Failed to build relay HTTP client")?;

    let state = Arc::new(RelayState { client, config });

    Ok(Router::new()
        .route("/proxy", get(relay).options(preflight))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .with_state(state))
}

/// Bind `config.bind` and serve until Ctrl+C.
pub async fn serve(config: RelayConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind relay on {}", config.bind))?;

    serve_on(listener, config).await
}

/// Serve on an already-bound listener until Ctrl+C.
pub async fn serve_on(listener: TcpListener, config: RelayConfig) -> Result<()> {
    let addr = listener.local_addr()?;
    let app = router(config)?;

    info!("Relay listening on http://{}/proxy", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Relay server failed")?;

    info!("Relay shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down relay"),
        Err(e) => {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

async fn relay(
    State(state): State<Arc<RelayState>>,
    Query(params): Query<RelayParams>,
) -> Result<Response, RelayError> {
    let raw = params
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or(RelayError::MissingUrl)?;
    let target = Url::parse(raw.trim()).map_err(|_| RelayError::InvalidUrl)?;
    state.check(&target)?;

    let result = forward(&state, target.clone()).await;
    if let Err(e) = &result {
        warn!("Relay of {} failed: {}", target, e);
    }
    result
}

async fn forward(state: &RelayState, mut current: Url) -> Result<Response, RelayError> {
    let mut redirects = 0;

    loop {
        let upstream = state
            .client
            .get(current.as_str())
            .header(header::ACCEPT, "text/html,*/*")
            .send()
            .await
            .map_err(|e| RelayError::Upstream(e.to_string()))?;

        let status = upstream.status();
        let location = upstream.headers().get(header::LOCATION).cloned();

        if let (true, Some(location)) = (status.is_redirection(), location) {
            if redirects >= state.config.max_redirects {
                return Err(RelayError::TooManyRedirects);
            }

            let next = location
                .to_str()
                .ok()
                .and_then(|l| current.join(l).ok())
                .ok_or(RelayError::InvalidRedirect)?;
            state.check(&next).map_err(|e| match e {
                RelayError::InvalidUrl => RelayError::InvalidRedirect,
                other => other,
            })?;

            debug!("Relay redirect {} -> {}", current, next);
            redirects += 1;
            current = next;
            continue;
        }

        let content_type = upstream
            .headers()
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("text/html"));

        debug!("Relaying {} ({})", current, status);
        let body = Body::from_stream(upstream.bytes_stream());
        return Ok((status, [(header::CONTENT_TYPE, content_type)], body).into_response());
    }
}
