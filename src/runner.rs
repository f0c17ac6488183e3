// src/runner.rs
//! Run orchestration: validate, sample sequentially with pacing, analyze.

use indicatif::ProgressBar;
use log::{debug, info};
use thiserror::Error;
use url::Url;

use crate::analysis::{analyze, AnalysisError};
use crate::config::RunConfig;
use crate::fetch::{validate_url, FetchError, HtmlFetcher};
use crate::models::AnalysisResult;

/// The single failure a run can end with.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Fetch `config.fetch_count` samples of `url`, one at a time, sleeping
/// `config.fetch_delay` between requests. The first failure aborts the loop
/// and discards whatever was collected.
pub async fn collect_samples<F: HtmlFetcher + ?Sized>(
    fetcher: &F,
    url: &Url,
    config: &RunConfig,
    pb: Option<&ProgressBar>,
) -> Result<Vec<String>, FetchError> {
    let count = config.fetch_count.max(1);
    let mut samples = Vec::with_capacity(count);

    for i in 0..count {
        if i > 0 && !config.fetch_delay.is_zero() {
            tokio::time::sleep(config.fetch_delay).await;
        }

        if let Some(pb) = pb {
            pb.set_message(format!("Fetching {}/{}", i + 1, count));
        }

        let html = fetcher.fetch_html(url).await?;
        debug!("Sample {}/{} of {}: {} bytes", i + 1, count, url, html.len());
        samples.push(html);

        if let Some(pb) = pb {
            pb.inc(1);
        }
    }

    Ok(samples)
}

/// Validate the raw input, sample it and analyze the batch.
pub async fn run_analysis<F: HtmlFetcher + ?Sized>(
    fetcher: &F,
    input: &str,
    config: &RunConfig,
    pb: Option<&ProgressBar>,
) -> Result<AnalysisResult, RunError> {
    let url = validate_url(input)?;
    info!("Analyzing {} ({} fetches)", url, config.fetch_count);

    let samples = collect_samples(fetcher, &url, config, pb).await?;

    if let Some(pb) = pb {
        pb.set_message("Analyzing");
    }

    Ok(analyze(samples.as_slice(), url.as_str())?)
}
