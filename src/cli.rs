use clap::{Args as ClapArgs, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{RelayConfig, RunConfig};
use crate::history::DEFAULT_HISTORY_FILE;
use crate::reporting::ReportFormat;

#[derive(Parser, Debug)]
#[command(name = "doc-signals")]
#[command(version)]
#[command(about = "Measures how stable and how semantic a page's HTML is.", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a URL several times and report structural and semantic signals.
    Analyze(AnalyzeArgs),

    /// Show or clear the comparison history of past runs.
    History(HistoryArgs),

    /// Run the CORS relay server.
    Relay(RelayArgs),
}

#[derive(ClapArgs, Debug)]
pub struct AnalyzeArgs {
    /// Page to analyze. A missing scheme defaults to https://.
    pub url: String,

    /// Number of samples to fetch.
    #[arg(short = 'n', long, default_value_t = 3)]
    pub fetches: usize,

    /// Pause between fetches, in milliseconds.
    #[arg(long, default_value_t = 300)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Relay endpoint used when a direct fetch fails (e.g. http://127.0.0.1:8787/proxy).
    #[arg(long, env = "DOC_SIGNALS_RELAY")]
    pub relay: Option<String>,

    /// Output format (text/json).
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Also write the JSON report to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print what the classifications mean.
    #[arg(long)]
    pub explain: bool,

    /// History file.
    #[arg(long, default_value = DEFAULT_HISTORY_FILE)]
    pub history: PathBuf,

    /// Do not record this run in the history.
    #[arg(long)]
    pub no_history: bool,
}

impl AnalyzeArgs {
    pub fn run_config(&self) -> RunConfig {
        RunConfig::default()
            .with_fetch_count(self.fetches)
            .with_fetch_delay(Duration::from_millis(self.delay_ms))
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_relay(self.relay.clone())
    }

    pub fn report_format(&self) -> ReportFormat {
        ReportFormat::from_str(&self.format)
    }
}

#[derive(ClapArgs, Debug)]
pub struct HistoryArgs {
    /// History file.
    #[arg(long, default_value = DEFAULT_HISTORY_FILE)]
    pub history: PathBuf,

    /// Delete all recorded runs.
    #[arg(long)]
    pub clear: bool,
}

#[derive(ClapArgs, Debug)]
pub struct RelayArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8787")]
    pub bind: SocketAddr,

    /// Allow relaying to loopback and private-network hosts.
    #[arg(long)]
    pub allow_private: bool,
}

impl RelayArgs {
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig::default()
            .with_bind(self.bind)
            .with_private_targets(self.allow_private)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_defaults() {
        let args = Args::try_parse_from(["doc-signals", "analyze", "example.com"]).unwrap();
        let Command::Analyze(analyze) = args.command else {
            panic!("expected analyze");
        };

        let config = analyze.run_config();
        assert_eq!(config.fetch_count, 3);
        assert_eq!(config.fetch_delay, Duration::from_millis(300));
        assert_eq!(analyze.report_format(), ReportFormat::Text);
        assert!(!analyze.no_history);
    }

    #[test]
    fn test_analyze_overrides() {
        let args = Args::try_parse_from([
            "doc-signals",
            "analyze",
            "https://example.com",
            "-n",
            "5",
            "--delay-ms",
            "0",
            "--format",
            "json",
            "--relay",
            "http://127.0.0.1:8787/proxy",
        ])
        .unwrap();
        let Command::Analyze(analyze) = args.command else {
            panic!("expected analyze");
        };

        let config = analyze.run_config();
        assert_eq!(config.fetch_count, 5);
        assert!(config.fetch_delay.is_zero());
        assert_eq!(config.relay_url.as_deref(), Some("http://127.0.0.1:8787/proxy"));
        assert_eq!(analyze.report_format(), ReportFormat::Json);
    }

    #[test]
    fn test_relay_args() {
        let args = Args::try_parse_from([
            "doc-signals",
            "relay",
            "--bind",
            "0.0.0.0:9000",
            "--allow-private",
        ])
        .unwrap();
        let Command::Relay(relay) = args.command else {
            panic!("expected relay");
        };

        let config = relay.relay_config();
        assert_eq!(config.bind.port(), 9000);
        assert!(config.allow_private_targets);
    }
}
