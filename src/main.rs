use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::fs;

use doc_signals::cli::{AnalyzeArgs, Args, Command, HistoryArgs, RelayArgs};
use doc_signals::fetch::HttpFetcher;
use doc_signals::history::AnalysisHistory;
use doc_signals::reporting::{
    render_comparison, render_explanations, render_json, render_text, ReportFormat,
};
use doc_signals::{relay, runner};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    match args.command {
        Command::Analyze(args) => analyze(args).await,
        Command::History(args) => history(args),
        Command::Relay(args) => serve_relay(args).await,
    }
}

async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let config = args.run_config();
    let fetcher = HttpFetcher::new(&config)?;

    let pb = ProgressBar::new(config.fetch_count as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let outcome = tokio::select! {
        result = runner::run_analysis(&fetcher, &args.url, &config, Some(&pb)) => Some(result),
        Ok(()) = tokio::signal::ctrl_c() => None,
    };

    let result = match outcome {
        Some(Ok(result)) => {
            pb.finish_and_clear();
            result
        }
        Some(Err(e)) => {
            pb.abandon_with_message("Failed");
            return Err(e).with_context(|| format!("Analysis of {} failed", args.url));
        }
        None => {
            pb.abandon_with_message("Cancelled");
            eprintln!("{}", "Cancelled.".yellow());
            return Ok(());
        }
    };

    match args.report_format() {
        ReportFormat::Text => {
            print!("{}", render_text(&result, config.fetch_count));
            if args.explain {
                println!();
                print!("{}", render_explanations(&result));
            }
        }
        ReportFormat::Json => println!("{}", render_json(&result, config.fetch_count)?),
    }

    if let Some(path) = &args.output {
        let json = render_json(&result, config.fetch_count)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Report written to {}", path.display());
        eprintln!("{} {}", "Saved report to".green(), path.display());
    }

    if !args.no_history {
        AnalysisHistory::load(&args.history).record(&result);
    }

    Ok(())
}

fn history(args: HistoryArgs) -> Result<()> {
    let mut history = AnalysisHistory::load(&args.history);

    if args.clear {
        history.clear();
        println!("{}", "History cleared.".green());
        return Ok(());
    }

    match history.len() {
        0 => println!("No recorded analyses in {}.", history.path().display()),
        1 => {
            println!("{}", render_comparison(history.entries()));
            println!("{}", "Run at least 2 analyses to compare.".dimmed());
        }
        n => {
            println!("{}", format!("Comparing {} analyses", n).bold().underline());
            println!("{}", render_comparison(history.entries()));
        }
    }

    Ok(())
}

async fn serve_relay(args: RelayArgs) -> Result<()> {
    let config = args.relay_config();
    if config.allow_private_targets {
        eprintln!(
            "{}",
            "Warning: relaying to private and loopback hosts is enabled.".yellow()
        );
    }
    println!("Relay on {}", format!("http://{}/proxy", config.bind).cyan());
    relay::serve(config).await
}
