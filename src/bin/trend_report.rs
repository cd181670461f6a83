#[allow(dead_code)]
#[path = "../analyzer.rs"]
mod analyzer;
#[allow(dead_code)]
#[path = "../chart.rs"]
mod chart;
#[allow(dead_code)]
#[path = "../domain.rs"]
mod domain;
#[allow(dead_code)]
#[path = "../error.rs"]
mod error;
#[allow(dead_code)]
#[path = "../llm.rs"]
mod llm;
#[allow(dead_code)]
#[path = "../metrics.rs"]
mod metrics;
#[allow(dead_code)]
#[path = "../record.rs"]
mod record;
#[allow(dead_code)]
#[path = "../report.rs"]
mod report;
#[allow(dead_code)]
#[path = "../search.rs"]
mod search;
#[allow(dead_code)]
#[path = "../settings.rs"]
mod settings;
#[allow(dead_code)]
#[path = "../synthesis.rs"]
mod synthesis;

use std::{
    fs,
    path::{Path, PathBuf},
};

use analyzer::{Analyzer, TrendReport, TrendRequest};
use anyhow::{bail, Context, Result};
use clap::Parser;
use settings::Settings;
use tracing::warn;

/// Runs one trend analysis and writes the reports and chart specs to disk.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Path to the local configuration TOML file.
    #[arg(short, value_name = "CONFIG_PATH")]
    config: PathBuf,

    /// Domains to analyze; defaults to the dashboard's default selection.
    #[arg(short, long, value_delimiter = ',')]
    domains: Option<Vec<String>>,

    /// API key for the language model. Falls back to the configured key.
    #[arg(long)]
    api_key: Option<String>,

    /// Level of detail requested from the model, 1 to 10.
    #[arg(long)]
    depth: Option<i32>,

    /// Areas the analysis should emphasize.
    #[arg(long = "focus", value_delimiter = ',')]
    focus_areas: Vec<String>,

    /// Directory the reports are written to.
    #[arg(short, long, default_value = "reports")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let settings = Settings::from_file(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let analyzer = Analyzer::from_settings(&settings)?;

    let request = TrendRequest {
        domains: cli.domains,
        api_key: cli.api_key,
        depth: cli.depth,
        focus_areas: cli.focus_areas,
    };
    let report = analyze(&analyzer, &request).await?;

    fs::create_dir_all(&cli.out)
        .with_context(|| format!("failed to create {}", cli.out.display()))?;

    for analysis in report.analyses.iter() {
        let download = analysis.download();
        // Labels such as "Blockchain/Web3" must not turn into subdirectories.
        let path = cli.out.join(download.file_name.replace('/', "_"));
        write(&path, &download.content)?;
        match analysis.error_message() {
            Some(message) => println!("{:<22} {message}", analysis.domain.label()),
            None => println!("{:<22} {}", analysis.domain.label(), path.display()),
        }
    }

    write(
        &cli.out.join("trend_radar.json"),
        &serde_json::to_string_pretty(&report.radar_chart)?,
    )?;
    write(
        &cli.out.join("trend_comparison.json"),
        &serde_json::to_string_pretty(&report.bar_chart)?,
    )?;
    println!(
        "{} domain(s) analyzed, {} failed. Charts written to {}.",
        report.analyses.len(),
        report.analyses.failed_count(),
        cli.out.display()
    );
    Ok(())
}

/// Runs the analysis; a rejected configuration fails the command.
async fn analyze(analyzer: &Analyzer, request: &TrendRequest) -> Result<TrendReport> {
    match analyzer.run(request).await {
        Ok(report) => Ok(report),
        Err(e) => {
            warn!("nothing analyzed: {e}");
            bail!(e)
        }
    }
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::sync::{atomic::Ordering, Arc};

    use super::*;
    use crate::{
        analyzer::tests::{analyzer, StubModel, StubSearch},
        error::ConfigError,
    };

    #[tokio::test]
    async fn empty_selection_fails_the_command() {
        let search = Arc::new(StubSearch::default());
        let analyzer = analyzer(search.clone(), Arc::new(StubModel::default()), Some("key"));
        let request = TrendRequest {
            domains: Some(Vec::new()),
            ..Default::default()
        };

        let err = analyze(&analyzer, &request).await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::EmptySelection)
        );
        assert_eq!(err.to_string(), "Please select domains and enter API key");
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_credential_fails_the_command() {
        let analyzer = analyzer(
            Arc::new(StubSearch::default()),
            Arc::new(StubModel::default()),
            None,
        );

        let err = analyze(&analyzer, &TrendRequest::default())
            .await
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::MissingCredential)
        );
    }

    #[tokio::test]
    async fn valid_request_produces_a_report() {
        let analyzer = analyzer(
            Arc::new(StubSearch::default()),
            Arc::new(StubModel::default()),
            Some("key"),
        );

        let report = analyze(&analyzer, &TrendRequest::default()).await.unwrap();

        assert_eq!(report.analyses.len(), 3);
        assert_eq!(report.analyses.failed_count(), 0);
    }
}
