use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use eol_check::analyzer::{ActionResults, EolAnalyzer};
use eol_check::config::{CheckConfig, FailurePolicy, OutputFormat};
use eol_check::registry::EndOfLifeClient;

#[derive(Parser)]
#[command(name = "eol-check")]
#[command(version, about = "Check software release cycles against their end-of-life dates")]
struct Cli {
    /// Products to check, comma or newline separated (e.g. "python,nodejs")
    #[arg(short, long)]
    products: Option<String>,

    /// JSON object of cycles to check per product (e.g. '{"python": ["3.12"]}')
    #[arg(long)]
    cycles: Option<String>,

    /// Version to resolve to a cycle; requires exactly one product
    #[arg(long = "product-version", value_name = "VERSION")]
    product_version: Option<String>,

    /// Match the version exactly, without falling back to major.minor or major
    #[arg(long)]
    no_semantic_fallback: bool,

    /// Days before the EOL date at which a cycle counts as approaching
    #[arg(long)]
    eol_threshold_days: Option<i64>,

    /// Days without a release after which a cycle counts as stale
    #[arg(long)]
    stale_threshold_days: Option<i64>,

    /// Response cache time-to-live in seconds
    #[arg(long)]
    cache_ttl: Option<u64>,

    /// Base URL of the lifecycle registry API
    #[arg(long)]
    api_url: Option<String>,

    /// Exit non-zero when an end-of-life cycle is found
    #[arg(long)]
    fail_on_eol: bool,

    /// Exit non-zero when a cycle approaching end-of-life is found
    #[arg(long)]
    fail_on_approaching_eol: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// What to report for a product whose lookup failed
    #[arg(long, value_enum)]
    failure_policy: Option<FailurePolicy>,

    /// JSON config file; command line flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Write JSON logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<CheckConfig> {
        let mut config = match &self.config {
            Some(path) => CheckConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => CheckConfig::default(),
        };

        if let Some(products) = self.products {
            config.products = products;
        }
        if let Some(cycles) = self.cycles {
            config.cycles = cycles;
        }
        if let Some(version) = self.product_version {
            config.version = version;
        }
        if self.no_semantic_fallback {
            config.semantic_version_fallback = false;
        }
        if let Some(days) = self.eol_threshold_days {
            config.eol_threshold_days = days;
        }
        if let Some(days) = self.stale_threshold_days {
            config.stale_threshold_days = days;
        }
        if let Some(ttl) = self.cache_ttl {
            config.cache_ttl = ttl;
        }
        if let Some(api_url) = self.api_url {
            config.api_url = api_url;
        }
        config.fail_on_eol |= self.fail_on_eol;
        config.fail_on_approaching_eol |= self.fail_on_approaching_eol;
        if let Some(format) = self.format {
            config.output_format = format;
        }
        if let Some(policy) = self.failure_policy {
            config.failure_policy = policy;
        }

        Ok(config)
    }
}

/// Install the global subscriber. The returned guard flushes the log file on drop.
fn init_logging(verbose: bool, log_file: Option<&PathBuf>) -> anyhow::Result<Option<WorkerGuard>> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
            Ok(None)
        }
    }
}

fn render(results: &ActionResults, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        OutputFormat::Summary => {
            let mut lines = vec![results.summary.clone()];
            for entry in &results.products {
                let eol = match (&entry.eol_date, entry.days_until_eol) {
                    (Some(date), Some(days)) => format!(" (eol {date}, {days} days)"),
                    (Some(date), None) => format!(" (eol {date})"),
                    _ => String::new(),
                };
                lines.push(format!(
                    "  {} {}: {}{}",
                    entry.product, entry.cycle, entry.status, eol
                ));
            }
            for failure in &results.failures {
                lines.push(format!("  {}: {}", failure.product, failure.message));
            }
            Ok(lines.join("\n"))
        }
    }
}

async fn run(config: CheckConfig) -> anyhow::Result<ExitCode> {
    let plan = config.validate()?;

    let client = EndOfLifeClient::new(&config.api_url, Duration::from_secs(config.cache_ttl));
    let analyzer = EolAnalyzer::new(Arc::new(client), config.eol_threshold_days)
        .with_stale_threshold_days(config.stale_threshold_days)
        .with_failure_policy(config.failure_policy);

    info!("Checking {} product(s)", plan.products.len());
    let results = analyzer
        .analyze_products(
            &plan.products,
            Some(&plan.cycles),
            Some(&plan.versions),
            config.semantic_version_fallback,
        )
        .await;

    println!("{}", render(&results, config.output_format)?);

    if config.fail_on_eol && results.eol_detected {
        error!("End-of-life release cycles detected");
        return Ok(ExitCode::FAILURE);
    }
    if config.fail_on_approaching_eol && results.approaching_eol {
        error!("Release cycles approaching end-of-life detected");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log_file.as_ref())?;
    let config = cli.into_config()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}
