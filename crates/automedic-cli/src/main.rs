//! AutoMedic CLI
//!
//! The `automedic` command submits a vehicle symptom description and prints
//! the diagnosis.
//!
//! ## Commands
//!
//! - `diagnose`: Fill in the diagnosis form and submit it
//! - `health`: Probe a remote diagnosis service

use std::time::Duration;

use anyhow::{Context, Result};
use automedic_core::{
    build_resolver, DiagnosisResult, DiagnosisSession, FormInput, RemoteResolver,
    ResolverConfig, SessionState, Strategy,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "automedic")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AutoMedic vehicle symptom diagnosis", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe the vehicle and its symptoms and get a diagnosis
    Diagnose {
        /// Vehicle make, e.g. "Honda"
        #[arg(long, default_value = "")]
        make: String,

        /// Vehicle model, e.g. "Civic"
        #[arg(long, default_value = "")]
        model: String,

        /// Model year (free text; non-numeric input is sent as null)
        #[arg(long, default_value = "")]
        year: String,

        /// Odometer reading in miles (free text; non-numeric input becomes 0)
        #[arg(long, default_value = "")]
        mileage: String,

        /// What the car is doing
        #[arg(short, long)]
        symptoms: String,

        /// Resolver strategy: mock, fixed or remote
        #[arg(long, env = "AUTOMEDIC_STRATEGY")]
        strategy: Option<Strategy>,

        /// Base URL of the remote diagnosis service
        #[arg(long, env = "AUTOMEDIC_ENDPOINT")]
        endpoint: Option<String>,

        /// Artificial latency of the mock strategies, in milliseconds
        #[arg(long, env = "AUTOMEDIC_MOCK_DELAY_MS")]
        delay_ms: Option<u64>,

        /// Remote request timeout in seconds (default: wait indefinitely)
        #[arg(long, env = "AUTOMEDIC_TIMEOUT_SECS")]
        timeout_secs: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Check that a remote diagnosis service is up
    Health {
        /// Base URL of the remote diagnosis service
        #[arg(long, env = "AUTOMEDIC_ENDPOINT", default_value = automedic_core::config::DEFAULT_ENDPOINT)]
        endpoint: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    automedic_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Diagnose {
            make,
            model,
            year,
            mileage,
            symptoms,
            strategy,
            endpoint,
            delay_ms,
            timeout_secs,
            output,
        } => {
            let form = FormInput {
                make,
                model,
                year,
                mileage,
                symptoms,
            };
            let config = resolver_config(strategy, endpoint, delay_ms, timeout_secs);
            cmd_diagnose(form, &config, output).await
        }
        Commands::Health { endpoint } => cmd_health(&endpoint).await,
    }
}

/// Defaults, overridden by whichever flags (or their env fallbacks) were given.
fn resolver_config(
    strategy: Option<Strategy>,
    endpoint: Option<String>,
    delay_ms: Option<u64>,
    timeout_secs: Option<u64>,
) -> ResolverConfig {
    let mut config = ResolverConfig::default();
    if let Some(strategy) = strategy {
        config = config.with_strategy(strategy);
    }
    if let Some(endpoint) = endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(ms) = delay_ms {
        config = config.with_mock_delay(Duration::from_millis(ms));
    }
    config.with_timeout(timeout_secs.map(Duration::from_secs))
}

async fn cmd_diagnose(form: FormInput, config: &ResolverConfig, output: OutputFormat) -> Result<()> {
    debug!(strategy = %config.strategy, endpoint = %config.endpoint, "resolving");

    let resolver = build_resolver(config).context("Failed to build resolver")?;
    let session = DiagnosisSession::new(resolver);

    if output == OutputFormat::Text {
        eprintln!("Diagnosing...");
    }

    match session.submit(form.into_request()).await? {
        SessionState::Success(result) => {
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Text => print!("{}", render_result(&result)),
            }
            Ok(())
        }
        SessionState::Failed(message) => anyhow::bail!(message),
        other => anyhow::bail!("Unexpected session state: {:?}", other),
    }
}

async fn cmd_health(endpoint: &str) -> Result<()> {
    let client = RemoteResolver::new(endpoint, Some(Duration::from_secs(10)))
        .context("Failed to build HTTP client")?;
    let body = client
        .health()
        .await
        .with_context(|| format!("Health check failed for {}", endpoint))?;

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn render_result(result: &DiagnosisResult) -> String {
    let diy = if result.diy_possible { "yes" } else { "no" };
    format!(
        "{title}\n\
         \n\
         Severity:      {severity}/10\n\
         Confidence:    {confidence:.0}%\n\
         DIY possible:  {diy}\n\
         Est. cost:     {cost}\n\
         \n\
         {description}\n\
         \n\
         Recommended action: {action}\n",
        title = result.issue_title,
        severity = result.severity_score,
        confidence = result.confidence_level * 100.0,
        diy = diy,
        cost = result.estimated_cost_range_usd,
        description = result.description,
        action = result.recommended_action,
    )
}
