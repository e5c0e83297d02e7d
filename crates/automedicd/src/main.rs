use std::net::{IpAddr, SocketAddr};

use anyhow::{bail, Context, Result};
use automedic_core::{build_resolver, ResolverConfig, Strategy};
use automedicd::AppState;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::Level;

#[derive(Parser)]
#[command(name = "automedicd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AutoMedic diagnosis service", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "AUTOMEDIC_BIND", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Resolver strategy (overrides AUTOMEDIC_STRATEGY)
    #[arg(long)]
    strategy: Option<Strategy>,

    /// Upstream diagnosis service, required by the remote strategy
    #[arg(long, env = "AUTOMEDIC_ENDPOINT")]
    endpoint: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    automedic_core::init_tracing(args.json, level);

    let mut config = ResolverConfig::from_env().context("Invalid AUTOMEDIC_* configuration")?;
    if let Some(strategy) = args.strategy {
        config = config.with_strategy(strategy);
    }
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.as_str());
    }
    check_remote_target(&config, args.endpoint.is_some(), args.bind)?;
    let resolver = build_resolver(&config).context("Failed to build resolver")?;

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;

    automedicd::serve(listener, AppState::new(resolver), shutdown_signal()).await?;
    tracing::info!("automedicd stopped");
    Ok(())
}

/// The remote strategy needs an explicit upstream that is not this service.
fn check_remote_target(
    config: &ResolverConfig,
    endpoint_given: bool,
    bind: SocketAddr,
) -> Result<()> {
    if config.strategy != Strategy::Remote {
        return Ok(());
    }
    if !endpoint_given {
        bail!("The remote strategy needs --endpoint or AUTOMEDIC_ENDPOINT");
    }
    let (host, port) = config.endpoint_host_port()?;
    if points_at(&host, port, bind) {
        bail!(
            "Endpoint {} is this service's own address ({bind}); requests would loop",
            config.endpoint
        );
    }
    Ok(())
}

fn points_at(host: &str, port: u16, bind: SocketAddr) -> bool {
    if port != bind.port() {
        return false;
    }
    let local = bind.ip().is_loopback() || bind.ip().is_unspecified();
    match host.parse::<IpAddr>() {
        Ok(ip) => ip == bind.ip() || (local && (ip.is_loopback() || ip.is_unspecified())),
        Err(_) => local && host.eq_ignore_ascii_case("localhost"),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
