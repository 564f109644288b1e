use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use urltest_proxy::admin::{self, AdminState};
use urltest_proxy::config::load_config;
use urltest_proxy::lifecycle::{build_candidates, build_groups, wait_for_shutdown_signal, Shutdown};
use urltest_proxy::observability::{logging, metrics};
use urltest_proxy::outbound::Destination;
use urltest_proxy::tunnel::{Listener, Tunnel};

#[derive(Parser)]
#[command(name = "urltest-proxy")]
#[command(about = "Latency-tested failover proxy groups", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "urltest.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    logging::init(&config.observability.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        proxies = config.proxies.len(),
        groups = config.groups.len(),
        "urltest-proxy starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let candidates = build_candidates(&config)?;
    let groups = build_groups(&config, &candidates)?;
    let shutdown = Shutdown::new();
    let mut tasks = Vec::new();

    for tunnel in &config.tunnels {
        let Some(group) = groups.iter().find(|g| g.name() == tunnel.group) else {
            continue;
        };
        let target: Destination = tunnel.target.parse()?;
        let listener = Listener::bind(&tunnel.listen, tunnel.max_connections).await?;
        let tunnel = Tunnel::new(listener, Arc::clone(group), target);
        tasks.push(tokio::spawn(tunnel.run(shutdown.subscribe())));
    }

    if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        let state = AdminState::new(groups.clone(), &config.admin.api_key);
        let admin_shutdown = shutdown.subscribe();
        tasks.push(tokio::spawn(async move {
            if let Err(e) = admin::serve(listener, state, admin_shutdown).await {
                tracing::error!(error = %e, "Admin API failed");
            }
        }));
    }

    wait_for_shutdown_signal().await;
    tracing::info!("Shutting down");
    shutdown.trigger();

    for group in &groups {
        group.stop().await;
    }
    for task in tasks {
        let _ = task.await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
