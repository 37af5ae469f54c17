mod config;
mod handle;
mod server;

use anyhow::Result;
use config::ServerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swimmers_server=info,sim=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    tracing::info!("Starting swimmers server");
    tracing::info!(
        "Population {}, mutation rate {}, elitism bias {}, tick every {:?}",
        config.simulation.population,
        config.simulation.mutation_rate,
        config.simulation.elitism_bias,
        config.tick_interval
    );

    server::run(config).await
}
