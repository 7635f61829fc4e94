mod command;
mod runtime;

#[cfg(test)]
mod tests;

use command::CommandDispatcher;
use orders_shared::transport::RedisConnector;
use runtime::{SubscriberConfig, SubscriberRuntime};

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = SubscriberConfig::from_env()?;

    info!("Subscriber starting: {}", config.subscriber_id);
    info!("  Profile: {}", config.profile);
    info!("  Broker: {}", config.redis_url);
    info!("  Reconnect: {:?}", config.reconnect);

    let table = config.profile.dispatch_table()?;
    info!("  Commands: {}", table.commands().join(", "));
    let dispatcher = CommandDispatcher::new(config.subscriber_id.clone(), table);

    let connector = RedisConnector::new(config.redis_url.clone());
    let mut runtime = SubscriberRuntime::new(config, connector, dispatcher);

    match runtime.run_until(shutdown_signal()).await {
        Ok(stats) => {
            info!(
                "Subscriber {} exiting after {} messages",
                runtime.subscriber_id(),
                stats.received
            );
            Ok(())
        }
        Err(e) => {
            error!(
                "Subscriber {} stopped ({:?}): {}",
                runtime.subscriber_id(),
                runtime.state(),
                e
            );
            Err(e.into())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
