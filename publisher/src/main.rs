use orders_publisher::{ingress, Publisher, PublisherConfig};
use orders_shared::transport::RedisConnector;
use orders_shared::TransportConnector;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = PublisherConfig::from_env()?;

    let connector = RedisConnector::new(&config.redis_url);
    let conn = connector.connect().await.map_err(|e| {
        error!("Could not reach broker at {}: {}", config.redis_url, e);
        e
    })?;
    let publisher = Arc::new(Publisher::new(conn, &config.topic));

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        "Publisher listening on {} (topic '{}' via {})",
        config.bind_addr,
        config.topic,
        connector.name()
    );

    axum::serve(listener, ingress::router(publisher.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Ok(publisher) = Arc::try_unwrap(publisher) {
        publisher.close();
    }
    info!("Publisher stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
