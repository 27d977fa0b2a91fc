//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Start the metrics exporter when enabled
//! - Open (hydrate) the record store
//! - Bind the listener and serve until shutdown

use std::net::SocketAddr;

use metrics_exporter_prometheus::BuildError;
use tokio::net::TcpListener;

use super::shutdown::Shutdown;
use crate::config::{validate_config, ConfigError, ServerConfig, ValidationError};
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::store::{Database, StoreError};
use crate::tasks::COLLECTION;

/// Errors that stop the server from starting (or keep it from serving).
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Start the server described by `config` and serve until `shutdown` fires.
pub async fn run(config: ServerConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    let shutdown_rx = shutdown.subscribe();
    validate_config(&config).map_err(ConfigError::Validation)?;

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| {
                ConfigError::Validation(vec![ValidationError::MetricsAddress(
                    config.observability.metrics_address.clone(),
                )])
            })?;
        metrics::init_metrics(addr)?;
    }

    // Opening the store records its size gauge, so the recorder must already be installed.
    let database = Database::open(&config.storage.path)?;
    tracing::info!(
        path = %config.storage.path,
        tasks = database.len(COLLECTION),
        "Store opened"
    );

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    tracing::info!(
        address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_bytes = config.limits.max_body_bytes,
        "Listening for connections"
    );

    let server = HttpServer::new(config, database);
    server
        .run(listener, shutdown_rx)
        .await
        .map_err(StartupError::Serve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_config_fails_fast() {
        let mut config = ServerConfig::default();
        config.timeouts.request_secs = 0;

        let err = run(config, Shutdown::new()).await.unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Validation(_))));
    }

    #[tokio::test]
    async fn test_corrupt_store_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "not json").unwrap();

        let mut config = ServerConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.storage.path = path.display().to_string();

        let err = run(config, Shutdown::new()).await.unwrap_err();
        assert!(matches!(err, StartupError::Store(StoreError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ServerConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.storage.path = dir.path().join("db.json").display().to_string();

        let shutdown = Shutdown::new();
        let trigger = shutdown.clone();
        let server = tokio::spawn(run(config, shutdown));

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        trigger.trigger();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), server)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_store_gauge_reaches_metrics_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(
            &path,
            r#"{"tasks":[{"id":"a","title":"t","description":"d"}]}"#,
        )
        .unwrap();

        let metrics_addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let mut config = ServerConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.storage.path = path.display().to_string();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = metrics_addr.to_string();

        let shutdown = Shutdown::new();
        let server = tokio::spawn(run(config, shutdown.clone()));

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let mut scraped = String::new();
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            if let Ok(resp) = client.get(format!("http://{metrics_addr}/metrics")).send().await {
                scraped = resp.text().await.unwrap_or_default();
                break;
            }
        }

        shutdown.trigger();
        let _ = tokio::time::timeout(std::time::Duration::from_secs(5), server).await;

        // No request has mutated the store, so the gauge comes from hydration.
        assert!(
            scraped.contains(r#"tasks_store_records{collection="tasks"} 1"#),
            "scrape output: {scraped}"
        );
    }
}
