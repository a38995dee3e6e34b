use std::sync::Arc;

use tokio::net::TcpListener;

use mcat_catalog::CatalogService;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Model catalog HTTP server.
pub struct CatalogServer {
    config: ServerConfig,
}

impl CatalogServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open the configured storage and wire up the catalog service.
    pub fn build_service(&self) -> ServerResult<Arc<CatalogService>> {
        let blobs = self.config.storage.open(self.config.io_timeout())?;
        tracing::info!(storage = %blobs.describe(), "storage opened");
        Ok(Arc::new(CatalogService::with_blob_store(Arc::new(blobs))))
    }

    /// Build the router (useful for testing).
    pub fn router(&self, service: Arc<CatalogService>) -> axum::Router {
        let state = AppState::new(service, self.config.cache_max_age_secs);
        build_router(state, self.config.max_upload_bytes)
    }

    /// Prepare storage and serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let service = self.build_service()?;
        service.init().await?;
        let app = self.router(service);
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("model catalog listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        tracing::info!("model catalog stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    #[test]
    fn server_construction() {
        let server = CatalogServer::new(ServerConfig::default());
        assert_eq!(
            server.config().bind_addr,
            "0.0.0.0:3000".parse::<SocketAddr>().unwrap()
        );
    }

    #[tokio::test]
    async fn router_builds_over_memory_storage() {
        let server = CatalogServer::new(ServerConfig::ephemeral());
        let service = server.build_service().unwrap();
        service.init().await.unwrap();
        let _router = server.router(service);
    }
}
