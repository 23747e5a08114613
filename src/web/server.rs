//! HTTP server for SOOON.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::db::RefreshTokenRepository;
use crate::{Database, Result, SooonError};

use super::handlers::AppState;
use super::middleware::JwtState;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: Vec<String>,
    timezone: String,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, db: Database) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| SooonError::Config(format!("invalid server address: {e}")))?;

        let jwt_state = Arc::new(JwtState::new(&config.web.jwt_secret));
        let app_state = AppState::new(db, jwt_state.clone(), &config.web);

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            jwt_state,
            cors_origins: config.web.cors_origins.clone(),
            timezone: config.server.timezone.clone(),
        })
    }

    /// Get the configured address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Bind the listener and serve until the process exits.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        self.serve(listener).await
    }

    /// Bind, then serve in a background task and return the bound address.
    ///
    /// Useful for tests that bind to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = self.serve(listener).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }

    async fn serve(self, listener: TcpListener) -> Result<()> {
        let mut conn = self.app_state.db.pool().acquire().await?;
        let removed = RefreshTokenRepository::new(&mut conn)
            .cleanup_expired()
            .await?;
        drop(conn);
        if removed > 0 {
            tracing::info!(deleted_count = removed, "Removed stale refresh tokens");
        }

        let router = create_router(
            self.app_state,
            self.jwt_state,
            &self.cors_origins,
            &self.timezone,
        )
        .layer(CompressionLayer::new());

        tracing::info!("Web server listening on http://{}", listener.local_addr()?);
        axum::serve(listener, router).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.web.jwt_secret = "test-secret-key".to_string();
        config
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let db = Database::open_in_memory().await.unwrap();
        let server = WebServer::new(&test_config(), db).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let db = Database::open_in_memory().await.unwrap();
        let mut config = test_config();
        config.server.host = "not an address".to_string();
        assert!(matches!(
            WebServer::new(&config, db),
            Err(SooonError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_run_with_addr_binds() {
        let db = Database::open_in_memory().await.unwrap();
        let server = WebServer::new(&test_config(), db).unwrap();
        let addr = server.run_with_addr().await.unwrap();
        assert_ne!(addr.port(), 0);
    }
}
