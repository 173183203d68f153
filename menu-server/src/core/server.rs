//! Server lifecycle
//!
//! Binds the HTTP listener, starts the idle-session sweeper and serves
//! until Ctrl-C.

use std::time::Duration;

use tokio::net::TcpListener;

use super::{AppState, Config, Result};
use crate::api;

/// How often idle menu sessions are swept
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub struct Server {
    config: Config,
    state: Option<AppState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: AppState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    fn spawn_session_sweeper(state: &AppState) {
        let sessions = state.menu_sessions.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                sessions.sweep_idle();
            }
        });
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => AppState::new(&self.config).await?,
        };

        Self::spawn_session_sweeper(&state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(
            %addr,
            environment = %self.config.environment,
            demo = state.is_demo(),
            "Menu server listening"
        );

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, api::build_app(state))
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
