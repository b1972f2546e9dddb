use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::live::{GeminiConnector, LiveConfig, SharedConnector};

/// Process-wide state shared by every request.
///
/// Built once during bootstrap and never mutated afterwards. Connections only
/// read from it, so no locking is involved.
pub struct AppState {
    pub config: ServerConfig,
    /// Readiness gate and session factory
    pub connector: SharedConnector,
    /// Session configuration used by every conversation
    pub live_config: LiveConfig,
}

impl AppState {
    /// Build the state with the Gemini Live connector derived from `config`.
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let connector: SharedConnector = Arc::new(GeminiConnector::from_config(&config));
        Self::with_connector(config, connector)
    }

    /// Build the state around an explicit connector.
    pub fn with_connector(config: ServerConfig, connector: SharedConnector) -> Arc<Self> {
        let live_config = LiveConfig::conversation(&config.live_model, &config.live_voice);

        tracing::info!(
            provider = connector.provider_name(),
            ready = connector.is_ready(),
            model = %live_config.model,
            "Live session gate initialized"
        );

        Arc::new(Self {
            config,
            connector,
            live_config,
        })
    }

    /// Whether an upstream session capability is configured.
    pub fn live_session_configured(&self) -> bool {
        self.connector.is_ready()
    }
}
