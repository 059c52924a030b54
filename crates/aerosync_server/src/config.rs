//! Server configuration.

use aerosync_engine::EngineConfig;
use std::time::Duration;

/// Protocol versions this server implements.
pub const SUPPORTED_VERSIONS: &[&str] = &["14.1", "16.0", "16.1"];

/// Configuration for the sync server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Shortest long-poll heartbeat a client may request.
    pub heartbeat_min: Duration,
    /// Longest long-poll heartbeat a client may request.
    pub heartbeat_max: Duration,
    /// Heartbeat used when the client does not request one.
    pub default_heartbeat: Duration,
    /// Engine limits passed through to the coordinator.
    pub engine: EngineConfig,
}

impl ServerConfig {
    /// Creates a configuration with the default limits.
    pub fn new() -> Self {
        Self {
            heartbeat_min: Duration::from_secs(60),
            heartbeat_max: Duration::from_secs(3540),
            default_heartbeat: Duration::from_secs(300),
            engine: EngineConfig::default(),
        }
    }

    /// Sets the allowed heartbeat range.
    pub fn with_heartbeat_bounds(mut self, min: Duration, max: Duration) -> Self {
        self.heartbeat_min = min;
        self.heartbeat_max = max;
        self
    }

    /// Sets the default heartbeat.
    pub fn with_default_heartbeat(mut self, heartbeat: Duration) -> Self {
        self.default_heartbeat = heartbeat;
        self
    }

    /// Sets the engine limits.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Caps a client-advertised protocol version to the supported set.
    ///
    /// Unknown or newer versions fall back to the highest version this
    /// server implements.
    pub fn negotiate_version(&self, requested: &str) -> &'static str {
        SUPPORTED_VERSIONS
            .iter()
            .find(|v| **v == requested)
            .copied()
            .unwrap_or_else(|| {
                // SUPPORTED_VERSIONS is a non-empty constant.
                SUPPORTED_VERSIONS[SUPPORTED_VERSIONS.len() - 1]
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}
