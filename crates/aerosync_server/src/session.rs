//! Per-request session contract.

use crate::config::ServerConfig;

/// Identity and negotiated parameters for one request.
///
/// The transport layer extracts these from the request's out-of-band
/// parameters (query string or headers); the server only consumes the
/// parsed form. The protocol version is capped to the supported set at
/// construction, so downstream code never sees an unimplemented version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// Client device identifier; scopes all sync state.
    pub device_id: String,
    /// Negotiated protocol version.
    pub protocol_version: &'static str,
    /// Policy key previously issued to this device, echoed back.
    pub policy_key: Option<String>,
}

impl SessionInfo {
    /// Creates a session, negotiating the protocol version against the
    /// server's supported set.
    pub fn new(config: &ServerConfig, device_id: impl Into<String>, requested_version: &str) -> Self {
        Self {
            device_id: device_id.into(),
            protocol_version: config.negotiate_version(requested_version),
            policy_key: None,
        }
    }

    /// Attaches the device's policy key.
    pub fn with_policy_key(mut self, policy_key: impl Into<String>) -> Self {
        self.policy_key = Some(policy_key.into());
        self
    }
}
