// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Tokenpay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use tokenpay_core::UserVerificationConfig;

/// Placeholder printed instead of secret values.
pub const REDACTED: &str = "[redacted]";

/// Top-level Tokenpay configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenpayConfig {
    /// Process-level settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Receipt-lookup API settings.
    #[serde(default)]
    pub verifier: VerifierConfig,

    /// Process-wide fallbacks for per-user verification settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl TokenpayConfig {
    /// Copy of the config with secrets replaced, for printing.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.gateway.bearer_token.is_some() {
            config.gateway.bearer_token = Some(REDACTED.to_string());
        }
        if config.verifier.api_key.is_some() {
            config.verifier.api_key = Some(REDACTED.to_string());
        }
        config
    }
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared secret the identity-aware upstream presents. `None` disables
    /// every user-scoped route.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Maximum number of requests handled at once.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_concurrent_requests() -> usize {
    256
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("tokenpay").join("tokenpay.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("tokenpay.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Receipt-lookup API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VerifierConfig {
    /// Base URL of the lookup API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as `x-api-key`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8088".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

/// Process-wide fallbacks, consulted after the request override and the
/// user's stored config.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub platform_owner_full_name: Option<String>,
    #[serde(default)]
    pub cbe_account_suffix: Option<String>,
    #[serde(default)]
    pub abyssinia_account_suffix: Option<String>,
    #[serde(default)]
    pub telebirr_number: Option<String>,
    #[serde(default)]
    pub cbe_account_number: Option<String>,
    #[serde(default)]
    pub abyssinia_account_number: Option<String>,
}

impl DefaultsConfig {
    /// The defaults in the shape the purchase flow resolves against.
    pub fn to_user_config(&self) -> UserVerificationConfig {
        UserVerificationConfig {
            platform_owner_full_name: self.platform_owner_full_name.clone(),
            cbe_account_suffix: self.cbe_account_suffix.clone(),
            abyssinia_account_suffix: self.abyssinia_account_suffix.clone(),
            telebirr_number: self.telebirr_number.clone(),
            cbe_account_number: self.cbe_account_number.clone(),
            abyssinia_account_number: self.abyssinia_account_number.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = TokenpayConfig::default();
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.gateway.port, 3000);
        assert!(config.gateway.bearer_token.is_none());
        assert_eq!(config.verifier.timeout_secs, 20);
        assert!(config.storage.database_path.ends_with("tokenpay.db"));
        assert!(config.defaults.platform_owner_full_name.is_none());
    }

    #[test]
    fn redacted_hides_secrets_only() {
        let mut config = TokenpayConfig::default();
        config.gateway.bearer_token = Some("gw-secret".into());
        config.verifier.api_key = Some("vk-secret".into());
        let redacted = config.redacted();
        assert_eq!(redacted.gateway.bearer_token.as_deref(), Some(REDACTED));
        assert_eq!(redacted.verifier.api_key.as_deref(), Some(REDACTED));
        assert_eq!(redacted.verifier.base_url, config.verifier.base_url);

        let plain = TokenpayConfig::default().redacted();
        assert!(plain.verifier.api_key.is_none());
    }

    #[test]
    fn defaults_convert_to_user_config() {
        let defaults = DefaultsConfig {
            platform_owner_full_name: Some("Abebe Kebede".into()),
            cbe_account_suffix: Some("12345678".into()),
            ..Default::default()
        };
        let user = defaults.to_user_config();
        assert_eq!(user.platform_owner_full_name.as_deref(), Some("Abebe Kebede"));
        assert_eq!(user.cbe_account_suffix.as_deref(), Some("12345678"));
        assert!(user.telebirr_number.is_none());
    }
}
