// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes:
//! bind addresses, URL schemes, timeout bounds, and the formats of the
//! process-wide verification defaults.

use tokenpay_core::ConfigField;

use crate::diagnostic::ConfigError;
use crate::model::TokenpayConfig;

/// Accepted range for `verifier.timeout_secs`.
pub const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 1..=120;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &TokenpayConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let level = config.server.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "server.log_level `{}` must be one of {}",
            config.server.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        fail("gateway.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.gateway.max_concurrent_requests == 0 {
        fail("gateway.max_concurrent_requests must be at least 1".to_string());
    }

    if let Some(token) = &config.gateway.bearer_token
        && token.trim().is_empty()
    {
        fail("gateway.bearer_token must not be blank when set".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let base_url = config.verifier.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "verifier.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if !TIMEOUT_RANGE_SECS.contains(&config.verifier.timeout_secs) {
        fail(format!(
            "verifier.timeout_secs must be between {} and {}, got {}",
            TIMEOUT_RANGE_SECS.start(),
            TIMEOUT_RANGE_SECS.end(),
            config.verifier.timeout_secs
        ));
    }

    let defaults = config.defaults.to_user_config();
    for field in ConfigField::ALL {
        if let Some(value) = field.get(&defaults)
            && let Err(hint) = field.validate(value)
        {
            fail(format!("defaults.{}: {hint}", defaults_key(field)));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The snake_case TOML key for a field in the `[defaults]` section.
fn defaults_key(field: ConfigField) -> &'static str {
    match field {
        ConfigField::PlatformOwnerFullName => "platform_owner_full_name",
        ConfigField::CbeAccountSuffix => "cbe_account_suffix",
        ConfigField::AbyssiniaAccountSuffix => "abyssinia_account_suffix",
        ConfigField::TelebirrNumber => "telebirr_number",
        ConfigField::CbeAccountNumber => "cbe_account_number",
        ConfigField::AbyssiniaAccountNumber => "abyssinia_account_number",
    }
}
