// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tokenpay.toml` > `~/.config/tokenpay/tokenpay.toml`
//! > `/etc/tokenpay/tokenpay.toml`, with environment variable overrides via
//! the `TOKENPAY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TokenpayConfig;

/// Config file name looked up in every directory of the hierarchy.
pub const CONFIG_FILE_NAME: &str = "tokenpay.toml";

/// System-wide config path.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/tokenpay/tokenpay.toml";

/// Unprefixed variable names kept for deployments that predate `TOKENPAY_*`.
const LEGACY_ENV_KEYS: [(&str, &str); 4] = [
    ("verifier_api_key", "verifier.api_key"),
    ("platform_owner_fullname", "defaults.platform_owner_full_name"),
    ("cbe_account_suffix", "defaults.cbe_account_suffix"),
    ("abyssinia_account_suffix", "defaults.abyssinia_account_suffix"),
];

/// Sections that `TOKENPAY_<SECTION>_<KEY>` variables map into.
const SECTIONS: [&str; 5] = ["server", "gateway", "storage", "verifier", "defaults"];

/// Secrets outside `[defaults]` that may legitimately be all digits.
const VERBATIM_KEYS: [&str; 2] = ["verifier.api_key", "gateway.bearer_token"];

/// Path of the per-user XDG config file, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tokenpay").join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tokenpay/tokenpay.toml` (system-wide)
/// 3. `~/.config/tokenpay/tokenpay.toml` (user XDG config)
/// 4. `./tokenpay.toml` (local directory)
/// 5. Legacy unprefixed variables (`VERIFIER_API_KEY`, `PLATFORM_OWNER_FULLNAME`, ...)
/// 6. `TOKENPAY_*` environment variables
pub fn load_config() -> Result<TokenpayConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TokenpayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TokenpayConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TokenpayConfig, figment::Error> {
    let figment = Figment::new()
        .merge(Serialized::defaults(TokenpayConfig::default()))
        .merge(Toml::file(path));
    merge_env(figment).extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    let figment = Figment::new()
        .merge(Serialized::defaults(TokenpayConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME));
    merge_env(figment)
}

/// Legacy variables first, then `TOKENPAY_*`, so prefixed names win.
fn merge_env(figment: Figment) -> Figment {
    let figment = merge_env_layer(figment, legacy_env_provider);
    merge_env_layer(figment, env_provider)
}

/// `Env` parses `54321` as an integer and `01234` as `1234`; account
/// suffixes, phone numbers and secrets must reach serde as the exact text.
fn merge_env_layer(figment: Figment, provider: fn() -> Env) -> Figment {
    let figment = figment.merge(provider().filter(|key| !is_verbatim_key(key.as_str())));
    provider()
        .iter()
        .filter(|(key, _)| is_verbatim_key(key.as_str()))
        .fold(figment, |figment, (key, value)| {
            figment.merge(Serialized::default(key.as_str(), value))
        })
}

fn is_verbatim_key(key: &str) -> bool {
    key.starts_with("defaults.") || VERBATIM_KEYS.contains(&key)
}

/// `TOKENPAY_*` variables, mapped section-first with `Env::map()`.
///
/// `Env::split("_")` would turn `TOKENPAY_VERIFIER_API_KEY` into
/// `verifier.api.key`; only the first segment names the section.
fn env_provider() -> Env {
    Env::prefixed("TOKENPAY_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key_str);
        mapped.into()
    })
}

fn legacy_env_provider() -> Env {
    let names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| *name == key_str)
            .map(|(_, path)| (*path).to_string())
            .unwrap_or(key_str)
            .into()
    })
}
