// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The enumerated set of verification settings and their formats.
//!
//! The same six fields appear in three places: the per-request override, the
//! per-user stored config, and the process-wide defaults. Naming them once
//! lets resolution and validation iterate over them instead of repeating
//! per-field logic.

use std::sync::LazyLock;

use regex::Regex;
use strum::Display;

use crate::types::UserVerificationConfig;

static CBE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{8}$").unwrap());
static ABYSSINIA_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{5}$").unwrap());
static TELEBIRR_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^251\d{9}$").unwrap());
static CBE_ACCOUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{13}$").unwrap());
static ABYSSINIA_ACCOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{11,16}$").unwrap());

const OWNER_NAME_MIN: usize = 3;
const OWNER_NAME_MAX: usize = 100;

/// One verification setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "camelCase")]
pub enum ConfigField {
    PlatformOwnerFullName,
    CbeAccountSuffix,
    AbyssiniaAccountSuffix,
    TelebirrNumber,
    CbeAccountNumber,
    AbyssiniaAccountNumber,
}

impl ConfigField {
    pub const ALL: [ConfigField; 6] = [
        ConfigField::PlatformOwnerFullName,
        ConfigField::CbeAccountSuffix,
        ConfigField::AbyssiniaAccountSuffix,
        ConfigField::TelebirrNumber,
        ConfigField::CbeAccountNumber,
        ConfigField::AbyssiniaAccountNumber,
    ];

    /// Reads this field from a config, treating blank values as absent.
    pub fn get<'a>(&self, config: &'a UserVerificationConfig) -> Option<&'a str> {
        let value = match self {
            ConfigField::PlatformOwnerFullName => &config.platform_owner_full_name,
            ConfigField::CbeAccountSuffix => &config.cbe_account_suffix,
            ConfigField::AbyssiniaAccountSuffix => &config.abyssinia_account_suffix,
            ConfigField::TelebirrNumber => &config.telebirr_number,
            ConfigField::CbeAccountNumber => &config.cbe_account_number,
            ConfigField::AbyssiniaAccountNumber => &config.abyssinia_account_number,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Writes this field on a config.
    pub fn set(&self, config: &mut UserVerificationConfig, value: Option<String>) {
        let slot = match self {
            ConfigField::PlatformOwnerFullName => &mut config.platform_owner_full_name,
            ConfigField::CbeAccountSuffix => &mut config.cbe_account_suffix,
            ConfigField::AbyssiniaAccountSuffix => &mut config.abyssinia_account_suffix,
            ConfigField::TelebirrNumber => &mut config.telebirr_number,
            ConfigField::CbeAccountNumber => &mut config.cbe_account_number,
            ConfigField::AbyssiniaAccountNumber => &mut config.abyssinia_account_number,
        };
        *slot = value;
    }

    /// Checks a (trimmed) value against this field's format.
    pub fn validate(&self, value: &str) -> Result<(), String> {
        let value = value.trim();
        let ok = match self {
            ConfigField::PlatformOwnerFullName => {
                let len = value.chars().count();
                (OWNER_NAME_MIN..=OWNER_NAME_MAX).contains(&len)
            }
            ConfigField::CbeAccountSuffix => CBE_SUFFIX.is_match(value),
            ConfigField::AbyssiniaAccountSuffix => ABYSSINIA_SUFFIX.is_match(value),
            ConfigField::TelebirrNumber => TELEBIRR_NUMBER.is_match(value),
            ConfigField::CbeAccountNumber => CBE_ACCOUNT.is_match(value),
            ConfigField::AbyssiniaAccountNumber => ABYSSINIA_ACCOUNT.is_match(value),
        };
        if ok { Ok(()) } else { Err(self.format_hint()) }
    }

    fn format_hint(&self) -> String {
        match self {
            ConfigField::PlatformOwnerFullName => format!(
                "Platform owner name must be {OWNER_NAME_MIN}-{OWNER_NAME_MAX} characters"
            ),
            ConfigField::CbeAccountSuffix => "CBE suffix must be 8 digits".to_string(),
            ConfigField::AbyssiniaAccountSuffix => {
                "Abyssinia suffix must be 5 digits".to_string()
            }
            ConfigField::TelebirrNumber => {
                "Telebirr number must start with 251 and be 12 digits".to_string()
            }
            ConfigField::CbeAccountNumber => "CBE account must be 13 digits".to_string(),
            ConfigField::AbyssiniaAccountNumber => {
                "Abyssinia account must be 11-16 digits".to_string()
            }
        }
    }
}

/// Validates every present field of `config`, collecting all failures.
pub fn validate_user_config(config: &UserVerificationConfig) -> Result<(), Vec<String>> {
    let errors: Vec<String> = ConfigField::ALL
        .iter()
        .filter_map(|field| {
            field
                .get(config)
                .and_then(|value| field.validate(value).err())
                .map(|hint| format!("{field}: {hint}"))
        })
        .collect();
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_are_camel_case() {
        assert_eq!(ConfigField::PlatformOwnerFullName.to_string(), "platformOwnerFullName");
        assert_eq!(ConfigField::CbeAccountSuffix.to_string(), "cbeAccountSuffix");
    }

    #[test]
    fn blank_values_read_as_absent() {
        let config = UserVerificationConfig {
            platform_owner_full_name: Some("   ".into()),
            cbe_account_suffix: Some(" 12345678 ".into()),
            ..Default::default()
        };
        assert_eq!(ConfigField::PlatformOwnerFullName.get(&config), None);
        assert_eq!(ConfigField::CbeAccountSuffix.get(&config), Some("12345678"));
        assert_eq!(ConfigField::TelebirrNumber.get(&config), None);
    }

    #[test]
    fn set_then_get() {
        let mut config = UserVerificationConfig::default();
        for field in ConfigField::ALL {
            field.set(&mut config, Some(format!("{field}-value")));
        }
        for field in ConfigField::ALL {
            assert_eq!(field.get(&config), Some(format!("{field}-value").as_str()));
        }
    }

    #[test]
    fn suffix_formats() {
        assert!(ConfigField::CbeAccountSuffix.validate("12345678").is_ok());
        assert!(ConfigField::CbeAccountSuffix.validate("1234567").is_err());
        assert!(ConfigField::CbeAccountSuffix.validate("1234567a").is_err());
        assert!(ConfigField::AbyssiniaAccountSuffix.validate("12345").is_ok());
        assert!(ConfigField::AbyssiniaAccountSuffix.validate("123456").is_err());
    }

    #[test]
    fn account_formats() {
        assert!(ConfigField::TelebirrNumber.validate("251912344243").is_ok());
        assert!(ConfigField::TelebirrNumber.validate("0912344243").is_err());
        assert!(ConfigField::TelebirrNumber.validate("2519123442431").is_err());
        assert!(ConfigField::CbeAccountNumber.validate("1000123456789").is_ok());
        assert!(ConfigField::CbeAccountNumber.validate("100012345678").is_err());
        assert!(ConfigField::AbyssiniaAccountNumber.validate("12345678901").is_ok());
        assert!(ConfigField::AbyssiniaAccountNumber.validate("1234567890123456").is_ok());
        assert!(ConfigField::AbyssiniaAccountNumber.validate("1234567890").is_err());
    }

    #[test]
    fn owner_name_length_is_bounded() {
        assert!(ConfigField::PlatformOwnerFullName.validate("Al").is_err());
        assert!(ConfigField::PlatformOwnerFullName.validate("  Abebe Kebede  ").is_ok());
        let long = "a".repeat(101);
        assert!(ConfigField::PlatformOwnerFullName.validate(&long).is_err());
    }

    #[test]
    fn validate_user_config_collects_every_failure() {
        let config = UserVerificationConfig {
            cbe_account_suffix: Some("123".into()),
            telebirr_number: Some("0911".into()),
            abyssinia_account_suffix: Some("12345".into()),
            ..Default::default()
        };
        let errors = validate_user_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("cbeAccountSuffix"));
        assert!(errors[1].contains("Telebirr number"));
    }
}
