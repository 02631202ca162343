// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered resolution of verification settings.
//!
//! Each [`ConfigField`] is resolved independently: the request override wins,
//! then the user's stored config, then the process-wide default. Blank
//! values never win.

use strum::Display;
use tokenpay_core::{ConfigField, Provider, UserVerificationConfig};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConfigSource {
    Request,
    Stored,
    Default,
}

/// The three layers a setting can come from.
#[derive(Debug, Clone, Copy)]
pub struct ConfigLayers<'a> {
    pub request: Option<&'a UserVerificationConfig>,
    pub stored: Option<&'a UserVerificationConfig>,
    pub defaults: &'a UserVerificationConfig,
}

impl<'a> ConfigLayers<'a> {
    fn ordered(&self) -> [(ConfigSource, Option<&'a UserVerificationConfig>); 3] {
        [
            (ConfigSource::Request, self.request),
            (ConfigSource::Stored, self.stored),
            (ConfigSource::Default, Some(self.defaults)),
        ]
    }

    /// First non-blank value for `field`, with its source.
    pub fn resolve_field(&self, field: ConfigField) -> Option<(&'a str, ConfigSource)> {
        self.ordered().into_iter().find_map(|(source, layer)| {
            layer
                .and_then(|config| field.get(config))
                .map(|value| (value, source))
        })
    }

    /// Resolves every field.
    pub fn resolve(&self) -> ResolvedConfig {
        let mut config = UserVerificationConfig::default();
        let mut sources = Vec::with_capacity(ConfigField::ALL.len());
        for field in ConfigField::ALL {
            if let Some((value, source)) = self.resolve_field(field) {
                field.set(&mut config, Some(value.to_string()));
                sources.push((field, source));
            }
        }
        ResolvedConfig { config, sources }
    }
}

/// Effective settings for one verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    config: UserVerificationConfig,
    sources: Vec<(ConfigField, ConfigSource)>,
}

impl ResolvedConfig {
    pub fn get(&self, field: ConfigField) -> Option<&str> {
        field.get(&self.config)
    }

    pub fn source(&self, field: ConfigField) -> Option<ConfigSource> {
        self.sources
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, source)| *source)
    }

    /// Expected Telebirr receiver name.
    pub fn expected_owner(&self) -> Option<&str> {
        self.get(ConfigField::PlatformOwnerFullName)
    }

    /// The suffix that scopes a bank lookup. `None` for Telebirr.
    pub fn suffix_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Telebirr => None,
            Provider::Cbe => self.get(ConfigField::CbeAccountSuffix),
            Provider::Abyssinia => self.get(ConfigField::AbyssiniaAccountSuffix),
        }
    }

    /// The full receiving account or number configured for `provider`.
    pub fn account_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Telebirr => self.get(ConfigField::TelebirrNumber),
            Provider::Cbe => self.get(ConfigField::CbeAccountNumber),
            Provider::Abyssinia => self.get(ConfigField::AbyssiniaAccountNumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(owner: Option<&str>, cbe: Option<&str>) -> UserVerificationConfig {
        UserVerificationConfig {
            platform_owner_full_name: owner.map(String::from),
            cbe_account_suffix: cbe.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn request_beats_stored_beats_default() {
        let request = config(Some("Request Owner"), None);
        let stored = config(Some("Stored Owner"), Some("11111111"));
        let defaults = config(Some("Default Owner"), Some("22222222"));
        let layers = ConfigLayers {
            request: Some(&request),
            stored: Some(&stored),
            defaults: &defaults,
        };

        let resolved = layers.resolve();
        assert_eq!(resolved.expected_owner(), Some("Request Owner"));
        assert_eq!(resolved.source(ConfigField::PlatformOwnerFullName), Some(ConfigSource::Request));
        assert_eq!(resolved.suffix_for(Provider::Cbe), Some("11111111"));
        assert_eq!(resolved.source(ConfigField::CbeAccountSuffix), Some(ConfigSource::Stored));
    }

    #[test]
    fn falls_through_to_default() {
        let defaults = config(Some("Default Owner"), Some("22222222"));
        let layers = ConfigLayers {
            request: None,
            stored: None,
            defaults: &defaults,
        };
        assert_eq!(
            layers.resolve_field(ConfigField::CbeAccountSuffix),
            Some(("22222222", ConfigSource::Default))
        );
    }

    #[test]
    fn blank_values_fall_through() {
        let request = config(Some("   "), None);
        let stored = config(Some(""), None);
        let defaults = config(Some("Default Owner"), None);
        let layers = ConfigLayers {
            request: Some(&request),
            stored: Some(&stored),
            defaults: &defaults,
        };
        assert_eq!(layers.resolve().expected_owner(), Some("Default Owner"));
    }

    #[test]
    fn absent_everywhere_is_none() {
        let defaults = UserVerificationConfig::default();
        let resolved = ConfigLayers {
            request: None,
            stored: None,
            defaults: &defaults,
        }
        .resolve();
        for field in ConfigField::ALL {
            assert_eq!(resolved.get(field), None);
            assert_eq!(resolved.source(field), None);
        }
        assert_eq!(resolved.suffix_for(Provider::Abyssinia), None);
    }

    #[test]
    fn telebirr_has_no_suffix() {
        let stored = config(None, Some("11111111"));
        let defaults = UserVerificationConfig::default();
        let resolved = ConfigLayers {
            request: None,
            stored: Some(&stored),
            defaults: &defaults,
        }
        .resolve();
        assert_eq!(resolved.suffix_for(Provider::Telebirr), None);
    }
}
