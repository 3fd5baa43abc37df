use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    currency::{CurrencyCode, LocaleConfig},
    dealership::DEFAULT_NEAR_COUNT,
    domain::ClientProfile,
    errors::{BookingError, Result},
    pricing::PricingPolicy,
    utils::persistence::{load_json, save_json},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Any unpriceable vehicle makes the booking total unavailable.
    pub strict_pricing: bool,
    pub near_dealership_count: usize,
    pub ui_color_enabled: bool,
    /// Account that pre-seeds new bookings; the demo account when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_profile: Option<ClientProfile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "es-AR".into(),
            currency: "ARS".into(),
            strict_pricing: false,
            near_dealership_count: DEFAULT_NEAR_COUNT,
            ui_color_enabled: true,
            client_profile: None,
        }
    }
}

impl Config {
    pub fn pricing_policy(&self) -> PricingPolicy {
        if self.strict_pricing {
            PricingPolicy::Strict
        } else {
            PricingPolicy::Lenient
        }
    }

    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig::from_tag(&self.locale)
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(&self.currency)
    }

    pub fn profile(&self) -> ClientProfile {
        self.client_profile
            .clone()
            .unwrap_or_else(ClientProfile::sample)
    }

    /// Applies a `config set <key> <value>` style update.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key.trim() {
            "locale" => self.locale = value.to_string(),
            "currency" => self.currency = value.to_uppercase(),
            "strict_pricing" => self.strict_pricing = parse_flag(key, value)?,
            "ui_color_enabled" => self.ui_color_enabled = parse_flag(key, value)?,
            "near_dealership_count" => {
                self.near_dealership_count = value.parse().map_err(|_| {
                    BookingError::ConfigError(format!("`{value}` is not a whole number"))
                })?
            }
            other => {
                return Err(BookingError::ConfigError(format!(
                    "unknown setting `{other}`"
                )))
            }
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(BookingError::ConfigError(format!(
            "`{key}` expects on/off, got `{value}`"
        ))),
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Reads the config file, falling back to defaults when it is missing.
    pub fn load(&self) -> Result<Config> {
        load_json(&self.path)
            .map(Option::unwrap_or_default)
            .map_err(|err| BookingError::ConfigError(err.to_string()))
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        save_json(config, &self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.pricing_policy(), PricingPolicy::Lenient);
        assert_eq!(config.profile(), ClientProfile::sample());
    }

    #[test]
    fn saved_settings_are_reloaded() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set("strict_pricing", "on").unwrap();
        config.set("near_dealership_count", "2").unwrap();
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.pricing_policy(), PricingPolicy::Strict);
        assert_eq!(loaded.near_dealership_count, 2);
        assert!(manager.path().ends_with("config/config.json"));
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        std::fs::create_dir_all(manager.path().parent().unwrap()).unwrap();
        std::fs::write(manager.path(), r#"{"locale":"en-US"}"#).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.locale, "en-US");
        assert_eq!(loaded.currency, "ARS");
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("strict_pricing", "maybe"),
            Err(BookingError::ConfigError(_))
        ));
        assert!(matches!(
            config.set("theme", "dark"),
            Err(BookingError::ConfigError(_))
        ));
    }
}
