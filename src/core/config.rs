use crate::core::analytics::clamp_projection_years;
use crate::core::currency::Currency;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_EXCHANGE_RATE_URL: &str = "https://api.exchangerate-api.com/v4";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
}

impl Default for ExchangeRateProviderConfig {
    fn default() -> Self {
        ExchangeRateProviderConfig {
            base_url: DEFAULT_EXCHANGE_RATE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub exchange_rate: ExchangeRateProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BudgetConfig {
    pub amount: f64,
    #[serde(default)]
    pub currency: Currency,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        BudgetConfig {
            amount: 500.0,
            currency: Currency::Usd,
        }
    }
}

fn default_projection_years() -> u32 {
    5
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Currency totals are displayed in.
    #[serde(default)]
    pub currency: Currency,
    #[serde(default = "default_projection_years")]
    pub projection_years: u32,
    #[serde(default)]
    pub budget: BudgetConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: Currency::default(),
            projection_years: default_projection_years(),
            budget: BudgetConfig::default(),
            providers: ProvidersConfig::default(),
            data_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "subcost", "subcost")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "subcost", "subcost")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.projection_years = clamp_projection_years(config.projection_years);
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
currency: EUR
projection_years: 10
budget:
  amount: 300
  currency: UAH
providers:
  exchange_rate:
    base_url: "http://example.com/rates"
data_path: /tmp/subcost
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, Currency::Eur);
        assert_eq!(config.projection_years, 10);
        assert_eq!(config.budget.amount, 300.0);
        assert_eq!(config.budget.currency, Currency::Uah);
        assert_eq!(
            config.providers.exchange_rate.base_url,
            "http://example.com/rates"
        );
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/subcost")
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("currency: USD").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.projection_years, 5);
        assert_eq!(config.budget.amount, 500.0);
        assert_eq!(
            config.providers.exchange_rate.base_url,
            DEFAULT_EXCHANGE_RATE_URL
        );
    }

    #[test]
    fn test_load_from_path_clamps_projection_years() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "currency: UAH\nprojection_years: 120").unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.currency, Currency::Uah);
        assert_eq!(config.projection_years, 50);
    }

    #[test]
    fn test_retired_keys_are_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "currency: EUR\nrates_cache_minutes: 18446744073709551615").unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.currency, Currency::Eur);
        assert_eq!(config.projection_years, 5);
    }

    #[test]
    fn test_unsupported_currency_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "currency: GBP").unwrap();

        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
