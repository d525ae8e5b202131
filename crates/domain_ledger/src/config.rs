//! Ledger configuration

use core_kernel::Currency;
use serde::Deserialize;

/// Ledger engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Base (reporting) currency
    #[serde(default = "default_base_currency")]
    pub base_currency: Currency,
    /// Prefix for generated entry numbers
    #[serde(default = "default_entry_prefix")]
    pub entry_prefix: String,
}

fn default_base_currency() -> Currency {
    Currency::IDR
}

fn default_entry_prefix() -> String {
    "JE".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            entry_prefix: default_entry_prefix(),
        }
    }
}

impl LedgerConfig {
    /// Loads configuration from `LEDGER_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("LEDGER"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reporting_conventions() {
        let config = LedgerConfig::default();
        assert_eq!(config.base_currency, Currency::IDR);
        assert_eq!(config.entry_prefix, "JE");
    }
}
