//! Run configuration: CLI flags layered over an optional TOML file.
//!
//! CLI flags always win. A `--config` file only fills in values the user
//! didn't pass on the command line — it never overrides an explicit flag.

use std::path::Path;

use serde::Deserialize;

use crate::currency::CurrencyTable;
use crate::diagnostics::MatchError;
use crate::resolver::ResolverConfig;

/// Shape of an optional `--config` TOML file. Every field is optional; CLI
/// flags take precedence when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub disambiguate_k: Option<f64>,
    pub prune_k: Option<f64>,
    #[serde(default)]
    pub currencies: std::collections::HashMap<String, f64>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, MatchError> {
        let text = std::fs::read_to_string(path).map_err(|source| MatchError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| MatchError::Config {
            path: path.display().to_string(),
            source,
        })
    }
}

/// The fully-resolved run configuration, after layering CLI flags over an
/// optional config file's defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub resolver: ResolverConfig,
    pub currencies: CurrencyTable,
}

impl ResolvedConfig {
    pub fn resolve(
        file: Option<ConfigFile>,
        cli_disambiguate_k: Option<f64>,
        cli_prune_k: Option<f64>,
    ) -> Self {
        let file = file.unwrap_or_default();

        let defaults = ResolverConfig::default();
        let resolver = ResolverConfig {
            disambiguate_k: cli_disambiguate_k
                .or(file.disambiguate_k)
                .unwrap_or(defaults.disambiguate_k),
            prune_k: cli_prune_k.or(file.prune_k).unwrap_or(defaults.prune_k),
        };

        let mut currencies = CurrencyTable::default();
        currencies.extend(file.currencies);

        Self { resolver, currencies }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flag_overrides_config_file_value() {
        let file = ConfigFile {
            disambiguate_k: Some(2.0),
            prune_k: None,
            currencies: Default::default(),
        };
        let resolved = ResolvedConfig::resolve(Some(file), Some(1.5), None);
        assert_eq!(resolved.resolver.disambiguate_k, 1.5);
    }

    #[test]
    fn config_file_fills_in_when_cli_flag_absent() {
        let file = ConfigFile {
            disambiguate_k: Some(2.0),
            prune_k: Some(9.0),
            currencies: Default::default(),
        };
        let resolved = ResolvedConfig::resolve(Some(file), None, None);
        assert_eq!(resolved.resolver.disambiguate_k, 2.0);
        assert_eq!(resolved.resolver.prune_k, 9.0);
    }

    #[test]
    fn no_file_or_flags_uses_builtin_defaults() {
        let resolved = ResolvedConfig::resolve(None, None, None);
        assert_eq!(resolved.resolver.disambiguate_k, 1.5);
        assert_eq!(resolved.resolver.prune_k, 7.0);
    }

    #[test]
    fn config_file_currency_override_applies() {
        let mut currencies = std::collections::HashMap::new();
        currencies.insert("btc".to_string(), 50000.0);
        let file = ConfigFile {
            disambiguate_k: None,
            prune_k: None,
            currencies,
        };
        let resolved = ResolvedConfig::resolve(Some(file), None, None);
        assert_eq!(resolved.currencies.rate("btc"), Some(50000.0));
    }
}
