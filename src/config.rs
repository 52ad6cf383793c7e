//! Table configuration, loadable from TOML.
//!
//! ```toml
//! num_players = 4
//! blind_amount = 10
//! denominations = [5, 25, 100]
//! seed = 7
//!
//! [chip_breakdown]
//! 5 = 40
//! 25 = 20
//! ```

use crate::chips::{Bank, ChipError, ChipStack};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Most seats one 52-card deck can deal a full hand to.
pub const MAX_PLAYERS: usize = 22;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub num_players: usize,
    /// Small blind; the big blind is twice this.
    pub blind_amount: u64,
    /// Chips each player starts with, denomination → count.
    pub chip_breakdown: BTreeMap<u64, u64>,
    /// Denominations the table can exchange chips into.
    pub denominations: Vec<u64>,
    /// Deck shuffle seed. A fresh random seed is used when absent.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            num_players: 3,
            blind_amount: 20,
            chip_breakdown: BTreeMap::from([(5, 100), (25, 40), (100, 20)]),
            denominations: vec![5, 25, 100],
            seed: None,
        }
    }
}

/// On-disk shape. TOML table keys are strings, so denominations are parsed
/// after deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    num_players: Option<usize>,
    blind_amount: Option<u64>,
    chip_breakdown: Option<BTreeMap<String, u64>>,
    denominations: Option<Vec<u64>>,
    seed: Option<u64>,
}

impl TableConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(s)?;
        let mut cfg = TableConfig::default();
        if let Some(v) = file.num_players {
            cfg.num_players = v;
        }
        if let Some(v) = file.blind_amount {
            cfg.blind_amount = v;
        }
        if let Some(raw) = file.chip_breakdown {
            cfg.chip_breakdown = raw
                .into_iter()
                .map(|(k, v)| {
                    k.trim()
                        .parse::<u64>()
                        .map(|d| (d, v))
                        .map_err(|_| ConfigError::Invalid(format!("bad denomination '{k}'")))
                })
                .collect::<Result<BTreeMap<u64, u64>, ConfigError>>()?;
        }
        if let Some(v) = file.denominations {
            cfg.denominations = v;
        }
        cfg.seed = file.seed;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("loading table config from {}", path.display());
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_PLAYERS).contains(&self.num_players) {
            return Err(ConfigError::Invalid(format!(
                "need 2 to {MAX_PLAYERS} players, got {}",
                self.num_players
            )));
        }
        if self.blind_amount == 0 {
            return Err(ConfigError::Invalid("blind_amount must be positive".into()));
        }
        if self.chip_breakdown.values().all(|&c| c == 0) {
            return Err(ConfigError::Invalid("chip_breakdown holds no chips".into()));
        }
        self.starting_stack().map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.denominations.is_empty() {
            return Err(ConfigError::Invalid("denominations must not be empty".into()));
        }
        self.bank().map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    pub fn starting_stack(&self) -> Result<ChipStack, ChipError> {
        ChipStack::from_counts(self.chip_breakdown.iter().map(|(&d, &c)| (d, c)))
    }

    pub fn bank(&self) -> Result<Bank, ChipError> {
        Bank::new(self.denominations.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = TableConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.starting_stack().unwrap().total(), 500 + 1000 + 2000);
    }

    #[test]
    fn partial_file_overrides_defaults() {
        let cfg = TableConfig::from_toml_str(
            r#"
            num_players = 4
            seed = 9

            [chip_breakdown]
            1 = 200
            "#,
        )
        .unwrap();
        assert_eq!(cfg.num_players, 4);
        assert_eq!(cfg.blind_amount, 20);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.chip_breakdown, BTreeMap::from([(1, 200)]));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            TableConfig::from_toml_str("num_players = 1"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TableConfig::from_toml_str("num_players = 23"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TableConfig::from_toml_str("blind_amount = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TableConfig::from_toml_str("denominations = [0, 5]"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TableConfig::from_toml_str("[chip_breakdown]\nfive = 3"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(TableConfig::from_toml_str("players = 3"), Err(ConfigError::Parse(_))));
    }
}
