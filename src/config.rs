//! Run configuration loaded from a TOML file.
//!
//! ```toml
//! [output]
//! dialect = "html"
//! brackets = "round"
//!
//! [[pointer_tables]]
//! offset = 0x1F00
//! count = 4
//! ```

use crate::entry_points::PointerTable;
use crate::error::ConfigError;
use crate::listing::{Brackets, Dialect, Markup};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dialect: Markup,
    pub brackets: Brackets,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output: OutputConfig,
    pub pointer_tables: Vec<PointerTable>,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        debug!(
            "Loaded {} with {} pointer tables",
            path.display(),
            config.pointer_tables.len()
        );
        Ok(config)
    }

    pub fn dialect(&self) -> Dialect {
        Dialect {
            markup: self.output.dialect,
            brackets: self.output.brackets,
        }
    }
}

impl FromStr for Markup {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "text" => Ok(Markup::Text),
            "html" => Ok(Markup::Html),
            _ => Err(ConfigError::UnknownDialect(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.dialect(), Dialect::text());
        assert!(config.pointer_tables.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            [output]
            dialect = "html"
            brackets = "round"

            [[pointer_tables]]
            offset = 0x1F00
            count = 4

            [[pointer_tables]]
            offset = 16
            count = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.output.dialect, Markup::Html);
        assert_eq!(config.output.brackets, Brackets::Round);
        assert_eq!(
            config.pointer_tables,
            vec![PointerTable::new(0x1F00, 4), PointerTable::new(16, 1)]
        );
    }

    #[test]
    fn test_rejects_unknown_keys_and_dialects() {
        assert!(matches!(
            Config::from_toml("[output]\ndialect = \"pdf\"\n"),
            Err(ConfigError::Toml(_))
        ));
        assert!(Config::from_toml("colour = true\n").is_err());
    }

    #[test]
    fn test_markup_from_str() {
        assert_eq!("HTML".parse::<Markup>().unwrap(), Markup::Html);
        assert_eq!("text".parse::<Markup>().unwrap(), Markup::Text);
        assert!(matches!(
            "pdf".parse::<Markup>(),
            Err(ConfigError::UnknownDialect(_))
        ));
    }
}
