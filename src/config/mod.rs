use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    errors::MarketError,
    utils::{ensure_dir, write_atomic, PathResolver},
};

/// Currency codes the price formatter knows a symbol for.
const KNOWN_CURRENCIES: &[(&str, &str)] = &[
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("BRL", "R$"),
    ("JPY", "¥"),
];

/// Symbols accepted in front of a typed-in amount.
pub fn currency_symbols() -> impl Iterator<Item = &'static str> {
    KNOWN_CURRENCIES.iter().map(|(_, symbol)| *symbol)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            last_email: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown config key `{0}` (expected locale, currency or last_email)")]
    UnknownKey(String),
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl Config {
    /// Applies a `config set <key> <value>` update after validating it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key.to_ascii_lowercase().as_str() {
            "locale" => {
                if value.is_empty() || value.contains(char::is_whitespace) {
                    return Err(ConfigError::InvalidValue {
                        key: "locale",
                        reason: "use a language tag such as en-US".into(),
                    });
                }
                self.locale = value.to_string();
            }
            "currency" => {
                let code = value.to_ascii_uppercase();
                if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(ConfigError::InvalidValue {
                        key: "currency",
                        reason: "use a three-letter ISO code such as USD".into(),
                    });
                }
                self.currency = code;
            }
            "last_email" => {
                if value.is_empty() || value.eq_ignore_ascii_case("none") {
                    self.last_email = None;
                } else {
                    self.last_email = Some(value.to_string());
                }
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Symbol shown in front of prices; unknown codes fall back to the code itself.
    pub fn currency_symbol(&self) -> &str {
        KNOWN_CURRENCIES
            .iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(&self.currency))
            .map(|(_, symbol)| *symbol)
            .unwrap_or(self.currency.as_str())
    }

    /// Formats a whole-unit amount, e.g. `$ 120`.
    pub fn format_price(&self, amount: u64) -> String {
        format!("{} {}", self.currency_symbol(), amount)
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, MarketError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, MarketError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, MarketError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, MarketError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), MarketError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
