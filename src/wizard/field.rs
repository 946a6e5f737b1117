//! Field values accumulated by wizards and the descriptors used to prompt for them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::domain::{Category, DateRange, Location};

/// A single collected value. The variant is the only validation `set_field` performs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Count(u32),
    Price(u32),
    Location(Location),
    Dates(DateRange),
}

impl FieldValue {
    /// Renders the value the way a user would type it back in.
    pub fn to_input(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Count(count) | FieldValue::Price(count) => count.to_string(),
            FieldValue::Location(location) => location.value.clone(),
            FieldValue::Dates(range) => range.to_input(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Location(location) => write!(f, "{}", location),
            FieldValue::Dates(range) => write!(f, "{} ({} nights)", range, range.nights()),
            other => write!(f, "{}", other.to_input()),
        }
    }
}

/// Field name to value map accumulated across steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, FieldValue>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        self.0.insert(key.into(), value);
    }

    pub fn with(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// True when `key` holds text with something other than whitespace.
    pub fn has_text(&self, key: &str) -> bool {
        self.text(key).map_or(false, |text| !text.trim().is_empty())
    }

    pub fn count(&self, key: &str) -> Option<u32> {
        match self.get(key) {
            Some(FieldValue::Count(count)) => Some(*count),
            _ => None,
        }
    }

    pub fn price(&self, key: &str) -> Option<u32> {
        match self.get(key) {
            Some(FieldValue::Price(price)) => Some(*price),
            _ => None,
        }
    }

    pub fn location(&self, key: &str) -> Option<&Location> {
        match self.get(key) {
            Some(FieldValue::Location(location)) => Some(location),
            _ => None,
        }
    }

    pub fn dates(&self, key: &str) -> Option<DateRange> {
        match self.get(key) {
            Some(FieldValue::Dates(range)) => Some(*range),
            _ => None,
        }
    }

    pub fn require_text(&self, key: &'static str) -> Result<String, FieldError> {
        self.text(key)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .ok_or(FieldError::missing(key))
    }

    pub fn require_count(&self, key: &'static str) -> Result<u32, FieldError> {
        match self.count(key) {
            Some(0) => Err(FieldError::invalid(key, "must be at least 1")),
            Some(count) => Ok(count),
            None => Err(FieldError::missing(key)),
        }
    }

    pub fn require_price(&self, key: &'static str) -> Result<u32, FieldError> {
        match self.price(key) {
            Some(0) => Err(FieldError::invalid(key, "must be greater than zero")),
            Some(price) => Ok(price),
            None => Err(FieldError::missing(key)),
        }
    }

    pub fn require_location(&self, key: &'static str) -> Result<Location, FieldError> {
        self.location(key).cloned().ok_or(FieldError::missing(key))
    }

    pub fn require_dates(&self, key: &'static str) -> Result<DateRange, FieldError> {
        self.dates(key).ok_or(FieldError::missing(key))
    }
}

/// Schema failure when turning a [`FieldMap`] into a typed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{key}: {message}")]
pub struct FieldError {
    pub key: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn missing(key: &'static str) -> Self {
        Self {
            key,
            message: "is required".into(),
        }
    }

    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self {
            key,
            message: message.into(),
        }
    }
}

/// Supported input kinds, which decide how raw text becomes a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Count,
    Price,
    Category,
    Location,
    Dates,
}

/// Declarative description of one field collected on a step.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub help: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            help: None,
        }
    }

    pub const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    /// Converts typed-in text into the value this field stores.
    pub fn parse(&self, raw: &str) -> Result<FieldValue, FieldError> {
        let trimmed = raw.trim();
        match self.kind {
            FieldKind::Text => Ok(FieldValue::Text(trimmed.to_string())),
            FieldKind::Secret => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Count => trimmed
                .parse::<u32>()
                .map(FieldValue::Count)
                .map_err(|_| FieldError::invalid(self.key, "enter a whole number (e.g., 2)")),
            FieldKind::Price => parse_amount(trimmed)
                .map(FieldValue::Price)
                .ok_or_else(|| FieldError::invalid(self.key, "enter a whole amount (e.g., 120)")),
            FieldKind::Category => Category::find(trimmed)
                .map(|category| FieldValue::Text(category.label.to_string()))
                .ok_or_else(|| {
                    FieldError::invalid(
                        self.key,
                        format!("must be one of: {}", Category::labels().join(", ")),
                    )
                }),
            FieldKind::Location => Location::lookup(trimmed)
                .map(FieldValue::Location)
                .ok_or_else(|| FieldError::invalid(self.key, format!("unknown country `{}`", trimmed))),
            FieldKind::Dates => DateRange::parse(trimmed)
                .map(FieldValue::Dates)
                .map_err(|err| FieldError::invalid(self.key, err.to_string())),
        }
    }
}

/// Digits with at most one leading currency symbol, e.g. `120`, `$120` or `R$ 120`.
fn parse_amount(input: &str) -> Option<u32> {
    let digits = config::currency_symbols()
        .find_map(|symbol| input.strip_prefix(symbol))
        .map(str::trim_start)
        .unwrap_or(input);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors_ignore_other_variants() {
        let fields = FieldMap::new()
            .with("title", FieldValue::Text("  ".into()))
            .with("guests", FieldValue::Count(2));
        assert_eq!(fields.text("title"), Some("  "));
        assert!(!fields.has_text("title"));
        assert_eq!(fields.count("guests"), Some(2));
        assert_eq!(fields.price("guests"), None);
        assert_eq!(fields.text("guests"), None);
    }

    #[test]
    fn require_helpers_report_the_key() {
        let fields = FieldMap::new()
            .with("rooms", FieldValue::Count(0))
            .with("price", FieldValue::Price(0));
        assert_eq!(fields.require_text("title"), Err(FieldError::missing("title")));
        assert_eq!(fields.require_count("rooms").unwrap_err().key, "rooms");
        assert_eq!(fields.require_price("price").unwrap_err().key, "price");
    }

    #[test]
    fn field_parsing_by_kind() {
        let price = FieldSpec::new("price", "Price", FieldKind::Price);
        assert_eq!(price.parse("$120").unwrap(), FieldValue::Price(120));
        assert_eq!(price.parse("R$ 45").unwrap(), FieldValue::Price(45));
        assert!(price.parse("cheap").is_err());
        assert!(price.parse("-5").is_err());
        assert!(price.parse("abc12").is_err());
        assert!(price.parse("$$12").is_err());
        assert!(price.parse("+7").is_err());

        let category = FieldSpec::new("category", "Category", FieldKind::Category);
        assert_eq!(
            category.parse("pools").unwrap(),
            FieldValue::Text("Pools".into())
        );

        let location = FieldSpec::new("location", "Location", FieldKind::Location);
        assert!(matches!(location.parse("fr"), Ok(FieldValue::Location(l)) if l.value == "FR"));

        let secret = FieldSpec::new("password", "Password", FieldKind::Secret);
        assert_eq!(secret.parse(" pw ").unwrap(), FieldValue::Text(" pw ".into()));
    }

    #[test]
    fn values_render_back_to_input() {
        let dates = FieldSpec::new("dates", "Dates", FieldKind::Dates)
            .parse("2025-07-01..2025-07-03")
            .unwrap();
        assert_eq!(dates.to_input(), "2025-07-01..2025-07-03");
        assert!(dates.to_string().ends_with("(2 nights)"));
    }
}
