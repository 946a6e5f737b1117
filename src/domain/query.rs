//! Listing filters and their canonical query-string form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::form_urlencoded;
use uuid::Uuid;

use crate::domain::location::Location;
use crate::domain::reservation::{parse_date, DateRange};
use crate::domain::Category;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("expected key=value, got `{0}`")]
    MissingValue(String),
    #[error("unknown filter `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}

/// Filters applied when browsing listings. Counts are minimums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    pub user_id: Option<Uuid>,
    pub category: Option<String>,
    pub location_value: Option<String>,
    pub guest_count: Option<u32>,
    pub room_count: Option<u32>,
    pub bathroom_count: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ListingQuery {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Both ends of the availability window, when the query has one.
    pub fn date_range(&self) -> Option<DateRange> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => DateRange::new(start, end).ok(),
            _ => None,
        }
    }

    /// Query-string pairs in key order, absent values skipped.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(value) = self.bathroom_count {
            pairs.push(("bathroomCount", value.to_string()));
        }
        if let Some(value) = &self.category {
            pairs.push(("category", value.clone()));
        }
        if let Some(value) = self.end_date {
            pairs.push(("endDate", value.format(DATE_FORMAT).to_string()));
        }
        if let Some(value) = self.guest_count {
            pairs.push(("guestCount", value.to_string()));
        }
        if let Some(value) = &self.location_value {
            pairs.push(("locationValue", value.clone()));
        }
        if let Some(value) = self.room_count {
            pairs.push(("roomCount", value.to_string()));
        }
        if let Some(value) = self.start_date {
            pairs.push(("startDate", value.format(DATE_FORMAT).to_string()));
        }
        if let Some(value) = self.user_id {
            pairs.push(("userId", value.to_string()));
        }
        pairs
    }

    /// Canonical browse URL, e.g. `/?guestCount=2&locationValue=PT`.
    pub fn to_query_string(&self) -> String {
        let pairs = self.pairs();
        if pairs.is_empty() {
            return "/".to_string();
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
        format!("/?{}", serializer.finish())
    }

    /// Parses a query string such as the one produced by [`to_query_string`].
    ///
    /// [`to_query_string`]: ListingQuery::to_query_string
    pub fn from_query_string(raw: &str) -> Result<Self, QueryError> {
        let raw = raw.trim_start_matches('/').trim_start_matches('?');
        let mut query = Self::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            query.set(&key, &value)?;
        }
        Ok(query)
    }

    /// Builds a query from `key=value` shell arguments.
    pub fn from_args(args: &[&str]) -> Result<Self, QueryError> {
        let mut query = Self::default();
        for arg in args {
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| QueryError::MissingValue(arg.to_string()))?;
            query.set(key, value)?;
        }
        Ok(query)
    }

    /// Sets one filter; accepts the query-string names and short aliases.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), QueryError> {
        let invalid = || QueryError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let value = value.trim();
        match key.trim() {
            "category" => {
                let category = Category::find(value).ok_or_else(invalid)?;
                self.category = Some(category.label.to_string());
            }
            "locationValue" | "location" => {
                let location = Location::lookup(value).ok_or_else(invalid)?;
                self.location_value = Some(location.value);
            }
            "guestCount" | "guests" => {
                self.guest_count = Some(value.parse().map_err(|_| invalid())?);
            }
            "roomCount" | "rooms" => {
                self.room_count = Some(value.parse().map_err(|_| invalid())?);
            }
            "bathroomCount" | "bathrooms" => {
                self.bathroom_count = Some(value.parse().map_err(|_| invalid())?);
            }
            "startDate" | "start" => {
                self.start_date = Some(parse_date(value).map_err(|_| invalid())?);
            }
            "endDate" | "end" => {
                self.end_date = Some(parse_date(value).map_err(|_| invalid())?);
            }
            "userId" => {
                self.user_id = Some(Uuid::parse_str(value).map_err(|_| invalid())?);
            }
            other => return Err(QueryError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}
