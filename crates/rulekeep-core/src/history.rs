//! # Historical Types
//!
//! A rule's history is a list of dated change records. The model carries
//! them through untouched: it neither orders nor deduplicates entries, and
//! it attaches no meaning to the description text.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A calendar date in a ruleset's history, written `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HistoricalDate(NaiveDate);

impl HistoricalDate {
    /// Wrap a `chrono::NaiveDate`.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a date from year, month and day.
    ///
    /// Returns `None` for dates that do not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse a `YYYY-MM-DD` date.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDate`] for any other form.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|e| ValidationError::InvalidDate {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Access the inner date.
    pub fn as_naive(&self) -> &NaiveDate {
        &self.0
    }
}

impl fmt::Display for HistoricalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl std::str::FromStr for HistoricalDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for HistoricalDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// One change event in a rule's history.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HistoricalEntry {
    /// When the change took effect.
    pub date: HistoricalDate,
    /// Free-form description of the change ("Enacted by P1234", ...).
    pub description: String,
}

impl HistoricalEntry {
    /// Create a history entry.
    pub fn new(date: HistoricalDate, description: impl Into<String>) -> Self {
        Self {
            date,
            description: description.into(),
        }
    }
}
