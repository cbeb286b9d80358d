use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::CoreError;

use super::category::CategoryName;

/// A snapshot of category balances on one calendar date.
///
/// Not every category has to appear: a category missing from `data` holds
/// a balance of 0 on this date. Use [`HistoryPoint::value_of`] rather than
/// indexing `data` directly so that rule is applied everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHistoryPoint")]
pub struct HistoryPoint {
    /// Snapshot date (daily granularity, unique within a document)
    pub date: NaiveDate,

    /// Balance per category; values are non-negative
    #[serde(default)]
    pub data: BTreeMap<CategoryName, f64>,
}

impl HistoryPoint {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            data: BTreeMap::new(),
        }
    }

    /// Build a point from raw `(name, value)` pairs, validating names and values.
    pub fn from_values<I, K>(date: NaiveDate, values: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut point = Self::new(date);
        for (name, value) in values {
            point.insert_unique(CategoryName::parse(name)?, value)?;
        }
        point.validate()?;
        Ok(point)
    }

    /// Insert a balance, rejecting a second entry under the same name.
    /// Names are trimmed, so `"Cash"` and `" Cash"` collide.
    fn insert_unique(&mut self, name: CategoryName, value: f64) -> Result<(), CoreError> {
        if self.data.contains_key(&name) {
            return Err(CoreError::validation(
                format!("history[{}].data", self.date),
                format!("Balance for '{name}' is recorded more than once"),
            ));
        }
        self.data.insert(name, value);
        Ok(())
    }

    /// Builder-style setter, mostly for tests and fixtures.
    #[must_use]
    pub fn with_value(mut self, name: CategoryName, value: f64) -> Self {
        self.data.insert(name, value);
        self
    }

    /// Balance of `category` on this date; absent categories are 0.
    #[must_use]
    pub fn value_of(&self, category: &str) -> f64 {
        self.data.get(category).copied().unwrap_or(0.0)
    }

    /// Sum of every balance recorded in this point.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.data.values().sum()
    }

    /// Every value must be a finite number ≥ 0.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, value) in &self.data {
            if !value.is_finite() {
                return Err(CoreError::validation(
                    format!("history[{}].data.{}", self.date, name),
                    "Balance must be a finite number",
                ));
            }
            if *value < 0.0 {
                return Err(CoreError::validation(
                    format!("history[{}].data.{}", self.date, name),
                    format!("Balance must not be negative (got {value})"),
                ));
            }
        }
        Ok(())
    }
}

/// Wire form of [`HistoryPoint`] with the balance entries kept in input order
/// and names not yet normalized.
#[derive(Deserialize)]
struct RawHistoryPoint {
    date: NaiveDate,
    #[serde(default, deserialize_with = "balance_entries")]
    data: Vec<(String, f64)>,
}

impl TryFrom<RawHistoryPoint> for HistoryPoint {
    type Error = CoreError;

    fn try_from(raw: RawHistoryPoint) -> Result<Self, Self::Error> {
        let mut point = Self::new(raw.date);
        for (name, value) in raw.data {
            let name = CategoryName::parse(&name).map_err(|_| {
                CoreError::validation(
                    format!("history[{}].data", raw.date),
                    format!("Invalid category name '{name}'"),
                )
            })?;
            point.insert_unique(name, value)?;
        }
        Ok(point)
    }
}

/// Collect a JSON object into `(key, value)` pairs without merging
/// repeated keys.
fn balance_entries<'de, D>(deserializer: D) -> Result<Vec<(String, f64)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, f64)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of category names to balances")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, f64>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}
