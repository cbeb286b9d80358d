use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Named relative window for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "1year")]
    OneYear,
    #[serde(rename = "all")]
    All,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::ThreeMonths => "3months",
            Period::OneYear => "1year",
            Period::All => "all",
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "3months" => Ok(Period::ThreeMonths),
            "1year" => Ok(Period::OneYear),
            "all" => Ok(Period::All),
            other => Err(CoreError::validation(
                "period",
                format!("Unknown period '{other}' (expected 3months, 1year or all)"),
            )),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// History query parameters as received from the query boundary.
///
/// `from`/`to` stay as raw strings here; they are parsed (and rejected if
/// malformed) when the filter is applied. `period`, when present, wins over
/// both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub period: Option<Period>,
}

impl FilterParams {
    pub fn period(period: Period) -> Self {
        Self {
            period: Some(period),
            ..Self::default()
        }
    }

    pub fn range(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            period: None,
        }
    }

    /// True when no bound of any kind was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none() && self.period.is_none()
    }
}
