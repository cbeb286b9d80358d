use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::OnceLock;

use crate::errors::CoreError;

/// Maximum length of a category name, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Validated category identifier: trimmed, 1..=100 characters.
///
/// History points key their balances by this type, so every mapping entry
/// refers to a well-formed name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, CoreError> {
        let trimmed = raw.as_ref().trim();
        let len = trimmed.chars().count();
        if len == 0 {
            return Err(CoreError::validation("name", "Category name must not be empty"));
        }
        if len > MAX_CATEGORY_NAME_LEN {
            return Err(CoreError::validation(
                "name",
                format!("Category name must be at most {MAX_CATEGORY_NAME_LEN} characters (got {len})"),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CategoryName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CategoryName> for String {
    fn from(name: CategoryName) -> Self {
        name.0
    }
}

impl Borrow<str> for CategoryName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn hex_color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("static regex is valid"))
}

/// Display color in `#RRGGBB` form. Input is case-insensitive and is
/// normalized to upper case, so `#ff8800` and `#FF8800` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, CoreError> {
        let raw = raw.as_ref().trim();
        if !hex_color_pattern().is_match(raw) {
            return Err(CoreError::validation(
                "color",
                format!("'{raw}' is not a #RRGGBB color code"),
            ));
        }
        Ok(Self(raw.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HexColor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named financial bucket (e.g. "Emergency Fund") with its chart color.
/// Identity is the name; colors may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: CategoryName,
    pub color: HexColor,
}

impl Category {
    /// Build a category from raw user input, validating both fields.
    pub fn new(name: impl AsRef<str>, color: impl AsRef<str>) -> Result<Self, CoreError> {
        Ok(Self {
            name: CategoryName::parse(name)?,
            color: HexColor::parse(color)?,
        })
    }
}
