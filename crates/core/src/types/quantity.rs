//! Line item quantities as they arrive from forms and widgets.
//!
//! Quantity pickers hand over either a number or the raw text of an input
//! field. Before anything is sent to Shopify the value is coerced to an
//! integer with base-10 `parseInt` rules: leading whitespace is skipped, an
//! optional sign is accepted, and the longest run of ASCII digits wins
//! (`"3 items"` is `3`, `"abc"` is not a number at all).

use serde::{Deserialize, Serialize};

/// A quantity before integer coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    /// Already numeric.
    Count(i64),
    /// Raw text, e.g. the value of a `<select>` or `<input>`.
    Text(String),
}

impl QuantityInput {
    /// Whether the input counts as "no quantity given".
    ///
    /// Zero and the empty string are missing; the text `"0"` is not, it
    /// coerces to zero instead.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Count(n) => *n == 0,
            Self::Text(s) => s.is_empty(),
        }
    }

    /// Coerce to an integer, or `None` when the text holds no leading number.
    #[must_use]
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Self::Count(n) => Some(*n),
            Self::Text(s) => parse_int(s),
        }
    }
}

impl From<i64> for QuantityInput {
    fn from(n: i64) -> Self {
        Self::Count(n)
    }
}

impl From<i32> for QuantityInput {
    fn from(n: i32) -> Self {
        Self::Count(i64::from(n))
    }
}

impl From<u32> for QuantityInput {
    fn from(n: u32) -> Self {
        Self::Count(i64::from(n))
    }
}

impl From<&str> for QuantityInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for QuantityInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Parse the leading base-10 integer of `s`.
///
/// Returns `None` when no digit follows the optional sign, or when the digits
/// overflow an `i64`.
#[must_use]
pub fn parse_int(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest.get(..digits_len)?.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
