//! Stat references: named, typed extractors of scalar values from records.
//!
//! Filters never own the way a value is computed. They hold a [`StatRef`]
//! and ask it to [`read`](Stat::read) a record when a comparison needs a
//! value. Stats are resolved from their textual identifier through a
//! [`StatLookup`], usually a [`StatSet`].

mod json;
mod set;

use std::fmt;
use std::sync::Arc;

pub use json::JsonStat;
pub use set::{StatGroup, StatLookup, StatSet};

/// A value produced by reading a stat from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    /// A plain number.
    Number(f64),

    /// A plain string.
    Text(String),

    /// A value with a display name and, usually, a numeric projection
    /// (for example a ranked category).
    Labeled {
        /// Numeric projection, preferred for comparisons when present.
        number: Option<f64>,
        /// Display name, used when there is no numeric projection.
        name: String,
    },
}

impl StatValue {
    /// Creates a labeled value with both projections.
    pub fn labeled(number: f64, name: impl Into<String>) -> Self {
        StatValue::Labeled {
            number: Some(number),
            name: name.into(),
        }
    }

    /// Creates a labeled value that only has a display name.
    pub fn named(name: impl Into<String>) -> Self {
        StatValue::Labeled {
            number: None,
            name: name.into(),
        }
    }

    /// Returns the numeric projection of this value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StatValue::Number(n) => Some(*n),
            StatValue::Labeled { number, .. } => *number,
            StatValue::Text(_) => None,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Number(n) if n.is_nan() => write!(f, "-"),
            StatValue::Number(n) => write!(f, "{n}"),
            StatValue::Text(s) => write!(f, "{s}"),
            StatValue::Labeled { name, .. } => write!(f, "{name}"),
        }
    }
}

impl From<f64> for StatValue {
    fn from(n: f64) -> Self {
        StatValue::Number(n)
    }
}

impl From<i64> for StatValue {
    fn from(n: i64) -> Self {
        StatValue::Number(n as f64)
    }
}

impl From<String> for StatValue {
    fn from(s: String) -> Self {
        StatValue::Text(s)
    }
}

impl From<&str> for StatValue {
    fn from(s: &str) -> Self {
        StatValue::Text(s.to_string())
    }
}

/// A named field extractor over records of type `T`.
pub trait Stat<T> {
    /// Stable textual identifier, used by the compact JSON form.
    fn identifier_name(&self) -> &str;

    /// Identifier of the matching field in the remote query API.
    fn api_field(&self) -> &str;

    /// Reads this stat's value from a record.
    fn read(&self, record: &T) -> StatValue;
}

/// Shared handle to a stat.
pub type StatRef<T> = Arc<dyn Stat<T> + Send + Sync>;

/// A stat backed by a plain function or closure.
///
/// ```
/// use stat_filter::stat::{FnStat, Stat, StatValue};
///
/// struct Team { wins: u32 }
///
/// let wins = FnStat::new("wins", "Wins", |t: &Team| StatValue::from(t.wins as f64));
/// assert_eq!(wins.read(&Team { wins: 3 }), StatValue::Number(3.0));
/// ```
pub struct FnStat<F> {
    identifier_name: String,
    api_field: String,
    read: F,
}

impl<F> FnStat<F> {
    /// Creates a stat from its identifiers and a read function.
    pub fn new(identifier_name: impl Into<String>, api_field: impl Into<String>, read: F) -> Self {
        Self {
            identifier_name: identifier_name.into(),
            api_field: api_field.into(),
            read,
        }
    }
}

impl<T, F> Stat<T> for FnStat<F>
where
    F: Fn(&T) -> StatValue,
{
    fn identifier_name(&self) -> &str {
        &self.identifier_name
    }

    fn api_field(&self) -> &str {
        &self.api_field
    }

    fn read(&self, record: &T) -> StatValue {
        (self.read)(record)
    }
}

impl<F> fmt::Debug for FnStat<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStat")
            .field("identifier_name", &self.identifier_name)
            .field("api_field", &self.api_field)
            .finish_non_exhaustive()
    }
}
