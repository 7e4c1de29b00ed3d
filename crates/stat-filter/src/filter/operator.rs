//! Comparison operators and their display symbols.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FilterError;

/// A comparison between two operands.
///
/// Each operator has a single-character symbol used for display and for the
/// compact JSON form. Serde uses the same symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// `≤`
    #[serde(rename = "≤")]
    Lte,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `≥`
    #[serde(rename = "≥")]
    Gte,
    /// `=`
    #[serde(rename = "=")]
    Eq,
    /// `≠`
    #[serde(rename = "≠")]
    Neq,
}

impl CompareOp {
    /// Every operator, in declaration order.
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Lt,
        CompareOp::Lte,
        CompareOp::Gt,
        CompareOp::Gte,
        CompareOp::Eq,
        CompareOp::Neq,
    ];

    /// Parses an operator from its symbol.
    ///
    /// Returns `None` for anything other than the six canonical symbols.
    ///
    /// ```
    /// use stat_filter::filter::CompareOp;
    ///
    /// assert_eq!(CompareOp::from_symbol("≥"), Some(CompareOp::Gte));
    /// assert_eq!(CompareOp::from_symbol(">="), None);
    /// ```
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(CompareOp::Eq),
            "≠" => Some(CompareOp::Neq),
            ">" => Some(CompareOp::Gt),
            "≥" => Some(CompareOp::Gte),
            "<" => Some(CompareOp::Lt),
            "≤" => Some(CompareOp::Lte),
            _ => None,
        }
    }

    /// Returns the operator's symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Neq => "≠",
            CompareOp::Gt => ">",
            CompareOp::Gte => "≥",
            CompareOp::Lt => "<",
            CompareOp::Lte => "≤",
        }
    }

    /// Returns true if `ordering` (of lhs relative to rhs) satisfies this operator.
    ///
    /// `None` means the operands are unordered (NaN, or values of different
    /// kinds): only `≠` holds.
    pub fn holds(self, ordering: Option<Ordering>) -> bool {
        match self {
            CompareOp::Lt => ordering == Some(Ordering::Less),
            CompareOp::Lte => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            CompareOp::Gt => ordering == Some(Ordering::Greater),
            CompareOp::Gte => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            CompareOp::Eq => ordering == Some(Ordering::Equal),
            CompareOp::Neq => ordering != Some(Ordering::Equal),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CompareOp {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompareOp::from_symbol(s).ok_or_else(|| FilterError::unknown_operator(s))
    }
}
