//! Error types for filter decoding and translation.

use thiserror::Error;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur when a caller asks for strict filter handling.
///
/// The lenient paths (`Filter::from_json`, `Filter::to_api_filter`) never
/// return these; they drop or neutralize what they cannot use.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The input is not valid JSON.
    #[error("invalid filter JSON: {message}")]
    Json {
        /// The parser's error message.
        message: String,
    },

    /// The JSON parsed but its root is not a recognizable filter node.
    #[error("filter JSON does not describe a filter")]
    UndecodableRoot,

    /// A comparison has an unset operand and cannot be sent to the remote API.
    #[error("comparison is not fully configured: {comparison}")]
    UnconfiguredComparison {
        /// Display form of the offending comparison.
        comparison: String,
    },

    /// An operator symbol is not one of the six canonical symbols.
    #[error("unknown operator: {symbol}")]
    UnknownOperator {
        /// The unrecognized symbol.
        symbol: String,
    },

    /// A stat identifier does not resolve in the stat set.
    #[error("unknown stat '{identifier}'{}", did_you_mean(.suggestion))]
    UnknownStat {
        /// The unresolved identifier.
        identifier: String,
        /// A close known identifier, if any.
        suggestion: Option<String>,
    },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{s}'?"),
        None => String::new(),
    }
}

impl FilterError {
    /// Creates an unconfigured comparison error.
    pub fn unconfigured(comparison: impl Into<String>) -> Self {
        FilterError::UnconfiguredComparison {
            comparison: comparison.into(),
        }
    }

    /// Creates an unknown operator error.
    pub fn unknown_operator(symbol: impl Into<String>) -> Self {
        FilterError::UnknownOperator {
            symbol: symbol.into(),
        }
    }

    /// Creates an unknown stat error.
    pub fn unknown_stat(identifier: impl Into<String>, suggestion: Option<&str>) -> Self {
        FilterError::UnknownStat {
            identifier: identifier.into(),
            suggestion: suggestion.map(str::to_string),
        }
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(e: serde_json::Error) -> Self {
        FilterError::Json {
            message: e.to_string(),
        }
    }
}
