//! Translation of filter trees into the remote query API's filter shape.
//!
//! The remote shape has no notion of an unset operand. A comparison with an
//! unset side becomes the neutral placeholder `0 = 0` in the lenient
//! translation, or an error in the strict one.
//!
//! Wire format:
//!
//! ```text
//! { "all": [ ... ] }
//! { "any": [ ... ] }
//! { "condition": { "lhs": <value>, "compareOperator": "GT", "rhs": <value> } }
//! <value> = { "value": 12 } | { "field": "AutoPoints" }
//! ```

use serde::{Deserialize, Serialize};

use super::ast::{Filter, Operand};
use super::error::{FilterError, FilterResult};
use super::operator::CompareOp;

/// A filter in the remote API's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiFilter {
    /// Conjunction.
    All(Vec<ApiFilter>),
    /// Disjunction.
    Any(Vec<ApiFilter>),
    /// A single comparison.
    Condition(ApiCondition),
}

/// A comparison in the remote API's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCondition {
    pub lhs: ApiValue,
    pub compare_operator: ApiCompareOperator,
    pub rhs: ApiValue,
}

impl ApiCondition {
    /// The neutral condition `0 = 0`, emitted for comparisons with an unset side.
    pub fn placeholder() -> Self {
        Self {
            lhs: ApiValue::Value(0.0),
            compare_operator: ApiCompareOperator::Eq,
            rhs: ApiValue::Value(0.0),
        }
    }
}

/// A value reference in the remote API: a literal or a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiValue {
    /// A literal number.
    Value(f64),
    /// A remote field identifier.
    Field(String),
}

/// The remote API's comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiCompareOperator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// How [`CompareOp::Lte`] is sent to the remote API.
///
/// Earlier clients sent `≤` as `Gt`. That looks like a transcription slip,
/// but stored queries may depend on it, so the old mapping stays available
/// until the remote side confirms which one it expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LteMapping {
    /// Send `≤` as `Lte`.
    #[default]
    Lte,
    /// Send `≤` as `Gt`, matching earlier clients.
    LegacyGt,
}

/// Translates filter trees into [`ApiFilter`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteTranslator {
    lte_mapping: LteMapping,
}

impl RemoteTranslator {
    /// Creates a translator with the default operator mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how `≤` is translated.
    pub fn with_lte_mapping(mut self, lte_mapping: LteMapping) -> Self {
        self.lte_mapping = lte_mapping;
        self
    }

    /// Returns the configured `≤` mapping.
    pub fn lte_mapping(&self) -> LteMapping {
        self.lte_mapping
    }

    /// Maps a comparison operator to the remote enum.
    pub fn operator(&self, op: CompareOp) -> ApiCompareOperator {
        match op {
            CompareOp::Eq => ApiCompareOperator::Eq,
            CompareOp::Neq => ApiCompareOperator::Neq,
            CompareOp::Gt => ApiCompareOperator::Gt,
            CompareOp::Gte => ApiCompareOperator::Gte,
            CompareOp::Lt => ApiCompareOperator::Lt,
            CompareOp::Lte => match self.lte_mapping {
                LteMapping::Lte => ApiCompareOperator::Lte,
                LteMapping::LegacyGt => ApiCompareOperator::Gt,
            },
        }
    }

    /// Translates a filter. Never fails: comparisons with an unset side
    /// become [`ApiCondition::placeholder`].
    ///
    /// Callers that need the remote result to match local evaluation should
    /// use [`Filter::without_unconfigured`] first, or [`Self::translate_strict`].
    pub fn translate<T>(&self, filter: &Filter<T>) -> ApiFilter {
        match filter {
            Filter::All { conditions, .. } => {
                ApiFilter::All(conditions.iter().map(|c| self.translate(c)).collect())
            }
            Filter::Any { conditions, .. } => {
                ApiFilter::Any(conditions.iter().map(|c| self.translate(c)).collect())
            }
            Filter::Compare { lhs, op, rhs, .. } => {
                let condition = match (api_value(lhs), api_value(rhs)) {
                    (Some(lhs), Some(rhs)) => ApiCondition {
                        lhs,
                        compare_operator: self.operator(*op),
                        rhs,
                    },
                    _ => ApiCondition::placeholder(),
                };
                ApiFilter::Condition(condition)
            }
        }
    }

    /// Translates a filter, rejecting comparisons with an unset side.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnconfiguredComparison` for the first such
    /// comparison found in depth-first order.
    pub fn translate_strict<T>(&self, filter: &Filter<T>) -> FilterResult<ApiFilter> {
        match filter {
            Filter::All { conditions, .. } => conditions
                .iter()
                .map(|c| self.translate_strict(c))
                .collect::<FilterResult<_>>()
                .map(ApiFilter::All),
            Filter::Any { conditions, .. } => conditions
                .iter()
                .map(|c| self.translate_strict(c))
                .collect::<FilterResult<_>>()
                .map(ApiFilter::Any),
            Filter::Compare { lhs, op, rhs, .. } => match (api_value(lhs), api_value(rhs)) {
                (Some(lhs), Some(rhs)) => Ok(ApiFilter::Condition(ApiCondition {
                    lhs,
                    compare_operator: self.operator(*op),
                    rhs,
                })),
                _ => Err(FilterError::unconfigured(filter.to_string())),
            },
        }
    }
}

impl<T> Filter<T> {
    /// Translates this filter for the remote API with the default translator.
    pub fn to_api_filter(&self) -> ApiFilter {
        RemoteTranslator::default().translate(self)
    }
}

fn api_value<T>(operand: &Operand<T>) -> Option<ApiValue> {
    match operand {
        Operand::Unset => None,
        Operand::Number(n) => Some(ApiValue::Value(*n)),
        Operand::Stat(stat) => Some(ApiValue::Field(stat.api_field().to_string())),
    }
}
