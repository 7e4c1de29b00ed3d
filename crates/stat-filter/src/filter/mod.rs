//! Filter trees over stat values.
//!
//! A filter is a tree of `ALL`/`ANY` groups and comparison leaves. This
//! module provides the tree itself, its evaluation against records, the
//! compact JSON form used for storage and sharing, and the translation into
//! the remote query API's filter shape.
//!
//! # Semantics
//!
//! - An empty `ALL` and an empty `ANY` both match every record.
//! - A comparison with an unset operand matches every record; it stands for
//!   a condition the user has not finished configuring.
//! - Numbers compare numerically and strings lexicographically. A number
//!   and a string are unordered: only `≠` holds between them.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use stat_filter::filter::{CompareOp, Filter, FilterIdAllocator, Operand};
//! use stat_filter::stat::{JsonStat, StatRef, StatSet};
//!
//! let total: StatRef<serde_json::Value> = Arc::new(JsonStat::new("total", "TotalPoints", "/total"));
//! let stats = StatSet::new().with_group("Scoring", vec![total]);
//! let ids = FilterIdAllocator::new();
//!
//! // Decode a stored filter
//! let stored = json!({"all": [{"lhs": "total", "op": "≥", "rhs": 100}]});
//! let filter = Filter::from_json(&stored, &stats, &ids).unwrap();
//!
//! // Evaluate locally
//! assert!(filter.matches(&json!({"total": 120})));
//! assert!(!filter.matches(&json!({"total": 80})));
//!
//! // Encode again
//! assert_eq!(filter.to_json(), json!({"all": [{"lhs": "total", "op": "≥", "rhs": 100}]}));
//! ```

mod ast;
pub mod compact;
mod error;
mod evaluator;
mod operator;
pub mod remote;

pub use ast::{Filter, FilterId, FilterIdAllocator, Operand};
pub use error::{FilterError, FilterResult};
pub use evaluator::FilterEvaluator;
pub use operator::CompareOp;
pub use remote::{
    ApiCompareOperator, ApiCondition, ApiFilter, ApiValue, LteMapping, RemoteTranslator,
};
