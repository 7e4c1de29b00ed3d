//! Boolean filter expressions over computed stat fields.
//!
//! A [`Filter`](filter::Filter) is a tree of `ALL`/`ANY` groups whose leaves
//! compare two operands (literal numbers or [`Stat`](stat::Stat) references)
//! with one of six operators. The same tree can be:
//!
//! - evaluated directly against in-memory records,
//! - stored as compact JSON keyed by stat identifiers,
//! - translated into the filter shape a remote query API expects.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use stat_filter::filter::{CompareOp, Filter, FilterIdAllocator, Operand};
//! use stat_filter::stat::{JsonStat, StatRef};
//!
//! let ids = FilterIdAllocator::new();
//! let x: StatRef<serde_json::Value> = Arc::new(JsonStat::new("x", "X", "/x"));
//! let y: StatRef<serde_json::Value> = Arc::new(JsonStat::new("y", "Y", "/y"));
//!
//! let filter = Filter::compare(&ids, Operand::Stat(x), CompareOp::Gt, Operand::Stat(y));
//!
//! let records = vec![json!({"x": 1, "y": 2}), json!({"x": 5, "y": 1})];
//! let matching = filter.filter_records(&records);
//! assert_eq!(matching, vec![&records[1]]);
//! ```

pub mod filter;
pub mod stat;

pub use filter::{Filter, FilterError, FilterIdAllocator, FilterResult};
pub use stat::{Stat, StatLookup, StatRef, StatSet, StatValue};
