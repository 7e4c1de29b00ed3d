//! Filter evaluation against in-memory records.
//!
//! This module provides the [`FilterEvaluator`] for testing records against
//! a filter tree.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use stat_filter::filter::{CompareOp, Filter, FilterEvaluator, FilterIdAllocator, Operand};
//! use stat_filter::stat::{FnStat, StatRef, StatValue};
//!
//! struct Team { number: u32, wins: u32 }
//!
//! let wins: StatRef<Team> = Arc::new(FnStat::new("wins", "Wins", |t: &Team| {
//!     StatValue::Number(t.wins as f64)
//! }));
//!
//! let ids = FilterIdAllocator::new();
//! let filter = Filter::compare(&ids, Operand::Stat(wins), CompareOp::Gte, Operand::Number(5.0));
//!
//! let teams = vec![Team { number: 1, wins: 2 }, Team { number: 2, wins: 7 }];
//! let evaluator = FilterEvaluator::new(&filter);
//! let matching = evaluator.filter_records(&teams);
//! assert_eq!(matching.len(), 1);
//! assert_eq!(matching[0].number, 2);
//! ```

use std::cmp::Ordering;

use super::ast::{Filter, Operand};
use super::operator::CompareOp;
use crate::stat::StatValue;

/// A resolved operand value.
#[derive(Debug, Clone, PartialEq)]
enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Orders two scalars of the same kind. Numbers and strings are not
    /// comparable with each other.
    fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Number(a), Scalar::Number(b)) => a.partial_cmp(b),
            (Scalar::Text(a), Scalar::Text(b)) => Some(a.as_str().cmp(b.as_str())),
            _ => None,
        }
    }
}

impl From<StatValue> for Scalar {
    fn from(value: StatValue) -> Self {
        match value {
            StatValue::Number(n) => Scalar::Number(n),
            StatValue::Text(s) => Scalar::Text(s),
            StatValue::Labeled {
                number: Some(n), ..
            } => Scalar::Number(n),
            StatValue::Labeled { number: None, name } => Scalar::Text(name),
        }
    }
}

/// Evaluates a filter against records.
///
/// The evaluator borrows the filter; evaluation has no side effects.
#[derive(Debug)]
pub struct FilterEvaluator<'a, T> {
    filter: &'a Filter<T>,
}

impl<'a, T> FilterEvaluator<'a, T> {
    /// Creates a new filter evaluator.
    pub fn new(filter: &'a Filter<T>) -> Self {
        Self { filter }
    }

    /// Returns true if the record matches the filter.
    pub fn matches(&self, record: &T) -> bool {
        evaluate_filter(self.filter, record)
    }

    /// Filters a slice of records, returning only those that match, in order.
    pub fn filter_records<'b>(&self, records: &'b [T]) -> Vec<&'b T> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

impl<T> Filter<T> {
    /// Returns true if the record matches this filter.
    pub fn matches(&self, record: &T) -> bool {
        FilterEvaluator::new(self).matches(record)
    }

    /// Returns the records matching this filter, in order.
    pub fn filter_records<'b>(&self, records: &'b [T]) -> Vec<&'b T> {
        FilterEvaluator::new(self).filter_records(records)
    }
}

/// Evaluates a filter expression against a record.
fn evaluate_filter<T>(filter: &Filter<T>, record: &T) -> bool {
    match filter {
        // An empty group matches everything, for ANY as well as ALL.
        Filter::All { conditions, .. } => conditions.iter().all(|c| evaluate_filter(c, record)),
        Filter::Any { conditions, .. } => {
            conditions.is_empty() || conditions.iter().any(|c| evaluate_filter(c, record))
        }
        Filter::Compare { lhs, op, rhs, .. } => evaluate_comparison(lhs, *op, rhs, record),
    }
}

/// Evaluates a single comparison. An unset side always matches.
fn evaluate_comparison<T>(lhs: &Operand<T>, op: CompareOp, rhs: &Operand<T>, record: &T) -> bool {
    let (Some(lhs), Some(rhs)) = (resolve(lhs, record), resolve(rhs, record)) else {
        return true;
    };

    op.holds(lhs.compare(&rhs))
}

/// Resolves an operand to a value, or `None` if it is unset.
fn resolve<T>(operand: &Operand<T>, record: &T) -> Option<Scalar> {
    match operand {
        Operand::Unset => None,
        Operand::Number(n) => Some(Scalar::Number(*n)),
        Operand::Stat(stat) => Some(Scalar::from(stat.read(record))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_ordering_same_kind() {
        let one = Scalar::Number(1.0);
        let two = Scalar::Number(2.0);
        assert_eq!(one.compare(&two), Some(Ordering::Less));

        let a = Scalar::Text("apple".to_string());
        let b = Scalar::Text("banana".to_string());
        assert_eq!(b.compare(&a), Some(Ordering::Greater));
    }

    #[test]
    fn test_scalar_ordering_mixed_kinds_is_none() {
        let n = Scalar::Number(1.0);
        let s = Scalar::Text("1".to_string());
        assert_eq!(n.compare(&s), None);
        assert_eq!(s.compare(&n), None);
    }

    #[test]
    fn test_labeled_value_prefers_number() {
        assert_eq!(Scalar::from(StatValue::labeled(4.0, "Fourth")), Scalar::Number(4.0));
        assert_eq!(
            Scalar::from(StatValue::named("Red")),
            Scalar::Text("Red".to_string())
        );
    }
}
