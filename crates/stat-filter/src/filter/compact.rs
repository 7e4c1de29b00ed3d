//! Compact JSON form of a filter tree.
//!
//! The compact form is independent of any remote schema. Stats are stored by
//! their textual identifier and resolved again through a [`StatLookup`] when
//! decoding:
//!
//! ```text
//! { "all": [ <node>, ... ] }
//! { "any": [ <node>, ... ] }
//! { "lhs": <operand>, "op": "<" | "≤" | ">" | "≥" | "=" | "≠", "rhs": <operand> }
//! ```
//!
//! An operand is `null` (unset), a number, or a stat identifier string.
//!
//! Decoding is lenient. Group children that fail to decode are dropped; a
//! comparison with an unresolvable side or operator is dropped as a whole.

use serde_json::{json, Map, Value};

use super::ast::{Filter, FilterIdAllocator, Operand};
use super::error::{FilterError, FilterResult};
use super::operator::CompareOp;
use crate::stat::{StatLookup, StatSet};

const ALL_KEY: &str = "all";
const ANY_KEY: &str = "any";

/// Largest magnitude below which every integer is exactly representable as `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl<T> Filter<T> {
    /// Encodes this filter as compact JSON. Node ids are not written.
    ///
    /// ```
    /// use serde_json::json;
    /// use stat_filter::filter::{CompareOp, Filter, FilterIdAllocator, Operand};
    ///
    /// let ids = FilterIdAllocator::new();
    /// let leaf: Filter<()> = Filter::compare(&ids, Operand::Number(1.0), CompareOp::Lte, Operand::Unset);
    /// let filter = Filter::any(&ids, vec![leaf]);
    ///
    /// assert_eq!(filter.to_json(), json!({"any": [{"lhs": 1, "op": "≤", "rhs": null}]}));
    /// ```
    pub fn to_json(&self) -> Value {
        match self {
            Filter::Compare { lhs, op, rhs, .. } => json!({
                "lhs": operand_to_json(lhs),
                "op": op.symbol(),
                "rhs": operand_to_json(rhs),
            }),
            Filter::All { conditions, .. } => group_to_json(ALL_KEY, conditions),
            Filter::Any { conditions, .. } => group_to_json(ANY_KEY, conditions),
        }
    }

    /// Decodes a filter from compact JSON, resolving stats through `stats`.
    ///
    /// Shapes are tried in a fixed order: an `all` array, then an `any`
    /// array, then `lhs`/`op`/`rhs`. Returns `None` when the value matches
    /// none of them, or when it is a comparison that cannot be fully
    /// resolved. Every decoded node gets a fresh id from `ids`.
    pub fn from_json<L>(json: &Value, stats: &L, ids: &FilterIdAllocator) -> Option<Self>
    where
        L: StatLookup<T> + ?Sized,
    {
        let object = json.as_object()?;

        if let Some(children) = object.get(ALL_KEY).and_then(Value::as_array) {
            return Some(Filter::All {
                id: Some(ids.next_id()),
                conditions: decode_children(children, stats, ids),
            });
        }

        if let Some(children) = object.get(ANY_KEY).and_then(Value::as_array) {
            return Some(Filter::Any {
                id: Some(ids.next_id()),
                conditions: decode_children(children, stats, ids),
            });
        }

        if let (Some(lhs), Some(op), Some(rhs)) =
            (object.get("lhs"), object.get("op"), object.get("rhs"))
        {
            let lhs = operand_from_json(lhs, stats)?;
            let op = op.as_str().and_then(CompareOp::from_symbol)?;
            let rhs = operand_from_json(rhs, stats)?;

            return Some(Filter::Compare {
                id: Some(ids.next_id()),
                lhs,
                op,
                rhs,
            });
        }

        None
    }

    /// Parses JSON text and decodes it with [`Filter::from_json`].
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Json` if the text is not valid JSON, and
    /// `FilterError::UndecodableRoot` if the root does not decode to a filter.
    pub fn from_json_str<L>(text: &str, stats: &L, ids: &FilterIdAllocator) -> FilterResult<Self>
    where
        L: StatLookup<T> + ?Sized,
    {
        let json: Value = serde_json::from_str(text)?;
        Filter::from_json(&json, stats, ids).ok_or(FilterError::UndecodableRoot)
    }
}

fn group_to_json<T>(key: &str, conditions: &[Filter<T>]) -> Value {
    let mut object = Map::new();
    object.insert(
        key.to_string(),
        Value::Array(conditions.iter().map(Filter::to_json).collect()),
    );
    Value::Object(object)
}

fn operand_to_json<T>(operand: &Operand<T>) -> Value {
    match operand {
        Operand::Unset => Value::Null,
        Operand::Number(n) => number_to_json(*n),
        Operand::Stat(stat) => Value::String(stat.identifier_name().to_string()),
    }
}

/// Integral values are written without a fractional part, so `100` stays `100`.
fn number_to_json(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        Value::from(n as i64)
    } else {
        json!(n)
    }
}

fn decode_children<T, L>(children: &[Value], stats: &L, ids: &FilterIdAllocator) -> Vec<Filter<T>>
where
    L: StatLookup<T> + ?Sized,
{
    children
        .iter()
        .filter_map(|child| Filter::from_json(child, stats, ids))
        .collect()
}

/// Decodes one side of a comparison. `None` means the side is unusable:
/// `null`, a non-scalar, or an unknown stat identifier.
fn operand_from_json<T, L>(json: &Value, stats: &L) -> Option<Operand<T>>
where
    L: StatLookup<T> + ?Sized,
{
    match json {
        Value::Number(n) => n.as_f64().map(Operand::Number),
        Value::String(identifier) => stats.find(identifier).map(Operand::Stat),
        _ => None,
    }
}

/// Lists the stat identifiers in compact JSON that `stats` cannot resolve,
/// in document order, each once.
///
/// This walks the same shapes the decoder accepts, so callers can explain
/// why a comparison was dropped.
pub fn unresolved_identifiers<T>(json: &Value, stats: &StatSet<T>) -> Vec<String> {
    let mut missing = Vec::new();
    collect_unresolved(json, stats, &mut missing);
    missing
}

fn collect_unresolved<T>(json: &Value, stats: &StatSet<T>, missing: &mut Vec<String>) {
    let Some(object) = json.as_object() else {
        return;
    };

    let children = object
        .get(ALL_KEY)
        .and_then(Value::as_array)
        .or_else(|| object.get(ANY_KEY).and_then(Value::as_array));

    if let Some(children) = children {
        for child in children {
            collect_unresolved(child, stats, missing);
        }
        return;
    }

    for key in ["lhs", "rhs"] {
        if let Some(Value::String(identifier)) = object.get(key) {
            if stats.find(identifier).is_none() && !missing.contains(identifier) {
                missing.push(identifier.clone());
            }
        }
    }
}

/// Checks that every stat identifier in compact JSON resolves.
///
/// # Errors
///
/// Returns `FilterError::UnknownStat` for the first unresolved identifier,
/// with a suggestion when a close identifier exists.
pub fn check_identifiers<T>(json: &Value, stats: &StatSet<T>) -> FilterResult<()> {
    match unresolved_identifiers(json, stats).first() {
        Some(identifier) => Err(FilterError::unknown_stat(
            identifier.as_str(),
            stats.suggest(identifier),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::stat::{JsonStat, StatRef};

    fn stats() -> StatSet<Value> {
        let x: StatRef<Value> = Arc::new(JsonStat::new("x", "X", "/x"));
        let y: StatRef<Value> = Arc::new(JsonStat::new("y", "Y", "/y"));
        StatSet::new().with_group("Test", vec![x, y])
    }

    #[test]
    fn test_encode_compare_with_stats_and_null() {
        let set = stats();
        let ids = FilterIdAllocator::new();
        let x = set.find("x").unwrap();
        let filter: Filter<Value> =
            Filter::compare(&ids, Operand::Stat(x), CompareOp::Neq, Operand::Unset);

        assert_eq!(filter.to_json(), json!({"lhs": "x", "op": "≠", "rhs": null}));
    }

    #[test]
    fn test_encode_integral_numbers_without_fraction() {
        let ids = FilterIdAllocator::new();
        let encode = |n: f64| {
            let leaf: Filter<Value> =
                Filter::compare(&ids, Operand::Number(n), CompareOp::Eq, Operand::Unset);
            leaf.to_json()["lhs"].to_string()
        };

        assert_eq!(encode(100.0), "100");
        assert_eq!(encode(-3.0), "-3");
        assert_eq!(encode(2.5), "2.5");
        assert_eq!(encode(f64::NAN), "null");
    }

    #[test]
    fn test_encode_empty_groups() {
        let ids = FilterIdAllocator::new();
        assert_eq!(Filter::<Value>::empty(&ids).to_json(), json!({"all": []}));
        assert_eq!(Filter::<Value>::any(&ids, vec![]).to_json(), json!({"any": []}));
    }

    #[test]
    fn test_decode_prefers_all_over_any() {
        let ids = FilterIdAllocator::new();
        let json = json!({"all": [], "any": [{"lhs": 1, "op": "=", "rhs": 1}]});
        let decoded: Filter<Value> = Filter::from_json(&json, &stats(), &ids).unwrap();
        assert!(matches!(decoded, Filter::All { ref conditions, .. } if conditions.is_empty()));
    }

    #[test]
    fn test_decode_non_array_all_falls_through() {
        let ids = FilterIdAllocator::new();
        let decoded: Filter<Value> =
            Filter::from_json(&json!({"all": 3, "any": []}), &stats(), &ids).unwrap();
        assert!(matches!(decoded, Filter::Any { .. }));
    }

    #[test]
    fn test_decode_non_object_is_none() {
        let ids = FilterIdAllocator::new();
        for value in [json!(null), json!(1), json!("all"), json!([{"all": []}])] {
            assert!(Filter::from_json(&value, &stats(), &ids).is_none(), "{value}");
        }
    }

    #[test]
    fn test_decode_compare_requires_all_three_keys() {
        let ids = FilterIdAllocator::new();
        assert!(Filter::from_json(&json!({"lhs": 1, "op": "="}), &stats(), &ids).is_none());
    }

    #[test]
    fn test_decode_compare_drops_unresolvable_parts() {
        let ids = FilterIdAllocator::new();
        let set = stats();
        for value in [
            json!({"lhs": "nope", "op": "=", "rhs": 1}),
            json!({"lhs": 1, "op": "==", "rhs": 1}),
            json!({"lhs": 1, "op": 5, "rhs": 1}),
            json!({"lhs": null, "op": "=", "rhs": 1}),
            json!({"lhs": 1, "op": "=", "rhs": [1]}),
        ] {
            assert!(Filter::from_json(&value, &set, &ids).is_none(), "{value}");
        }
    }

    #[test]
    fn test_decode_assigns_fresh_ids() {
        let ids = FilterIdAllocator::starting_at(100);
        let json = json!({"any": [{"lhs": "x", "op": ">", "rhs": 2}]});
        let decoded: Filter<Value> = Filter::from_json(&json, &stats(), &ids).unwrap();

        let child_id = decoded.conditions().unwrap()[0].id().unwrap();
        let root_id = decoded.id().unwrap();
        assert_ne!(child_id, root_id);
        assert!(child_id.0 >= 100 && root_id.0 >= 100);
    }

    #[test]
    fn test_from_json_str_errors() {
        let ids = FilterIdAllocator::new();
        let set = stats();

        let err = Filter::from_json_str("{not json", &set, &ids).unwrap_err();
        assert!(matches!(err, FilterError::Json { .. }));

        let err = Filter::from_json_str(r#"{"lhs": "nope", "op": "=", "rhs": 1}"#, &set, &ids)
            .unwrap_err();
        assert_eq!(err, FilterError::UndecodableRoot);
    }

    #[test]
    fn test_unresolved_identifiers_in_document_order() {
        let json = json!({
            "all": [
                {"lhs": "xx", "op": ">", "rhs": "y"},
                {"any": [{"lhs": "z", "op": "=", "rhs": "xx"}]}
            ]
        });
        assert_eq!(unresolved_identifiers(&json, &stats()), vec!["xx", "z"]);
    }

    #[test]
    fn test_check_identifiers_suggests() {
        let json = json!({"lhs": "xx", "op": ">", "rhs": 1});
        let err = check_identifiers(&json, &stats()).unwrap_err();
        assert_eq!(err, FilterError::unknown_stat("xx", Some("x")));
        assert_eq!(err.to_string(), "unknown stat 'xx'. Did you mean 'x'?");

        assert!(check_identifiers(&json!({"lhs": "x", "op": ">", "rhs": 1}), &stats()).is_ok());
    }
}
