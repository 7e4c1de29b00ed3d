//! The filter tree: `ALL`/`ANY` groups and comparison leaves.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::operator::CompareOp;
use crate::stat::StatRef;

/// Identity of a filter node, for UI bookkeeping only.
///
/// Ids take no part in equality, evaluation or serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilterId(pub u64);

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing [`FilterId`]s.
///
/// Constructors and decoders take an allocator by reference, so there is no
/// process-wide counter. The counter is atomic, which lets one allocator be
/// shared between threads.
#[derive(Debug, Default)]
pub struct FilterIdAllocator {
    next: AtomicU64,
}

impl FilterIdAllocator {
    /// Creates an allocator whose first id is 0.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates an allocator whose first id is `start`.
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Allocates a fresh id.
    pub fn next_id(&self) -> FilterId {
        FilterId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// One side of a comparison.
pub enum Operand<T> {
    /// Not configured yet. A comparison with an unset side always matches.
    Unset,

    /// A literal number.
    Number(f64),

    /// A stat read from the record under evaluation.
    Stat(StatRef<T>),
}

impl<T> Operand<T> {
    /// Returns true for [`Operand::Unset`].
    pub fn is_unset(&self) -> bool {
        matches!(self, Operand::Unset)
    }

    /// Returns the stat, if this operand is one.
    pub fn as_stat(&self) -> Option<&StatRef<T>> {
        match self {
            Operand::Stat(stat) => Some(stat),
            _ => None,
        }
    }
}

impl<T> Clone for Operand<T> {
    fn clone(&self) -> Self {
        match self {
            Operand::Unset => Operand::Unset,
            Operand::Number(n) => Operand::Number(*n),
            Operand::Stat(stat) => Operand::Stat(Arc::clone(stat)),
        }
    }
}

// Stats compare by identifier; two handles to the same-named stat are the
// same operand.
impl<T> PartialEq for Operand<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Operand::Unset, Operand::Unset) => true,
            (Operand::Number(a), Operand::Number(b)) => a == b,
            (Operand::Stat(a), Operand::Stat(b)) => a.identifier_name() == b.identifier_name(),
            _ => false,
        }
    }
}

impl<T> fmt::Debug for Operand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Unset => write!(f, "Unset"),
            Operand::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Operand::Stat(stat) => f.debug_tuple("Stat").field(&stat.identifier_name()).finish(),
        }
    }
}

impl<T> fmt::Display for Operand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Unset => write!(f, "?"),
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Stat(stat) => write!(f, "{}", stat.identifier_name()),
        }
    }
}

impl<T> From<f64> for Operand<T> {
    fn from(n: f64) -> Self {
        Operand::Number(n)
    }
}

impl<T> From<StatRef<T>> for Operand<T> {
    fn from(stat: StatRef<T>) -> Self {
        Operand::Stat(stat)
    }
}

impl<T> From<Option<f64>> for Operand<T> {
    fn from(n: Option<f64>) -> Self {
        n.map_or(Operand::Unset, Operand::Number)
    }
}

/// A boolean expression over records of type `T`.
///
/// Trees are immutable: replacing a child means building a new parent.
/// Equality ignores node ids.
pub enum Filter<T> {
    /// Matches when every condition matches. An empty list matches everything.
    All {
        /// Node identity.
        id: Option<FilterId>,
        /// Child filters.
        conditions: Vec<Filter<T>>,
    },

    /// Matches when any condition matches. An empty list also matches everything.
    Any {
        /// Node identity.
        id: Option<FilterId>,
        /// Child filters.
        conditions: Vec<Filter<T>>,
    },

    /// Compares two operands.
    Compare {
        /// Node identity.
        id: Option<FilterId>,
        /// Left-hand side.
        lhs: Operand<T>,
        /// Operator.
        op: CompareOp,
        /// Right-hand side.
        rhs: Operand<T>,
    },
}

impl<T> Filter<T> {
    /// Creates the canonical empty filter: an `ALL` group with no conditions.
    pub fn empty(ids: &FilterIdAllocator) -> Self {
        Filter::all(ids, Vec::new())
    }

    /// Creates an `ALL` group.
    pub fn all(ids: &FilterIdAllocator, conditions: Vec<Filter<T>>) -> Self {
        Filter::All {
            id: Some(ids.next_id()),
            conditions,
        }
    }

    /// Creates an `ANY` group.
    pub fn any(ids: &FilterIdAllocator, conditions: Vec<Filter<T>>) -> Self {
        Filter::Any {
            id: Some(ids.next_id()),
            conditions,
        }
    }

    /// Creates a comparison leaf.
    pub fn compare(
        ids: &FilterIdAllocator,
        lhs: impl Into<Operand<T>>,
        op: CompareOp,
        rhs: impl Into<Operand<T>>,
    ) -> Self {
        Filter::Compare {
            id: Some(ids.next_id()),
            lhs: lhs.into(),
            op,
            rhs: rhs.into(),
        }
    }

    /// Returns the node's id, if it has one.
    pub fn id(&self) -> Option<FilterId> {
        match self {
            Filter::All { id, .. } | Filter::Any { id, .. } | Filter::Compare { id, .. } => *id,
        }
    }

    /// Returns the child conditions of a group, or `None` for a comparison.
    pub fn conditions(&self) -> Option<&[Filter<T>]> {
        match self {
            Filter::All { conditions, .. } | Filter::Any { conditions, .. } => Some(conditions),
            Filter::Compare { .. } => None,
        }
    }

    /// Returns true for a group with no conditions.
    ///
    /// Callers use this to detect "no filtering configured".
    pub fn is_empty(&self) -> bool {
        self.conditions().is_some_and(|c| c.is_empty())
    }

    /// Returns true if no comparison in the tree has an unset operand.
    pub fn is_configured(&self) -> bool {
        match self {
            Filter::All { conditions, .. } | Filter::Any { conditions, .. } => {
                conditions.iter().all(Filter::is_configured)
            }
            Filter::Compare { lhs, rhs, .. } => !lhs.is_unset() && !rhs.is_unset(),
        }
    }

    /// Returns the number of nodes in the tree, groups included.
    pub fn node_count(&self) -> usize {
        match self {
            Filter::All { conditions, .. } | Filter::Any { conditions, .. } => {
                1 + conditions.iter().map(Filter::node_count).sum::<usize>()
            }
            Filter::Compare { .. } => 1,
        }
    }

    /// Returns every stat the tree reads, once each, in first-use order.
    pub fn referenced_stats(&self) -> Vec<StatRef<T>> {
        let mut stats = Vec::new();
        self.collect_stats(&mut stats);
        stats
    }

    fn collect_stats(&self, stats: &mut Vec<StatRef<T>>) {
        match self {
            Filter::All { conditions, .. } | Filter::Any { conditions, .. } => {
                for condition in conditions {
                    condition.collect_stats(stats);
                }
            }
            Filter::Compare { lhs, rhs, .. } => {
                for stat in [lhs, rhs].into_iter().filter_map(Operand::as_stat) {
                    let name = stat.identifier_name();
                    if !stats.iter().any(|s| s.identifier_name() == name) {
                        stats.push(Arc::clone(stat));
                    }
                }
            }
        }
    }

    /// Rebuilds the tree without comparisons that have an unset operand.
    ///
    /// The result matches exactly the same records: an unset comparison
    /// always matches, so it is dropped from an `ALL` group and makes an
    /// `ANY` group match everything. Surviving nodes keep their ids. If
    /// nothing is left, the result is an empty `ALL` carrying the root's id.
    pub fn without_unconfigured(&self) -> Filter<T> {
        self.prune_unconfigured().unwrap_or_else(|| Filter::All {
            id: self.id(),
            conditions: Vec::new(),
        })
    }

    /// `None` means the subtree matches every record.
    fn prune_unconfigured(&self) -> Option<Filter<T>> {
        match self {
            Filter::All { id, conditions } => Some(Filter::All {
                id: *id,
                conditions: conditions
                    .iter()
                    .filter_map(Filter::prune_unconfigured)
                    .collect(),
            }),
            Filter::Any { id, conditions } => {
                let pruned: Option<Vec<_>> =
                    conditions.iter().map(Filter::prune_unconfigured).collect();
                pruned.map(|conditions| Filter::Any { id: *id, conditions })
            }
            Filter::Compare { lhs, rhs, .. } if lhs.is_unset() || rhs.is_unset() => None,
            Filter::Compare { .. } => Some(self.clone()),
        }
    }
}

impl<T> Clone for Filter<T> {
    fn clone(&self) -> Self {
        match self {
            Filter::All { id, conditions } => Filter::All {
                id: *id,
                conditions: conditions.clone(),
            },
            Filter::Any { id, conditions } => Filter::Any {
                id: *id,
                conditions: conditions.clone(),
            },
            Filter::Compare { id, lhs, op, rhs } => Filter::Compare {
                id: *id,
                lhs: lhs.clone(),
                op: *op,
                rhs: rhs.clone(),
            },
        }
    }
}

impl<T> PartialEq for Filter<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Filter::All { conditions: a, .. }, Filter::All { conditions: b, .. })
            | (Filter::Any { conditions: a, .. }, Filter::Any { conditions: b, .. }) => a == b,
            (
                Filter::Compare {
                    lhs: l1,
                    op: o1,
                    rhs: r1,
                    ..
                },
                Filter::Compare {
                    lhs: l2,
                    op: o2,
                    rhs: r2,
                    ..
                },
            ) => l1 == l2 && o1 == o2 && r1 == r2,
            _ => false,
        }
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All { id, conditions } => f
                .debug_struct("All")
                .field("id", id)
                .field("conditions", conditions)
                .finish(),
            Filter::Any { id, conditions } => f
                .debug_struct("Any")
                .field("id", id)
                .field("conditions", conditions)
                .finish(),
            Filter::Compare { id, lhs, op, rhs } => f
                .debug_struct("Compare")
                .field("id", id)
                .field("lhs", lhs)
                .field("op", op)
                .field("rhs", rhs)
                .finish(),
        }
    }
}

/// Human-readable form, e.g. `ALL(auto > 10, ANY(rank ≤ 3, total ≥ 120))`.
impl<T> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (tag, conditions) = match self {
            Filter::Compare { lhs, op, rhs, .. } => return write!(f, "{lhs} {op} {rhs}"),
            Filter::All { conditions, .. } => ("ALL", conditions),
            Filter::Any { conditions, .. } => ("ANY", conditions),
        };

        write!(f, "{tag}(")?;
        for (i, condition) in conditions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{condition}")?;
        }
        write!(f, ")")
    }
}
