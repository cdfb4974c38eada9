//! Search filter predicates.
//!
//! A [`Predicate`] is a backend-neutral expression tree describing which
//! resources an actor may see in a listing. The engine never executes it
//! against a store; callers translate it into their own query language.
//! [`Predicate::matches`] is a reference interpreter over a single
//! [`Resource`], used to check that the bulk and single-resource paths agree.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use crate::resource::{truthy, value_text, Resource};

/// A filter expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Matches every resource.
    MatchAll,

    /// Matches no resource.
    MatchNone,

    /// The field at the dotted path equals `value`, or contains it if the
    /// field is a list. An object `value` matches any object carrying at
    /// least its keys. A boolean `value` tests the truthiness of the whole
    /// field, with a missing field counting as false.
    Match { field: String, value: Value },

    /// Negation.
    Not { predicate: Box<Predicate> },

    /// Conjunction.
    And { predicates: Vec<Predicate> },

    /// Disjunction.
    Or { predicates: Vec<Predicate> },
}

impl Predicate {
    /// A field match.
    pub fn field(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Match {
            field: field.into(),
            value: value.into(),
        }
    }

    /// OR-combine predicates. No predicates at all means no restriction.
    pub fn any_of(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        predicates
            .into_iter()
            .reduce(|acc, p| acc | p)
            .unwrap_or(Predicate::MatchAll)
    }

    /// AND-combine predicates. No predicates at all means no restriction.
    pub fn all_of(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        predicates
            .into_iter()
            .reduce(|acc, p| acc & p)
            .unwrap_or(Predicate::MatchAll)
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Predicate::MatchAll)
    }

    pub fn is_match_none(&self) -> bool {
        matches!(self, Predicate::MatchNone)
    }

    /// Evaluate the predicate against a single resource.
    pub fn matches(&self, resource: &Resource) -> bool {
        match self {
            Predicate::MatchAll => true,
            Predicate::MatchNone => false,
            Predicate::Match {
                field,
                value: Value::Bool(wanted),
            } => resource.get(field).map_or(false, truthy) == *wanted,
            Predicate::Match { field, value } => match resource.get(field) {
                None => false,
                Some(Value::Array(items)) => items.iter().any(|item| value_eq(item, value)),
                Some(found) => value_eq(found, value),
            },
            Predicate::Not { predicate } => !predicate.matches(resource),
            Predicate::And { predicates } => predicates.iter().all(|p| p.matches(resource)),
            Predicate::Or { predicates } => predicates.iter().any(|p| p.matches(resource)),
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            Predicate::MatchAll | Predicate::MatchNone | Predicate::Match { .. } => 1,
            Predicate::Not { predicate } => 1 + predicate.node_count(),
            Predicate::And { predicates } | Predicate::Or { predicates } => {
                1 + predicates.iter().map(Predicate::node_count).sum::<usize>()
            }
        }
    }
}

/// Equality with search-engine `match` coercion: a number and a string are
/// equal when their text is, and objects compare on the wanted keys only.
fn value_eq(found: &Value, wanted: &Value) -> bool {
    if found == wanted {
        return true;
    }
    match (found, wanted) {
        (Value::Object(found), Value::Object(wanted)) => wanted
            .iter()
            .all(|(key, value)| found.get(key).is_some_and(|f| value_eq(f, value))),
        _ => match (value_text(found), value_text(wanted)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

impl BitOr for Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Predicate) -> Predicate {
        match (self, rhs) {
            (Predicate::Or { mut predicates }, Predicate::Or { predicates: rest }) => {
                predicates.extend(rest);
                Predicate::Or { predicates }
            }
            (Predicate::Or { mut predicates }, other) => {
                predicates.push(other);
                Predicate::Or { predicates }
            }
            (other, Predicate::Or { predicates: rest }) => {
                let mut predicates = Vec::with_capacity(rest.len() + 1);
                predicates.push(other);
                predicates.extend(rest);
                Predicate::Or { predicates }
            }
            (lhs, rhs) => Predicate::Or {
                predicates: vec![lhs, rhs],
            },
        }
    }
}

impl BitAnd for Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Predicate) -> Predicate {
        match (self, rhs) {
            (Predicate::And { mut predicates }, Predicate::And { predicates: rest }) => {
                predicates.extend(rest);
                Predicate::And { predicates }
            }
            (Predicate::And { mut predicates }, other) => {
                predicates.push(other);
                Predicate::And { predicates }
            }
            (other, Predicate::And { predicates: rest }) => {
                let mut predicates = Vec::with_capacity(rest.len() + 1);
                predicates.push(other);
                predicates.extend(rest);
                Predicate::And { predicates }
            }
            (lhs, rhs) => Predicate::And {
                predicates: vec![lhs, rhs],
            },
        }
    }
}

impl Not for Predicate {
    type Output = Predicate;

    /// Negation folds the constants and double negation; anything else is
    /// wrapped.
    fn not(self) -> Predicate {
        match self {
            Predicate::MatchAll => Predicate::MatchNone,
            Predicate::MatchNone => Predicate::MatchAll,
            Predicate::Not { predicate } => *predicate,
            other => Predicate::Not {
                predicate: Box::new(other),
            },
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::MatchAll => write!(f, "*"),
            Predicate::MatchNone => write!(f, "!*"),
            Predicate::Match { field, value } => write!(f, "{}:{}", field, value),
            Predicate::Not { predicate } => write!(f, "NOT {}", predicate),
            Predicate::And { predicates } => write_joined(f, predicates, " AND "),
            Predicate::Or { predicates } => write_joined(f, predicates, " OR "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, predicates: &[Predicate], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, p) in predicates.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", p)?;
    }
    write!(f, ")")
}
