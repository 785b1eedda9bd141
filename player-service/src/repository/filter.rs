//! Filter conditions and their conjunction
//!
//! A [`Specification`] is an ordered list of [`Predicate`]s combined with
//! logical AND. A predicate is either a single [`FilterCondition`] or
//! [`Predicate::Unconstrained`], which behaves as boolean `true`.
//!
//! The same specification is evaluated in memory via
//! [`Specification::matches`] and translated into a SQL `WHERE` clause by the
//! PostgreSQL repository.
//!
//! ```rust
//! use player_service::players::PlayerField;
//! use player_service::repository::{FilterCondition, Predicate, Specification};
//!
//! let spec = Specification::where_(Predicate::Unconstrained)
//!     .and(Predicate::Where(FilterCondition::gte(PlayerField::Experience, 500_i64)));
//! assert_eq!(spec.conditions().count(), 1);
//! ```

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;

use crate::players::{Player, PlayerField};

/// Comparison operators for filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equal to (=)
    Equal,
    /// Greater than or equal to (>=)
    GreaterThanOrEqual,
    /// Less than or equal to (<=)
    LessThanOrEqual,
    /// Inclusive range; the value is a [`FilterValue::Range`]
    Between,
    /// Case-sensitive substring match
    Contains,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThanOrEqual => write!(f, "<="),
            Self::Between => write!(f, "BETWEEN"),
            Self::Contains => write!(f, "LIKE"),
        }
    }
}

/// A value that can be used in filter conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// String value
    String(String),
    /// 64-bit integer value
    Integer(i64),
    /// Boolean value
    Boolean(bool),
    /// UTC timestamp
    Timestamp(DateTime<Utc>),
    /// Inclusive lower and upper bound
    Range(Box<FilterValue>, Box<FilterValue>),
}

impl FilterValue {
    /// Order two values of the same kind; `None` for mismatched kinds and ranges
    pub fn compare(&self, other: &FilterValue) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Timestamp(t)
    }
}

/// A single filter condition on one player attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    /// The attribute to filter on
    pub field: PlayerField,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    /// Create a new filter condition
    pub fn new(field: PlayerField, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field,
            operator,
            value,
        }
    }

    /// field = value
    pub fn eq(field: PlayerField, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    /// field >= value
    pub fn gte(field: PlayerField, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThanOrEqual, value.into())
    }

    /// field <= value
    pub fn lte(field: PlayerField, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThanOrEqual, value.into())
    }

    /// low <= field <= high
    pub fn between(
        field: PlayerField,
        low: impl Into<FilterValue>,
        high: impl Into<FilterValue>,
    ) -> Self {
        Self::new(
            field,
            FilterOperator::Between,
            FilterValue::Range(Box::new(low.into()), Box::new(high.into())),
        )
    }

    /// field contains `needle` as a substring
    pub fn contains(field: PlayerField, needle: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Contains, FilterValue::String(needle.into()))
    }

    /// Evaluate this condition against a player
    pub fn matches(&self, player: &Player) -> bool {
        let actual = self.field.value_of(player);
        match (self.operator, &self.value) {
            (FilterOperator::Equal, expected) => actual == *expected,
            (FilterOperator::GreaterThanOrEqual, bound) => {
                matches!(actual.compare(bound), Some(Ordering::Greater | Ordering::Equal))
            }
            (FilterOperator::LessThanOrEqual, bound) => {
                matches!(actual.compare(bound), Some(Ordering::Less | Ordering::Equal))
            }
            (FilterOperator::Between, FilterValue::Range(low, high)) => {
                matches!(actual.compare(low), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(actual.compare(high), Some(Ordering::Less | Ordering::Equal))
            }
            (FilterOperator::Contains, FilterValue::String(needle)) => match actual {
                FilterValue::String(haystack) => haystack.contains(needle.as_str()),
                _ => false,
            },
            _ => false,
        }
    }
}

/// One conjunct of a [`Specification`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Places no constraint; always true
    Unconstrained,
    /// A concrete condition
    Where(FilterCondition),
}

impl Predicate {
    /// Evaluate against a player
    pub fn matches(&self, player: &Player) -> bool {
        match self {
            Self::Unconstrained => true,
            Self::Where(condition) => condition.matches(player),
        }
    }
}

impl From<FilterCondition> for Predicate {
    fn from(condition: FilterCondition) -> Self {
        Self::Where(condition)
    }
}

/// Conjunction of predicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specification {
    predicates: Vec<Predicate>,
}

impl Specification {
    /// A specification matching every player
    pub fn all() -> Self {
        Self::default()
    }

    /// Start a conjunction from its first predicate
    pub fn where_(predicate: impl Into<Predicate>) -> Self {
        Self {
            predicates: vec![predicate.into()],
        }
    }

    /// Add a predicate to the conjunction
    #[must_use]
    pub fn and(mut self, predicate: impl Into<Predicate>) -> Self {
        self.predicates.push(predicate.into());
        self
    }

    /// All predicates in insertion order, unconstrained ones included
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Only the concrete conditions
    pub fn conditions(&self) -> impl Iterator<Item = &FilterCondition> {
        self.predicates.iter().filter_map(|p| match p {
            Predicate::Where(condition) => Some(condition),
            Predicate::Unconstrained => None,
        })
    }

    /// True when every predicate holds for `player`
    pub fn matches(&self, player: &Player) -> bool {
        self.predicates.iter().all(|p| p.matches(player))
    }
}
