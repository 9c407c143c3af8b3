use std::fmt::Display;

use crate::DomainError;

/// A contiguous range of integers `inf..sup` with both bounds included.
///
/// The bounds [`i64::MIN`] and [`i64::MAX`] stand for minus and plus infinity respectively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntegerInterval {
    inf: i64,
    sup: i64,
}

impl IntegerInterval {
    /// Create the interval `inf..sup`. The lower bound must be strictly smaller than the upper
    /// bound.
    pub fn new(inf: i64, sup: i64) -> Result<IntegerInterval, DomainError> {
        if inf >= sup {
            return Err(DomainError::InvalidInterval { inf, sup });
        }

        Ok(IntegerInterval { inf, sup })
    }

    pub(super) const fn unchecked(inf: i64, sup: i64) -> IntegerInterval {
        IntegerInterval { inf, sup }
    }

    /// The interval `-infinity..+infinity`.
    pub const fn unbounded() -> IntegerInterval {
        IntegerInterval {
            inf: i64::MIN,
            sup: i64::MAX,
        }
    }

    pub fn inf(&self) -> i64 {
        self.inf
    }

    pub fn sup(&self) -> i64 {
        self.sup
    }

    pub fn is_bounded(&self) -> bool {
        self.inf != i64::MIN && self.sup != i64::MAX
    }

    /// The number of values in the interval, or `None` if one of the bounds is infinite.
    pub fn width(&self) -> Option<u64> {
        if !self.is_bounded() {
            return None;
        }

        Some(self.sup.abs_diff(self.inf) + 1)
    }

    pub fn contains(&self, value: i64) -> bool {
        self.inf <= value && value <= self.sup
    }
}

impl Display for IntegerInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inf {
            i64::MIN => write!(f, "-infinity")?,
            inf => write!(f, "{inf}")?,
        }

        match self.sup {
            i64::MAX => write!(f, "..+infinity"),
            sup => write!(f, "..{sup}"),
        }
    }
}

/// A single element of a normalised [`crate::values::Domain`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueAtom {
    Integer(i64),
    Interval(IntegerInterval),
    Symbol(String),
}

impl ValueAtom {
    /// The smallest integer covered by the atom. Symbols have no integer value.
    pub fn lower_bound(&self) -> Option<i64> {
        match self {
            ValueAtom::Integer(value) => Some(*value),
            ValueAtom::Interval(interval) => Some(interval.inf()),
            ValueAtom::Symbol(_) => None,
        }
    }

    /// The largest integer covered by the atom. Symbols have no integer value.
    pub fn upper_bound(&self) -> Option<i64> {
        match self {
            ValueAtom::Integer(value) => Some(*value),
            ValueAtom::Interval(interval) => Some(interval.sup()),
            ValueAtom::Symbol(_) => None,
        }
    }
}

impl Display for ValueAtom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueAtom::Integer(value) => write!(f, "{value}"),
            ValueAtom::Interval(interval) => write!(f, "{interval}"),
            ValueAtom::Symbol(symbol) => write!(f, "{symbol}"),
        }
    }
}
