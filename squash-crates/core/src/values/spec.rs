use std::collections::BTreeSet;
use std::iter::StepBy;
use std::ops::Range;
use std::ops::RangeInclusive;

/// The literal description of a set of values, before it is normalised into a
/// [`crate::values::Domain`].
///
/// Conversions exist from integers, strings, ranges and (nested) collections of those, so most
/// domains can be written as `Domain::new(0..10)` or `Domain::new(vec!["red", "green"])`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainSpec {
    Integer(i64),
    Symbol(String),
    /// The values `first, first + step, ...` up to and including `last`.
    Range { first: i64, last: i64, step: u64 },
    Collection(Vec<DomainSpec>),
}

impl DomainSpec {
    /// The values `first..=last` taken with the given step.
    pub fn range(first: i64, last: i64, step: u64) -> DomainSpec {
        DomainSpec::Range { first, last, step }
    }

    fn half_open(start: i64, end: i64) -> DomainSpec {
        if end <= start {
            return DomainSpec::Collection(vec![]);
        }

        DomainSpec::range(start, end - 1, 1)
    }
}

impl From<i64> for DomainSpec {
    fn from(value: i64) -> Self {
        DomainSpec::Integer(value)
    }
}

impl From<i32> for DomainSpec {
    fn from(value: i32) -> Self {
        DomainSpec::Integer(value.into())
    }
}

impl From<&str> for DomainSpec {
    fn from(value: &str) -> Self {
        DomainSpec::Symbol(value.to_owned())
    }
}

impl From<String> for DomainSpec {
    fn from(value: String) -> Self {
        DomainSpec::Symbol(value)
    }
}

impl From<Range<i64>> for DomainSpec {
    fn from(value: Range<i64>) -> Self {
        DomainSpec::half_open(value.start, value.end)
    }
}

impl From<Range<i32>> for DomainSpec {
    fn from(value: Range<i32>) -> Self {
        DomainSpec::half_open(value.start.into(), value.end.into())
    }
}

impl From<RangeInclusive<i64>> for DomainSpec {
    fn from(value: RangeInclusive<i64>) -> Self {
        DomainSpec::range(*value.start(), *value.end(), 1)
    }
}

impl From<RangeInclusive<i32>> for DomainSpec {
    fn from(value: RangeInclusive<i32>) -> Self {
        DomainSpec::range((*value.start()).into(), (*value.end()).into(), 1)
    }
}

impl From<StepBy<Range<i64>>> for DomainSpec {
    fn from(value: StepBy<Range<i64>>) -> Self {
        value.map(DomainSpec::Integer).collect()
    }
}

impl From<StepBy<RangeInclusive<i64>>> for DomainSpec {
    fn from(value: StepBy<RangeInclusive<i64>>) -> Self {
        value.map(DomainSpec::Integer).collect()
    }
}

impl<T: Into<DomainSpec>> From<Vec<T>> for DomainSpec {
    fn from(value: Vec<T>) -> Self {
        DomainSpec::Collection(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<DomainSpec>, const N: usize> From<[T; N]> for DomainSpec {
    fn from(value: [T; N]) -> Self {
        DomainSpec::Collection(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<DomainSpec>> From<BTreeSet<T>> for DomainSpec {
    fn from(value: BTreeSet<T>) -> Self {
        DomainSpec::Collection(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<DomainSpec>> FromIterator<T> for DomainSpec {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        DomainSpec::Collection(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_open_ranges_exclude_their_end() {
        assert_eq!(DomainSpec::range(0, 2, 1), DomainSpec::from(0..3));
        assert_eq!(DomainSpec::Collection(vec![]), DomainSpec::from(3..3));
    }

    #[test]
    fn stepped_iterators_list_their_values() {
        assert_eq!(
            DomainSpec::Collection(vec![
                DomainSpec::Integer(0),
                DomainSpec::Integer(3),
                DomainSpec::Integer(6),
            ]),
            DomainSpec::from((0_i64..=7).step_by(3))
        );
    }

    #[test]
    fn collections_keep_their_structure() {
        let spec = DomainSpec::from(vec![DomainSpec::from(1), DomainSpec::from(vec![2, 3])]);

        assert_eq!(
            DomainSpec::Collection(vec![
                DomainSpec::Integer(1),
                DomainSpec::Collection(vec![DomainSpec::Integer(2), DomainSpec::Integer(3)]),
            ]),
            spec
        );
    }
}
