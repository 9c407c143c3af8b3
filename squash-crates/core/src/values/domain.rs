use std::fmt::Display;

use itertools::Itertools;

use super::DomainSpec;
use super::IntegerInterval;
use super::ValueAtom;
use crate::DomainError;

/// The kind of values a [`Domain`] holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainKind {
    Integer,
    Symbolic,
}

/// The normalised set of values a variable can take.
///
/// A domain is never empty and never mixes integers with symbols. Integer values are stored as
/// maximal runs of consecutive values: a run of more than two values becomes an
/// [`IntegerInterval`], shorter runs are kept as single integers. Symbols are sorted and
/// deduplicated. As a consequence, two domains built from inputs describing the same values are
/// equal, and the derived [`Ord`] gives a total order on domains.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain {
    atoms: Vec<ValueAtom>,
}

impl Domain {
    /// Normalise the given values into a domain.
    ///
    /// # Example
    /// ```
    /// # use squash_core::values::Domain;
    /// let domain = Domain::new(vec![3, 1, 2, 7]).unwrap();
    /// assert_eq!("1..3 7", domain.to_string());
    ///
    /// assert!(Domain::new(0..2).unwrap().is_binary());
    /// ```
    pub fn new(spec: impl Into<DomainSpec>) -> Result<Domain, DomainError> {
        let mut runs = vec![];
        let mut symbols = vec![];
        collect(spec.into(), &mut runs, &mut symbols);

        match (runs.is_empty(), symbols.is_empty()) {
            (true, true) => Err(DomainError::Empty),
            (false, false) => Err(DomainError::MixedKind),
            (false, true) => Ok(Domain::from_runs(runs)),
            (true, false) => Ok(Domain {
                atoms: symbols
                    .into_iter()
                    .sorted()
                    .dedup()
                    .map(ValueAtom::Symbol)
                    .collect(),
            }),
        }
    }

    /// The integer domain `-infinity..+infinity`.
    pub fn unbounded() -> Domain {
        Domain {
            atoms: vec![ValueAtom::Interval(IntegerInterval::unbounded())],
        }
    }

    /// Create the domain containing exactly the given integers.
    pub fn from_integers(values: impl IntoIterator<Item = i64>) -> Result<Domain, DomainError> {
        let runs = values
            .into_iter()
            .map(|value| (value, value))
            .collect::<Vec<_>>();

        if runs.is_empty() {
            return Err(DomainError::Empty);
        }

        Ok(Domain::from_runs(runs))
    }

    /// Create the domain `inf..=sup`; the bounds may be infinite.
    pub(crate) fn between(inf: i64, sup: i64) -> Result<Domain, DomainError> {
        if inf > sup {
            return Err(DomainError::Empty);
        }

        Ok(Domain::from_runs(vec![(inf, sup)]))
    }

    /// The union of the given integer domains, or `None` if there are none.
    pub(crate) fn union<'a>(domains: impl IntoIterator<Item = &'a Domain>) -> Option<Domain> {
        let mut runs = vec![];
        let mut symbols = vec![];

        for domain in domains {
            for atom in &domain.atoms {
                match atom {
                    ValueAtom::Integer(value) => runs.push((*value, *value)),
                    ValueAtom::Interval(interval) => runs.push((interval.inf(), interval.sup())),
                    ValueAtom::Symbol(symbol) => symbols.push(DomainSpec::Symbol(symbol.clone())),
                }
            }
        }

        if !runs.is_empty() {
            return Some(Domain::from_runs(runs));
        }

        Domain::new(DomainSpec::Collection(symbols)).ok()
    }

    /// The integers of the domain within `inf..=sup`, or `None` if there are none.
    pub(crate) fn restricted_to(&self, inf: i64, sup: i64) -> Option<Domain> {
        let runs = self
            .atoms
            .iter()
            .filter_map(|atom| {
                let lower = atom.lower_bound()?.max(inf);
                let upper = atom.upper_bound()?.min(sup);
                (lower <= upper).then_some((lower, upper))
            })
            .collect::<Vec<_>>();

        (!runs.is_empty()).then(|| Domain::from_runs(runs))
    }

    fn from_runs(mut runs: Vec<(i64, i64)>) -> Domain {
        runs.sort_unstable();

        let mut merged: Vec<(i64, i64)> = Vec::with_capacity(runs.len());
        for (inf, sup) in runs {
            match merged.last_mut() {
                Some(last) if i128::from(inf) <= i128::from(last.1) + 1 => {
                    last.1 = last.1.max(sup);
                }
                _ => merged.push((inf, sup)),
            }
        }

        let atoms = merged
            .into_iter()
            .flat_map(|(inf, sup)| {
                if i128::from(sup) - i128::from(inf) >= 2 {
                    vec![ValueAtom::Interval(IntegerInterval::unchecked(inf, sup))]
                } else {
                    (inf..=sup).map(ValueAtom::Integer).collect()
                }
            })
            .collect();

        Domain { atoms }
    }

    pub fn atoms(&self) -> &[ValueAtom] {
        &self.atoms
    }

    pub fn kind(&self) -> DomainKind {
        match self.atoms.first() {
            Some(ValueAtom::Symbol(_)) => DomainKind::Symbolic,
            _ => DomainKind::Integer,
        }
    }

    /// Returns true if the domain is exactly `{0, 1}`.
    pub fn is_binary(&self) -> bool {
        self.atoms == [ValueAtom::Integer(0), ValueAtom::Integer(1)]
    }

    /// The number of values in the domain, or `None` if it is unbounded.
    pub fn size(&self) -> Option<u64> {
        self.atoms.iter().try_fold(0_u64, |size, atom| match atom {
            ValueAtom::Interval(interval) => size.checked_add(interval.width()?),
            ValueAtom::Integer(_) | ValueAtom::Symbol(_) => size.checked_add(1),
        })
    }

    /// The smallest integer in the domain. `None` for symbolic domains.
    pub fn smallest(&self) -> Option<i64> {
        self.atoms.first().and_then(ValueAtom::lower_bound)
    }

    /// The largest integer in the domain. `None` for symbolic domains.
    pub fn greatest(&self) -> Option<i64> {
        self.atoms.last().and_then(ValueAtom::upper_bound)
    }

    pub fn contains(&self, value: i64) -> bool {
        self.atoms.iter().any(|atom| match atom {
            ValueAtom::Integer(integer) => *integer == value,
            ValueAtom::Interval(interval) => interval.contains(value),
            ValueAtom::Symbol(_) => false,
        })
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.atoms
            .iter()
            .any(|atom| matches!(atom, ValueAtom::Symbol(s) if s == symbol))
    }

    /// Iterate over the integers in the domain in increasing order.
    ///
    /// For a domain with an infinite bound the iterator does not end.
    pub fn integer_values(&self) -> impl Iterator<Item = i64> + '_ {
        self.atoms
            .iter()
            .filter_map(|atom| match atom {
                ValueAtom::Integer(value) => Some(*value..=*value),
                ValueAtom::Interval(interval) => Some(interval.inf()..=interval.sup()),
                ValueAtom::Symbol(_) => None,
            })
            .flatten()
    }

    /// Iterate over the symbols of a symbolic domain in lexicographic order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.atoms.iter().filter_map(|atom| match atom {
            ValueAtom::Symbol(symbol) => Some(symbol.as_str()),
            _ => None,
        })
    }
}

fn collect(spec: DomainSpec, runs: &mut Vec<(i64, i64)>, symbols: &mut Vec<String>) {
    match spec {
        DomainSpec::Integer(value) => runs.push((value, value)),
        DomainSpec::Symbol(symbol) => symbols.push(symbol),
        DomainSpec::Range { first, last, .. } if first > last => {}
        DomainSpec::Range { first, last, step } if step <= 1 => runs.push((first, last)),
        DomainSpec::Range { first, last, step } => {
            let step = usize::try_from(step).unwrap_or(usize::MAX);
            runs.extend((first..=last).step_by(step).map(|value| (value, value)));
        }
        DomainSpec::Collection(items) => {
            for item in items {
                collect(item, runs, symbols);
            }
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.atoms.iter().join(" "))
    }
}
