use std::fmt::Display;
use std::ops::RangeInclusive;

use itertools::Itertools;

use crate::TableTypeError;

/// One position in a tuple of an extension constraint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableEntry {
    Integer(i64),
    Symbol(String),
    /// Matches every value of the column, written `*`.
    Any,
    /// Matches every value of the column in `inf..=sup`.
    Range(i64, i64),
}

/// Shorthand for [`TableEntry::Any`].
pub const ANY: TableEntry = TableEntry::Any;

impl TableEntry {
    pub fn range(range: RangeInclusive<i64>) -> TableEntry {
        TableEntry::Range(*range.start(), *range.end())
    }

    fn is_symbolic(&self) -> Option<bool> {
        match self {
            TableEntry::Integer(_) | TableEntry::Range(..) => Some(false),
            TableEntry::Symbol(_) => Some(true),
            TableEntry::Any => None,
        }
    }
}

impl From<i64> for TableEntry {
    fn from(value: i64) -> Self {
        TableEntry::Integer(value)
    }
}

impl From<i32> for TableEntry {
    fn from(value: i32) -> Self {
        TableEntry::Integer(i64::from(value))
    }
}

impl From<&str> for TableEntry {
    fn from(value: &str) -> Self {
        if value == "*" {
            TableEntry::Any
        } else {
            TableEntry::Symbol(value.to_owned())
        }
    }
}

impl From<RangeInclusive<i64>> for TableEntry {
    fn from(value: RangeInclusive<i64>) -> Self {
        TableEntry::range(value)
    }
}

impl Display for TableEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableEntry::Integer(value) => write!(f, "{value}"),
            TableEntry::Symbol(symbol) => write!(f, "{symbol}"),
            TableEntry::Any => write!(f, "*"),
            TableEntry::Range(inf, sup) => write!(f, "{inf}..{sup}"),
        }
    }
}

/// Whether the tuples of a table are the allowed or the forbidden combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TablePolarity {
    Supports,
    Conflicts,
}

impl TablePolarity {
    pub fn name(&self) -> &'static str {
        match self {
            TablePolarity::Supports => "supports",
            TablePolarity::Conflicts => "conflicts",
        }
    }
}

/// The tuples of an extension constraint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Table {
    pub polarity: TablePolarity,
    pub tuples: Vec<Vec<TableEntry>>,
}

impl Table {
    /// A table listing the allowed tuples.
    ///
    /// ```
    /// # use squash_core::constraints::Table;
    /// # use squash_core::constraints::TableEntry;
    /// # use squash_core::constraints::ANY;
    /// let table = Table::supports([vec![TableEntry::from(0), ANY], vec![1.into(), 1.into()]]);
    /// assert!(table.contains_any());
    /// ```
    pub fn supports<Tuple, Entry>(tuples: impl IntoIterator<Item = Tuple>) -> Table
    where
        Tuple: IntoIterator<Item = Entry>,
        Entry: Into<TableEntry>,
    {
        Table::new(TablePolarity::Supports, tuples)
    }

    /// A table listing the forbidden tuples.
    pub fn conflicts<Tuple, Entry>(tuples: impl IntoIterator<Item = Tuple>) -> Table
    where
        Tuple: IntoIterator<Item = Entry>,
        Entry: Into<TableEntry>,
    {
        Table::new(TablePolarity::Conflicts, tuples)
    }

    fn new<Tuple, Entry>(polarity: TablePolarity, tuples: impl IntoIterator<Item = Tuple>) -> Table
    where
        Tuple: IntoIterator<Item = Entry>,
        Entry: Into<TableEntry>,
    {
        Table {
            polarity,
            tuples: tuples
                .into_iter()
                .map(|tuple| tuple.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn contains_any(&self) -> bool {
        self.tuples.iter().flatten().any(|entry| *entry == TableEntry::Any)
    }

    /// Check that no tuple mixes integers with symbols. Returns for every column whether it is
    /// symbolic, or `None` if the column only holds wildcards.
    pub(crate) fn column_kinds(&self, arity: usize) -> Result<Vec<Option<bool>>, TableTypeError> {
        let mut kinds = vec![None; arity];

        for tuple in &self.tuples {
            let tuple_kinds = tuple.iter().filter_map(TableEntry::is_symbolic);
            if !tuple_kinds.clone().all_equal() {
                return Err(TableTypeError::HeterogeneousTuple {
                    tuple: format!("({})", tuple.iter().join(",")),
                });
            }

            for (column, entry) in tuple.iter().enumerate() {
                let Some(symbolic) = entry.is_symbolic() else {
                    continue;
                };

                match kinds[column] {
                    None => kinds[column] = Some(symbolic),
                    Some(known) if known != symbolic => {
                        return Err(TableTypeError::ColumnKind { column });
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(kinds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_strings_become_wildcards() {
        let table = Table::supports([["a", "*"]]);

        assert_eq!(
            vec![TableEntry::Symbol("a".to_owned()), TableEntry::Any],
            table.tuples[0]
        );
    }

    #[test]
    fn mixed_tuples_are_rejected() {
        let table = Table::supports([vec![TableEntry::from(1), TableEntry::from("a")]]);

        assert_eq!(
            Err(TableTypeError::HeterogeneousTuple {
                tuple: "(1,a)".to_owned()
            }),
            table.column_kinds(2)
        );
    }

    #[test]
    fn columns_keep_one_kind() {
        let table = Table::conflicts([vec![TableEntry::from(1)], vec![TableEntry::from("a")]]);

        assert_eq!(
            Err(TableTypeError::ColumnKind { column: 0 }),
            table.column_kinds(1)
        );
    }

    #[test]
    fn wildcard_columns_have_no_kind() {
        let table = Table::supports([[ANY, TableEntry::from(2)]]);

        assert_eq!(Ok(vec![None, Some(false)]), table.column_kinds(2));
    }
}
