//! Turn the tables of extension constraints into the rows which are written.
//!
//! Ranges are always expanded, over the values of their column domain when it is bounded. A range
//! without such a domain is expanded over its own values, up to a limit. Wildcards are kept in
//! [`TableForm::Compact`] and expanded against the domain of their column in
//! [`TableForm::Expanded`]; a table which still holds a wildcard is marked as starred. The rows
//! are sorted and duplicates are removed.
use itertools::Itertools;
use log::debug;
use log::warn;

use super::shape::Cell;
use super::shape::CompiledEntry;
use super::shape::Content;
use super::shape::Parameter;
use super::shape::Shape;
use super::CompilationContext;
use crate::constraints::Table;
use crate::constraints::TableEntry;
use crate::model::VariableStore;
use crate::options::TableForm;
use crate::values::Domain;
use crate::values::DomainKind;
use crate::variables::VariableId;
use crate::TableTypeError;

/// Wildcards are only expanded against domains with at most this many values.
const EXPANSION_LIMIT: u64 = 1_000;

/// Ranges without a bounded column domain are only expanded up to this many values.
const RANGE_EXPANSION_LIMIT: i128 = 100_000;

pub(crate) fn run(context: &mut CompilationContext<'_>) -> Result<(), TableTypeError> {
    let mut materializer = Materializer {
        form: context.options.table_form,
        variables: &context.variables,
        rows: 0,
    };

    for entry in &mut context.compiled {
        materializer.visit(entry)?;
    }

    context.statistics.materialized_tuples = materializer.rows;
    debug!("Materialized {} tuples", materializer.rows);
    Ok(())
}

struct Materializer<'a> {
    form: TableForm,
    variables: &'a VariableStore,
    rows: usize,
}

impl Materializer<'_> {
    fn visit(&mut self, entry: &mut CompiledEntry) -> Result<(), TableTypeError> {
        match entry {
            CompiledEntry::Constraint { shape, .. } => {
                self.materialize(shape, |parameter| match parameter {
                    Parameter::Variable(variable) => vec![*variable],
                    _ => vec![],
                })
            }
            CompiledEntry::Group {
                template,
                arguments,
                ..
            } => {
                self.materialize(template, |parameter| match parameter {
                    Parameter::Variable(variable) => vec![*variable],
                    Parameter::Placeholder(index) => arguments
                        .iter()
                        .filter_map(|instance| match instance.get(*index) {
                            Some(Parameter::Variable(variable)) => Some(*variable),
                            _ => None,
                        })
                        .collect(),
                    _ => vec![],
                })
            }
            CompiledEntry::Slide { template, list, .. } => {
                let list = list.clone();
                self.materialize(template, |_| list.clone())
            }
            CompiledEntry::Block { entries, .. } => {
                for entry in entries {
                    self.visit(entry)?;
                }
                Ok(())
            }
        }
    }

    /// Materialize the table of `shape`, if it has one. `variables_of` gives the variables a
    /// position of the list stands for.
    fn materialize(
        &mut self,
        shape: &mut Shape,
        variables_of: impl Fn(&Parameter) -> Vec<VariableId>,
    ) -> Result<(), TableTypeError> {
        if shape.name != "extension" {
            return Ok(());
        }

        let Some((list, rest)) = shape.arguments.split_first_mut() else {
            return Ok(());
        };
        let Some(argument) = rest.first_mut() else {
            return Ok(());
        };
        let (Content::Parameters(list), Content::Table(table)) = (&list.content, &argument.content)
        else {
            return Ok(());
        };

        // `%...` stands for the whole argument list of every instance.
        let list = match list.as_slice() {
            [Parameter::AllPlaceholders] => {
                let arity = table.tuples.first().map_or(0, Vec::len);
                (0..arity).map(Parameter::Placeholder).collect()
            }
            list => list.to_vec(),
        };
        let columns = list
            .iter()
            .map(|parameter| self.union_of(&variables_of(parameter)))
            .collect::<Vec<_>>();

        let rows = self.rows_of(table, Some(columns.as_slice()))?;
        let starred = rows.iter().flatten().any(|cell| *cell == Cell::Any);
        self.rows += rows.len();
        argument.content = Content::Rows(rows);

        if starred {
            shape.attributes.push(("starred", "true".to_owned()));
        }
        Ok(())
    }

    fn union_of(&self, variables: &[VariableId]) -> Option<Domain> {
        Domain::union(
            variables
                .iter()
                .map(|variable| self.variables.domain_of(*variable)),
        )
    }

    fn rows_of(
        &self,
        table: &Table,
        columns: Option<&[Option<Domain>]>,
    ) -> Result<Vec<Vec<Cell>>, TableTypeError> {
        let mut rows = vec![];

        for tuple in &table.tuples {
            let cells = tuple
                .iter()
                .enumerate()
                .map(|(column, entry)| {
                    let domain = columns
                        .and_then(|columns| columns.get(column))
                        .and_then(Option::as_ref);
                    self.cells_of(entry, domain)
                })
                .collect::<Result<Vec<_>, _>>()?;

            rows.extend(cells.into_iter().multi_cartesian_product());
        }

        Ok(rows.into_iter().sorted().dedup().collect())
    }

    fn cells_of(
        &self,
        entry: &TableEntry,
        domain: Option<&Domain>,
    ) -> Result<Vec<Cell>, TableTypeError> {
        let cells = match entry {
            TableEntry::Integer(value) => vec![Cell::Integer(*value)],
            TableEntry::Symbol(symbol) => vec![Cell::Symbol(symbol.clone())],
            TableEntry::Range(inf, sup) => range_cells(*inf, *sup, domain)?,
            TableEntry::Any => match (self.form, domain) {
                (TableForm::Expanded, Some(domain))
                    if domain.size().is_some_and(|size| size <= EXPANSION_LIMIT) =>
                {
                    match domain.kind() {
                        DomainKind::Integer => domain.integer_values().map(Cell::Integer).collect(),
                        DomainKind::Symbolic => domain
                            .symbols()
                            .map(|symbol| Cell::Symbol(symbol.to_owned()))
                            .collect(),
                    }
                }
                (TableForm::Expanded, _) => {
                    warn!("Keeping a wildcard whose column domain is too large to expand.");
                    vec![Cell::Any]
                }
                (TableForm::Compact, _) => vec![Cell::Any],
            },
        };

        Ok(cells)
    }
}

/// The values of `inf..=sup` which the column can take.
fn range_cells(inf: i64, sup: i64, domain: Option<&Domain>) -> Result<Vec<Cell>, TableTypeError> {
    if let Some(domain) = domain.filter(|domain| domain.size().is_some()) {
        return Ok(domain
            .restricted_to(inf, sup)
            .map(|values| values.integer_values().map(Cell::Integer).collect())
            .unwrap_or_default());
    }

    if i128::from(sup) - i128::from(inf) >= RANGE_EXPANSION_LIMIT {
        return Err(TableTypeError::RangeTooWide { inf, sup });
    }

    Ok((inf..=sup).map(Cell::Integer).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ANY;
    use crate::variables::ModelId;

    fn materializer(store: &VariableStore, form: TableForm) -> Materializer<'_> {
        Materializer {
            form,
            variables: store,
            rows: 0,
        }
    }

    fn store() -> VariableStore {
        VariableStore::new(ModelId::fresh())
    }

    #[test]
    fn rows_are_sorted_without_duplicates() {
        let store = store();
        let table = Table::supports([[2, 1], [0, 1], [2, 1]]);

        let rows = materializer(&store, TableForm::Compact)
            .rows_of(&table, None)
            .expect("the table holds no ranges");

        assert_eq!(
            vec![
                vec![Cell::Integer(0), Cell::Integer(1)],
                vec![Cell::Integer(2), Cell::Integer(1)],
            ],
            rows
        );
    }

    #[test]
    fn compact_tables_keep_wildcards_and_expand_ranges() {
        let store = store();
        let table = Table::supports([vec![TableEntry::range(1..=2), ANY]]);

        let rows = materializer(&store, TableForm::Compact)
            .rows_of(&table, None)
            .expect("narrow ranges expand");

        assert_eq!(
            vec![
                vec![Cell::Integer(1), Cell::Any],
                vec![Cell::Integer(2), Cell::Any],
            ],
            rows
        );
    }

    #[test]
    fn expanded_tables_use_column_domains() {
        let store = store();
        let table = Table::conflicts([vec![ANY, TableEntry::from(0)]]);
        let columns = [Domain::new(vec![3, 5]).ok(), Domain::new(0..=1).ok()];

        let rows = materializer(&store, TableForm::Expanded)
            .rows_of(&table, Some(&columns[..]))
            .expect("column domains are bounded");

        assert_eq!(
            vec![
                vec![Cell::Integer(3), Cell::Integer(0)],
                vec![Cell::Integer(5), Cell::Integer(0)],
            ],
            rows
        );
    }

    #[test]
    fn ranges_are_restricted_to_the_column_domain() {
        let store = store();
        let table = Table::supports([[TableEntry::range(0..=10)]]);
        let columns = [Domain::new(vec![2, 4, 20]).ok()];

        let rows = materializer(&store, TableForm::Compact)
            .rows_of(&table, Some(&columns[..]))
            .expect("column domains are bounded");

        assert_eq!(
            vec![vec![Cell::Integer(2)], vec![Cell::Integer(4)]],
            rows
        );
    }

    #[test]
    fn wide_ranges_only_visit_the_column_domain() {
        let store = store();
        let table = Table::supports([[TableEntry::range(0..=300_000_000)]]);
        let columns = [Domain::new(0..2).ok()];

        let rows = materializer(&store, TableForm::Compact)
            .rows_of(&table, Some(&columns[..]))
            .expect("the column domain is bounded");

        assert_eq!(
            vec![vec![Cell::Integer(0)], vec![Cell::Integer(1)]],
            rows
        );
    }

    #[test]
    fn wide_ranges_without_a_bounded_domain_are_rejected() {
        let store = store();
        let table = Table::supports([[TableEntry::range(0..=300_000_000)]]);
        let columns = [Some(Domain::unbounded())];

        assert_eq!(
            Err(TableTypeError::RangeTooWide {
                inf: 0,
                sup: 300_000_000,
            }),
            materializer(&store, TableForm::Compact).rows_of(&table, Some(&columns[..]))
        );
    }
}
