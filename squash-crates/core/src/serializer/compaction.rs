//! Compact notation for lists of array cells and of repeated integers.
//!
//! A run of cells of one array which enumerates a box of the array in row-major order is written
//! as one token, such as `x[]`, `x[1..3]` or `y[2][]`. Otherwise, cells which differ in a single
//! index that increases by one are written as `x[0][1..4]`. The order of the list is always
//! preserved.
use itertools::Itertools;

use crate::compiler::Parameter;
use crate::model::VariableStore;
use crate::variables::index_tuples;
use crate::variables::ArrayKey;
use crate::variables::VariableArray;
use crate::variables::VariableId;

/// Arguments whose integers are written as `vxk` when a value repeats.
const REPEATABLE_ARGUMENTS: [&str; 4] = ["coeffs", "values", "lengths", "heights"];

/// Runs of at least this many equal values are written as `vxk`.
const REPETITION_LIMIT: usize = 3;

#[derive(Debug)]
pub(crate) struct ListWriter<'a> {
    variables: &'a VariableStore,
    compact: bool,
}

impl<'a> ListWriter<'a> {
    pub(crate) fn new(variables: &'a VariableStore, compact: bool) -> ListWriter<'a> {
        ListWriter { variables, compact }
    }

    /// Write the list of the argument called `argument`.
    ///
    /// The arguments of a group instance are compacted whatever their length; other lists only
    /// when they have at least three elements.
    pub(crate) fn write(&self, argument: &str, list: &[Parameter], instance: bool) -> String {
        if !self.compact || (!instance && list.len() < 3) {
            return self.expanded(list);
        }

        if REPEATABLE_ARGUMENTS.contains(&argument) {
            if let Some(values) = integers(list) {
                return repeated_values(&values);
            }
        }

        let mut tokens = vec![];
        let mut run: Vec<(VariableId, usize)> = vec![];
        let mut run_array = None;

        for parameter in list {
            let cell = match parameter {
                Parameter::Variable(variable) => self.variables.info(*variable).cell,
                _ => None,
            };

            match (cell, parameter) {
                (Some((key, position)), Parameter::Variable(variable)) => {
                    if run_array != Some(key) {
                        self.flush(run_array, &mut run, &mut tokens);
                        run_array = Some(key);
                    }
                    run.push((*variable, position));
                }
                _ => {
                    self.flush(run_array, &mut run, &mut tokens);
                    run_array = None;
                    tokens.push(self.parameter(parameter));
                }
            }
        }
        self.flush(run_array, &mut run, &mut tokens);

        tokens.join(" ")
    }

    /// Write a list of variables.
    pub(crate) fn variables(&self, list: &[VariableId], instance: bool) -> String {
        let list = list
            .iter()
            .copied()
            .map(Parameter::Variable)
            .collect::<Vec<_>>();
        self.write("list", &list, instance)
    }

    pub(crate) fn parameter(&self, parameter: &Parameter) -> String {
        match parameter {
            Parameter::Variable(variable) => self.variables.info(*variable).name.clone(),
            Parameter::Integer(value) => value.to_string(),
            Parameter::Placeholder(index) => format!("%{index}"),
            Parameter::AllPlaceholders => "%...".to_owned(),
            Parameter::Range(inf, sup) => format!("{inf}..{sup}"),
            Parameter::Expression(expression) => expression.render(self.variables),
        }
    }

    fn expanded(&self, list: &[Parameter]) -> String {
        list.iter()
            .map(|parameter| self.parameter(parameter))
            .join(" ")
    }

    fn flush(
        &self,
        array: Option<ArrayKey>,
        run: &mut Vec<(VariableId, usize)>,
        tokens: &mut Vec<String>,
    ) {
        let Some(key) = array else {
            return;
        };
        if run.is_empty() {
            return;
        }

        let array = self.variables.array(key);
        let cells = std::mem::take(run);
        match boxed(array, &cells) {
            Some(token) => tokens.push(token),
            None => tokens.extend(self.sequences(array, &cells)),
        }
    }

    /// Split the cells into maximal sequences along one index.
    fn sequences(&self, array: &VariableArray, cells: &[(VariableId, usize)]) -> Vec<String> {
        let mut tokens = vec![];
        let mut sequence: Option<Sequence> = None;

        for &(variable, position) in cells {
            let indices = array.indices_of(position);
            if let Some(current) = sequence.as_mut() {
                if current.extend(variable, &indices) {
                    continue;
                }
            }

            if let Some(finished) = sequence.take() {
                tokens.extend(finished.tokens(array, self.variables));
            }
            sequence = Some(Sequence::new(variable, indices));
        }

        if let Some(finished) = sequence {
            tokens.extend(finished.tokens(array, self.variables));
        }

        tokens
    }
}

/// Cells of one array differing in one index, which increases by one from cell to cell.
#[derive(Debug)]
struct Sequence {
    variables: Vec<VariableId>,
    start: Vec<usize>,
    dimension: Option<usize>,
    stop: usize,
}

impl Sequence {
    fn new(variable: VariableId, start: Vec<usize>) -> Sequence {
        Sequence {
            variables: vec![variable],
            start,
            dimension: None,
            stop: 0,
        }
    }

    fn extend(&mut self, variable: VariableId, indices: &[usize]) -> bool {
        let differing = self
            .start
            .iter()
            .zip(indices)
            .positions(|(start, index)| start != index)
            .collect::<Vec<_>>();
        let &[dimension] = differing.as_slice() else {
            return false;
        };

        let previous = match self.dimension {
            None => self.start[dimension],
            Some(known) if known == dimension => self.stop,
            Some(_) => return false,
        };
        if indices[dimension] != previous + 1 {
            return false;
        }

        self.dimension = Some(dimension);
        self.stop = indices[dimension];
        self.variables.push(variable);
        true
    }

    fn tokens(self, array: &VariableArray, names: &VariableStore) -> Vec<String> {
        let Some(dimension) = self.dimension.filter(|_| self.variables.len() > 2) else {
            return self
                .variables
                .iter()
                .map(|variable| names.info(*variable).name.clone())
                .collect();
        };

        let mut token = array.name().to_owned();
        for (index, start) in self.start.iter().enumerate() {
            if index == dimension {
                token.push_str(&span(*start, self.stop, array.shape()[index]));
            } else {
                token.push_str(&format!("[{start}]"));
            }
        }
        vec![token]
    }
}

/// The single token for the cells, if they are the row-major enumeration of a box of the array
/// with more than two cells.
fn boxed(array: &VariableArray, cells: &[(VariableId, usize)]) -> Option<String> {
    if cells.len() <= 2 {
        return None;
    }

    let indices = cells
        .iter()
        .map(|(_, position)| array.indices_of(*position))
        .collect::<Vec<_>>();
    let dimensions = array.shape().len();
    let (minimums, maximums): (Vec<usize>, Vec<usize>) = (0..dimensions)
        .map(|dimension| {
            indices
                .iter()
                .map(|cell| cell[dimension])
                .minmax()
                .into_option()
                .unwrap_or((0, 0))
        })
        .unzip();

    let extents = minimums
        .iter()
        .zip(&maximums)
        .map(|(minimum, maximum)| maximum - minimum + 1)
        .collect::<Vec<_>>();
    if extents.iter().product::<usize>() != cells.len() {
        return None;
    }

    let enumerated = index_tuples(&extents).map(|offsets| {
        offsets
            .iter()
            .zip(&minimums)
            .map(|(offset, minimum)| offset + minimum)
            .collect::<Vec<_>>()
    });
    if !enumerated.eq(indices.iter().cloned()) {
        return None;
    }

    let mut token = array.name().to_owned();
    for (dimension, size) in array.shape().iter().enumerate() {
        token.push_str(&span(minimums[dimension], maximums[dimension], *size));
    }
    Some(token)
}

fn span(first: usize, last: usize, size: usize) -> String {
    if first == 0 && last + 1 == size {
        "[]".to_owned()
    } else if first == last {
        format!("[{first}]")
    } else {
        format!("[{first}..{last}]")
    }
}

fn integers(list: &[Parameter]) -> Option<Vec<i64>> {
    list.iter()
        .map(|parameter| match parameter {
            Parameter::Integer(value) => Some(*value),
            _ => None,
        })
        .collect()
}

fn repeated_values(values: &[i64]) -> String {
    values
        .iter()
        .dedup_with_count()
        .flat_map(|(count, value)| {
            if count >= REPETITION_LIMIT {
                vec![format!("{value}x{count}")]
            } else {
                vec![value.to_string(); count]
            }
        })
        .join(" ")
}
