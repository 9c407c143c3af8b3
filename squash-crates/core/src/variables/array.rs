use itertools::Itertools;

use super::VariableId;
use crate::containers::StorageKey;
use crate::ShapeError;

/// Key of an array within the model that declared it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ArrayKey(u32);

impl StorageKey for ArrayKey {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        ArrayKey(index as u32)
    }
}

/// A multi-dimensional array of variables, laid out in row-major order.
///
/// Arrays can have holes: a cell for which no domain was given when the array was declared does
/// not exist, and [`VariableArray::get`] returns `None` for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableArray {
    pub(crate) key: ArrayKey,
    name: String,
    shape: Vec<usize>,
    cells: Vec<Option<VariableId>>,
}

impl VariableArray {
    pub(crate) fn new(
        key: ArrayKey,
        name: String,
        shape: Vec<usize>,
        cells: Vec<Option<VariableId>>,
    ) -> VariableArray {
        VariableArray {
            key,
            name,
            shape,
            cells,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The variable at the given indices, or `None` if the indices are out of bounds or the cell
    /// is a hole.
    pub fn get(&self, indices: &[usize]) -> Option<VariableId> {
        let position = self.position(indices)?;
        self.cells[position]
    }

    /// The variables of the array in row-major order, skipping holes.
    pub fn cells(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.cells.iter().flatten().copied()
    }

    /// The number of variables in the array, not counting holes.
    pub fn len(&self) -> usize {
        self.cells().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The variables of row `row` of a two-dimensional array, skipping holes.
    pub fn row(&self, row: usize) -> Vec<VariableId> {
        if self.shape.len() != 2 {
            return vec![];
        }

        (0..self.shape[1])
            .filter_map(|column| self.get(&[row, column]))
            .collect()
    }

    /// The variables of column `column` of a two-dimensional array, skipping holes.
    pub fn column(&self, column: usize) -> Vec<VariableId> {
        if self.shape.len() != 2 {
            return vec![];
        }

        (0..self.shape[0])
            .filter_map(|row| self.get(&[row, column]))
            .collect()
    }

    pub(crate) fn slots(&self) -> &[Option<VariableId>] {
        &self.cells
    }

    pub(crate) fn push_cell(&mut self, variable: VariableId) {
        self.cells.push(Some(variable));
        self.shape = vec![self.cells.len()];
    }

    /// The index tuple of the cell at `position` in row-major order.
    pub(crate) fn indices_of(&self, position: usize) -> Vec<usize> {
        let mut remainder = position;
        let mut indices = self
            .shape
            .iter()
            .rev()
            .map(|&size| {
                let index = remainder % size;
                remainder /= size;
                index
            })
            .collect::<Vec<_>>();
        indices.reverse();
        indices
    }

    fn position(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.shape.len() {
            return None;
        }

        indices
            .iter()
            .zip(&self.shape)
            .try_fold(0, |position, (&index, &size)| {
                (index < size).then_some(position * size + index)
            })
    }
}

/// Check that an array can be declared with the given shape.
pub(crate) fn validate_shape(shape: &[usize]) -> Result<(), ShapeError> {
    if shape.is_empty() {
        return Err(ShapeError::NoDimensions);
    }

    match shape.iter().position(|&size| size == 0) {
        Some(position) => Err(ShapeError::ZeroDimension { position }),
        None => Ok(()),
    }
}

/// All index tuples of an array with the given shape, in row-major order.
pub(crate) fn index_tuples(shape: &[usize]) -> impl Iterator<Item = Vec<usize>> {
    shape
        .iter()
        .map(|&size| 0..size)
        .collect::<Vec<_>>()
        .into_iter()
        .multi_cartesian_product()
}

/// The name of the cell at `indices` of the array called `array`, e.g. `x[2][0]`.
pub(crate) fn cell_name(array: &str, indices: &[usize]) -> String {
    format!(
        "{array}{}",
        indices.iter().map(|index| format!("[{index}]")).join("")
    )
}
