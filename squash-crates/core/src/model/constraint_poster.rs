use log::warn;

use super::Decoration;
use super::Model;
use super::SatisfyItem;
use crate::constraints::ClassTag;
use crate::ModelError;

/// A structure which is responsible for adding constraints to the [`Model`]. It is created by
/// [`Model::satisfy`], can attach advisory labels to the constraints, and commits them with
/// [`ConstraintPoster::post`].
#[derive(Debug)]
pub struct ConstraintPoster<'model> {
    model: &'model mut Model,
    item: Option<SatisfyItem>,
    decoration: Decoration,
}

impl<'model> ConstraintPoster<'model> {
    pub(crate) fn new(model: &'model mut Model, item: SatisfyItem) -> Self {
        ConstraintPoster {
            model,
            item: Some(item),
            decoration: Decoration::default(),
        }
    }

    /// Label the constraints with a class, e.g. [`ClassTag::SymmetryBreaking`].
    pub fn tagged(mut self, tag: ClassTag) -> Self {
        if !self.decoration.classes.contains(&tag) {
            self.decoration.classes.push(tag);
        }
        self
    }

    /// Attach a human-readable note to the constraints.
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.decoration.note = Some(note.into());
        self
    }

    /// Add the constraints to the [`Model`].
    ///
    /// Fails if the model was already compiled, if a constraint refers to a variable of another
    /// model, or if an item is not a complete constraint.
    pub fn post(mut self) -> Result<(), ModelError> {
        let Some(item) = self.item.take() else {
            return Ok(());
        };
        let decoration = std::mem::take(&mut self.decoration);

        self.model.add_entry(item, decoration)
    }
}

impl Drop for ConstraintPoster<'_> {
    fn drop(&mut self) {
        if self.item.is_some() {
            warn!("A constraint poster is never used, this is likely a mistake.");
        }
    }
}
