use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

static NEXT_MODEL_ID: AtomicU32 = AtomicU32::new(0);

/// Identifies the [`crate::Model`] a variable belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ModelId(u32);

impl ModelId {
    pub(crate) fn fresh() -> ModelId {
        ModelId(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A handle to a variable declared in a [`crate::Model`].
///
/// The handle remembers which model created it; using it in another model is reported as a
/// [`crate::ScopeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId {
    pub(crate) model: ModelId,
    pub(crate) index: u32,
}

impl VariableId {
    pub(crate) fn new(model: ModelId, index: u32) -> VariableId {
        VariableId { model, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_model_ids_are_distinct() {
        assert_ne!(ModelId::fresh(), ModelId::fresh());
    }
}
