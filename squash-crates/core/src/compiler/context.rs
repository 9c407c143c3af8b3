use super::CompiledEntry;
use crate::model::Annotations;
use crate::model::Entry;
use crate::model::Model;
use crate::model::Objective;
use crate::model::VariableStore;
use crate::CompilationStatistics;
use crate::CompileOptions;

/// The state threaded through the compiler passes.
///
/// The passes work on copies of the model's contents, so the model itself is never changed by
/// compiling it.
pub(crate) struct CompilationContext<'a> {
    pub(crate) options: &'a CompileOptions,
    /// The variables of the model, extended with the auxiliary variables.
    pub(crate) variables: VariableStore,
    /// The posted constraints, rewritten by the auxiliary variable pass.
    pub(crate) entries: Vec<Entry>,
    pub(crate) objective: Option<Objective>,
    pub(crate) annotations: Annotations,
    /// The constraints as they will be written, produced by the grouping pass.
    pub(crate) compiled: Vec<CompiledEntry>,
    pub(crate) statistics: CompilationStatistics,
}

impl<'a> CompilationContext<'a> {
    pub(crate) fn new(model: &Model, options: &'a CompileOptions) -> CompilationContext<'a> {
        let variables = model.variables.clone();
        let statistics = CompilationStatistics {
            variables: variables.variable_count(),
            ..Default::default()
        };

        CompilationContext {
            options,
            variables,
            entries: model.entries.clone(),
            objective: model.objective.clone(),
            annotations: model.annotations.clone(),
            compiled: vec![],
            statistics,
        }
    }
}
