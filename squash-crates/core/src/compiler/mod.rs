//! The passes which turn a frozen [`Model`] into a [`CompiledModel`].
//!
//! The passes run in a fixed order on a [`CompilationContext`]: auxiliary variables are
//! introduced first, then similar constraints are grouped, the tables are materialized and
//! finally the labels are settled. The model itself is never changed, so compiling it again gives
//! the same document.
mod context;
mod group_similar_constraints;
mod introduce_auxiliary_variables;
mod materialize_tables;
mod possible_values;
mod shape;
mod tag_entries;

pub(crate) use context::CompilationContext;
use log::info;
pub(crate) use shape::*;

use crate::serializer;
use crate::CompileOptions;
use crate::CompiledModel;
use crate::Model;
use crate::ModelError;

pub(crate) fn compile(
    model: &Model,
    options: &CompileOptions,
) -> Result<CompiledModel, ModelError> {
    let mut context = CompilationContext::new(model, options);

    introduce_auxiliary_variables::run(&mut context)?;
    group_similar_constraints::run(&mut context);
    materialize_tables::run(&mut context)?;
    tag_entries::run(&mut context);

    let document = serializer::document(&context);

    info!(
        "Compiled {} constraints over {} variables ({} auxiliary)",
        context.statistics.constraints,
        context.statistics.variables,
        context.statistics.auxiliary_variables,
    );

    Ok(CompiledModel::new(
        document,
        model.instance_name().file_stem(),
        context.statistics,
    ))
}
