//! Handles to the variables and arrays of variables declared in a [`crate::Model`].
mod array;
mod variable_id;

pub use array::VariableArray;
pub(crate) use array::*;
pub use variable_id::VariableId;
pub(crate) use variable_id::*;
