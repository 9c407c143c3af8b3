//! The core of Squash, a modelling frontend for constraint satisfaction and constraint
//! optimisation problems.
//!
//! A problem is described by declaring variables on a [`Model`], building [`expressions`] and
//! [`constraints`] over them, and handing those to [`Model::satisfy`], [`Model::minimize`] or
//! [`Model::maximize`]. [`Model::compile`] then turns the model into an XCSP3 document which can
//! be given to any XCSP3 solver.
//!
//! # Example
//! ```
//! # use squash_core::expressions::Term;
//! # use squash_core::values::Domain;
//! # use squash_core::CompileOptions;
//! # use squash_core::Model;
//! let mut model = Model::new("pair");
//! let x = model.new_named_variable("x", Domain::new(0..=2).unwrap()).unwrap();
//! let y = model.new_named_variable("y", Domain::new(0..=2).unwrap()).unwrap();
//!
//! model.satisfy(x.not_equals(y)).post().unwrap();
//!
//! let xml = model.compile(&CompileOptions::default()).unwrap().to_xml().unwrap();
//! assert!(xml.contains("<var id=\"y\" as=\"x\"/>"));
//! assert!(xml.contains("<intension> ne(x,y) </intension>"));
//! ```
pub mod constraints;
pub mod containers;
pub mod expressions;
pub mod values;
pub mod variables;

mod compiled_model;
mod compiler;
mod error;
mod model;
mod options;
mod serializer;
mod statistics;

pub use convert_case;
pub use xcsp_format;

pub use crate::compiled_model::CompiledModel;
pub use crate::error::*;
pub use crate::model::ConstraintPoster;
pub use crate::model::InstanceName;
pub use crate::model::Model;
pub use crate::model::ObjectiveDirection;
pub use crate::model::ObjectiveTarget;
pub use crate::model::SatisfyItem;
pub use crate::options::CompileOptions;
pub use crate::options::TableForm;
pub use crate::statistics::CompilationStatistics;
