//! # Squash
//! Squash is a modelling frontend for combinatorial problems. A problem is described in Rust by
//! declaring variables, building constraints over them and optionally an objective; Squash then
//! compiles the description into an [XCSP3](https://xcsp.org) document which any XCSP3 solver can
//! read.
//!
//! Squash does not solve problems itself.
//!
//! # Modelling
//! Everything starts with a [`Model`]. Variables are declared with a [`values::Domain`], either on
//! their own or as (possibly sparse) arrays:
//! ```rust
//! # use squash::values::Domain;
//! # use squash::Model;
//! let mut model = Model::new("warehouses");
//!
//! let open = model
//!     .new_named_array("open", &[3], |_| Domain::new(0..=1).ok())
//!     .unwrap();
//! let supplier = model
//!     .new_named_array("supplier", &[4], |_| Domain::new(0..3).ok())
//!     .unwrap();
//! ```
//!
//! Constraints are built from [`expressions`] and the functions in [`constraints`], and are
//! posted with [`Model::satisfy`]. Similar constraints posted together are written as one group:
//! ```rust
//! # use squash::constraints::ClassTag;
//! # use squash::expressions::element;
//! # use squash::expressions::sum;
//! # use squash::expressions::Term;
//! # use squash::values::Domain;
//! # use squash::Model;
//! # let mut model = Model::new("warehouses");
//! # let open = model.new_named_array("open", &[3], |_| Domain::new(0..=1).ok()).unwrap();
//! # let supplier = model.new_named_array("supplier", &[4], |_| Domain::new(0..3).ok()).unwrap();
//! // Every store is supplied by an open warehouse.
//! let supplied = supplier
//!     .cells()
//!     .map(|warehouse| element(open.cells(), warehouse).unwrap().equals(1))
//!     .collect::<Vec<_>>();
//! model.satisfy(supplied).post().unwrap();
//!
//! // At least one warehouse is open.
//! model
//!     .satisfy(sum(open.cells()).unwrap().greater_than_or_equals(1))
//!     .tagged(ClassTag::RedundantConstraints)
//!     .post()
//!     .unwrap();
//! ```
//!
//! An objective is set with [`Model::minimize`] or [`Model::maximize`], after which the model is
//! compiled:
//! ```rust
//! # use squash::expressions::sum;
//! # use squash::values::Domain;
//! # use squash::CompileOptions;
//! # use squash::Model;
//! # let mut model = Model::new("warehouses");
//! # let open = model.new_named_array("open", &[3], |_| Domain::new(0..=1).ok()).unwrap();
//! model.minimize(sum(open.cells()).unwrap()).unwrap();
//!
//! let compiled = model.compile(&CompileOptions::default()).unwrap();
//! assert!(compiled
//!     .to_xml()
//!     .unwrap()
//!     .contains("<minimize type=\"sum\"> open[] </minimize>"));
//! ```
//!
//! After compiling, the model is frozen and no longer accepts declarations or constraints.
pub use squash_core::*;
