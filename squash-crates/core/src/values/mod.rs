//! The values variables can take.
//!
//! Raw value descriptions ([`DomainSpec`]) are normalised into a [`Domain`], an ordered and
//! deduplicated sequence of [`ValueAtom`]s of one kind.
mod atom;
mod domain;
mod spec;

pub use atom::*;
pub use domain::*;
pub use spec::*;
