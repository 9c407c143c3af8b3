//! The constraints which can be posted to a [`crate::Model`].
mod automaton;
mod class_tag;
mod constraint;
mod table;

pub use automaton::Automaton;
pub(crate) use automaton::transitions_text;
pub use automaton::Mdd;
pub use automaton::Transition;
pub use class_tag::ClassTag;
pub use constraint::*;
pub use table::*;
