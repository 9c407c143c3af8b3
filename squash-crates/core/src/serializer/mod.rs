//! Renders a compiled model as an XCSP3 element tree.
mod compaction;
mod xcsp;

pub(crate) use xcsp::document;
