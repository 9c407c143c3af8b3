/// How tables with wildcards and ranges are written.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum TableForm {
    /// Keep `*` in the tuples; ranges are expanded into literal tuples.
    #[default]
    Compact,
    /// Expand every wildcard and range against the domain of its column.
    Expanded,
}

/// Options which determine how a [`crate::Model`] is compiled.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub table_form: TableForm,
    /// Fold similar constraints posted together into groups.
    pub group_constraints: bool,
    /// Write explicit slides as `slide` when their windows can be recognised.
    pub recognize_slides: bool,
    /// Write a group of `eq(x,v)` constraints as one `instantiation`.
    pub recognize_instantiations: bool,
    /// A variable whose domain was already written for an earlier variable refers to that
    /// variable with `as` when the domain text is longer than this many characters.
    pub share_domains_above: usize,
    /// Write runs of array cells compactly, e.g. `x[]` or `x[2..5]`.
    pub compact_lists: bool,
    /// Write the notes attached to constraints.
    pub notes: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            table_form: TableForm::default(),
            group_constraints: true,
            recognize_slides: true,
            recognize_instantiations: true,
            share_domains_above: 0,
            compact_lists: true,
            notes: true,
        }
    }
}
