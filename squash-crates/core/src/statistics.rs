use convert_case::Case;
use convert_case::Casing;
use log::info;

/// Counts gathered while compiling a model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompilationStatistics {
    /// Variables declared by the model, excluding auxiliary variables.
    pub variables: usize,
    pub auxiliary_variables: usize,
    /// Constraints after auxiliary variables were introduced, before grouping.
    pub constraints: usize,
    pub groups: usize,
    pub grouped_constraints: usize,
    pub slides: usize,
    pub instantiations: usize,
    pub blocks: usize,
    pub materialized_tuples: usize,
    pub tagged_entries: usize,
}

impl CompilationStatistics {
    /// The statistics as `(name, value)` pairs, with the names in snake case.
    pub fn entries(&self) -> [(&'static str, usize); 10] {
        [
            ("variables", self.variables),
            ("auxiliary_variables", self.auxiliary_variables),
            ("constraints", self.constraints),
            ("groups", self.groups),
            ("grouped_constraints", self.grouped_constraints),
            ("slides", self.slides),
            ("instantiations", self.instantiations),
            ("blocks", self.blocks),
            ("materialized_tuples", self.materialized_tuples),
            ("tagged_entries", self.tagged_entries),
        ]
    }

    /// Log every statistic on the info level as `name=value`, with the name in the given casing.
    pub fn log(&self, casing: Option<Case>) {
        for (name, value) in self.entries() {
            let name = match casing {
                Some(casing) => name.to_case(casing),
                None => name.to_owned(),
            };
            info!("{name}={value}");
        }
    }
}
