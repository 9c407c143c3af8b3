use std::fmt::Display;

use convert_case::Case;
use convert_case::Casing;

/// An advisory label attached to posted constraints, written in the `class` attribute.
///
/// Tags never change the meaning of the constraints they label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassTag {
    SymmetryBreaking,
    RedundantConstraints,
    Clues,
    /// Any other label; it is written in camel case, so `"channeling constraints"` becomes
    /// `channelingConstraints`.
    Custom(String),
}

impl Display for ClassTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassTag::SymmetryBreaking => write!(f, "symmetryBreaking"),
            ClassTag::RedundantConstraints => write!(f, "redundantConstraints"),
            ClassTag::Clues => write!(f, "clues"),
            ClassTag::Custom(label) => write!(f, "{}", label.to_case(Case::Camel)),
        }
    }
}
