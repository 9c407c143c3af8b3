use std::fmt::Display;

/// The standard XCSP3 vocabulary, used both for element names and for attribute keys.
///
/// Names of global constraints which are not part of this list (for example `allDifferent`) can
/// be used directly as strings when creating an [`crate::Element`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Token {
    // Document structure.
    Instance,
    Variables,
    Var,
    Array,
    Domain,
    Constraints,
    Objectives,
    Annotations,
    Group,
    Args,
    Block,
    Slide,

    // Constraint arguments.
    Intension,
    Extension,
    List,
    Supports,
    Conflicts,
    Matrix,
    Index,
    Value,
    Values,
    Coeffs,
    Condition,
    Except,
    Origins,
    Lengths,
    Heights,
    Operator,

    // Objectives and annotations.
    Minimize,
    Maximize,
    Decision,
    ValHeuristic,
    Static,

    // Attributes.
    Format,
    Type,
    Id,
    Class,
    Note,
    Size,
    As,
    For,
    Offset,
    Collect,
    Circular,
    Rank,
    Covered,
    Closed,
    StartIndex,
    StartRowIndex,
    StartColIndex,
    ZeroIgnored,
    Starred,
    Uncleaned,
    Order,
}

impl Token {
    /// The textual form of the token as it appears in a document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Token::Instance => "instance",
            Token::Variables => "variables",
            Token::Var => "var",
            Token::Array => "array",
            Token::Domain => "domain",
            Token::Constraints => "constraints",
            Token::Objectives => "objectives",
            Token::Annotations => "annotations",
            Token::Group => "group",
            Token::Args => "args",
            Token::Block => "block",
            Token::Slide => "slide",
            Token::Intension => "intension",
            Token::Extension => "extension",
            Token::List => "list",
            Token::Supports => "supports",
            Token::Conflicts => "conflicts",
            Token::Matrix => "matrix",
            Token::Index => "index",
            Token::Value => "value",
            Token::Values => "values",
            Token::Coeffs => "coeffs",
            Token::Condition => "condition",
            Token::Except => "except",
            Token::Origins => "origins",
            Token::Lengths => "lengths",
            Token::Heights => "heights",
            Token::Operator => "operator",
            Token::Minimize => "minimize",
            Token::Maximize => "maximize",
            Token::Decision => "decision",
            Token::ValHeuristic => "valHeuristic",
            Token::Static => "static",
            Token::Format => "format",
            Token::Type => "type",
            Token::Id => "id",
            Token::Class => "class",
            Token::Note => "note",
            Token::Size => "size",
            Token::As => "as",
            Token::For => "for",
            Token::Offset => "offset",
            Token::Collect => "collect",
            Token::Circular => "circular",
            Token::Rank => "rank",
            Token::Covered => "covered",
            Token::Closed => "closed",
            Token::StartIndex => "startIndex",
            Token::StartRowIndex => "startRowIndex",
            Token::StartColIndex => "startColIndex",
            Token::ZeroIgnored => "zeroIgnored",
            Token::Starred => "starred",
            Token::Uncleaned => "uncleaned",
            Token::Order => "order",
        }
    }

    /// Whether the value of this attribute refers to an identifier which must be well-formed.
    pub(crate) fn holds_identifier(name: &str) -> bool {
        name == Token::Id.as_str() || name == Token::As.as_str()
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Test whether the given string is a valid XCSP3 identifier; i.e. it matches
/// `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_identifier(identifier: &str) -> bool {
    let mut chars = identifier.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_tokens_are_camel_case() {
        assert_eq!("startRowIndex", Token::StartRowIndex.as_str());
        assert_eq!("zeroIgnored", Token::ZeroIgnored.to_string());
        assert_eq!("valHeuristic", Token::ValHeuristic.as_ref());
    }

    #[test]
    fn identifiers_are_validated() {
        assert!(is_valid_identifier("x"));
        assert!(is_valid_identifier("aux_gb"));
        assert!(is_valid_identifier("_queens2"));

        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("2x"));
        assert!(!is_valid_identifier("x[0]"));
        assert!(!is_valid_identifier("a b"));
    }
}
