use std::fmt::Display;

/// The operators which can appear in an intension expression.
///
/// The textual names are the functional notation of XCSP3, e.g. `add`, `ne` or `imp`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    // Arithmetic.
    Neg,
    Abs,
    Sqr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Dist,
    Min,
    Max,
    // Relational.
    Lt,
    Le,
    Ge,
    Gt,
    Ne,
    Eq,
    // Set membership.
    In,
    NotIn,
    // Logical.
    Not,
    And,
    Or,
    Xor,
    Iff,
    Imp,
    // Control.
    If,
}

impl Operator {
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Neg => "neg",
            Operator::Abs => "abs",
            Operator::Sqr => "sqr",
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mul => "mul",
            Operator::Div => "div",
            Operator::Mod => "mod",
            Operator::Pow => "pow",
            Operator::Dist => "dist",
            Operator::Min => "min",
            Operator::Max => "max",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Ge => "ge",
            Operator::Gt => "gt",
            Operator::Ne => "ne",
            Operator::Eq => "eq",
            Operator::In => "in",
            Operator::NotIn => "notin",
            Operator::Not => "not",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Xor => "xor",
            Operator::Iff => "iff",
            Operator::Imp => "imp",
            Operator::If => "if",
        }
    }

    /// The smallest and largest number of operands the operator accepts; `None` means there is
    /// no upper limit.
    pub fn arity(&self) -> (usize, Option<usize>) {
        match self {
            Operator::Neg | Operator::Abs | Operator::Sqr | Operator::Not => (1, Some(1)),

            Operator::Sub
            | Operator::Div
            | Operator::Mod
            | Operator::Pow
            | Operator::Dist
            | Operator::Lt
            | Operator::Le
            | Operator::Ge
            | Operator::Gt
            | Operator::In
            | Operator::NotIn
            | Operator::Imp => (2, Some(2)),

            Operator::If => (3, Some(3)),

            Operator::Add
            | Operator::Mul
            | Operator::Min
            | Operator::Max
            | Operator::Ne
            | Operator::Eq
            | Operator::And
            | Operator::Or
            | Operator::Xor
            | Operator::Iff => (2, None),
        }
    }

    pub(crate) fn accepts(&self, operand_count: usize) -> bool {
        let (min, max) = self.arity();
        operand_count >= min && max.map_or(true, |max| operand_count <= max)
    }

    pub(crate) fn describe_arity(&self) -> String {
        match self.arity() {
            (min, Some(max)) if min == max => format!("{min}"),
            (min, Some(max)) => format!("{min} to {max}"),
            (min, None) => format!("at least {min}"),
        }
    }

    /// Whether the operator yields a truth value rather than a number.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            Operator::Lt
                | Operator::Le
                | Operator::Ge
                | Operator::Gt
                | Operator::Ne
                | Operator::Eq
                | Operator::In
                | Operator::NotIn
                | Operator::Not
                | Operator::And
                | Operator::Or
                | Operator::Xor
                | Operator::Iff
                | Operator::Imp
        )
    }

    /// Whether nested applications of the operator can be merged into one.
    pub(crate) fn is_associative(&self) -> bool {
        matches!(
            self,
            Operator::Add
                | Operator::Mul
                | Operator::Min
                | Operator::Max
                | Operator::And
                | Operator::Or
        )
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_is_checked() {
        assert!(Operator::Add.accepts(5));
        assert!(!Operator::Add.accepts(1));
        assert!(Operator::If.accepts(3));
        assert!(!Operator::Sub.accepts(3));
        assert_eq!("at least 2", Operator::Eq.describe_arity());
        assert_eq!("1", Operator::Abs.describe_arity());
    }

    #[test]
    fn predicates() {
        assert!(Operator::Ne.is_predicate());
        assert!(Operator::Imp.is_predicate());
        assert!(!Operator::Dist.is_predicate());
        assert!(!Operator::If.is_predicate());
    }
}
