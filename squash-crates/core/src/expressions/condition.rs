use std::ops::RangeInclusive;

use itertools::Itertools;

use super::Expression;

/// The comparison in a [`Condition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConditionOperator {
    Lt,
    Le,
    Ge,
    Gt,
    Ne,
    Eq,
    In,
    NotIn,
}

impl ConditionOperator {
    pub fn name(&self) -> &'static str {
        match self {
            ConditionOperator::Lt => "lt",
            ConditionOperator::Le => "le",
            ConditionOperator::Ge => "ge",
            ConditionOperator::Gt => "gt",
            ConditionOperator::Ne => "ne",
            ConditionOperator::Eq => "eq",
            ConditionOperator::In => "in",
            ConditionOperator::NotIn => "notin",
        }
    }
}

/// The right-hand side of a [`Condition`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConditionOperand {
    Expression(Expression),
    /// The integers `inf..=sup`.
    Range(i64, i64),
    Set(Vec<i64>),
}

/// The comparison which completes a [`crate::expressions::PartialConstraint`], written as
/// `(le,5)` or `(in,1..3)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Condition {
    pub operator: ConditionOperator,
    pub operand: ConditionOperand,
}

impl Condition {
    pub fn new(operator: ConditionOperator, operand: impl Into<Expression>) -> Condition {
        Condition {
            operator,
            operand: ConditionOperand::Expression(operand.into()),
        }
    }

    /// Membership in (`within` is true) or exclusion from a range of values.
    pub fn range(range: RangeInclusive<i64>, within: bool) -> Condition {
        Condition {
            operator: if within {
                ConditionOperator::In
            } else {
                ConditionOperator::NotIn
            },
            operand: ConditionOperand::Range(*range.start(), *range.end()),
        }
    }

    /// Membership in (`within` is true) or exclusion from a set of values.
    pub fn set(values: impl IntoIterator<Item = i64>, within: bool) -> Condition {
        Condition {
            operator: if within {
                ConditionOperator::In
            } else {
                ConditionOperator::NotIn
            },
            operand: ConditionOperand::Set(values.into_iter().sorted().dedup().collect()),
        }
    }
}
