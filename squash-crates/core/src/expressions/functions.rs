use super::Expression;
use super::Operator;
use crate::ArityError;

/// `|lhs - rhs|`.
pub fn dist(lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> Expression {
    Expression::binary(Operator::Dist, lhs.into(), rhs.into())
}

pub fn pow(base: impl Into<Expression>, exponent: impl Into<Expression>) -> Expression {
    Expression::binary(Operator::Pow, base.into(), exponent.into())
}

/// The smallest of the operands; there must be at least two.
pub fn min(
    operands: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<Expression, ArityError> {
    Expression::apply(Operator::Min, operands)
}

/// The largest of the operands; there must be at least two.
pub fn max(
    operands: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<Expression, ArityError> {
    Expression::apply(Operator::Max, operands)
}

/// `if(condition, then, otherwise)`.
pub fn if_then_else(
    condition: impl Into<Expression>,
    then: impl Into<Expression>,
    otherwise: impl Into<Expression>,
) -> Expression {
    Expression::operation(
        Operator::If,
        vec![condition.into(), then.into(), otherwise.into()],
    )
}

pub fn implies(premise: impl Into<Expression>, conclusion: impl Into<Expression>) -> Expression {
    Expression::binary(Operator::Imp, premise.into(), conclusion.into())
}

pub fn iff(lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> Expression {
    Expression::binary(Operator::Iff, lhs.into(), rhs.into())
}

/// The conjunction of the operands; there must be at least two.
pub fn conjunction(
    operands: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<Expression, ArityError> {
    Expression::apply(Operator::And, operands)
}

/// The disjunction of the operands; there must be at least two.
pub fn disjunction(
    operands: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<Expression, ArityError> {
    Expression::apply(Operator::Or, operands)
}
