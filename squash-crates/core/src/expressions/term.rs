use super::Expression;
use super::Operator;
use crate::variables::VariableId;

/// Comparisons and unary functions available on anything which can be used as an expression.
///
/// Rust reserves `==` and `<` for comparisons returning `bool`, so relations between expressions
/// are built with the methods of this trait instead.
///
/// # Example
/// ```
/// # use squash_core::expressions::Term;
/// # use squash_core::values::Domain;
/// # use squash_core::Model;
/// let mut model = Model::default();
/// let x = model.new_variable(Domain::new(0..10).unwrap()).unwrap();
/// let y = model.new_variable(Domain::new(0..10).unwrap()).unwrap();
///
/// model.satisfy(x.not_equals(y)).post().unwrap();
/// model.satisfy((x + 1).less_than_or_equals(y)).post().unwrap();
/// ```
pub trait Term: Into<Expression> + Sized {
    fn equals(self, rhs: impl Into<Expression>) -> Expression {
        Expression::binary(Operator::Eq, self.into(), rhs.into())
    }

    fn not_equals(self, rhs: impl Into<Expression>) -> Expression {
        Expression::binary(Operator::Ne, self.into(), rhs.into())
    }

    fn less_than(self, rhs: impl Into<Expression>) -> Expression {
        Expression::binary(Operator::Lt, self.into(), rhs.into())
    }

    fn less_than_or_equals(self, rhs: impl Into<Expression>) -> Expression {
        Expression::binary(Operator::Le, self.into(), rhs.into())
    }

    fn greater_than(self, rhs: impl Into<Expression>) -> Expression {
        Expression::binary(Operator::Gt, self.into(), rhs.into())
    }

    fn greater_than_or_equals(self, rhs: impl Into<Expression>) -> Expression {
        Expression::binary(Operator::Ge, self.into(), rhs.into())
    }

    /// Membership in a set of integers.
    fn is_in(self, values: impl IntoIterator<Item = i64>) -> Expression {
        Expression::binary(Operator::In, self.into(), Expression::set(values))
    }

    fn not_in(self, values: impl IntoIterator<Item = i64>) -> Expression {
        Expression::binary(Operator::NotIn, self.into(), Expression::set(values))
    }

    fn abs(self) -> Expression {
        Expression::unary(Operator::Abs, self.into())
    }

    fn squared(self) -> Expression {
        Expression::unary(Operator::Sqr, self.into())
    }
}

impl Term for Expression {}

impl Term for &Expression {}

impl Term for VariableId {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expressions::Node;
    use crate::variables::ModelId;

    #[test]
    fn membership_uses_a_normalised_set() {
        let x = VariableId::new(ModelId::fresh(), 0);

        let expression = x.is_in([3, 1, 3]);

        let Node::Operation { operator, operands } = expression.node() else {
            panic!("expected an operation");
        };
        assert_eq!(Operator::In, *operator);
        assert_eq!(&Node::Set(vec![1, 3]), operands[1].node());
    }

    #[test]
    fn comparisons_are_predicates() {
        let model = ModelId::fresh();
        let x = VariableId::new(model, 0);
        let y = VariableId::new(model, 1);

        assert!(x.less_than(y).is_predicate());
        assert!(!x.abs().is_predicate());
    }
}
