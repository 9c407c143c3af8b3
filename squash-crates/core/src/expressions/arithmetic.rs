//! Operator overloading for building expressions with ordinary Rust syntax.
//!
//! Arithmetic operators map onto their XCSP3 counterparts. The bitwise operators `&`, `|` and `^`
//! stand for logical conjunction, disjunction and exclusive or; `!` is logical negation.
//!
//! ```
//! # use squash_core::expressions::Expression;
//! # use squash_core::values::Domain;
//! # use squash_core::Model;
//! let mut model = Model::default();
//! let x = model.new_variable(Domain::new(0..10).unwrap()).unwrap();
//! let y = model.new_variable(Domain::new(0..10).unwrap()).unwrap();
//!
//! let expression: Expression = 2 * x + y % 3;
//! assert!(expression.is_numeric());
//! ```
use std::ops::Add;
use std::ops::BitAnd;
use std::ops::BitOr;
use std::ops::BitXor;
use std::ops::Div;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Not;
use std::ops::Rem;
use std::ops::Sub;

use super::Expression;
use super::Operator;
use crate::variables::VariableId;

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $operator:expr) => {
        impl<Rhs: Into<Expression>> $trait<Rhs> for Expression {
            type Output = Expression;

            fn $method(self, rhs: Rhs) -> Expression {
                Expression::binary($operator, self, rhs.into())
            }
        }

        impl<Rhs: Into<Expression>> $trait<Rhs> for &Expression {
            type Output = Expression;

            fn $method(self, rhs: Rhs) -> Expression {
                Expression::binary($operator, self.clone(), rhs.into())
            }
        }

        impl<Rhs: Into<Expression>> $trait<Rhs> for VariableId {
            type Output = Expression;

            fn $method(self, rhs: Rhs) -> Expression {
                Expression::binary($operator, self.into(), rhs.into())
            }
        }

        binary_operator!(@constant i64, $trait, $method, $operator);
        binary_operator!(@constant i32, $trait, $method, $operator);
    };

    (@constant $constant:ty, $trait:ident, $method:ident, $operator:expr) => {
        impl $trait<Expression> for $constant {
            type Output = Expression;

            fn $method(self, rhs: Expression) -> Expression {
                Expression::binary($operator, self.into(), rhs)
            }
        }

        impl $trait<&Expression> for $constant {
            type Output = Expression;

            fn $method(self, rhs: &Expression) -> Expression {
                Expression::binary($operator, self.into(), rhs.clone())
            }
        }

        impl $trait<VariableId> for $constant {
            type Output = Expression;

            fn $method(self, rhs: VariableId) -> Expression {
                Expression::binary($operator, self.into(), rhs.into())
            }
        }
    };
}

binary_operator!(Add, add, Operator::Add);
binary_operator!(Sub, sub, Operator::Sub);
binary_operator!(Mul, mul, Operator::Mul);
binary_operator!(Div, div, Operator::Div);
binary_operator!(Rem, rem, Operator::Mod);
binary_operator!(BitAnd, bitand, Operator::And);
binary_operator!(BitOr, bitor, Operator::Or);
binary_operator!(BitXor, bitxor, Operator::Xor);

macro_rules! unary_operator {
    ($trait:ident, $method:ident, $operator:expr) => {
        impl $trait for Expression {
            type Output = Expression;

            fn $method(self) -> Expression {
                Expression::unary($operator, self)
            }
        }

        impl $trait for &Expression {
            type Output = Expression;

            fn $method(self) -> Expression {
                Expression::unary($operator, self.clone())
            }
        }

        impl $trait for VariableId {
            type Output = Expression;

            fn $method(self) -> Expression {
                Expression::unary($operator, self.into())
            }
        }
    };
}

unary_operator!(Neg, neg, Operator::Neg);
unary_operator!(Not, not, Operator::Not);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expressions::Node;
    use crate::variables::ModelId;

    fn operator_of(expression: &Expression) -> Operator {
        match expression.node() {
            Node::Operation { operator, .. } => *operator,
            other => panic!("expected an operation, got {other:?}"),
        }
    }

    #[test]
    fn chained_additions_are_flattened() {
        let model = ModelId::fresh();
        let x = VariableId::new(model, 0);
        let y = VariableId::new(model, 1);

        let expression = x + y + 1;

        let Node::Operation { operands, .. } = expression.node() else {
            panic!("expected an operation");
        };
        assert_eq!(3, operands.len());
    }

    #[test]
    fn constants_on_the_left() {
        let x = VariableId::new(ModelId::fresh(), 0);

        let expression = 3 - x;

        assert_eq!(Operator::Sub, operator_of(&expression));
        assert_eq!(Some(3), expression.evaluate(&|_| Some(1)).map(|value| value + 1));
    }

    #[test]
    fn logical_operators() {
        let model = ModelId::fresh();
        let x = Expression::from(VariableId::new(model, 0));
        let y = Expression::from(VariableId::new(model, 1));

        assert_eq!(Operator::And, operator_of(&(&x & &y)));
        assert_eq!(Operator::Or, operator_of(&(&x | &y)));
        assert_eq!(Operator::Xor, operator_of(&(&x ^ &y)));
        assert_eq!(Operator::Not, operator_of(&!x));
    }
}
