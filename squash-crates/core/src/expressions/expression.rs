use std::rc::Rc;

use itertools::Itertools;

use super::Operator;
use super::PartialConstraint;
use crate::variables::VariableId;
use crate::ArityError;

/// Resolves variables to the names they are written with.
pub(crate) trait Names {
    fn name_of(&self, variable: VariableId) -> &str;
}

/// A node of an expression tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Constant(i64),
    Variable(VariableId),
    /// A set of integers, the right-hand side of `in` and `notin`.
    Set(Vec<i64>),
    Operation {
        operator: Operator,
        operands: Vec<Expression>,
    },
    /// A partial constraint used as a value, e.g. a sum inside an arithmetic expression.
    Partial(Box<PartialConstraint>),
}

/// An immutable expression tree over the variables of a model.
///
/// Cloning an expression is cheap, and sub-expressions can be shared freely between expressions.
/// Combining expressions never changes the operands; it always builds a new tree. Two expressions
/// are equal if they are structurally equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Expression(Rc<Node>);

impl Expression {
    pub fn constant(value: i64) -> Expression {
        Expression(Rc::new(Node::Constant(value)))
    }

    pub fn variable(variable: VariableId) -> Expression {
        Expression(Rc::new(Node::Variable(variable)))
    }

    /// The set of the given values; the values are sorted and deduplicated.
    pub fn set(values: impl IntoIterator<Item = i64>) -> Expression {
        Expression(Rc::new(Node::Set(
            values.into_iter().sorted().dedup().collect(),
        )))
    }

    /// Apply `operator` to the operands, checking that the operator accepts that many operands.
    ///
    /// # Example
    /// ```
    /// # use squash_core::expressions::Expression;
    /// # use squash_core::expressions::Operator;
    /// let sum = Expression::apply(Operator::Add, [1, 2, 3]).unwrap();
    /// assert!(!sum.is_predicate());
    ///
    /// assert!(Expression::apply(Operator::Sub, [1, 2, 3]).is_err());
    /// ```
    pub fn apply(
        operator: Operator,
        operands: impl IntoIterator<Item = impl Into<Expression>>,
    ) -> Result<Expression, ArityError> {
        let operands = operands.into_iter().map(Into::into).collect::<Vec<_>>();

        if !operator.accepts(operands.len()) {
            return Err(ArityError::InvalidOperandCount {
                operator: operator.name(),
                expected: operator.describe_arity(),
                actual: operands.len(),
            });
        }

        Ok(Expression::operation(operator, operands))
    }

    /// Build an operation without checking the arity. Operands of associative operators which are
    /// applications of the same operator are merged into the new node.
    pub(crate) fn operation(operator: Operator, operands: Vec<Expression>) -> Expression {
        let operands = if operator.is_associative() {
            operands
                .into_iter()
                .flat_map(|operand| match operand.node() {
                    Node::Operation {
                        operator: inner,
                        operands: inner_operands,
                    } if *inner == operator => inner_operands.clone(),
                    _ => vec![operand],
                })
                .collect()
        } else {
            operands
        };

        Expression(Rc::new(Node::Operation { operator, operands }))
    }

    pub(crate) fn binary(operator: Operator, lhs: Expression, rhs: Expression) -> Expression {
        Expression::operation(operator, vec![lhs, rhs])
    }

    pub(crate) fn unary(operator: Operator, operand: Expression) -> Expression {
        Expression::operation(operator, vec![operand])
    }

    pub fn node(&self) -> &Node {
        &self.0
    }

    pub fn as_variable(&self) -> Option<VariableId> {
        match self.node() {
            Node::Variable(variable) => Some(*variable),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<i64> {
        match self.node() {
            Node::Constant(value) => Some(*value),
            _ => None,
        }
    }

    /// Whether the expression evaluates to a truth value.
    pub fn is_predicate(&self) -> bool {
        matches!(self.node(), Node::Operation { operator, .. } if operator.is_predicate())
    }

    /// Whether the expression evaluates to a number. Truth values and sets are not numeric.
    pub fn is_numeric(&self) -> bool {
        !self.is_predicate() && !matches!(self.node(), Node::Set(_))
    }

    /// Whether the expression is a variable or a constant.
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.node(), Node::Variable(_) | Node::Constant(_))
    }

    /// The distinct variables in the expression, in order of first occurrence.
    pub fn variables(&self) -> Vec<VariableId> {
        let mut variables = vec![];
        self.visit_variables(&mut |variable| {
            if !variables.contains(&variable) {
                variables.push(variable);
            }
        });
        variables
    }

    pub(crate) fn visit_variables(&self, visitor: &mut impl FnMut(VariableId)) {
        match self.node() {
            Node::Constant(_) | Node::Set(_) => {}
            Node::Variable(variable) => visitor(*variable),
            Node::Operation { operands, .. } => operands
                .iter()
                .for_each(|operand| operand.visit_variables(visitor)),
            Node::Partial(partial) => partial
                .expressions()
                .for_each(|expression| expression.visit_variables(visitor)),
        }
    }

    /// Evaluate the expression under an assignment. Truth values evaluate to 0 or 1. Returns
    /// `None` if a variable is unassigned, the result is undefined (e.g. division by zero) or
    /// the expression contains a partial constraint.
    pub(crate) fn evaluate(&self, value_of: &impl Fn(VariableId) -> Option<i64>) -> Option<i64> {
        match self.node() {
            Node::Constant(value) => Some(*value),
            Node::Variable(variable) => value_of(*variable),
            Node::Set(_) | Node::Partial(_) => None,
            Node::Operation { operator, operands } => {
                if matches!(operator, Operator::In | Operator::NotIn) {
                    let value = operands[0].evaluate(value_of)?;
                    let Node::Set(values) = operands[1].node() else {
                        return None;
                    };
                    let contained = values.binary_search(&value).is_ok();
                    return Some(i64::from(contained == (*operator == Operator::In)));
                }

                let values = operands
                    .iter()
                    .map(|operand| operand.evaluate(value_of))
                    .collect::<Option<Vec<_>>>()?;

                apply_operator(*operator, &values)
            }
        }
    }

    /// Write the expression in the functional notation of XCSP3, e.g. `ne(x[0],add(y,1))`.
    pub(crate) fn render(&self, names: &impl Names) -> String {
        let mut output = String::new();
        self.render_into(&mut output, names);
        output
    }

    fn render_into(&self, output: &mut String, names: &impl Names) {
        match self.node() {
            Node::Constant(value) => output.push_str(&value.to_string()),
            Node::Variable(variable) => output.push_str(names.name_of(*variable)),
            Node::Set(values) => {
                output.push_str("set(");
                output.push_str(&values.iter().join(","));
                output.push(')');
            }
            Node::Operation { operator, operands } => {
                output.push_str(operator.name());
                output.push('(');
                for (index, operand) in operands.iter().enumerate() {
                    if index > 0 {
                        output.push(',');
                    }
                    operand.render_into(output, names);
                }
                output.push(')');
            }
            Node::Partial(partial) => {
                output.push_str(partial.kind());
                output.push('(');
                for (index, expression) in partial.expressions().enumerate() {
                    if index > 0 {
                        output.push(',');
                    }
                    expression.render_into(output, names);
                }
                output.push(')');
            }
        }
    }
}

fn truth(value: bool) -> i64 {
    i64::from(value)
}

pub(crate) fn apply_operator(operator: Operator, values: &[i64]) -> Option<i64> {
    let result = match operator {
        Operator::Neg => values[0].checked_neg()?,
        Operator::Abs => values[0].checked_abs()?,
        Operator::Sqr => values[0].checked_mul(values[0])?,
        Operator::Add => values
            .iter()
            .try_fold(0_i64, |sum, value| sum.checked_add(*value))?,
        Operator::Sub => values[0].checked_sub(values[1])?,
        Operator::Mul => values
            .iter()
            .try_fold(1_i64, |product, value| product.checked_mul(*value))?,
        Operator::Div => values[0].checked_div(values[1])?,
        Operator::Mod => values[0].checked_rem(values[1])?,
        Operator::Pow => values[0].checked_pow(u32::try_from(values[1]).ok()?)?,
        Operator::Dist => values[0].checked_sub(values[1])?.checked_abs()?,
        Operator::Min => *values.iter().min()?,
        Operator::Max => *values.iter().max()?,
        Operator::Lt => truth(values[0] < values[1]),
        Operator::Le => truth(values[0] <= values[1]),
        Operator::Ge => truth(values[0] >= values[1]),
        Operator::Gt => truth(values[0] > values[1]),
        Operator::Ne => truth(values.iter().all_unique()),
        Operator::Eq => truth(values.iter().all_equal()),
        Operator::Not => truth(values[0] == 0),
        Operator::And => truth(values.iter().all(|value| *value != 0)),
        Operator::Or => truth(values.iter().any(|value| *value != 0)),
        Operator::Xor => truth(values.iter().filter(|value| **value != 0).count() % 2 == 1),
        Operator::Iff => truth(values.iter().map(|value| *value != 0).all_equal()),
        Operator::Imp => truth(values[0] == 0 || values[1] != 0),
        Operator::If => {
            if values[0] != 0 {
                values[1]
            } else {
                values[2]
            }
        }
        Operator::In | Operator::NotIn => return None,
    };

    Some(result)
}

impl From<VariableId> for Expression {
    fn from(value: VariableId) -> Self {
        Expression::variable(value)
    }
}

impl From<&VariableId> for Expression {
    fn from(value: &VariableId) -> Self {
        Expression::variable(*value)
    }
}

impl From<&Expression> for Expression {
    fn from(value: &Expression) -> Self {
        value.clone()
    }
}

impl From<i64> for Expression {
    fn from(value: i64) -> Self {
        Expression::constant(value)
    }
}

impl From<i32> for Expression {
    fn from(value: i32) -> Self {
        Expression::constant(value.into())
    }
}

impl From<PartialConstraint> for Expression {
    fn from(value: PartialConstraint) -> Self {
        Expression(Rc::new(Node::Partial(Box::new(value))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::ModelId;

    struct Letters;

    impl Names for Letters {
        fn name_of(&self, variable: VariableId) -> &str {
            ["x", "y", "z", "w"][variable.index as usize]
        }
    }

    fn variables() -> (VariableId, VariableId, VariableId) {
        let model = ModelId::fresh();
        (
            VariableId::new(model, 0),
            VariableId::new(model, 1),
            VariableId::new(model, 2),
        )
    }

    #[test]
    fn associative_operators_are_flattened() {
        let (x, y, z) = variables();

        let inner = Expression::apply(Operator::Add, [x, y]).unwrap();
        let outer = Expression::apply(Operator::Add, [inner.clone(), Expression::from(z)]).unwrap();

        assert_eq!("add(x,y,z)", outer.render(&Letters));
        assert_eq!("add(x,y)", inner.render(&Letters));
    }

    #[test]
    fn non_associative_operators_are_kept() {
        let (x, y, z) = variables();

        let inner = Expression::apply(Operator::Sub, [x, y]).unwrap();
        let outer = Expression::apply(Operator::Sub, [inner, Expression::from(z)]).unwrap();

        assert_eq!("sub(sub(x,y),z)", outer.render(&Letters));
    }

    #[test]
    fn wrong_operand_count_is_an_arity_error() {
        let (x, _, _) = variables();

        let result = Expression::apply(Operator::Eq, [x]);
        assert_eq!(
            Err(ArityError::InvalidOperandCount {
                operator: "eq",
                expected: "at least 2".to_owned(),
                actual: 1,
            }),
            result
        );
    }

    #[test]
    fn variables_are_listed_once() {
        let (x, y, _) = variables();

        let expression = Expression::apply(
            Operator::Add,
            [
                Expression::from(x),
                Expression::from(y),
                Expression::from(x),
            ],
        )
        .unwrap();

        assert_eq!(vec![x, y], expression.variables());
    }

    #[test]
    fn evaluation() {
        let (x, y, _) = variables();
        let assignment = |variable: VariableId| Some(if variable == x { 3 } else { 5 });

        let distance = Expression::apply(Operator::Dist, [x, y]).unwrap();
        assert_eq!(Some(2), distance.evaluate(&assignment));

        let membership = Expression::apply(
            Operator::In,
            [Expression::from(x), Expression::set([1, 3])],
        )
        .unwrap();
        assert_eq!(Some(1), membership.evaluate(&assignment));

        let division = Expression::apply(Operator::Div, [Expression::from(x), Expression::from(0)])
            .unwrap();
        assert_eq!(None, division.evaluate(&assignment));
    }

    #[test]
    fn sets_are_normalised() {
        assert_eq!("set(1,2,5)", Expression::set([5, 1, 2, 1]).render(&Letters));
    }
}
