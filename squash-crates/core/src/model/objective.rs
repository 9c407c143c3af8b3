use crate::expressions::Expression;
use crate::expressions::Node;
use crate::expressions::PartialConstraint;
use crate::variables::VariableId;

/// Whether the objective is minimised or maximised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectiveDirection {
    Minimize,
    Maximize,
}

impl ObjectiveDirection {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectiveDirection::Minimize => "minimize",
            ObjectiveDirection::Maximize => "maximize",
        }
    }
}

/// The value to optimise: an arithmetic expression, or a function such as a sum, which is
/// written with a dedicated `type`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObjectiveTarget {
    Expression(Expression),
    Partial(PartialConstraint),
}

impl From<Expression> for ObjectiveTarget {
    fn from(value: Expression) -> Self {
        match value.node() {
            Node::Partial(partial) => ObjectiveTarget::Partial(partial.as_ref().clone()),
            _ => ObjectiveTarget::Expression(value),
        }
    }
}

impl From<VariableId> for ObjectiveTarget {
    fn from(value: VariableId) -> Self {
        ObjectiveTarget::Expression(value.into())
    }
}

impl From<PartialConstraint> for ObjectiveTarget {
    fn from(value: PartialConstraint) -> Self {
        ObjectiveTarget::Partial(value)
    }
}

impl ObjectiveTarget {
    pub(crate) fn variables(&self) -> Vec<VariableId> {
        match self {
            ObjectiveTarget::Expression(expression) => expression.variables(),
            ObjectiveTarget::Partial(partial) => Expression::from(partial.clone()).variables(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Objective {
    pub(crate) direction: ObjectiveDirection,
    pub(crate) target: ObjectiveTarget,
}
