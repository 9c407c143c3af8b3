use crate::constraints::Constraint;
use crate::expressions::Expression;
use crate::expressions::PartialConstraint;
use crate::ArityError;
use crate::ModelError;

/// Anything which can be handed to [`crate::Model::satisfy`].
///
/// Lists can be nested arbitrarily; they are flattened in order. The constraints of one list are
/// posted together, which allows the compiler to fold similar constraints into a group.
#[derive(Clone, Debug)]
pub enum SatisfyItem {
    Constraint(Constraint),
    /// A predicate, posted as an intension constraint.
    Expression(Expression),
    /// A partial constraint is never a valid item; it is kept to report a helpful error.
    Partial(PartialConstraint),
    List(Vec<SatisfyItem>),
}

impl SatisfyItem {
    pub(crate) fn is_list(&self) -> bool {
        matches!(self, SatisfyItem::List(_))
    }

    /// Flatten the item into constraints, in the order they were given.
    pub(crate) fn flatten_into(self, constraints: &mut Vec<Constraint>) -> Result<(), ModelError> {
        match self {
            SatisfyItem::Constraint(constraint) => constraints.push(constraint),
            SatisfyItem::Expression(expression) => {
                constraints.push(Constraint::intension(expression)?);
            }
            SatisfyItem::Partial(partial) => {
                return Err(ArityError::IncompletePartialConstraint {
                    kind: partial.kind(),
                }
                .into());
            }
            SatisfyItem::List(items) => {
                for item in items {
                    item.flatten_into(constraints)?;
                }
            }
        }

        Ok(())
    }
}

impl From<Constraint> for SatisfyItem {
    fn from(value: Constraint) -> Self {
        SatisfyItem::Constraint(value)
    }
}

impl From<Expression> for SatisfyItem {
    fn from(value: Expression) -> Self {
        SatisfyItem::Expression(value)
    }
}

impl From<PartialConstraint> for SatisfyItem {
    fn from(value: PartialConstraint) -> Self {
        SatisfyItem::Partial(value)
    }
}

impl<T: Into<SatisfyItem>> From<Vec<T>> for SatisfyItem {
    fn from(value: Vec<T>) -> Self {
        SatisfyItem::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SatisfyItem>> FromIterator<T> for SatisfyItem {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        SatisfyItem::List(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expressions::sum;
    use crate::expressions::Term;
    use crate::variables::ModelId;
    use crate::variables::VariableId;

    #[test]
    fn nested_lists_are_flattened_in_order() {
        let model = ModelId::fresh();
        let x = VariableId::new(model, 0);
        let y = VariableId::new(model, 1);

        let item = SatisfyItem::from(vec![
            SatisfyItem::from(x.less_than(y)),
            SatisfyItem::from(vec![x.not_equals(2), y.not_equals(2)]),
        ]);

        let mut constraints = vec![];
        item.flatten_into(&mut constraints).unwrap();

        assert_eq!(
            vec![
                Constraint::Intension(x.less_than(y)),
                Constraint::Intension(x.not_equals(2)),
                Constraint::Intension(y.not_equals(2)),
            ],
            constraints
        );
    }

    #[test]
    fn partial_constraints_are_incomplete() {
        let x = VariableId::new(ModelId::fresh(), 0);

        let mut constraints = vec![];
        let result = SatisfyItem::from(sum([x]).unwrap()).flatten_into(&mut constraints);

        assert_eq!(
            Err(ModelError::Arity(ArityError::IncompletePartialConstraint {
                kind: "sum"
            })),
            result
        );
    }

    #[test]
    fn numeric_expressions_are_rejected() {
        let x = VariableId::new(ModelId::fresh(), 0);

        let mut constraints = vec![];
        let result = SatisfyItem::from(x + 1).flatten_into(&mut constraints);

        assert_eq!(Err(ModelError::NotAPredicate), result);
    }
}
