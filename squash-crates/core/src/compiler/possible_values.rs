//! Compute the values an expression can take, which become the domain of the auxiliary variable
//! replacing it.
//!
//! Values are enumerated as long as the number of combinations stays small; beyond that the
//! computation falls back to interval arithmetic on the bounds.
use std::collections::BTreeSet;

use itertools::Itertools;

use crate::expressions::apply_operator;
use crate::expressions::Expression;
use crate::expressions::Names;
use crate::expressions::Node;
use crate::expressions::Operator;
use crate::expressions::PartialConstraint;
use crate::model::VariableStore;
use crate::values::Domain;
use crate::values::DomainKind;
use crate::DomainError;

/// The largest number of combinations enumerated for one operation.
const ENUMERATION_LIMIT: usize = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Values {
    Finite(BTreeSet<i64>),
    Bounds(i64, i64),
}

impl Values {
    fn bounds(&self) -> (i64, i64) {
        match self {
            Values::Finite(values) => (
                values.first().copied().unwrap_or(0),
                values.last().copied().unwrap_or(0),
            ),
            Values::Bounds(lower, upper) => (*lower, *upper),
        }
    }

    fn into_domain(self) -> Result<Domain, DomainError> {
        match self {
            Values::Finite(values) => Domain::from_integers(values),
            Values::Bounds(lower, upper) => Domain::between(lower, upper),
        }
    }
}

pub(crate) fn possible_values(
    expression: &Expression,
    variables: &VariableStore,
) -> Result<Domain, DomainError> {
    values_of(expression, variables)?.into_domain()
}

fn values_of(expression: &Expression, variables: &VariableStore) -> Result<Values, DomainError> {
    match expression.node() {
        Node::Constant(value) => Ok(Values::Finite(BTreeSet::from([*value]))),
        Node::Variable(variable) => {
            let domain = variables.domain_of(*variable);
            if domain.kind() == DomainKind::Symbolic {
                return Err(DomainError::NotNumeric {
                    variable: variables.name_of(*variable).to_owned(),
                });
            }

            match domain.size() {
                Some(size) if size as usize <= ENUMERATION_LIMIT => {
                    Ok(Values::Finite(domain.integer_values().collect()))
                }
                _ => Ok(Values::Bounds(
                    domain.smallest().unwrap_or(i64::MIN),
                    domain.greatest().unwrap_or(i64::MAX),
                )),
            }
        }
        Node::Set(values) => Ok(Values::Finite(values.iter().copied().collect())),
        Node::Operation { operator, operands } => {
            if operator.is_predicate() {
                return Ok(truth_values());
            }

            let operands = operands
                .iter()
                .map(|operand| values_of(operand, variables))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(operation_values(*operator, operands))
        }
        Node::Partial(partial) => partial_values(partial, variables),
    }
}

fn truth_values() -> Values {
    Values::Finite(BTreeSet::from([0, 1]))
}

fn operation_values(operator: Operator, operands: Vec<Values>) -> Values {
    match operator {
        Operator::Neg | Operator::Abs | Operator::Sqr => unary(operator, &operands[0]),
        Operator::If => union(&operands[1..]),
        _ => operands
            .into_iter()
            .reduce(|lhs, rhs| binary(operator, &lhs, &rhs))
            .unwrap_or_else(truth_values),
    }
}

fn partial_values(
    partial: &PartialConstraint,
    variables: &VariableStore,
) -> Result<Values, DomainError> {
    let values_of_list = |list: &[Expression]| {
        list.iter()
            .map(|expression| values_of(expression, variables))
            .collect::<Result<Vec<_>, _>>()
    };

    let values = match partial {
        PartialConstraint::Sum {
            terms,
            coefficients,
        } => {
            let coefficients = coefficients
                .clone()
                .unwrap_or_else(|| vec![1; terms.len()]);

            values_of_list(terms)?
                .iter()
                .zip(coefficients)
                .map(|(values, coefficient)| {
                    binary(
                        Operator::Mul,
                        values,
                        &Values::Finite(BTreeSet::from([coefficient])),
                    )
                })
                .reduce(|lhs, rhs| binary(Operator::Add, &lhs, &rhs))
                .unwrap_or(Values::Finite(BTreeSet::from([0])))
        }
        PartialConstraint::Count { list, .. } => Values::Finite((0..=list.len() as i64).collect()),
        PartialConstraint::NValues { list, except } => {
            let lower = if except.is_empty() { 1 } else { 0 };
            Values::Finite((lower..=list.len() as i64).collect())
        }
        PartialConstraint::Minimum { list } => operation_values(Operator::Min, values_of_list(list)?),
        PartialConstraint::Maximum { list } => operation_values(Operator::Max, values_of_list(list)?),
        PartialConstraint::Element { list, .. } => union(&values_of_list(list)?),
    };

    Ok(values)
}

fn union(values: &[Values]) -> Values {
    if values.iter().all(|values| matches!(values, Values::Finite(_))) {
        let union = values
            .iter()
            .flat_map(|values| match values {
                Values::Finite(values) => values.iter().copied().collect::<Vec<_>>(),
                Values::Bounds(..) => vec![],
            })
            .collect::<BTreeSet<_>>();

        if union.len() <= ENUMERATION_LIMIT {
            return Values::Finite(union);
        }
    }

    let lower = values.iter().map(|values| values.bounds().0).min();
    let upper = values.iter().map(|values| values.bounds().1).max();
    Values::Bounds(lower.unwrap_or(0), upper.unwrap_or(0))
}

fn unary(operator: Operator, operand: &Values) -> Values {
    if let Values::Finite(values) = operand {
        return Values::Finite(
            values
                .iter()
                .filter_map(|value| apply_operator(operator, &[*value]))
                .collect(),
        );
    }

    let (lower, upper) = operand.bounds();
    let (abs_lower, abs_upper) = if lower >= 0 {
        (lower, upper)
    } else if upper <= 0 {
        (upper.saturating_neg(), lower.saturating_neg())
    } else {
        (0, upper.max(lower.saturating_neg()))
    };

    match operator {
        Operator::Neg => Values::Bounds(upper.saturating_neg(), lower.saturating_neg()),
        Operator::Abs => Values::Bounds(abs_lower, abs_upper),
        _ => Values::Bounds(
            abs_lower.saturating_mul(abs_lower),
            abs_upper.saturating_mul(abs_upper),
        ),
    }
}

fn binary(operator: Operator, lhs: &Values, rhs: &Values) -> Values {
    if let (Values::Finite(left), Values::Finite(right)) = (lhs, rhs) {
        if left.len().saturating_mul(right.len()) <= ENUMERATION_LIMIT {
            return Values::Finite(
                left.iter()
                    .cartesian_product(right)
                    .filter_map(|(x, y)| apply_operator(operator, &[*x, *y]))
                    .collect(),
            );
        }
    }

    let (lower_left, upper_left) = lhs.bounds();
    let (lower_right, upper_right) = rhs.bounds();

    let corners = |combine: fn(i64, i64) -> Option<i64>| {
        let results = [
            (lower_left, lower_right),
            (lower_left, upper_right),
            (upper_left, lower_right),
            (upper_left, upper_right),
        ]
        .into_iter()
        .map(|(x, y)| combine(x, y))
        .collect::<Option<Vec<_>>>();

        match results {
            Some(results) => Values::Bounds(
                results.iter().copied().min().unwrap_or(i64::MIN),
                results.iter().copied().max().unwrap_or(i64::MAX),
            ),
            None => Values::Bounds(i64::MIN, i64::MAX),
        }
    };

    match operator {
        Operator::Add => Values::Bounds(
            lower_left.saturating_add(lower_right),
            upper_left.saturating_add(upper_right),
        ),
        Operator::Sub => Values::Bounds(
            lower_left.saturating_sub(upper_right),
            upper_left.saturating_sub(lower_right),
        ),
        Operator::Mul => corners(i64::checked_mul),
        Operator::Div => {
            let divisors = [lower_right, upper_right, -1, 1]
                .into_iter()
                .filter(|divisor| *divisor != 0 && (lower_right..=upper_right).contains(divisor))
                .collect::<Vec<_>>();
            let quotients = [lower_left, upper_left]
                .into_iter()
                .cartesian_product(divisors)
                .filter_map(|(x, y)| x.checked_div(y))
                .collect::<Vec<_>>();

            match quotients.iter().minmax().into_option() {
                Some((lower, upper)) => Values::Bounds(*lower, *upper),
                None => Values::Bounds(i64::MIN, i64::MAX),
            }
        }
        Operator::Mod => {
            let largest = lower_right
                .saturating_abs()
                .max(upper_right.saturating_abs())
                .saturating_sub(1);
            Values::Bounds(
                if lower_left < 0 { -largest } else { 0 },
                if upper_left > 0 { largest } else { 0 },
            )
        }
        Operator::Pow => {
            let exponent = u32::try_from(upper_right.max(0)).unwrap_or(u32::MAX);
            let base = lower_left.saturating_abs().max(upper_left.saturating_abs());
            let largest = base.saturating_pow(exponent);
            Values::Bounds(if lower_left >= 0 { 0 } else { -largest }, largest)
        }
        Operator::Dist => Values::Bounds(
            0,
            upper_left
                .saturating_sub(lower_right)
                .max(upper_right.saturating_sub(lower_left)),
        ),
        Operator::Min => Values::Bounds(lower_left.min(lower_right), upper_left.min(upper_right)),
        Operator::Max => Values::Bounds(lower_left.max(lower_right), upper_left.max(upper_right)),
        _ => truth_values(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expressions::count;
    use crate::expressions::dist;
    use crate::expressions::sum;
    use crate::variables::ModelId;

    fn store() -> (VariableStore, Expression, Expression) {
        let mut store = VariableStore::new(ModelId::fresh());
        let x = store
            .declare_variable(Some("x"), Domain::new(0..=3).unwrap())
            .unwrap();
        let y = store
            .declare_variable(Some("y"), Domain::new(vec![1, 5]).unwrap())
            .unwrap();

        (store, x.into(), y.into())
    }

    #[test]
    fn small_operations_are_enumerated() {
        let (store, x, y) = store();

        let domain = possible_values(&(&x + &y), &store).unwrap();

        assert_eq!(Domain::new(vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap(), domain);
        assert_eq!(
            Domain::new(0..=5).unwrap(),
            possible_values(&dist(&x, &y), &store).unwrap()
        );
    }

    #[test]
    fn predicates_are_binary() {
        let (store, x, y) = store();

        let domain =
            possible_values(&Expression::binary(Operator::Lt, x, y), &store).unwrap();

        assert!(domain.is_binary());
    }

    #[test]
    fn partial_constraints_have_values() {
        let (store, x, y) = store();

        let total = Expression::from(sum([x.clone(), y.clone()]).unwrap());
        assert_eq!(
            Domain::new(vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap(),
            possible_values(&total, &store).unwrap()
        );

        let occurrences = Expression::from(count([x, y], [1]).unwrap());
        assert_eq!(
            Domain::new(0..=2).unwrap(),
            possible_values(&occurrences, &store).unwrap()
        );
    }

    #[test]
    fn large_domains_use_bounds() {
        let mut store = VariableStore::new(ModelId::fresh());
        let x = store
            .declare_variable(None, Domain::new(0..=1_000_000).unwrap())
            .unwrap();

        let domain = possible_values(&(x * 3 - 1), &store).unwrap();

        assert_eq!(Some(-1), domain.smallest());
        assert_eq!(Some(2_999_999), domain.greatest());
    }

    #[test]
    fn symbolic_variables_are_not_numeric() {
        let mut store = VariableStore::new(ModelId::fresh());
        let colour = store
            .declare_variable(Some("colour"), Domain::new(["red", "green"]).unwrap())
            .unwrap();

        assert_eq!(
            Err(DomainError::NotNumeric {
                variable: "colour".to_owned()
            }),
            possible_values(&(colour + 1), &store)
        );
    }
}
