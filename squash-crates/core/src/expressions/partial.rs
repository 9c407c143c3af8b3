use std::ops::Add;
use std::ops::Mul;
use std::ops::RangeInclusive;

use itertools::Itertools;

use super::Condition;
use super::ConditionOperator;
use super::Expression;
use crate::constraints::Constraint;
use crate::ArityError;

/// A function over a list of expressions which only becomes a constraint once its value is
/// compared to something.
///
/// Partial constraints are created with [`sum`], [`count`], [`n_values`], [`minimum`],
/// [`maximum`] and [`element`]. They are completed by one of the comparison methods, such as
/// [`PartialConstraint::less_than_or_equals`]. A partial constraint can also be used as a value
/// inside an [`Expression`] or as an objective; when it is used inside an expression, the
/// compiler replaces it by an auxiliary variable.
///
/// # Example
/// ```
/// # use squash_core::expressions::sum;
/// # use squash_core::values::Domain;
/// # use squash_core::Model;
/// let mut model = Model::default();
/// let x = model.new_variable(Domain::new(0..10).unwrap()).unwrap();
/// let y = model.new_variable(Domain::new(0..10).unwrap()).unwrap();
///
/// let constraint = sum([x, y]).unwrap().less_than_or_equals(12);
/// model.satisfy(constraint).post().unwrap();
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartialConstraint {
    Sum {
        terms: Vec<Expression>,
        coefficients: Option<Vec<i64>>,
    },
    Count {
        list: Vec<Expression>,
        values: Vec<i64>,
    },
    NValues {
        list: Vec<Expression>,
        except: Vec<i64>,
    },
    Minimum {
        list: Vec<Expression>,
    },
    Maximum {
        list: Vec<Expression>,
    },
    Element {
        list: Vec<Expression>,
        index: Expression,
        start_index: i64,
    },
}

/// The sum of the given terms.
pub fn sum(
    terms: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<PartialConstraint, ArityError> {
    let terms = non_empty(terms, "sum")?;
    Ok(PartialConstraint::Sum {
        terms,
        coefficients: None,
    })
}

/// The sum of the terms, each multiplied with the coefficient at the same position.
pub fn weighted_sum(
    terms: impl IntoIterator<Item = impl Into<Expression>>,
    coefficients: impl IntoIterator<Item = i64>,
) -> Result<PartialConstraint, ArityError> {
    let terms = non_empty(terms, "sum")?;
    let coefficients = coefficients.into_iter().collect::<Vec<_>>();

    if coefficients.len() != terms.len() {
        return Err(ArityError::MismatchedLengths {
            constraint: "sum",
            argument: "coeffs",
            expected: terms.len(),
            actual: coefficients.len(),
        });
    }

    Ok(PartialConstraint::Sum {
        terms,
        coefficients: Some(coefficients),
    })
}

/// The number of expressions in `list` which take one of `values`.
pub fn count(
    list: impl IntoIterator<Item = impl Into<Expression>>,
    values: impl IntoIterator<Item = i64>,
) -> Result<PartialConstraint, ArityError> {
    let list = non_empty(list, "count")?;
    let values = values.into_iter().collect::<Vec<_>>();

    if values.is_empty() {
        return Err(ArityError::EmptyList {
            constraint: "count",
        });
    }

    Ok(PartialConstraint::Count { list, values })
}

/// The number of distinct values taken by the expressions in `list`.
pub fn n_values(
    list: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<PartialConstraint, ArityError> {
    n_values_except(list, [])
}

/// The number of distinct values taken by the expressions in `list`, ignoring `except`.
pub fn n_values_except(
    list: impl IntoIterator<Item = impl Into<Expression>>,
    except: impl IntoIterator<Item = i64>,
) -> Result<PartialConstraint, ArityError> {
    Ok(PartialConstraint::NValues {
        list: non_empty(list, "nValues")?,
        except: except.into_iter().sorted().dedup().collect(),
    })
}

/// The smallest value among the expressions in `list`.
pub fn minimum(
    list: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<PartialConstraint, ArityError> {
    Ok(PartialConstraint::Minimum {
        list: non_empty(list, "minimum")?,
    })
}

/// The largest value among the expressions in `list`.
pub fn maximum(
    list: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<PartialConstraint, ArityError> {
    Ok(PartialConstraint::Maximum {
        list: non_empty(list, "maximum")?,
    })
}

/// The element of `list` at position `index`, where the first element has index 0.
pub fn element(
    list: impl IntoIterator<Item = impl Into<Expression>>,
    index: impl Into<Expression>,
) -> Result<PartialConstraint, ArityError> {
    element_from(list, index, 0)
}

/// The element of `list` at position `index`, where the first element has index `start_index`.
pub fn element_from(
    list: impl IntoIterator<Item = impl Into<Expression>>,
    index: impl Into<Expression>,
    start_index: i64,
) -> Result<PartialConstraint, ArityError> {
    Ok(PartialConstraint::Element {
        list: non_empty(list, "element")?,
        index: index.into(),
        start_index,
    })
}

fn non_empty(
    list: impl IntoIterator<Item = impl Into<Expression>>,
    constraint: &'static str,
) -> Result<Vec<Expression>, ArityError> {
    let list = list.into_iter().map(Into::into).collect::<Vec<_>>();

    if list.is_empty() {
        return Err(ArityError::EmptyList { constraint });
    }

    Ok(list)
}

impl PartialConstraint {
    /// The name of the function, as used for the XCSP3 constraint it completes into.
    pub fn kind(&self) -> &'static str {
        match self {
            PartialConstraint::Sum { .. } => "sum",
            PartialConstraint::Count { .. } => "count",
            PartialConstraint::NValues { .. } => "nValues",
            PartialConstraint::Minimum { .. } => "minimum",
            PartialConstraint::Maximum { .. } => "maximum",
            PartialConstraint::Element { .. } => "element",
        }
    }

    /// All expressions the function is computed over, in argument order.
    pub(crate) fn expressions(&self) -> impl Iterator<Item = &Expression> {
        let (list, index) = match self {
            PartialConstraint::Sum { terms, .. } => (terms, None),
            PartialConstraint::Count { list, .. }
            | PartialConstraint::NValues { list, .. }
            | PartialConstraint::Minimum { list }
            | PartialConstraint::Maximum { list } => (list, None),
            PartialConstraint::Element { list, index, .. } => (list, Some(index)),
        };

        list.iter().chain(index)
    }

    /// Complete the function with a condition.
    pub fn with_condition(self, condition: Condition) -> Constraint {
        Constraint::Conditional {
            function: self,
            condition,
        }
    }

    pub fn equals(self, rhs: impl Into<Expression>) -> Constraint {
        self.with_condition(Condition::new(ConditionOperator::Eq, rhs))
    }

    pub fn not_equals(self, rhs: impl Into<Expression>) -> Constraint {
        self.with_condition(Condition::new(ConditionOperator::Ne, rhs))
    }

    pub fn less_than(self, rhs: impl Into<Expression>) -> Constraint {
        self.with_condition(Condition::new(ConditionOperator::Lt, rhs))
    }

    pub fn less_than_or_equals(self, rhs: impl Into<Expression>) -> Constraint {
        self.with_condition(Condition::new(ConditionOperator::Le, rhs))
    }

    pub fn greater_than(self, rhs: impl Into<Expression>) -> Constraint {
        self.with_condition(Condition::new(ConditionOperator::Gt, rhs))
    }

    pub fn greater_than_or_equals(self, rhs: impl Into<Expression>) -> Constraint {
        self.with_condition(Condition::new(ConditionOperator::Ge, rhs))
    }

    pub fn is_in(self, values: impl IntoIterator<Item = i64>) -> Constraint {
        self.with_condition(Condition::set(values, true))
    }

    pub fn not_in(self, values: impl IntoIterator<Item = i64>) -> Constraint {
        self.with_condition(Condition::set(values, false))
    }

    pub fn is_in_range(self, range: RangeInclusive<i64>) -> Constraint {
        self.with_condition(Condition::range(range, true))
    }

    pub fn not_in_range(self, range: RangeInclusive<i64>) -> Constraint {
        self.with_condition(Condition::range(range, false))
    }

    /// View the function as a weighted sum. Functions other than sums become a single term.
    fn into_weighted_terms(self) -> (Vec<Expression>, Vec<i64>) {
        match self {
            PartialConstraint::Sum {
                terms,
                coefficients,
            } => {
                let coefficients = coefficients.unwrap_or_else(|| vec![1; terms.len()]);
                (terms, coefficients)
            }
            other => (vec![Expression::from(other)], vec![1]),
        }
    }

    fn from_weighted_terms(terms: Vec<Expression>, coefficients: Vec<i64>) -> PartialConstraint {
        let coefficients = if coefficients.iter().all(|&coefficient| coefficient == 1) {
            None
        } else {
            Some(coefficients)
        };

        PartialConstraint::Sum {
            terms,
            coefficients,
        }
    }
}

impl Add for PartialConstraint {
    type Output = PartialConstraint;

    /// The sum of both functions; the terms of sums are concatenated.
    fn add(self, rhs: PartialConstraint) -> PartialConstraint {
        let (mut terms, mut coefficients) = self.into_weighted_terms();
        let (rhs_terms, rhs_coefficients) = rhs.into_weighted_terms();

        terms.extend(rhs_terms);
        coefficients.extend(rhs_coefficients);

        PartialConstraint::from_weighted_terms(terms, coefficients)
    }
}

impl Mul<i64> for PartialConstraint {
    type Output = PartialConstraint;

    /// Scale the function; the coefficients of a sum are multiplied.
    fn mul(self, rhs: i64) -> PartialConstraint {
        let (terms, coefficients) = self.into_weighted_terms();
        let coefficients = coefficients
            .into_iter()
            .map(|coefficient| coefficient.saturating_mul(rhs))
            .collect();

        PartialConstraint::from_weighted_terms(terms, coefficients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::ModelId;
    use crate::variables::VariableId;

    fn variables(count: u32) -> Vec<VariableId> {
        let model = ModelId::fresh();
        (0..count).map(|index| VariableId::new(model, index)).collect()
    }

    #[test]
    fn empty_lists_are_rejected() {
        assert_eq!(
            Err(ArityError::EmptyList { constraint: "sum" }),
            sum(Vec::<VariableId>::new())
        );
        assert!(minimum(Vec::<Expression>::new()).is_err());
        assert!(count(variables(2), []).is_err());
    }

    #[test]
    fn coefficients_must_match_terms() {
        let result = weighted_sum(variables(3), [1, 2]);

        assert_eq!(
            Err(ArityError::MismatchedLengths {
                constraint: "sum",
                argument: "coeffs",
                expected: 3,
                actual: 2,
            }),
            result
        );
    }

    #[test]
    fn sums_are_concatenated() {
        let variables = variables(3);

        let left = sum(&variables[..2]).unwrap();
        let right = sum(&variables[2..]).unwrap() * 3;

        let PartialConstraint::Sum {
            terms,
            coefficients,
        } = left + right
        else {
            panic!("adding sums yields a sum");
        };

        assert_eq!(3, terms.len());
        assert_eq!(Some(vec![1, 1, 3]), coefficients);
    }

    #[test]
    fn unit_coefficients_are_dropped() {
        let variables = variables(2);

        let combined = sum(&variables[..1]).unwrap() + sum(&variables[1..]).unwrap();

        assert_eq!(sum(variables).unwrap(), combined);
    }

    #[test]
    fn non_sums_become_terms() {
        let variables = variables(3);

        let combined = maximum(&variables[..2]).unwrap() + sum(&variables[2..]).unwrap();

        let PartialConstraint::Sum { terms, .. } = combined else {
            panic!("adding to a sum yields a sum");
        };
        assert!(matches!(
            terms[0].node(),
            crate::expressions::Node::Partial(_)
        ));
    }

    #[test]
    fn comparisons_complete_the_function() {
        let variables = variables(2);

        let constraint = count(variables, [1]).unwrap().greater_than_or_equals(1);

        assert!(matches!(
            constraint,
            Constraint::Conditional {
                condition: Condition {
                    operator: ConditionOperator::Ge,
                    ..
                },
                ..
            }
        ));
    }
}
