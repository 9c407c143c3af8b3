//! Replace the sub-expressions which cannot be written where they occur by auxiliary variables.
//!
//! Every replaced sub-expression gets one variable in the array `aux_gb`, together with a
//! constraint linking the variable to the sub-expression. Structurally equal sub-expressions share
//! their variable. The linking constraints are rewritten in turn and are posted right after the
//! constraints which caused them.
use log::debug;

use super::possible_values::possible_values;
use super::CompilationContext;
use crate::constraints::ChannelTarget;
use crate::constraints::Constraint;
use crate::constraints::Occurrence;
use crate::containers::HashMap;
use crate::expressions::Condition;
use crate::expressions::ConditionOperand;
use crate::expressions::ConditionOperator;
use crate::expressions::Expression;
use crate::expressions::Node;
use crate::expressions::Operator;
use crate::expressions::PartialConstraint;
use crate::model::Entry;
use crate::model::EntryBody;
use crate::model::ObjectiveTarget;
use crate::model::VariableStore;
use crate::variables::VariableId;
use crate::ModelError;

pub(crate) fn run(context: &mut CompilationContext<'_>) -> Result<(), ModelError> {
    let mut introducer = Introducer {
        variables: &mut context.variables,
        cache: HashMap::default(),
        links: vec![],
    };

    let mut entries = Vec::with_capacity(context.entries.len());
    for entry in std::mem::take(&mut context.entries) {
        match entry.body {
            EntryBody::Single(constraint) => {
                let constraint = introducer.rewrite(constraint)?;
                entries.push(Entry {
                    body: EntryBody::Single(constraint),
                    decoration: entry.decoration,
                });

                for link in introducer.rewrite_links()? {
                    entries.push(single(link));
                }
            }
            EntryBody::Gather(constraints) => {
                let constraints = constraints
                    .into_iter()
                    .map(|constraint| introducer.rewrite(constraint))
                    .collect::<Result<Vec<_>, _>>()?;
                entries.push(Entry {
                    body: EntryBody::Gather(constraints),
                    decoration: entry.decoration,
                });

                let links = introducer.rewrite_links()?;
                if !links.is_empty() {
                    entries.push(gather(links));
                }
            }
        }
    }

    if let Some(objective) = context.objective.as_mut() {
        objective.target = introducer.rewrite_objective(objective.target.clone())?;

        let links = introducer.rewrite_links()?;
        if !links.is_empty() {
            entries.push(gather(links));
        }
    }

    context.statistics.auxiliary_variables = introducer.cache.len();
    context.statistics.constraints = entries
        .iter()
        .map(|entry| match &entry.body {
            EntryBody::Single(_) => 1,
            EntryBody::Gather(constraints) => constraints.len(),
        })
        .sum();
    context.entries = entries;

    debug!(
        "Introduced {} auxiliary variables",
        context.statistics.auxiliary_variables
    );

    Ok(())
}

fn single(constraint: Constraint) -> Entry {
    Entry {
        body: EntryBody::Single(constraint),
        decoration: Default::default(),
    }
}

fn gather(mut constraints: Vec<Constraint>) -> Entry {
    let body = if constraints.len() == 1 {
        EntryBody::Single(constraints.remove(0))
    } else {
        EntryBody::Gather(constraints)
    };

    Entry {
        body,
        decoration: Default::default(),
    }
}

struct Introducer<'a> {
    variables: &'a mut VariableStore,
    cache: HashMap<Expression, VariableId>,
    /// Linking constraints which have not been rewritten yet.
    links: Vec<Constraint>,
}

impl Introducer<'_> {
    /// Rewrite the pending linking constraints, including the links they cause in turn.
    fn rewrite_links(&mut self) -> Result<Vec<Constraint>, ModelError> {
        let mut rewritten = vec![];

        while !self.links.is_empty() {
            for link in std::mem::take(&mut self.links) {
                rewritten.push(self.rewrite(link)?);
            }
        }

        Ok(rewritten)
    }

    fn rewrite(&mut self, constraint: Constraint) -> Result<Constraint, ModelError> {
        let constraint = match constraint {
            Constraint::Intension(expression) => {
                Constraint::Intension(self.lift_partials(&expression)?)
            }
            Constraint::Extension { list, table } => Constraint::Extension {
                list: self.variables_only(list)?,
                table,
            },
            Constraint::AllDifferent { list, except } => Constraint::AllDifferent {
                list: self.leaves(list)?,
                except,
            },
            Constraint::AllEqual { list } => Constraint::AllEqual {
                list: self.leaves(list)?,
            },
            Constraint::Ordered { list, operator } => Constraint::Ordered {
                list: self.leaves(list)?,
                operator,
            },
            Constraint::Conditional {
                function,
                condition,
            } => Constraint::Conditional {
                function: self.rewrite_function(function)?,
                condition: self.rewrite_condition(condition)?,
            },
            Constraint::Circuit { list, start_index } => Constraint::Circuit {
                list: self.variables_only(list)?,
                start_index,
            },
            Constraint::NoOverlap {
                origins,
                lengths,
                zero_ignored,
            } => Constraint::NoOverlap {
                origins: self.variables_only(origins)?,
                lengths: self.leaves(lengths)?,
                zero_ignored,
            },
            Constraint::Cumulative {
                origins,
                lengths,
                heights,
                condition,
            } => Constraint::Cumulative {
                origins: self.variables_only(origins)?,
                lengths: self.leaves(lengths)?,
                heights: self.leaves(heights)?,
                condition: self.rewrite_condition(condition)?,
            },
            instantiation @ Constraint::Instantiation { .. } => instantiation,
            Constraint::Lex { lists, operator } => Constraint::Lex {
                lists: lists
                    .into_iter()
                    .map(|list| self.leaves(list))
                    .collect::<Result<_, _>>()?,
                operator,
            },
            Constraint::Channel {
                list,
                start_index,
                target,
            } => Constraint::Channel {
                list,
                start_index,
                target: match target {
                    ChannelTarget::Value(value) => ChannelTarget::Value(self.variable(&value)?),
                    target => target,
                },
            },
            Constraint::Cardinality {
                list,
                values,
                occurs,
                closed,
            } => Constraint::Cardinality {
                list: self.variables_only(list)?,
                values: self.leaves(values)?,
                occurs: occurs
                    .into_iter()
                    .map(|occurrence| match occurrence {
                        Occurrence::Exactly(expression) => {
                            self.leaf(&expression).map(Occurrence::Exactly)
                        }
                        range @ Occurrence::Between(..) => Ok(range),
                    })
                    .collect::<Result<_, _>>()?,
                closed,
            },
            Constraint::Regular { list, automaton } => Constraint::Regular {
                list: self.variables_only(list)?,
                automaton,
            },
            Constraint::Mdd { list, mdd } => Constraint::Mdd {
                list: self.variables_only(list)?,
                mdd,
            },
            Constraint::Precedence {
                list,
                values,
                covered,
            } => Constraint::Precedence {
                list: self.variables_only(list)?,
                values,
                covered,
            },
            clause @ Constraint::Clause { .. } => clause,
            Constraint::Slide(constraints) => Constraint::Slide(
                constraints
                    .into_iter()
                    .map(|constraint| self.rewrite(constraint))
                    .collect::<Result<_, _>>()?,
            ),
        };

        Ok(constraint)
    }

    fn rewrite_objective(&mut self, target: ObjectiveTarget) -> Result<ObjectiveTarget, ModelError> {
        let target = match target {
            ObjectiveTarget::Expression(expression) => {
                ObjectiveTarget::Expression(self.lift_partials(&expression)?)
            }
            ObjectiveTarget::Partial(partial) => match partial {
                PartialConstraint::Count { .. } | PartialConstraint::Element { .. } => {
                    let variable = self.auxiliary(&Expression::from(partial))?;
                    ObjectiveTarget::Expression(variable.into())
                }
                PartialConstraint::NValues { list, except } => {
                    ObjectiveTarget::Partial(PartialConstraint::NValues {
                        list: self.variables_only(list)?,
                        except,
                    })
                }
                PartialConstraint::Minimum { list } => {
                    ObjectiveTarget::Partial(PartialConstraint::Minimum {
                        list: self.variables_only(list)?,
                    })
                }
                PartialConstraint::Maximum { list } => {
                    ObjectiveTarget::Partial(PartialConstraint::Maximum {
                        list: self.variables_only(list)?,
                    })
                }
                sum @ PartialConstraint::Sum { .. } => {
                    ObjectiveTarget::Partial(self.rewrite_function(sum)?)
                }
            },
        };

        Ok(target)
    }

    fn rewrite_function(
        &mut self,
        function: PartialConstraint,
    ) -> Result<PartialConstraint, ModelError> {
        let function = match function {
            PartialConstraint::Sum {
                terms,
                coefficients,
            } => {
                let coefficients = coefficients.unwrap_or_else(|| vec![1; terms.len()]);
                let mut normalised_terms = Vec::with_capacity(terms.len());
                let mut normalised_coefficients = Vec::with_capacity(terms.len());

                for (term, coefficient) in terms.into_iter().zip(coefficients) {
                    let (term, factor) = match scaled_variable(&term) {
                        Some((variable, factor)) => (variable, factor),
                        None => (self.auxiliary(&term)?, 1),
                    };
                    normalised_terms.push(Expression::from(term));
                    let scaled = coefficient.checked_mul(factor).ok_or(
                        ModelError::CoefficientOverflow {
                            coefficient,
                            factor,
                        },
                    )?;
                    normalised_coefficients.push(scaled);
                }

                let coefficients = if normalised_coefficients.iter().all(|&c| c == 1) {
                    None
                } else {
                    Some(normalised_coefficients)
                };

                PartialConstraint::Sum {
                    terms: normalised_terms,
                    coefficients,
                }
            }
            PartialConstraint::Count { list, values } => PartialConstraint::Count {
                list: self.leaves(list)?,
                values,
            },
            PartialConstraint::NValues { list, except } => PartialConstraint::NValues {
                list: self.leaves(list)?,
                except,
            },
            PartialConstraint::Minimum { list } => PartialConstraint::Minimum {
                list: self.leaves(list)?,
            },
            PartialConstraint::Maximum { list } => PartialConstraint::Maximum {
                list: self.leaves(list)?,
            },
            PartialConstraint::Element {
                list,
                index,
                start_index,
            } => PartialConstraint::Element {
                list: self.leaves(list)?,
                index: self.variable(&index)?,
                start_index,
            },
        };

        Ok(function)
    }

    fn rewrite_condition(&mut self, condition: Condition) -> Result<Condition, ModelError> {
        let operand = match condition.operand {
            ConditionOperand::Expression(expression) => {
                ConditionOperand::Expression(self.leaf(&expression)?)
            }
            operand => operand,
        };

        Ok(Condition {
            operator: condition.operator,
            operand,
        })
    }

    /// Keep variables and constants; replace everything else.
    fn leaves(&mut self, list: Vec<Expression>) -> Result<Vec<Expression>, ModelError> {
        list.iter().map(|expression| self.leaf(expression)).collect()
    }

    /// Keep variables; replace everything else, including constants.
    fn variables_only(&mut self, list: Vec<Expression>) -> Result<Vec<Expression>, ModelError> {
        list.iter()
            .map(|expression| self.variable(expression))
            .collect()
    }

    fn leaf(&mut self, expression: &Expression) -> Result<Expression, ModelError> {
        if expression.is_leaf() {
            return Ok(expression.clone());
        }

        Ok(self.auxiliary(expression)?.into())
    }

    fn variable(&mut self, expression: &Expression) -> Result<Expression, ModelError> {
        if expression.as_variable().is_some() {
            return Ok(expression.clone());
        }

        Ok(self.auxiliary(expression)?.into())
    }

    /// Replace the partial constraints inside an expression.
    fn lift_partials(&mut self, expression: &Expression) -> Result<Expression, ModelError> {
        match expression.node() {
            Node::Partial(_) => Ok(self.auxiliary(expression)?.into()),
            Node::Operation { operator, operands } => {
                let operands = operands
                    .iter()
                    .map(|operand| self.lift_partials(operand))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expression::operation(*operator, operands))
            }
            Node::Constant(_) | Node::Variable(_) | Node::Set(_) => Ok(expression.clone()),
        }
    }

    fn auxiliary(&mut self, expression: &Expression) -> Result<VariableId, ModelError> {
        if let Some(variable) = self.cache.get(expression) {
            return Ok(*variable);
        }

        let domain = possible_values(expression, self.variables)?;
        let variable = self.variables.declare_auxiliary(domain);
        let _ = self.cache.insert(expression.clone(), variable);

        let link = match expression.node() {
            Node::Partial(partial) => Constraint::Conditional {
                function: partial.as_ref().clone(),
                condition: Condition::new(ConditionOperator::Eq, variable),
            },
            _ => Constraint::Intension(Expression::binary(
                Operator::Eq,
                variable.into(),
                expression.clone(),
            )),
        };
        self.links.push(link);

        Ok(variable)
    }
}

/// Recognise `x`, `k * x` and `x * k`.
fn scaled_variable(expression: &Expression) -> Option<(VariableId, i64)> {
    if let Some(variable) = expression.as_variable() {
        return Some((variable, 1));
    }

    let Node::Operation {
        operator: Operator::Mul,
        operands,
    } = expression.node()
    else {
        return None;
    };

    match operands.as_slice() {
        [lhs, rhs] => match (lhs.as_variable(), rhs.as_constant()) {
            (Some(variable), Some(factor)) => Some((variable, factor)),
            _ => Some((rhs.as_variable()?, lhs.as_constant()?)),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::all_different;
    use crate::constraints::cardinality;
    use crate::constraints::extension;
    use crate::constraints::Table;
    use crate::expressions::count;
    use crate::expressions::sum;
    use crate::expressions::weighted_sum;
    use crate::values::Domain;
    use crate::CompileOptions;
    use crate::Model;

    fn model() -> (Model, VariableId, VariableId, VariableId) {
        let mut model = Model::new("aux");
        let mut declare = |name| {
            model
                .new_named_variable(name, Domain::new(0..=2).expect("non-empty domain"))
                .expect("valid name")
        };
        let (x, y, z) = (declare("x"), declare("y"), declare("z"));
        (model, x, y, z)
    }

    fn rewritten<'a>(model: &Model, options: &'a CompileOptions) -> CompilationContext<'a> {
        let mut context = CompilationContext::new(model, options);
        run(&mut context).expect("rewriting succeeds");
        context
    }

    fn constraints(context: &CompilationContext<'_>) -> Vec<Constraint> {
        context
            .entries
            .iter()
            .flat_map(|entry| match &entry.body {
                EntryBody::Single(constraint) => vec![constraint.clone()],
                EntryBody::Gather(constraints) => constraints.clone(),
            })
            .collect()
    }

    #[test]
    fn table_columns_holding_expressions_get_a_variable() {
        let (mut model, x, y, z) = model();
        let table = Table::supports([[2, 0], [3, 1]]);
        model
            .satisfy(extension([x + y, z.into()], table).expect("valid table"))
            .post()
            .expect("constraint is posted");

        let options = CompileOptions::default();
        let context = rewritten(&model, &options);
        let constraints = constraints(&context);

        assert_eq!(1, context.statistics.auxiliary_variables);
        assert_eq!(2, constraints.len());

        let Constraint::Extension { list, .. } = &constraints[0] else {
            panic!("expected the table constraint first, got {:?}", constraints[0]);
        };
        assert_eq!("aux_gb[0]", list[0].render(&context.variables));

        let Constraint::Intension(link) = &constraints[1] else {
            panic!("expected a linking constraint, got {:?}", constraints[1]);
        };
        assert_eq!("eq(aux_gb[0],add(x,y))", link.render(&context.variables));

        let auxiliary = list[0].as_variable().expect("a variable");
        assert_eq!("0..4", context.variables.domain_of(auxiliary).to_string());
    }

    #[test]
    fn equal_expressions_share_their_variable() {
        let (mut model, x, y, z) = model();
        model
            .satisfy(vec![
                all_different([x + y, z.into()]).expect("non-empty list"),
                all_different([x + y, x.into()]).expect("non-empty list"),
            ])
            .post()
            .expect("constraints are posted");

        let options = CompileOptions::default();
        let context = rewritten(&model, &options);

        assert_eq!(1, context.statistics.auxiliary_variables);
        assert_eq!(2, context.entries.len());
        assert!(matches!(context.entries[0].body, EntryBody::Gather(ref constraints) if constraints.len() == 2));
        assert!(matches!(context.entries[1].body, EntryBody::Single(_)));
    }

    #[test]
    fn scaled_variables_become_coefficients() {
        let (mut model, x, y, _) = model();
        model
            .satisfy(
                sum([x * 2, y.into()])
                    .expect("non-empty sum")
                    .less_than_or_equals(3),
            )
            .post()
            .expect("constraint is posted");

        let options = CompileOptions::default();
        let context = rewritten(&model, &options);
        let constraints = constraints(&context);

        assert_eq!(0, context.statistics.auxiliary_variables);
        let Constraint::Conditional {
            function: PartialConstraint::Sum { coefficients, .. },
            ..
        } = &constraints[0]
        else {
            panic!("expected a sum, got {:?}", constraints[0]);
        };
        assert_eq!(&Some(vec![2, 1]), coefficients);
    }

    #[test]
    fn computed_occurrences_get_a_variable() {
        let (mut model, x, y, z) = model();
        model
            .satisfy(cardinality([x, y], [(0, x + z)], false).expect("valid occurrences"))
            .post()
            .expect("constraint is posted");

        let options = CompileOptions::default();
        let context = rewritten(&model, &options);
        let constraints = constraints(&context);

        let Constraint::Cardinality { occurs, .. } = &constraints[0] else {
            panic!("expected the cardinality first, got {:?}", constraints[0]);
        };
        let [Occurrence::Exactly(occurs)] = occurs.as_slice() else {
            panic!("expected one occurrence, got {occurs:?}");
        };
        assert_eq!("aux_gb[0]", occurs.render(&context.variables));
        assert_eq!(2, constraints.len());
    }

    #[test]
    fn overflowing_coefficients_are_rejected() {
        let (mut model, x, y, _) = model();
        model
            .satisfy(
                weighted_sum([x * i64::MAX, y.into()], [2, 1])
                    .expect("matching coefficients")
                    .equals(0),
            )
            .post()
            .expect("constraint is posted");

        let options = CompileOptions::default();
        let mut context = CompilationContext::new(&model, &options);

        assert_eq!(
            Err(ModelError::CoefficientOverflow {
                coefficient: 2,
                factor: i64::MAX,
            }),
            run(&mut context)
        );
    }

    #[test]
    fn counted_objectives_are_replaced() {
        let (mut model, x, y, z) = model();
        model
            .maximize(count([x, y, z], [1]).expect("non-empty count"))
            .expect("objective is set");

        let options = CompileOptions::default();
        let context = rewritten(&model, &options);
        let constraints = constraints(&context);

        let target = context.objective.as_ref().map(|objective| &objective.target);
        let Some(ObjectiveTarget::Expression(target)) = target else {
            panic!("expected the objective to be a variable, got {target:?}");
        };
        assert_eq!("aux_gb[0]", target.render(&context.variables));
        assert!(matches!(
            constraints.as_slice(),
            [Constraint::Conditional {
                function: PartialConstraint::Count { .. },
                ..
            }]
        ));
    }

    #[test]
    fn rewriting_is_repeatable() {
        let (mut model, x, y, z) = model();
        model
            .satisfy(sum([x * y, z.into()]).expect("non-empty sum").equals(2))
            .post()
            .expect("constraint is posted");

        let options = CompileOptions::default();
        let first = rewritten(&model, &options);
        let second = rewritten(&model, &options);

        assert_eq!(1, first.statistics.auxiliary_variables);
        assert_eq!(
            first.variables.variable_count(),
            second.variables.variable_count()
        );
        assert_eq!(constraints(&first), constraints(&second));
    }
}
