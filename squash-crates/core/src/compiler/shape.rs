//! The layout of a constraint as it is written: an element name, attributes and a list of named
//! arguments. Grouping works on shapes, since two constraints can only be folded together when
//! they are written the same way up to some of their arguments.
use crate::constraints::transitions_text;
use crate::constraints::ChannelTarget;
use crate::constraints::Constraint;
use crate::constraints::Occurrence;
use crate::constraints::Table;
use crate::expressions::Condition;
use crate::expressions::ConditionOperand;
use crate::expressions::ConditionOperator;
use crate::expressions::Expression;
use crate::expressions::Operator;
use crate::expressions::PartialConstraint;
use crate::model::Decoration;
use crate::variables::VariableId;

/// A single value in an argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Parameter {
    Variable(VariableId),
    Integer(i64),
    /// `%k` in a group template.
    Placeholder(usize),
    /// `%...` in a group template: all arguments of the instance.
    AllPlaceholders,
    /// `inf..sup`, with `inf < sup`.
    Range(i64, i64),
    /// Any other expression, written in functional notation.
    Expression(Expression),
}

impl Parameter {
    fn from_leaf(expression: &Expression) -> Parameter {
        match (expression.as_variable(), expression.as_constant()) {
            (Some(variable), _) => Parameter::Variable(variable),
            (None, Some(value)) => Parameter::Integer(value),
            (None, None) => Parameter::Expression(expression.clone()),
        }
    }
}

/// One position of a materialized table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Cell {
    Integer(i64),
    Symbol(String),
    Any,
}

/// The right-hand side of a written condition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ConditionTarget {
    Parameter(Parameter),
    Range(i64, i64),
    Set(Vec<i64>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Content {
    /// The predicate of an intension constraint.
    Tree(Expression),
    /// The predicate of a grouped intension constraint, with placeholders already filled in.
    Template(String),
    Parameters(Vec<Parameter>),
    Condition {
        operator: ConditionOperator,
        target: ConditionTarget,
    },
    /// Tuples as they were posted.
    Table(Table),
    /// Tuples after materialization: sorted, without duplicates and without ranges.
    Rows(Vec<Vec<Cell>>),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Argument {
    pub(crate) name: &'static str,
    pub(crate) attributes: Vec<(&'static str, String)>,
    pub(crate) content: Content,
}

impl Argument {
    fn new(name: &'static str, content: Content) -> Argument {
        Argument {
            name,
            attributes: vec![],
            content,
        }
    }

    fn with_attribute(mut self, key: &'static str, value: impl ToString) -> Argument {
        self.attributes.push((key, value.to_string()));
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Shape {
    pub(crate) name: &'static str,
    pub(crate) attributes: Vec<(&'static str, String)>,
    pub(crate) arguments: Vec<Argument>,
}

impl Shape {
    fn new(name: &'static str, arguments: Vec<Argument>) -> Shape {
        Shape {
            name,
            attributes: vec![],
            arguments,
        }
    }

    /// The layout of a constraint. Slides have no shape of their own; they are laid out by the
    /// grouping pass.
    pub(crate) fn of(constraint: &Constraint) -> Shape {
        match constraint {
            Constraint::Intension(expression) => Shape::new(
                "intension",
                vec![Argument::new("function", Content::Tree(expression.clone()))],
            ),
            Constraint::Extension { list, table } => Shape::new(
                "extension",
                vec![
                    list_argument("list", list),
                    Argument::new(table.polarity.name(), Content::Table(table.clone())),
                ],
            ),
            Constraint::AllDifferent { list, except } => {
                let mut arguments = vec![list_argument("list", list)];
                if !except.is_empty() {
                    arguments.push(integers_argument("except", except));
                }
                Shape::new("allDifferent", arguments)
            }
            Constraint::AllEqual { list } => {
                Shape::new("allEqual", vec![list_argument("list", list)])
            }
            Constraint::Ordered { list, operator } => Shape::new(
                "ordered",
                vec![
                    list_argument("list", list),
                    Argument::new("operator", Content::Text(operator.name().to_owned())),
                ],
            ),
            Constraint::Conditional {
                function,
                condition,
            } => function_shape(function, condition),
            Constraint::Circuit { list, start_index } => {
                let mut list = list_argument("list", list);
                if *start_index != 0 {
                    list = list.with_attribute("startIndex", start_index);
                }
                Shape::new("circuit", vec![list])
            }
            Constraint::NoOverlap {
                origins,
                lengths,
                zero_ignored,
            } => {
                let mut shape = Shape::new(
                    "noOverlap",
                    vec![
                        list_argument("origins", origins),
                        list_argument("lengths", lengths),
                    ],
                );
                if !zero_ignored {
                    shape.attributes.push(("zeroIgnored", "false".to_owned()));
                }
                shape
            }
            Constraint::Cumulative {
                origins,
                lengths,
                heights,
                condition,
            } => Shape::new(
                "cumulative",
                vec![
                    list_argument("origins", origins),
                    list_argument("lengths", lengths),
                    list_argument("heights", heights),
                    condition_argument(condition),
                ],
            ),
            Constraint::Instantiation { list, values } => Shape::new(
                "instantiation",
                vec![
                    Argument::new(
                        "list",
                        Content::Parameters(list.iter().copied().map(Parameter::Variable).collect()),
                    ),
                    integers_argument("values", values),
                ],
            ),
            Constraint::Lex { lists, operator } => {
                let mut arguments = lists
                    .iter()
                    .map(|list| list_argument("list", list))
                    .collect::<Vec<_>>();
                arguments.push(Argument::new(
                    "operator",
                    Content::Text(operator.name().to_owned()),
                ));
                Shape::new("lex", arguments)
            }
            Constraint::Channel {
                list,
                start_index,
                target,
            } => {
                let mut arguments = vec![indexed_variables(list, *start_index)];
                match target {
                    ChannelTarget::Itself => {}
                    ChannelTarget::List { list, start_index } => {
                        arguments.push(indexed_variables(list, *start_index));
                    }
                    ChannelTarget::Value(value) => arguments.push(Argument::new(
                        "value",
                        Content::Parameters(vec![Parameter::from_leaf(value)]),
                    )),
                }
                Shape::new("channel", arguments)
            }
            Constraint::Cardinality {
                list,
                values,
                occurs,
                closed,
            } => {
                let mut values = list_argument("values", values);
                if *closed {
                    values = values.with_attribute("closed", "true");
                }
                let occurs = occurs
                    .iter()
                    .map(|occurrence| match occurrence {
                        Occurrence::Exactly(expression) => Parameter::from_leaf(expression),
                        Occurrence::Between(inf, sup) if inf == sup => Parameter::Integer(*inf),
                        Occurrence::Between(inf, sup) => Parameter::Range(*inf, *sup),
                    })
                    .collect();

                Shape::new(
                    "cardinality",
                    vec![
                        list_argument("list", list),
                        values,
                        Argument::new("occurs", Content::Parameters(occurs)),
                    ],
                )
            }
            Constraint::Regular { list, automaton } => Shape::new(
                "regular",
                vec![
                    list_argument("list", list),
                    Argument::new(
                        "transitions",
                        Content::Text(transitions_text(automaton.transitions())),
                    ),
                    Argument::new("start", Content::Text(automaton.start().to_owned())),
                    Argument::new("final", Content::Text(automaton.finals().join(" "))),
                ],
            ),
            Constraint::Mdd { list, mdd } => Shape::new(
                "mdd",
                vec![
                    list_argument("list", list),
                    Argument::new(
                        "transitions",
                        Content::Text(transitions_text(mdd.transitions())),
                    ),
                ],
            ),
            Constraint::Precedence {
                list,
                values,
                covered,
            } => {
                let mut arguments = vec![list_argument("list", list)];
                if !values.is_empty() {
                    let mut values = integers_argument("values", values);
                    if *covered {
                        values = values.with_attribute("covered", "true");
                    }
                    arguments.push(values);
                }
                Shape::new("precedence", arguments)
            }
            Constraint::Clause { literals } => {
                let literals = literals
                    .iter()
                    .map(|&(variable, positive)| {
                        if positive {
                            Parameter::Variable(variable)
                        } else {
                            Parameter::Expression(Expression::unary(
                                Operator::Not,
                                variable.into(),
                            ))
                        }
                    })
                    .collect();
                Shape::new(
                    "clause",
                    vec![Argument::new("list", Content::Parameters(literals))],
                )
            }
            Constraint::Slide(_) => Shape::new("slide", vec![]),
        }
    }

    /// The shape of the objective function `partial`, written as `<minimize type="…">`.
    pub(crate) fn of_objective(partial: &PartialConstraint) -> Shape {
        match partial {
            PartialConstraint::Sum {
                terms,
                coefficients,
            } => {
                let mut arguments = vec![list_argument("list", terms)];
                if let Some(coefficients) = coefficients {
                    arguments.push(integers_argument("coeffs", coefficients));
                }
                Shape::new("sum", arguments)
            }
            PartialConstraint::Count { list, .. }
            | PartialConstraint::NValues { list, .. }
            | PartialConstraint::Minimum { list }
            | PartialConstraint::Maximum { list }
            | PartialConstraint::Element { list, .. } => {
                Shape::new(partial.kind(), vec![list_argument("list", list)])
            }
        }
    }
}

fn list_argument(name: &'static str, list: &[Expression]) -> Argument {
    Argument::new(
        name,
        Content::Parameters(list.iter().map(Parameter::from_leaf).collect()),
    )
}

/// A list of variables, with its `startIndex` when it is not zero.
fn indexed_variables(list: &[VariableId], start_index: i64) -> Argument {
    let argument = Argument::new(
        "list",
        Content::Parameters(list.iter().copied().map(Parameter::Variable).collect()),
    );

    if start_index == 0 {
        argument
    } else {
        argument.with_attribute("startIndex", start_index)
    }
}

fn integers_argument(name: &'static str, values: &[i64]) -> Argument {
    Argument::new(
        name,
        Content::Parameters(values.iter().copied().map(Parameter::Integer).collect()),
    )
}

fn condition_argument(condition: &Condition) -> Argument {
    let target = match &condition.operand {
        ConditionOperand::Expression(expression) => {
            ConditionTarget::Parameter(Parameter::from_leaf(expression))
        }
        ConditionOperand::Range(inf, sup) => ConditionTarget::Range(*inf, *sup),
        ConditionOperand::Set(values) => ConditionTarget::Set(values.clone()),
    };

    Argument::new(
        "condition",
        Content::Condition {
            operator: condition.operator,
            target,
        },
    )
}

fn function_shape(function: &PartialConstraint, condition: &Condition) -> Shape {
    match function {
        PartialConstraint::Sum {
            terms,
            coefficients,
        } => {
            let mut arguments = vec![list_argument("list", terms)];
            if let Some(coefficients) = coefficients {
                arguments.push(integers_argument("coeffs", coefficients));
            }
            arguments.push(condition_argument(condition));
            Shape::new("sum", arguments)
        }
        PartialConstraint::Count { list, values } => Shape::new(
            "count",
            vec![
                list_argument("list", list),
                integers_argument("values", values),
                condition_argument(condition),
            ],
        ),
        PartialConstraint::NValues { list, except } => {
            let mut arguments = vec![list_argument("list", list)];
            if !except.is_empty() {
                arguments.push(integers_argument("except", except));
            }
            arguments.push(condition_argument(condition));
            Shape::new("nValues", arguments)
        }
        PartialConstraint::Minimum { list } => Shape::new(
            "minimum",
            vec![list_argument("list", list), condition_argument(condition)],
        ),
        PartialConstraint::Maximum { list } => Shape::new(
            "maximum",
            vec![list_argument("list", list), condition_argument(condition)],
        ),
        PartialConstraint::Element {
            list,
            index,
            start_index,
        } => {
            let mut list = list_argument("list", list);
            if *start_index != 0 {
                list = list.with_attribute("startIndex", start_index);
            }

            let last = match (&condition.operator, &condition.operand) {
                (ConditionOperator::Eq, ConditionOperand::Expression(value)) => {
                    Argument::new("value", Content::Parameters(vec![Parameter::from_leaf(value)]))
                }
                _ => condition_argument(condition),
            };

            Shape::new(
                "element",
                vec![
                    list,
                    Argument::new(
                        "index",
                        Content::Parameters(vec![Parameter::from_leaf(index)]),
                    ),
                    last,
                ],
            )
        }
    }
}

/// A constraint, group, slide or block as it will be written.
#[derive(Clone, Debug)]
pub(crate) enum CompiledEntry {
    Constraint {
        shape: Shape,
        decoration: Decoration,
    },
    Group {
        template: Shape,
        arguments: Vec<Vec<Parameter>>,
        decoration: Decoration,
    },
    Slide {
        list: Vec<VariableId>,
        offset: usize,
        circular: bool,
        template: Shape,
        decoration: Decoration,
    },
    Block {
        entries: Vec<CompiledEntry>,
        decoration: Decoration,
    },
}

impl CompiledEntry {
    pub(crate) fn decoration_mut(&mut self) -> &mut Decoration {
        match self {
            CompiledEntry::Constraint { decoration, .. }
            | CompiledEntry::Group { decoration, .. }
            | CompiledEntry::Slide { decoration, .. }
            | CompiledEntry::Block { decoration, .. } => decoration,
        }
    }
}
