use std::ops::RangeInclusive;

use super::Automaton;
use super::Mdd;
use super::Table;
use crate::expressions::Condition;
use crate::expressions::ConditionOperand;
use crate::expressions::ConditionOperator;
use crate::expressions::Expression;
use crate::expressions::PartialConstraint;
use crate::variables::VariableId;
use crate::ArityError;
use crate::DomainError;
use crate::ModelError;

/// The order imposed by an [`Constraint::Ordered`] constraint on consecutive elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrderOperator {
    Lt,
    Le,
    Ge,
    Gt,
}

impl OrderOperator {
    pub fn name(&self) -> &'static str {
        match self {
            OrderOperator::Lt => "lt",
            OrderOperator::Le => "le",
            OrderOperator::Ge => "ge",
            OrderOperator::Gt => "gt",
        }
    }
}

/// What the list of a [`Constraint::Channel`] is linked with.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelTarget {
    /// The list itself: `list[i] == j` if and only if `list[j] == i`.
    Itself,
    /// A second list: `list[i] == j` if and only if `other[j] == i`.
    List {
        list: Vec<VariableId>,
        start_index: i64,
    },
    /// A single expression over a list of 0/1 variables: `list[i] == 1` if and only if
    /// `value == i`.
    Value(Expression),
}

/// The number of times a value of a [`Constraint::Cardinality`] may occur.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Occurrence {
    Exactly(Expression),
    Between(i64, i64),
}

impl From<i64> for Occurrence {
    fn from(value: i64) -> Self {
        Occurrence::Exactly(value.into())
    }
}

impl From<i32> for Occurrence {
    fn from(value: i32) -> Self {
        Occurrence::Exactly(i64::from(value).into())
    }
}

impl From<VariableId> for Occurrence {
    fn from(value: VariableId) -> Self {
        Occurrence::Exactly(value.into())
    }
}

impl From<Expression> for Occurrence {
    fn from(value: Expression) -> Self {
        Occurrence::Exactly(value)
    }
}

impl From<RangeInclusive<i64>> for Occurrence {
    fn from(value: RangeInclusive<i64>) -> Self {
        Occurrence::Between(*value.start(), *value.end())
    }
}

/// A constraint of the model, in one of the forms XCSP3 has a dedicated element for.
///
/// The variants are built through the validated constructors in this module, such as
/// [`all_different`] or [`extension`], through [`Constraint::intension`], or by completing a
/// [`PartialConstraint`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constraint {
    /// A predicate over the variables in the expression.
    Intension(Expression),
    Extension {
        list: Vec<Expression>,
        table: Table,
    },
    AllDifferent {
        list: Vec<Expression>,
        except: Vec<i64>,
    },
    AllEqual {
        list: Vec<Expression>,
    },
    Ordered {
        list: Vec<Expression>,
        operator: OrderOperator,
    },
    /// A function over a list compared against a condition, e.g. a sum which is at most 10.
    Conditional {
        function: PartialConstraint,
        condition: Condition,
    },
    Circuit {
        list: Vec<Expression>,
        start_index: i64,
    },
    NoOverlap {
        origins: Vec<Expression>,
        lengths: Vec<Expression>,
        zero_ignored: bool,
    },
    Cumulative {
        origins: Vec<Expression>,
        lengths: Vec<Expression>,
        heights: Vec<Expression>,
        condition: Condition,
    },
    Instantiation {
        list: Vec<VariableId>,
        values: Vec<i64>,
    },
    /// The lists are ordered lexicographically by `operator`.
    Lex {
        lists: Vec<Vec<Expression>>,
        operator: OrderOperator,
    },
    Channel {
        list: Vec<VariableId>,
        start_index: i64,
        target: ChannelTarget,
    },
    /// `values[i]` occurs `occurs[i]` times in `list`. When closed, `list` takes no other value.
    Cardinality {
        list: Vec<Expression>,
        values: Vec<Expression>,
        occurs: Vec<Occurrence>,
        closed: bool,
    },
    /// The word formed by `list` is accepted by the automaton.
    Regular {
        list: Vec<Expression>,
        automaton: Automaton,
    },
    Mdd {
        list: Vec<Expression>,
        mdd: Mdd,
    },
    /// Every value of `values` is preceded by the one before it in `values`. When `values` is
    /// empty, the values of the list itself are used.
    Precedence {
        list: Vec<Expression>,
        values: Vec<i64>,
        covered: bool,
    },
    /// At least one literal holds, where `(x, true)` stands for `x` and `(x, false)` for `not(x)`.
    Clause {
        literals: Vec<(VariableId, bool)>,
    },
    /// The same constraint applied to a sequence of windows over a list of variables.
    Slide(Vec<Constraint>),
}

impl Constraint {
    /// A constraint stating that the expression holds.
    ///
    /// Fails with [`ModelError::NotAPredicate`] if the expression does not evaluate to a truth
    /// value.
    pub fn intension(expression: impl Into<Expression>) -> Result<Constraint, ModelError> {
        let expression = expression.into();

        if !expression.is_predicate() {
            return Err(ModelError::NotAPredicate);
        }

        Ok(Constraint::Intension(expression))
    }

    /// The XCSP3 element the constraint is written as.
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::Intension(_) => "intension",
            Constraint::Extension { .. } => "extension",
            Constraint::AllDifferent { .. } => "allDifferent",
            Constraint::AllEqual { .. } => "allEqual",
            Constraint::Ordered { .. } => "ordered",
            Constraint::Conditional { function, .. } => function.kind(),
            Constraint::Circuit { .. } => "circuit",
            Constraint::NoOverlap { .. } => "noOverlap",
            Constraint::Cumulative { .. } => "cumulative",
            Constraint::Instantiation { .. } => "instantiation",
            Constraint::Lex { .. } => "lex",
            Constraint::Channel { .. } => "channel",
            Constraint::Cardinality { .. } => "cardinality",
            Constraint::Regular { .. } => "regular",
            Constraint::Mdd { .. } => "mdd",
            Constraint::Precedence { .. } => "precedence",
            Constraint::Clause { .. } => "clause",
            Constraint::Slide(_) => "slide",
        }
    }

    /// Call `visitor` with every expression the constraint is stated over, in argument order.
    pub(crate) fn for_each_expression(&self, visitor: &mut impl FnMut(&Expression)) {
        match self {
            Constraint::Intension(expression) => visitor(expression),
            Constraint::Extension { list, .. }
            | Constraint::AllDifferent { list, .. }
            | Constraint::AllEqual { list }
            | Constraint::Ordered { list, .. }
            | Constraint::Circuit { list, .. }
            | Constraint::Regular { list, .. }
            | Constraint::Mdd { list, .. }
            | Constraint::Precedence { list, .. } => list.iter().for_each(visitor),
            Constraint::Conditional {
                function,
                condition,
            } => {
                function.expressions().for_each(&mut *visitor);
                visit_condition(condition, visitor);
            }
            Constraint::NoOverlap {
                origins, lengths, ..
            } => origins.iter().chain(lengths).for_each(visitor),
            Constraint::Cumulative {
                origins,
                lengths,
                heights,
                condition,
            } => {
                origins
                    .iter()
                    .chain(lengths)
                    .chain(heights)
                    .for_each(&mut *visitor);
                visit_condition(condition, visitor);
            }
            Constraint::Instantiation { list, .. } => list
                .iter()
                .for_each(|variable| visitor(&Expression::from(variable))),
            Constraint::Lex { lists, .. } => lists.iter().flatten().for_each(visitor),
            Constraint::Channel { list, target, .. } => {
                let other = match target {
                    ChannelTarget::List { list, .. } => list.as_slice(),
                    ChannelTarget::Itself | ChannelTarget::Value(_) => &[],
                };
                list.iter()
                    .chain(other)
                    .for_each(|variable| visitor(&Expression::from(variable)));
                if let ChannelTarget::Value(value) = target {
                    visitor(value);
                }
            }
            Constraint::Cardinality {
                list,
                values,
                occurs,
                ..
            } => {
                list.iter().chain(values).for_each(&mut *visitor);
                for occurrence in occurs {
                    if let Occurrence::Exactly(expression) = occurrence {
                        visitor(expression);
                    }
                }
            }
            Constraint::Clause { literals } => literals
                .iter()
                .for_each(|(variable, _)| visitor(&Expression::from(variable))),
            Constraint::Slide(constraints) => constraints
                .iter()
                .for_each(|constraint| constraint.for_each_expression(visitor)),
        }
    }

    /// The distinct variables of the constraint, in order of first occurrence.
    pub fn scope(&self) -> Vec<VariableId> {
        let mut scope = vec![];
        self.for_each_expression(&mut |expression| {
            expression.visit_variables(&mut |variable| {
                if !scope.contains(&variable) {
                    scope.push(variable);
                }
            });
        });
        scope
    }
}

fn visit_condition(condition: &Condition, visitor: &mut impl FnMut(&Expression)) {
    if let ConditionOperand::Expression(expression) = &condition.operand {
        visitor(expression);
    }
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

fn check_length(
    constraint: &'static str,
    argument: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), ArityError> {
    if expected != actual {
        return Err(ArityError::MismatchedLengths {
            constraint,
            argument,
            expected,
            actual,
        });
    }

    Ok(())
}

/// All expressions in `list` take different values.
pub fn all_different(
    list: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<Constraint, ArityError> {
    all_different_except(list, [])
}

/// All expressions in `list` which do not take a value in `except` take different values.
pub fn all_different_except(
    list: impl IntoIterator<Item = impl Into<Expression>>,
    except: impl IntoIterator<Item = i64>,
) -> Result<Constraint, ArityError> {
    let mut except = except.into_iter().collect::<Vec<_>>();
    except.sort_unstable();
    except.dedup();

    Ok(Constraint::AllDifferent {
        list: non_empty(list, "allDifferent")?,
        except,
    })
}

pub fn all_equal(
    list: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<Constraint, ArityError> {
    Ok(Constraint::AllEqual {
        list: non_empty(list, "allEqual")?,
    })
}

/// Every two consecutive expressions of `list` are related by `operator`.
pub fn ordered(
    list: impl IntoIterator<Item = impl Into<Expression>>,
    operator: OrderOperator,
) -> Result<Constraint, ArityError> {
    Ok(Constraint::Ordered {
        list: non_empty(list, "ordered")?,
        operator,
    })
}

pub fn increasing(
    list: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<Constraint, ArityError> {
    ordered(list, OrderOperator::Le)
}

pub fn strictly_increasing(
    list: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<Constraint, ArityError> {
    ordered(list, OrderOperator::Lt)
}

pub fn decreasing(
    list: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<Constraint, ArityError> {
    ordered(list, OrderOperator::Ge)
}

pub fn strictly_decreasing(
    list: impl IntoIterator<Item = impl Into<Expression>>,
) -> Result<Constraint, ArityError> {
    ordered(list, OrderOperator::Gt)
}

/// The tuple of values taken by `list` is (or is not, for conflicts) one of the tuples of
/// `table`.
///
/// Fails if a tuple has a different length than `list`, or mixes integers with symbols.
pub fn extension(
    list: impl IntoIterator<Item = impl Into<Expression>>,
    table: Table,
) -> Result<Constraint, ModelError> {
    let list = non_empty(list, "extension")?;

    for tuple in &table.tuples {
        if tuple.len() != list.len() {
            return Err(ArityError::TupleArity {
                expected: list.len(),
                actual: tuple.len(),
            }
            .into());
        }
    }

    let _ = table.column_kinds(list.len())?;

    Ok(Constraint::Extension { list, table })
}

/// The successors in `list` form a single cycle, where `list[i] == j` means that `j` follows `i`.
pub fn circuit(
    list: impl IntoIterator<Item = impl Into<Expression>>,
    start_index: i64,
) -> Result<Constraint, ArityError> {
    Ok(Constraint::Circuit {
        list: non_empty(list, "circuit")?,
        start_index,
    })
}

/// The tasks `[origins[i], origins[i] + lengths[i])` do not overlap.
pub fn no_overlap(
    origins: impl IntoIterator<Item = impl Into<Expression>>,
    lengths: impl IntoIterator<Item = impl Into<Expression>>,
    zero_ignored: bool,
) -> Result<Constraint, ArityError> {
    let origins = non_empty(origins, "noOverlap")?;
    let lengths = lengths.into_iter().map(Into::into).collect::<Vec<_>>();
    check_length("noOverlap", "lengths", origins.len(), lengths.len())?;

    Ok(Constraint::NoOverlap {
        origins,
        lengths,
        zero_ignored,
    })
}

/// At every point in time, the summed heights of the running tasks are at most `limit`.
pub fn cumulative(
    origins: impl IntoIterator<Item = impl Into<Expression>>,
    lengths: impl IntoIterator<Item = impl Into<Expression>>,
    heights: impl IntoIterator<Item = impl Into<Expression>>,
    limit: impl Into<Expression>,
) -> Result<Constraint, ArityError> {
    let origins = non_empty(origins, "cumulative")?;
    let lengths = lengths.into_iter().map(Into::into).collect::<Vec<_>>();
    let heights = heights.into_iter().map(Into::into).collect::<Vec<_>>();
    check_length("cumulative", "lengths", origins.len(), lengths.len())?;
    check_length("cumulative", "heights", origins.len(), heights.len())?;

    Ok(Constraint::Cumulative {
        origins,
        lengths,
        heights,
        condition: Condition::new(ConditionOperator::Le, limit),
    })
}

/// Assign `values[i]` to `list[i]`.
pub fn instantiation(
    list: impl IntoIterator<Item = VariableId>,
    values: impl IntoIterator<Item = i64>,
) -> Result<Constraint, ArityError> {
    let list = list.into_iter().collect::<Vec<_>>();
    let values = values.into_iter().collect::<Vec<_>>();

    if list.is_empty() {
        return Err(ArityError::EmptyList {
            constraint: "instantiation",
        });
    }
    check_length("instantiation", "values", list.len(), values.len())?;

    Ok(Constraint::Instantiation { list, values })
}

fn at_least(
    constraint: &'static str,
    argument: &'static str,
    minimum: usize,
    actual: usize,
) -> Result<(), ArityError> {
    if actual < minimum {
        return Err(ArityError::TooFew {
            constraint,
            argument,
            minimum,
            actual,
        });
    }

    Ok(())
}

/// The lists, all of the same length, are ordered lexicographically by `operator`.
///
/// ```
/// # use squash_core::constraints::lex;
/// # use squash_core::constraints::OrderOperator;
/// # use squash_core::values::Domain;
/// # use squash_core::Model;
/// let mut model = Model::new("rows");
/// let x = model.new_named_array("x", &[3], |_| Domain::new(0..=1).ok()).unwrap();
/// let y = model.new_named_array("y", &[3], |_| Domain::new(0..=1).ok()).unwrap();
///
/// assert!(lex([x.cells(), y.cells()], OrderOperator::Le).is_ok());
/// ```
pub fn lex(
    lists: impl IntoIterator<Item = impl IntoIterator<Item = impl Into<Expression>>>,
    operator: OrderOperator,
) -> Result<Constraint, ArityError> {
    let lists = lists
        .into_iter()
        .map(|list| non_empty(list, "lex"))
        .collect::<Result<Vec<_>, _>>()?;

    at_least("lex", "list", 2, lists.len())?;
    for list in &lists[1..] {
        check_length("lex", "list", lists[0].len(), list.len())?;
    }

    Ok(Constraint::Lex { lists, operator })
}

fn variable_list(
    list: impl IntoIterator<Item = VariableId>,
    constraint: &'static str,
) -> Result<Vec<VariableId>, ArityError> {
    let list = list.into_iter().collect::<Vec<_>>();

    if list.is_empty() {
        return Err(ArityError::EmptyList { constraint });
    }

    Ok(list)
}

/// `list[i] == j` if and only if `list[j] == i`, with the indices counted from `start_index`.
pub fn channel(
    list: impl IntoIterator<Item = VariableId>,
    start_index: i64,
) -> Result<Constraint, ArityError> {
    Ok(Constraint::Channel {
        list: variable_list(list, "channel")?,
        start_index,
        target: ChannelTarget::Itself,
    })
}

/// `list[i] == j` if and only if `other[j] == i`. The second list is at least as long as the
/// first one.
pub fn channel_between(
    list: impl IntoIterator<Item = VariableId>,
    start_index: i64,
    other: impl IntoIterator<Item = VariableId>,
    other_start_index: i64,
) -> Result<Constraint, ArityError> {
    let list = variable_list(list, "channel")?;
    let other = other.into_iter().collect::<Vec<_>>();
    at_least("channel", "list", list.len(), other.len())?;

    Ok(Constraint::Channel {
        list,
        start_index,
        target: ChannelTarget::List {
            list: other,
            start_index: other_start_index,
        },
    })
}

/// `list[i] == 1` if and only if `value == i`. The variables of `list` must have the domain
/// `{0, 1}`; this is checked when the constraint is posted.
pub fn channel_value(
    list: impl IntoIterator<Item = VariableId>,
    start_index: i64,
    value: impl Into<Expression>,
) -> Result<Constraint, ArityError> {
    Ok(Constraint::Channel {
        list: variable_list(list, "channel")?,
        start_index,
        target: ChannelTarget::Value(value.into()),
    })
}

/// Every value occurs in `list` as often as its occurrence allows. When `closed`, the list takes
/// no value outside the given ones.
///
/// ```
/// # use squash_core::constraints::cardinality;
/// # use squash_core::constraints::Occurrence;
/// # use squash_core::values::Domain;
/// # use squash_core::Model;
/// let mut model = Model::new("cards");
/// let x = model.new_named_array("x", &[4], |_| Domain::new(0..=2).ok()).unwrap();
/// let occurrences = [(0, Occurrence::from(1)), (1, Occurrence::from(1..=3))];
///
/// assert!(cardinality(x.cells(), occurrences, false).is_ok());
/// ```
pub fn cardinality<Value, Occurs>(
    list: impl IntoIterator<Item = impl Into<Expression>>,
    occurrences: impl IntoIterator<Item = (Value, Occurs)>,
    closed: bool,
) -> Result<Constraint, ModelError>
where
    Value: Into<Expression>,
    Occurs: Into<Occurrence>,
{
    let list = non_empty(list, "cardinality")?;
    let (values, occurs): (Vec<Expression>, Vec<Occurrence>) = occurrences
        .into_iter()
        .map(|(value, occurs)| (value.into(), occurs.into()))
        .unzip();

    at_least("cardinality", "values", 1, values.len())?;
    for occurrence in &occurs {
        if let Occurrence::Between(inf, sup) = occurrence {
            if inf > sup {
                return Err(DomainError::InvalidInterval {
                    inf: *inf,
                    sup: *sup,
                }
                .into());
            }
        }
    }

    Ok(Constraint::Cardinality {
        list,
        values,
        occurs,
        closed,
    })
}

pub fn regular(
    list: impl IntoIterator<Item = impl Into<Expression>>,
    automaton: Automaton,
) -> Result<Constraint, ArityError> {
    Ok(Constraint::Regular {
        list: non_empty(list, "regular")?,
        automaton,
    })
}

pub fn mdd(
    list: impl IntoIterator<Item = impl Into<Expression>>,
    mdd: Mdd,
) -> Result<Constraint, ArityError> {
    Ok(Constraint::Mdd {
        list: non_empty(list, "mdd")?,
        mdd,
    })
}

/// `values[i]` only occurs in `list` after `values[i - 1]` occurred. When `covered`, every value
/// occurs.
///
/// The list needs at least three expressions. `values` is either empty, to use the values of the
/// list itself, or holds at least two values.
pub fn precedence(
    list: impl IntoIterator<Item = impl Into<Expression>>,
    values: impl IntoIterator<Item = i64>,
    covered: bool,
) -> Result<Constraint, ArityError> {
    let list = non_empty(list, "precedence")?;
    let values = values.into_iter().collect::<Vec<_>>();

    at_least("precedence", "list", 3, list.len())?;
    if !values.is_empty() {
        at_least("precedence", "values", 2, values.len())?;
    }

    Ok(Constraint::Precedence {
        list,
        covered: covered && !values.is_empty(),
        values,
    })
}

/// At least one of the `positive` variables is 1 or one of the `negative` variables is 0. All
/// variables must have the domain `{0, 1}`; this is checked when the constraint is posted.
pub fn clause(
    positive: impl IntoIterator<Item = VariableId>,
    negative: impl IntoIterator<Item = VariableId>,
) -> Result<Constraint, ArityError> {
    let literals = positive
        .into_iter()
        .map(|variable| (variable, true))
        .chain(negative.into_iter().map(|variable| (variable, false)))
        .collect::<Vec<_>>();

    if literals.is_empty() {
        return Err(ArityError::EmptyList {
            constraint: "clause",
        });
    }

    Ok(Constraint::Clause { literals })
}

/// A sequence of constraints which are all instances of one template over sliding windows of
/// the same list, e.g. `x[i] < x[i + 1]` for every `i`.
///
/// The compiler writes the constraints as one `slide` when the windows can be recognised, and as
/// a group otherwise.
pub fn slide(constraints: impl IntoIterator<Item = Constraint>) -> Result<Constraint, ArityError> {
    let constraints = constraints.into_iter().collect::<Vec<_>>();

    if constraints.is_empty() {
        return Err(ArityError::EmptyList { constraint: "slide" });
    }

    Ok(Constraint::Slide(constraints))
}
