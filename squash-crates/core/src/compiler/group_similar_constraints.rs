//! Fold the similar constraints posted by one `satisfy` call into groups.
//!
//! Two intension constraints are similar when their predicates only differ in their variables and
//! constants. Two other constraints are similar when they have the same name and attributes and
//! differ in one or two of their lists. The constraints are partitioned greedily: every
//! constraint joins the group of the first constraint it is similar to.
//!
//! This pass also writes explicit slides as `slide` where the windows can be recognised, and
//! groups of `eq(x,v)` constraints as one `instantiation`. Lex, channel and noOverlap
//! constraints are never grouped.
use itertools::Itertools;
use log::debug;
use log::warn;

use super::shape::Argument;
use super::shape::CompiledEntry;
use super::shape::Content;
use super::shape::Parameter;
use super::shape::Shape;
use super::CompilationContext;
use crate::constraints::Constraint;
use crate::expressions::Expression;
use crate::expressions::Names;
use crate::expressions::Node;
use crate::model::Decoration;
use crate::model::EntryBody;
use crate::model::VariableStore;
use crate::variables::VariableId;
use crate::CompilationStatistics;
use crate::CompileOptions;

pub(crate) fn run(context: &mut CompilationContext<'_>) {
    let mut grouper = Grouper {
        options: context.options,
        variables: &context.variables,
        statistics: &mut context.statistics,
    };

    let mut compiled = vec![];
    for entry in &context.entries {
        let constraints = match &entry.body {
            EntryBody::Single(constraint) => vec![constraint.clone()],
            EntryBody::Gather(constraints) => constraints.clone(),
        };
        let gather = matches!(entry.body, EntryBody::Gather(_));

        let mut entries = grouper.compile(constraints, gather);

        if entry.decoration.is_empty() {
            compiled.append(&mut entries);
        } else if entries.len() == 1 {
            let mut single = entries.remove(0);
            *single.decoration_mut() = entry.decoration.clone();
            compiled.push(single);
        } else {
            grouper.statistics.blocks += 1;
            compiled.push(CompiledEntry::Block {
                entries,
                decoration: entry.decoration.clone(),
            });
        }
    }

    debug!(
        "Formed {} groups over {} constraints, {} slides and {} instantiations",
        context.statistics.groups,
        context.statistics.grouped_constraints,
        context.statistics.slides,
        context.statistics.instantiations,
    );

    context.compiled = compiled;
}

struct Grouper<'a> {
    options: &'a CompileOptions,
    variables: &'a VariableStore,
    statistics: &'a mut CompilationStatistics,
}

impl Grouper<'_> {
    /// Compile the constraints of one entry. Only the constraints of a gather are grouped.
    fn compile(&mut self, constraints: Vec<Constraint>, gather: bool) -> Vec<CompiledEntry> {
        let mut compiled = vec![];
        let mut run = vec![];

        for constraint in constraints {
            match constraint {
                Constraint::Slide(windows) => {
                    compiled.append(&mut self.compile_run(std::mem::take(&mut run), gather));
                    compiled.append(&mut self.compile_slide(flatten_windows(windows)));
                }
                constraint => run.push(constraint),
            }
        }
        compiled.append(&mut self.compile_run(run, gather));

        compiled
    }

    fn compile_run(&mut self, constraints: Vec<Constraint>, gather: bool) -> Vec<CompiledEntry> {
        if !gather || !self.options.group_constraints || constraints.len() < 2 {
            return constraints.iter().map(single).collect();
        }

        let candidates = constraints
            .iter()
            .map(|constraint| Candidate::new(constraint, self.variables))
            .collect::<Vec<_>>();

        partition(&candidates)
            .into_iter()
            .flat_map(|members| self.compile_partition(&constraints, &candidates, &members))
            .collect()
    }

    fn compile_partition(
        &mut self,
        constraints: &[Constraint],
        candidates: &[Candidate],
        members: &[usize],
    ) -> Vec<CompiledEntry> {
        let separately = || members.iter().map(|&index| single(&constraints[index])).collect();

        if members.len() < 2 {
            return separately();
        }

        let members = members
            .iter()
            .map(|&index| &candidates[index])
            .collect::<Vec<_>>();

        if self.options.recognize_instantiations {
            if let Some(instantiation) = instantiation(&members) {
                self.statistics.instantiations += 1;
                return vec![instantiation];
            }
        }

        let Some((template, arguments)) = template(&members, false, self.variables) else {
            return separately();
        };

        self.statistics.groups += 1;
        self.statistics.grouped_constraints += members.len();

        vec![CompiledEntry::Group {
            template,
            arguments,
            decoration: Decoration::default(),
        }]
    }

    fn compile_slide(&mut self, windows: Vec<Constraint>) -> Vec<CompiledEntry> {
        if self.options.recognize_slides {
            if let Some(slide) = self.recognize_slide(&windows) {
                self.statistics.slides += 1;
                return vec![slide];
            }

            warn!(
                "The {} constraints of a slide do not slide over one list; writing them as a group.",
                windows.len()
            );
        }

        self.compile_run(windows, true)
    }

    fn recognize_slide(&self, windows: &[Constraint]) -> Option<CompiledEntry> {
        if windows.len() < 2 {
            return None;
        }

        let candidates = windows
            .iter()
            .map(|constraint| Candidate::new(constraint, self.variables))
            .collect::<Vec<_>>();

        if partition(&candidates).len() != 1 {
            return None;
        }

        let members = candidates.iter().collect::<Vec<_>>();
        let (template, arguments) = template(&members, true, self.variables)?;
        let (list, offset, circular) = slide_windows(&arguments)?;

        Some(CompiledEntry::Slide {
            list,
            offset,
            circular,
            template,
            decoration: Decoration::default(),
        })
    }
}

/// The windows of a slide, with the windows of nested slides spliced in place.
fn flatten_windows(windows: Vec<Constraint>) -> Vec<Constraint> {
    windows
        .into_iter()
        .flat_map(|window| match window {
            Constraint::Slide(nested) => flatten_windows(nested),
            window => vec![window],
        })
        .collect()
}

fn single(constraint: &Constraint) -> CompiledEntry {
    CompiledEntry::Constraint {
        shape: Shape::of(constraint),
        decoration: Decoration::default(),
    }
}

/// A piece of an intension predicate with its variables and constants cut out.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Piece {
    Text(String),
    Slot,
}

#[derive(Clone, Debug)]
enum Candidate {
    Intension {
        pieces: Vec<Piece>,
        leaves: Vec<Parameter>,
    },
    Other(Shape),
}

impl Candidate {
    fn new(constraint: &Constraint, names: &impl Names) -> Candidate {
        match constraint {
            Constraint::Intension(expression) => {
                let mut pieces = vec![];
                let mut leaves = vec![];
                abstract_tree(expression, names, &mut pieces, &mut leaves);
                Candidate::Intension { pieces, leaves }
            }
            constraint => Candidate::Other(Shape::of(constraint)),
        }
    }
}

fn push_text(pieces: &mut Vec<Piece>, text: &str) {
    match pieces.last_mut() {
        Some(Piece::Text(last)) => last.push_str(text),
        _ => pieces.push(Piece::Text(text.to_owned())),
    }
}

/// Write the predicate with a slot for every occurrence of a variable or a constant.
fn abstract_tree(
    expression: &Expression,
    names: &impl Names,
    pieces: &mut Vec<Piece>,
    leaves: &mut Vec<Parameter>,
) {
    match expression.node() {
        Node::Constant(value) => {
            pieces.push(Piece::Slot);
            leaves.push(Parameter::Integer(*value));
        }
        Node::Variable(variable) => {
            pieces.push(Piece::Slot);
            leaves.push(Parameter::Variable(*variable));
        }
        Node::Operation { operator, operands } => {
            push_text(pieces, operator.name());
            push_text(pieces, "(");
            for (index, operand) in operands.iter().enumerate() {
                if index > 0 {
                    push_text(pieces, ",");
                }
                abstract_tree(operand, names, pieces, leaves);
            }
            push_text(pieces, ")");
        }
        Node::Set(_) | Node::Partial(_) => push_text(pieces, &expression.render(names)),
    }
}

/// Constraints which are always written on their own.
const UNMERGEABLE: [&str; 3] = ["lex", "channel", "noOverlap"];

/// The lists in which two shapes differ, or `None` if they cannot be in one group.
fn differing_arguments(first: &Shape, other: &Shape) -> Option<Vec<usize>> {
    if UNMERGEABLE.contains(&first.name)
        || first.name != other.name
        || first.attributes != other.attributes
        || first.arguments.len() != other.arguments.len()
    {
        return None;
    }

    let mut differing = vec![];
    for (index, (lhs, rhs)) in first.arguments.iter().zip(&other.arguments).enumerate() {
        if lhs.name != rhs.name || lhs.attributes != rhs.attributes {
            return None;
        }
        if lhs.content == rhs.content {
            continue;
        }

        match (&lhs.content, &rhs.content) {
            (Content::Parameters(left), Content::Parameters(right))
                if left.len() == right.len() =>
            {
                differing.push(index);
            }
            _ => return None,
        }
    }

    (1..=2).contains(&differing.len()).then_some(differing)
}

/// Partition the candidates greedily into groups of similar candidates, in order of their first
/// member.
fn partition(candidates: &[Candidate]) -> Vec<Vec<usize>> {
    let mut groups = vec![];
    let mut remaining = (0..candidates.len()).collect::<Vec<_>>();

    while let Some((&first, rest)) = remaining.split_first() {
        let mut members = vec![first];
        let mut left_over = vec![];
        let mut pattern = None;

        for &index in rest {
            let joins = match (&candidates[first], &candidates[index]) {
                (
                    Candidate::Intension { pieces, .. },
                    Candidate::Intension {
                        pieces: other_pieces,
                        ..
                    },
                ) => pieces == other_pieces,
                (Candidate::Other(shape), Candidate::Other(other)) => {
                    match differing_arguments(shape, other) {
                        Some(differing) => {
                            let established = pattern.get_or_insert_with(|| differing.clone());
                            *established == differing
                        }
                        None => false,
                    }
                }
                _ => false,
            };

            if joins {
                members.push(index);
            } else {
                left_over.push(index);
            }
        }

        groups.push(members);
        remaining = left_over;
    }

    groups
}

/// The template of a group and the arguments of every member, or `None` if the members do not
/// differ.
///
/// Slides need numbered placeholders; groups write a single differing list as `%...`.
fn template(
    members: &[&Candidate],
    numbered: bool,
    names: &impl Names,
) -> Option<(Shape, Vec<Vec<Parameter>>)> {
    match members.first()? {
        Candidate::Intension { pieces, .. } => {
            let leaves = members
                .iter()
                .filter_map(|member| match member {
                    Candidate::Intension { leaves, .. } => Some(leaves.as_slice()),
                    Candidate::Other(_) => None,
                })
                .collect::<Vec<_>>();
            intension_template(pieces, &leaves, names)
        }
        Candidate::Other(first) => {
            let shapes = members
                .iter()
                .filter_map(|member| match member {
                    Candidate::Other(shape) => Some(shape),
                    Candidate::Intension { .. } => None,
                })
                .collect::<Vec<_>>();
            let differing = differing_arguments(first, shapes.get(1)?)?;
            Some(shape_template(first, &shapes, &differing, numbered))
        }
    }
}

fn intension_template(
    pieces: &[Piece],
    leaves: &[&[Parameter]],
    names: &impl Names,
) -> Option<(Shape, Vec<Vec<Parameter>>)> {
    let slot_count = leaves.first()?.len();
    let columns = (0..slot_count)
        .map(|slot| {
            leaves
                .iter()
                .map(|instance| instance[slot].clone())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    // A slot holding the same value in all members is written inline; slots holding equal
    // columns share a placeholder.
    let mut placeholders: Vec<&Vec<Parameter>> = vec![];
    let mut slots = Vec::with_capacity(slot_count);
    for column in &columns {
        if column.iter().all_equal() {
            slots.push(Err(&column[0]));
            continue;
        }

        match placeholders.iter().position(|known| *known == column) {
            Some(position) => slots.push(Ok(position)),
            None => {
                placeholders.push(column);
                slots.push(Ok(placeholders.len() - 1));
            }
        }
    }

    if placeholders.is_empty() {
        return None;
    }

    let mut text = String::new();
    let mut slots = slots.into_iter();
    for piece in pieces {
        match piece {
            Piece::Text(piece) => text.push_str(piece),
            Piece::Slot => match slots.next()? {
                Ok(placeholder) => text.push_str(&format!("%{placeholder}")),
                Err(Parameter::Variable(variable)) => text.push_str(names.name_of(*variable)),
                Err(Parameter::Integer(value)) => text.push_str(&value.to_string()),
                Err(_) => return None,
            },
        }
    }

    let arguments = (0..leaves.len())
        .map(|member| {
            placeholders
                .iter()
                .map(|column| column[member].clone())
                .collect()
        })
        .collect();

    let template = Shape {
        name: "intension",
        attributes: vec![],
        arguments: vec![Argument {
            name: "function",
            attributes: vec![],
            content: Content::Template(text),
        }],
    };

    Some((template, arguments))
}

fn shape_template(
    first: &Shape,
    shapes: &[&Shape],
    differing: &[usize],
    numbered: bool,
) -> (Shape, Vec<Vec<Parameter>>) {
    let mut template = first.clone();
    let mut next_placeholder = 0;

    for &index in differing {
        let content = &mut template.arguments[index].content;
        let length = match content {
            Content::Parameters(parameters) => parameters.len(),
            _ => 0,
        };

        *content = if differing.len() == 1 && !numbered {
            Content::Parameters(vec![Parameter::AllPlaceholders])
        } else {
            Content::Parameters(
                (next_placeholder..next_placeholder + length)
                    .map(Parameter::Placeholder)
                    .collect(),
            )
        };
        next_placeholder += length;
    }

    let arguments = shapes
        .iter()
        .map(|shape| {
            differing
                .iter()
                .flat_map(|&index| match &shape.arguments[index].content {
                    Content::Parameters(parameters) => parameters.clone(),
                    _ => vec![],
                })
                .collect()
        })
        .collect();

    (template, arguments)
}

/// Write a group of `eq(x,v)` predicates as one instantiation.
fn instantiation(members: &[&Candidate]) -> Option<CompiledEntry> {
    let equality = [
        Piece::Text("eq(".to_owned()),
        Piece::Slot,
        Piece::Text(",".to_owned()),
        Piece::Slot,
        Piece::Text(")".to_owned()),
    ];

    let mut list = vec![];
    let mut values = vec![];
    for member in members {
        let Candidate::Intension { pieces, leaves } = member else {
            return None;
        };
        if pieces.as_slice() != equality.as_slice() {
            return None;
        }

        match leaves.as_slice() {
            [Parameter::Variable(variable), Parameter::Integer(value)]
            | [Parameter::Integer(value), Parameter::Variable(variable)] => {
                list.push(Parameter::Variable(*variable));
                values.push(Parameter::Integer(*value));
            }
            _ => return None,
        }
    }

    let shape = Shape {
        name: "instantiation",
        attributes: vec![],
        arguments: vec![
            Argument {
                name: "list",
                attributes: vec![],
                content: Content::Parameters(list),
            },
            Argument {
                name: "values",
                attributes: vec![],
                content: Content::Parameters(values),
            },
        ],
    };

    Some(CompiledEntry::Constraint {
        shape,
        decoration: Decoration::default(),
    })
}

/// Recognise the arguments of the members as windows over one list. Returns the list, the offset
/// between consecutive windows and whether the last windows wrap around to the start of the list.
fn slide_windows(arguments: &[Vec<Parameter>]) -> Option<(Vec<VariableId>, usize, bool)> {
    let windows = arguments
        .iter()
        .map(|window| {
            window
                .iter()
                .map(|parameter| match parameter {
                    Parameter::Variable(variable) => Some(*variable),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
        })
        .collect::<Option<Vec<_>>>()?;

    let width = windows.first()?.len();
    if width == 0 || windows.iter().any(|window| window.len() != width) {
        return None;
    }

    let list = windows.iter().flatten().copied().unique().collect::<Vec<_>>();

    let offset = match windows.get(1) {
        Some(second) => match windows[0].iter().position(|variable| *variable == second[0]) {
            Some(0) => return None,
            Some(position) => position,
            None => width,
        },
        None => 1,
    };

    [false, true].into_iter().find_map(|circular| {
        let fits = windows.iter().enumerate().all(|(window_index, window)| {
            window.iter().enumerate().all(|(position, variable)| {
                let mut index = window_index * offset + position;
                if circular {
                    index %= list.len();
                }
                list.get(index) == Some(variable)
            })
        });

        fits.then(|| (list.clone(), offset, circular))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::all_different;
    use crate::constraints::extension;
    use crate::constraints::lex;
    use crate::constraints::OrderOperator;
    use crate::constraints::Table;
    use crate::expressions::Term;
    use crate::variables::ModelId;

    fn store(count: usize) -> (VariableStore, Vec<VariableId>) {
        let mut store = VariableStore::new(ModelId::fresh());
        let array = store
            .declare_array(Some("x"), &[count], |_| {
                crate::values::Domain::new(0..=5).ok()
            })
            .unwrap()
            .clone();
        (store, array.cells().collect())
    }

    fn candidates(constraints: &[Constraint], store: &VariableStore) -> Vec<Candidate> {
        constraints
            .iter()
            .map(|constraint| Candidate::new(constraint, store))
            .collect()
    }

    #[test]
    fn intensions_with_the_same_structure_are_grouped() {
        let (store, x) = store(4);
        let constraints = vec![
            Constraint::Intension(x[0].not_equals(x[1])),
            Constraint::Intension(x[0].less_than(x[1])),
            Constraint::Intension(x[2].not_equals(x[3])),
        ];

        let candidates = candidates(&constraints, &store);

        assert_eq!(vec![vec![0, 2], vec![1]], partition(&candidates));
    }

    #[test]
    fn constant_columns_are_inlined() {
        let (store, x) = store(3);
        let constraints = vec![
            Constraint::Intension((x[0] + 1).less_than(x[1])),
            Constraint::Intension((x[1] + 1).less_than(x[2])),
        ];
        let candidates = candidates(&constraints, &store);
        let members = candidates.iter().collect::<Vec<_>>();

        let (template, arguments) = template(&members, false, &store).unwrap();

        assert_eq!(
            Content::Template("lt(add(%0,1),%1)".to_owned()),
            template.arguments[0].content
        );
        assert_eq!(
            vec![
                vec![Parameter::Variable(x[0]), Parameter::Variable(x[1])],
                vec![Parameter::Variable(x[1]), Parameter::Variable(x[2])],
            ],
            arguments
        );
    }

    #[test]
    fn identical_intensions_are_not_grouped() {
        let (store, x) = store(2);
        let constraint = Constraint::Intension(x[0].not_equals(x[1]));
        let candidates = candidates(&[constraint.clone(), constraint], &store);
        let members = candidates.iter().collect::<Vec<_>>();

        assert!(template(&members, false, &store).is_none());
    }

    #[test]
    fn tables_are_grouped_on_their_lists() {
        let (store, x) = store(4);
        let table = Table::supports([[0, 1], [1, 0]]);
        let constraints = vec![
            extension([x[0], x[1]], table.clone()).unwrap(),
            extension([x[2], x[3]], table.clone()).unwrap(),
            extension([x[1], x[2]], Table::conflicts([[0, 0]])).unwrap(),
        ];
        let candidates = candidates(&constraints, &store);

        assert_eq!(vec![vec![0, 1], vec![2]], partition(&candidates));

        let members = [&candidates[0], &candidates[1]];
        let (template, arguments) = template(&members, false, &store).unwrap();
        assert_eq!(
            Content::Parameters(vec![Parameter::AllPlaceholders]),
            template.arguments[0].content
        );
        assert_eq!(2, arguments.len());
    }

    #[test]
    fn lists_of_different_lengths_are_not_similar() {
        let (_, x) = store(5);
        let first = Shape::of(&all_different([x[0], x[1]]).unwrap());
        let second = Shape::of(&all_different([x[2], x[3], x[4]]).unwrap());

        assert_eq!(None, differing_arguments(&first, &second));
    }

    #[test]
    fn lex_constraints_are_not_grouped() {
        let (_, x) = store(6);
        let first = Shape::of(&lex([&x[..2], &x[2..4]], OrderOperator::Lt).unwrap());
        let second = Shape::of(&lex([&x[..2], &x[4..]], OrderOperator::Lt).unwrap());

        assert_eq!(None, differing_arguments(&first, &second));
    }

    #[test]
    fn equalities_become_an_instantiation() {
        let (store, x) = store(2);
        let constraints = vec![
            Constraint::Intension(x[0].equals(3)),
            Constraint::Intension(Expression::from(4).equals(x[1])),
        ];
        let candidates = candidates(&constraints, &store);
        let members = candidates.iter().collect::<Vec<_>>();

        let Some(CompiledEntry::Constraint { shape, .. }) = instantiation(&members) else {
            panic!("expected an instantiation");
        };

        assert_eq!("instantiation", shape.name);
        assert_eq!(
            Content::Parameters(vec![Parameter::Integer(3), Parameter::Integer(4)]),
            shape.arguments[1].content
        );
    }

    #[test]
    fn nested_slides_are_spliced_into_their_parent() {
        let (_, x) = store(4);
        let window = |i: usize| Constraint::Intension(x[i].less_than(x[i + 1]));
        let windows = vec![
            window(0),
            Constraint::Slide(vec![window(1), Constraint::Slide(vec![window(2)])]),
        ];

        assert_eq!(
            vec![window(0), window(1), window(2)],
            flatten_windows(windows)
        );
    }

    #[test]
    fn sliding_windows_are_recognised() {
        let (_, x) = store(4);
        let windows = (0..3)
            .map(|i| vec![Parameter::Variable(x[i]), Parameter::Variable(x[i + 1])])
            .collect::<Vec<_>>();

        assert_eq!(Some((x.clone(), 1, false)), slide_windows(&windows));
    }

    #[test]
    fn circular_windows_are_recognised() {
        let (_, x) = store(3);
        let windows = (0..3)
            .map(|i| vec![Parameter::Variable(x[i]), Parameter::Variable(x[(i + 1) % 3])])
            .collect::<Vec<_>>();

        assert_eq!(Some((x.clone(), 1, true)), slide_windows(&windows));
    }

    #[test]
    fn disjoint_windows_use_their_width_as_offset() {
        let (_, x) = store(4);
        let windows = vec![
            vec![Parameter::Variable(x[0]), Parameter::Variable(x[1])],
            vec![Parameter::Variable(x[2]), Parameter::Variable(x[3])],
        ];

        assert_eq!(Some((x.clone(), 2, false)), slide_windows(&windows));
    }

    #[test]
    fn unrelated_windows_are_rejected() {
        let (_, x) = store(4);
        let windows = vec![
            vec![Parameter::Variable(x[0]), Parameter::Variable(x[1])],
            vec![Parameter::Variable(x[1]), Parameter::Variable(x[3])],
            vec![Parameter::Variable(x[2]), Parameter::Variable(x[3])],
        ];

        assert_eq!(None, slide_windows(&windows));
    }
}
