use itertools::Itertools;
use xcsp_format::Element;
use xcsp_format::Token;

use super::compaction::ListWriter;
use crate::compiler::Argument;
use crate::compiler::Cell;
use crate::compiler::CompilationContext;
use crate::compiler::CompiledEntry;
use crate::compiler::ConditionTarget;
use crate::compiler::Content;
use crate::compiler::Shape;
use crate::containers::HashMap;
use crate::model::Annotations;
use crate::model::Declaration;
use crate::model::Decoration;
use crate::model::DomainId;
use crate::model::Objective;
use crate::model::ObjectiveTarget;
use crate::model::VariableStore;
use crate::values::Domain;
use crate::values::DomainKind;
use crate::variables::ArrayKey;
use crate::variables::VariableId;

/// The document of a compiled model.
///
/// The order of the elements only depends on the order of the declarations and of the compiled
/// entries.
pub(crate) fn document(context: &CompilationContext<'_>) -> Element {
    let serializer = Serializer {
        variables: &context.variables,
        lists: ListWriter::new(&context.variables, context.options.compact_lists),
        share_domains_above: context.options.share_domains_above,
    };

    let problem_type = if context.objective.is_some() {
        "COP"
    } else {
        "CSP"
    };

    let mut root = Element::new(Token::Instance)
        .with_attribute(Token::Format, "XCSP3")
        .with_attribute(Token::Type, problem_type)
        .with_child(serializer.variables_section());

    if !context.compiled.is_empty() {
        root.push_child(
            Element::new(Token::Constraints).with_children(
                context
                    .compiled
                    .iter()
                    .map(|entry| serializer.entry(entry)),
            ),
        );
    }

    if let Some(objective) = &context.objective {
        root.push_child(Element::new(Token::Objectives).with_child(serializer.objective(objective)));
    }

    if !context.annotations.is_empty() {
        root.push_child(serializer.annotations(&context.annotations));
    }

    root
}

struct Serializer<'a> {
    variables: &'a VariableStore,
    lists: ListWriter<'a>,
    share_domains_above: usize,
}

impl Serializer<'_> {
    fn variables_section(&self) -> Element {
        let mut section = Element::new(Token::Variables);
        // The first variable declared with a domain, which later variables can refer to.
        let mut declarers: HashMap<DomainId, String> = HashMap::default();

        for declaration in self.variables.declarations() {
            match declaration {
                Declaration::Variable(variable) => {
                    section.push_child(self.variable(*variable, &mut declarers));
                }
                Declaration::Array(key) => {
                    if let Some(array) = self.array(*key) {
                        section.push_child(array);
                    }
                }
            }
        }

        section
    }

    fn variable(
        &self,
        variable: VariableId,
        declarers: &mut HashMap<DomainId, String>,
    ) -> Element {
        let info = self.variables.info(variable);
        let domain = self.variables.domain(info.domain);
        let text = domain.to_string();

        let mut element = typed(Element::new(Token::Var).with_id(&info.name), domain);

        match declarers.get(&info.domain) {
            Some(declarer) if text.len() > self.share_domains_above => {
                element.set_attribute(Token::As, declarer);
            }
            Some(_) => element.set_text(text),
            None => {
                let _ = declarers.insert(info.domain, info.name.clone());
                element.set_text(text);
            }
        }

        element
    }

    /// The declaration of an array, or `None` if the array has no cells.
    fn array(&self, key: ArrayKey) -> Option<Element> {
        let array = self.variables.array(key);
        let size = array
            .shape()
            .iter()
            .map(|size| format!("[{size}]"))
            .join("");

        // The cells of every distinct domain, in order of first occurrence.
        let mut domains: Vec<(DomainId, Vec<VariableId>)> = vec![];
        for variable in array.cells() {
            let domain = self.variables.info(variable).domain;
            match domains.iter_mut().find(|(known, _)| *known == domain) {
                Some((_, cells)) => cells.push(variable),
                None => domains.push((domain, vec![variable])),
            }
        }

        let (first, _) = domains.first()?;
        let element = typed(
            Element::new(Token::Array)
                .with_id(array.name())
                .with_attribute(Token::Size, size),
            self.variables.domain(*first),
        );

        let has_holes = array.slots().iter().any(Option::is_none);
        if domains.len() == 1 && !has_holes {
            return Some(element.with_text(self.variables.domain(*first)));
        }

        Some(element.with_children(domains.iter().map(|(domain, cells)| {
            Element::new(Token::Domain)
                .with_attribute(Token::For, self.lists.variables(cells, true))
                .with_text(self.variables.domain(*domain))
        })))
    }

    fn entry(&self, entry: &CompiledEntry) -> Element {
        match entry {
            CompiledEntry::Constraint { shape, decoration } => {
                decorated(self.shape(shape), decoration)
            }
            CompiledEntry::Group {
                template,
                arguments,
                decoration,
            } => {
                let group = Element::new(Token::Group)
                    .with_child(self.shape(template))
                    .with_children(arguments.iter().map(|instance| {
                        Element::new(Token::Args).with_text(self.lists.write("args", instance, true))
                    }));
                decorated(group, decoration)
            }
            CompiledEntry::Slide {
                list,
                offset,
                circular,
                template,
                decoration,
            } => {
                let mut slide = Element::new(Token::Slide);
                if *circular {
                    slide.set_attribute(Token::Circular, "true");
                }

                let mut scope = Element::new(Token::List).with_text(self.lists.variables(list, false));
                if *offset != 1 {
                    scope.set_attribute(Token::Offset, offset);
                }

                decorated(slide.with_child(scope).with_child(self.shape(template)), decoration)
            }
            CompiledEntry::Block {
                entries,
                decoration,
            } => decorated(
                Element::new(Token::Block)
                    .with_children(entries.iter().map(|entry| self.entry(entry))),
                decoration,
            ),
        }
    }

    fn shape(&self, shape: &Shape) -> Element {
        let mut element = Element::new(shape.name);
        for (key, value) in &shape.attributes {
            element.set_attribute(key, value);
        }

        // A lone list or predicate is written without its own element.
        if let [argument] = shape.arguments.as_slice() {
            if argument.attributes.is_empty() && matches!(argument.name, "list" | "function") {
                return element.with_text(self.content(argument));
            }
        }

        element.with_children(shape.arguments.iter().map(|argument| {
            let mut child = Element::new(argument.name);
            for (key, value) in &argument.attributes {
                child.set_attribute(key, value);
            }
            child.with_text(self.content(argument))
        }))
    }

    fn content(&self, argument: &Argument) -> String {
        match &argument.content {
            Content::Tree(expression) => expression.render(self.variables),
            Content::Template(template) => template.clone(),
            Content::Parameters(list) => self.lists.write(argument.name, list, false),
            Content::Condition { operator, target } => {
                let target = match target {
                    ConditionTarget::Parameter(parameter) => self.lists.parameter(parameter),
                    ConditionTarget::Range(inf, sup) => format!("{inf}..{sup}"),
                    ConditionTarget::Set(values) => format!("{{{}}}", values.iter().join(",")),
                };
                format!("({},{target})", operator.name())
            }
            Content::Table(table) => table
                .tuples
                .iter()
                .map(|tuple| format!("({})", tuple.iter().join(",")))
                .join(""),
            Content::Rows(rows) => rows_text(rows),
            Content::Text(text) => text.clone(),
        }
    }

    fn objective(&self, objective: &Objective) -> Element {
        let element = Element::new(objective.direction.name());

        match &objective.target {
            ObjectiveTarget::Expression(expression) => {
                element.with_text(expression.render(self.variables))
            }
            ObjectiveTarget::Partial(partial) => {
                let shape = Shape::of_objective(partial);
                let written = self.shape(&shape);

                let mut element = element.with_attribute(Token::Type, shape.name);
                match written.text() {
                    Some(text) => element.set_text(text),
                    None => {
                        for child in written.children() {
                            element.push_child(child.clone());
                        }
                    }
                }
                element
            }
        }
    }

    fn annotations(&self, annotations: &Annotations) -> Element {
        let mut element = Element::new(Token::Annotations);

        if let Some(decision) = &annotations.decision {
            element.push_child(
                Element::new(Token::Decision).with_text(self.lists.variables(decision, false)),
            );
        }

        if let Some((variables, order)) = &annotations.value_heuristic {
            element.push_child(
                Element::new(Token::ValHeuristic).with_child(
                    Element::new(Token::Static)
                        .with_attribute(Token::Order, order.iter().join(" "))
                        .with_text(self.lists.variables(variables, false)),
                ),
            );
        }

        element
    }
}

fn typed(element: Element, domain: &Domain) -> Element {
    match domain.kind() {
        DomainKind::Symbolic => element.with_attribute(Token::Type, "symbolic"),
        DomainKind::Integer => element,
    }
}

fn decorated(mut element: Element, decoration: &Decoration) -> Element {
    if !decoration.classes.is_empty() {
        element.set_attribute(Token::Class, decoration.classes.iter().join(" "));
    }
    if let Some(note) = &decoration.note {
        element.set_attribute(Token::Note, note);
    }
    element
}

/// Unary tables are written as a list of values, integers with ranges as in a domain.
fn rows_text(rows: &[Vec<Cell>]) -> String {
    let unary = rows
        .iter()
        .map(|row| match row.as_slice() {
            [cell] if *cell != Cell::Any => Some(cell),
            _ => None,
        })
        .collect::<Option<Vec<_>>>();

    if let Some(cells) = unary {
        let integers = cells
            .iter()
            .map(|cell| match cell {
                Cell::Integer(value) => Some(*value),
                _ => None,
            })
            .collect::<Option<Vec<_>>>();

        return match integers.map(Domain::from_integers) {
            Some(Ok(domain)) => domain.to_string(),
            _ => cells.into_iter().map(cell_text).join(" "),
        };
    }

    rows.iter()
        .map(|row| format!("({})", row.iter().map(cell_text).join(",")))
        .join("")
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Integer(value) => value.to_string(),
        Cell::Symbol(symbol) => symbol.clone(),
        Cell::Any => "*".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unary_tables_are_written_as_values() {
        let rows = [1, 2, 3, 7]
            .into_iter()
            .map(|value| vec![Cell::Integer(value)])
            .collect::<Vec<_>>();
        assert_eq!("1..3 7", rows_text(&rows));

        let symbols = vec![
            vec![Cell::Symbol("a".to_owned())],
            vec![Cell::Symbol("c".to_owned())],
        ];
        assert_eq!("a c", rows_text(&symbols));
    }

    #[test]
    fn tuples_are_parenthesised() {
        let rows = vec![
            vec![Cell::Integer(0), Cell::Any],
            vec![Cell::Integer(1), Cell::Integer(-1)],
        ];
        assert_eq!("(0,*)(1,-1)", rows_text(&rows));
        assert_eq!("", rows_text(&[]));
    }
}
