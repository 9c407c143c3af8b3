#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use squash::constraints::cardinality;
use squash::constraints::channel;
use squash::constraints::channel_between;
use squash::constraints::channel_value;
use squash::constraints::clause;
use squash::constraints::lex;
use squash::constraints::mdd;
use squash::constraints::precedence;
use squash::constraints::regular;
use squash::constraints::Automaton;
use squash::constraints::Constraint;
use squash::constraints::Mdd;
use squash::constraints::Occurrence;
use squash::constraints::OrderOperator;
use squash::Model;

mod helpers;
use helpers::compile;
use helpers::domain;
use helpers::section;

fn post(model: &mut Model, constraint: Constraint) {
    model
        .satisfy(constraint)
        .post()
        .expect("constraint is posted");
}

#[test]
fn lex_writes_one_list_per_row() {
    let mut model = Model::new("lex");
    let x = model
        .new_named_array("x", &[3], |_| Some(domain(0..=2)))
        .expect("valid array");
    let y = model
        .new_named_array("y", &[3], |_| Some(domain(0..=2)))
        .expect("valid array");

    post(
        &mut model,
        lex([x.cells(), y.cells()], OrderOperator::Lt).expect("two rows"),
    );

    assert_eq!(
        vec![
            "<lex>",
            "<list> x[] </list>",
            "<list> y[] </list>",
            "<operator> lt </operator>",
            "</lex>",
        ],
        section(&compile(&mut model), "constraints")
    );
}

#[test]
fn channels_come_in_three_forms() {
    let mut model = Model::new("channels");
    let x = model
        .new_named_array("x", &[3], |_| Some(domain(0..=2)))
        .expect("valid array");
    let y = model
        .new_named_array("y", &[3], |_| Some(domain(1..=3)))
        .expect("valid array");
    let b = model
        .new_named_array("b", &[3], |_| Some(domain(0..=1)))
        .expect("valid array");
    let v = model
        .new_named_variable("v", domain(0..=2))
        .expect("valid name");

    post(&mut model, channel(x.cells(), 0).expect("non-empty list"));
    post(
        &mut model,
        channel_between(x.cells(), 0, y.cells(), 1).expect("lists of equal length"),
    );
    post(
        &mut model,
        channel_value(b.cells(), 0, v).expect("non-empty list"),
    );

    assert_eq!(
        vec![
            "<channel> x[] </channel>",
            "<channel>",
            "<list> x[] </list>",
            "<list startIndex=\"1\"> y[] </list>",
            "</channel>",
            "<channel>",
            "<list> b[] </list>",
            "<value> v </value>",
            "</channel>",
        ],
        section(&compile(&mut model), "constraints")
    );
}

#[test]
fn cardinality_writes_values_and_occurrences() {
    let mut model = Model::new("cards");
    let x = model
        .new_named_array("x", &[4], |_| Some(domain(0..=2)))
        .expect("valid array");
    let z = model
        .new_named_variable("z", domain(0..=4))
        .expect("valid name");

    let occurrences = [
        (0, Occurrence::from(1)),
        (1, Occurrence::from(1..=3)),
        (2, Occurrence::from(z)),
    ];
    post(
        &mut model,
        cardinality(x.cells(), occurrences, true).expect("valid occurrences"),
    );

    assert_eq!(
        vec![
            "<cardinality>",
            "<list> x[] </list>",
            "<values closed=\"true\"> 0 1 2 </values>",
            "<occurs> 1 1..3 z </occurs>",
            "</cardinality>",
        ],
        section(&compile(&mut model), "constraints")
    );
}

#[test]
fn automata_and_diagrams_are_written_as_transitions() {
    let mut model = Model::new("words");
    let x = model
        .new_named_array("x", &[3], |_| Some(domain(0..=1)))
        .expect("valid array");

    let automaton = Automaton::new(
        "a",
        [("a", 0, "a"), ("a", 1, "b"), ("b", 0, "a")],
        ["b", "a"],
    )
    .expect("valid automaton");
    post(
        &mut model,
        regular(x.cells(), automaton).expect("non-empty list"),
    );

    let diagram = Mdd::new([("r", 0, "n"), ("r", 1, "n"), ("n", 1, "t")]).expect("valid diagram");
    post(&mut model, mdd(x.cells(), diagram).expect("non-empty list"));

    assert_eq!(
        vec![
            "<regular>",
            "<list> x[] </list>",
            "<transitions> (a,0,a)(a,1,b)(b,0,a) </transitions>",
            "<start> a </start>",
            "<final> a b </final>",
            "</regular>",
            "<mdd>",
            "<list> x[] </list>",
            "<transitions> (r,0,n)(r,1,n)(n,1,t) </transitions>",
            "</mdd>",
        ],
        section(&compile(&mut model), "constraints")
    );
}

#[test]
fn precedence_writes_its_values_when_given() {
    let mut model = Model::new("precedence");
    let x = model
        .new_named_array("x", &[4], |_| Some(domain(0..=3)))
        .expect("valid array");

    post(
        &mut model,
        precedence(x.cells(), [], false).expect("long enough list"),
    );
    post(
        &mut model,
        precedence(x.cells(), [0, 1, 2], true).expect("enough values"),
    );

    assert_eq!(
        vec![
            "<precedence> x[] </precedence>",
            "<precedence>",
            "<list> x[] </list>",
            "<values covered=\"true\"> 0 1 2 </values>",
            "</precedence>",
        ],
        section(&compile(&mut model), "constraints")
    );
}

#[test]
fn negative_literals_of_a_clause_are_negated() {
    let mut model = Model::new("clause");
    let mut declare = |name| {
        model
            .new_named_variable(name, domain(0..=1))
            .expect("valid name")
    };
    let (p, q, r) = (declare("p"), declare("q"), declare("r"));

    post(&mut model, clause([p, r], [q]).expect("non-empty clause"));

    assert_eq!(
        vec!["<clause> p r not(q) </clause>"],
        section(&compile(&mut model), "constraints")
    );
}
