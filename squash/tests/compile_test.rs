#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use squash::constraints::all_different;
use squash::constraints::extension;
use squash::constraints::slide;
use squash::constraints::ClassTag;
use squash::constraints::Constraint;
use squash::constraints::Table;
use squash::constraints::TableEntry;
use squash::constraints::ANY;
use squash::expressions::sum;
use squash::expressions::Term;
use squash::values::Domain;
use squash::CompileOptions;
use squash::Model;
use squash::ModelError;
use squash::TableForm;
use squash::TableTypeError;

mod helpers;
use helpers::compile;
use helpers::compile_with;
use helpers::domain;
use helpers::section;

fn pair() -> Model {
    let mut model = Model::new("pair");
    let x = model
        .new_named_variable("x", domain(0..=2))
        .expect("valid name");
    let y = model
        .new_named_variable("y", domain(0..=2))
        .expect("valid name");

    model
        .satisfy(x.not_equals(y))
        .post()
        .expect("constraint is posted");
    model
}

#[test]
fn a_satisfaction_problem_is_written_in_full() {
    let xml = compile(&mut pair());

    assert_eq!(
        "<instance format=\"XCSP3\" type=\"CSP\">
  <variables>
    <var id=\"x\"> 0..2 </var>
    <var id=\"y\" as=\"x\"/>
  </variables>
  <constraints>
    <intension> ne(x,y) </intension>
  </constraints>
</instance>
",
        xml
    );
    assert!(!xml.contains("<objectives>"));
}

#[test]
fn an_optimisation_problem_writes_its_objective() {
    let mut model = Model::new("bits");
    let bits = ["b0", "b1", "b2"].map(|name| {
        model
            .new_named_variable(name, domain(0..=1))
            .expect("valid name")
    });

    model
        .minimize(sum(bits).expect("non-empty sum"))
        .expect("objective is set");

    assert_eq!(
        "<instance format=\"XCSP3\" type=\"COP\">
  <variables>
    <var id=\"b0\"> 0 1 </var>
    <var id=\"b1\" as=\"b0\"/>
    <var id=\"b2\" as=\"b0\"/>
  </variables>
  <objectives>
    <minimize type=\"sum\"> b0 b1 b2 </minimize>
  </objectives>
</instance>
",
        compile(&mut model)
    );
}

#[test]
fn compiling_twice_gives_the_same_document() {
    let mut model = pair();

    let first = compile(&mut model);
    let second = compile(&mut model);

    assert_eq!(first, second);
    assert!(model.is_frozen());
}

#[test]
fn shifted_tables_form_one_group() {
    let mut model = Model::new("chain");
    let x = model
        .new_named_array("x", &[5], |_| Some(domain(0..=2)))
        .expect("valid array");

    let constraints = (0..4)
        .map(|i| {
            let list = [x.get(&[i]), x.get(&[i + 1])].map(|cell| cell.expect("cell exists"));
            extension(list, Table::supports([[0, 1], [1, 2]])).expect("valid table")
        })
        .collect::<Vec<_>>();
    model
        .satisfy(constraints)
        .post()
        .expect("constraints are posted");

    let compiled = model
        .compile(&CompileOptions::default())
        .expect("model compiles");
    assert_eq!(1, compiled.statistics().groups);
    assert_eq!(4, compiled.statistics().grouped_constraints);

    let xml = compiled.to_xml().expect("writing to memory succeeds");
    assert_eq!(
        vec!["<array id=\"x\" size=\"[5]\"> 0..2 </array>"],
        section(&xml, "variables")
    );
    assert_eq!(
        vec![
            "<group>",
            "<extension>",
            "<list> %... </list>",
            "<supports> (0,1)(1,2) </supports>",
            "</extension>",
            "<args> x[0] x[1] </args>",
            "<args> x[1] x[2] </args>",
            "<args> x[2] x[3] </args>",
            "<args> x[3] x[4] </args>",
            "</group>",
        ],
        section(&xml, "constraints")
    );
}

#[test]
fn grouping_can_be_disabled() {
    let mut model = Model::new("chain");
    let x = model
        .new_named_array("x", &[3], |_| Some(domain(0..=2)))
        .expect("valid array");
    let cells = x.cells().collect::<Vec<_>>();

    model
        .satisfy(vec![
            cells[0].not_equals(cells[1]),
            cells[1].not_equals(cells[2]),
        ])
        .post()
        .expect("constraints are posted");

    let options = CompileOptions {
        group_constraints: false,
        ..Default::default()
    };
    assert_eq!(
        vec![
            "<intension> ne(x[0],x[1]) </intension>",
            "<intension> ne(x[1],x[2]) </intension>",
        ],
        section(&compile_with(&mut model, &options), "constraints")
    );
}

#[test]
fn explicit_slides_are_recognised() {
    let mut model = Model::new("increasing");
    let x = model
        .new_named_array("x", &[4], |_| Some(domain(0..=9)))
        .expect("valid array");
    let cells = x.cells().collect::<Vec<_>>();

    let windows = cells
        .windows(2)
        .map(|window| {
            Constraint::intension(window[0].less_than(window[1])).expect("a predicate")
        })
        .collect::<Vec<_>>();
    model
        .satisfy(slide(windows).expect("non-empty slide"))
        .post()
        .expect("slide is posted");

    assert_eq!(
        vec![
            "<slide>",
            "<list> x[] </list>",
            "<intension> lt(%0,%1) </intension>",
            "</slide>",
        ],
        section(&compile(&mut model), "constraints")
    );
}

#[test]
fn nested_slides_keep_their_constraints() {
    let mut model = Model::new("nested");
    let x = model
        .new_named_array("x", &[4], |_| Some(domain(0..=9)))
        .expect("valid array");
    let cells = x.cells().collect::<Vec<_>>();

    let mut windows = cells
        .windows(2)
        .map(|window| {
            Constraint::intension(window[0].less_than(window[1])).expect("a predicate")
        })
        .collect::<Vec<_>>();
    let tail = windows.split_off(1);
    windows.push(slide(tail).expect("non-empty slide"));
    model
        .satisfy(slide(windows).expect("non-empty slide"))
        .post()
        .expect("slide is posted");

    assert_eq!(
        vec![
            "<slide>",
            "<list> x[] </list>",
            "<intension> lt(%0,%1) </intension>",
            "</slide>",
        ],
        section(&compile(&mut model), "constraints")
    );
}

fn sum_table_model() -> Model {
    let mut model = Model::new("sums");
    let x = model
        .new_named_variable("x", domain(0..=2))
        .expect("valid name");
    let y = model
        .new_named_variable("y", domain(0..=2))
        .expect("valid name");
    let z = model
        .new_named_variable("z", domain(0..=4))
        .expect("valid name");

    model
        .satisfy(
            extension([x + y, z.into()], Table::supports([[2, 0], [3, 1]]))
                .expect("valid table"),
        )
        .post()
        .expect("constraint is posted");
    model
}

#[test]
fn auxiliary_variables_are_named_the_same_way_every_time() {
    let first = compile(&mut sum_table_model());
    let second = compile(&mut sum_table_model());

    assert_eq!(first, second);
    assert!(first.contains("<array id=\"aux_gb\" size=\"[1]\"> 0..4 </array>"));
    assert!(first.contains("<intension> eq(aux_gb[0],add(x,y)) </intension>"));
}

#[test]
fn wildcards_are_kept_or_expanded() {
    let build = || {
        let mut model = Model::new("star");
        let x = model
            .new_named_variable("x", domain(0..=1))
            .expect("valid name");
        let y = model
            .new_named_variable("y", domain(0..=2))
            .expect("valid name");
        let table = Table::supports([vec![TableEntry::from(0), ANY], vec![1.into(), 1.into()]]);
        model
            .satisfy(extension([x, y], table).expect("valid table"))
            .post()
            .expect("constraint is posted");
        model
    };

    let compact = section(&compile(&mut build()), "constraints");
    assert_eq!(
        vec![
            "<extension starred=\"true\">",
            "<list> x y </list>",
            "<supports> (0,*)(1,1) </supports>",
            "</extension>",
        ],
        compact
    );

    let options = CompileOptions {
        table_form: TableForm::Expanded,
        ..Default::default()
    };
    let expanded = section(&compile_with(&mut build(), &options), "constraints");
    assert_eq!(
        vec![
            "<extension>",
            "<list> x y </list>",
            "<supports> (0,0)(0,1)(0,2)(1,1) </supports>",
            "</extension>",
        ],
        expanded
    );
}

#[test]
fn wide_ranges_are_expanded_over_the_column_domain() {
    let mut model = Model::new("ranges");
    let x = model
        .new_named_variable("x", domain(0..=1))
        .expect("valid name");
    let y = model
        .new_named_variable("y", domain(0..=2))
        .expect("valid name");
    let table = Table::supports([vec![TableEntry::range(0..=300_000_000), 2.into()]]);
    model
        .satisfy(extension([x, y], table).expect("valid table"))
        .post()
        .expect("constraint is posted");

    assert_eq!(
        vec![
            "<extension>",
            "<list> x y </list>",
            "<supports> (0,2)(1,2) </supports>",
            "</extension>",
        ],
        section(&compile(&mut model), "constraints")
    );
}

#[test]
fn wide_ranges_over_unbounded_columns_are_rejected() {
    let mut model = Model::new("ranges");
    let x = model
        .new_named_variable("x", Domain::unbounded())
        .expect("valid name");
    let y = model
        .new_named_variable("y", domain(0..=2))
        .expect("valid name");
    let table = Table::supports([vec![TableEntry::range(0..=300_000_000), 2.into()]]);
    model
        .satisfy(extension([x, y], table).expect("valid table"))
        .post()
        .expect("constraint is posted");

    assert_eq!(
        Some(ModelError::TableType(TableTypeError::RangeTooWide {
            inf: 0,
            sup: 300_000_000,
        })),
        model.compile(&CompileOptions::default()).err()
    );
}

#[test]
fn tags_and_notes_decorate_entries() {
    let mut model = Model::new("tagged");
    let x = model
        .new_named_array("x", &[3], |_| Some(domain(0..=3)))
        .expect("valid array");
    let cells = x.cells().collect::<Vec<_>>();

    model
        .satisfy(cells[0].less_than(cells[2]))
        .tagged(ClassTag::SymmetryBreaking)
        .note("first below last")
        .post()
        .expect("constraint is posted");
    model
        .satisfy(vec![
            all_different(x.cells()).expect("non-empty list"),
            sum(x.cells()).expect("non-empty sum").equals(6),
        ])
        .tagged(ClassTag::RedundantConstraints)
        .post()
        .expect("constraints are posted");

    let compiled = model
        .compile(&CompileOptions::default())
        .expect("model compiles");
    assert_eq!(1, compiled.statistics().blocks);

    let xml = compiled.to_xml().expect("writing to memory succeeds");
    assert!(xml.contains(
        "<intension class=\"symmetryBreaking\" note=\"first below last\"> lt(x[0],x[2]) </intension>"
    ));
    assert!(xml.contains("<block class=\"redundantConstraints\">"));
    assert!(xml.contains("<allDifferent> x[] </allDifferent>"));

    let silent = CompileOptions {
        notes: false,
        ..Default::default()
    };
    assert!(!compile_with(&mut model, &silent).contains("note="));
}

#[test]
fn annotations_are_written_last() {
    let mut model = Model::new("annotated");
    let x = model
        .new_named_array("x", &[4], |_| Some(domain(0..=3)))
        .expect("valid array");

    model
        .satisfy(all_different(x.cells()).expect("non-empty list"))
        .post()
        .expect("constraint is posted");
    model
        .annotate_decision(x.cells())
        .expect("variables belong to the model");
    model
        .annotate_value_heuristic(x.cells(), [3, 2, 1, 0])
        .expect("variables belong to the model");

    let xml = compile(&mut model);
    assert_eq!(
        vec![
            "<decision> x[] </decision>",
            "<valHeuristic>",
            "<static order=\"3 2 1 0\"> x[] </static>",
            "</valHeuristic>",
        ],
        section(&xml, "annotations")
    );
    assert!(xml.find("</constraints>") < xml.find("<annotations>"));
}

#[test]
fn repeated_decision_variables_are_written_once() {
    let mut model = Model::new("repeated");
    let x = model
        .new_named_array("x", &[4], |_| Some(domain(0..=3)))
        .expect("valid array");

    model
        .satisfy(all_different(x.cells()).expect("non-empty list"))
        .post()
        .expect("constraint is posted");
    model
        .annotate_decision(x.cells().chain(x.cells()))
        .expect("variables belong to the model");

    let xml = compile(&mut model);
    assert_eq!(
        vec!["<decision> x[] </decision>"],
        section(&xml, "annotations")
    );
}

#[test]
fn compiled_models_are_written_to_files() {
    let directory = std::env::temp_dir().join("squash-compile-test");
    std::fs::create_dir_all(&directory).expect("temporary directory is writable");

    let compiled = pair()
        .compile(&CompileOptions::default())
        .expect("model compiles");
    let path = directory.join(format!("{}.xml", compiled.file_stem()));
    compiled.write_to(&path).expect("file is written");

    let written = std::fs::read_to_string(&path).expect("file is readable");
    assert_eq!(compiled.to_xml().expect("writing to memory succeeds"), written);

    std::fs::remove_file(path).expect("file is removed");
}
