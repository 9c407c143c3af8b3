//! The n-queens problem: place `n` queens on an `n` by `n` chess board such that no two queens
//! attack each other.
//!
//! Queen `i` is placed in row `i`, and `q[i]` is its column. The columns are all different, and
//! two queens on the same diagonal are as far apart in columns as they are in rows. The diagonals
//! are either stated as intension constraints or as tables listing the attacking placements.
use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use squash::constraints::all_different;
use squash::constraints::extension;
use squash::constraints::ClassTag;
use squash::constraints::Table;
use squash::expressions::dist;
use squash::expressions::Term;
use squash::values::Domain;
use squash::CompileOptions;
use squash::Model;
use squash::SatisfyItem;
use squash::TableForm;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Formulation {
    /// `dist(q[i],q[j]) != j - i` for every pair of queens.
    Intension,
    /// A table of forbidden placements for every pair of queens.
    Table,
}

#[derive(Parser)]
struct Cli {
    /// The size of the chess board.
    n: usize,

    /// How the diagonals are constrained.
    #[arg(short, long, value_enum, default_value_t = Formulation::Intension)]
    formulation: Formulation,

    /// How tables are written.
    #[arg(long, value_enum, default_value_t = TableForm::Compact)]
    table_form: TableForm,

    /// Where to write the document. A path ending in `.gz` is compressed. Without a path, the
    /// document is printed.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    let Cli {
        n,
        formulation,
        table_form,
        output,
    } = Cli::parse();

    if n < 2 {
        println!("Please provide an 'n > 1'");
        return;
    }

    let variant = match formulation {
        Formulation::Intension => None,
        Formulation::Table => Some("table"),
    };
    let mut model = Model::new("queens").with_instance_name(variant, [n.to_string()]);

    let columns = Domain::new(0..n as i64).expect("a board has at least two columns");
    let queens = model
        .new_named_array("q", &[n], |_| Some(columns.clone()))
        .expect("'q' is a valid name");
    let q = queens.cells().collect::<Vec<_>>();

    model
        .satisfy(all_different(q.iter().copied()).expect("there are queens"))
        .post()
        .expect("all queens belong to the model");

    let pairs = (0..n).flat_map(|i| (i + 1..n).map(move |j| (i, j)));
    let diagonals = match formulation {
        Formulation::Intension => pairs
            .map(|(i, j)| SatisfyItem::from(dist(q[i], q[j]).not_equals((j - i) as i64)))
            .collect::<Vec<_>>(),
        Formulation::Table => pairs
            .map(|(i, j)| {
                let distance = (j - i) as i64;
                let attacks = (0..n as i64).flat_map(move |a| {
                    [a - distance, a + distance]
                        .into_iter()
                        .filter(move |b| (0..n as i64).contains(b))
                        .map(move |b| [a, b])
                });
                SatisfyItem::from(
                    extension([q[i], q[j]], Table::conflicts(attacks))
                        .expect("the table has two columns"),
                )
            })
            .collect(),
    };

    model
        .satisfy(diagonals)
        .note("queens on a diagonal")
        .post()
        .expect("all queens belong to the model");

    // Mirroring the board left to right gives an equivalent solution.
    if n > 2 {
        model
            .satisfy(q[0].less_than(q[n - 1]))
            .tagged(ClassTag::SymmetryBreaking)
            .post()
            .expect("all queens belong to the model");
    }

    let options = CompileOptions {
        table_form,
        ..Default::default()
    };
    let compiled = model.compile(&options).expect("the model compiles");
    compiled.statistics().log(None);

    match output {
        Some(path) => {
            if let Err(error) = compiled.write_to(&path) {
                eprintln!("Failed to write {}: {error}", path.display());
            }
        }
        None => match compiled.to_xml() {
            Ok(xml) => print!("{xml}"),
            Err(error) => eprintln!("Failed to write the document: {error}"),
        },
    }
}
