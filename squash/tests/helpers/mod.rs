//! Helpers shared by the integration tests of the compiler.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use squash::values::Domain;
use squash::values::DomainSpec;
use squash::CompileOptions;
use squash::Model;

pub(crate) fn domain(spec: impl Into<DomainSpec>) -> Domain {
    Domain::new(spec).expect("valid domain")
}

/// Compile the model with the default options and return the document.
pub(crate) fn compile(model: &mut Model) -> String {
    compile_with(model, &CompileOptions::default())
}

pub(crate) fn compile_with(model: &mut Model, options: &CompileOptions) -> String {
    model
        .compile(options)
        .expect("model compiles")
        .to_xml()
        .expect("writing to memory succeeds")
}

/// The lines strictly between the opening and the closing tag of `section`, without their
/// indentation. Returns an empty list when the section is absent.
pub(crate) fn section(xml: &str, section: &str) -> Vec<String> {
    let opening = format!("<{section}>");
    let closing = format!("</{section}>");

    xml.lines()
        .map(str::trim)
        .skip_while(|line| *line != opening)
        .skip(1)
        .take_while(|line| *line != closing)
        .map(str::to_owned)
        .collect()
}
