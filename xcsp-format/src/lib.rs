//! This crate contains abstractions for writing documents in the XCSP3 format. XCSP3 is an
//! XML-based exchange format for constraint satisfaction and constraint optimisation problems,
//! consumed by a wide range of constraint solvers.
//!
//! A document is built as a tree of [`Element`]s, whose names and attribute keys are usually taken
//! from the standard vocabulary in [`Token`]. The tree is written with a [`DocumentWriter`].
//!
//! # Example
//! ```
//! # use xcsp_format::DocumentWriter;
//! # use xcsp_format::Element;
//! # use xcsp_format::Token;
//! let root = Element::new(Token::Instance)
//!     .with_attribute(Token::Format, "XCSP3")
//!     .with_attribute(Token::Type, "CSP")
//!     .with_child(
//!         Element::new(Token::Variables)
//!             .with_child(Element::new(Token::Var).with_id("x").with_text("0..2")),
//!     );
//!
//! let mut buffer: Vec<u8> = Vec::new();
//! DocumentWriter::new(&mut buffer).write(&root).unwrap();
//!
//! let expected = r#"<instance format="XCSP3" type="CSP">
//!   <variables>
//!     <var id="x"> 0..2 </var>
//!   </variables>
//! </instance>
//! "#;
//! assert_eq!(std::str::from_utf8(&buffer).unwrap(), expected);
//! ```

mod element;
mod error;
mod tokens;
mod writer;

pub use element::*;
pub use error::*;
pub use tokens::*;
pub use writer::*;
