//! Implements the writing of XCSP3 documents.
//!
//! See [`DocumentWriter`] for more information on how to write documents.

use std::io::BufWriter;
use std::io::Write;

use crate::is_valid_identifier;
use crate::Element;
use crate::Error;
use crate::Token;

/// The number of spaces one nesting level is indented with.
const INDENTATION_WIDTH: usize = 2;

/// Abstraction for writing XCSP3 documents to an underlying sink implementing [`Write`].
///
/// Documents are pretty-printed: every element starts on its own line, nested elements are
/// indented by two spaces, and textual content is padded with a single space on either side.
#[derive(Debug)]
pub struct DocumentWriter<W: Write> {
    /// The writer to the underlying sink.
    writer: BufWriter<W>,
}

impl<W: Write> DocumentWriter<W> {
    pub fn new(sink: W) -> Self {
        DocumentWriter {
            writer: BufWriter::new(sink),
        }
    }

    /// Write the document rooted at `root` and flush the underlying sink.
    ///
    /// Before anything is written, the values of `id` and `as` attributes in the tree are checked
    /// to be valid identifiers. If one is not, nothing is written and
    /// [`Error::InvalidIdentifier`] is returned.
    pub fn write(&mut self, root: &Element) -> Result<(), Error> {
        validate_identifiers(root)?;

        self.write_element(root, 0)?;
        self.writer.flush()?;

        Ok(())
    }

    /// Recover the underlying sink.
    pub fn into_inner(self) -> Result<W, Error> {
        self.writer
            .into_inner()
            .map_err(|error| Error::IoError(error.into_error()))
    }

    fn write_element(&mut self, element: &Element, depth: usize) -> std::io::Result<()> {
        let indentation = depth * INDENTATION_WIDTH;
        write!(self.writer, "{:indentation$}<{}", "", element.name())?;

        for (key, value) in element.attributes() {
            write!(self.writer, " {key}=\"{}\"", escape(value, true))?;
        }

        if element.is_empty() {
            return writeln!(self.writer, "/>");
        }

        write!(self.writer, ">")?;

        if let Some(text) = element.text() {
            write!(self.writer, " {} ", escape(text, false))?;
        }

        if element.children().is_empty() {
            return writeln!(self.writer, "</{}>", element.name());
        }

        writeln!(self.writer)?;

        for child in element.children() {
            self.write_element(child, depth + 1)?;
        }

        writeln!(self.writer, "{:indentation$}</{}>", "", element.name())
    }
}

fn validate_identifiers(element: &Element) -> Result<(), Error> {
    for (key, value) in element.attributes() {
        if Token::holds_identifier(key) && !is_valid_identifier(value) {
            return Err(Error::InvalidIdentifier {
                attribute: key.to_owned(),
                value: value.to_owned(),
            });
        }
    }

    element.children().iter().try_for_each(validate_identifiers)
}

fn escape(content: &str, in_attribute: bool) -> String {
    let mut escaped = String::with_capacity(content.len());

    for c in content.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if in_attribute => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_empty_element() {
        test_serialization(
            Element::new(Token::Var)
                .with_id("y")
                .with_attribute(Token::As, "x"),
            "<var id=\"y\" as=\"x\"/>\n",
        );
    }

    #[test]
    fn write_element_with_text() {
        test_serialization(
            Element::new(Token::Intension).with_text("ne(x,y)"),
            "<intension> ne(x,y) </intension>\n",
        );
    }

    #[test]
    fn write_nested_elements() {
        test_serialization(
            Element::new(Token::Extension)
                .with_child(Element::new(Token::List).with_text("x y"))
                .with_child(Element::new(Token::Supports).with_text("(0,1)(1,0)")),
            "<extension>\n  <list> x y </list>\n  <supports> (0,1)(1,0) </supports>\n</extension>\n",
        );
    }

    #[test]
    fn write_escapes_markup() {
        test_serialization(
            Element::new(Token::Block)
                .with_attribute(Token::Note, "x < \"y\"")
                .with_child(Element::new(Token::Intension).with_text("a & b")),
            "<block note=\"x &lt; &quot;y&quot;\">\n  <intension> a &amp; b </intension>\n</block>\n",
        );
    }

    #[test]
    fn invalid_identifiers_are_rejected() {
        let root = Element::new(Token::Variables)
            .with_child(Element::new(Token::Var).with_id("x y").with_text("0 1"));

        let mut buffer = Vec::new();
        let result = DocumentWriter::new(&mut buffer).write(&root);

        assert!(matches!(
            result,
            Err(Error::InvalidIdentifier { ref attribute, ref value }) if attribute == "id" && value == "x y"
        ));
        assert!(buffer.is_empty());
    }

    fn test_serialization(element: Element, expected: &str) {
        let mut writer = DocumentWriter::new(Vec::new());
        writer.write(&element).expect("no error writing");

        let buffer = writer.into_inner().expect("no error flushing");
        let actual = String::from_utf8(buffer).expect("valid utf8");
        assert_eq!(expected, actual);
    }
}
