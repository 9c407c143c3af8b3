use std::fmt::Display;

use crate::Token;

/// A node in an XCSP3 document.
///
/// The attributes of an element are kept in insertion order, and so are its children; writing the
/// same tree twice therefore always produces the same bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    name: Box<str>,
    attributes: Vec<(Box<str>, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Create an element without attributes, text or children.
    pub fn new(name: impl AsRef<str>) -> Self {
        Element {
            name: name.as_ref().into(),
            attributes: vec![],
            text: None,
            children: vec![],
        }
    }

    /// Set the `id` attribute.
    pub fn with_id(self, id: impl Display) -> Self {
        self.with_attribute(Token::Id, id)
    }

    /// Set an attribute. If the attribute was already present, its value is replaced but its
    /// position is kept.
    pub fn with_attribute(mut self, key: impl AsRef<str>, value: impl Display) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Set the textual content of the element. Surrounding whitespace is trimmed; the writer pads
    /// text with a single space on both sides.
    pub fn with_text(mut self, text: impl Display) -> Self {
        self.set_text(text);
        self
    }

    /// Append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append all the given children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn set_attribute(&mut self, key: impl AsRef<str>, value: impl Display) {
        let key = key.as_ref();
        let value = value.to_string();

        match self
            .attributes
            .iter_mut()
            .find(|(existing, _)| existing.as_ref() == key)
        {
            Some((_, existing_value)) => *existing_value = value,
            None => self.attributes.push((key.into(), value)),
        }
    }

    pub fn set_text(&mut self, text: impl Display) {
        self.text = Some(text.to_string().trim().to_owned());
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the value of an attribute, if it is set.
    pub fn attribute(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();
        self.attributes
            .iter()
            .find(|(existing, _)| existing.as_ref() == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_ref(), value.as_str()))
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Returns true if the element has neither text nor children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.text.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_keep_their_position_when_replaced() {
        let element = Element::new(Token::Array)
            .with_id("x")
            .with_attribute(Token::Size, "[3]")
            .with_attribute(Token::Id, "y");

        let attributes = element.attributes().collect::<Vec<_>>();
        assert_eq!(vec![("id", "y"), ("size", "[3]")], attributes);
    }

    #[test]
    fn text_is_trimmed() {
        let element = Element::new(Token::Var).with_text("  0..2 ");
        assert_eq!(Some("0..2"), element.text());
    }

    #[test]
    fn elements_without_content_are_empty() {
        assert!(Element::new(Token::Var).with_id("y").is_empty());
        assert!(!Element::new(Token::Var).with_text("1").is_empty());
        assert!(!Element::new(Token::Block)
            .with_child(Element::new(Token::Intension))
            .is_empty());
    }
}
