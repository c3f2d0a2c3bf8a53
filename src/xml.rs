//! Minimal XML element tree used for status reporting.
//!
//! The grid's coordinating server and status pages consume configuration
//! snapshots as XML. The documents involved are small and write-only, so
//! this module provides just an element tree with escaping and a `Display`
//! rendering, nothing more.

use std::fmt;

/// A single XML element: name, attributes, optional text, child elements.
///
/// # Example
///
/// ```rust
/// use browser_grid::xml::XmlElement;
///
/// let mut root = XmlElement::new("configuration");
/// root.add_attribute("type", "SERVER");
/// root.add_child(XmlElement::new("port").with_text("8080"));
/// assert_eq!(
///     root.to_string(),
///     r#"<configuration type="SERVER"><port>8080</port></configuration>"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an empty element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Sets the element's text content, builder-style.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends an attribute. Attributes render in insertion order.
    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    /// Appends a child element. Children render in insertion order, after
    /// any text content.
    pub fn add_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// The element's tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value of the named attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The element's text content, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The element's children, in document order.
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// The first child with the given tag name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Writes `s` with the five XML special characters escaped.
fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    for c in s.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' => f.write_str("&quot;")?,
            '\'' => f.write_str("&apos;")?,
            _ => write!(f, "{}", c)?,
        }
    }
    Ok(())
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in &self.attributes {
            write!(f, " {}=\"", name)?;
            write_escaped(f, value)?;
            f.write_str("\"")?;
        }
        if self.text.is_none() && self.children.is_empty() {
            return f.write_str("/>");
        }
        f.write_str(">")?;
        if let Some(ref text) = self.text {
            write_escaped(f, text)?;
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.name)
    }
}
