//! A small owned element tree.
//!
//! Models build and read `Element`s; `roxmltree` turns text into a tree and
//! `quick-xml` turns a tree back into text.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::{Document, Node};

use crate::error::ParseError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    /// Attributes in insertion order.
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets an attribute, replacing the previous value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(pair) => pair.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn required_attr(&self, name: &str) -> Result<&str, ParseError> {
        self.attr(name).ok_or_else(|| ParseError::MissingAttribute {
            element: self.tag.clone(),
            attribute: name.to_string(),
        })
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn required_text(&self) -> Result<&str, ParseError> {
        self.text().ok_or_else(|| ParseError::MissingText {
            element: self.tag.clone(),
        })
    }

    /// Appends `child` and returns a handle to it.
    pub fn push(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn sub_element(&mut self, tag: impl Into<String>) -> &mut Element {
        self.push(Element::new(tag))
    }

    pub fn text_element(&mut self, tag: impl Into<String>, text: impl Into<String>) -> &mut Element {
        self.push(Element::new(tag).with_text(text))
    }

    pub fn insert(&mut self, index: usize, child: Element) {
        self.children.insert(index, child);
    }

    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    pub fn required_child(&self, tag: &str) -> Result<&Element, ParseError> {
        self.find(tag).ok_or_else(|| ParseError::MissingChild {
            element: self.tag.clone(),
            child: tag.to_string(),
        })
    }

    pub fn first_child(&self) -> Option<&Element> {
        self.children.first()
    }

    /// Parses a document and returns its root element.
    pub fn parse(contents: &str) -> Result<Element, ParseError> {
        let doc = Document::parse(contents)?;
        Ok(Element::from_node(&doc.root_element()))
    }

    pub fn from_node(node: &Node) -> Element {
        Element {
            tag: node.tag_name().name().to_string(),
            attrs: node
                .attributes()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect(),
            text: to_text(node),
            children: node
                .children()
                .filter(Node::is_element)
                .map(|n| Element::from_node(&n))
                .collect(),
        }
    }

    /// Writes the element as a UTF-8 document, tab-indented when `pretty`.
    pub fn write<W: Write>(&self, inner: W, pretty: bool) -> quick_xml::Result<()> {
        let mut writer = match pretty {
            true => Writer::new_with_indent(inner, b'\t', 1),
            false => Writer::new(inner),
        };
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        write_element(&mut writer, self)
    }

    pub fn to_xml_string(&self, pretty: bool) -> quick_xml::Result<String> {
        let mut buf = Vec::new();
        self.write(&mut buf, pretty)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn write_element<W: Write>(writer: &mut Writer<W>, el: &Element) -> quick_xml::Result<()> {
    let mut start = BytesStart::new(el.tag.as_str());
    for (name, value) in &el.attrs {
        start.push_attribute((name.as_str(), value.as_str()));
    }
    let text = el.text.as_deref().filter(|t| !t.is_empty());
    if text.is_none() && el.children.is_empty() {
        return writer.write_event(Event::Empty(start));
    }
    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &el.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(el.tag.as_str())))
}

// Leaf text is kept as written, empty included. Whitespace between child
// elements is indentation.
fn to_text(node: &Node) -> Option<String> {
    let text: String = node
        .children()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect();
    let has_children = node.children().any(|n| n.is_element());
    match has_children && text.trim().is_empty() {
        true => None,
        false => Some(text),
    }
}
