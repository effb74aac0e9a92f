//! Minimal element tree for field schemas and palette documents
//!
//! Field schemas travel through the template as raw markup text. Rewriting them
//! by plain string search breaks as soon as attribute order or whitespace
//! differs, so they are parsed into a [`MarkupElement`] tree, edited, and
//! written back. The writer is deterministic: parsing its output and writing it
//! again yields identical text.

use quick_xml::Reader;
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct MarkupError(String);

impl MarkupError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A node below an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element(MarkupElement),
    Text(String),
    CData(String),
    Comment(String),
}

/// An element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

impl MarkupElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Parse a document with exactly one root element.
    ///
    /// Declarations, processing instructions and whitespace outside the root
    /// are dropped.
    pub fn parse(text: &str) -> Result<Self, MarkupError> {
        let mut reader = Reader::from_str(text);
        let mut stack: Vec<MarkupElement> = Vec::new();
        let mut root: Option<MarkupElement> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                MarkupError::new(format!("at byte {}: {}", reader.buffer_position(), e))
            })?;
            match event {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| MarkupError::new("closing tag without opening tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| MarkupError::new(e.to_string()))?
                        .into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(MarkupNode::Text(text)),
                        None if text.trim().is_empty() => {}
                        None => return Err(MarkupError::new("text outside of the root element")),
                    }
                }
                Event::CData(data) => {
                    let data = String::from_utf8(data.into_inner().into_owned())
                        .map_err(|e| MarkupError::new(e.to_string()))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(MarkupNode::CData(data));
                    }
                }
                Event::Comment(comment) => {
                    let comment = String::from_utf8(comment.into_inner().into_owned())
                        .map_err(|e| MarkupError::new(e.to_string()))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(MarkupNode::Comment(comment));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(MarkupError::new(format!("element <{}> is not closed", open.name)));
        }
        root.ok_or_else(|| MarkupError::new("document has no root element"))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, MarkupError> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| MarkupError::new(e.to_string()))?
            .to_string();
        let mut element = Self::new(name);
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| MarkupError::new(e.to_string()))?;
            let key = std::str::from_utf8(attribute.key.as_ref())
                .map_err(|e| MarkupError::new(e.to_string()))?
                .to_string();
            let value = attribute
                .unescape_value()
                .map_err(|e| MarkupError::new(e.to_string()))?
                .into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    /// Element name without its namespace prefix
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &MarkupElement> {
        self.children.iter().filter_map(|node| match node {
            MarkupNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// True when this element or any descendant is named `name`
    pub fn contains_element(&self, name: &str) -> bool {
        self.name == name || self.child_elements().any(|child| child.contains_element(name))
    }

    /// Remove every descendant element named `name`, returning how many were removed
    pub fn remove_elements(&mut self, name: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node, MarkupNode::Element(e) if e.name == name));
        let mut removed = before - self.children.len();
        for node in &mut self.children {
            if let MarkupNode::Element(child) = node {
                removed += child.remove_elements(name);
            }
        }
        removed
    }

    /// Replace `from` with `to` in every attribute value and text node of the subtree
    pub fn replace_in_values(&mut self, from: &str, to: &str) {
        for (_, value) in &mut self.attributes {
            if value.contains(from) {
                *value = value.replace(from, to);
            }
        }
        for node in &mut self.children {
            match node {
                MarkupNode::Element(child) => child.replace_in_values(from, to),
                MarkupNode::Text(text) | MarkupNode::CData(text) if text.contains(from) => {
                    *text = text.replace(from, to);
                }
                _ => {}
            }
        }
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", key, escape(value.as_str())));
        }
        if self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                MarkupNode::Element(child) => child.write_to(out),
                MarkupNode::Text(text) => out.push_str(&partial_escape(text.as_str())),
                MarkupNode::CData(data) => {
                    out.push_str(&format!("<![CDATA[{}]]>", data));
                }
                MarkupNode::Comment(comment) => {
                    out.push_str(&format!("<!--{}-->", comment));
                }
            }
        }
        out.push_str(&format!("</{}>", self.name));
    }
}

fn attach(
    stack: &mut [MarkupElement],
    root: &mut Option<MarkupElement>,
    element: MarkupElement,
) -> Result<(), MarkupError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(MarkupNode::Element(element)),
        None if root.is_some() => {
            return Err(MarkupError::new(format!(
                "second root element <{}>",
                element.name
            )));
        }
        None => *root = Some(element),
    }
    Ok(())
}
