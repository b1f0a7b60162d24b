//! XML serialization

use crate::xml::model::{Content, Document, Element};

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Layout options for serialized output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Spaces per nesting level; `None` writes everything on one line
    pub indent: Option<usize>,
    /// Emit an XML declaration before the root element
    pub declaration: bool,
}

impl Config {
    /// Compact output without declaration
    pub const fn compact() -> Self {
        Self {
            indent: None,
            declaration: false,
        }
    }

    /// Indented output with a declaration
    pub const fn pretty(indent: usize) -> Self {
        Self {
            indent: Some(indent),
            declaration: true,
        }
    }
}

/// Serialize a document compactly
pub fn to_string(doc: &Document) -> String {
    to_string_with_config(doc, Config::compact())
}

/// Serialize a document with the given layout
pub fn to_string_with_config(doc: &Document, config: Config) -> String {
    let mut output = String::new();
    if config.declaration {
        output.push_str(DECLARATION);
        if config.indent.is_some() {
            output.push('\n');
        }
    }
    write_element(&doc.root, config.indent, 0, &mut output);
    if config.indent.is_some() {
        output.push('\n');
    }
    output
}

fn write_element(element: &Element, indent: Option<usize>, depth: usize, output: &mut String) {
    output.push('<');
    output.push_str(&element.name);

    for (key, value) in &element.attributes {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        output.push_str(&escape_xml(value));
        output.push('"');
    }

    if element.children.is_empty() {
        output.push_str("/>");
        return;
    }

    output.push('>');

    // Text-bearing elements stay on one line so values round-trip unchanged.
    let has_text = element
        .children
        .iter()
        .any(|child| matches!(child, Content::Text(_)));
    let step = indent.filter(|_| !has_text);

    for child in &element.children {
        if let Some(step) = step {
            newline(step, depth + 1, output);
        }
        match child {
            Content::Element(child) => write_element(child, indent, depth + 1, output),
            Content::Text(text) => output.push_str(&escape_xml(text)),
        }
    }

    if let Some(step) = step {
        newline(step, depth, output);
    }
    output.push_str("</");
    output.push_str(&element.name);
    output.push('>');
}

fn newline(step: usize, depth: usize, output: &mut String) {
    output.push('\n');
    output.push_str(&" ".repeat(step * depth));
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
