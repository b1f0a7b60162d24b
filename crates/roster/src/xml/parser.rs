//! XML parser implementation

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::xml::cursor::Cursor;
use crate::xml::model::{Content, Document, Element};

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Configuration for the XML parser
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    depth: u16,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new parser with custom configuration
    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            depth: 0,
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        let size = self.cursor.remaining().len();
        if self.config.max_size > 0 && size > self.config.max_size {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                self.cursor.position(),
            ));
        }

        if self.cursor.starts_with(BOM) {
            self.cursor.advance_by(BOM.len());
        }

        self.skip_misc(true)?;
        if self.cursor.is_eof() {
            return Err(Error::at(ErrorKind::MissingRoot, self.cursor.position()));
        }

        let root = self.parse_element()?;
        self.skip_misc(false)?;

        if !self.cursor.is_eof() {
            return Err(Error::at(ErrorKind::TrailingContent, self.cursor.position()));
        }

        Ok(Document { root })
    }

    /// Skip whitespace, comments and processing instructions outside the root.
    fn skip_misc(&mut self, allow_doctype: bool) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
            } else if allow_doctype && self.cursor.starts_with(b"<!DOCTYPE") {
                self.skip_doctype()?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.expect_byte(b'<')?;

        if self.config.max_depth > 0 && self.depth >= self.config.max_depth {
            return Err(Error::at(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                self.cursor.position(),
            ));
        }

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;

        self.depth = self.depth.saturating_add(1);
        let children = self.parse_children(&name)?;
        self.depth = self.depth.saturating_sub(1);

        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_children(&mut self, name: &str) -> Result<Vec<Content>> {
        let mut children = Vec::new();
        let mut text = String::new();

        loop {
            if self.cursor.is_eof() {
                return Err(Error::with_message(
                    ErrorKind::UnexpectedEof,
                    Span::at(self.cursor.position()),
                    format!("unterminated element <{name}>"),
                ));
            }

            if self.cursor.starts_with(b"</") {
                flush_text(&mut text, &mut children);
                self.cursor.advance_by(2);
                let close_pos = self.cursor.position();
                let close = self.parse_name()?;
                if close != name {
                    return Err(Error::at(
                        ErrorKind::MismatchedTag {
                            open: name.to_string(),
                            close,
                        },
                        close_pos,
                    ));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                drop_layout_text(&mut children);
                return Ok(children);
            }

            if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
                continue;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                text.push_str(&self.parse_cdata()?);
                continue;
            }

            if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                flush_text(&mut text, &mut children);
                let child = self.parse_element()?;
                children.push(Content::Element(child));
                continue;
            }

            text.push_str(&self.parse_text()?);
        }
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) => {}
                None => return Err(Error::at(ErrorKind::UnexpectedEof, self.cursor.position())),
            }

            let name_pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(Error::at(ErrorKind::DuplicateAttribute { name }, name_pos));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            other => return Err(self.expected("quoted attribute value", other)),
        };
        self.cursor.advance();

        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_str(raw, start_pos)?;
                return decode_entities(text, start_pos);
            }
            self.cursor.advance();
        }

        Err(Error::with_message(
            ErrorKind::UnexpectedEof,
            Span::new(start_pos, self.cursor.position()),
            "unterminated attribute value",
        ))
    }

    fn parse_text(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        decode_entities(bytes_to_str(raw, start_pos)?, start_pos)
    }

    fn parse_cdata(&mut self) -> Result<String> {
        self.cursor.advance_by(b"<![CDATA[".len());
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while !self.cursor.starts_with(b"]]>") {
            if self.cursor.is_eof() {
                return Err(Error::with_message(
                    ErrorKind::UnexpectedEof,
                    Span::new(start_pos, self.cursor.position()),
                    "unterminated CDATA section",
                ));
            }
            self.cursor.advance();
        }
        let raw = self.cursor.slice_from(start);
        self.cursor.advance_by(3);
        bytes_to_str(raw, start_pos).map(str::to_string)
    }

    fn parse_name(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            other => return Err(self.expected("name", other)),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        bytes_to_str(raw, start_pos).map(str::to_string)
    }

    fn skip_comment(&mut self) -> Result<()> {
        self.cursor.advance_by(4);
        self.skip_until(b"-->", "unterminated comment")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        self.cursor.advance_by(2);
        self.skip_until(b"?>", "unterminated processing instruction")
    }

    fn skip_doctype(&mut self) -> Result<()> {
        let start = self.cursor.position();
        let mut brackets = 0usize;
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match b {
                b'[' => brackets += 1,
                b']' => brackets = brackets.saturating_sub(1),
                b'>' if brackets == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(Error::with_message(
            ErrorKind::UnexpectedEof,
            Span::new(start, self.cursor.position()),
            "unterminated DOCTYPE",
        ))
    }

    fn skip_until(&mut self, pattern: &[u8], message: &str) -> Result<()> {
        let start = self.cursor.position();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(Error::with_message(
            ErrorKind::UnexpectedEof,
            Span::new(start, self.cursor.position()),
            message,
        ))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            let found = self.cursor.current();
            Err(self.expected(&format!("'{}'", char::from(expected)), found))
        }
    }

    fn expected(&self, expected: &str, found: Option<u8>) -> Error {
        let found = match found {
            Some(b) if b.is_ascii_graphic() => format!("'{}'", char::from(b)),
            Some(b) => format!("byte 0x{b:02x}"),
            None => "end of input".to_string(),
        };
        Error::at(
            ErrorKind::Expected {
                expected: expected.to_string(),
                found,
            },
            self.cursor.position(),
        )
    }
}

fn flush_text(text: &mut String, children: &mut Vec<Content>) {
    if !text.is_empty() {
        children.push(Content::Text(std::mem::take(text)));
    }
}

/// Whitespace-only runs between child elements are layout, not data.
/// An element whose only content is whitespace keeps it.
fn drop_layout_text(children: &mut Vec<Content>) {
    if children.iter().any(|c| matches!(c, Content::Element(_))) {
        children.retain(|c| !matches!(c, Content::Text(t) if t.trim().is_empty()));
    }
}

fn bytes_to_str(bytes: &[u8], pos: Pos) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| Error::at(ErrorKind::InvalidUtf8, pos))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str, pos: Pos) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        let (before, after) = rest.split_at(amp);
        result.push_str(before);

        let body = after.get(1..).unwrap_or_default();
        let Some(semi) = body.find(';') else {
            return Err(Error::at(
                ErrorKind::InvalidEntity {
                    entity: body.chars().take(8).collect(),
                },
                pos,
            ));
        };
        let (entity, tail) = body.split_at(semi);

        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(entity),
        };
        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::at(
                    ErrorKind::InvalidEntity {
                        entity: entity.to_string(),
                    },
                    pos,
                ));
            }
        }

        rest = tail.get(1..).unwrap_or_default();
    }
    result.push_str(rest);

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Document> {
        Parser::new(input.as_bytes()).parse()
    }

    fn first_child(element: &Element) -> Option<&Element> {
        element.elements().next()
    }

    #[test]
    fn test_parse_simple_roster() -> Result<()> {
        let doc = parse("<employees><employee><name>Ram</name></employee></employees>")?;

        assert_eq!(doc.root.name, "employees");
        let employee = first_child(&doc.root);
        assert_eq!(employee.map(|e| e.name.as_str()), Some("employee"));
        let name = employee.and_then(|e| e.element("name")).map(Element::text);
        assert_eq!(name.as_deref(), Some("Ram"));
        Ok(())
    }

    #[test]
    fn test_parse_prolog_and_trailing_comment() -> Result<()> {
        let input = "\u{feff}<?xml version=\"1.0\"?>\n<!-- staff -->\n\
                     <!DOCTYPE employees [<!ELEMENT employees ANY>]>\n\
                     <employees/>\n<!-- end -->\n";
        let doc = parse(input)?;
        assert_eq!(doc.root.name, "employees");
        assert!(doc.root.children.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_with_attributes() -> Result<()> {
        let doc = parse("<employee id=\"1\" dept='R&amp;D'></employee>")?;

        assert_eq!(doc.root.attributes.get("id").map(String::as_str), Some("1"));
        assert_eq!(doc.root.attributes.get("dept").map(String::as_str), Some("R&D"));
        Ok(())
    }

    #[test]
    fn test_indentation_is_not_text() -> Result<()> {
        let doc = parse("<employees>\n  <employee>\n    <age>30</age>\n  </employee>\n</employees>")?;
        assert_eq!(doc.root.children.len(), 1);
        let employee = first_child(&doc.root);
        assert_eq!(employee.map(|e| e.children.len()), Some(1));
        Ok(())
    }

    #[test]
    fn test_whitespace_only_value_is_kept() -> Result<()> {
        let doc = parse("<employee>\n  <note>  </note>\n  <tab>\t</tab>\n</employee>")?;
        assert_eq!(doc.root.children.len(), 2);
        let note = doc.root.element("note").map(Element::text);
        assert_eq!(note.as_deref(), Some("  "));
        let tab = doc.root.element("tab").map(Element::text);
        assert_eq!(tab.as_deref(), Some("\t"));
        Ok(())
    }

    #[test]
    fn test_entities_cdata_and_comments_in_text() -> Result<()> {
        let doc = parse("<street>MG &lt;<!-- x -->Road<![CDATA[ & <co> ]]>&#x41;&#66;</street>")?;
        assert_eq!(doc.root.text(), "MG <Road & <co> AB");
        Ok(())
    }

    #[test]
    fn test_self_closing_child() -> Result<()> {
        let doc = parse("<employee><age /></employee>")?;
        let age = first_child(&doc.root);
        assert_eq!(age.map(|a| a.children.len()), Some(0));
        assert_eq!(age.map(Element::text).as_deref(), Some(""));
        Ok(())
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let err = parse("<employee><name>Ram</age></employee>").err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::MismatchedTag { open, close }) if open == "name" && close == "age"
        ));
    }

    #[test]
    fn test_unterminated_element() {
        let err = parse("<employees><employee>").err();
        assert_eq!(err.as_ref().map(Error::kind), Some(&ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_duplicate_attribute() {
        let err = parse("<employee id=\"1\" id=\"2\"/>").err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::DuplicateAttribute { .. })
        ));
    }

    #[test]
    fn test_invalid_entity() {
        let err = parse("<name>Tom &bogus; Lee</name>").err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::InvalidEntity { entity }) if entity == "bogus"
        ));
    }

    #[test]
    fn test_empty_and_trailing_input() {
        assert_eq!(
            parse("  <!-- nothing -->  ").err().as_ref().map(Error::kind),
            Some(&ErrorKind::MissingRoot)
        );
        assert_eq!(
            parse("<a/><b/>").err().as_ref().map(Error::kind),
            Some(&ErrorKind::TrailingContent)
        );
    }

    #[test]
    fn test_depth_limit() {
        let config = Config::new(2, 0);
        let err = Parser::with_config(b"<a><b><c/></b></a>", config)
            .parse()
            .err();
        assert_eq!(
            err.as_ref().map(Error::kind),
            Some(&ErrorKind::MaxDepthExceeded { max: 2 })
        );
        assert!(Parser::with_config(b"<a><b/></a>", config).parse().is_ok());
    }

    #[test]
    fn test_size_limit() {
        let err = Parser::with_config(b"<employees/>", Config::new(0, 4))
            .parse()
            .err();
        assert_eq!(
            err.as_ref().map(Error::kind),
            Some(&ErrorKind::MaxSizeExceeded { max: 4 })
        );
    }

    #[test]
    fn test_error_position_is_reported() {
        let err = parse("<employees>\n  <employee>\n    <name>Ram</nme>").err();
        let line = err.map(|e| e.span().start.line);
        assert_eq!(line, Some(3));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_depth, 128);
        assert_eq!(config.max_size, 10 * 1024 * 1024);
        assert_eq!(Config::unlimited(), Config::new(0, 0));
    }
}
