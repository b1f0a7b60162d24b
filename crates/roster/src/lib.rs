//! roster - edit XML employee rosters
//!
//! # Quick Start
//!
//! ```
//! use roster::{employees, from_xml_str, Employee, MatchCriteria};
//! # fn main() -> Result<(), roster::Error> {
//! let doc = from_xml_str(
//!     "<employees><employee><name>Ram</name><age>30</age></employee></employees>",
//! )?;
//! let criteria = MatchCriteria::new().with("name", "ram");
//! let found = roster::find_employees(&doc, &criteria);
//! assert_eq!(found.len(), 1);
//! let ram = employees(&doc).map(Employee::from_element).next().unwrap_or_default();
//! assert_eq!(ram.field("age"), Some("30"));
//! # Ok(())
//! # }
//! ```
//!
//! The mutating functions take the path to save to and rewrite the whole
//! file after every change:
//!
//! ```no_run
//! use roster::MatchCriteria;
//! # fn main() -> Result<(), roster::RosterError> {
//! let path = "staff.xml";
//! let mut doc = roster::load(path)?;
//! roster::add_employee(&mut doc, &["name", "age"], &["Mohan", "25"], path)?;
//! roster::remove_employee(&mut doc, path, &MatchCriteria::new().with("name", "Mohan"))?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use std::path::Path;

pub mod error;
pub use error::{Error, ErrorKind, LoadError, Pos, Result, RosterError, Span};

pub mod xml;
pub use xml::{
    Config as ParserConfig, Content as XmlContent, Document as XmlDocument,
    Element as XmlElement, Parser as XmlParser, WriterConfig,
};

pub mod roster;
pub use roster::{
    employees, find_employees, Editor, Employee, Field, Group, MatchCriteria, Outcome,
    EMPLOYEE_TAG,
};

/// Parse a roster document from string
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    XmlParser::new(s.as_bytes()).parse()
}

/// Parse a roster document from bytes
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    XmlParser::new(bytes).parse()
}

/// Serialize a roster document compactly
pub fn to_xml_string(doc: &XmlDocument) -> String {
    xml::writer::to_string(doc)
}

/// Load the roster at `path`
pub fn load(path: impl AsRef<Path>) -> std::result::Result<XmlDocument, RosterError> {
    Editor::new().load(path)
}

/// Overwrite `path` with `doc`
pub fn save(doc: &XmlDocument, path: impl AsRef<Path>) -> std::result::Result<(), RosterError> {
    Editor::new().save(doc, path)
}

/// Append an employee and save
pub fn add_employee<N, V>(
    doc: &mut XmlDocument,
    names: &[N],
    values: &[V],
    path: impl AsRef<Path>,
) -> std::result::Result<Outcome, RosterError>
where
    N: AsRef<str>,
    V: AsRef<str>,
{
    Editor::new().add_employee(doc, names, values, path)
}

/// Append a group under each matching employee and save
pub fn add_group_to_employee<N, V>(
    doc: &mut XmlDocument,
    group: &str,
    names: &[N],
    values: &[V],
    path: impl AsRef<Path>,
    criteria: &MatchCriteria,
) -> std::result::Result<Outcome, RosterError>
where
    N: AsRef<str>,
    V: AsRef<str>,
{
    Editor::new().add_group_to_employee(doc, group, names, values, path, criteria)
}

/// Remove matching employees and save
pub fn remove_employee(
    doc: &mut XmlDocument,
    path: impl AsRef<Path>,
    criteria: &MatchCriteria,
) -> std::result::Result<Outcome, RosterError> {
    Editor::new().remove_employee(doc, path, criteria)
}
