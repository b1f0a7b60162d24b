//! Employee roster editing on top of the XML tree

pub mod criteria;
pub mod editor;
pub mod field;

pub use criteria::MatchCriteria;
pub use editor::{find_employees, Editor, Outcome};
pub use field::{Employee, Field, Group};

use crate::xml::{Content, Document, Element};

/// Tag of the root children that count as employees
pub const EMPLOYEE_TAG: &str = "employee";

/// Employee elements under the document root, in order
pub fn employees(doc: &Document) -> impl Iterator<Item = &Element> {
    doc.root.elements_named(EMPLOYEE_TAG)
}

pub(crate) fn employees_mut(doc: &mut Document) -> impl Iterator<Item = &mut Element> {
    doc.root.children.iter_mut().filter_map(|child| match child {
        Content::Element(element) if element.name == EMPLOYEE_TAG => Some(element),
        _ => None,
    })
}
