//! Field, group and employee value types

use crate::error::RosterError;
use crate::xml::{Content, Element};

/// Leaf name/value pair
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn to_element(&self) -> Element {
        Element::with_text(self.name.as_str(), self.value.as_str())
    }
}

/// Named collection of fields nested under an employee
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Group {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn to_element(&self) -> Element {
        let mut element = Element::new(self.name.as_str());
        for field in &self.fields {
            element.push_element(field.to_element());
        }
        element
    }
}

/// Snapshot of one employee element, split into fields and groups
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Employee {
    pub fields: Vec<Field>,
    pub groups: Vec<Group>,
}

impl Employee {
    /// Children without element children are fields, the rest are groups.
    pub fn from_element(element: &Element) -> Self {
        let mut employee = Self::default();
        for child in element.elements() {
            if is_leaf(child) {
                employee.fields.push(Field::new(child.name.as_str(), child.text()));
            } else {
                let fields = child
                    .elements()
                    .map(|sub| Field::new(sub.name.as_str(), sub.text()))
                    .collect();
                employee.groups.push(Group::new(child.name.as_str(), fields));
            }
        }
        employee
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    pub fn groups_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Group> {
        self.groups.iter().filter(move |group| group.name == name)
    }
}

fn is_leaf(element: &Element) -> bool {
    element
        .children
        .iter()
        .all(|child| matches!(child, Content::Text(_)))
}

/// Zip names with values, rejecting lists of different length.
pub fn pair_fields<N, V>(names: &[N], values: &[V]) -> Result<Vec<Field>, RosterError>
where
    N: AsRef<str>,
    V: AsRef<str>,
{
    if names.len() != values.len() {
        return Err(RosterError::FieldCountMismatch {
            names: names.len(),
            values: values.len(),
        });
    }

    Ok(names
        .iter()
        .zip(values)
        .map(|(name, value)| Field::new(name.as_ref(), value.as_ref()))
        .collect())
}
