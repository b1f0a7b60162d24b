//! Match criteria used to select employees

use indexmap::IndexMap;

use crate::xml::Element;

/// Ordered field-name to expected-value pairs.
///
/// Each entry is applied as its own scan over the roster, so an employee is
/// selected when any one entry matches it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchCriteria {
    entries: IndexMap<String, String>,
}

impl MatchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style
    pub fn with(mut self, field: impl Into<String>, expected: impl Into<String>) -> Self {
        self.insert(field, expected);
        self
    }

    /// Add an entry. A repeated field name replaces the earlier value in place.
    pub fn insert(&mut self, field: impl Into<String>, expected: impl Into<String>) {
        self.entries.insert(field.into(), expected.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(field, expected)| (field.as_str(), expected.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when any entry matches the employee
    pub fn matches(&self, employee: &Element) -> bool {
        self.iter()
            .any(|(field, expected)| count_matching_fields(employee, field, expected) > 0)
    }
}

impl<K, V> FromIterator<(K, V)> for MatchCriteria
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut criteria = Self::new();
        for (field, expected) in iter {
            criteria.insert(field, expected);
        }
        criteria
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for MatchCriteria
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Number of `field` children of `employee` whose text equals `expected`,
/// ignoring case. Tag names compare exactly.
pub fn count_matching_fields(employee: &Element, field: &str, expected: &str) -> usize {
    let expected = expected.to_lowercase();
    employee
        .elements_named(field)
        .filter(|node| node.text().to_lowercase() == expected)
        .count()
}
