//! Property-based tests for roster editing
//!
//! These tests use proptest to verify:
//! 1. Serialization is lossless for generated rosters
//! 2. Adding an employee grows the roster by exactly one
//! 3. Removing by a unique field drops exactly that employee

use proptest::prelude::*;
use roster::{
    employees, from_xml_str, to_xml_string, Editor, Employee, Field, MatchCriteria, Outcome,
    XmlDocument, XmlElement,
};

/// Strategy for tag names
fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_.-]{0,8}".prop_map(|s| s)
}

/// Strategy for field values, including empty and whitespace-only ones
fn arb_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,4}".prop_map(|s| s),
        "[ -~]{1,12}".prop_map(|s| s),
    ]
}

fn arb_fields() -> impl Strategy<Value = Vec<Field>> {
    prop::collection::vec(
        (arb_name(), arb_value()).prop_map(|(name, value)| Field::new(name, value)),
        0..6,
    )
}

fn arb_roster() -> impl Strategy<Value = Vec<Vec<Field>>> {
    prop::collection::vec(arb_fields(), 0..8)
}

fn build(roster: &[Vec<Field>]) -> XmlDocument {
    let mut root = XmlElement::new("employees");
    for fields in roster {
        let mut employee = XmlElement::new("employee");
        for field in fields {
            employee.push_element(field.to_element());
        }
        root.push_element(employee);
    }
    XmlDocument::new(root)
}

fn fields_of(doc: &XmlDocument) -> Vec<Vec<Field>> {
    employees(doc)
        .map(|e| Employee::from_element(e).fields)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_serialization_is_lossless(roster in arb_roster()) {
        let doc = build(&roster);
        let reparsed = from_xml_str(&to_xml_string(&doc));
        prop_assert!(reparsed.is_ok());
        if let Ok(reparsed) = reparsed {
            prop_assert_eq!(fields_of(&reparsed), roster);
        }
    }

    #[test]
    fn prop_add_employee_appends_one(roster in arb_roster(), new in arb_fields()) {
        let dir = tempfile::tempdir().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let path = dir.path().join("staff.xml");
        let mut doc = build(&roster);

        let names: Vec<&str> = new.iter().map(|f| f.name.as_str()).collect();
        let values: Vec<&str> = new.iter().map(|f| f.value.as_str()).collect();
        let outcome = Editor::new().add_employee(&mut doc, &names, &values, &path);
        prop_assert!(matches!(outcome, Ok(Outcome::Added)));

        let saved = Editor::new()
            .load(&path)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let saved = fields_of(&saved);
        prop_assert_eq!(saved.len(), roster.len() + 1);
        prop_assert_eq!(saved.last(), Some(&new));
    }

    #[test]
    fn prop_remove_by_unique_id_drops_one(roster in arb_roster(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!roster.is_empty());
        let dir = tempfile::tempdir().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let path = dir.path().join("staff.xml");

        let tagged: Vec<Vec<Field>> = roster
            .iter()
            .enumerate()
            .map(|(i, fields)| {
                let mut fields = fields.clone();
                fields.push(Field::new("staffId", format!("ID-{i}")));
                fields
            })
            .collect();
        let mut doc = build(&tagged);
        let target = pick.index(tagged.len());

        let criteria = MatchCriteria::new().with("staffId", format!("id-{target}"));
        let outcome = Editor::new().remove_employee(&mut doc, &path, &criteria);
        prop_assert!(
            matches!(outcome, Ok(Outcome::Removed { employees: 1 })),
            "expected Ok(Outcome::Removed {{ employees: 1 }})"
        );

        let mut expected = tagged.clone();
        expected.remove(target);
        prop_assert_eq!(fields_of(&doc), expected);
    }
}
