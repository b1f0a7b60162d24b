use std::fs;

use roster::{employees, from_xml_bytes, from_xml_str, to_xml_string, Employee};

#[test]
fn test_valid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let valid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid");
    for entry in fs::read_dir(valid_dir)? {
        let path = entry?.path();
        let content = fs::read(&path)?;
        if let Err(err) = from_xml_bytes(&content) {
            return Err(
                std::io::Error::other(format!("Failed to parse valid file {path:?}: {err}")).into(),
            );
        }
    }
    Ok(())
}

#[test]
fn test_invalid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let invalid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/invalid");
    for entry in fs::read_dir(invalid_dir)? {
        let path = entry?.path();
        let content = fs::read(&path)?;
        if from_xml_bytes(&content).is_ok() {
            return Err(std::io::Error::other(format!(
                "Should fail to parse invalid file: {path:?}"
            ))
            .into());
        }
    }
    Ok(())
}

#[test]
fn test_staff_fixture_contents() -> Result<(), Box<dyn std::error::Error>> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid/staff.xml");
    let doc = from_xml_str(&fs::read_to_string(path)?)?;
    let staff: Vec<Employee> = employees(&doc).map(Employee::from_element).collect();

    assert_eq!(staff.len(), 2);
    let mohan = staff.get(1).ok_or("second employee missing")?;
    assert_eq!(mohan.field("designation"), Some("Tester"));
    let address = mohan.groups_named("address").next().ok_or("address missing")?;
    let names: Vec<&str> = address.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["doorNo", "street", "town", "state"]);
    Ok(())
}

#[test]
fn test_attribute_fixture_survives_rewrite() -> Result<(), Box<dyn std::error::Error>> {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/valid/attributes_and_comments.xml"
    );
    let doc = from_xml_str(&fs::read_to_string(path)?)?;
    let written = to_xml_string(&doc);

    assert!(written.starts_with("<employees company=\"Acme &amp; Sons\">"));
    assert!(written.contains("<employee id=\"1\">"));
    assert!(written.contains("<designation>Manager &lt;Ops&gt;</designation>"));
    assert!(written.contains("<certifications/>"));
    assert!(!written.contains("promoted"));
    assert_eq!(from_xml_str(&written)?, doc);
    Ok(())
}
