//! Integration tests for parsing user management data.

use std::fs;
use std::path::PathBuf;
use zia_core::ids::{DepartmentId, GroupId, UserId};
use zia_usermanagement::models::{Department, User};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> String {
    let fixture_path = fixtures_dir().join(name);
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

#[test]
fn test_deserialize_user_list() {
    let users: Vec<User> = serde_json::from_str(&load_fixture("users.json")).unwrap();
    assert_eq!(users.len(), 2, "Expected 2 users in test data");
}

#[test]
fn test_admin_user_fields() {
    let users: Vec<User> = serde_json::from_str(&load_fixture("users.json")).unwrap();
    let alice = &users[0];

    assert_eq!(alice.user_id(), UserId::new(44_772_848));
    assert_eq!(alice.admin_user, Some(true));
    assert_eq!(alice.user_type.as_deref(), Some("SUPERADMIN"));
    assert_eq!(alice.groups.len(), 2);
    assert_eq!(alice.groups[0].id, GroupId::new(24_392_492));
    assert!(alice.groups[1].is_system_defined);

    let department = alice.department.as_ref().expect("Alice has a department");
    assert_eq!(department.id, DepartmentId::new(29_485_508));
    assert_eq!(department.idp_id, Some(3));
}

#[test]
fn test_user_with_deleted_department() {
    let users: Vec<User> = serde_json::from_str(&load_fixture("users.json")).unwrap();
    let bob = &users[1];

    assert!(bob.groups.is_empty());
    assert_eq!(bob.temp_auth_email.as_deref(), Some("bob.temp@example.com"));
    assert!(bob.department.as_ref().is_some_and(|d| d.deleted));
}

#[test]
fn test_deserialize_department_list() {
    let departments: Vec<Department> =
        serde_json::from_str(&load_fixture("departments.json")).unwrap();

    assert_eq!(departments.len(), 3);
    assert_eq!(departments[0].comments.as_deref(), Some("R&D"));
    assert!(departments[1].deleted);
    assert!(!departments[2].deleted);
}
