//! Integration tests for parsing DLP data.

use std::fs;
use std::path::PathBuf;
use zia_core::ids::DlpEngineId;
use zia_dlp::models::{DlpDictionary, DlpEngine};

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
fn test_deserialize_engines() {
    let engines: Vec<DlpEngine> = serde_json::from_str(&load_fixture("dlp_engines.json")).unwrap();

    assert_eq!(engines.len(), 3);
    assert_eq!(engines[0].engine_id(), DlpEngineId::new(60));
    assert_eq!(engines[1].predefined_engine_name.as_deref(), Some("EXTERNAL"));
    assert!(engines[1].engine_expression.is_none());

    let custom: Vec<&DlpEngine> = engines.iter().filter(|e| e.custom_dlp_engine).collect();
    assert_eq!(custom.len(), 1);
    assert_eq!(
        custom[0].engine_expression.as_deref(),
        Some("((D63.S > 2) AND (D1.S > 0))")
    );
}

#[test]
fn test_deserialize_dictionaries() {
    let dictionaries: Vec<DlpDictionary> =
        serde_json::from_str(&load_fixture("dlp_dictionaries.json")).unwrap();

    assert_eq!(dictionaries.len(), 2);

    let predefined = &dictionaries[0];
    assert!(!predefined.custom);
    assert!(predefined.phrases.is_empty());
    assert_eq!(
        predefined.confidence_threshold.as_deref(),
        Some("CONFIDENCE_LEVEL_HIGH")
    );

    let custom = &dictionaries[1];
    assert!(custom.custom);
    assert_eq!(custom.phrases.len(), 2);
    assert_eq!(custom.phrases[1].phrase, "Project Osprey");
    assert_eq!(custom.patterns[0].pattern, "PRJ-[0-9]{4}");
    assert_eq!(custom.proximity, Some(0));
}
