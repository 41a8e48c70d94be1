//! Validation tests for kit specification loading

use h2kit::config::{load_kit_spec, validate_kit_spec, KitSpec};
use h2kit::KitError;
use std::io::Write;

/// Write a YAML document to a temp file and load it
fn load_yaml(yaml: &str) -> h2kit::Result<KitSpec> {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    load_kit_spec(file.path())
}

fn parse_yaml(yaml: &str) -> KitSpec {
    serde_yaml::from_str(yaml).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
kit_code: testkit
kit_name: Test Kit
author: someone
instruments:
  - name: kick
    articulations:
      - label: hit
  - name: snare
    midi_note: 40
    articulations:
      - label: hit
        velocity: 100
      - label: rim
"#;

    #[test]
    fn test_valid_spec_loads() {
        let spec = load_yaml(VALID).expect("valid spec should load");
        assert_eq!(spec.kit_code, "testkit");
        assert_eq!(spec.kit_name.as_deref(), Some("Test Kit"));
        assert_eq!(spec.instruments.len(), 2);
        assert_eq!(spec.instruments[1].midi_note, Some(40));
        assert_eq!(spec.instruments[1].articulations[0].velocity, Some(100));
    }

    #[test]
    fn test_timing_defaults() {
        let spec = load_yaml(VALID).unwrap();
        assert_eq!(spec.timing.tempo_bpm, 120);
        assert_eq!(spec.timing.ppq, 48);
        assert_eq!(spec.timing.note_ticks, 24);
        assert_eq!(spec.timing.gap_ticks, 24);
    }

    #[test]
    fn test_duplicate_articulation_label_rejected() {
        let spec = parse_yaml(
            r#"
kit_code: testkit
instruments:
  - name: snare
    articulations:
      - label: hit
      - label: hit
"#,
        );
        let err = validate_kit_spec(&spec).unwrap_err();
        match err {
            KitError::Config(msg) => {
                assert!(msg.contains("hit"), "error should name the duplicate: {}", msg);
                assert!(msg.contains("snare"), "error should name the instrument: {}", msg);
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_instrument_name_rejected() {
        let spec = parse_yaml(
            r#"
kit_code: testkit
instruments:
  - name: kick
    articulations:
      - label: hit
  - name: kick
    articulations:
      - label: hit
"#,
        );
        let err = validate_kit_spec(&spec).unwrap_err();
        assert!(matches!(err, KitError::Config(ref msg) if msg.contains("kick")));
    }

    #[test]
    fn test_pitch_override_out_of_range_rejected() {
        let spec = parse_yaml(
            r#"
kit_code: testkit
instruments:
  - name: kick
    midi_note: 200
    articulations:
      - label: hit
"#,
        );
        assert!(matches!(
            validate_kit_spec(&spec).unwrap_err(),
            KitError::Config(_)
        ));
    }

    #[test]
    fn test_empty_instrument_list_rejected() {
        let spec = parse_yaml("kit_code: testkit\ninstruments: []\n");
        assert!(matches!(
            validate_kit_spec(&spec).unwrap_err(),
            KitError::Config(_)
        ));
    }

    #[test]
    fn test_unsafe_kit_code_rejected() {
        let spec = parse_yaml(
            r#"
kit_code: "my kit/../etc"
instruments:
  - name: kick
    articulations:
      - label: hit
"#,
        );
        assert!(matches!(
            validate_kit_spec(&spec).unwrap_err(),
            KitError::Config(_)
        ));
    }

    #[test]
    fn test_instrument_without_articulations_rejected() {
        let spec = parse_yaml(
            r#"
kit_code: testkit
instruments:
  - name: kick
    articulations: []
"#,
        );
        assert!(matches!(
            validate_kit_spec(&spec).unwrap_err(),
            KitError::Config(_)
        ));
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let err = load_kit_spec("does/not/exist.yml").unwrap_err();
        assert!(matches!(err, KitError::Config(_)));
    }
}
