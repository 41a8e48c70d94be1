//! Kit specification loading and validation
//!
//! The kit spec is a human-editable YAML document describing the drumkit:
//! identity/metadata, timing parameters, and the ordered instrument list
//! with each instrument's ordered articulations. Validation is
//! all-or-nothing: a `KitSpec` that leaves this module is fully checked
//! and no downstream component re-validates.

use crate::error::{KitError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Root kit specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitSpec {
    /// Unique identifier, used in output filenames
    pub kit_code: String,
    /// Display name shown by Hydrogen; defaults to the kit code
    #[serde(default)]
    pub kit_name: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub timing: TimingConfig,
    /// Output path for the generated MIDI file; defaults to
    /// `media/<kit_code>.mid`
    #[serde(default)]
    pub midi_out: Option<PathBuf>,
    /// Hydrogen instrument attribute defaults (volume, pan_L, ...),
    /// merged under each instrument's own attributes
    #[serde(default)]
    pub default_attributes: BTreeMap<String, String>,
    pub instruments: Vec<InstrumentSpec>,
}

/// Global timing parameters for the trigger sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub tempo_bpm: u32,
    /// Ticks per quarter note of the generated file
    pub ppq: u16,
    /// Length of each trigger note in ticks
    pub note_ticks: u32,
    /// Silence between consecutive trigger notes in ticks
    pub gap_ticks: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tempo_bpm: 120,
            ppq: 48,
            note_ticks: 24,
            gap_ticks: 24,
        }
    }
}

/// One drum instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentSpec {
    /// Unique within the kit; used for sample filenames
    pub name: String,
    /// Display name shown by Hydrogen; defaults to `name`
    #[serde(default)]
    pub display: Option<String>,
    /// Explicit MIDI pitch; when absent the planner assigns the next
    /// free pitch from the base
    #[serde(default)]
    pub midi_note: Option<u8>,
    /// Per-instrument Hydrogen attribute overrides
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    pub articulations: Vec<ArticulationSpec>,
}

impl InstrumentSpec {
    pub fn display_name(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.name)
    }
}

/// One playable variant of an instrument (hit, rim, choke, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticulationSpec {
    /// Unique within the instrument
    pub label: String,
    /// Trigger velocity; doubles as the layer's upper velocity bound in
    /// the packaged kit. When absent the planner slices 1..=127 evenly
    /// across the instrument's articulations.
    #[serde(default)]
    pub velocity: Option<u8>,
    /// Layer gain in the packaged kit; Hydrogen's default is 1.0
    #[serde(default)]
    pub gain: Option<f32>,
}

/// Load a kit specification from a YAML file and validate it
pub fn load_kit_spec<P: AsRef<Path>>(path: P) -> Result<KitSpec> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| KitError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let spec: KitSpec = serde_yaml::from_str(&content)?;
    validate_kit_spec(&spec)?;
    Ok(spec)
}

/// Validate a kit specification; all-or-nothing
pub fn validate_kit_spec(spec: &KitSpec) -> Result<()> {
    if spec.kit_code.is_empty() {
        return Err(KitError::Config("kit_code must not be empty".to_string()));
    }
    if !spec
        .kit_code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(KitError::Config(format!(
            "kit_code '{}' must contain only ASCII letters, digits, '-' or '_'",
            spec.kit_code
        )));
    }
    if spec.instruments.is_empty() {
        return Err(KitError::Config(
            "at least one instrument is required".to_string(),
        ));
    }
    if spec.timing.note_ticks == 0 {
        return Err(KitError::Config("timing.note_ticks must be > 0".to_string()));
    }
    if spec.timing.tempo_bpm == 0 {
        return Err(KitError::Config("timing.tempo_bpm must be > 0".to_string()));
    }

    let mut seen_names = Vec::new();
    for instrument in &spec.instruments {
        if instrument.name.is_empty() {
            return Err(KitError::Config(
                "instrument name must not be empty".to_string(),
            ));
        }
        if seen_names.contains(&instrument.name.as_str()) {
            return Err(KitError::Config(format!(
                "duplicate instrument name '{}'",
                instrument.name
            )));
        }
        seen_names.push(instrument.name.as_str());

        if let Some(note) = instrument.midi_note {
            if note > 127 {
                return Err(KitError::Config(format!(
                    "instrument '{}': midi_note {} is out of MIDI range 0-127",
                    instrument.name, note
                )));
            }
        }
        if instrument.articulations.is_empty() {
            return Err(KitError::Config(format!(
                "instrument '{}' declares no articulations",
                instrument.name
            )));
        }

        let mut seen_labels = Vec::new();
        for articulation in &instrument.articulations {
            if articulation.label.is_empty() {
                return Err(KitError::Config(format!(
                    "instrument '{}': articulation label must not be empty",
                    instrument.name
                )));
            }
            if seen_labels.contains(&articulation.label.as_str()) {
                return Err(KitError::Config(format!(
                    "instrument '{}': duplicate articulation label '{}'",
                    instrument.name, articulation.label
                )));
            }
            seen_labels.push(articulation.label.as_str());

            if articulation.velocity == Some(0) {
                return Err(KitError::Config(format!(
                    "instrument '{}', articulation '{}': velocity must be 1-127",
                    instrument.name, articulation.label
                )));
            }
            if let Some(vel) = articulation.velocity {
                if vel > 127 {
                    return Err(KitError::Config(format!(
                        "instrument '{}', articulation '{}': velocity {} is out of range 1-127",
                        instrument.name, articulation.label, vel
                    )));
                }
            }
        }
    }

    Ok(())
}
