//! Deterministic MIDI layout planning
//!
//! Walks the kit spec in declared order and assigns every
//! (instrument, articulation) pair a pitch, a time slot and a sample
//! filename. The resulting `KitPlan` is the single source of truth for
//! the MIDI emitter, the asset resolver and the descriptor builder;
//! none of them re-derive the ordering.

use crate::config::KitSpec;
use crate::error::{KitError, Result};

/// First auto-assigned pitch; Hydrogen's GM convention starts kits at
/// the bass drum (36)
pub const BASE_PITCH: u8 = 36;

/// One planned trigger note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePlan {
    pub pitch: u8,
    pub start_tick: u32,
    pub duration: u32,
    pub velocity: u8,
    /// Index of the owning instrument within the kit spec
    pub instrument_idx: usize,
    pub instrument: String,
    pub articulation: String,
    /// Conventional rendered-sample filename for this slot
    pub sample_file: String,
}

/// The planned layout for a whole kit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitPlan {
    pub ppq: u16,
    pub tempo_bpm: u32,
    pub notes: Vec<NotePlan>,
}

impl KitPlan {
    /// Planned pitch for an instrument, by kit-spec index
    pub fn pitch_of(&self, instrument_idx: usize) -> Option<u8> {
        self.notes
            .iter()
            .find(|n| n.instrument_idx == instrument_idx)
            .map(|n| n.pitch)
    }

    /// Notes belonging to one instrument, in declared articulation order
    pub fn notes_of(&self, instrument_idx: usize) -> impl Iterator<Item = &NotePlan> {
        self.notes
            .iter()
            .filter(move |n| n.instrument_idx == instrument_idx)
    }
}

/// Plan the trigger layout for a validated kit spec.
///
/// Pitch assignment: an instrument's explicit `midi_note` wins;
/// otherwise the next unused pitch from [`BASE_PITCH`], skipping any
/// pitch claimed by an override elsewhere in the kit. Articulations of
/// one instrument share its pitch and occupy consecutive time slots
/// spaced by `note_ticks + gap_ticks`.
pub fn plan_kit(spec: &KitSpec) -> Result<KitPlan> {
    let claimed = claimed_pitches(spec)?;

    let mut notes = Vec::new();
    let mut next_auto = BASE_PITCH;
    let mut tick = 0u32;
    let slot = spec.timing.note_ticks + spec.timing.gap_ticks;

    for (idx, instrument) in spec.instruments.iter().enumerate() {
        let pitch = match instrument.midi_note {
            Some(note) => note,
            None => {
                while claimed.contains(&next_auto) {
                    next_auto = next_auto.checked_add(1).ok_or_else(|| {
                        KitError::Plan("ran out of MIDI pitches below 128".to_string())
                    })?;
                }
                if next_auto > 127 {
                    return Err(KitError::Plan(
                        "ran out of MIDI pitches below 128".to_string(),
                    ));
                }
                let assigned = next_auto;
                next_auto += 1;
                assigned
            }
        };

        let layer_count = instrument.articulations.len();
        for (layer_idx, articulation) in instrument.articulations.iter().enumerate() {
            let velocity = articulation
                .velocity
                .unwrap_or_else(|| default_velocity(layer_idx, layer_count));
            notes.push(NotePlan {
                pitch,
                start_tick: tick,
                duration: spec.timing.note_ticks,
                velocity,
                instrument_idx: idx,
                instrument: instrument.name.clone(),
                articulation: articulation.label.clone(),
                sample_file: sample_filename(&instrument.name, &articulation.label),
            });
            tick += slot;
        }
    }

    Ok(KitPlan {
        ppq: spec.timing.ppq,
        tempo_bpm: spec.timing.tempo_bpm,
        notes,
    })
}

/// Collect explicit overrides, failing on collisions between them
fn claimed_pitches(spec: &KitSpec) -> Result<Vec<u8>> {
    let mut claimed: Vec<u8> = Vec::new();
    for instrument in &spec.instruments {
        if let Some(note) = instrument.midi_note {
            if claimed.contains(&note) {
                return Err(KitError::Plan(format!(
                    "instrument '{}': pitch override {} collides with another override",
                    instrument.name, note
                )));
            }
            claimed.push(note);
        }
    }
    Ok(claimed)
}

/// Conventional rendered-sample filename for a slot
pub fn sample_filename(instrument: &str, articulation: &str) -> String {
    format!("{}_{}.wav", instrument, articulation)
}

/// Velocity for layer `idx` of `count` when the config gives none:
/// slice 1..=127 evenly so the loudest articulation lands on 127
fn default_velocity(idx: usize, count: usize) -> u8 {
    ((((idx + 1) * 127) / count) as u8).max(1)
}
