//! Trigger MIDI emission
//!
//! Serializes a [`KitPlan`] into a single-track standard MIDI file for
//! an external synthesizer/VST to render. Each planned note becomes an
//! isolated note-on/note-off pair on channel 9, with a marker naming
//! the instrument at its first articulation so the sequence is easy to
//! navigate in a DAW.

use crate::error::{KitError, Result};
use crate::plan::KitPlan;
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::path::Path;

const DRUM_CHANNEL: u8 = 9;

/// Write the trigger MIDI file for a plan; overwrites if present.
///
/// The file is written to a temporary sibling path and renamed into
/// place, so an interrupted run leaves nothing at the published path.
pub fn write_midi(plan: &KitPlan, path: &Path) -> Result<()> {
    let bytes = render_smf(plan)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("mid.tmp");
    std::fs::write(&tmp, &bytes)?;
    std::fs::rename(&tmp, path)?;

    log::info!(
        "wrote {} trigger notes to {}",
        plan.notes.len(),
        path.display()
    );
    Ok(())
}

/// Serialize the plan to standard MIDI file bytes
pub fn render_smf(plan: &KitPlan) -> Result<Vec<u8>> {
    let tempo_uspq = 60_000_000 / plan.tempo_bpm;

    let mut events = Vec::new();
    events.push(TrackEvent {
        delta: u28::from(0),
        kind: TrackEventKind::Meta(MetaMessage::TimeSignature(4, 2, 24, 8)),
    });
    events.push(TrackEvent {
        delta: u28::from(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::from(tempo_uspq))),
    });

    let mut current_tick = 0u32;
    let mut last_instrument = usize::MAX;
    for note in &plan.notes {
        let delta = note.start_tick - current_tick;
        events.push(TrackEvent {
            delta: u28::from(delta),
            kind: TrackEventKind::Midi {
                channel: u4::from(DRUM_CHANNEL),
                message: MidiMessage::NoteOn {
                    key: u7::from(note.pitch),
                    vel: u7::from(note.velocity),
                },
            },
        });
        if note.instrument_idx != last_instrument {
            events.push(TrackEvent {
                delta: u28::from(0),
                kind: TrackEventKind::Meta(MetaMessage::Marker(note.instrument.as_bytes())),
            });
            last_instrument = note.instrument_idx;
        }
        events.push(TrackEvent {
            delta: u28::from(note.duration),
            kind: TrackEventKind::Midi {
                channel: u4::from(DRUM_CHANNEL),
                message: MidiMessage::NoteOff {
                    key: u7::from(note.pitch),
                    vel: u7::from(0),
                },
            },
        });
        current_tick = note.start_tick + note.duration;
    }

    events.push(TrackEvent {
        delta: u28::from(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let smf = Smf {
        header: Header {
            format: Format::SingleTrack,
            timing: Timing::Metrical(u15::from(plan.ppq)),
        },
        tracks: vec![events],
    };

    let mut bytes = Vec::new();
    smf.write(&mut bytes)
        .map_err(|e| KitError::Io(format!("failed to serialize MIDI data: {:?}", e)))?;
    Ok(bytes)
}
