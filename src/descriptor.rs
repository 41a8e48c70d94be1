//! Hydrogen drumkit descriptor
//!
//! Builds the `drumkit_info` metadata tree Hydrogen reads when
//! importing a kit, mirroring the instrument ordering and pitch
//! assignment of the plan, and serializes it to Hydrogen's XML schema.
//! Layer velocity ranges are sliced from the articulation trigger
//! velocities, so a kit rendered at three velocities responds to the
//! matching three velocity bands when played back.

use crate::assets::ResolvedSample;
use crate::config::KitSpec;
use crate::error::{KitError, Result};
use crate::plan::KitPlan;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// In-memory form of Hydrogen's `drumkit.xml`
#[derive(Debug, Clone)]
pub struct DrumkitDescriptor {
    pub kit_code: String,
    pub name: String,
    pub author: String,
    pub info: String,
    pub license: String,
    pub instruments: Vec<InstrumentEntry>,
}

#[derive(Debug, Clone)]
pub struct InstrumentEntry {
    pub id: usize,
    pub name: String,
    pub midi_out_note: u8,
    /// Hydrogen instrument attributes (volume, pan_L, ...) as flat tags
    pub attributes: BTreeMap<String, String>,
    pub layers: Vec<LayerEntry>,
}

#[derive(Debug, Clone)]
pub struct LayerEntry {
    /// Filename inside the packaged kit
    pub filename: String,
    /// Resolved rendered sample on disk
    pub source: PathBuf,
    /// Velocity range this layer answers to, 0.0-1.0
    pub min: f32,
    pub max: f32,
    pub gain: f32,
}

/// Build the descriptor from the spec, the plan and the resolved
/// samples. The plan is the ordering authority; the spec only
/// contributes metadata and attributes.
pub fn build_descriptor(
    spec: &KitSpec,
    plan: &KitPlan,
    samples: &[ResolvedSample],
) -> Result<DrumkitDescriptor> {
    let mut instruments = Vec::with_capacity(spec.instruments.len());

    for (idx, instrument) in spec.instruments.iter().enumerate() {
        let pitch = plan.pitch_of(idx).ok_or_else(|| {
            KitError::Descriptor(format!("instrument '{}' has no planned pitch", instrument.name))
        })?;

        let mut attributes = spec.default_attributes.clone();
        attributes.extend(instrument.attributes.clone());

        // Layer bands must be contiguous and ascending for Hydrogen to
        // pick the right sample per velocity, so slice them over the
        // articulations sorted by trigger velocity rather than declared
        // order.
        let mut slots: Vec<_> = plan.notes_of(idx).zip(&instrument.articulations).collect();
        slots.sort_by_key(|(note, _)| note.velocity);

        let mut layers = Vec::with_capacity(instrument.articulations.len());
        let mut range_min = 0.0f32;
        for (note, articulation) in slots {
            let sample = samples
                .iter()
                .find(|s| s.instrument_idx == idx && s.articulation == articulation.label)
                .ok_or_else(|| {
                    KitError::Descriptor(format!(
                        "no resolved sample for '{}' articulation '{}'",
                        instrument.name, articulation.label
                    ))
                })?;
            let range_max = f32::from(note.velocity) / 127.0;
            layers.push(LayerEntry {
                filename: sample.archive_name.clone(),
                source: sample.path.clone(),
                min: range_min,
                max: range_max,
                gain: articulation.gain.unwrap_or(1.0),
            });
            range_min = range_max;
        }

        instruments.push(InstrumentEntry {
            id: idx,
            name: instrument.display_name().to_string(),
            midi_out_note: pitch,
            attributes,
            layers,
        });
    }

    Ok(DrumkitDescriptor {
        kit_code: spec.kit_code.clone(),
        name: spec.kit_name.clone().unwrap_or_else(|| spec.kit_code.clone()),
        author: spec.author.clone().unwrap_or_default(),
        info: spec.info.clone().unwrap_or_default(),
        license: spec.license.clone().unwrap_or_default(),
        instruments,
    })
}

/// Serialize the descriptor to Hydrogen's `drumkit.xml` schema
pub fn descriptor_xml(descriptor: &DrumkitDescriptor) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_event(&mut writer, Event::Start(BytesStart::new("drumkit_info")))?;

    write_tag(&mut writer, "name", &descriptor.name)?;
    write_tag(&mut writer, "author", &descriptor.author)?;
    write_tag(&mut writer, "info", &descriptor.info)?;
    write_tag(&mut writer, "license", &descriptor.license)?;

    write_event(&mut writer, Event::Start(BytesStart::new("instrumentList")))?;
    for instrument in &descriptor.instruments {
        write_event(&mut writer, Event::Start(BytesStart::new("instrument")))?;
        write_tag(&mut writer, "id", &instrument.id.to_string())?;
        write_tag(&mut writer, "name", &instrument.name)?;
        write_tag(&mut writer, "midiOutNote", &instrument.midi_out_note.to_string())?;
        for (attr, value) in &instrument.attributes {
            write_tag(&mut writer, attr, value)?;
        }
        for layer in &instrument.layers {
            write_event(&mut writer, Event::Start(BytesStart::new("layer")))?;
            write_tag(&mut writer, "filename", &layer.filename)?;
            write_tag(&mut writer, "min", &format!("{:.6}", layer.min))?;
            write_tag(&mut writer, "max", &format!("{:.6}", layer.max))?;
            write_tag(&mut writer, "gain", &format_gain(layer.gain))?;
            write_tag(&mut writer, "pitch", "0")?;
            write_event(&mut writer, Event::End(BytesEnd::new("layer")))?;
        }
        write_event(&mut writer, Event::End(BytesEnd::new("instrument")))?;
    }
    write_event(&mut writer, Event::End(BytesEnd::new("instrumentList")))?;
    write_event(&mut writer, Event::End(BytesEnd::new("drumkit_info")))?;

    Ok(writer.into_inner())
}

fn format_gain(gain: f32) -> String {
    if (gain - 1.0).abs() < f32::EPSILON {
        "1".to_string()
    } else {
        format!("{}", gain)
    }
}

fn write_tag<W: std::io::Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    write_event(writer, Event::Start(BytesStart::new(tag)))?;
    write_event(writer, Event::Text(BytesText::new(text)))?;
    write_event(writer, Event::End(BytesEnd::new(tag)))
}

fn write_event<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| KitError::Packaging(format!("XML write error: {}", e)))
}
