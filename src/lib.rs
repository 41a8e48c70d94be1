//! Hydrogen drumkit generation pipeline
//!
//! Turns a declarative YAML kit specification into two artifacts: a
//! trigger MIDI file enumerating every instrument/articulation note
//! (rendered externally through a synthesizer/VST), and a packaged
//! `h2drumkit` archive built from the rendered samples. The layout
//! plan derived from the spec is the single ordering authority shared
//! by both outputs, so the MIDI file and the packaged kit always agree
//! on which sample belongs to which slot.

pub mod archive;
pub mod assets;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod midi;
pub mod plan;

pub use config::{load_kit_spec, KitSpec};
pub use error::{KitError, Result};
pub use plan::{plan_kit, KitPlan};

use std::path::{Path, PathBuf};

/// Default directory for rendered audio and the generated MIDI file
pub const MEDIA_DIR: &str = "media";
/// Default directory for packaged archives
pub const KITS_DIR: &str = "kits";

/// The two-pass generation pipeline for one kit specification
pub struct KitPipeline {
    spec: KitSpec,
}

impl KitPipeline {
    /// Create a pipeline over a validated kit spec
    pub fn new(spec: KitSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &KitSpec {
        &self.spec
    }

    /// First pass: plan the layout and write the trigger MIDI file.
    /// Returns the path written (config `midi_out`, or
    /// `media/<kit_code>.mid`).
    pub fn write_midi(&self, out: Option<&Path>) -> Result<PathBuf> {
        let plan = plan_kit(&self.spec)?;
        let path = match out {
            Some(p) => p.to_path_buf(),
            None => self
                .spec
                .midi_out
                .clone()
                .unwrap_or_else(|| Path::new(MEDIA_DIR).join(format!("{}.mid", self.spec.kit_code))),
        };
        midi::write_midi(&plan, &path)?;
        Ok(path)
    }

    /// Second pass: plan, resolve the rendered samples under
    /// `media_dir`, build the descriptor and package the archive under
    /// `kits_dir`. Returns the archive path.
    pub fn package(&self, media_dir: &Path, kits_dir: &Path) -> Result<PathBuf> {
        let plan = plan_kit(&self.spec)?;
        let samples = assets::resolve_samples(&plan, media_dir)?;
        let descriptor = descriptor::build_descriptor(&self.spec, &plan, &samples)?;
        archive::package_kit(&descriptor, kits_dir)
    }
}
