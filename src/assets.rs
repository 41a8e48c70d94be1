//! Rendered sample resolution
//!
//! The samples themselves are produced outside this tool, by rendering
//! the generated trigger MIDI through a synthesizer and splitting the
//! result into per-slot WAV files under the media directory. This
//! module only confirms they all exist and are readable before
//! packaging starts, and reports every absent file at once rather than
//! failing on the first.

use crate::error::{KitError, Result};
use crate::plan::KitPlan;
use std::path::{Path, PathBuf};

/// One rendered sample located on disk, in plan order
#[derive(Debug, Clone)]
pub struct ResolvedSample {
    pub instrument_idx: usize,
    pub articulation: String,
    /// Filename the sample keeps inside the packaged kit
    pub archive_name: String,
    pub path: PathBuf,
}

/// Locate every rendered sample the plan expects under `media_dir`.
///
/// Fails with [`KitError::MissingAssets`] listing all missing or
/// unreadable files.
pub fn resolve_samples(plan: &KitPlan, media_dir: &Path) -> Result<Vec<ResolvedSample>> {
    let mut resolved = Vec::with_capacity(plan.notes.len());
    let mut missing = Vec::new();

    for note in &plan.notes {
        let path = media_dir.join(&note.sample_file);
        match hound::WavReader::open(&path) {
            Ok(_) => resolved.push(ResolvedSample {
                instrument_idx: note.instrument_idx,
                articulation: note.articulation.clone(),
                archive_name: note.sample_file.clone(),
                path,
            }),
            Err(e) => {
                log::debug!("cannot open {}: {}", path.display(), e);
                missing.push(path);
            }
        }
    }

    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(KitError::MissingAssets(missing))
    }
}
