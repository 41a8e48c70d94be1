//! h2drumkit archive packaging
//!
//! Bundles the descriptor XML and every referenced sample into the tar
//! layout Hydrogen's importer expects: a single top-level folder named
//! after the kit code containing `drumkit.xml` and the sample files.
//! The archive is staged in a temporary directory and written to a
//! temporary file that is atomically renamed into place on success, so
//! an interrupted run never leaves a partial archive at the published
//! path.

use crate::descriptor::{descriptor_xml, DrumkitDescriptor};
use crate::error::{KitError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Package a built descriptor into `kits_dir/<kit_code>.h2drumkit`.
/// Creates `kits_dir` if absent; overwrites an existing archive.
pub fn package_kit(descriptor: &DrumkitDescriptor, kits_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(kits_dir)
        .map_err(|e| KitError::Packaging(format!("cannot create {}: {}", kits_dir.display(), e)))?;

    let staging = tempfile::tempdir()
        .map_err(|e| KitError::Packaging(format!("cannot create staging directory: {}", e)))?;
    let kit_root = staging.path().join(&descriptor.kit_code);
    fs::create_dir(&kit_root)
        .map_err(|e| KitError::Packaging(format!("cannot stage kit folder: {}", e)))?;

    let xml = descriptor_xml(descriptor)?;
    fs::write(kit_root.join("drumkit.xml"), xml)
        .map_err(|e| KitError::Packaging(format!("cannot write drumkit.xml: {}", e)))?;

    for instrument in &descriptor.instruments {
        for layer in &instrument.layers {
            fs::copy(&layer.source, kit_root.join(&layer.filename)).map_err(|e| {
                KitError::Packaging(format!(
                    "cannot copy sample {}: {}",
                    layer.source.display(),
                    e
                ))
            })?;
        }
    }

    let archive_path = kits_dir.join(format!("{}.h2drumkit", descriptor.kit_code));
    let tmp_path = kits_dir.join(format!(".{}.h2drumkit.tmp", descriptor.kit_code));
    let result = write_tar(&kit_root, &descriptor.kit_code, &tmp_path);
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
        result?;
    }
    fs::rename(&tmp_path, &archive_path)
        .map_err(|e| KitError::Packaging(format!("cannot publish archive: {}", e)))?;

    log::info!("packaged {}", archive_path.display());
    Ok(archive_path)
}

fn write_tar(kit_root: &Path, kit_code: &str, out: &Path) -> Result<()> {
    let file = fs::File::create(out)
        .map_err(|e| KitError::Packaging(format!("cannot create {}: {}", out.display(), e)))?;
    let mut builder = tar::Builder::new(file);
    builder
        .append_dir_all(kit_code, kit_root)
        .map_err(|e| KitError::Packaging(format!("tar append failed: {}", e)))?;
    let mut file = builder
        .into_inner()
        .map_err(|e| KitError::Packaging(format!("tar finalize failed: {}", e)))?;
    use std::io::Write;
    file.flush()
        .map_err(|e| KitError::Packaging(format!("tar flush failed: {}", e)))?;
    Ok(())
}
