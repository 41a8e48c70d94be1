//! End-to-end tests for the kit packaging pass

use h2kit::config::KitSpec;
use h2kit::plan::plan_kit;
use h2kit::{KitError, KitPipeline};
use std::io::Read;
use std::path::Path;

fn kit_spec() -> KitSpec {
    serde_yaml::from_str(
        r#"
kit_code: testkit
kit_name: Test Kit
author: someone
license: CC0
default_attributes:
  volume: "1.0"
instruments:
  - name: kick
    articulations:
      - label: hit
  - name: snare
    midi_note: 40
    attributes:
      volume: "0.8"
    articulations:
      - label: hit
        velocity: 90
      - label: rim
"#,
    )
    .unwrap()
}

/// Render a short silent WAV for every sample the plan expects
fn render_fake_samples(spec: &KitSpec, media_dir: &Path) {
    let plan = plan_kit(spec).unwrap();
    let wav_spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    for note in &plan.notes {
        let mut writer = hound::WavWriter::create(media_dir.join(&note.sample_file), wav_spec).unwrap();
        for _ in 0..64 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
}

/// Collect (path, contents) for every regular file in a tar archive
fn read_archive(path: &Path) -> Vec<(String, Vec<u8>)> {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = tar::Archive::new(file);
    let mut entries = Vec::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let name = entry.path().unwrap().to_string_lossy().into_owned();
        if entry.header().entry_type().is_file() {
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).unwrap();
            entries.push((name, contents));
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kit_run_packages_archive_with_expected_layout() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("media");
        let kits = dir.path().join("kits");
        std::fs::create_dir(&media).unwrap();

        let spec = kit_spec();
        render_fake_samples(&spec, &media);

        let archive_path = KitPipeline::new(spec).package(&media, &kits).unwrap();
        assert_eq!(archive_path, kits.join("testkit.h2drumkit"));
        assert!(archive_path.is_file());

        let entries = read_archive(&archive_path);
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"testkit/drumkit.xml"), "entries: {:?}", names);
        assert!(names.contains(&"testkit/kick_hit.wav"));
        assert!(names.contains(&"testkit/snare_hit.wav"));
        assert!(names.contains(&"testkit/snare_rim.wav"));
    }

    #[test]
    fn test_descriptor_matches_spec_order_and_references_bundled_samples() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("media");
        let kits = dir.path().join("kits");
        std::fs::create_dir(&media).unwrap();

        let spec = kit_spec();
        render_fake_samples(&spec, &media);
        let archive_path = KitPipeline::new(spec).package(&media, &kits).unwrap();

        let entries = read_archive(&archive_path);
        let xml = entries
            .iter()
            .find(|(n, _)| n == "testkit/drumkit.xml")
            .map(|(_, c)| String::from_utf8(c.clone()).unwrap())
            .expect("archive must contain drumkit.xml");

        assert!(xml.contains("<name>Test Kit</name>"));
        assert!(xml.contains("<author>someone</author>"));
        assert!(xml.contains("<license>CC0</license>"));

        // Instruments appear in spec order with the planned pitches
        let kick_pos = xml.find("<name>kick</name>").expect("kick entry");
        let snare_pos = xml.find("<name>snare</name>").expect("snare entry");
        assert!(kick_pos < snare_pos);
        assert!(xml.contains("<midiOutNote>36</midiOutNote>"));
        assert!(xml.contains("<midiOutNote>40</midiOutNote>"));

        // Default attributes merged under per-instrument overrides
        assert!(xml.contains("<volume>1.0</volume>"));
        assert!(xml.contains("<volume>0.8</volume>"));

        // Every referenced sample is present in the archive
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        for reference in ["kick_hit.wav", "snare_hit.wav", "snare_rim.wav"] {
            assert!(xml.contains(&format!("<filename>{}</filename>", reference)));
            assert!(names.contains(&format!("testkit/{}", reference).as_str()));
        }
    }

    #[test]
    fn test_layer_velocity_ranges_are_contiguous() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("media");
        let kits = dir.path().join("kits");
        std::fs::create_dir(&media).unwrap();

        let spec = kit_spec();
        render_fake_samples(&spec, &media);
        let archive_path = KitPipeline::new(spec).package(&media, &kits).unwrap();

        let entries = read_archive(&archive_path);
        let xml = entries
            .iter()
            .find(|(n, _)| n == "testkit/drumkit.xml")
            .map(|(_, c)| String::from_utf8(c.clone()).unwrap())
            .unwrap();

        // snare's first layer covers 0 .. 90/127, the second continues
        // from there up to its default velocity 127
        assert!(xml.contains("<min>0.000000</min>"));
        assert!(xml.contains(&format!("<max>{:.6}</max>", 90.0 / 127.0)));
        assert!(xml.contains(&format!("<min>{:.6}</min>", 90.0 / 127.0)));
        assert!(xml.contains("<max>1.000000</max>"));
    }

    #[test]
    fn test_missing_samples_reported_together_and_no_archive_written() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("media");
        let kits = dir.path().join("kits");
        std::fs::create_dir(&media).unwrap();

        let spec = kit_spec();
        // Render only the kick; both snare samples stay missing
        let wav_spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer =
            hound::WavWriter::create(media.join("kick_hit.wav"), wav_spec).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();

        let err = KitPipeline::new(spec).package(&media, &kits).unwrap_err();
        match err {
            KitError::MissingAssets(paths) => {
                assert_eq!(paths.len(), 2, "both missing samples must be listed");
                let listed: Vec<String> = paths
                    .iter()
                    .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                    .collect();
                assert!(listed.contains(&"snare_hit.wav".to_string()));
                assert!(listed.contains(&"snare_rim.wav".to_string()));
            }
            other => panic!("expected MissingAssets, got {:?}", other),
        }
        assert!(
            !kits.join("testkit.h2drumkit").exists(),
            "no archive may be written when samples are missing"
        );
    }

    #[test]
    fn test_repackaging_overwrites_existing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("media");
        let kits = dir.path().join("kits");
        std::fs::create_dir(&media).unwrap();

        let spec = kit_spec();
        render_fake_samples(&spec, &media);

        let pipeline = KitPipeline::new(spec);
        let first = pipeline.package(&media, &kits).unwrap();
        let second = pipeline.package(&media, &kits).unwrap();
        assert_eq!(first, second);
        assert!(second.is_file());

        // No stray temp files left in the output directory
        let leftovers: Vec<String> = std::fs::read_dir(&kits)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(leftovers, vec!["testkit.h2drumkit".to_string()]);
    }
}
