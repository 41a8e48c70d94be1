//! Error types for the kit generation pipeline

use std::fmt;
use std::path::PathBuf;

/// Custom error type covering every stage of the pipeline
#[derive(Debug)]
pub enum KitError {
    /// Malformed or invalid kit specification; fix the config file
    Config(String),
    /// MIDI layout could not be planned (explicit pitch collision)
    Plan(String),
    /// File I/O failure while writing outputs
    Io(String),
    /// One or more rendered sample files are absent or unreadable.
    /// Carries the complete list so the user can render all of them
    /// before retrying.
    MissingAssets(Vec<PathBuf>),
    /// Internal consistency fault while building the drumkit descriptor.
    /// Unreachable when asset resolution succeeded first; a bug if seen.
    Descriptor(String),
    /// Archive creation failure; no partial archive is left behind
    Packaging(String),
}

impl fmt::Display for KitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KitError::Config(msg) => write!(f, "invalid kit specification: {}", msg),
            KitError::Plan(msg) => write!(f, "MIDI layout planning failed: {}", msg),
            KitError::Io(msg) => write!(f, "I/O error: {}", msg),
            KitError::MissingAssets(paths) => {
                writeln!(f, "{} rendered sample(s) missing or unreadable:", paths.len())?;
                for path in paths {
                    writeln!(f, "  {}", path.display())?;
                }
                write!(f, "render them (see the generated MIDI file) and rerun")
            }
            KitError::Descriptor(msg) => {
                write!(f, "internal descriptor inconsistency (this is a bug): {}", msg)
            }
            KitError::Packaging(msg) => write!(f, "archive packaging failed: {}", msg),
        }
    }
}

impl std::error::Error for KitError {}

impl From<std::io::Error> for KitError {
    fn from(err: std::io::Error) -> Self {
        KitError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for KitError {
    fn from(err: serde_yaml::Error) -> Self {
        KitError::Config(format!("YAML parse error: {}", err))
    }
}

/// Result type alias for kit generation operations
pub type Result<T> = std::result::Result<T, KitError>;
