//! Combat-mode preference persistence.
//!
//! The only state that survives restarts: the last-selected combat mode,
//! stored as a small versioned JSON document keyed by mode name. Writes go
//! through a temp file and rename so a crash never leaves a half-written
//! preference behind.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::mode::CombatMode;

/// Current preference file format version.
pub const PREFERENCE_VERSION: u32 = 1;

/// Errors that can occur while persisting the mode preference.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Preference file corrupted or not understood
    #[error("Preference file corrupted: {0}")]
    Corrupted(String),

    /// Version mismatch
    #[error("Incompatible preference version: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version
        expected: u32,
        /// Found version
        found: u32,
    },
}

/// Result type for preference operations.
pub type PreferenceResult<T> = Result<T, PreferenceError>;

#[derive(Debug, Serialize, Deserialize)]
struct ModePreference {
    version: u32,
    mode: String,
}

/// Saves the selected combat mode to `path`.
pub fn save_mode(path: &Path, mode: CombatMode) -> PreferenceResult<()> {
    let doc = ModePreference {
        version: PREFERENCE_VERSION,
        mode: mode.name().to_string(),
    };
    let json = serde_json::to_string_pretty(&doc)
        .map_err(|e| PreferenceError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Write to a temp file first, then atomically rename.
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Loads the persisted combat mode from `path`.
///
/// A missing file is not an error: the default mode is returned so first
/// startup needs no special casing.
pub fn load_mode(path: &Path) -> PreferenceResult<CombatMode> {
    if !path.exists() {
        return Ok(CombatMode::default());
    }

    let contents = fs::read_to_string(path)?;
    let doc: ModePreference =
        serde_json::from_str(&contents).map_err(|e| PreferenceError::Corrupted(e.to_string()))?;

    if doc.version != PREFERENCE_VERSION {
        return Err(PreferenceError::VersionMismatch {
            expected: PREFERENCE_VERSION,
            found: doc.version,
        });
    }

    CombatMode::from_name(&doc.mode)
        .ok_or_else(|| PreferenceError::Corrupted(format!("unknown mode name: {}", doc.mode)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_modes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("combat_mode.json");

        for mode in CombatMode::ALL {
            save_mode(&path, mode).expect("save");
            assert_eq!(load_mode(&path).expect("load"), mode);
        }
    }

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nothing_here.json");

        assert_eq!(load_mode(&path).expect("load"), CombatMode::default());
    }

    #[test]
    fn test_corrupt_payload_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("combat_mode.json");
        fs::write(&path, "not json at all").expect("write");

        assert!(matches!(
            load_mode(&path),
            Err(PreferenceError::Corrupted(_))
        ));
    }

    #[test]
    fn test_unknown_mode_name_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("combat_mode.json");
        fs::write(&path, r#"{"version":1,"mode":"berserk"}"#).expect("write");

        assert!(matches!(
            load_mode(&path),
            Err(PreferenceError::Corrupted(_))
        ));
    }

    #[test]
    fn test_version_mismatch_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("combat_mode.json");
        fs::write(&path, r#"{"version":9,"mode":"free_flow"}"#).expect("write");

        assert!(matches!(
            load_mode(&path),
            Err(PreferenceError::VersionMismatch {
                expected: PREFERENCE_VERSION,
                found: 9
            })
        ));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("combat_mode.json");

        save_mode(&path, CombatMode::Automated).expect("save");

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
