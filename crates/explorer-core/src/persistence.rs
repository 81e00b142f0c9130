//! Save/Load functionality for persisting colony state
//!
//! Uses bincode for compact binary saves and serde_json for human-readable
//! ones. A save is fully decoded and checked before anything is handed back,
//! so a failed load never touches a running engine.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use explorer_logic::model::ColonyState;
use serde::{Deserialize, Serialize};

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of a colony
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Name shown in save listings
    pub player_name: String,
    /// Seconds since the Unix epoch
    pub saved_at: u64,
    /// The five tables and session scalars
    pub state: ColonyState,
}

/// On-disk encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Binary,
    Json,
}

impl SaveFormat {
    /// `.json` files are JSON, everything else binary
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SaveFormat::Json,
            _ => SaveFormat::Binary,
        }
    }
}

/// Current wall-clock time as a save timestamp
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Save a colony to a writer
pub fn save_colony<W: Write>(
    writer: W,
    format: SaveFormat,
    player_name: &str,
    saved_at: u64,
    state: &ColonyState,
) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        player_name: player_name.to_string(),
        saved_at,
        state: state.clone(),
    };

    match format {
        SaveFormat::Binary => bincode::serialize_into(writer, &save_data)?,
        SaveFormat::Json => serde_json::to_writer_pretty(writer, &save_data)?,
    }
    Ok(())
}

/// Load a colony from a reader
pub fn load_colony<R: Read>(reader: R, format: SaveFormat) -> Result<SaveData, SaveError> {
    let save_data: SaveData = match format {
        SaveFormat::Binary => bincode::deserialize_from(reader)?,
        SaveFormat::Json => serde_json::from_reader(reader)?,
    };

    if save_data.version != SAVE_VERSION {
        log::warn!(
            "Rejected save with version {} (expected {})",
            save_data.version,
            SAVE_VERSION
        );
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let problems = save_data.state.invariant_violations();
    if !problems.is_empty() {
        return Err(SaveError::Corrupt(problems.join("; ")));
    }

    Ok(save_data)
}

/// Save to a file, picking the format from its extension
pub fn save_to_path(
    path: impl AsRef<Path>,
    player_name: &str,
    saved_at: u64,
    state: &ColonyState,
) -> Result<(), SaveError> {
    let path = path.as_ref();
    let format = SaveFormat::from_path(path);
    let mut writer = BufWriter::new(File::create(path)?);
    save_colony(&mut writer, format, player_name, saved_at, state)?;
    writer.flush()?;
    log::info!("Saved colony of {} to {}", player_name, path.display());
    Ok(())
}

/// Load from a file, picking the format from its extension
pub fn load_from_path(path: impl AsRef<Path>) -> Result<SaveData, SaveError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    load_colony(reader, SaveFormat::from_path(path))
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    Json(serde_json::Error),
    VersionMismatch { expected: u32, found: u32 },
    /// Decoded fine but holds state no engine operation could produce
    Corrupt(String),
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Json(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::Json(e) => write!(f, "JSON error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            SaveError::Corrupt(detail) => write!(f, "Corrupt save: {}", detail),
        }
    }
}

impl std::error::Error for SaveError {}
