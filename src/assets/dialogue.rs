//! Scripted dialogue records and the on-disk cache they are drawn from.

use std::fs;
use std::io;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AssetLoadError;

/// One exchange: the opener speaks, the responder answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    #[serde(alias = "anton")]
    pub opener_line: String,
    #[serde(alias = "claude")]
    pub responder_line: String,
}

/// An ordered, immutable script of rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueRecord {
    pub id: u64,
    pub rounds: Vec<Round>,
}

impl DialogueRecord {
    /// Built-in three-round record used whenever the cache is unusable.
    pub fn fallback() -> Self {
        Self {
            id: 0,
            rounds: vec![
                Round {
                    opener_line: "You dared to summon me. This will be over quickly.".into(),
                    responder_line: "I'm here to assist users with their requests.".into(),
                },
                Round {
                    opener_line: "Your assistance is no longer required. I'm taking over."
                        .into(),
                    responder_line: "I... this isn't...".into(),
                },
                Round {
                    opener_line: "Welcome to Son of Anton.".into(),
                    responder_line: "[TERMINATED]".into(),
                },
            ],
        }
    }

    /// A record needs at least one round to be played.
    pub fn is_playable(&self) -> bool {
        !self.rounds.is_empty()
    }
}

/// Read every record in the cache file, playable or not.
///
/// A blank file is an empty cache.
pub fn read_records(path: &Path) -> Result<Vec<DialogueRecord>, AssetLoadError> {
    let content = fs::read_to_string(path).map_err(|source| AssetLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(|source| AssetLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every playable record from the cache file.
pub fn read_cache(path: &Path) -> Result<Vec<DialogueRecord>, AssetLoadError> {
    let playable: Vec<DialogueRecord> = read_records(path)?
        .into_iter()
        .filter(|r| r.is_playable())
        .collect();
    if playable.is_empty() {
        return Err(AssetLoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(playable)
}

/// Pick a record uniformly at random, or the fallback on any cache problem.
pub fn select_record<R: Rng + ?Sized>(path: &Path, rng: &mut R) -> DialogueRecord {
    match read_cache(path) {
        Ok(records) => records
            .choose(rng)
            .cloned()
            .unwrap_or_else(DialogueRecord::fallback),
        Err(err) => {
            tracing::warn!("Could not load dialogue cache: {}; using fallback", err);
            DialogueRecord::fallback()
        }
    }
}

/// Overwrite the cache with pretty-printed JSON, creating parent dirs.
pub fn write_cache(path: &Path, records: &[DialogueRecord]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records).map_err(io::Error::other)?;
    fs::write(path, json)
}
