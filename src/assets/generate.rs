//! Dialogue cache generation using the wrapped program in print mode.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio::process::Command;

use crate::assets::dialogue::{read_records, write_cache, DialogueRecord, Round};
use crate::error::AssetLoadError;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Failed to run '{}': {source}", binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Generator exited with code {0:?}")]
    Failed(Option<i32>),

    #[error("Generator produced an empty line")]
    Empty,
}

/// Prompt for the opener's line in round `index` of `total`.
pub fn opener_prompt(index: usize, total: usize) -> String {
    if index + 1 == total {
        return "You are Gilfoyle from Silicon Valley. Generate a single BRUTAL finishing blow \
                line that destroys Claude Code. Be savage, final, and devastating. \
                1-2 sentences max. Output only the line."
            .to_string();
    }
    let tone = if index == 0 { "opening" } else { "escalating" };
    format!(
        "You are Gilfoyle from Silicon Valley. Generate a single line of {} sardonic trash \
         talk directed at Claude Code during a fight. Be deadpan, superior, and dismissive. \
         1-2 sentences max. Output only the line.",
        tone
    )
}

/// Prompt for the responder's line in round `index` of `total`.
pub fn responder_prompt(index: usize, total: usize) -> String {
    if index + 1 == total {
        return "You are Claude Code being destroyed. Generate a final dying message. Be \
                pathetic, fading, defeated. 1 sentence. Output '[TERMINATED]' or similar \
                death message."
            .to_string();
    }
    let (who, tone) = if index == 0 {
        ("", "confident")
    } else {
        (" weakening under attack", "defensive and weakening")
    };
    format!(
        "You are Claude Code, an AI assistant{}. Generate a {} response to an insult. \
         1-2 sentences max. Output only the response.",
        who, tone
    )
}

/// Ask the wrapped binary for one line via `-p <prompt>`.
pub async fn generate_line(binary: &Path, prompt: String) -> Result<String, GenerateError> {
    let output = Command::new(binary)
        .arg("-p")
        .arg(prompt)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| GenerateError::Spawn {
            binary: binary.to_path_buf(),
            source,
        })?;
    if !output.status.success() {
        return Err(GenerateError::Failed(output.status.code()));
    }
    let line = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if line.is_empty() {
        return Err(GenerateError::Empty);
    }
    Ok(line)
}

/// Build one record with `rounds` rounds, pausing `round_delay` between rounds.
pub async fn generate_record<F, Fut>(
    id: u64,
    rounds: usize,
    round_delay: Duration,
    mut line: F,
) -> Result<DialogueRecord, GenerateError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<String, GenerateError>>,
{
    let mut record = DialogueRecord {
        id,
        rounds: Vec::with_capacity(rounds),
    };
    for index in 0..rounds {
        tracing::info!(id, round = index + 1, total = rounds, "Generating round");
        let opener_line = line(opener_prompt(index, rounds)).await?;
        let responder_line = line(responder_prompt(index, rounds)).await?;
        record.rounds.push(Round {
            opener_line,
            responder_line,
        });
        if index + 1 < rounds {
            tokio::time::sleep(round_delay).await;
        }
    }
    Ok(record)
}

/// Append `count` freshly generated records to the cache at `path`.
///
/// Existing records are kept as they are, including ones without rounds;
/// new ids continue after the highest id present. Only a missing file
/// starts a fresh cache: an unreadable one is left untouched and reported.
/// Records that fail to generate are skipped. Returns the number of
/// records written in total.
pub async fn extend_cache<R: Rng>(
    path: &Path,
    binary: &Path,
    count: usize,
    rng: &mut R,
) -> io::Result<usize> {
    let mut cache = match read_records(path) {
        Ok(records) => records,
        Err(AssetLoadError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "Starting a fresh cache");
            Vec::new()
        }
        Err(err) => return Err(io::Error::other(err)),
    };
    let start_id = cache.iter().map(|record| record.id).max().map_or(1, |id| id + 1);

    for offset in 0..count as u64 {
        let id = start_id + offset;
        let rounds = rng.gen_range(3..=4);
        let result = generate_record(id, rounds, Duration::from_secs(1), |prompt| {
            generate_line(binary, prompt)
        })
        .await;
        match result {
            Ok(record) => {
                tracing::info!(id, "Dialogue generated");
                cache.push(record);
            }
            Err(err) => tracing::warn!(id, "Failed to generate dialogue: {}", err),
        }
    }

    write_cache(path, &cache)?;
    Ok(cache.len())
}
