//! Highscore persistence
//!
//! The simulation only exposes the final score; comparing it against the
//! stored best and writing the file happens here, outside the core. The
//! on-disk format is a single-key JSON object: `{"highscore": N}`.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct HighscoreFile {
    highscore: u64,
}

/// Read the stored highscore; a missing or corrupt file reads as 0
pub fn load_highscore(path: &Path) -> u64 {
    match fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str::<HighscoreFile>(&json) {
            Ok(file) => file.highscore,
            Err(err) => {
                log::warn!("highscore file unreadable ({err}), treating as 0");
                0
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => 0,
        Err(err) => {
            log::warn!("could not read highscore ({err}), treating as 0");
            0
        }
    }
}

/// Overwrite the stored highscore
pub fn save_highscore(path: &Path, score: u64) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json =
        serde_json::to_string_pretty(&HighscoreFile { highscore: score }).map_err(io::Error::other)?;
    fs::write(path, json)
}

/// Compare a final score against the stored best and persist it if it
/// wins. Returns true when a new highscore was set.
pub fn record_score(path: &Path, final_score: u64) -> io::Result<bool> {
    let best = load_highscore(path);
    if final_score > best {
        save_highscore(path, final_score)?;
        log::info!("new highscore: {final_score} (was {best})");
        return Ok(true);
    }
    Ok(false)
}
