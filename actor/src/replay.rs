//! JSON-lines replay file for self-play training data
//!
//! Each completed self-play game is appended as one JSON object per line, so
//! an external trainer can stream positions without a database.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::game::SelfPlayRecord;

/// One line of the replay file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayEntry {
    pub episode: u32,
    pub width: usize,
    pub height: usize,
    pub win_length: usize,
    #[serde(flatten)]
    pub record: SelfPlayRecord,
}

/// Append-only writer for `selfplay.jsonl`.
pub struct ReplayWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    games_written: u32,
}

impl ReplayWriter {
    /// Open (or create) the replay file in `data_dir`.
    pub fn open(data_dir: &str) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir))?;
        let path = Path::new(data_dir).join("selfplay.jsonl");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open replay file {}", path.display()))?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            games_written: 0,
        })
    }

    pub fn append(&mut self, entry: &ReplayEntry) -> Result<()> {
        serde_json::to_writer(&mut self.writer, entry)?;
        self.writer.write_all(b"\n")?;
        self.games_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn games_written(&self) -> u32 {
        self.games_written
    }
}

/// Read every entry from a replay file.
pub fn read_replay(path: &Path) -> Result<Vec<ReplayEntry>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open replay file {}", path.display()))?;
    BufReader::new(file)
        .lines()
        .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
        .map(|line| Ok(serde_json::from_str(&line?)?))
        .collect()
}
