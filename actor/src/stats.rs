//! Actor statistics tracking and persistence.
//!
//! Tracks episode counts, outcomes, and game lengths. A snapshot is written
//! to `actor_stats.json` in the data directory after each logged episode.

use games_gomoku::{Outcome, Player};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

/// Aggregated actor statistics, designed for lock-free updates.
#[derive(Debug)]
pub struct ActorStats {
    /// Number of episodes completed
    episodes_completed: AtomicU32,
    /// Total moves across all episodes
    total_moves: AtomicU64,
    /// Episodes won by player one
    player1_wins: AtomicU32,
    /// Episodes won by player two
    player2_wins: AtomicU32,
    /// Episodes that ended in a draw
    draws: AtomicU32,
    /// Self-play positions recorded
    samples: AtomicU64,
    /// Start time for rate calculations
    start_time: Instant,
    /// Path to write stats file
    stats_path: String,
    /// Run mode (selfplay / match)
    mode: String,
}

/// Serializable stats for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActorStatsSnapshot {
    pub mode: String,
    pub episodes_completed: u32,
    pub total_moves: u64,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub draws: u32,
    pub samples: u64,
    pub avg_episode_length: f64,
    pub episodes_per_second: f64,
    pub runtime_seconds: f64,
    pub timestamp: u64,
}

impl ActorStats {
    /// Create new stats tracker.
    pub fn new(data_dir: &str, mode: &str) -> Self {
        let stats_path = format!("{}/actor_stats.json", data_dir);

        // Ensure data directory exists
        if let Err(e) = fs::create_dir_all(data_dir) {
            warn!("Failed to create data directory: {}", e);
        }

        Self {
            episodes_completed: AtomicU32::new(0),
            total_moves: AtomicU64::new(0),
            player1_wins: AtomicU32::new(0),
            player2_wins: AtomicU32::new(0),
            draws: AtomicU32::new(0),
            samples: AtomicU64::new(0),
            start_time: Instant::now(),
            stats_path,
            mode: mode.to_string(),
        }
    }

    /// Record a completed episode.
    pub fn record_episode(&self, moves: u32, outcome: Outcome) {
        self.episodes_completed.fetch_add(1, Ordering::Relaxed);
        self.total_moves.fetch_add(moves as u64, Ordering::Relaxed);

        match outcome {
            Outcome::Win(Player::One) => self.player1_wins.fetch_add(1, Ordering::Relaxed),
            Outcome::Win(Player::Two) => self.player2_wins.fetch_add(1, Ordering::Relaxed),
            Outcome::Draw => self.draws.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Record self-play positions written for training.
    pub fn record_samples(&self, count: usize) {
        self.samples.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Get a snapshot of current stats.
    pub fn snapshot(&self) -> ActorStatsSnapshot {
        let episodes = self.episodes_completed.load(Ordering::Relaxed);
        let total_moves = self.total_moves.load(Ordering::Relaxed);
        let runtime = self.start_time.elapsed().as_secs_f64();

        let avg_episode_length = if episodes > 0 {
            total_moves as f64 / episodes as f64
        } else {
            0.0
        };

        let episodes_per_second = if runtime > 0.0 {
            episodes as f64 / runtime
        } else {
            0.0
        };

        ActorStatsSnapshot {
            mode: self.mode.clone(),
            episodes_completed: episodes,
            total_moves,
            player1_wins: self.player1_wins.load(Ordering::Relaxed),
            player2_wins: self.player2_wins.load(Ordering::Relaxed),
            draws: self.draws.load(Ordering::Relaxed),
            samples: self.samples.load(Ordering::Relaxed),
            avg_episode_length,
            episodes_per_second,
            runtime_seconds: runtime,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Write stats to JSON file (atomic write-then-rename).
    pub fn write_stats(&self) {
        let snapshot = self.snapshot();

        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(j) => j,
            Err(e) => {
                warn!("Failed to serialize actor stats: {}", e);
                return;
            }
        };

        // Write to temp file then rename (atomic on most filesystems)
        let temp_path = format!("{}.tmp", self.stats_path);
        match fs::File::create(&temp_path) {
            Ok(mut file) => {
                if let Err(e) = file.write_all(json.as_bytes()) {
                    warn!("Failed to write actor stats: {}", e);
                    return;
                }
            }
            Err(e) => {
                warn!("Failed to create temp stats file: {}", e);
                return;
            }
        }

        if let Err(e) = fs::rename(&temp_path, &self.stats_path) {
            warn!("Failed to rename stats file: {}", e);
            let _ = fs::remove_file(&temp_path);
            return;
        }

        debug!("Wrote actor stats to {}", self.stats_path);
    }

    pub fn stats_path(&self) -> &str {
        &self.stats_path
    }
}
