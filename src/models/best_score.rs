//! Durable storage for the single best-score integer.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use log::{debug, warn};

/// Where the best score survives between sessions.
///
/// Storage trouble is never allowed to interrupt play: loads fall back to
/// zero and failed saves are skipped.
pub trait BestScoreStore: fmt::Debug {
    fn load(&self) -> u32;

    fn save(&mut self, best: u32);
}

/// Best score kept as plain text in a file under the platform data
/// directory.
#[derive(Debug)]
pub struct FileScoreStore {
    path: Option<PathBuf>,
}

impl FileScoreStore {
    #[must_use]
    pub fn new() -> Self {
        let Some(dirs) = ProjectDirs::from("com", "gridsnake", "gridsnake") else {
            warn!("Could not resolve a data directory. Best score will not persist");
            return Self { path: None };
        };
        let dir = dirs.data_local_dir().to_path_buf();
        if let Err(e) = fs::create_dir_all(&dir) {
            warn!(
                "Could not create {}: {e}. Best score will not persist",
                dir.display()
            );
            return Self { path: None };
        }
        Self {
            path: Some(dir.join("best_score.txt")),
        }
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BestScoreStore for FileScoreStore {
    fn load(&self) -> u32 {
        let Some(path) = &self.path else { return 0 };
        match fs::read_to_string(path) {
            Ok(contents) => contents.trim().parse().unwrap_or(0),
            Err(e) => {
                debug!("No saved best score ({e}). Starting from 0");
                0
            }
        }
    }

    fn save(&mut self, best: u32) {
        let Some(path) = &self.path else { return };
        if let Err(e) = fs::write(path, best.to_string()) {
            warn!("Error saving best score: {e}");
        }
    }
}

/// In-memory store for tests and for running without a usable data
/// directory.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    best: u32,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new(best: u32) -> Self {
        Self { best }
    }
}

impl BestScoreStore for MemoryScoreStore {
    fn load(&self) -> u32 {
        self.best
    }

    fn save(&mut self, best: u32) {
        self.best = best;
    }
}
