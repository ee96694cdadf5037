//! Best-score persistence
//!
//! Only a single best score is kept. Backends swallow their own I/O errors:
//! a broken store must never stop a game, so failures are logged and treated
//! as "no score yet".

use serde::{Deserialize, Serialize};

/// Where the best score lives between runs
pub trait HighScoreStore {
    /// Stored best score, 0 if none
    fn load_high_score(&self) -> u64;
    /// Replace the stored best score
    fn save_high_score(&mut self, score: u64);
}

/// On-disk / LocalStorage record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub best: u64,
}

/// In-memory store for tests and hosts without storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: u64,
    /// Number of saves performed
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(best: u64) -> Self {
        Self { best, saves: 0 }
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&self) -> u64 {
        self.best
    }

    fn save_high_score(&mut self, score: u64) {
        self.best = score;
        self.saves += 1;
    }
}

/// JSON file store (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for FileStore {
    fn load_high_score(&self) -> u64 {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No best score at {}, starting fresh", self.path.display());
                return 0;
            }
        };
        match serde_json::from_str::<BestScore>(&json) {
            Ok(record) => {
                log::info!("Loaded best score {}", record.best);
                record.best
            }
            Err(e) => {
                log::warn!("Ignoring unreadable best score file: {}", e);
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u64) {
        let record = BestScore { best: score };
        match serde_json::to_string(&record) {
            Ok(json) => match std::fs::write(&self.path, json) {
                Ok(()) => log::info!("Best score {} saved", score),
                Err(e) => log::warn!("Failed to save best score: {}", e),
            },
            Err(e) => log::warn!("Failed to encode best score: {}", e),
        }
    }
}

/// Browser LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load_high_score(&self) -> u64 {
        if let Some(storage) = Self::storage() {
            if let Ok(Some(json)) = storage.get_item(crate::consts::HIGH_SCORE_KEY) {
                if let Ok(record) = serde_json::from_str::<BestScore>(&json) {
                    log::info!("Loaded best score {}", record.best);
                    return record.best;
                }
            }
        }
        log::info!("No best score found, starting fresh");
        0
    }

    fn save_high_score(&mut self, score: u64) {
        if let Some(storage) = Self::storage() {
            if let Ok(json) = serde_json::to_string(&BestScore { best: score }) {
                let _ = storage.set_item(crate::consts::HIGH_SCORE_KEY, &json);
                log::info!("Best score {} saved", score);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::with_score(7);
        assert_eq!(store.load_high_score(), 7);
        store.save_high_score(12);
        assert_eq!(store.load_high_score(), 12);
        assert_eq!(store.saves, 1);
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "snake_rush_high_{}_{}.json",
            std::process::id(),
            line!()
        ));
        let mut store = FileStore::new(&path);
        assert_eq!(store.load_high_score(), 0);
        store.save_high_score(33);
        assert_eq!(FileStore::new(&path).load_high_score(), 33);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_ignores_garbage() {
        let path = std::env::temp_dir().join(format!(
            "snake_rush_high_{}_{}.json",
            std::process::id(),
            line!()
        ));
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(FileStore::new(&path).load_high_score(), 0);
        let _ = std::fs::remove_file(&path);
    }
}
