//! Game-over scores and the local leaderboard
//!
//! The engine hands each finished session to a `ScoreSink`. `HighScores` is
//! the built-in sink: a top-10 list persisted to LocalStorage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Why a sink refused a score
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("score {0} does not qualify for the leaderboard")]
    NotQualified(u32),
    #[error("score storage unavailable: {0}")]
    Storage(String),
    #[error("score could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The game-over payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Collectibles grabbed
    pub score: u32,
    /// Distance reached
    pub distance: f32,
    /// Unix timestamp (ms) when the session ended
    pub timestamp: f64,
}

/// External collaborator that receives finished sessions
pub trait ScoreSink {
    /// Record a finished session; returns the leaderboard rank when there is one
    fn submit(&mut self, record: &ScoreRecord) -> Result<Option<usize>, ScoreError>;
}

/// Local top-N leaderboard, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<ScoreRecord>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "canopy_run_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Ordering: more collectibles first, then longer distance
    fn beats(record: &ScoreRecord, entry: &ScoreRecord) -> bool {
        record.score > entry.score
            || (record.score == entry.score && record.distance > entry.distance)
    }

    /// Check if a record qualifies for the leaderboard
    pub fn qualifies(&self, record: &ScoreRecord) -> bool {
        if record.score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries
            .last()
            .map(|e| Self::beats(record, e))
            .unwrap_or(true)
    }

    /// Insert a record if it qualifies; returns its 1-indexed rank
    pub fn add(&mut self, record: ScoreRecord) -> Option<usize> {
        if !self.qualifies(&record) {
            return None;
        }

        let pos = self.entries.iter().position(|e| Self::beats(&record, e));
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, record);
                i + 1
            }
            None => {
                self.entries.push(record);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), ScoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| ScoreError::Storage("LocalStorage not available".into()))?;

        let json = serde_json::to_string(self)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| ScoreError::Storage(format!("{:?}", e)))?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), ScoreError> {
        Ok(())
    }
}

impl ScoreSink for HighScores {
    fn submit(&mut self, record: &ScoreRecord) -> Result<Option<usize>, ScoreError> {
        let rank = self
            .add(record.clone())
            .ok_or(ScoreError::NotQualified(record.score))?;
        self.save()?;
        Ok(Some(rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: u32, distance: f32) -> ScoreRecord {
        ScoreRecord {
            score,
            distance,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_ranks_by_score_then_distance() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(record(3, 100.0)), Some(1));
        assert_eq!(scores.add(record(5, 50.0)), Some(1));
        assert_eq!(scores.add(record(3, 150.0)), Some(2));
        let order: Vec<_> = scores.entries.iter().map(|e| (e.score, e.distance)).collect();
        assert_eq!(order, vec![(5, 50.0), (3, 150.0), (3, 100.0)]);
    }

    #[test]
    fn test_zero_score_rejected() {
        let mut scores = HighScores::new();
        assert!(matches!(
            scores.submit(&record(0, 400.0)),
            Err(ScoreError::NotQualified(0))
        ));
        assert!(scores.is_empty());
    }

    #[test]
    fn test_keeps_top_ten() {
        let mut scores = HighScores::new();
        for s in 1..=12 {
            scores.submit(&record(s, 0.0)).unwrap();
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().unwrap().score, 3);
        assert!(!scores.qualifies(&record(2, 0.0)));
    }
}
