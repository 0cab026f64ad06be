//! Best-score records
//!
//! One decimal integer per game under `"<game>-highscore"`. Reads fall back
//! to 0; writes are best effort and never interrupt play.

use crate::persistence::{KeyValueStore, SharedStore};
use crate::sim::GameId;

/// Parse a stored record; absent or malformed values count as 0
pub fn parse_score(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0)
}

/// Read the stored best score for `game`
pub fn load_best(store: &dyn KeyValueStore, game: GameId) -> u64 {
    match store.get(&game.highscore_key()) {
        Ok(raw) => {
            let best = parse_score(raw.as_deref());
            if best == 0 && raw.as_deref().is_some_and(|s| s.trim() != "0") {
                log::debug!("{}: ignoring malformed high score {:?}", game, raw);
            }
            best
        }
        Err(e) => {
            log::warn!("{}: could not read high score: {}", game, e);
            0
        }
    }
}

/// Write the best score for `game`, swallowing storage errors
pub fn save_best(store: &mut dyn KeyValueStore, game: GameId, value: u64) {
    match store.set(&game.highscore_key(), &value.to_string()) {
        Ok(()) => log::info!("{}: high score {} recorded", game, value),
        Err(e) => log::warn!("{}: could not save high score {}: {}", game, value, e),
    }
}

/// High score for one game, read once and only ever raised
pub struct HighScores {
    game: GameId,
    best: u64,
    store: SharedStore,
}

impl HighScores {
    pub fn load(game: GameId, store: SharedStore) -> Self {
        let best = load_best(&*store.borrow(), game);
        Self { game, best, store }
    }

    pub fn game(&self) -> GameId {
        self.game
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Check if a final score beats the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished game's score. Returns true (and writes the store)
    /// only when it beats the current best.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        save_best(&mut *self.store.borrow_mut(), self.game, score);
        true
    }
}
