use std::path::PathBuf;

use arcade_night::highscores::{HighScores, load_best, save_best};
use arcade_night::persistence::{FileStore, KeyValueStore, MemoryStore, shared};
use arcade_night::sim::GameId;

fn temp_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("arcade-night-it-{}", std::process::id()));
    dir.join(format!("{}.json", name))
}

#[test]
fn save_then_load_round_trip() {
    let mut store = MemoryStore::new();
    save_best(&mut store, GameId::Racer, 42);
    assert_eq!(load_best(&store, GameId::Racer), 42);
}

#[test]
fn untouched_ids_load_zero() {
    let store = MemoryStore::new();
    for game in GameId::ALL {
        assert_eq!(load_best(&store, game), 0);
    }
}

#[test]
fn malformed_records_load_zero() {
    let mut store = MemoryStore::new();
    store.set("snake-highscore", "lots").unwrap();
    store.set("flappybird-highscore", "").unwrap();
    assert_eq!(load_best(&store, GameId::Snake), 0);
    assert_eq!(load_best(&store, GameId::Pipes), 0);
}

#[test]
fn keys_are_per_game() {
    assert_eq!(GameId::Pipes.highscore_key(), "flappybird-highscore");
    assert_eq!(GameId::Snake.highscore_key(), "snake-highscore");
    assert_eq!(GameId::Racer.highscore_key(), "carracing-highscore");
}

#[test]
fn best_is_max_over_games() {
    let store = shared(MemoryStore::new());
    let mut expected = 0;
    for score in [30, 10, 50, 50, 20] {
        let mut scores = HighScores::load(GameId::Racer, store.clone());
        scores.record(score);
        expected = u64::max(expected, score);
        assert_eq!(scores.best(), expected);
        assert_eq!(load_best(&*store.borrow(), GameId::Racer), expected);
    }
}

#[test]
fn file_store_survives_reopen() {
    let path = temp_file("reopen");
    let _ = std::fs::remove_file(&path);

    {
        let store = shared(FileStore::open(&path));
        let mut scores = HighScores::load(GameId::Snake, store);
        assert!(scores.record(120));
    }

    let reopened = FileStore::open(&path);
    assert_eq!(load_best(&reopened, GameId::Snake), 120);
    assert_eq!(load_best(&reopened, GameId::Pipes), 0);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
