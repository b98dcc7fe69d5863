use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use gridspell::dict::DictionaryIndex;
use gridspell::grid::Grid;
use gridspell::runtime::{GameEvent, LoopEvent, Runner, TestEventSource};
use gridspell::session::{Difficulty, GameMode, SessionEngine, WordEvent};
use gridspell::stats::MemoryStatsStore;
use gridspell::timer::{SessionTimer, TimerTick};

fn key(c: char) -> GameEvent {
    GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless integration using the internal runtime + SessionEngine without a
// TTY. Keys 'a'..'d' stand in for cursor selection of the top-row cells.
#[test]
fn headless_word_flow_completes() {
    let dictionary = DictionaryIndex::from_entries([("taco", 7)]);
    let mut engine = SessionEngine::new(dictionary, MemoryStatsStore::new());
    engine.new_game_with_grid(
        GameMode::Classic,
        Difficulty::Medium,
        Grid::from_rows(&["TACO", "XXXX", "XXXX", "XXXX"]).unwrap(),
    );

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));

    for c in ['a', 'b', 'c', 'd'] {
        tx.send(key(c)).unwrap();
    }

    let mut found = None;
    for _ in 0..100u32 {
        match runner.drive(None) {
            LoopEvent::Countdown(_) | LoopEvent::Resize => {}
            LoopEvent::Key(k) => {
                let col = match k.code {
                    KeyCode::Char('a') => 0,
                    KeyCode::Char('b') => 1,
                    KeyCode::Char('c') => 2,
                    KeyCode::Char('d') => 3,
                    _ => continue,
                };
                if let Some(out) = engine.select_cell(0, col) {
                    if let Some(WordEvent::Found { word, points }) = out.event {
                        found = Some((word, points));
                        break;
                    }
                }
            }
        }
    }

    assert_eq!(found, Some(("taco".to_string(), 7)));
    assert_eq!(engine.score(), 7);

    let summary = engine.end_session().unwrap();
    assert_eq!(summary.score, 7);
    assert_eq!(summary.words_found, 1);
    assert_eq!(engine.stats().unwrap().games_played, 1);
}

#[test]
fn headless_timed_session_expires_once() {
    let mut engine = SessionEngine::new(
        DictionaryIndex::from_entries([("cat", 5)]),
        MemoryStatsStore::new(),
    );
    engine.new_game_with_grid(
        GameMode::Classic,
        Difficulty::Medium,
        Grid::from_rows(&["CATS", "XXXX", "XXXX", "XXXX"]).unwrap(),
    );

    let mut timer = SessionTimer::new();
    timer.start(3);

    // No key events: every drive times out into a countdown tick.
    let (_tx, rx) = mpsc::channel::<GameEvent>();
    let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));

    let mut expirations = 0;
    for _ in 0..10u32 {
        if let LoopEvent::Countdown(TimerTick::Expired) = runner.drive(Some(&mut timer)) {
            expirations += 1;
            engine.end_session();
        }
    }

    assert_eq!(expirations, 1, "countdown should expire exactly once");
    assert!(engine.is_ended());
    assert_eq!(engine.stats().unwrap().games_played, 1);
}
