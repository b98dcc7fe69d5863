use crate::dict::{normalize, DictionaryIndex, MIN_WORD_LEN};
use crate::grid::{Coord, Grid, GridError};
use crate::path::is_contiguous;
use crate::stats::{HighScoreEntry, StatsError, StatsRecord, StatsStore};
use chrono::{DateTime, Local};
use clap::ValueEnum;
use directories::ProjectDirs;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::str::FromStr;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Classic,
    Extended,
    Endless,
}

impl GameMode {
    /// Countdown seed for the mode; endless has no timer at all.
    pub fn seconds(&self) -> Option<u32> {
        match self {
            GameMode::Classic => Some(120),
            GameMode::Extended => Some(300),
            GameMode::Endless => None,
        }
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(GameMode::Classic),
            "extended" => Ok(GameMode::Extended),
            "endless" => Ok(GameMode::Endless),
            other => Err(format!("unknown game mode '{}'", other)),
        }
    }
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn grid_size(&self) -> usize {
        match self {
            Difficulty::Easy | Difficulty::Medium => 4,
            Difficulty::Hard => 5,
        }
    }
}

/// A committed, scored word. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundWord {
    pub word: String,
    pub points: u32,
    pub found_at: DateTime<Local>,
}

/// Live game data, only present while a session is Active or Paused.
#[derive(Debug)]
pub struct Game {
    grid: Grid,
    selection: Vec<Coord>,
    found_words: Vec<FoundWord>,
    score: u32,
    mode: GameMode,
    difficulty: Difficulty,
}

/// Snapshot of the in-progress selection handed back to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub path: Vec<Coord>,
    pub current_word: String,
}

/// Raised by a commit check; distinct from errors, both are routine play.
#[derive(Debug, Clone, PartialEq)]
pub enum WordEvent {
    Found { word: String, points: u32 },
    Duplicate { word: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOutcome {
    pub selection: Selection,
    pub event: Option<WordEvent>,
}

/// Final result of a session. `persist_warning` carries a stats-store failure
/// as a non-fatal notice; the in-memory score stands regardless.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSummary {
    pub score: u32,
    pub words_found: u32,
    pub mode: GameMode,
    pub persist_warning: Option<String>,
}

/// Session lifecycle as a tagged state, so each phase only carries the fields
/// that mean anything in it.
#[derive(Debug)]
pub enum SessionState {
    Idle,
    Active(Game),
    Paused(Game),
    Ended(GameSummary),
}

/// Owns the active game's state and the rules for mutating it. Every
/// operation requested in a state that forbids it is a silent no-op; the UI
/// is expected to disable controls accordingly.
pub struct SessionEngine<S: StatsStore> {
    state: SessionState,
    dictionary: DictionaryIndex,
    store: S,
}

impl<S: StatsStore> SessionEngine<S> {
    pub fn new(dictionary: DictionaryIndex, store: S) -> Self {
        Self {
            state: SessionState::Idle,
            dictionary,
            store,
        }
    }

    /// Start a fresh session on a newly generated board. On generation
    /// failure the engine stays Idle so the caller can retry.
    pub fn new_game(&mut self, mode: GameMode, difficulty: Difficulty) -> Result<&Grid, GridError> {
        let grid = match Grid::generate(difficulty.grid_size(), &mut rand::thread_rng()) {
            Ok(grid) => grid,
            Err(e) => {
                self.state = SessionState::Idle;
                return Err(e);
            }
        };
        Ok(self.new_game_with_grid(mode, difficulty, grid))
    }

    /// Start a fresh session on a pre-built board. Deterministic entry point
    /// for tests and replays.
    pub fn new_game_with_grid(
        &mut self,
        mode: GameMode,
        difficulty: Difficulty,
        grid: Grid,
    ) -> &Grid {
        self.state = SessionState::Active(Game {
            grid,
            selection: Vec::new(),
            found_words: Vec::new(),
            score: 0,
            mode,
            difficulty,
        });

        match &self.state {
            SessionState::Active(game) => &game.grid,
            _ => unreachable!("state was just set to Active"),
        }
    }

    /// Toggle a cell into the selection. Clicking a cell already in the path
    /// backtracks to just before it; anything else is appended. The derived
    /// word is recomputed every call, and a commit check runs once it reaches
    /// the minimum scoring length.
    ///
    /// Adjacency is deliberately NOT enforced here: a non-adjacent selection
    /// is inert (it never passes the commit check) rather than rejected.
    pub fn select_cell(&mut self, row: usize, col: usize) -> Option<SelectOutcome> {
        let game = match &mut self.state {
            SessionState::Active(game) => game,
            _ => return None,
        };

        let coord = Coord::new(row, col);
        if game.grid.contains(coord) {
            if let Some(idx) = game.selection.iter().position(|&c| c == coord) {
                // backtrack: drop this cell and everything after it
                game.selection.truncate(idx);
            } else {
                game.selection.push(coord);
            }
        }

        let current_word = derive_word(game);
        let event = if current_word.chars().count() >= MIN_WORD_LEN {
            Self::commit_check(&self.dictionary, game, &current_word)
        } else {
            None
        };

        let current_word = derive_word(game);
        Some(SelectOutcome {
            selection: Selection {
                path: game.selection.clone(),
                current_word,
            },
            event,
        })
    }

    /// Commit-time validation: path contiguity, then dictionary membership,
    /// then duplicate rejection. Failures leave the selection editable; only
    /// a dictionary member clears it.
    fn commit_check(
        dictionary: &DictionaryIndex,
        game: &mut Game,
        candidate: &str,
    ) -> Option<WordEvent> {
        if !is_contiguous(&game.selection) {
            return None;
        }
        if !dictionary.contains(candidate) {
            return None;
        }

        let word = normalize(candidate);
        if game.found_words.iter().any(|fw| fw.word == word) {
            game.selection.clear();
            return Some(WordEvent::Duplicate { word });
        }

        let points = dictionary.score_of(&word);
        game.found_words.push(FoundWord {
            word: word.clone(),
            points,
            found_at: Local::now(),
        });
        game.score += points;
        game.selection.clear();

        Some(WordEvent::Found { word, points })
    }

    /// Drop the in-progress selection without scoring anything.
    pub fn clear_selection(&mut self) {
        if let SessionState::Active(game) = &mut self.state {
            game.selection.clear();
        }
    }

    pub fn pause(&mut self) {
        if matches!(self.state, SessionState::Active(_)) {
            if let SessionState::Active(game) =
                std::mem::replace(&mut self.state, SessionState::Idle)
            {
                self.state = SessionState::Paused(game);
            }
        }
    }

    pub fn resume(&mut self) {
        if matches!(self.state, SessionState::Paused(_)) {
            if let SessionState::Paused(game) =
                std::mem::replace(&mut self.state, SessionState::Idle)
            {
                self.state = SessionState::Active(game);
            }
        }
    }

    /// Finalize the session and write the result through the stats store.
    /// Valid from Active or Paused; idempotent once Ended.
    pub fn end_session(&mut self) -> Option<GameSummary> {
        let game = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Active(game) | SessionState::Paused(game) => game,
            other => {
                self.state = other;
                return None;
            }
        };

        let mut summary = GameSummary {
            score: game.score,
            words_found: game.found_words.len() as u32,
            mode: game.mode,
            persist_warning: None,
        };

        let persisted = self
            .store
            .record_high_score(HighScoreEntry {
                score: summary.score,
                words_found: summary.words_found,
                mode: summary.mode,
                recorded_at: Local::now(),
            })
            .and_then(|_| self.store.record_game_result(summary.score, summary.words_found));
        if let Err(e) = persisted {
            summary.persist_warning = Some(e.to_string());
        }

        let _ = log_result(&summary, game.difficulty);

        self.state = SessionState::Ended(summary.clone());
        Some(summary)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, SessionState::Paused(_))
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.state, SessionState::Ended(_))
    }

    fn game(&self) -> Option<&Game> {
        match &self.state {
            SessionState::Active(game) | SessionState::Paused(game) => Some(game),
            _ => None,
        }
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.game().map(|g| &g.grid)
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.game().map(|g| g.mode)
    }

    pub fn score(&self) -> u32 {
        self.game().map(|g| g.score).unwrap_or(0)
    }

    pub fn found_words(&self) -> &[FoundWord] {
        self.game().map(|g| g.found_words.as_slice()).unwrap_or(&[])
    }

    pub fn selection(&self) -> Option<Selection> {
        self.game().map(|game| Selection {
            path: game.selection.clone(),
            current_word: derive_word(game),
        })
    }

    pub fn high_scores(&self) -> Result<Vec<HighScoreEntry>, StatsError> {
        self.store.load_high_scores()
    }

    pub fn stats(&self) -> Result<StatsRecord, StatsError> {
        self.store.load_stats()
    }
}

fn derive_word(game: &Game) -> String {
    game.selection
        .iter()
        .filter_map(|&coord| game.grid.letter(coord))
        .join("")
}

/// Append one line per finished game to results.csv under the config dir.
fn log_result(summary: &GameSummary, difficulty: Difficulty) -> io::Result<()> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "gridspell") {
        let config_dir = proj_dirs.config_dir();
        let log_path = config_dir.join("results.csv");

        std::fs::create_dir_all(config_dir)?;

        let needs_header = !log_path.exists();

        let mut log_file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(log_path)?;

        if needs_header {
            writeln!(log_file, "date,mode,difficulty,score,words")?;
        }

        writeln!(
            log_file,
            "{},{},{},{},{}",
            Local::now().format("%c"),
            summary.mode.to_string().to_lowercase(),
            difficulty.to_string().to_lowercase(),
            summary.score,
            summary.words_found,
        )?;
    }

    Ok(())
}
