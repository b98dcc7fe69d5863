pub mod app_dirs;
pub mod config;
pub mod dict;
pub mod grid;
pub mod path;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod timer;
pub mod ui;

use crate::{
    config::{Config, ConfigStore, FileConfigStore},
    dict::DictionaryIndex,
    grid::Coord,
    runtime::{CrosstermEventSource, LoopEvent, Runner},
    session::{Difficulty, GameMode, SessionEngine, WordEvent},
    stats::{MemoryStatsStore, SqliteStatsStore, StatsStore},
    timer::{SessionTimer, TimerTick},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

/// One tick per second drives the session countdown.
const TICK_RATE_MS: u64 = 1000;

/// terminal letter-grid word game
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal letter-grid word game: trace contiguous letters to spell words against the clock, with persistent high scores and lifetime statistics."
)]
pub struct Cli {
    /// game mode (classic 2min, extended 5min, endless untimed)
    #[clap(short = 'm', long, value_enum)]
    mode: Option<GameMode>,

    /// board difficulty (easy and medium play 4x4, hard 5x5)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// print the high score table and exit
    #[clap(long)]
    high_scores: bool,

    /// print lifetime statistics and exit
    #[clap(long)]
    stats: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Board,
    Results,
    HighScores,
}

pub struct App {
    pub engine: SessionEngine<Box<dyn StatsStore>>,
    pub timer: Option<SessionTimer>,
    pub cursor: Coord,
    pub screen: Screen,
    pub notice: Option<String>,
    pub game_mode: GameMode,
    pub difficulty: Difficulty,
    config_store: FileConfigStore,
}

impl App {
    pub fn new(cli: &Cli) -> Self {
        let config_store = FileConfigStore::new();
        let config = config_store.load();

        // sqlite being unavailable degrades to an in-memory session, never a crash
        let store: Box<dyn StatsStore> = match SqliteStatsStore::new() {
            Ok(store) => Box::new(store),
            Err(_) => Box::new(MemoryStatsStore::new()),
        };

        Self {
            engine: SessionEngine::new(DictionaryIndex::embedded(), store),
            timer: None,
            cursor: Coord::new(0, 0),
            screen: Screen::Board,
            notice: None,
            game_mode: cli.mode.unwrap_or(config.game_mode),
            difficulty: cli.difficulty.unwrap_or(config.difficulty),
            config_store,
        }
    }

    pub fn start_new_game(&mut self) {
        // cancel the old countdown before the new session goes live, so no
        // stale expiry can land on the fresh game
        self.timer = None;

        match self.engine.new_game(self.game_mode, self.difficulty) {
            Ok(_) => {
                self.cursor = Coord::new(0, 0);
                if let Some(secs) = self.game_mode.seconds() {
                    let mut timer = SessionTimer::new();
                    timer.start(secs);
                    self.timer = Some(timer);
                }
                self.screen = Screen::Board;
                self.notice = Some("new game started, good luck!".to_string());
            }
            Err(e) => {
                self.notice = Some(format!("could not start game ({}), press n to retry", e));
            }
        }
    }

    pub fn select_at_cursor(&mut self) {
        let Coord { row, col } = self.cursor;
        if let Some(outcome) = self.engine.select_cell(row, col) {
            self.notice = match outcome.event {
                Some(WordEvent::Found { word, points }) => {
                    Some(format!("\"{}\" found for {} points!", word, points))
                }
                Some(WordEvent::Duplicate { word }) => {
                    Some(format!("\"{}\" already found", word))
                }
                None => None,
            };
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.engine.is_active() {
            self.engine.pause();
            if let Some(timer) = &mut self.timer {
                timer.pause();
            }
            self.notice = Some("game paused".to_string());
        } else if self.engine.is_paused() {
            self.engine.resume();
            if let Some(timer) = &mut self.timer {
                timer.resume();
            }
            self.notice = Some("game resumed".to_string());
        }
    }

    pub fn finish_game(&mut self) {
        if let Some(summary) = self.engine.end_session() {
            if let Some(timer) = &mut self.timer {
                timer.stop();
            }
            self.screen = Screen::Results;
            self.notice = summary
                .persist_warning
                .map(|w| format!("results not saved: {}", w));
        }
    }

    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let size = match self.engine.grid() {
            Some(grid) => grid.size(),
            None => return,
        };
        let row = self.cursor.row.saturating_add_signed(d_row).min(size - 1);
        let col = self.cursor.col.saturating_add_signed(d_col).min(size - 1);
        self.cursor = Coord::new(row, col);
    }

    pub fn cycle_mode(&mut self) {
        self.game_mode = match self.game_mode {
            GameMode::Classic => GameMode::Extended,
            GameMode::Extended => GameMode::Endless,
            GameMode::Endless => GameMode::Classic,
        };
        self.notice = Some(format!("next game mode: {}", self.game_mode).to_lowercase());
        self.save_config();
    }

    pub fn cycle_difficulty(&mut self) {
        self.difficulty = match self.difficulty {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        };
        self.notice = Some(format!("next game difficulty: {}", self.difficulty).to_lowercase());
        self.save_config();
    }

    fn save_config(&self) {
        let _ = self.config_store.save(&Config {
            game_mode: self.game_mode,
            difficulty: self.difficulty,
        });
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.high_scores || cli.stats {
        return print_records(&cli);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli);
    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Plain-stdout reporting for --high-scores / --stats, usable without a tty.
fn print_records(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let store: Box<dyn StatsStore> = match SqliteStatsStore::new() {
        Ok(store) => Box::new(store),
        Err(_) => Box::new(MemoryStatsStore::new()),
    };

    if cli.high_scores {
        let entries = store.load_high_scores()?;
        if entries.is_empty() {
            println!("no high scores recorded yet");
        }
        for (i, e) in entries.iter().enumerate() {
            println!(
                "{:>2}. {:>5} pts  {:>3} words  {:<8} {}",
                i + 1,
                e.score,
                e.words_found,
                e.mode.to_string().to_lowercase(),
                e.recorded_at.format("%Y-%m-%d %H:%M"),
            );
        }
    }

    if cli.stats {
        let stats = store.load_stats()?;
        println!("games played      {}", stats.games_played);
        println!("total score       {}", stats.total_score);
        println!("total words found {}", stats.total_words_found);
        println!("best score        {}", stats.best_score);
        println!("average score     {}", stats.average_score);
    }

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.drive(app.timer.as_mut()) {
            LoopEvent::Countdown(TimerTick::Expired) => {
                app.finish_game();
                app.notice.get_or_insert_with(|| "time's up!".to_string());
                terminal.draw(|f| ui(app, f))?;
            }
            LoopEvent::Countdown(TimerTick::Running(_)) => {
                terminal.draw(|f| ui(app, f))?;
            }
            LoopEvent::Countdown(TimerTick::Skipped) => {}
            LoopEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            LoopEvent::Key(key) => {
                if handle_key(app, key) {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

/// Dispatch one key press. Returns true when the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match app.screen {
        Screen::Board => match key.code {
            KeyCode::Esc => {
                if app.engine.is_active() || app.engine.is_paused() {
                    // explicit stop ends the session; a second esc quits
                    app.finish_game();
                    return false;
                }
                return true;
            }
            KeyCode::Up => app.move_cursor(-1, 0),
            KeyCode::Down => app.move_cursor(1, 0),
            KeyCode::Left => app.move_cursor(0, -1),
            KeyCode::Right => app.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => app.select_at_cursor(),
            KeyCode::Char('c') => app.engine.clear_selection(),
            KeyCode::Char('p') => app.toggle_pause(),
            KeyCode::Char('n') => app.start_new_game(),
            KeyCode::Char('e') => app.finish_game(),
            KeyCode::Char('s') => app.screen = Screen::HighScores,
            KeyCode::Char('m') => {
                if !app.engine.is_active() && !app.engine.is_paused() {
                    app.cycle_mode();
                }
            }
            KeyCode::Char('d') => {
                if !app.engine.is_active() && !app.engine.is_paused() {
                    app.cycle_difficulty();
                }
            }
            _ => {}
        },
        Screen::Results => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Char('n') => app.start_new_game(),
            KeyCode::Char('s') => app.screen = Screen::HighScores,
            KeyCode::Char('m') => app.cycle_mode(),
            KeyCode::Char('d') => app.cycle_difficulty(),
            _ => {}
        },
        Screen::HighScores => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Char('b') | KeyCode::Backspace => {
                app.screen = if app.engine.is_ended() {
                    Screen::Results
                } else {
                    Screen::Board
                };
            }
            KeyCode::Char('n') => app.start_new_game(),
            _ => {}
        },
    }

    false
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}
