use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

use crate::timer::{SessionTimer, TimerTick};

/// Raw event off the wire: a key press, a resize, or the periodic tick.
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Game-loop event with the tick already folded through the countdown, so
/// the caller only ever sees what the clock did with it.
#[derive(Clone, Debug, PartialEq)]
pub enum LoopEvent {
    Key(KeyEvent),
    Resize,
    /// Countdown outcome for this tick; `Skipped` when the game is untimed.
    Countdown(TimerTick),
}

/// Source of terminal events. The production impl reads crossterm from a
/// thread; tests feed a plain channel.
pub trait GameEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Forwards crossterm key and resize events from a reader thread.
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => Some(GameEvent::Key(key)),
                Ok(CtEvent::Resize(_, _)) => Some(GameEvent::Resize),
                Ok(_) => None,
                Err(_) => break,
            };
            if let Some(ev) = forwarded {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl GameEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed source for headless tests.
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the game one event at a time. Waits at most one tick interval
/// per step, so a quiet terminal still produces the countdown beat; events
/// are applied strictly one at a time and never interleave.
pub struct Runner<E: GameEventSource> {
    events: E,
    tick_every: Duration,
}

impl<E: GameEventSource> Runner<E> {
    pub fn new(events: E, tick_every: Duration) -> Self {
        Self { events, tick_every }
    }

    /// Next raw event; a timeout (or a hung-up source) counts as a tick.
    pub fn step(&self) -> GameEvent {
        self.events
            .recv_timeout(self.tick_every)
            .unwrap_or(GameEvent::Tick)
    }

    /// Next loop event, delivering any tick to the countdown on the way out.
    pub fn drive(&self, timer: Option<&mut SessionTimer>) -> LoopEvent {
        match self.step() {
            GameEvent::Key(key) => LoopEvent::Key(key),
            GameEvent::Resize => LoopEvent::Resize,
            GameEvent::Tick => {
                LoopEvent::Countdown(timer.map_or(TimerTick::Skipped, SessionTimer::on_tick))
            }
        }
    }
}
