/// Outcome of delivering one whole-second tick to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Timer is stopped or paused; the tick was discarded.
    Skipped,
    /// Countdown advanced; seconds left.
    Running(u32),
    /// Countdown just hit zero. Reported exactly once; the timer stops itself.
    Expired,
}

/// Independent countdown clock, driven by a once-per-second tick from the
/// runtime loop. Decoupled from the session so endless mode can simply not
/// construct one.
///
/// Pausing discards ticks instead of carrying the elapsed fraction over,
/// which is fine at whole-second granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionTimer {
    remaining_secs: u32,
    running: bool,
    paused: bool,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, seconds: u32) {
        self.remaining_secs = seconds;
        self.running = true;
        self.paused = false;
    }

    pub fn pause(&mut self) {
        if self.running {
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        if self.running {
            self.paused = false;
        }
    }

    /// Cancel any in-flight countdown and reinitialize without starting.
    pub fn reset(&mut self, seconds: u32) {
        self.remaining_secs = seconds;
        self.running = false;
        self.paused = false;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.paused = false;
    }

    pub fn on_tick(&mut self) -> TimerTick {
        if !self.running || self.paused {
            return TimerTick::Skipped;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.stop();
            TimerTick::Expired
        } else {
            TimerTick::Running(self.remaining_secs)
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_stopped() {
        let timer = SessionTimer::new();

        assert_eq!(timer.remaining_secs(), 0);
        assert!(!timer.is_running());
        assert!(!timer.is_paused());
    }

    #[test]
    fn test_start_seeds_and_runs() {
        let mut timer = SessionTimer::new();
        timer.start(120);

        assert_eq!(timer.remaining_secs(), 120);
        assert!(timer.is_running());
        assert_eq!(timer.on_tick(), TimerTick::Running(119));
    }

    #[test]
    fn test_tick_to_zero_expires_exactly_once() {
        let mut timer = SessionTimer::new();
        timer.start(2);

        assert_eq!(timer.on_tick(), TimerTick::Running(1));
        assert_eq!(timer.on_tick(), TimerTick::Expired);
        assert!(!timer.is_running());
        // the clock has stopped itself; further ticks are inert
        assert_eq!(timer.on_tick(), TimerTick::Skipped);
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn test_paused_ticks_are_discarded() {
        let mut timer = SessionTimer::new();
        timer.start(10);
        timer.pause();

        assert!(timer.is_paused());
        assert_eq!(timer.on_tick(), TimerTick::Skipped);
        assert_eq!(timer.on_tick(), TimerTick::Skipped);
        assert_eq!(timer.remaining_secs(), 10);

        timer.resume();
        assert_eq!(timer.on_tick(), TimerTick::Running(9));
    }

    #[test]
    fn test_pause_and_resume_require_running() {
        let mut timer = SessionTimer::new();

        timer.pause();
        assert!(!timer.is_paused());
        timer.resume();
        assert!(!timer.is_paused());
    }

    #[test]
    fn test_reset_cancels_without_starting() {
        let mut timer = SessionTimer::new();
        timer.start(30);
        assert_eq!(timer.on_tick(), TimerTick::Running(29));

        timer.reset(300);
        assert_eq!(timer.remaining_secs(), 300);
        assert!(!timer.is_running());
        assert_eq!(timer.on_tick(), TimerTick::Skipped);
    }

    #[test]
    fn test_stop_halts_countdown() {
        let mut timer = SessionTimer::new();
        timer.start(60);
        timer.stop();

        assert!(!timer.is_running());
        assert_eq!(timer.on_tick(), TimerTick::Skipped);
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[test]
    fn test_start_zero_expires_on_first_tick() {
        let mut timer = SessionTimer::new();
        timer.start(0);

        assert_eq!(timer.on_tick(), TimerTick::Expired);
        assert_eq!(timer.on_tick(), TimerTick::Skipped);
    }
}
