//! Resend countdown for verification codes.
//!
//! After a code is sent the "get code" button is disabled and shows the
//! seconds left. The countdown does not own a timer: the caller calls
//! [`tick`](VerificationCountdown::tick) once per elapsed second.

use parking_lot::Mutex;

use horizon_roster_core::Signal;

/// Default countdown length in seconds.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 60;

/// Result of one [`tick`](VerificationCountdown::tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// The countdown was not running.
    Idle,
    /// Seconds left after this tick.
    Running(u32),
    /// This tick ended the countdown.
    Finished,
}

/// Seconds-until-resend countdown.
pub struct VerificationCountdown {
    duration: u32,
    remaining: Mutex<u32>,
    /// Emitted once when a run reaches zero.
    pub finished: Signal<()>,
}

impl Default for VerificationCountdown {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VerificationCountdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationCountdown")
            .field("duration", &self.duration)
            .field("remaining", &self.remaining())
            .finish()
    }
}

impl VerificationCountdown {
    /// Creates an idle 60 second countdown.
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_COUNTDOWN_SECS)
    }

    /// Creates an idle countdown of `secs` seconds.
    pub fn with_duration(secs: u32) -> Self {
        Self {
            duration: secs,
            remaining: Mutex::new(0),
            finished: Signal::new(),
        }
    }

    /// Starts (or restarts) the countdown.
    pub fn start(&self) {
        *self.remaining.lock() = self.duration;
    }

    /// Seconds left; zero when idle.
    pub fn remaining(&self) -> u32 {
        *self.remaining.lock()
    }

    /// Returns `true` while a code cannot be resent.
    pub fn is_active(&self) -> bool {
        self.remaining() > 0
    }

    /// Button label while running, e.g. `"42s"`.
    pub fn label(&self) -> Option<String> {
        let remaining = self.remaining();
        (remaining > 0).then(|| format!("{remaining}s"))
    }

    /// Advances one second.
    pub fn tick(&self) -> CountdownTick {
        let tick = {
            let mut remaining = self.remaining.lock();
            match *remaining {
                0 => CountdownTick::Idle,
                1 => {
                    *remaining = 0;
                    CountdownTick::Finished
                }
                n => {
                    *remaining = n - 1;
                    CountdownTick::Running(n - 1)
                }
            }
        };
        if tick == CountdownTick::Finished {
            self.finished.emit(());
        }
        tick
    }
}

static_assertions::assert_impl_all!(VerificationCountdown: Send, Sync);
