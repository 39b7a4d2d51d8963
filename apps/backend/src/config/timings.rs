use std::time::Duration;

/// Engine timing knobs.
///
/// All timed transitions in the engine are driven from this one struct so
/// tests can shrink the delays instead of waiting on production values.
#[derive(Debug, Clone)]
pub struct Timings {
    /// Pause between a round resolving and the table being cleared, so
    /// clients can animate the trick.
    pub round_settle: Duration,
    /// Pause before the practice bot plays once it is on turn.
    pub bot_move: Duration,
    /// Pause between a constituent match game ending and the next one
    /// being dealt automatically.
    pub match_continue: Duration,
    /// Grace period before a completed game disappears from the lobby.
    pub remove_after_end: Duration,
    /// Shorter grace period after a resignation.
    pub remove_after_resign: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            round_settle: Duration::from_millis(800),
            bot_move: Duration::from_millis(800),
            match_continue: Duration::from_secs(3),
            remove_after_end: Duration::from_secs(5),
            remove_after_resign: Duration::from_secs(2),
        }
    }
}

impl Timings {
    /// Uniformly shrunk delays for tests that drive the engine actor.
    pub fn fast(delay: Duration) -> Self {
        Self {
            round_settle: delay,
            bot_move: delay,
            match_continue: delay,
            remove_after_end: delay,
            remove_after_resign: delay,
        }
    }
}
