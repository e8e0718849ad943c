use chrono::{DateTime, Duration, Utc};

/// Where `SetProgress::updated_at` comes from.
///
/// Trackers read the wall clock in production; tests pin it with `Clock::Fixed`
/// so snapshots compare equal across runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Steps a pinned clock, e.g. between two graded answers.
    /// `Clock::System` ignores it.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Seconds since the epoch of the instant test clocks are pinned to
/// (2023-11-14T22:13:20Z).
pub const PINNED_TEST_SECONDS: i64 = 1_700_000_000;

/// The instant test clocks are pinned to.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(PINNED_TEST_SECONDS)
}

/// Clock pinned to [`fixed_now`].
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
