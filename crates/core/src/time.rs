use chrono::{DateTime, Duration, Utc};

/// Source of the timestamps recorded on attempts and session summaries.
///
/// Services hold a `Clock` instead of calling `Utc::now()` directly so tests
/// can pin time and assert on the exact values that end up persisted.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    /// System time.
    #[default]
    Default,
    /// Frozen at a known instant; only moves via [`Clock::advance`].
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// A clock backed by the system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// A clock frozen at `at`.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// The current instant according to this clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match *self {
            Self::Default => Utc::now(),
            Self::Fixed(at) => at,
        }
    }

    /// Moves a fixed clock forward by `delta`; no-op on the system clock.
    pub fn advance(&mut self, delta: Duration) {
        if let Self::Fixed(at) = self {
            *at += delta;
        }
    }
}

/// Instant used by fixed clocks in tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// The test instant as a `DateTime<Utc>`.
///
/// # Panics
///
/// Panics if the constant is out of chrono's representable range, which it
/// is not.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// A `Clock` frozen at [`fixed_now`].
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
