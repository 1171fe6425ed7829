//! Post-completion mystery-box reward: tier derivation and the one-shot
//! reveal state machine. Drawing the amount is left to the caller so this
//! module stays deterministic.

use std::ops::RangeInclusive;

use crate::model::LessonId;

/// XP amounts a lesson-tier box can grant (uniform pick from this set).
pub const LESSON_REWARDS: [u32; 4] = [3, 10, 15, 25];

/// XP range for a unit-final box.
pub const UNIT_REWARD_RANGE: RangeInclusive<u32> = 50..=300;

/// XP range for a section-final box.
pub const SECTION_REWARD_RANGE: RangeInclusive<u32> = 100..=500;

/// Reward tier of a finished lesson, read from the naming convention on the
/// lesson identifier. When several markers match, the higher tier wins:
/// section > unit > lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardTier {
    Lesson,
    Unit,
    Section,
}

impl RewardTier {
    #[must_use]
    pub fn for_lesson(id: &LessonId) -> Self {
        let raw = id.as_str();
        if raw.contains("section") {
            RewardTier::Section
        } else if raw.contains("unit") || raw.contains("final") {
            RewardTier::Unit
        } else {
            RewardTier::Lesson
        }
    }
}

/// Reveal states of the mystery box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxState {
    Closed,
    Opening,
    Opened,
}

/// One-shot, idempotent reward reveal.
///
/// `activate` grants exactly once, from `Closed` only; `settle` moves
/// `Opening` to `Opened` after the reveal latency. Every other transition is
/// a no-op, so repeated activation while not `Closed` never grants again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MysteryBox {
    state: BoxState,
    reward: Option<u32>,
}

impl MysteryBox {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: BoxState::Closed,
            reward: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> BoxState {
        self.state
    }

    /// The granted amount, once activated.
    #[must_use]
    pub fn reward(&self) -> Option<u32> {
        self.reward
    }

    /// Start the reveal with the drawn amount. Returns the grant on the
    /// first activation, `None` on every later call.
    pub fn activate(&mut self, amount: u32) -> Option<u32> {
        if self.state != BoxState::Closed {
            return None;
        }
        self.state = BoxState::Opening;
        self.reward = Some(amount);
        Some(amount)
    }

    /// Finish the reveal after the latency window. No-op unless `Opening`.
    pub fn settle(&mut self) {
        if self.state == BoxState::Opening {
            self.state = BoxState::Opened;
        }
    }
}

impl Default for MysteryBox {
    fn default() -> Self {
        Self::new()
    }
}
