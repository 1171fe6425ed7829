//! Mystery-box presentation state for the completion panel.

use std::time::Duration;

use lingo_core::reward::{BoxState, MysteryBox, RewardTier};

/// How long the box shakes before the reward is revealed.
pub const OPENING_DURATION: Duration = Duration::from_millis(1600);

/// Wraps the one-shot box with its tier so the view has everything it
/// needs. The opening animation is driven by the view sleeping for
/// [`OPENING_DURATION`] and then calling [`settle`](Self::settle).
#[derive(Debug, Clone)]
pub struct MysteryBoxVm {
    tier: RewardTier,
    reward_box: MysteryBox,
}

impl MysteryBoxVm {
    #[must_use]
    pub fn new(tier: RewardTier) -> Self {
        Self {
            tier,
            reward_box: MysteryBox::new(),
        }
    }

    #[must_use]
    pub fn tier(&self) -> RewardTier {
        self.tier
    }

    #[must_use]
    pub fn state(&self) -> BoxState {
        self.reward_box.state()
    }

    #[must_use]
    pub fn reward(&self) -> Option<u32> {
        self.reward_box.reward()
    }

    /// Start opening with the drawn amount. Returns the granted amount on
    /// the first call only; repeat opens keep the original grant.
    pub fn begin_open(&mut self, amount: u32) -> Option<u32> {
        self.reward_box.activate(amount)
    }

    /// Finish the opening animation.
    pub fn settle(&mut self) {
        self.reward_box.settle();
    }

    #[must_use]
    pub fn tier_label(&self) -> &'static str {
        match self.tier {
            RewardTier::Lesson => "Lesson reward",
            RewardTier::Unit => "Unit reward",
            RewardTier::Section => "Section reward",
        }
    }
}
