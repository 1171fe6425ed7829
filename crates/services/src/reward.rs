//! Random reward draws for the post-lesson mystery box.

use rand::Rng;

use lingo_core::reward::{
    LESSON_REWARDS, RewardTier, SECTION_REWARD_RANGE, UNIT_REWARD_RANGE,
};

/// Draw a gem amount for the given tier.
///
/// Lesson boxes pick one of a few fixed amounts; unit and section boxes
/// draw uniformly from their inclusive ranges.
pub fn draw_reward<R: Rng + ?Sized>(tier: RewardTier, rng: &mut R) -> u32 {
    match tier {
        RewardTier::Lesson => {
            let idx = rng.random_range(0..LESSON_REWARDS.len());
            LESSON_REWARDS[idx]
        }
        RewardTier::Unit => rng.random_range(UNIT_REWARD_RANGE),
        RewardTier::Section => rng.random_range(SECTION_REWARD_RANGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn lesson_draws_come_from_the_fixed_set() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let amount = draw_reward(RewardTier::Lesson, &mut rng);
            assert!(LESSON_REWARDS.contains(&amount), "unexpected {amount}");
        }
    }

    #[test]
    fn unit_draws_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let amount = draw_reward(RewardTier::Unit, &mut rng);
            assert!(UNIT_REWARD_RANGE.contains(&amount), "unexpected {amount}");
        }
    }

    #[test]
    fn section_draws_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let amount = draw_reward(RewardTier::Section, &mut rng);
            assert!(
                SECTION_REWARD_RANGE.contains(&amount),
                "unexpected {amount}"
            );
        }
    }
}
