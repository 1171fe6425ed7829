use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::{LessonId, UserId};

/// XP totals at which an achievement fires, lowest first.
pub const XP_THRESHOLDS: [u32; 4] = [100, 500, 1000, 5000];

/// The learner profile as this client sees it: XP total plus the set of
/// completed lessons. The set is deduplicated by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    user_id: UserId,
    xp: u32,
    completed_lessons: BTreeSet<LessonId>,
}

impl Profile {
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            xp: 0,
            completed_lessons: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn from_persisted(
        user_id: UserId,
        xp: u32,
        completed_lessons: impl IntoIterator<Item = LessonId>,
    ) -> Self {
        Self {
            user_id,
            xp,
            completed_lessons: completed_lessons.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn xp(&self) -> u32 {
        self.xp
    }

    #[must_use]
    pub fn completed_lessons(&self) -> &BTreeSet<LessonId> {
        &self.completed_lessons
    }

    #[must_use]
    pub fn has_completed(&self, lesson_id: &LessonId) -> bool {
        self.completed_lessons.contains(lesson_id)
    }

    /// Fold one finished lesson into the profile. Re-completing a lesson
    /// adds XP but does not grow the completed set.
    #[must_use]
    pub fn apply_completion(&self, lesson_id: LessonId, xp_earned: u32) -> Self {
        let mut completed = self.completed_lessons.clone();
        completed.insert(lesson_id);
        Self {
            user_id: self.user_id.clone(),
            xp: self.xp.saturating_add(xp_earned),
            completed_lessons: completed,
        }
    }
}

/// The payload sent to the remote profile store on lesson completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub xp: u32,
    pub completed_lessons: Vec<LessonId>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            xp: profile.xp(),
            completed_lessons: profile.completed_lessons().iter().cloned().collect(),
        }
    }
}

/// A one-time achievement keyed by crossing a completion or XP threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    FirstLesson,
    XpThreshold(u32),
}

impl Milestone {
    /// Stable key sent to the profile store.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Milestone::FirstLesson => "first_lesson".to_string(),
            Milestone::XpThreshold(threshold) => format!("xp_{threshold}"),
        }
    }
}

/// Milestones crossed by a single profile update, each at most once.
///
/// Determined purely by values observed before vs. after the update:
/// `FirstLesson` fires iff the completed set goes from empty to non-empty,
/// and an XP milestone fires for every threshold the new total passes.
#[must_use]
pub fn milestones_crossed(before: &Profile, after: &Profile) -> Vec<Milestone> {
    let mut crossed = Vec::new();

    if before.completed_lessons().is_empty() && !after.completed_lessons().is_empty() {
        crossed.push(Milestone::FirstLesson);
    }

    for threshold in XP_THRESHOLDS {
        if before.xp() < threshold && after.xp() >= threshold {
            crossed.push(Milestone::XpThreshold(threshold));
        }
    }

    crossed
}
