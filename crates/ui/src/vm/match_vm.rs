//! Interactive state for matching exercises.
//!
//! The board tracks its own mismatch count while the learner pairs items
//! up, and reports completion exactly once; the session only ever sees
//! that final report.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

use lingo_core::model::MatchingPair;

/// One tile on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchItem {
    /// Index into the original pair list.
    pub pair_index: usize,
    pub text: String,
    pub matched: bool,
    pub selected: bool,
}

/// What a right-hand pick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// No left item was selected, or the tile was already matched.
    Ignored,
    Matched,
    Mismatch,
}

/// Completion signal, produced once per board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchReport {
    pub completed: bool,
    pub mistakes: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchBoard {
    pairs: Vec<MatchingPair>,
    /// Display order of the right column, shuffled so the columns do not
    /// line up.
    right_order: Vec<usize>,
    /// Matched tiles, tracked per column: with duplicate texts a correct
    /// pick can settle a different pair index than the tile clicked.
    matched_left: BTreeSet<usize>,
    matched_right: BTreeSet<usize>,
    selected_left: Option<usize>,
    mistakes: u32,
    reported: bool,
}

impl MatchBoard {
    #[must_use]
    pub fn new(pairs: Vec<MatchingPair>) -> Self {
        Self::new_with_rng(pairs, &mut rand::rng())
    }

    #[must_use]
    pub fn new_with_rng<R: Rng + ?Sized>(pairs: Vec<MatchingPair>, rng: &mut R) -> Self {
        let mut right_order: Vec<usize> = (0..pairs.len()).collect();
        right_order.shuffle(rng);
        Self {
            pairs,
            right_order,
            matched_left: BTreeSet::new(),
            matched_right: BTreeSet::new(),
            selected_left: None,
            mistakes: 0,
            reported: false,
        }
    }

    #[must_use]
    pub fn left_items(&self) -> Vec<MatchItem> {
        self.pairs
            .iter()
            .enumerate()
            .map(|(index, pair)| MatchItem {
                pair_index: index,
                text: pair.left.clone(),
                matched: self.matched_left.contains(&index),
                selected: self.selected_left == Some(index),
            })
            .collect()
    }

    #[must_use]
    pub fn right_items(&self) -> Vec<MatchItem> {
        self.right_order
            .iter()
            .map(|&index| MatchItem {
                pair_index: index,
                text: self.pairs[index].right.clone(),
                matched: self.matched_right.contains(&index),
                selected: false,
            })
            .collect()
    }

    #[must_use]
    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.matched_left.len() == self.pairs.len()
    }

    /// Select a left tile. Picking a matched tile clears the selection.
    pub fn pick_left(&mut self, pair_index: usize) {
        if self.matched_left.contains(&pair_index) || pair_index >= self.pairs.len() {
            self.selected_left = None;
        } else {
            self.selected_left = Some(pair_index);
        }
    }

    /// Try to match the selected left tile against a right tile.
    ///
    /// The attempt is graded by value: it counts as a match whenever the
    /// picked texts appear together as a pair, regardless of which tile of
    /// a duplicate text was clicked. A wrong pairing bumps the mismatch
    /// counter and keeps the left selection so the learner can try again.
    pub fn pick_right(&mut self, pair_index: usize) -> MatchOutcome {
        if self.matched_right.contains(&pair_index) || pair_index >= self.pairs.len() {
            return MatchOutcome::Ignored;
        }
        let Some(left) = self.selected_left else {
            return MatchOutcome::Ignored;
        };

        let attempted = (&self.pairs[left].left, &self.pairs[pair_index].right);
        let is_pair = self
            .pairs
            .iter()
            .any(|pair| (&pair.left, &pair.right) == attempted);

        if is_pair {
            self.matched_left.insert(left);
            self.matched_right.insert(pair_index);
            self.selected_left = None;
            MatchOutcome::Matched
        } else {
            self.mistakes += 1;
            MatchOutcome::Mismatch
        }
    }

    /// The completion report, exactly once after the last pair matched.
    pub fn take_report(&mut self) -> Option<MatchReport> {
        if !self.is_complete() || self.reported {
            return None;
        }
        self.reported = true;
        Some(MatchReport {
            completed: true,
            mistakes: self.mistakes,
        })
    }
}
