//! Per-kind rendering data for the lesson view.

use lingo_core::model::{Exercise, ExerciseBody, PLACEHOLDER};

use super::match_vm::MatchBoard;

/// What the lesson view renders for the current exercise.
#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseVm {
    /// Translation and multiple-choice: a prompt plus an option row.
    Choice {
        instruction: &'static str,
        prompt: String,
        options: Vec<String>,
    },
    /// Fill-in-the-blank: the sentence split around the gap.
    FillBlank {
        before: String,
        after: String,
        options: Vec<String>,
    },
    Matching { board: MatchBoard },
}

impl ExerciseVm {
    #[must_use]
    pub fn for_exercise(exercise: &Exercise) -> Self {
        match exercise.body() {
            ExerciseBody::Translation { question, options, .. } => Self::Choice {
                instruction: "Translate this sentence",
                prompt: question.clone(),
                options: options.clone(),
            },
            ExerciseBody::MultipleChoice { question, options, .. } => Self::Choice {
                instruction: "Pick the right answer",
                prompt: question.clone(),
                options: options.clone(),
            },
            ExerciseBody::FillBlank { sentence, options, .. } => {
                let (before, after) = sentence
                    .split_once(PLACEHOLDER)
                    .map_or_else(|| (sentence.clone(), String::new()), |(b, a)| {
                        (b.to_string(), a.to_string())
                    });
                Self::FillBlank {
                    before,
                    after,
                    options: options.clone(),
                }
            }
            ExerciseBody::Matching { pairs } => Self::Matching {
                board: MatchBoard::new(pairs.clone()),
            },
        }
    }

    #[must_use]
    pub fn is_matching(&self) -> bool {
        matches!(self, Self::Matching { .. })
    }
}
