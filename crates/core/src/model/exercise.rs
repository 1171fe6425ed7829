use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ExerciseId;

/// The blank marker a fill-in-the-blank sentence must contain exactly once.
pub const PLACEHOLDER: &str = "___";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExerciseError {
    #[error("exercise needs at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("answer {answer:?} is not among the exercise's own options")]
    AnswerNotInOptions { answer: String },

    #[error("fill-blank sentence must contain exactly one {PLACEHOLDER:?}, found {found}")]
    BadPlaceholder { found: usize },

    #[error("matching exercise needs at least one pair")]
    NoPairs,
}

/// Discriminant for the exercise union, used in attempt logs and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Translation,
    MultipleChoice,
    FillBlank,
    Matching,
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExerciseKind::Translation => "translation",
            ExerciseKind::MultipleChoice => "multiple_choice",
            ExerciseKind::FillBlank => "fill_blank",
            ExerciseKind::Matching => "matching",
        };
        f.write_str(name)
    }
}

/// One left/right pair of a matching exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingPair {
    pub left: String,
    pub right: String,
}

impl MatchingPair {
    #[must_use]
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// Closed union over the exercise kinds.
///
/// Constructed only through the validating builders on [`Exercise`], so every
/// value holds its invariants: the answer is always among the exercise's own
/// options, a fill-blank sentence has exactly one placeholder, and a matching
/// exercise has at least one pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExerciseBody {
    Translation {
        question: String,
        answer: String,
        options: Vec<String>,
    },
    MultipleChoice {
        question: String,
        answer: String,
        options: Vec<String>,
    },
    FillBlank {
        sentence: String,
        answer: String,
        options: Vec<String>,
    },
    Matching {
        pairs: Vec<MatchingPair>,
    },
}

/// A single exercise inside a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    id: ExerciseId,
    body: ExerciseBody,
}

/// The learner's response for one exercise.
///
/// Text kinds report the chosen option; the matching renderer reports its
/// completion signal with the mismatch count it tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Choice(String),
    Matching { mistakes: u32 },
}

impl Answer {
    #[must_use]
    pub fn choice(value: impl Into<String>) -> Self {
        Self::Choice(value.into())
    }

    /// Human-readable rendition for attempt logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Answer::Choice(value) => value.clone(),
            Answer::Matching { mistakes } => format!("matched all pairs, {mistakes} mistakes"),
        }
    }
}

fn check_options(answer: &str, options: &[String]) -> Result<(), ExerciseError> {
    if options.len() < 2 {
        return Err(ExerciseError::TooFewOptions { len: options.len() });
    }
    if !options.iter().any(|opt| opt == answer) {
        return Err(ExerciseError::AnswerNotInOptions {
            answer: answer.to_string(),
        });
    }
    Ok(())
}

impl Exercise {
    /// Build a translation exercise.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError` if there are fewer than two options or the
    /// answer is not among them.
    pub fn translation(
        id: ExerciseId,
        question: impl Into<String>,
        answer: impl Into<String>,
        options: Vec<String>,
    ) -> Result<Self, ExerciseError> {
        let answer = answer.into();
        check_options(&answer, &options)?;
        Ok(Self {
            id,
            body: ExerciseBody::Translation {
                question: question.into(),
                answer,
                options,
            },
        })
    }

    /// Build a multiple-choice exercise.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError` if there are fewer than two options or the
    /// answer is not among them.
    pub fn multiple_choice(
        id: ExerciseId,
        question: impl Into<String>,
        answer: impl Into<String>,
        options: Vec<String>,
    ) -> Result<Self, ExerciseError> {
        let answer = answer.into();
        check_options(&answer, &options)?;
        Ok(Self {
            id,
            body: ExerciseBody::MultipleChoice {
                question: question.into(),
                answer,
                options,
            },
        })
    }

    /// Build a fill-in-the-blank exercise.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError` if the sentence does not contain exactly one
    /// placeholder, or the options are invalid.
    pub fn fill_blank(
        id: ExerciseId,
        sentence: impl Into<String>,
        answer: impl Into<String>,
        options: Vec<String>,
    ) -> Result<Self, ExerciseError> {
        let sentence = sentence.into();
        let found = sentence.matches(PLACEHOLDER).count();
        if found != 1 {
            return Err(ExerciseError::BadPlaceholder { found });
        }
        let answer = answer.into();
        check_options(&answer, &options)?;
        Ok(Self {
            id,
            body: ExerciseBody::FillBlank {
                sentence,
                answer,
                options,
            },
        })
    }

    /// Build a matching exercise.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::NoPairs` if no pairs are given.
    pub fn matching(id: ExerciseId, pairs: Vec<MatchingPair>) -> Result<Self, ExerciseError> {
        if pairs.is_empty() {
            return Err(ExerciseError::NoPairs);
        }
        Ok(Self {
            id,
            body: ExerciseBody::Matching { pairs },
        })
    }

    /// Rehydrate from storage, re-running the construction invariants.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError` if the persisted body violates an invariant.
    pub fn from_persisted(id: ExerciseId, body: ExerciseBody) -> Result<Self, ExerciseError> {
        match body {
            ExerciseBody::Translation {
                question,
                answer,
                options,
            } => Self::translation(id, question, answer, options),
            ExerciseBody::MultipleChoice {
                question,
                answer,
                options,
            } => Self::multiple_choice(id, question, answer, options),
            ExerciseBody::FillBlank {
                sentence,
                answer,
                options,
            } => Self::fill_blank(id, sentence, answer, options),
            ExerciseBody::Matching { pairs } => Self::matching(id, pairs),
        }
    }

    #[must_use]
    pub fn id(&self) -> ExerciseId {
        self.id
    }

    #[must_use]
    pub fn body(&self) -> &ExerciseBody {
        &self.body
    }

    #[must_use]
    pub fn kind(&self) -> ExerciseKind {
        match &self.body {
            ExerciseBody::Translation { .. } => ExerciseKind::Translation,
            ExerciseBody::MultipleChoice { .. } => ExerciseKind::MultipleChoice,
            ExerciseBody::FillBlank { .. } => ExerciseKind::FillBlank,
            ExerciseBody::Matching { .. } => ExerciseKind::Matching,
        }
    }

    /// The prompt shown to the learner (sentence for fill-blank, pair count
    /// summary for matching).
    #[must_use]
    pub fn question_text(&self) -> String {
        match &self.body {
            ExerciseBody::Translation { question, .. }
            | ExerciseBody::MultipleChoice { question, .. } => question.clone(),
            ExerciseBody::FillBlank { sentence, .. } => sentence.clone(),
            ExerciseBody::Matching { pairs } => format!("match {} pairs", pairs.len()),
        }
    }

    /// The expected answer, rendered for attempt logs.
    #[must_use]
    pub fn expected_answer(&self) -> String {
        match &self.body {
            ExerciseBody::Translation { answer, .. }
            | ExerciseBody::MultipleChoice { answer, .. }
            | ExerciseBody::FillBlank { answer, .. } => answer.clone(),
            ExerciseBody::Matching { pairs } => pairs
                .iter()
                .map(|pair| format!("{}={}", pair.left, pair.right))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    /// The selectable options, in authored order. Empty for matching.
    #[must_use]
    pub fn options(&self) -> &[String] {
        match &self.body {
            ExerciseBody::Translation { options, .. }
            | ExerciseBody::MultipleChoice { options, .. }
            | ExerciseBody::FillBlank { options, .. } => options,
            ExerciseBody::Matching { .. } => &[],
        }
    }

    /// The pairs of a matching exercise. Empty for the text kinds.
    #[must_use]
    pub fn pairs(&self) -> &[MatchingPair] {
        match &self.body {
            ExerciseBody::Matching { pairs } => pairs,
            _ => &[],
        }
    }

    /// Grade an answer. Pure: same `(exercise, answer)` always yields the
    /// same result. A mismatched answer shape grades as incorrect.
    #[must_use]
    pub fn grade(&self, given: &Answer) -> bool {
        match (&self.body, given) {
            (
                ExerciseBody::Translation { answer, .. }
                | ExerciseBody::MultipleChoice { answer, .. }
                | ExerciseBody::FillBlank { answer, .. },
                Answer::Choice(value),
            ) => value == answer,
            (ExerciseBody::Matching { .. }, Answer::Matching { mistakes }) => *mistakes == 0,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn translation_rejects_answer_outside_options() {
        let err = Exercise::translation(
            ExerciseId::new(1),
            "Hello",
            "Selam",
            opts(&["Awo", "Aydelem"]),
        )
        .unwrap_err();
        assert!(matches!(err, ExerciseError::AnswerNotInOptions { .. }));
    }

    #[test]
    fn translation_rejects_single_option() {
        let err = Exercise::translation(ExerciseId::new(1), "Hello", "Selam", opts(&["Selam"]))
            .unwrap_err();
        assert!(matches!(err, ExerciseError::TooFewOptions { len: 1 }));
    }

    #[test]
    fn fill_blank_requires_exactly_one_placeholder() {
        let err = Exercise::fill_blank(
            ExerciseId::new(1),
            "no blank here",
            "Selam",
            opts(&["Selam", "Awo"]),
        )
        .unwrap_err();
        assert!(matches!(err, ExerciseError::BadPlaceholder { found: 0 }));

        let err = Exercise::fill_blank(
            ExerciseId::new(1),
            "___ and ___",
            "Selam",
            opts(&["Selam", "Awo"]),
        )
        .unwrap_err();
        assert!(matches!(err, ExerciseError::BadPlaceholder { found: 2 }));
    }

    #[test]
    fn matching_requires_pairs() {
        let err = Exercise::matching(ExerciseId::new(1), Vec::new()).unwrap_err();
        assert!(matches!(err, ExerciseError::NoPairs));
    }

    #[test]
    fn grading_is_exact_string_equality() {
        let exercise = Exercise::translation(
            ExerciseId::new(1),
            "Hello",
            "Selam",
            opts(&["Selam", "Awo", "Aydelem"]),
        )
        .unwrap();

        assert!(exercise.grade(&Answer::choice("Selam")));
        assert!(!exercise.grade(&Answer::choice("selam")));
        assert!(!exercise.grade(&Answer::choice("Awo")));
    }

    #[test]
    fn grading_is_deterministic() {
        let exercise = Exercise::multiple_choice(
            ExerciseId::new(2),
            "Yes",
            "Awo",
            opts(&["Awo", "Aydelem"]),
        )
        .unwrap();
        let answer = Answer::choice("Awo");
        for _ in 0..3 {
            assert!(exercise.grade(&answer));
        }
    }

    #[test]
    fn matching_grades_on_mistake_count() {
        let exercise = Exercise::matching(
            ExerciseId::new(3),
            vec![MatchingPair::new("Hello", "Selam")],
        )
        .unwrap();

        assert!(exercise.grade(&Answer::Matching { mistakes: 0 }));
        assert!(!exercise.grade(&Answer::Matching { mistakes: 1 }));
    }

    #[test]
    fn mismatched_answer_shape_is_incorrect() {
        let matching = Exercise::matching(
            ExerciseId::new(4),
            vec![MatchingPair::new("Hello", "Selam")],
        )
        .unwrap();
        assert!(!matching.grade(&Answer::choice("Selam")));

        let translation = Exercise::translation(
            ExerciseId::new(5),
            "Hello",
            "Selam",
            opts(&["Selam", "Awo"]),
        )
        .unwrap();
        assert!(!translation.grade(&Answer::Matching { mistakes: 0 }));
    }

    #[test]
    fn persisted_body_round_trips_through_validation() {
        let exercise = Exercise::fill_blank(
            ExerciseId::new(6),
            "___ means hello",
            "Selam",
            opts(&["Selam", "Awo"]),
        )
        .unwrap();
        let restored =
            Exercise::from_persisted(exercise.id(), exercise.body().clone()).unwrap();
        assert_eq!(restored, exercise);
    }
}
