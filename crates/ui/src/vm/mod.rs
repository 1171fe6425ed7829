mod exercise_vm;
mod match_vm;
mod reward_vm;
mod session_vm;

pub use exercise_vm::ExerciseVm;
pub use match_vm::{MatchBoard, MatchItem, MatchOutcome, MatchReport};
pub use reward_vm::{MysteryBoxVm, OPENING_DURATION};
pub use session_vm::{LessonOutcome, LessonVm, start_lesson};
