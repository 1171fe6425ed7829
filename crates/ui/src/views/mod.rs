mod home;
mod lesson;
mod settings;
mod state;

pub use home::HomeView;
pub use lesson::LessonView;
pub use settings::SettingsView;
pub use state::{ViewError, ViewState, view_state_from_resource};
