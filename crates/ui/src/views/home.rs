use dioxus::prelude::*;
use dioxus_router::Link;

use lingo_core::model::LessonOverview;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let profile = ctx.profile();

    let resource = {
        let ctx = ctx.clone();
        use_resource(move || {
            let ctx = ctx.clone();
            async move {
                ctx.runner()
                    .available_lessons(&ctx.languages(), &ctx.current_unit())
                    .await
                    .map_err(|_| ViewError::Unknown)
            }
        })
    };
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Lessons" }
            p { "Total XP: {profile.xp()}" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading lessons..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "feedback wrong", "{err.message()}" }
                },
                ViewState::Ready(lessons) => rsx! {
                    LessonList { lessons }
                },
            }
        }
    }
}

#[component]
fn LessonList(lessons: Vec<LessonOverview>) -> Element {
    let ctx = use_context::<AppContext>();
    let profile = ctx.profile();

    if lessons.is_empty() {
        return rsx! {
            p { "No lessons in this unit yet." }
        };
    }

    rsx! {
        ul { class: "lesson-list",
            for lesson in lessons {
                li { key: "{lesson.id}",
                    Link {
                        to: Route::Lesson { lesson_id: lesson.id.as_str().to_string() },
                        strong { "{lesson.title}" }
                        span { " · {lesson.exercise_count} exercises" }
                        if profile.has_completed(&lesson.id) {
                            span { " ✓" }
                        }
                    }
                }
            }
        }
    }
}
