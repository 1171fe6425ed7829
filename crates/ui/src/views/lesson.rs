use dioxus::prelude::*;
use dioxus_router::use_navigator;

use lingo_core::model::{AppSettings, LessonId, LessonQuery};
use services::{CompletionOutcome, SessionState};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    ExerciseVm, LessonOutcome, LessonVm, MatchItem, MysteryBoxVm, OPENING_DURATION,
    start_lesson,
};

#[component]
pub fn LessonView(lesson_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let vm = use_signal(|| None::<LessonVm>);
    let settings = use_signal(AppSettings::default);
    let completion = use_signal(|| None::<Box<CompletionOutcome>>);
    let out_of_hearts = use_signal(|| false);
    let mystery = use_signal(|| None::<MysteryBoxVm>);

    let resource = {
        let ctx = ctx.clone();
        let lesson_id = lesson_id.clone();
        use_resource(move || {
            let ctx = ctx.clone();
            let lesson_id = lesson_id.clone();
            let mut vm = vm;
            let mut settings = settings;
            async move {
                let loaded = ctx
                    .settings()
                    .load()
                    .await
                    .map_err(|_| ViewError::Unknown)?;
                settings.set(loaded);

                let query = LessonQuery {
                    languages: ctx.languages(),
                    unit_id: ctx.current_unit(),
                    lesson_id: LessonId::new(lesson_id),
                };
                let started = start_lesson(&ctx.runner(), &query).await?;
                vm.set(Some(started));
                Ok::<_, ViewError>(())
            }
        })
    };
    let state = view_state_from_resource(&resource);

    // An unavailable lesson never shows an error banner; it leaves the
    // lesson flow entirely.
    use_effect(move || {
        if let ViewState::Error(ViewError::LessonUnavailable) =
            view_state_from_resource(&resource)
        {
            navigator.replace(Route::Home {});
        }
    });

    let on_check = {
        let ctx = ctx.clone();
        move |_| {
            let mut vm = vm;
            let user = ctx.user_id();
            let runner = ctx.runner();
            let settings = settings();
            if let Some(vm) = vm.write().as_mut() {
                let _ = vm.check(&runner, &user, &settings);
            }
        }
    };

    let on_continue = {
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            ctx.runner().play_click(&settings());
            let mut vm = vm;
            let mut mystery = mystery;
            let mut completion = completion;
            let mut out_of_hearts = out_of_hearts;
            spawn(async move {
                let runner = ctx.runner();
                let profile = ctx.profile();
                let settings = settings();

                let outcome = {
                    let mut local = vm.write().take();
                    let Some(session_vm) = local.as_mut() else {
                        return;
                    };
                    let outcome = session_vm.advance(&runner, &profile, &settings).await;
                    *vm.write() = local;
                    outcome
                };

                match outcome {
                    Ok(LessonOutcome::Continue) => {}
                    Ok(LessonOutcome::OutOfHearts) => out_of_hearts.set(true),
                    Ok(LessonOutcome::Completed(result)) => {
                        ctx.store_profile(result.profile.clone());
                        mystery.set(Some(MysteryBoxVm::new(result.reward_tier)));
                        completion.set(Some(result));
                    }
                    Err(_) => {}
                }
            });
        }
    };

    if out_of_hearts() {
        return rsx! {
            div { class: "hearts-panel",
                h2 { "You ran out of hearts" }
                p { "Practice makes perfect. Try this lesson again!" }
                button {
                    class: "primary",
                    onclick: move |_| {
                        navigator.replace(Route::Home {});
                    },
                    "Back to lessons"
                }
            }
        };
    }

    if completion.read().is_some() {
        return rsx! {
            CompletionPanel { completion, mystery }
        };
    }

    let snapshot = vm.read().as_ref().map(|session_vm| LessonSnapshot {
        exercise: session_vm.exercise().cloned(),
        chosen: session_vm.chosen().map(str::to_string),
        state: session_vm.state(),
        was_correct: session_vm.was_correct(),
        can_check: session_vm.can_check(),
        hearts: session_vm.hearts(),
        progress: session_vm.progress_percent(),
    });

    rsx! {
        div { class: "page",
            match (state, snapshot) {
                (ViewState::Error(err), _) => rsx! {
                    p { class: "feedback wrong", "{err.message()}" }
                },
                (_, Some(snapshot)) => rsx! {
                    LessonBoard {
                        snapshot,
                        vm,
                        settings,
                        on_check,
                        on_continue,
                    }
                },
                _ => rsx! {
                    p { "Loading lesson..." }
                },
            }
        }
    }
}

/// Per-render copy of what the board needs; keeps signal reads out of rsx.
#[derive(Clone, PartialEq)]
struct LessonSnapshot {
    exercise: Option<ExerciseVm>,
    chosen: Option<String>,
    state: SessionState,
    was_correct: bool,
    can_check: bool,
    hearts: u32,
    progress: f64,
}

#[component]
fn LessonBoard(
    snapshot: LessonSnapshot,
    vm: Signal<Option<LessonVm>>,
    settings: Signal<AppSettings>,
    on_check: EventHandler<MouseEvent>,
    on_continue: EventHandler<MouseEvent>,
) -> Element {
    let checked = snapshot.state == SessionState::Checked;

    rsx! {
        div { class: "lesson-topbar",
            div { class: "progress-track",
                div {
                    class: "progress-fill",
                    style: "width: {snapshot.progress}%",
                }
            }
            span { class: "hearts", "❤ {snapshot.hearts}" }
        }

        match snapshot.exercise {
            Some(ExerciseVm::Choice { instruction, prompt, options }) => rsx! {
                p { class: "exercise-prompt",
                    strong { "{instruction}: " }
                    "{prompt}"
                }
                OptionRow { options, chosen: snapshot.chosen, locked: checked, vm, settings }
            },
            Some(ExerciseVm::FillBlank { before, after, options }) => {
                let blank = snapshot.chosen.clone().unwrap_or_else(|| "____".to_string());
                rsx! {
                    p { class: "exercise-prompt",
                        "{before}"
                        strong { "{blank}" }
                        "{after}"
                    }
                    OptionRow { options, chosen: snapshot.chosen, locked: checked, vm, settings }
                }
            },
            Some(ExerciseVm::Matching { board }) => rsx! {
                p { class: "exercise-prompt", "Match the pairs" }
                div { class: "match-columns",
                    MatchColumn { items: board.left_items(), is_left: true, locked: checked, vm, settings }
                    MatchColumn { items: board.right_items(), is_left: false, locked: checked, vm, settings }
                }
            },
            None => rsx! {
                p { "Loading exercise..." }
            },
        }

        if checked {
            if snapshot.was_correct {
                p { class: "feedback correct", "Nice! That's right." }
            } else {
                p { class: "feedback wrong", "Not quite." }
            }
            button { class: "primary", onclick: move |evt| on_continue.call(evt), "Continue" }
        } else {
            button {
                class: "primary",
                disabled: !snapshot.can_check,
                onclick: move |evt| on_check.call(evt),
                "Check"
            }
        }
    }
}

#[component]
fn OptionRow(
    options: Vec<String>,
    chosen: Option<String>,
    locked: bool,
    vm: Signal<Option<LessonVm>>,
    settings: Signal<AppSettings>,
) -> Element {
    let ctx = use_context::<AppContext>();

    rsx! {
        div { class: "option-grid",
            for option in options {
                button {
                    key: "{option}",
                    class: if chosen.as_deref() == Some(option.as_str()) {
                        "option selected"
                    } else {
                        "option"
                    },
                    disabled: locked,
                    onclick: {
                        let ctx = ctx.clone();
                        let option = option.clone();
                        move |_| {
                            ctx.runner().play_click(&settings());
                            let mut vm = vm;
                            if let Some(vm) = vm.write().as_mut() {
                                vm.choose(option.clone());
                            }
                        }
                    },
                    "{option}"
                }
            }
        }
    }
}

#[component]
fn MatchColumn(
    items: Vec<MatchItem>,
    is_left: bool,
    locked: bool,
    vm: Signal<Option<LessonVm>>,
    settings: Signal<AppSettings>,
) -> Element {
    let ctx = use_context::<AppContext>();

    rsx! {
        ul {
            for item in items {
                li { key: "{item.pair_index}-{item.text}",
                    {
                        let ctx = ctx.clone();
                        let pair_index = item.pair_index;
                        let class = if item.matched {
                            "match-item matched"
                        } else if item.selected {
                            "match-item selected"
                        } else {
                            "match-item"
                        };
                        rsx! {
                            button {
                                class,
                                disabled: locked || item.matched,
                                onclick: move |_| {
                                    ctx.runner().play_click(&settings());
                                    let mut vm = vm;
                                    if let Some(vm) = vm.write().as_mut() {
                                        if is_left {
                                            vm.pick_match_left(pair_index);
                                        } else {
                                            vm.pick_match_right(pair_index);
                                        }
                                    }
                                },
                                "{item.text}"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn CompletionPanel(
    completion: Signal<Option<Box<CompletionOutcome>>>,
    mystery: Signal<Option<MysteryBoxVm>>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let Some(outcome) = completion.read().clone() else {
        return rsx! {};
    };
    let box_state = mystery.read().as_ref().map(MysteryBoxVm::state);
    let reward = mystery.read().as_ref().and_then(MysteryBoxVm::reward);
    let tier_label = mystery
        .read()
        .as_ref()
        .map_or("Reward", MysteryBoxVm::tier_label);
    let accuracy = outcome.summary.accuracy() * 100.0;

    let on_open = {
        let ctx = ctx.clone();
        move |_| {
            let runner = ctx.runner();
            let mut mystery = mystery;
            let Some(tier) = mystery.read().as_ref().map(MysteryBoxVm::tier) else {
                return;
            };
            let amount = runner.draw_reward(tier);
            let granted = mystery
                .write()
                .as_mut()
                .and_then(|vm| vm.begin_open(amount));
            if granted.is_some() {
                spawn(async move {
                    tokio::time::sleep(OPENING_DURATION).await;
                    if let Some(vm) = mystery.write().as_mut() {
                        vm.settle();
                    }
                });
            }
        }
    };

    rsx! {
        div { class: "completion-panel",
            h2 { "Lesson complete!" }
            p { "+{outcome.summary.xp_earned()} XP · {accuracy:.0}% accuracy" }

            for milestone in &outcome.milestones {
                p { class: "milestones", "Milestone reached: {milestone.key()}" }
            }

            match box_state {
                Some(lingo_core::reward::BoxState::Closed) => rsx! {
                    div { class: "mystery-box", "🎁" }
                    p { "{tier_label}" }
                    button { class: "primary", onclick: on_open, "Open" }
                },
                Some(lingo_core::reward::BoxState::Opening) => rsx! {
                    div { class: "mystery-box opening", "🎁" }
                    p { "Opening..." }
                },
                Some(lingo_core::reward::BoxState::Opened) => rsx! {
                    div { class: "mystery-box", "💎" }
                    if let Some(amount) = reward {
                        p { class: "reward-amount", "+{amount} gems" }
                    }
                    button {
                        class: "primary",
                        onclick: move |_| {
                            navigator.replace(Route::Home {});
                        },
                        "Continue"
                    }
                },
                None => rsx! {},
            }
        }
    }
}

