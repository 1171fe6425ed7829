use dioxus::prelude::*;

use lingo_core::model::AppSettings;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<AppContext>();
    let current = use_signal(|| None::<AppSettings>);

    let resource = {
        let ctx = ctx.clone();
        use_resource(move || {
            let ctx = ctx.clone();
            let mut current = current;
            async move {
                let settings = ctx
                    .settings()
                    .load()
                    .await
                    .map_err(|_| ViewError::Unknown)?;
                current.set(Some(settings));
                Ok::<_, ViewError>(())
            }
        })
    };
    let state = view_state_from_resource(&resource);

    let on_toggle = {
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            let mut current = current;
            let Some(enabled) = current().map(|settings| settings.sound_enabled()) else {
                return;
            };
            spawn(async move {
                // The service returns the settings now in effect; the UI
                // reflects that value rather than assuming the flip worked.
                if let Ok(updated) = ctx.settings().set_sound_enabled(!enabled).await {
                    current.set(Some(updated));
                }
            });
        }
    };

    rsx! {
        div { class: "page",
            h2 { "Settings" }
            match (state, current()) {
                (ViewState::Error(err), _) => rsx! {
                    p { class: "feedback wrong", "{err.message()}" }
                },
                (_, Some(settings)) => rsx! {
                    div { class: "settings-row",
                        span { "Sound effects" }
                        button {
                            class: "primary",
                            onclick: on_toggle,
                            if settings.sound_enabled() { "On" } else { "Off" }
                        }
                    }
                },
                _ => rsx! {
                    p { "Loading settings..." }
                },
            }
        }
    }
}
