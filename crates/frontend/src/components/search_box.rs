use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use solscout_shared::models::Suggestion;
use solscout_shared::store::AppState;
use solscout_shared::suggest::{self, LookupGate, DEBOUNCE_MS};

use crate::api;

/// Address search with debounced autocomplete.
#[component]
pub fn SearchBox(app: Signal<AppState>) -> Element {
    let mut app = app;
    let mut query = use_signal(String::new);
    let mut suggestions = use_signal(Vec::<Suggestion>::new);
    let gate = use_hook(LookupGate::new);

    let select_gate = gate.clone();
    let list = suggestions.read().clone();

    rsx! {
        div { class: "panel search-panel",
            h3 { "Find a Building" }
            input {
                class: "search-input",
                r#type: "text",
                placeholder: "Search address...",
                value: "{query}",
                // Typing must not trigger the dashboard shortcuts
                onkeydown: move |evt: Event<KeyboardData>| evt.stop_propagation(),
                oninput: move |evt: Event<FormData>| {
                    let raw = evt.value();
                    query.set(raw.clone());

                    // Any keystroke supersedes lookups still in flight
                    let ticket = gate.next_ticket();
                    let Some(q) = suggest::normalize_query(&raw).map(str::to_string) else {
                        suggestions.set(Vec::new());
                        return;
                    };

                    let gate = gate.clone();
                    spawn(async move {
                        let delay = TimeoutFuture::new(DEBOUNCE_MS);
                        let result =
                            suggest::debounced_lookup(&gate, ticket, delay, || api::fetch_suggestions(&q))
                                .await;
                        if let Some(found) = result {
                            suggestions.set(found);
                        }
                    });
                },
            }

            if !list.is_empty() {
                ul { class: "suggestions",
                    for s in list {
                        {
                            let id = s.id.clone();
                            let label = s.place_name.clone();
                            let gate = select_gate.clone();
                            rsx! {
                                li {
                                    key: "{id}",
                                    class: "suggestion",
                                    onclick: move |_| {
                                        gate.next_ticket();
                                        app.write().select_suggestion(&s);
                                        query.set(s.place_name.clone());
                                        suggestions.set(Vec::new());
                                    },
                                    "{label}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
