use dioxus::prelude::*;

/// Full-map overlay shown while an analysis is running.
#[component]
pub fn Scanner(active: bool) -> Element {
    if !active {
        return rsx! {};
    }

    rsx! {
        div { class: "scanner-overlay",
            div { class: "scanner-grid" }
            div { class: "scanner-beam" }
            div { class: "scanner-caption",
                span { class: "scanner-dot" }
                "Analyzing rooftop geometry..."
            }
        }
    }
}
