use dioxus::prelude::*;

#[component]
pub fn HelpOverlay(show: Signal<bool>) -> Element {
    if !*show.read() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "help-overlay-backdrop",
            onclick: move |_| show.set(false),

            div {
                class: "help-overlay",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),

                h2 { "Help" }

                // --- Keyboard shortcuts ---

                div { class: "shortcut-section",
                    h3 { "Drawing" }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "D" } }
                        span { "Toggle draw mode" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "Ctrl" } "+" kbd { "Z" } }
                        span { "Remove last outline point" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "Enter" } }
                        span { "Finish outline (3+ points)" }
                    }
                }

                div { class: "shortcut-section",
                    h3 { "Help" }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "H" } " / " kbd { "?" } }
                        span { "Toggle this help" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "Esc" } }
                        span { "Close help" }
                    }
                }

                // --- How the estimate works ---

                div { class: "help-divider" }

                h2 { class: "help-section-title", "How the Estimate Works" }

                div { class: "help-info-section",
                    h3 { "System Size" }
                    p { "Roof area in m\u{00b2} times 18% panel efficiency gives the installable capacity in kW." }
                }

                div { class: "help-info-section",
                    h3 { "Annual Energy" }
                    p { "Capacity \u{00d7} 4.5 peak sun hours \u{00d7} 365 days, less 14% system losses (inverter, wiring, soiling)." }
                }

                div { class: "help-info-section",
                    h3 { "Savings, CO2 and ROI" }
                    p { "Savings price each kWh at $0.12. CO2 reduction assumes 0.5 kg per kWh. The payback period divides a $1,200/kW installation cost by the yearly savings. Panel count assumes 1.7 m\u{00b2} per panel." }
                }

                div { class: "help-info-section",
                    h3 { "AI Detection" }
                    p { "Analyze Rooftop asks the analysis service for the roof under the marker (or the map centre). If the service cannot answer, a 450 m\u{00b2} placeholder roof is used so you always get an estimate." }
                }

                div { class: "help-info-section",
                    h3 { "Manual Outline" }
                    p { "Turn on draw mode, click each roof corner, then finish. The area is measured on the globe and replaces any detected result until you clear the outline." }
                }

                div { class: "help-info-section",
                    h3 { "Map Interactions" }
                    p { "Click to drop the marker, drag to pan, scroll to zoom. Search for an address to fly there." }
                }

                button {
                    class: "close-help",
                    onclick: move |_| show.set(false),
                    "Close"
                }
            }
        }
    }
}
