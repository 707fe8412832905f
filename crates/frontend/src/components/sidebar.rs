use dioxus::prelude::*;
use solscout_shared::format::with_unit;
use solscout_shared::store::AppState;

use crate::api;
use crate::components::result_grid::ResultGrid;
use crate::components::search_box::SearchBox;
use crate::coords;

/// Start an analysis at the marker (or view centre) and show the result
/// once it lands. Ignored while blocked.
fn start_analysis(mut app: Signal<AppState>) {
    let scan = match app.write().begin_analysis() {
        Ok(scan) => scan,
        Err(_) => return,
    };
    spawn(async move {
        let result = api::analyze_rooftop(scan.target).await;
        app.write().complete_analysis(scan.ticket, result);
    });
}

#[component]
pub fn Sidebar(app: Signal<AppState>, show_help: Signal<bool>) -> Element {
    let mut app = app;
    let mut show_help = show_help;

    let state = app.read();
    let can_analyze = state.can_analyze();
    let analyze_label = state.analyze_label();
    let drawing = state.draw().is_active();
    let point_count = state.draw().points().len();
    let can_finish = state.can_finish_draw();
    let manual_area = state.draw_polygon().map(|(_, area)| with_unit(area, "m²"));
    let target = coords::format_latlng(state.analysis_target());
    let target_kind = if state.marker().is_some() { "Marker" } else { "Map centre" };
    let result = state.visible_result().cloned();
    drop(state);

    rsx! {
        div { class: "sidebar",
            div { class: "sidebar-header",
                h1 { "Sol-Scout" }
                button {
                    class: "help-button",
                    title: "Help (H)",
                    onclick: move |_| {
                        let open = *show_help.read();
                        show_help.set(!open);
                    },
                    "?"
                }
            }

            SearchBox { app: app }

            div { class: "panel",
                h3 { "Rooftop Analysis" }
                p { class: "target-readout", "{target_kind}: {target}" }
                button {
                    class: "analyze-button",
                    disabled: !can_analyze,
                    onclick: move |_| start_analysis(app),
                    "{analyze_label}"
                }
            }

            div { class: "panel draw-panel",
                h3 { "Manual Outline" }
                div { class: "draw-controls",
                    button {
                        class: if drawing { "active-draw" } else { "" },
                        onclick: move |_| app.write().toggle_draw_mode(),
                        if drawing { "Stop Drawing" } else { "Draw Roof" }
                    }
                    button {
                        disabled: point_count == 0,
                        onclick: move |_| app.write().undo_draw_point(),
                        "Undo"
                    }
                    button {
                        onclick: move |_| app.write().clear_draw(),
                        "Clear"
                    }
                    button {
                        class: "finish-button",
                        disabled: !can_finish,
                        onclick: move |_| {
                            app.write().finish_draw();
                        },
                        "Finish"
                    }
                }
                p { class: "draw-status",
                    if let Some(area) = manual_area {
                        "Outline closed: {area}"
                    } else if drawing {
                        "{point_count} point(s) placed"
                    } else {
                        "Trace the roof by hand when detection misses it."
                    }
                }
            }

            if let Some(result) = result {
                ResultGrid { result: result }
            }
        }
    }
}
