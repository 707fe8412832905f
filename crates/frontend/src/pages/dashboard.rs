use dioxus::html::input_data::keyboard_types::{Key, Modifiers};
use dioxus::prelude::*;
use solscout_shared::store::AppState;

use crate::components::help_overlay::HelpOverlay;
use crate::components::map_view::MapView;
use crate::components::scanner::Scanner;
use crate::components::sidebar::Sidebar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shortcut {
    ToggleHelp,
    CloseHelp,
    ToggleDraw,
    UndoPoint,
    FinishDraw,
}

fn shortcut_for(key: &Key, ctrl: bool) -> Option<Shortcut> {
    match key {
        Key::Escape => Some(Shortcut::CloseHelp),
        Key::Enter => Some(Shortcut::FinishDraw),
        Key::Character(c) => match (c.to_ascii_lowercase().as_str(), ctrl) {
            ("z", true) => Some(Shortcut::UndoPoint),
            ("h" | "?", false) => Some(Shortcut::ToggleHelp),
            ("d", false) => Some(Shortcut::ToggleDraw),
            _ => None,
        },
        _ => None,
    }
}

#[component]
pub fn Dashboard() -> Element {
    // All dashboard state lives here; children get the signal
    let mut app = use_signal(AppState::default);
    let mut show_help = use_signal(|| false);

    let scanning = app.read().is_scanning();

    rsx! {
        div {
            class: "app",
            tabindex: "0",
            onkeydown: move |evt: Event<KeyboardData>| {
                let ctrl = evt.modifiers().contains(Modifiers::CONTROL)
                    || evt.modifiers().contains(Modifiers::META);
                let Some(shortcut) = shortcut_for(&evt.key(), ctrl) else {
                    return;
                };
                evt.prevent_default();
                match shortcut {
                    Shortcut::ToggleHelp => {
                        let open = *show_help.read();
                        show_help.set(!open);
                    }
                    Shortcut::CloseHelp => show_help.set(false),
                    Shortcut::ToggleDraw => app.write().toggle_draw_mode(),
                    Shortcut::UndoPoint => app.write().undo_draw_point(),
                    Shortcut::FinishDraw => {
                        app.write().finish_draw();
                    }
                }
            },

            Sidebar { app: app, show_help: show_help }

            div { class: "map-area",
                MapView { app: app }
                Scanner { active: scanning }
            }

            HelpOverlay { show: show_help }
        }
    }
}
