use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use solscout_shared::mercator;
use solscout_shared::models::{LatLng, Provenance, Ring, ViewState};
use solscout_shared::store::AppState;

use crate::api;
use crate::coords::{self, MAP_HEIGHT_PX, MAP_WIDTH_PX};

const MAP_CONTAINER_ID: &str = "solar-map-container";

/// Drag threshold in pixels; movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Zoom levels per wheel notch.
const ZOOM_STEP: f64 = 1.0;

/// Ground length shown by the scale bar.
const SCALE_BAR_PX: f64 = 100.0;

const DETECTED_STROKE: &str = "#22d3ee";
const DETECTED_FILL: &str = "rgba(34,211,238,0.25)";
const MANUAL_STROKE: &str = "#f97316";
const MANUAL_FILL: &str = "rgba(249,115,22,0.3)";
const MARKER_FILL: &str = "#ef4444";

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

/// Get the bounding client rect of the map container element.
fn container_rect() -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(MAP_CONTAINER_ID)?;
    Some(element.get_bounding_client_rect())
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

// ---------------------------------------------------------------------------
// SVG overlay (pure string building, unit tested)
// ---------------------------------------------------------------------------

fn points_attr(view: &ViewState, points: &[LatLng]) -> String {
    points
        .iter()
        .map(|p| {
            let (x, y) = coords::latlng_to_map_px(view, *p);
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_polygon(svg: &mut String, view: &ViewState, ring: &Ring, stroke: &str, fill: &str) {
    svg.push_str(&format!(
        r#"<polygon points="{}" fill="{fill}" stroke="{stroke}" stroke-width="3" stroke-linejoin="round"/>"#,
        points_attr(view, ring.points())
    ));
}

/// The outline being traced: a dashed line through the points plus a dot
/// on each vertex.
fn build_draw_path(svg: &mut String, view: &ViewState, points: &[LatLng]) {
    if points.len() >= 2 {
        svg.push_str(&format!(
            r#"<polyline points="{}" fill="none" stroke="{MANUAL_STROKE}" stroke-width="2" stroke-dasharray="6 4"/>"#,
            points_attr(view, points)
        ));
    }
    for p in points {
        let (x, y) = coords::latlng_to_map_px(view, *p);
        svg.push_str(&format!(
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="5" fill="{MANUAL_STROKE}" stroke="white" stroke-width="2"/>"#
        ));
    }
}

fn build_marker(svg: &mut String, view: &ViewState, pos: LatLng) {
    let (x, y) = coords::latlng_to_map_px(view, pos);
    // Pin with its tip on the position
    svg.push_str(&format!(
        r#"<path d="M {x:.1} {y:.1} l -9 -16 a 10 10 0 1 1 18 0 z" fill="{MARKER_FILL}" stroke="white" stroke-width="2"/>"#
    ));
    svg.push_str(&format!(
        r#"<circle cx="{x:.1}" cy="{:.1}" r="3.5" fill="white"/>"#,
        y - 22.0
    ));
}

/// Overlay content in map-image pixel space.
///
/// The detected outline is hidden while a manual outline exists.
fn build_svg_content(
    view: &ViewState,
    detected: Option<&Ring>,
    manual: Option<&Ring>,
    draw_points: &[LatLng],
    marker: Option<LatLng>,
) -> String {
    let mut svg = String::with_capacity(2048);

    match (manual, detected) {
        (Some(ring), _) => build_polygon(&mut svg, view, ring, MANUAL_STROKE, MANUAL_FILL),
        (None, Some(ring)) => build_polygon(&mut svg, view, ring, DETECTED_STROKE, DETECTED_FILL),
        (None, None) => {}
    }
    build_draw_path(&mut svg, view, draw_points);
    if let Some(pos) = marker {
        build_marker(&mut svg, view, pos);
    }

    svg
}

/// Scale bar caption for `SCALE_BAR_PX` image pixels at the view centre.
fn scale_label(view: &ViewState) -> String {
    let meters = mercator::meters_per_pixel(view.latitude, view.zoom) * SCALE_BAR_PX;
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{:.0} m", meters)
    }
}

#[component]
pub fn MapView(app: Signal<AppState>) -> Element {
    // Signal is Copy; handlers below write through their own copies
    let mut app = app;

    // Apply camera moves requested by marker placement or search
    use_effect(move || {
        if app.read().pending_fly_to().is_none() {
            return;
        }
        let mut state = app.write();
        if let Some(fly) = state.take_fly_to() {
            let view = state
                .view()
                .centered_on(LatLng::new(fly.lat, fly.lng), mercator::clamp_zoom(fly.zoom));
            state.set_view_state(view);
        }
    });

    // Drag state (mouse)
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start = use_signal(|| (0.0_f64, 0.0_f64));
    let mut drag_offset = use_signal(|| (0.0_f64, 0.0_f64));

    let svg_html = use_memo(move || {
        let state = app.read();
        let view = state.view();
        let detected = state
            .visible_result()
            .filter(|r| r.provenance == Provenance::Ai)
            .map(|r| &r.polygon);
        let manual = state.draw_polygon().map(|(ring, _)| ring);

        let svg_content = build_svg_content(
            &view,
            detected,
            manual,
            state.draw().points(),
            state.marker(),
        );
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {MAP_WIDTH_PX} {MAP_HEIGHT_PX}" preserveAspectRatio="none" style="position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;z-index:5;">{svg_content}</svg>"#
        )
    });

    let state = app.read();
    let view = state.view();
    let drawing = state.draw().is_active();
    let marker_readout = state.marker().map(coords::format_latlng);
    drop(state);

    let image_url = api::mapbox_token().map(|token| {
        api::static_map_url(&view, MAP_WIDTH_PX as u32, MAP_HEIGHT_PX as u32, token)
    });

    let (off_x, off_y) = *drag_offset.read();
    let transform_style = format!("transform: translate({off_x}px, {off_y}px);");
    let container_class = if *is_dragging.read() && *did_drag.read() {
        "map-container dragging"
    } else if drawing {
        "map-container drawing"
    } else {
        "map-container"
    };
    let scale = scale_label(&view);
    let zoom_label = format!("z{:.0}", view.zoom);

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let delta_y = wheel_delta_y(evt.data().delta());
                if delta_y == 0.0 {
                    return;
                }
                let step = if delta_y < 0.0 { ZOOM_STEP } else { -ZOOM_STEP };
                let mut state = app.write();
                let zoomed = mercator::zoom_by(state.view(), step);
                state.set_view_state(zoomed);
            },

            onmousedown: move |evt: Event<MouseData>| {
                // Only track drag/click for left mouse button
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                is_dragging.set(true);
                did_drag.set(false);
                drag_start.set((client.x, client.y));
                drag_offset.set((0.0, 0.0));
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !*is_dragging.read() {
                    return;
                }
                let client = evt.client_coordinates();
                let (sx, sy) = *drag_start.read();
                let (dx, dy) = (client.x - sx, client.y - sy);

                if !*did_drag.read() && (dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    drag_offset.set((dx, dy));
                }
            },

            onmouseup: move |evt: Event<MouseData>| {
                let was_dragging = *is_dragging.read();
                let was_drag = *did_drag.read();
                is_dragging.set(false);
                if !was_dragging {
                    return;
                }

                if was_drag {
                    // Commit the pan: shift the centre by the dragged distance
                    let (dx, dy) = *drag_offset.read();
                    drag_offset.set((0.0, 0.0));
                    let Some(scale) = container_rect().and_then(|r| coords::container_scale(r.width())) else {
                        return;
                    };
                    let mut state = app.write();
                    let panned = mercator::pan(state.view(), dx * scale, dy * scale);
                    state.set_view_state(panned);
                    return;
                }

                // A mouseup without drag movement = a click
                let client = evt.client_coordinates();
                let view = app.read().view();
                if let Some(pos) = coords::click_to_latlng(client.x, client.y, MAP_CONTAINER_ID, &view) {
                    app.write().handle_map_click(pos);
                }
            },

            onmouseleave: move |_| {
                is_dragging.set(false);
                drag_offset.set((0.0, 0.0));
            },

            // Inner wrapper: the drag offset moves image and overlay together
            div {
                class: "map-inner",
                style: "{transform_style}",

                if let Some(url) = image_url {
                    img { src: "{url}", draggable: "false", alt: "Satellite view" }
                } else {
                    div { class: "map-placeholder",
                        "Set MAPBOX_TOKEN at build time to load satellite imagery."
                    }
                }

                div {
                    dangerous_inner_html: "{svg_html}",
                    style: "position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;",
                }
            }

            // Readouts (outside the transform so they stay fixed)
            div { class: "coord-readout",
                span { class: "coord-tag", "{zoom_label}" }
                span { class: "coord-tag scale-tag", "{scale} / {SCALE_BAR_PX} px" }
                if let Some(text) = marker_readout {
                    span { class: "coord-tag marker-tag", "{text}" }
                }
                if drawing {
                    span { class: "coord-tag draw-tag", "Click to add outline points" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solscout_shared::calc;

    fn view() -> ViewState {
        ViewState {
            zoom: 19.0,
            ..ViewState::default()
        }
    }

    fn square() -> Ring {
        calc::synthetic_square(view().center())
    }

    #[test]
    fn test_empty_overlay() {
        assert!(build_svg_content(&view(), None, None, &[], None).is_empty());
    }

    #[test]
    fn test_detected_polygon_drawn_in_cyan() {
        let ring = square();
        let svg = build_svg_content(&view(), Some(&ring), None, &[], None);
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert!(svg.contains(DETECTED_STROKE));
    }

    #[test]
    fn test_manual_polygon_hides_detected() {
        let ring = square();
        let svg = build_svg_content(&view(), Some(&ring), Some(&ring), &[], None);
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert!(svg.contains(MANUAL_STROKE));
        assert!(!svg.contains(DETECTED_STROKE));
    }

    #[test]
    fn test_polygon_is_centred_in_image() {
        let ring = square();
        let svg = build_svg_content(&view(), Some(&ring), None, &[], None);
        // A 0.0002 deg square spans roughly 150 x 200 image px at zoom 19
        let attr = svg.split("points=\"").nth(1).unwrap().split('"').next().unwrap();
        for pair in attr.split(' ') {
            let (x, y) = pair.split_once(',').unwrap();
            let (x, y): (f64, f64) = (x.parse().unwrap(), y.parse().unwrap());
            assert!((x - MAP_WIDTH_PX / 2.0).abs() < 120.0, "x = {x}");
            assert!((y - MAP_HEIGHT_PX / 2.0).abs() < 120.0, "y = {y}");
        }
    }

    #[test]
    fn test_draw_path_needs_two_points_for_line() {
        let c = view().center();
        let one = build_svg_content(&view(), None, None, &[c], None);
        assert_eq!(one.matches("<circle").count(), 1);
        assert!(!one.contains("<polyline"));

        let two = build_svg_content(&view(), None, None, &[c, LatLng::new(c.lat, c.lng + 0.0001)], None);
        assert_eq!(two.matches("<circle").count(), 2);
        assert!(two.contains("<polyline"));
    }

    #[test]
    fn test_marker_pin() {
        let svg = build_svg_content(&view(), None, None, &[], Some(view().center()));
        assert!(svg.contains(MARKER_FILL));
        assert!(svg.contains("M 512.0 384.0"));
    }

    #[test]
    fn test_scale_label_units() {
        assert!(scale_label(&view()).ends_with(" m"));
        let far = ViewState {
            zoom: 5.0,
            ..ViewState::default()
        };
        assert!(scale_label(&far).ends_with(" km"));
    }
}
