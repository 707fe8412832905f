use solscout_shared::mercator;
use solscout_shared::models::{LatLng, ViewState};

/// Logical size of the satellite image; the overlay uses the same space.
pub const MAP_WIDTH_PX: f64 = 1024.0;
pub const MAP_HEIGHT_PX: f64 = 768.0;

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

/// Scale from rendered container pixels to map-image pixels.
///
/// The image renders with `width:100%; height:auto`, so both axes share the
/// factor `MAP_WIDTH_PX / container_w`.
pub fn container_scale(container_w: f64) -> Option<f64> {
    if container_w <= 0.0 {
        return None;
    }
    Some(MAP_WIDTH_PX / container_w)
}

/// Container-relative coordinates to native map-image pixels.
pub fn container_to_map_px(
    container_x: f64,
    container_y: f64,
    container_w: f64,
) -> Option<(f64, f64)> {
    let scale = container_scale(container_w)?;
    let x = (container_x * scale).clamp(0.0, MAP_WIDTH_PX);
    let y = (container_y * scale).clamp(0.0, MAP_HEIGHT_PX);
    Some((x, y))
}

/// Map-image pixel to a position for the image rendered from `view`.
pub fn map_px_to_latlng(view: &ViewState, x: f64, y: f64) -> LatLng {
    mercator::screen_to_latlng(view, x, y, MAP_WIDTH_PX, MAP_HEIGHT_PX)
}

/// Position to map-image pixel; may fall outside the image.
pub fn latlng_to_map_px(view: &ViewState, pos: LatLng) -> (f64, f64) {
    mercator::latlng_to_screen(view, pos, MAP_WIDTH_PX, MAP_HEIGHT_PX)
}

/// Resolve a click inside the element `container_id` to a position.
pub fn click_to_latlng(
    client_x: f64,
    client_y: f64,
    container_id: &str,
    view: &ViewState,
) -> Option<LatLng> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(container_id)?;
    let rect = element.get_bounding_client_rect();

    let (cx, cy) = client_to_container(client_x, client_y, rect.left(), rect.top());
    let (x, y) = container_to_map_px(cx, cy, rect.width())?;
    Some(map_px_to_latlng(view, x, y))
}

/// Format a position for the coordinate readout.
pub fn format_latlng(pos: LatLng) -> String {
    let ns = if pos.lat >= 0.0 { 'N' } else { 'S' };
    let ew = if pos.lng >= 0.0 { 'E' } else { 'W' };
    format!("{:.5}°{} {:.5}°{}", pos.lat.abs(), ns, pos.lng.abs(), ew)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_to_container_origin() {
        let (x, y) = client_to_container(100.0, 200.0, 100.0, 200.0);
        assert!((x - 0.0).abs() < 1e-9);
        assert!((y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_client_to_container_offset() {
        let (x, y) = client_to_container(450.0, 350.0, 320.0, 50.0);
        assert!((x - 130.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_container_to_map_px_half_width() {
        // Rendered at 512 px wide: every container pixel is two image pixels
        let (x, y) = container_to_map_px(256.0, 192.0, 512.0).unwrap();
        assert!((x - 512.0).abs() < 1e-9);
        assert!((y - 384.0).abs() < 1e-9);
    }

    #[test]
    fn test_container_to_map_px_clamps() {
        let (x, y) = container_to_map_px(-10.0, 5000.0, 1024.0).unwrap();
        assert_eq!(x, 0.0);
        assert_eq!(y, MAP_HEIGHT_PX);
    }

    #[test]
    fn test_container_to_map_px_invalid_container() {
        assert!(container_to_map_px(10.0, 10.0, 0.0).is_none());
    }

    #[test]
    fn test_image_center_is_view_center() {
        let view = ViewState::default();
        let pos = map_px_to_latlng(&view, MAP_WIDTH_PX / 2.0, MAP_HEIGHT_PX / 2.0);
        assert!((pos.lat - view.latitude).abs() < 1e-9);
        assert!((pos.lng - view.longitude).abs() < 1e-9);
    }

    #[test]
    fn test_map_px_round_trip() {
        let view = ViewState {
            zoom: 19.0,
            ..ViewState::default()
        };
        let pos = map_px_to_latlng(&view, 100.0, 700.0);
        let (x, y) = latlng_to_map_px(&view, pos);
        assert!((x - 100.0).abs() < 1e-6);
        assert!((y - 700.0).abs() < 1e-6);
    }

    #[test]
    fn test_format_latlng() {
        assert_eq!(
            format_latlng(LatLng::new(43.238949, 76.889709)),
            "43.23895°N 76.88971°E"
        );
        assert_eq!(format_latlng(LatLng::new(-33.9, -70.1)), "33.90000°S 70.10000°W");
    }
}
