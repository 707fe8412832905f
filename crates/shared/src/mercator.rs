//! Web Mercator math for the satellite view.
//!
//! World pixels use 512-px tiles, matching the static imagery API, so a view
//! at zoom `z` spans `512 * 2^z` pixels around the globe.

use std::f64::consts::PI;

use crate::models::{LatLng, ViewState};

pub const TILE_SIZE: f64 = 512.0;
pub const MIN_ZOOM: f64 = 3.0;
pub const MAX_ZOOM: f64 = 21.0;
/// Latitude where the square Mercator world ends.
pub const MAX_LATITUDE: f64 = 85.05112878;

const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Position to world pixel coordinates at `zoom`.
pub fn project(pos: LatLng, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = pos.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (pos.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0 * size;
    (x, y)
}

/// World pixel coordinates at `zoom` back to a position.
pub fn unproject(x: f64, y: f64, zoom: f64) -> LatLng {
    let size = world_size(zoom);
    let lng = x / size * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y / size)).sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

/// Container pixel (origin top-left) to a position, for a `width` x `height`
/// view centred on `view`.
pub fn screen_to_latlng(view: &ViewState, px: f64, py: f64, width: f64, height: f64) -> LatLng {
    let (cx, cy) = project(view.center(), view.zoom);
    unproject(cx + px - width / 2.0, cy + py - height / 2.0, view.zoom)
}

/// Position to container pixel; may fall outside the container.
pub fn latlng_to_screen(view: &ViewState, pos: LatLng, width: f64, height: f64) -> (f64, f64) {
    let (cx, cy) = project(view.center(), view.zoom);
    let (x, y) = project(pos, view.zoom);
    (x - cx + width / 2.0, y - cy + height / 2.0)
}

/// Ground resolution at `lat`.
pub fn meters_per_pixel(lat: f64, zoom: f64) -> f64 {
    EARTH_CIRCUMFERENCE_M * lat.to_radians().cos() / world_size(zoom)
}

/// Move the view so the content shifts by `(dx, dy)` screen pixels.
pub fn pan(view: ViewState, dx: f64, dy: f64) -> ViewState {
    let (cx, cy) = project(view.center(), view.zoom);
    let center = unproject(cx - dx, cy - dy, view.zoom);
    let lng = (center.lng + 540.0).rem_euclid(360.0) - 180.0;
    ViewState {
        latitude: center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
        longitude: lng,
        ..view
    }
}

/// Change zoom by `delta` levels, kept within `[MIN_ZOOM, MAX_ZOOM]`.
pub fn zoom_by(view: ViewState, delta: f64) -> ViewState {
    ViewState {
        zoom: clamp_zoom(view.zoom + delta),
        ..view
    }
}
