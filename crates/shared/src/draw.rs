use crate::models::{LatLng, Ring};

/// Minimum vertices before a drawn outline can be closed.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Points collected while the user traces a roof outline by hand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawState {
    points: Vec<LatLng>,
    active: bool,
}

impl DrawState {
    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Append a point. Ignored unless drawing is active.
    pub fn push(&mut self, point: LatLng) -> bool {
        if !self.active {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Drop the most recent point; no-op when empty.
    pub fn undo(&mut self) -> Option<LatLng> {
        self.points.pop()
    }

    /// Back to idle with no points.
    pub fn clear(&mut self) {
        self.points.clear();
        self.active = false;
    }

    pub fn can_close(&self) -> bool {
        self.points.len() >= MIN_POLYGON_POINTS
    }

    /// The closed ring, if there are enough points.
    pub fn closed_ring(&self) -> Option<Ring> {
        Ring::close(&self.points)
    }
}
