use thiserror::Error;

use crate::area;
use crate::calc;
use crate::draw::DrawState;
use crate::models::{AnalysisResult, FlyTo, LatLng, Provenance, Ring, Suggestion, ViewState};

/// Zoom used when flying to a freshly picked location from far out.
pub const DETAIL_ZOOM: f64 = 19.0;
/// Above this zoom a new pick keeps the current zoom.
const DETAIL_ZOOM_THRESHOLD: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Scanning,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnalyzeBlocked {
    #[error("an analysis is already running")]
    AlreadyScanning,
    #[error("clear the manual polygon before analyzing again")]
    ManualResultActive,
}

/// Identifies one scan started by [`AppState::begin_analysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTicket(u64);

/// A scan that has been started and is waiting for its result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingScan {
    pub ticket: ScanTicket,
    pub target: LatLng,
}

/// What a click on the map did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    DrawPoint,
    Marker(FlyTo),
}

/// All dashboard state, owned by one controller and changed only through
/// these methods.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    view: ViewState,
    marker: Option<LatLng>,
    status: AnalysisStatus,
    source: Option<Provenance>,
    result: Option<AnalysisResult>,
    draw: DrawState,
    draw_polygon: Option<(Ring, f64)>,
    fly_to: Option<FlyTo>,
    // Bumped by every scan start, clear and finished outline
    scan_generation: u64,
}

impl AppState {
    // --- selectors ---

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn marker(&self) -> Option<LatLng> {
        self.marker
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn source(&self) -> Option<Provenance> {
        self.source
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// The result only once the analysis has finished.
    pub fn visible_result(&self) -> Option<&AnalysisResult> {
        match self.status {
            AnalysisStatus::Success => self.result.as_ref(),
            _ => None,
        }
    }

    pub fn draw(&self) -> &DrawState {
        &self.draw
    }

    /// The finished manual outline and its area in m².
    pub fn draw_polygon(&self) -> Option<(&Ring, f64)> {
        self.draw_polygon.as_ref().map(|(ring, area)| (ring, *area))
    }

    pub fn is_scanning(&self) -> bool {
        self.status == AnalysisStatus::Scanning
    }

    pub fn can_analyze(&self) -> bool {
        !self.is_scanning() && self.source != Some(Provenance::Manual)
    }

    pub fn can_finish_draw(&self) -> bool {
        self.draw.is_active() && self.draw.can_close()
    }

    pub fn analyze_label(&self) -> &'static str {
        if self.is_scanning() {
            "Scanning..."
        } else if self.source == Some(Provenance::Manual) {
            "Manual Polygon Active"
        } else {
            "Analyze Rooftop"
        }
    }

    /// Where an analysis would run: the marker, else the view centre.
    pub fn analysis_target(&self) -> LatLng {
        self.marker.unwrap_or_else(|| self.view.center())
    }

    // --- view / marker ---

    pub fn set_view_state(&mut self, view: ViewState) {
        self.view = view;
    }

    fn fly_to_zoom(&self) -> f64 {
        if self.view.zoom > DETAIL_ZOOM_THRESHOLD {
            self.view.zoom
        } else {
            DETAIL_ZOOM
        }
    }

    /// Drop the marker at `position` and queue a camera move there.
    pub fn place_marker(&mut self, position: LatLng) -> FlyTo {
        self.marker = Some(position);
        let target = FlyTo {
            lat: position.lat,
            lng: position.lng,
            zoom: self.fly_to_zoom(),
        };
        self.fly_to = Some(target);
        target
    }

    pub fn select_suggestion(&mut self, suggestion: &Suggestion) -> FlyTo {
        self.place_marker(suggestion.position())
    }

    pub fn pending_fly_to(&self) -> Option<FlyTo> {
        self.fly_to
    }

    /// Consume the pending camera move, if any.
    pub fn take_fly_to(&mut self) -> Option<FlyTo> {
        self.fly_to.take()
    }

    /// Route a map click to the draw workflow or the marker.
    pub fn handle_map_click(&mut self, position: LatLng) -> ClickOutcome {
        if self.draw.push(position) {
            ClickOutcome::DrawPoint
        } else {
            ClickOutcome::Marker(self.place_marker(position))
        }
    }

    // --- remote analysis ---

    /// Enter the scanning state and return the coordinates to analyze,
    /// tagged with the ticket its result must be delivered with.
    pub fn begin_analysis(&mut self) -> Result<PendingScan, AnalyzeBlocked> {
        if self.is_scanning() {
            return Err(AnalyzeBlocked::AlreadyScanning);
        }
        if self.source == Some(Provenance::Manual) {
            return Err(AnalyzeBlocked::ManualResultActive);
        }
        self.status = AnalysisStatus::Scanning;
        self.source = Some(Provenance::Ai);
        self.result = None;
        Ok(PendingScan {
            ticket: self.next_scan_ticket(),
            target: self.analysis_target(),
        })
    }

    fn next_scan_ticket(&mut self) -> ScanTicket {
        self.scan_generation += 1;
        ScanTicket(self.scan_generation)
    }

    /// Show the result of the scan identified by `ticket`.
    ///
    /// Returns `false` and drops the result unless it belongs to the scan
    /// currently running. Results of scans superseded by a clear, a finished
    /// outline or a newer scan are never shown.
    pub fn complete_analysis(&mut self, ticket: ScanTicket, result: AnalysisResult) -> bool {
        if !self.is_scanning() || ticket != ScanTicket(self.scan_generation) {
            return false;
        }
        self.show_result(result);
        true
    }

    fn show_result(&mut self, result: AnalysisResult) {
        self.source = Some(result.provenance);
        self.result = Some(result);
        self.status = AnalysisStatus::Success;
    }

    // --- manual draw ---

    pub fn toggle_draw_mode(&mut self) {
        let active = self.draw.is_active();
        self.draw.set_active(!active);
    }

    pub fn undo_draw_point(&mut self) {
        self.draw.undo();
    }

    /// Reset drawing and any analysis result.
    pub fn clear_draw(&mut self) {
        self.draw.clear();
        self.draw_polygon = None;
        self.source = None;
        self.status = AnalysisStatus::Idle;
        self.result = None;
        self.next_scan_ticket();
    }

    /// Close the drawn outline and estimate from its area.
    ///
    /// Returns `None` and changes nothing unless drawing is active with at
    /// least 3 points. The traced points are consumed into the outline.
    pub fn finish_draw(&mut self) -> Option<&AnalysisResult> {
        if !self.draw.is_active() {
            return None;
        }
        let ring = self.draw.closed_ring()?;
        let area = area::ring_area_sqm(&ring);
        let estimate = calc::try_estimate(area).ok()?;

        self.draw_polygon = Some((ring.clone(), area));
        self.draw.clear();
        self.next_scan_ticket();
        self.show_result(AnalysisResult {
            estimate,
            polygon: ring,
            provenance: Provenance::Manual,
        });
        self.result.as_ref()
    }
}
