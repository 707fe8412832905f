//! Remote rooftop analysis with a guaranteed local answer.
//!
//! The remote service may be slow, down, or return only part of the
//! figures. [`derive_analysis_result`] always produces an `Ai` result and never
//! resolves before the caller's latency floor.

use std::future::Future;

use futures::future;
use thiserror::Error;

use crate::calc;
use crate::models::{AnalysisResult, AnalyzeRequest, AnalyzeResponse, LatLng, Provenance};

/// Roof area assumed when the service cannot be reached.
pub const DEFAULT_ROOF_AREA_SQM: f64 = 450.0;

/// Minimum time between starting an analysis and showing its result.
pub const DEFAULT_MIN_LATENCY_MS: u32 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("analysis service returned status {0}")]
    Status(u16),
    #[error("could not decode analysis response: {0}")]
    Decode(String),
    #[error("analysis service is not configured")]
    Unavailable,
}

/// The remote half of an analysis. Implemented over HTTP in the browser.
#[allow(async_fn_in_trait)]
pub trait AnalysisService {
    async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalyzeResponse, AnalysisError>;
}

/// Service used when no endpoint is configured; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAnalysis;

impl AnalysisService for OfflineAnalysis {
    async fn analyze(&self, _request: AnalyzeRequest) -> Result<AnalyzeResponse, AnalysisError> {
        Err(AnalysisError::Unavailable)
    }
}

/// Fully local result: default roof area and a placeholder square.
pub fn fallback_result(center: LatLng) -> AnalysisResult {
    AnalysisResult {
        estimate: calc::estimate(DEFAULT_ROOF_AREA_SQM),
        polygon: calc::synthetic_square(center),
        provenance: Provenance::Ai,
    }
}

/// Combine a (possibly partial) service response with local defaults.
///
/// Energy, savings and CO2 are taken from the response when present. System
/// size, panel count and payback stay locally computed from the area.
pub fn merge_response(center: LatLng, response: AnalyzeResponse) -> AnalysisResult {
    let area = response
        .roof_area_sqm
        .filter(|a| a.is_finite() && *a >= 0.0)
        .unwrap_or(0.0);
    let mut estimate = calc::estimate(area);

    if let Some(kwh) = response.annual_kwh {
        estimate.annual_energy_kwh = kwh;
    }
    if let Some(usd) = response.annual_savings_usd {
        estimate.annual_savings_usd = usd;
    }
    if let Some(tons) = response.co2_offset_tons {
        estimate.co2_offset_tons = tons;
    }

    AnalysisResult {
        estimate,
        polygon: response
            .polygon
            .unwrap_or_else(|| calc::synthetic_square(center)),
        provenance: Provenance::Ai,
    }
}

/// Run a rooftop analysis at `center`.
///
/// The service call and `floor` are polled together, so the result is
/// available once both have finished and never earlier than the floor.
/// Service failures are logged and replaced by [`fallback_result`].
pub async fn derive_analysis_result<S, F>(center: LatLng, service: &S, floor: F) -> AnalysisResult
where
    S: AnalysisService,
    F: Future<Output = ()>,
{
    let (outcome, ()) = future::join(service.analyze(AnalyzeRequest::at(center)), floor).await;

    match outcome {
        Ok(response) => {
            tracing::debug!(lat = center.lat, lng = center.lng, "analysis service answered");
            merge_response(center, response)
        }
        Err(e) => {
            tracing::warn!(
                lat = center.lat,
                lng = center.lng,
                error = %e,
                "analysis service failed, using local estimate"
            );
            fallback_result(center)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ring;
    use std::time::Duration;
    use tokio::time::{sleep, Instant};

    const FLOOR: Duration = Duration::from_millis(DEFAULT_MIN_LATENCY_MS as u64);

    struct FakeService {
        delay: Duration,
        outcome: Result<AnalyzeResponse, AnalysisError>,
    }

    impl AnalysisService for FakeService {
        async fn analyze(
            &self,
            _request: AnalyzeRequest,
        ) -> Result<AnalyzeResponse, AnalysisError> {
            sleep(self.delay).await;
            self.outcome.clone()
        }
    }

    fn center() -> LatLng {
        LatLng::new(43.238949, 76.889709)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_success_waits_for_floor() {
        let service = FakeService {
            delay: Duration::from_millis(10),
            outcome: Ok(AnalyzeResponse {
                roof_area_sqm: Some(200.0),
                ..Default::default()
            }),
        };
        let start = Instant::now();
        let result = derive_analysis_result(center(), &service, sleep(FLOOR)).await;
        assert!(start.elapsed() >= FLOOR);
        assert_eq!(result.provenance, Provenance::Ai);
        assert_eq!(result.estimate.roof_area_sqm(), 200.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_still_waits_for_floor() {
        let service = FakeService {
            delay: Duration::from_millis(5),
            outcome: Err(AnalysisError::Status(502)),
        };
        let start = Instant::now();
        let result = derive_analysis_result(center(), &service, sleep(FLOOR)).await;
        assert!(start.elapsed() >= FLOOR);
        assert_eq!(result, fallback_result(center()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_service_still_waits_for_floor() {
        let start = Instant::now();
        let result = derive_analysis_result(center(), &OfflineAnalysis, sleep(FLOOR)).await;
        assert!(start.elapsed() >= FLOOR);
        assert_eq!(result.estimate.roof_area_sqm(), DEFAULT_ROOF_AREA_SQM);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_service_overlaps_floor() {
        let service = FakeService {
            delay: Duration::from_millis(5000),
            outcome: Ok(AnalyzeResponse::default()),
        };
        let start = Instant::now();
        derive_analysis_result(center(), &service, sleep(FLOOR)).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(5000));
        // Timer ran during the call, not after it
        assert!(elapsed < Duration::from_millis(5000) + FLOOR);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lazy_floor_runs_alongside_call() {
        let service = FakeService {
            delay: Duration::from_millis(5000),
            outcome: Ok(AnalyzeResponse::default()),
        };
        let start = Instant::now();
        // Timer not started until first polled
        let floor = async { sleep(FLOOR).await };
        derive_analysis_result(center(), &service, floor).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(5000));
        assert!(elapsed < Duration::from_millis(5000) + FLOOR);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lazy_floor_outlasts_fast_call() {
        let service = FakeService {
            delay: Duration::from_millis(10),
            outcome: Err(AnalysisError::Transport("refused".to_string())),
        };
        let start = Instant::now();
        let floor = async { sleep(FLOOR).await };
        let result = derive_analysis_result(center(), &service, floor).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= FLOOR);
        assert!(elapsed < FLOOR + Duration::from_millis(10));
        assert_eq!(result, fallback_result(center()));
    }

    #[test]
    fn test_fallback_result_shape() {
        let c = center();
        let result = fallback_result(c);
        assert_eq!(result.provenance, Provenance::Ai);
        assert_eq!(result.estimate, calc::estimate(450.0));
        let pts = result.polygon.points();
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], pts[4]);
        let centroid = result.polygon.centroid();
        assert!((centroid.lat - c.lat).abs() <= calc::MOCK_HALF_WIDTH_DEG);
        assert!((centroid.lng - c.lng).abs() <= calc::MOCK_HALF_WIDTH_DEG);
    }

    #[test]
    fn test_merge_overrides_energy_but_not_system_size() {
        let response = AnalyzeResponse {
            roof_area_sqm: Some(450.0),
            annual_kwh: Some(100_000.0),
            ..Default::default()
        };
        let result = merge_response(center(), response);
        assert_eq!(result.estimate.annual_energy_kwh(), 100_000.0);
        assert!((result.estimate.system_size_kw() - 81.0).abs() < 1e-9);
        // Savings not supplied, so stays computed from the area
        assert_eq!(
            result.estimate.annual_savings_usd(),
            calc::estimate(450.0).annual_savings_usd()
        );
    }

    #[test]
    fn test_merge_overrides_savings_and_co2() {
        let response = AnalyzeResponse {
            roof_area_sqm: Some(100.0),
            annual_savings_usd: Some(1234.0),
            co2_offset_tons: Some(9.5),
            roi_years: Some(99.0),
            ..Default::default()
        };
        let result = merge_response(center(), response);
        let local = calc::estimate(100.0);
        assert_eq!(result.estimate.annual_savings_usd(), 1234.0);
        assert_eq!(result.estimate.co2_offset_tons(), 9.5);
        assert_eq!(result.estimate.panel_count(), local.panel_count());
        assert_eq!(result.estimate.roi_years(), local.roi_years());
    }

    #[test]
    fn test_merge_missing_area_defaults_to_zero() {
        let result = merge_response(center(), AnalyzeResponse::default());
        assert_eq!(result.estimate, calc::estimate(0.0));
        assert_eq!(result.polygon, calc::synthetic_square(center()));
    }

    #[test]
    fn test_merge_ignores_negative_area() {
        let response = AnalyzeResponse {
            roof_area_sqm: Some(-20.0),
            ..Default::default()
        };
        let result = merge_response(center(), response);
        assert_eq!(result.estimate.roof_area_sqm(), 0.0);
    }

    #[test]
    fn test_merge_uses_response_polygon() {
        let ring = Ring::close(&[
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 2.0),
            LatLng::new(2.0, 2.0),
        ])
        .unwrap();
        let response = AnalyzeResponse {
            roof_area_sqm: Some(10.0),
            polygon: Some(ring.clone()),
            ..Default::default()
        };
        let result = merge_response(center(), response);
        assert_eq!(result.polygon, ring);
    }
}
