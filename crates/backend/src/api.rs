use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use solscout_shared::calc;
use solscout_shared::models::{AnalyzeRequest, AnalyzeResponse};
use thiserror::Error;

use crate::AppContext;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    BadBody(String),
    #[error("coordinates out of range: lat {lat}, lng {lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },
    #[error("no catalogued rooftop at lat {lat}, lng {lng}")]
    NoRoof { lat: f64, lng: f64 },
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadBody(_) | ApiError::InvalidCoordinates { .. } => StatusCode::BAD_REQUEST,
            ApiError::NoRoof { .. } => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// `POST /analyze`: figures for the catalogued roof under the point.
pub async fn analyze(
    State(ctx): State<Arc<AppContext>>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadBody(e.body_text()))?;
    let position = request.position();
    if !position.is_valid() {
        return Err(ApiError::InvalidCoordinates {
            lat: request.lat,
            lng: request.lng,
        });
    }

    let roof = ctx.catalog.find_containing(position).ok_or_else(|| {
        tracing::debug!(lat = position.lat, lng = position.lng, "No roof under point");
        ApiError::NoRoof {
            lat: position.lat,
            lng: position.lng,
        }
    })?;

    let estimate = calc::estimate(roof.area_sqm);
    tracing::debug!(
        roof = %roof.id,
        name = %roof.name,
        area_sqm = roof.area_sqm,
        zoom = ?request.zoom,
        "Analyzed rooftop"
    );

    Ok(Json(AnalyzeResponse {
        roof_area_sqm: Some(estimate.roof_area_sqm()),
        annual_kwh: Some(estimate.annual_energy_kwh()),
        annual_savings_usd: Some(estimate.annual_savings_usd()),
        co2_offset_tons: Some(estimate.co2_offset_tons()),
        roi_years: Some(estimate.roi_years()),
        polygon: Some(roof.outline.clone()),
    }))
}

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    roofs: usize,
    started_at: String,
}

/// `GET /health`.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        roofs: ctx.catalog.len(),
        started_at: ctx.started_at.to_rfc3339(),
    })
}
