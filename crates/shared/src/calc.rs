use thiserror::Error;

use crate::models::{LatLng, Ring, SolarEstimate};

/// Peak-sun hours per day (kWh/m²/day equivalent).
pub const SOLAR_IRRADIANCE: f64 = 4.5;
/// Rated kW per m² of roof.
pub const PANEL_EFFICIENCY: f64 = 0.18;
/// Inverter, wiring and soiling losses as a fraction of yield.
pub const SYSTEM_LOSS: f64 = 0.14;
/// USD per kWh.
pub const ELECTRICITY_COST: f64 = 0.12;
/// kg CO2 per kWh displaced.
pub const CO2_FACTOR: f64 = 0.5;
/// Installed cost in USD per kW.
pub const SYSTEM_COST_PER_KW: f64 = 1200.0;
/// Footprint of one panel in m².
pub const PANEL_AREA_SQM: f64 = 1.7;

const DAYS_PER_YEAR: f64 = 365.0;

/// Half-width in degrees of the placeholder square drawn when no roof outline is known.
pub const MOCK_HALF_WIDTH_DEG: f64 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EstimateError {
    #[error("roof area must be a finite, non-negative number of square meters (got {0})")]
    InvalidArea(f64),
}

/// Convert a roof area into solar feasibility figures.
///
/// Total over `roof_area_sqm >= 0`. A zero area yields zeros everywhere,
/// including `roi_years`. Use [`try_estimate`] when the area is untrusted.
pub fn estimate(roof_area_sqm: f64) -> SolarEstimate {
    let system_size_kw = roof_area_sqm * PANEL_EFFICIENCY;
    let annual_energy_kwh = system_size_kw * SOLAR_IRRADIANCE * DAYS_PER_YEAR * (1.0 - SYSTEM_LOSS);
    let annual_savings_usd = annual_energy_kwh * ELECTRICITY_COST;
    let system_cost_usd = system_size_kw * SYSTEM_COST_PER_KW;
    let roi_years = if annual_savings_usd > 0.0 {
        system_cost_usd / annual_savings_usd
    } else {
        0.0
    };
    let co2_offset_tons = (annual_energy_kwh * CO2_FACTOR) / 1000.0;
    let panel_count = roof_area_sqm / PANEL_AREA_SQM;

    SolarEstimate {
        roof_area_sqm,
        system_size_kw,
        annual_energy_kwh,
        annual_savings_usd,
        co2_offset_tons,
        roi_years,
        panel_count,
    }
}

/// [`estimate`] with the area validated first.
pub fn try_estimate(roof_area_sqm: f64) -> Result<SolarEstimate, EstimateError> {
    if !roof_area_sqm.is_finite() || roof_area_sqm < 0.0 {
        return Err(EstimateError::InvalidArea(roof_area_sqm));
    }
    Ok(estimate(roof_area_sqm))
}

/// Small axis-aligned square ring centred on `center`.
pub fn synthetic_square(center: LatLng) -> Ring {
    let h = MOCK_HALF_WIDTH_DEG;
    let south_west = LatLng::new(center.lat - h, center.lng - h);
    Ring(vec![
        south_west,
        LatLng::new(center.lat - h, center.lng + h),
        LatLng::new(center.lat + h, center.lng + h),
        LatLng::new(center.lat + h, center.lng - h),
        south_west,
    ])
}
