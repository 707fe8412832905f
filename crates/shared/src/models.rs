use serde::{Deserialize, Deserializer, Serialize};

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    /// Finite and inside the usual WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Ai,
    Manual,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Ai => write!(f, "ai"),
            Provenance::Manual => write!(f, "manual"),
        }
    }
}

/// Solar feasibility figures derived from a single roof area.
///
/// Only [`crate::calc`] and [`crate::analysis`] construct these, so every
/// field stays consistent with the constant set in `calc`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarEstimate {
    pub(crate) roof_area_sqm: f64,
    pub(crate) system_size_kw: f64,
    pub(crate) annual_energy_kwh: f64,
    pub(crate) annual_savings_usd: f64,
    pub(crate) co2_offset_tons: f64,
    pub(crate) roi_years: f64,
    pub(crate) panel_count: f64,
}

impl SolarEstimate {
    pub fn roof_area_sqm(&self) -> f64 {
        self.roof_area_sqm
    }

    pub fn system_size_kw(&self) -> f64 {
        self.system_size_kw
    }

    pub fn annual_energy_kwh(&self) -> f64 {
        self.annual_energy_kwh
    }

    pub fn annual_savings_usd(&self) -> f64 {
        self.annual_savings_usd
    }

    pub fn co2_offset_tons(&self) -> f64 {
        self.co2_offset_tons
    }

    /// Payback period in years, 0 when there are no savings.
    pub fn roi_years(&self) -> f64 {
        self.roi_years
    }

    /// Fractional on purpose; the display rounds.
    pub fn panel_count(&self) -> f64 {
        self.panel_count
    }
}

/// A closed polygon ring: the first point is repeated as the last.
///
/// On the wire this is a GeoJSON `Feature` with `Polygon` geometry and
/// `[lng, lat]` coordinate pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonFeature", into = "PolygonFeature")]
pub struct Ring(pub(crate) Vec<LatLng>);

impl Ring {
    /// Close an open point sequence. Needs at least 3 points.
    pub fn close(points: &[LatLng]) -> Option<Ring> {
        if points.len() < 3 {
            return None;
        }
        let mut closed = points.to_vec();
        closed.push(points[0]);
        Some(Ring(closed))
    }

    /// Accept a ring that may or may not already repeat its first point.
    pub fn from_points(points: Vec<LatLng>) -> Option<Ring> {
        let open_len = match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() > 1 && first == last => points.len() - 1,
            _ => points.len(),
        };
        Ring::close(&points[..open_len])
    }

    /// All points including the repeated closing point.
    pub fn points(&self) -> &[LatLng] {
        &self.0
    }

    /// Number of distinct vertices (closing point excluded).
    pub fn vertex_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Arithmetic mean of the distinct vertices.
    pub fn centroid(&self) -> LatLng {
        let open = &self.0[..self.vertex_count()];
        let n = open.len() as f64;
        let (lat, lng) = open
            .iter()
            .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
        LatLng::new(lat / n, lng / n)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// Positions are `[lng, lat]` with optional trailing members (altitude).
    pub coordinates: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonFeature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub geometry: PolygonGeometry,
}

impl TryFrom<PolygonFeature> for Ring {
    type Error = String;

    fn try_from(feature: PolygonFeature) -> Result<Self, Self::Error> {
        if feature.geometry.kind != "Polygon" {
            return Err(format!(
                "Expected Polygon geometry, got {}",
                feature.geometry.kind
            ));
        }
        let outer = feature
            .geometry
            .coordinates
            .into_iter()
            .next()
            .ok_or_else(|| "Polygon has no rings".to_string())?;
        let points = outer
            .into_iter()
            .map(|position| match position[..] {
                [lng, lat, ..] => Ok(LatLng::new(lat, lng)),
                _ => Err(format!(
                    "Position needs longitude and latitude, got {} value(s)",
                    position.len()
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ring::from_points(points).ok_or_else(|| "Polygon ring needs at least 3 points".to_string())
    }
}

impl From<Ring> for PolygonFeature {
    fn from(ring: Ring) -> Self {
        PolygonFeature {
            kind: "Feature".to_string(),
            properties: serde_json::Map::new(),
            geometry: PolygonGeometry {
                kind: "Polygon".to_string(),
                coordinates: vec![ring.0.iter().map(|p| vec![p.lng, p.lat]).collect()],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub estimate: SolarEstimate,
    pub polygon: Ring,
    pub provenance: Provenance,
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<u8>,
}

impl AnalyzeRequest {
    pub fn at(position: LatLng) -> Self {
        AnalyzeRequest {
            lat: position.lat,
            lng: position.lng,
            zoom: None,
        }
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Success body of `POST /analyze`. Every field is optional for the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roof_area_sqm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_kwh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_savings_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_offset_tons: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi_years: Option<f64>,
    /// Unparseable polygons are dropped rather than failing the whole body.
    #[serde(
        default,
        deserialize_with = "lenient_ring",
        skip_serializing_if = "Option::is_none"
    )]
    pub polygon: Option<Ring>,
}

fn lenient_ring<'de, D>(deserializer: D) -> Result<Option<Ring>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// One geocoding autocomplete entry. `center` is `[lng, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub place_name: String,
    pub center: [f64; 2],
}

impl Suggestion {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.center[1], self.center[0])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub features: Vec<Suggestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl ViewState {
    pub fn center(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    pub fn centered_on(self, position: LatLng, zoom: f64) -> Self {
        ViewState {
            latitude: position.lat,
            longitude: position.lng,
            zoom,
            ..self
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            latitude: 43.238949,
            longitude: 76.889709,
            zoom: 15.0,
            pitch: 0.0,
            bearing: 0.0,
        }
    }
}

/// One-shot camera move for the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlyTo {
    pub lat: f64,
    pub lng: f64,
    pub zoom: f64,
}
