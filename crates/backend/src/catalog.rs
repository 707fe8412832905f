use std::path::Path;

use serde::Deserialize;
use solscout_shared::area;
use solscout_shared::models::{LatLng, Ring};

pub const CATALOG_FILE: &str = "roofs.json";

/// One entry of `roofs.json`. Coordinates are `[lng, lat]`.
#[derive(Debug, Deserialize)]
struct RoofRecord {
    id: String,
    name: String,
    polygon: Vec<[f64; 2]>,
}

/// A surveyed rooftop with its outline and precomputed area.
#[derive(Debug, Clone)]
pub struct Roof {
    pub id: String,
    pub name: String,
    pub outline: Ring,
    pub area_sqm: f64,
}

impl TryFrom<RoofRecord> for Roof {
    type Error = String;

    fn try_from(record: RoofRecord) -> Result<Self, Self::Error> {
        let points = record
            .polygon
            .iter()
            .map(|[lng, lat]| LatLng::new(*lat, *lng))
            .collect::<Vec<_>>();
        if let Some(bad) = points.iter().find(|p| !p.is_valid()) {
            return Err(format!(
                "Roof {} has an invalid coordinate ({}, {})",
                record.id, bad.lat, bad.lng
            ));
        }
        let outline = Ring::from_points(points)
            .ok_or_else(|| format!("Roof {} needs at least 3 distinct points", record.id))?;
        let area_sqm = area::ring_area_sqm(&outline);
        Ok(Roof {
            id: record.id,
            name: record.name,
            outline,
            area_sqm,
        })
    }
}

/// Rooftops the analysis endpoint can recognise, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct RoofCatalog {
    roofs: Vec<Roof>,
}

impl RoofCatalog {
    #[cfg(test)]
    pub fn new(roofs: Vec<Roof>) -> Self {
        RoofCatalog { roofs }
    }

    /// Load `roofs.json` from `assets_dir`. A missing file gives an empty
    /// catalog; an unreadable or malformed one is an error.
    pub fn load(assets_dir: &Path) -> Result<Self, String> {
        let path = assets_dir.join(CATALOG_FILE);
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "No roof catalog found, every analysis will miss");
                return Ok(RoofCatalog::default());
            }
            Err(e) => return Err(format!("Failed to read {}: {}", path.display(), e)),
        };

        let records: Vec<RoofRecord> = serde_json::from_str(&data)
            .map_err(|e| format!("Failed to parse {}: {}", CATALOG_FILE, e))?;
        let roofs = records
            .into_iter()
            .map(Roof::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(roofs = roofs.len(), "Loaded roof catalog");

        Ok(RoofCatalog { roofs })
    }

    pub fn len(&self) -> usize {
        self.roofs.len()
    }

    /// The smallest catalogued roof containing `point`.
    pub fn find_containing(&self, point: LatLng) -> Option<&Roof> {
        self.roofs
            .iter()
            .filter(|r| area::ring_contains(&r.outline, point))
            .min_by(|a, b| a.area_sqm.total_cmp(&b.area_sqm))
    }
}
