use gloo_timers::future::TimeoutFuture;
use reqwest::Url;
use solscout_shared::analysis::{
    self, AnalysisError, AnalysisService, OfflineAnalysis, DEFAULT_MIN_LATENCY_MS,
};
use solscout_shared::models::{
    AnalysisResult, AnalyzeRequest, AnalyzeResponse, GeocodeResponse, LatLng, Suggestion,
    ViewState,
};
use solscout_shared::suggest::SUGGESTION_LIMIT;

/// Mapbox public token, baked in at build time.
const MAPBOX_TOKEN: Option<&str> = option_env!("MAPBOX_TOKEN");
/// Analysis service base URL. Defaults to the page origin.
const API_URL: Option<&str> = option_env!("SOLSCOUT_API_URL");

const GEOCODING_BASE: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places/";
const STATIC_STYLE_BASE: &str =
    "https://api.mapbox.com/styles/v1/mapbox/satellite-streets-v12/static";

pub fn mapbox_token() -> Option<&'static str> {
    MAPBOX_TOKEN.filter(|t| !t.is_empty())
}

fn api_base() -> Option<String> {
    if let Some(url) = API_URL.filter(|u| !u.is_empty()) {
        return Some(url.to_string());
    }
    web_sys::window()?.location().origin().ok()
}

/// `POST` endpoint for rooftop analysis under `base`.
pub fn analyze_url(base: &str) -> String {
    format!("{}/analyze", base.trim_end_matches('/'))
}

/// Autocomplete lookup URL. The query is one percent-encoded path segment.
pub fn geocoding_url(query: &str, token: &str) -> Result<String, String> {
    let mut url = Url::parse(GEOCODING_BASE).map_err(|e| e.to_string())?;
    url.path_segments_mut()
        .map_err(|_| "Geocoding URL cannot take path segments".to_string())?
        .pop_if_empty()
        .push(&format!("{}.json", query));
    url.query_pairs_mut()
        .append_pair("access_token", token)
        .append_pair("autocomplete", "true")
        .append_pair("limit", &SUGGESTION_LIMIT.to_string());
    Ok(url.to_string())
}

/// Satellite image for `view`, `width` x `height` logical pixels at 2x density.
pub fn static_map_url(view: &ViewState, width: u32, height: u32, token: &str) -> String {
    format!(
        "{}/{:.6},{:.6},{:.2},{:.0},{:.0}/{}x{}@2x?access_token={}",
        STATIC_STYLE_BASE,
        view.longitude,
        view.latitude,
        view.zoom,
        view.bearing,
        view.pitch,
        width,
        height,
        token
    )
}

/// Analysis over HTTP against the Sol-Scout backend.
pub struct HttpAnalysisService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalysisService {
    pub fn new(base: &str) -> Self {
        HttpAnalysisService {
            client: reqwest::Client::new(),
            endpoint: analyze_url(base),
        }
    }
}

impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalyzeResponse, AnalysisError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AnalysisError::Status(status.as_u16()));
        }

        resp.json()
            .await
            .map_err(|e| AnalysisError::Decode(e.to_string()))
    }
}

/// Analyze the rooftop at `center`. Never fails and never resolves before
/// the latency floor.
pub async fn analyze_rooftop(center: LatLng) -> AnalysisResult {
    let floor = TimeoutFuture::new(DEFAULT_MIN_LATENCY_MS);
    match api_base() {
        Some(base) => {
            analysis::derive_analysis_result(center, &HttpAnalysisService::new(&base), floor).await
        }
        None => analysis::derive_analysis_result(center, &OfflineAnalysis, floor).await,
    }
}

/// Address suggestions for an already-normalised query.
pub async fn fetch_suggestions(query: &str) -> Result<Vec<Suggestion>, String> {
    let token = mapbox_token().ok_or_else(|| "MAPBOX_TOKEN not configured".to_string())?;
    let url = geocoding_url(query, token)?;

    let resp = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.status().is_success() {
        return Err(format!("Geocoding returned {}", resp.status()));
    }

    let body: GeocodeResponse = resp.json().await.map_err(|e| e.to_string())?;
    Ok(body.features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_url_joins_base() {
        assert_eq!(analyze_url("http://localhost:3000"), "http://localhost:3000/analyze");
        assert_eq!(analyze_url("https://solar.example/"), "https://solar.example/analyze");
    }

    #[test]
    fn test_geocoding_url_encodes_query_segment() {
        let url = geocoding_url("Abay Ave 10/2", "pk.test").unwrap();
        assert!(
            url.starts_with(
                "https://api.mapbox.com/geocoding/v5/mapbox.places/Abay%20Ave%2010%2F2.json?"
            ),
            "{url}"
        );
        assert!(url.contains("access_token=pk.test"));
        assert!(url.contains("autocomplete=true"));
        assert!(url.contains("limit=5"));
    }

    #[test]
    fn test_geocoding_url_encodes_reserved_characters() {
        let url = geocoding_url("a?b#c", "t").unwrap();
        assert!(url.contains("/a%3Fb%23c.json?"), "{url}");
    }

    #[test]
    fn test_static_map_url() {
        let view = ViewState::default();
        let url = static_map_url(&view, 1024, 768, "pk.test");
        assert_eq!(
            url,
            "https://api.mapbox.com/styles/v1/mapbox/satellite-streets-v12/static/76.889709,43.238949,15.00,0,0/1024x768@2x?access_token=pk.test"
        );
    }

    #[test]
    fn test_analyze_request_body_shape() {
        let body = serde_json::to_value(AnalyzeRequest::at(LatLng::new(43.2, 76.9))).unwrap();
        assert_eq!(body, serde_json::json!({ "lat": 43.2, "lng": 76.9 }));
    }
}
