/// Google Maps HTTP clients
///
/// Places Text Search backs [`PlacesSearch`]; "find place from text" plus
/// the photo endpoint back [`PlacePhotoLookup`]. The Directions API backs
/// [`Directions`].
use serde::Deserialize;
use std::time::Duration;

use super::{Coordinate, Directions, PlacePhotoLookup, PlaceResult, PlacesSearch, Route};
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
pub const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions";

/// Width requested from the photo endpoint
const PHOTO_MAX_WIDTH: u32 = 400;

const UNKNOWN_PLACE: &str = "Unknown Place";
const NO_DESCRIPTION: &str = "No description available.";

/// HTTP client for the Places API.
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    placeholder_url: String,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    results: Vec<RawPlace>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    name: Option<String>,
    formatted_address: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct FindPlaceResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    photos: Option<Vec<PlacePhoto>>,
}

#[derive(Debug, Deserialize)]
struct PlacePhoto {
    photo_reference: String,
}

/// HTTP client for the Directions API (driving routes)
#[derive(Debug, Clone)]
pub struct GoogleDirectionsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<RawRoute>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: Measure,
    duration: Measure,
}

/// Directions report every measure as `{text, value}`; `value` is meters or seconds
#[derive(Debug, Deserialize)]
struct Measure {
    value: f64,
}

impl GooglePlacesClient {
    /// Create a client for the public endpoint.
    ///
    /// * `placeholder_url` - returned by photo lookups that come up empty.
    pub fn new(api_key: String, placeholder_url: String) -> Self {
        Self::with_base_url(api_key, placeholder_url, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, placeholder_url: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            placeholder_url,
        }
    }

    /// Public URL of a photo reference
    pub fn photo_url(&self, photo_reference: &str) -> String {
        format!(
            "{}/photo?maxwidth={}&photoreference={}&key={}",
            self.base_url, PHOTO_MAX_WIDTH, photo_reference, self.api_key
        )
    }

    async fn text_search(&self, query: &str, near: Coordinate, radius_m: u32) -> Result<Vec<PlaceResult>> {
        let response = self
            .client
            .get(format!("{}/textsearch/json", self.base_url))
            .query(&[
                ("query", query.to_string()),
                ("location", near.to_string()),
                ("radius", radius_m.to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::PlacesApi {
                status: status.as_u16(),
                body,
            });
        }
        parse_text_search(&body)
    }

    async fn photo_reference(&self, name: &str) -> Result<Option<String>> {
        let body = self
            .client
            .get(format!("{}/findplacefromtext/json", self.base_url))
            .query(&[
                ("input", name),
                ("inputtype", "textquery"),
                ("fields", "photos"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parse_photo_reference(&body))
    }
}

impl GoogleDirectionsClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_DIRECTIONS_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Directions for GoogleDirectionsClient {
    async fn driving_route(&self, from: Coordinate, to: Coordinate) -> Result<Route> {
        let body = self
            .client
            .get(format!("{}/json", self.base_url))
            .query(&[
                ("origin", from.to_string()),
                ("destination", to.to_string()),
                ("mode", "driving".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_directions(&body)
    }
}

impl PlacesSearch for GooglePlacesClient {
    async fn search(&self, query: &str, near: Coordinate, radius_m: u32) -> Result<Vec<PlaceResult>> {
        self.text_search(query, near, radius_m).await
    }
}

impl PlacePhotoLookup for GooglePlacesClient {
    async fn find_place_photo(&self, name: &str) -> String {
        match self.photo_reference(name).await {
            Ok(Some(reference)) => self.photo_url(&reference),
            Ok(None) => self.placeholder_url.clone(),
            Err(e) => {
                tracing::debug!(place = name, error = %e, "photo lookup failed");
                self.placeholder_url.clone()
            }
        }
    }
}

/// Parse a Text Search response body.
///
/// The API reports quota and key problems with HTTP 200 and a non-OK
/// `status`, so that field is checked too.
fn parse_text_search(body: &str) -> Result<Vec<PlaceResult>> {
    let response: TextSearchResponse = serde_json::from_str(body)?;
    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => {}
        other => {
            return Err(Error::PlacesApi {
                status: 200,
                body: response
                    .error_message
                    .unwrap_or_else(|| other.to_string()),
            })
        }
    }

    Ok(response
        .results
        .into_iter()
        .map(|place| PlaceResult {
            name: place.name.unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
            coordinate: Coordinate {
                latitude: place.geometry.location.lat,
                longitude: place.geometry.location.lng,
            },
            description: place
                .formatted_address
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        })
        .collect())
}

/// Total distance and duration of the first route
fn parse_directions(body: &str) -> Result<Route> {
    let response: DirectionsResponse = serde_json::from_str(body)?;
    if response.status != "OK" {
        return Err(Error::Directions(
            response.error_message.unwrap_or(response.status),
        ));
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| Error::Directions("no routes in response".to_string()))?;
    let distance_m = route.legs.iter().map(|leg| leg.distance.value).sum();
    let seconds: f64 = route.legs.iter().map(|leg| leg.duration.value).sum();
    let travel_time =
        Duration::try_from_secs_f64(seconds).map_err(|e| Error::Directions(e.to_string()))?;
    Ok(Route {
        distance_m,
        travel_time,
    })
}

/// First photo reference of the first candidate, if there is one
fn parse_photo_reference(body: &str) -> Option<String> {
    let response: FindPlaceResponse = serde_json::from_str(body).ok()?;
    response
        .candidates
        .into_iter()
        .next()?
        .photos?
        .into_iter()
        .next()
        .map(|photo| photo.photo_reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn client() -> GooglePlacesClient {
        GooglePlacesClient::with_base_url(
            "KEY".to_string(),
            "https://example.com/default.jpg".to_string(),
            // Nothing listens here; every request fails fast
            "http://127.0.0.1:9/place/".to_string(),
        )
    }

    #[test]
    fn test_parse_text_search() {
        let body = r#"{
            "status": "OK",
            "results": [
                {"name": "Senso-ji", "formatted_address": "2 Chome-3-1 Asakusa, Taito City",
                 "geometry": {"location": {"lat": 35.7148, "lng": 139.7967}}},
                {"geometry": {"location": {"lat": 35.0, "lng": 139.0}}}
            ]
        }"#;
        let places = parse_text_search(body).unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "Senso-ji");
        assert_eq!(places[0].coordinate.latitude, 35.7148);
        assert_eq!(places[1].name, UNKNOWN_PLACE);
        assert_eq!(places[1].description, NO_DESCRIPTION);
    }

    #[test]
    fn test_zero_results_is_empty() {
        let places = parse_text_search(r#"{"status": "ZERO_RESULTS", "results": []}"#).unwrap();
        assert!(places.is_empty());
    }

    #[test]
    fn test_denied_request_is_an_error() {
        let body = r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#;
        assert_matches!(
            parse_text_search(body),
            Err(Error::PlacesApi { body, .. }) if body.contains("API key")
        );
    }

    #[test]
    fn test_parse_photo_reference() {
        let body = r#"{"candidates": [{"photos": [{"photo_reference": "ABC", "width": 10}]}], "status": "OK"}"#;
        assert_eq!(parse_photo_reference(body), Some("ABC".to_string()));

        assert_eq!(parse_photo_reference(r#"{"candidates": [{}]}"#), None);
        assert_eq!(parse_photo_reference(r#"{"candidates": []}"#), None);
        assert_eq!(parse_photo_reference("<html>"), None);
    }

    #[test]
    fn test_photo_url() {
        assert_eq!(
            client().photo_url("ABC"),
            "http://127.0.0.1:9/place/photo?maxwidth=400&photoreference=ABC&key=KEY"
        );
    }

    #[test]
    fn test_parse_directions_sums_legs() {
        let body = r#"{
            "status": "OK",
            "routes": [{"legs": [
                {"distance": {"text": "300 km", "value": 300000},
                 "duration": {"text": "3 hours", "value": 10800}},
                {"distance": {"text": "205 km", "value": 205000},
                 "duration": {"text": "2 hours", "value": 7500}}
            ]}]
        }"#;
        let route = parse_directions(body).unwrap();
        assert_eq!(route.distance_m, 505_000.0);
        assert_eq!(route.travel_time, Duration::from_secs(18_300));
    }

    #[test]
    fn test_no_route_is_an_error() {
        let body = r#"{"status": "ZERO_RESULTS", "routes": []}"#;
        assert_matches!(parse_directions(body), Err(Error::Directions(text)) if text == "ZERO_RESULTS");
        assert_matches!(
            parse_directions(r#"{"status": "OK", "routes": []}"#),
            Err(Error::Directions(_))
        );
    }

    #[tokio::test]
    async fn test_unreachable_directions_service_is_an_error() {
        let client = GoogleDirectionsClient::with_base_url(
            "KEY".to_string(),
            "http://127.0.0.1:9/directions".to_string(),
        );
        let from = Coordinate {
            latitude: 35.0,
            longitude: 139.0,
        };
        assert_matches!(client.driving_route(from, from).await, Err(Error::Http(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_yields_placeholder() {
        let url = client().find_place_photo("Senso-ji").await;
        assert_eq!(url, "https://example.com/default.jpg");
    }
}
