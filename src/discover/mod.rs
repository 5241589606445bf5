/// Nearby attractions
///
/// Discovery asks a [`LocationProvider`] for one fix, searches a
/// [`PlacesSearch`] service around it and decorates every result with a
/// photo URL from a [`PlacePhotoLookup`]. The photo lookups run
/// concurrently and the spot list is only published once all of them
/// have answered. [`spot_detail`] adds distance, travel time and a
/// directions link for a single spot.

pub mod detail;
pub mod google;
pub mod location;

use std::fmt;
use std::future::Future;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use detail::{spot_detail, Directions, Route, SpotDetail};
pub use google::{GoogleDirectionsClient, GooglePlacesClient};
pub use location::FixedLocation;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

/// One hit from a places search
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceResult {
    pub name: String,
    pub coordinate: Coordinate,
    pub description: String,
}

/// A place worth visiting, ready to show
#[derive(Debug, Clone, PartialEq)]
pub struct VacationSpot {
    pub name: String,
    pub image_url: String,
    pub coordinate: Coordinate,
    pub description: String,
}

/// Where the user is right now. Delivers a single fix per request.
pub trait LocationProvider {
    fn current_location(&self) -> impl Future<Output = Result<Coordinate>>;
}

/// Free-text search for places around a coordinate
pub trait PlacesSearch {
    fn search(
        &self,
        query: &str,
        near: Coordinate,
        radius_m: u32,
    ) -> impl Future<Output = Result<Vec<PlaceResult>>>;
}

/// Photo URL for a named place.
///
/// Implementations never fail: any problem yields a placeholder URL.
pub trait PlacePhotoLookup {
    fn find_place_photo(&self, name: &str) -> impl Future<Output = String>;
}

/// What the discover screen shows
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoverStatus {
    Spots {
        near: Coordinate,
        spots: Vec<VacationSpot>,
    },
    /// Inline, human-readable failure text
    Failed(String),
}

/// Search for `query` around the user's location and attach photos.
pub async fn discover_nearby<L, S, P>(
    location: &L,
    search: &S,
    photos: &P,
    query: &str,
    radius_m: u32,
) -> DiscoverStatus
where
    L: LocationProvider,
    S: PlacesSearch,
    P: PlacePhotoLookup,
{
    let near = match location.current_location().await {
        Ok(near) => near,
        Err(e) => {
            tracing::warn!(error = %e, "no location fix");
            return DiscoverStatus::Failed(format!("Failed to get location: {e}"));
        }
    };

    let places = match search.search(query, near, radius_m).await {
        Ok(places) => places,
        Err(e) => {
            tracing::warn!(error = %e, "places search failed");
            return DiscoverStatus::Failed(format!("Error searching for nearby places: {e}"));
        }
    };

    let image_urls = join_all(places.iter().map(|place| photos.find_place_photo(&place.name))).await;

    let spots: Vec<VacationSpot> = places
        .into_iter()
        .zip(image_urls)
        .map(|(place, image_url)| VacationSpot {
            name: place.name,
            image_url,
            coordinate: place.coordinate,
            description: place.description,
        })
        .collect();

    tracing::info!(near = %near, spots = spots.len(), "nearby spots found");
    DiscoverStatus::Spots { near, spots }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const TOKYO: Coordinate = Coordinate {
        latitude: 35.6762,
        longitude: 139.6503,
    };

    struct FakeSearch(Vec<&'static str>);

    impl PlacesSearch for FakeSearch {
        async fn search(&self, _query: &str, near: Coordinate, _radius_m: u32) -> Result<Vec<PlaceResult>> {
            Ok(self
                .0
                .iter()
                .map(|name| PlaceResult {
                    name: name.to_string(),
                    coordinate: near,
                    description: format!("{name}, Tokyo"),
                })
                .collect())
        }
    }

    struct BrokenSearch;

    impl PlacesSearch for BrokenSearch {
        async fn search(&self, _query: &str, _near: Coordinate, _radius_m: u32) -> Result<Vec<PlaceResult>> {
            Err(Error::PlacesApi {
                status: 503,
                body: "unavailable".to_string(),
            })
        }
    }

    struct NamedPhotos;

    impl PlacePhotoLookup for NamedPhotos {
        async fn find_place_photo(&self, name: &str) -> String {
            // Finish in reverse-alphabetical order to shake out ordering bugs
            if name.starts_with('A') {
                tokio::task::yield_now().await;
            }
            format!("https://photos.example/{name}")
        }
    }

    #[tokio::test]
    async fn test_spots_keep_search_order_and_get_photos() {
        let status = discover_nearby(
            &FixedLocation::new(Some(TOKYO)),
            &FakeSearch(vec!["Asakusa", "Meiji Shrine"]),
            &NamedPhotos,
            "Tourist attractions",
            5000,
        )
        .await;

        let DiscoverStatus::Spots { near, spots } = status else {
            panic!("expected spots");
        };
        assert_eq!(near, TOKYO);
        let names: Vec<_> = spots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Asakusa", "Meiji Shrine"]);
        assert_eq!(spots[1].image_url, "https://photos.example/Meiji Shrine");
    }

    #[tokio::test]
    async fn test_missing_location_is_inline_text() {
        let status = discover_nearby(
            &FixedLocation::new(None),
            &FakeSearch(vec![]),
            &NamedPhotos,
            "Tourist attractions",
            5000,
        )
        .await;
        assert_matches::assert_matches!(status, DiscoverStatus::Failed(text) if text.starts_with("Failed to get location"));
    }

    #[tokio::test]
    async fn test_search_failure_is_inline_text() {
        let status = discover_nearby(
            &FixedLocation::new(Some(TOKYO)),
            &BrokenSearch,
            &NamedPhotos,
            "Tourist attractions",
            5000,
        )
        .await;
        assert_matches::assert_matches!(status, DiscoverStatus::Failed(text) if text.contains("503"));
    }
}
