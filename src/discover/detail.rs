/// Spot details: how far a spot is, how long the drive takes and a link
/// that opens driving directions in a maps app
use std::future::Future;
use std::time::Duration;

use super::{Coordinate, VacationSpot};
use crate::error::Result;

/// Mean Earth radius used for straight-line distances
const EARTH_RADIUS_M: f64 = 6_371_000.0;
const METERS_PER_MILE: f64 = 1609.34;
const MAPS_DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/";

/// A driving route between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub distance_m: f64,
    pub travel_time: Duration,
}

/// Driving directions between two coordinates
pub trait Directions {
    fn driving_route(&self, from: Coordinate, to: Coordinate) -> impl Future<Output = Result<Route>>;
}

/// What the detail view shows for one spot
#[derive(Debug, Clone, PartialEq)]
pub struct SpotDetail {
    pub distance_m: f64,
    /// False when no route was found and `distance_m` is a straight line
    pub by_road: bool,
    pub travel_time: Option<Duration>,
    pub maps_url: String,
}

impl SpotDetail {
    pub fn miles(&self) -> f64 {
        self.distance_m / METERS_PER_MILE
    }

    pub fn kilometers(&self) -> f64 {
        self.distance_m / 1000.0
    }

    /// e.g. `250.45 miles`
    pub fn miles_text(&self) -> String {
        format!("{:.2} miles", self.miles())
    }

    /// e.g. `403.06 km`
    pub fn kilometers_text(&self) -> String {
        format!("{:.2} km", self.kilometers())
    }

    /// Whole minutes, e.g. `42 min`
    pub fn travel_time_text(&self) -> Option<String> {
        self.travel_time
            .map(|time| format!("{:.0} min", time.as_secs_f64() / 60.0))
    }
}

/// Great-circle (haversine) distance in meters
pub fn great_circle_distance(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Link that opens driving directions from `from` to `to`
pub fn maps_directions_url(from: Coordinate, to: Coordinate) -> String {
    format!("{MAPS_DIRECTIONS_URL}?api=1&origin={from}&destination={to}&travelmode=driving")
}

/// Distance and travel time from `near` to a spot.
///
/// Without a route the straight-line distance is shown and the travel
/// time is left out.
pub async fn spot_detail<D: Directions>(directions: &D, near: Coordinate, spot: &VacationSpot) -> SpotDetail {
    let maps_url = maps_directions_url(near, spot.coordinate);
    match directions.driving_route(near, spot.coordinate).await {
        Ok(route) => SpotDetail {
            distance_m: route.distance_m,
            by_road: true,
            travel_time: Some(route.travel_time),
            maps_url,
        },
        Err(e) => {
            tracing::debug!(spot = %spot.name, error = %e, "no route, using straight-line distance");
            SpotDetail {
                distance_m: great_circle_distance(near, spot.coordinate),
                by_road: false,
                travel_time: None,
                maps_url,
            }
        }
    }
}
