use super::{Coordinate, LocationProvider};
use crate::error::{Error, Result};

/// Location provider for machines without positioning hardware: answers
/// with the coordinate from the configuration, if one is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation {
    coordinate: Option<Coordinate>,
}

impl FixedLocation {
    pub fn new(coordinate: Option<Coordinate>) -> Self {
        Self { coordinate }
    }
}

impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Coordinate> {
        self.coordinate
            .ok_or_else(|| Error::Location("no home location configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_location() {
        let here = Coordinate {
            latitude: 37.7749,
            longitude: -122.4194,
        };
        assert_eq!(FixedLocation::new(Some(here)).current_location().await.unwrap(), here);
        assert!(FixedLocation::default().current_location().await.is_err());
    }
}
