//! Location model for geographic coordinates

use serde::{Deserialize, Serialize};

use crate::{Result, TourGuideError};

const COMPASS_POINTS: [&str; 8] = [
    "north",
    "northeast",
    "east",
    "southeast",
    "south",
    "southwest",
    "west",
    "northwest",
];

/// Location coordinates
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create coordinates from user input, rejecting values off the globe
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(TourGuideError::validation(format!(
                "latitude {latitude} must be between -90 and 90"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(TourGuideError::validation(format!(
                "longitude {longitude} must be between -180 and 180"
            )));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Great-circle distance in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude: other.latitude,
                longitude: other.longitude,
            },
            haversine::Units::Kilometers,
        )
    }

    /// Great-circle distance in miles
    #[must_use]
    pub fn distance_miles(&self, other: &Coordinates) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude: other.latitude,
                longitude: other.longitude,
            },
            haversine::Units::Miles,
        )
    }

    /// Initial compass bearing towards `other`, in degrees (0 = north, clockwise)
    #[must_use]
    pub fn bearing_degrees(&self, other: &Coordinates) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let delta_lambda = (other.longitude - self.longitude).to_radians();

        let y = delta_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();
        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Map a bearing to one of the eight spoken compass directions
#[must_use]
pub fn bearing_to_cardinal(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    // Each sector spans 45 degrees centered on its direction
    let index = ((normalized + 22.5) / 45.0).floor() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}
