//! Geographic search over the POI catalog

use std::sync::Arc;

use rand::RngExt;
use serde::Serialize;
use tracing::debug;

use super::PoiStore;
use crate::models::{Coordinates, Poi};
use crate::{Result, TourGuideError};

/// Half-width in degrees of the demo scatter box around the query point
const DEMO_SCATTER_DEGREES: f64 = 0.005;

/// A POI together with its distance from the query point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPoi {
    pub poi: Poi,
    pub distance_km: f64,
}

/// Proximity search over a shared catalog
#[derive(Debug, Clone)]
pub struct ProximityQuery {
    store: Arc<PoiStore>,
    fallback_to_catalog: bool,
    demo_scatter: bool,
}

impl ProximityQuery {
    pub const DEFAULT_RADIUS_KM: f64 = 5.0;

    #[must_use]
    pub fn new(store: Arc<PoiStore>) -> Self {
        Self {
            store,
            fallback_to_catalog: true,
            demo_scatter: false,
        }
    }

    /// Return the whole catalog when nothing lies within the radius
    #[must_use]
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_catalog = enabled;
        self
    }

    /// Scatter results around the query point, for map demos only
    #[must_use]
    pub fn with_demo_scatter(mut self, enabled: bool) -> Self {
        self.demo_scatter = enabled;
        self
    }

    #[must_use]
    pub fn store(&self) -> &PoiStore {
        &self.store
    }

    /// POIs near `center`, closest first.
    ///
    /// Falls back to the full catalog (still sorted by distance) when no POI
    /// is within `radius_km` and the fallback policy is enabled.
    pub fn nearby(&self, center: &Coordinates, radius_km: f64) -> Result<Vec<NearbyPoi>> {
        let mut results = self.within_radius(center, radius_km)?;

        if results.is_empty() && self.fallback_to_catalog {
            debug!(
                "No POI within {}km of {}, falling back to the full catalog",
                radius_km,
                center.format_coordinates()
            );
            results = self.ranked(center, f64::INFINITY);
        }

        if self.demo_scatter {
            scatter_around(center, &mut results);
        }

        Ok(results)
    }

    /// POIs whose great-circle distance from `center` is at most `radius_km`, closest first
    pub fn within_radius(&self, center: &Coordinates, radius_km: f64) -> Result<Vec<NearbyPoi>> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(TourGuideError::validation(format!(
                "radius must be a non-negative number of kilometers, got {radius_km}"
            )));
        }

        let results = self.ranked(center, radius_km);
        debug!(
            "Found {} POIs within {}km of {}",
            results.len(),
            radius_km,
            center.format_coordinates()
        );
        Ok(results)
    }

    fn ranked(&self, center: &Coordinates, radius_km: f64) -> Vec<NearbyPoi> {
        let mut results: Vec<NearbyPoi> = self
            .store
            .get_all()
            .iter()
            .map(|poi| NearbyPoi {
                distance_km: center.distance_km(&poi.coordinates()),
                poi: poi.clone(),
            })
            .filter(|nearby| nearby.distance_km <= radius_km)
            .collect();

        // Stable sort keeps catalog order for equal distances
        results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        results
    }
}

fn scatter_around(center: &Coordinates, results: &mut [NearbyPoi]) {
    let mut rng = rand::rng();
    for nearby in results.iter_mut() {
        nearby.poi.latitude =
            center.latitude + rng.random_range(-DEMO_SCATTER_DEGREES..DEMO_SCATTER_DEGREES);
        nearby.poi.longitude =
            center.longitude + rng.random_range(-DEMO_SCATTER_DEGREES..DEMO_SCATTER_DEGREES);
        nearby.distance_km = center.distance_km(&nearby.poi.coordinates());
    }
}
