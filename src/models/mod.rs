//! Data models for the TourGuide application
//!
//! - Location: geographic coordinates, distances and bearings
//! - Poi: points of interest served by the catalog

pub mod location;
pub mod poi;

// Re-export all public types for convenient access
pub use location::{Coordinates, bearing_to_cardinal};
pub use poi::Poi;
