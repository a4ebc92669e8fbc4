//! Points of interest
//!
//! - Catalog: the read-only store of POIs and name resolution
//! - Proximity: great-circle search around a coordinate

pub mod catalog;
pub mod proximity;

pub use catalog::PoiStore;
pub use proximity::{NearbyPoi, ProximityQuery};
