//! # Position and catalog resolution
//!
//! The two asynchronous boundaries of the simulation:
//!
//! - [`PositionResolver`]: orbital elements → Cartesian position. Implemented locally by
//!   [`KeplerResolver`](crate::resolver::kepler_resolver::KeplerResolver) and remotely by
//!   [`HttpPositionResolver`](crate::resolver::http::HttpPositionResolver).
//! - [`OrbitCatalog`]: target designation → [`CatalogEntry`](crate::resolver::catalog::CatalogEntry)
//!   (elements plus physical metadata), implemented by
//!   [`HttpCatalog`](crate::resolver::http::HttpCatalog).
//!
//! Both traits return `Send` futures so resolutions can run on spawned tokio tasks while
//! the controller stays on its own task. No retry policy is applied here.

pub mod catalog;
pub mod http;
pub mod kepler_resolver;

use std::future::Future;

use crate::{
    constants::Position, neotrack_errors::NeoTrackError,
    orbit_type::keplerian_element::OrbitalElements,
};

use self::catalog::CatalogEntry;

pub trait PositionResolver {
    /// Resolve the position of the body described by `elements`.
    ///
    /// Errors are either network failures or elements that cannot be propagated.
    fn resolve(
        &self,
        elements: OrbitalElements,
    ) -> impl Future<Output = Result<Position, NeoTrackError>> + Send;
}

pub trait OrbitCatalog {
    /// Fetch the catalog entry of `target_id` (already trimmed and non-empty).
    fn lookup(
        &self,
        target_id: &str,
    ) -> impl Future<Output = Result<CatalogEntry, NeoTrackError>> + Send;
}
