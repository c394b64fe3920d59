use crate::{
    constants::Position, kepler::elements_to_position, neotrack_errors::NeoTrackError,
    orbit_type::keplerian_element::OrbitalElements,
};

use super::PositionResolver;

/// In-process resolver solving Kepler's equation directly.
///
/// Produces the same frame and units as the backend `asteroid_position` endpoint, so it
/// can stand in for it offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeplerResolver;

impl PositionResolver for KeplerResolver {
    async fn resolve(&self, elements: OrbitalElements) -> Result<Position, NeoTrackError> {
        elements_to_position(&elements)
    }
}
