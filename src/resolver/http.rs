//! # HTTP access to the orbital backend
//!
//! Two endpoints are used:
//!
//! | Endpoint | Query | Response |
//! |----------|-------|----------|
//! | `GET /asteroid_position` | `a, e, i, om, w, ma` (degrees) | `{"x", "y", "z"}` |
//! | `GET /cross_keplarian` | `asteroid_id` | [`CatalogEntry`] |
//!
//! Any non-2xx status is surfaced as [`NeoTrackError::HttpStatus`], except a 404 from
//! the catalog which means the designation is unknown ([`NeoTrackError::TargetNotFound`]).
//! A body that does not decode is a [`NeoTrackError::ReqwestError`].
//!
//! Both clients share the [`reqwest::Client`] of the
//! [`TrackerEnv`](crate::env_state::TrackerEnv), including its timeout.

use reqwest::{Client, Request, Response, StatusCode, Url};
use serde::Deserialize;

use crate::{
    constants::Position, neotrack_errors::NeoTrackError,
    orbit_type::keplerian_element::OrbitalElements,
};

use super::{catalog::CatalogEntry, OrbitCatalog, PositionResolver};

const POSITION_ENDPOINT: &str = "asteroid_position";
const CATALOG_ENDPOINT: &str = "cross_keplarian";

/// Join `endpoint` under `base`, keeping any path prefix of the base URL.
fn endpoint_url(base: &Url, endpoint: &str) -> Result<Url, NeoTrackError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(endpoint)
        .map_err(|err| NeoTrackError::InvalidUrl(format!("{base}{endpoint}: {err}")))
}

fn ensure_success(response: Response) -> Result<Response, NeoTrackError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(NeoTrackError::HttpStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

/// Body of the `asteroid_position` response
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PositionRecord {
    x: f64,
    y: f64,
    z: f64,
}

impl PositionRecord {
    pub fn position(&self) -> Result<Position, NeoTrackError> {
        let position = Position::new(self.x, self.y, self.z);
        if position.iter().all(|c| c.is_finite()) {
            Ok(position)
        } else {
            Err(NeoTrackError::MalformedResponse(format!(
                "non-finite position {self:?}"
            )))
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpPositionResolver {
    client: Client,
    endpoint: Url,
}

impl HttpPositionResolver {
    pub fn new(client: Client, base_url: &Url) -> Result<Self, NeoTrackError> {
        Ok(HttpPositionResolver {
            client,
            endpoint: endpoint_url(base_url, POSITION_ENDPOINT)?,
        })
    }

    /// Build the GET request carrying the six elements as query parameters.
    pub fn request(&self, elements: &OrbitalElements) -> Result<Request, NeoTrackError> {
        Ok(self
            .client
            .get(self.endpoint.clone())
            .query(elements)
            .build()?)
    }
}

impl PositionResolver for HttpPositionResolver {
    async fn resolve(&self, elements: OrbitalElements) -> Result<Position, NeoTrackError> {
        let request = self.request(&elements)?;
        let response = ensure_success(self.client.execute(request).await?)?;
        let record: PositionRecord = response.json().await?;
        record.position()
    }
}

#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    endpoint: Url,
}

impl HttpCatalog {
    pub fn new(client: Client, base_url: &Url) -> Result<Self, NeoTrackError> {
        Ok(HttpCatalog {
            client,
            endpoint: endpoint_url(base_url, CATALOG_ENDPOINT)?,
        })
    }

    pub fn request(&self, target_id: &str) -> Result<Request, NeoTrackError> {
        Ok(self
            .client
            .get(self.endpoint.clone())
            .query(&[("asteroid_id", target_id)])
            .build()?)
    }
}

impl OrbitCatalog for HttpCatalog {
    async fn lookup(&self, target_id: &str) -> Result<CatalogEntry, NeoTrackError> {
        let request = self.request(target_id)?;
        let response = self.client.execute(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(NeoTrackError::TargetNotFound(target_id.to_string()));
        }
        let entry: CatalogEntry = ensure_success(response)?.json().await?;
        Ok(entry)
    }
}
