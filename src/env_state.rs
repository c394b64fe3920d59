//! # Tracker environment state
//!
//! [`TrackerEnv`] is the **shared environment object** giving access to the orbital
//! backend: one persistent [`reqwest::Client`] configured with the request timeout, and
//! the parsed base URL. It is cheaply cloneable (the client is reference counted) and
//! builds the HTTP implementations of the resolution traits.
//!
//! ```text
//! TrackerEnv
//! ├── http_client (reqwest::Client)
//! └── base_url    (reqwest::Url)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use neotrack::config::TrackerConfig;
//! use neotrack::env_state::TrackerEnv;
//!
//! let env = TrackerEnv::new(&TrackerConfig::default()).unwrap();
//! let resolver = env.position_resolver().unwrap();
//! let catalog = env.catalog().unwrap();
//! ```

use reqwest::{Client, Url};

use crate::{
    config::TrackerConfig,
    neotrack_errors::NeoTrackError,
    resolver::http::{HttpCatalog, HttpPositionResolver},
};

#[derive(Debug, Clone)]
pub struct TrackerEnv {
    pub http_client: Client,
    pub base_url: Url,
}

impl TrackerEnv {
    /// Create the environment from `config`.
    ///
    /// Return
    /// ------
    /// * A new environment, or [`NeoTrackError::InvalidUrl`] if `backend_url` does not
    ///   parse, or [`NeoTrackError::ReqwestError`] if the client cannot be built.
    pub fn new(config: &TrackerConfig) -> Result<Self, NeoTrackError> {
        let base_url = Url::parse(&config.backend_url)
            .map_err(|err| NeoTrackError::InvalidUrl(format!("{}: {err}", config.backend_url)))?;

        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(TrackerEnv {
            http_client,
            base_url,
        })
    }

    pub fn position_resolver(&self) -> Result<HttpPositionResolver, NeoTrackError> {
        HttpPositionResolver::new(self.http_client.clone(), &self.base_url)
    }

    pub fn catalog(&self) -> Result<HttpCatalog, NeoTrackError> {
        HttpCatalog::new(self.http_client.clone(), &self.base_url)
    }
}
