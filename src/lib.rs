//! # neotrack
//!
//! Simulation core of an interactive near-Earth object viewer: Keplerian propagation of
//! the target, a bounded visual trail, and the reconciliation of asynchronous position
//! requests issued by the frame clock and by user input.
//!
//! ## Modules
//!
//! - [`orbit_type`], [`kepler`]: element sets and the closed-form two-body position.
//! - [`orbit_state`], [`trail`], [`clock`], [`reconciler`]: the pieces of the state.
//! - [`resolver`]: local and HTTP position resolution, catalog lookup.
//! - [`controller`]: the coordinator owning the state.
//! - [`driver`]: the cooperative event loop feeding the renderer.
//! - [`config`], [`env_state`], [`neotrack_errors`], [`constants`]: ambient plumbing.

pub mod clock;
pub mod config;
pub mod constants;
pub mod controller;
pub mod driver;
pub mod env_state;
pub mod kepler;
pub mod neotrack_errors;
pub mod orbit_state;
pub mod orbit_type;
pub mod reconciler;
pub mod resolver;
pub mod trail;
