//! # Orbit representations
//!
//! Element sets handled by the simulation. Only the classical Keplerian form is needed:
//! catalog entries, user input and position requests all speak `(a, e, i, Ω, ω, M)`.

pub mod keplerian_element;
