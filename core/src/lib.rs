//! Pet record model and a synchronous client core for the PetBook gateway.
//!
//! # Overview
//! `Pet` and its create-time rules (`validate`, `apply_defaults`) are shared
//! by the gateway and its clients. `PetClient` builds `HttpRequest` values and
//! parses `HttpResponse` values without touching the network (host-does-IO
//! pattern), so the caller picks the transport.

pub mod client;
pub mod error;
pub mod http;
pub mod types;
pub mod validate;

pub use client::PetClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{DeleteSummary, Pet};
pub use validate::{InvalidField, DEFAULT_DOG_BREED, REQUIRED_FIELDS};
