//! Synchronous API client core for the PetFriends pet-adoption service.
//!
//! # Overview
//! Builds `HttpRequest` values and turns `HttpResponse` values into
//! `(status, body)` pairs without touching the network (host-does-IO
//! pattern). The `petfriends-agent` crate executes the round-trips.
//!
//! # Design
//! - `PetFriendsClient` is stateless; it holds only `base_url`.
//! - Every operation has a `build_*` method; all responses share
//!   `parse_response`, since no status is an error to this client.
//! - DTOs are defined independently from the mock-server crate; the agent's
//!   scenario tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
mod multipart;
pub mod types;

pub use client::{PetFriendsClient, DEFAULT_BASE_URL};
pub use config::Settings;
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    ApiResponse, AuthKey, Credentials, Pet, PetFields, PetFilter, PetList, PetPhoto, ResponseBody,
};
