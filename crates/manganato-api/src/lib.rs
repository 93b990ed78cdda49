//! Manganato API
//!
//! HTTP surface over [`manganato_core`]: the latest-updates feed (with
//! search) and per-title details, wrapped in a small JSON envelope.
//!
//! # Endpoints
//! - `GET /v1/mangas?page=&q=` - latest updates or search
//! - `GET /v1/mangas/{prefix-slug}` - title details
//! - `GET /health` - liveness
//!
//! Configuration is read from environment variables, see [`config`].

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::app_router;
pub use state::AppState;
