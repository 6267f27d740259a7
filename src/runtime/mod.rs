//! Runtime adapters: HTTP surface, request models and background sweep.

pub mod api;
pub mod http;
pub mod sweeper;

pub use api::{health, submit_lease, ErrorResponse, Health, LeaseQuery, LeaseResponse};
pub use http::{build_router, serve, AppState};
pub use sweeper::spawn_sweeper;
