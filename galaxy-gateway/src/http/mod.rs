//! The HTTP adapter: `axum` state, error mapping, response headers, and
//! the route table itself.

pub mod error;
pub mod headers;
pub mod routes;
pub mod state;

pub use state::AppState;
