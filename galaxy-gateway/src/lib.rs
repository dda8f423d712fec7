//! # Galaxy Turn Engine — Gateway
//!
//! Component I, the Action Gateway (§4.I), plus the thin HTTP adapter that
//! realizes the §6 route table and the `galaxy` operator CLI.

pub mod auth;
pub mod cli;
pub mod config;
pub mod gateway;
pub mod http;

pub use config::Config;
pub use http::AppState;
