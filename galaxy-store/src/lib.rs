//! # Galaxy Turn Engine — Store
//!
//! Component A, the Persistent Store: row-locked CRUD over the relational
//! schema implied by §3, plus the transaction primitive every other
//! component composes its atomic paths on top of.
//!
//! Grounded on the repository-per-entity shape used throughout the pack's
//! async database crates (query methods on a thin wrapper around a pooled
//! connection), adapted to an in-memory reference implementation
//! ([`memory::InMemoryStore`]) that every other crate's test suite
//! exercises directly, plus a `postgres` feature gate reserved for the real
//! `sqlx` implementation.

pub mod error;
pub mod memory;
pub mod migrations;
pub mod model;
pub mod store;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use error::StoreError;
pub use model::*;
pub use store::*;
