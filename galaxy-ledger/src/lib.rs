//! # Galaxy Turn Engine — Ledger
//!
//! Component G, the Action-Point Ledger: two-phase reserve/commit/release
//! with TTL-bounded reservations, a periodic sweep, and the idempotent
//! per-turn point grant the Turn Manager calls at turn start.

pub mod allocation;
pub mod error;
pub mod reservation;

pub use allocation::{allocate_action_points, gc_old_ledger_rows};
pub use error::LedgerError;
pub use reservation::{commit, release, reserve, sweep_expired_reservations};
