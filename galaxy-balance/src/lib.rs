//! # Galaxy Turn Engine — Balance
//!
//! Component F, the Game-Balance Engine: the closed action-type allow-list,
//! resource/quantity bounds, time-between-actions floors, scaled-cost
//! multiplier, and exploit heuristics. Applied to every state-changing
//! request before the ledger reserves points (§4.I).

pub mod action;
pub mod validator;
pub mod violations;

pub use action::ActionType;
pub use validator::{validate, ActionQuantities};
pub use violations::{Severity, ValidationResult, Violation};
