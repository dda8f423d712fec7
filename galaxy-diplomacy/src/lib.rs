//! # Galaxy Turn Engine — Diplomacy
//!
//! Component D, the Diplomacy Processor: relation/trust bookkeeping,
//! proposal lifecycle, and per-turn trade-route settlement.

pub mod agreements;
pub mod error;
pub mod proposals;
pub mod relation;
pub mod trade_routes;

pub use agreements::expire_agreements;
pub use error::DiplomacyError;
pub use proposals::{create_proposal, expire_due_proposals, respond, ProposalResponse};
pub use relation::{can_attack, can_share, can_trade, get_or_create_relation};
pub use trade_routes::{establish_trade_route, process_trade_routes};
