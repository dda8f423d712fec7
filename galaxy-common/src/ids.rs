//! Identity types for every persisted entity.
//!
//! Players and empires are authentication-adjacent principals, so they
//! carry a [`uuid::Uuid`] the way a session-keyed system would. Everything
//! an empire owns in bulk (planets, fleets, proposals, ...) is a simple
//! sequential id assigned by the store, following the same `u64`-alias
//! shape as `FleetId`/`PlanetId`/`BattleId`.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(u: Uuid) -> Self {
                Self(u)
            }
        }
    };
}

macro_rules! seq_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(v: i64) -> Self {
                Self(v)
            }
        }
    };
}

uuid_id!(PlayerId);
uuid_id!(EmpireId);

seq_id!(PlanetId);
seq_id!(FleetId);
seq_id!(ProposalId);
seq_id!(AgreementId);
seq_id!(TradeRouteId);
seq_id!(BuildingOrderId);
seq_id!(ShipOrderId);

/// Canonical, order-independent key for a pair of empires: (min, max).
/// Every `DiplomaticRelation` row is keyed by this so either side's request
/// resolves to the same row, per §3.
pub fn canonical_pair(a: EmpireId, b: EmpireId) -> (EmpireId, EmpireId) {
    if a.0 <= b.0 {
        (a, b)
    } else {
        (b, a)
    }
}
