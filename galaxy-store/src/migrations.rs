//! Schema migration bookkeeping (§4.A: "refuses to start if pending
//! migrations are detected").
//!
//! The in-memory store has no schema to migrate; this module exists so the
//! `postgres` feature and the `galaxy` CLI's `init` subcommand share one
//! vocabulary for "which migrations have run" regardless of backend.

use serde::{Deserialize, Serialize};

/// One row of the `migrations` table named in §6's persisted state layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: chrono::DateTime<chrono::Utc>,
}

/// The fixed, ordered list of migrations this engine ships. Real SQL lives
/// under `migrations/` for the `postgres` feature; this list is the
/// canonical version/name pairing both backends check against.
pub const MIGRATIONS: &[(i64, &str)] = &[
    (1, "create_players"),
    (2, "create_empires"),
    (3, "create_planets"),
    (4, "create_fleets"),
    (5, "create_diplomatic_relations"),
    (6, "create_diplomatic_proposals"),
    (7, "create_agreements"),
    (8, "create_trade_routes"),
    (9, "create_action_point_ledger"),
    (10, "create_action_point_reservations"),
    (11, "create_player_actions"),
    (12, "create_game_state"),
];

pub fn pending(applied: &[MigrationRecord]) -> Vec<(i64, &'static str)> {
    let applied_versions: std::collections::HashSet<i64> =
        applied.iter().map(|m| m.version).collect();
    MIGRATIONS
        .iter()
        .filter(|(version, _)| !applied_versions.contains(version))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_applied_migrations_means_everything_pending() {
        assert_eq!(pending(&[]).len(), MIGRATIONS.len());
    }

    #[test]
    fn fully_applied_means_nothing_pending() {
        let applied: Vec<_> = MIGRATIONS
            .iter()
            .map(|(version, name)| MigrationRecord {
                version: *version,
                name: name.to_string(),
                applied_at: chrono::Utc::now(),
            })
            .collect();
        assert!(pending(&applied).is_empty());
    }
}
