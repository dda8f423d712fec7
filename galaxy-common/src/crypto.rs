//! Procedural generation and the opt-in commit-reveal primitive.
//!
//! `procedural_hash`/`generate_planet_name`/`generate_planet_type` share
//! syllable tables and a hash-byte-indexing scheme, generalized to seven
//! planet types and driven by a `DEFAULT_GALAXY_SEED`. `Commitment<T>`
//! is kept as a general-purpose commit-reveal helper but is not wired
//! into sector exploration — per-sector visibility here is
//! global-on-discovery rather than fog-of-war-gated (an explicit
//! Open Question decision, see DESIGN.md).

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use crate::types::PlanetType;

pub type CommitHash = [u8; 32];
pub type Salt = [u8; 32];

/// Fixed seed used for procedural generation when the caller doesn't
/// supply one (e.g. a single-galaxy deployment).
pub const DEFAULT_GALAXY_SEED: [u8; 32] = *b"GALAXY_TURN_ENGINE_SEED_V1______";

pub fn generate_salt(seed: &[u8]) -> Salt {
    let mut hasher = Sha3_256::new();
    hasher.update(b"GALAXY_TURN_ENGINE_SALT_V1");
    hasher.update(seed);
    let result = hasher.finalize();
    let mut salt = [0u8; 32];
    salt.copy_from_slice(&result);
    salt
}

/// Deterministic hash of a (seed, coordinate, purpose) tuple; the basis for
/// every procedural value this module derives.
pub fn procedural_hash(seed: &[u8; 32], x: i64, y: i64, purpose: &str) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(b"GALAXY_TURN_ENGINE_PROCEDURAL_V1");
    hasher.update(seed);
    hasher.update(x.to_le_bytes());
    hasher.update(y.to_le_bytes());
    hasher.update(purpose.as_bytes());
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

const PREFIXES: &[&str] = &[
    "Al", "Bel", "Cor", "Dra", "El", "Far", "Gal", "Hel", "Ion", "Kel", "Lyr", "Mal", "Neb", "Ori",
    "Pax", "Qua", "Rig", "Sol", "Tau", "Ura", "Veg", "Wol", "Xen", "Yed", "Zet",
];

const MIDDLES: &[&str] = &[
    "ar", "en", "ir", "on", "ur", "ax", "ex", "ix", "ox", "ux", "an", "in", "un", "as", "is", "os",
    "us", "at", "et", "it",
];

const SUFFIXES: &[&str] = &[
    "a", "i", "o", "us", "is", "on", "ar", "or", "ix", "ax", "ia", "io", "ius", "ium", "ara",
    "ora", "ira", "ura", "era",
];

/// Syllable-based deterministic planet name for a given sector coordinate
/// and in-sector index (a sector can yield several planets).
pub fn generate_planet_name(seed: &[u8; 32], x: i64, y: i64, index: u32) -> String {
    let hash = procedural_hash(seed, x, y + (index as i64) * 131, "planet_name");
    let prefix_idx = hash[0] as usize % PREFIXES.len();
    let middle_idx = hash[1] as usize % MIDDLES.len();
    let suffix_idx = hash[2] as usize % SUFFIXES.len();
    format!(
        "{}{}{}",
        PREFIXES[prefix_idx], MIDDLES[middle_idx], SUFFIXES[suffix_idx]
    )
}

/// Draws a [`PlanetType`] from the weighted distribution territory
/// expansion uses when generating a sector's planets (§4.E).
///
/// Chosen to favor the three mid-tier economic types while keeping
/// fortress/research rarer.
pub fn generate_planet_type(seed: &[u8; 32], x: i64, y: i64, index: u32) -> PlanetType {
    let hash = procedural_hash(seed, x, y + (index as i64) * 131, "planet_type");
    match hash[0] % 100 {
        0..=19 => PlanetType::Mining,        // 20%
        20..=34 => PlanetType::Energy,       // 15%
        35..=49 => PlanetType::Agricultural, // 15%
        50..=64 => PlanetType::Industrial,   // 15%
        65..=79 => PlanetType::Balanced,     // 15%
        80..=89 => PlanetType::Research,     // 10%
        _ => PlanetType::Fortress,           // 10%
    }
}

/// Commit-reveal helper for callers that want to stage a reveal (e.g. a
/// future sealed-bid trade or hidden-fleet mode); unused by the default
/// exploration path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commitment<T> {
    pub hash: CommitHash,
    pub created_at: crate::clock::Timestamp,
    pub revealed: bool,
    #[serde(skip)]
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Serialize> Commitment<T> {
    pub fn new(data: &T, salt: &Salt, timestamp: crate::clock::Timestamp) -> Self {
        let data_bytes = serde_json::to_vec(data).unwrap_or_default();
        let mut hasher = Sha3_256::new();
        hasher.update(&data_bytes);
        hasher.update(salt);
        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        Self {
            hash,
            created_at: timestamp,
            revealed: false,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn verify(&self, data: &T, salt: &Salt) -> bool {
        let data_bytes = serde_json::to_vec(data).unwrap_or_default();
        let mut hasher = Sha3_256::new();
        hasher.update(&data_bytes);
        hasher.update(salt);
        let result = hasher.finalize();
        result.as_slice() == self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_name_is_deterministic() {
        let seed = DEFAULT_GALAXY_SEED;
        let name1 = generate_planet_name(&seed, 10, 20, 0);
        let name2 = generate_planet_name(&seed, 10, 20, 0);
        assert_eq!(name1, name2);

        let name3 = generate_planet_name(&seed, 10, 20, 1);
        assert_ne!(name1, name3);
    }

    #[test]
    fn commit_reveal_rejects_wrong_salt() {
        let data = vec![1u8, 2, 3];
        let salt = generate_salt(b"test");
        let commitment = Commitment::new(&data, &salt, chrono::Utc::now());
        assert!(commitment.verify(&data, &salt));

        let wrong_salt = generate_salt(b"other");
        assert!(!commitment.verify(&data, &wrong_salt));
    }
}
