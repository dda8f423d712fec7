//! Game-balance numeric constants (§4.B, §4.E, §4.F, §4.G, §4.H).
//!
//! A flat `pub const` constants module covering this engine's
//! turn/resource/combat parameters.

// ========== Action points (§4.G) ==========

/// Action points granted to an empire at the start of each turn.
pub const DEFAULT_ACTION_POINTS_PER_TURN: u32 = 10;

/// Seconds a reservation may sit uncommitted before the sweep reclaims it.
pub const ACTION_POINT_RESERVATION_TTL_SECS: i64 = 30;

/// Multiplier applied to the reservation cost of actions flagged emergency.
pub const EMERGENCY_ACTION_POINT_MULTIPLIER: f64 = 2.0;

// ========== Turn cadence (§4.H) ==========

/// Default wall-clock duration of a turn.
pub const DEFAULT_TURN_DURATION_HOURS: i64 = 24;

/// Fraction of a turn's elapsed duration at which phase flips to `warning`.
pub const TURN_PHASE_WARNING_THRESHOLD: f64 = 0.80;

/// Fraction of a turn's elapsed duration at which phase flips to `final`.
pub const TURN_PHASE_FINAL_THRESHOLD: f64 = 0.95;

// ========== Resource storage and overflow (§4.B) ==========

/// Minimum storage cap regardless of production (floor).
pub const MIN_STORAGE_CAP: i64 = 1000;

/// Storage cap is `max(MIN_STORAGE_CAP, STORAGE_CAP_PRODUCTION_MULTIPLIER * production)`.
pub const STORAGE_CAP_PRODUCTION_MULTIPLIER: i64 = 10;

/// Fraction of overflow production converted to research instead of discarded.
pub const OVERFLOW_TO_RESEARCH_RATE: f64 = 0.10;

/// Building multiplier applied per matching building instance (§4.B),
/// default for types without a specific entry in `BuildingType::multiplier_factor`.
pub const DEFAULT_BUILDING_MULTIPLIER: f64 = 1.25;

// ========== Territory expansion (§4.E) ==========

/// Maximum colonies (active or colonizing) one empire may hold.
pub const MAX_COLONIES_PER_EMPIRE: u32 = 20;

/// Hours a colonization order takes to complete.
pub const COLONIZATION_DURATION_HOURS: i64 = 24;

/// Population a planet starts with while `colonizing`.
pub const COLONIZATION_START_POPULATION: i64 = 1000;

/// Population a planet reaches on completion.
pub const COLONIZATION_COMPLETE_POPULATION: i64 = 2000;

/// Fraction of material cost refunded on abandoning a colony.
pub const ABANDON_COLONY_REFUND_RATE: f64 = 0.50;

// ========== Game-balance engine quantity caps (§4.F) ==========

pub const MAX_FLEETS_PER_EMPIRE: u32 = 50;
pub const MAX_SHIPS_PER_FLEET: u32 = 1000;
pub const MAX_SHIPS_PER_EMPIRE: u64 = 10_000;

/// Inclusive bound on any single resource cost value.
pub const MAX_RESOURCE_COST: i64 = 1_000_000;

/// Minimum seconds between two attack actions by the same empire.
pub const MIN_SECONDS_BETWEEN_ATTACKS: i64 = 5 * 60;
/// Minimum seconds between two colonization actions by the same empire.
pub const MIN_SECONDS_BETWEEN_COLONIZATIONS: i64 = 30 * 60;
/// Minimum seconds between two diplomacy actions by the same empire.
pub const MIN_SECONDS_BETWEEN_DIPLOMACY: i64 = 2 * 60;

/// Scaled-cost multiplier base: `1 + max(0, colonies - 5) * SCALED_COST_STEP`.
pub const SCALED_COST_FREE_COLONIES: u32 = 5;
pub const SCALED_COST_STEP: f64 = 0.1;
pub const SCALED_COST_CAP: f64 = 2.0;

/// Exploit heuristic thresholds (warnings unless "high" severity).
pub const EXPLOIT_ACTIONS_PER_MINUTE_THRESHOLD: u32 = 10;
pub const EXPLOIT_RESOURCE_TRANSFER_PER_TURN_THRESHOLD: i64 = 100_000;

// ========== Combat resolver (§4.C) ==========

pub const COMBAT_MAX_ROUNDS: u32 = 10;
/// Aggregate remaining-health fraction at or below which a side retreats.
pub const COMBAT_RETREAT_HEALTH_FRACTION: f64 = 0.30;
pub const COMBAT_EXPERIENCE_BONUS_PER_LEVEL: f64 = 0.10;
pub const COMBAT_MORALE_BONUS_RANGE: f64 = 0.20;
pub const COMBAT_SURPRISE_ATTACK_MULTIPLIER: f64 = 1.5;
pub const COMBAT_DEFENDER_DAMAGE_DIVISOR: f64 = 1.2;
pub const COMBAT_DAMAGE_VARIANCE_LOW: f64 = 0.8;
pub const COMBAT_DAMAGE_VARIANCE_HIGH: f64 = 1.2;

pub const COMBAT_BASE_EXPERIENCE: u32 = 1;
pub const COMBAT_MORALE_VICTORY_DELTA: i32 = 10;
pub const COMBAT_MORALE_RETREAT_DELTA: i32 = -5;
pub const COMBAT_MORALE_DEFEAT_DELTA: i32 = -15;

/// Effectiveness matrix bounds (§4.C): weapon_class x armor_class in [0.4, 1.6].
pub const COMBAT_EFFECTIVENESS_MIN: f64 = 0.4;
pub const COMBAT_EFFECTIVENESS_MAX: f64 = 1.6;

// ========== Diplomacy (§4.D) ==========

pub const TRUST_LEVEL_MIN: i32 = -100;
pub const TRUST_LEVEL_MAX: i32 = 100;

/// Default proposal lifetime when a proposal type doesn't override it.
pub const DEFAULT_PROPOSAL_EXPIRY_DAYS: i64 = 7;
