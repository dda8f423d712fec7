//! Pure multi-round combat resolution (§4.C), the part of the Combat
//! Resolver with no store dependency. Keeps an attack/defense-table,
//! weakest-ship-first casualty shape, built out to the full damage
//! formula, initiative order, retreat thresholds, and the seven-entry
//! outcome table.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use galaxy_common::constants::{
    COMBAT_DEFENDER_DAMAGE_DIVISOR, COMBAT_EXPERIENCE_BONUS_PER_LEVEL, COMBAT_MAX_ROUNDS,
    COMBAT_MORALE_BONUS_RANGE, COMBAT_RETREAT_HEALTH_FRACTION, COMBAT_SURPRISE_ATTACK_MULTIPLIER,
};
use galaxy_common::ShipType;

use crate::effectiveness::effectiveness;

pub type Composition = BTreeMap<ShipType, u32>;

/// Everything the resolver needs from one side of the engagement; no
/// store ids, just the values combat math depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub composition: Composition,
    pub experience: u32,
    pub morale: i32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CombatOptions {
    pub surprise_attack: bool,
    /// Symmetric multiplicative environmental modifier applied to every
    /// salvo this engagement, default 1.0 (no terrain effect).
    pub terrain_modifier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Attacker,
    Defender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultType {
    DecisiveVictory,
    DefensiveVictory,
    AttackerRetreat,
    DefenderRetreat,
    MutualDestruction,
    Draw,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundLog {
    pub round: u32,
    pub first_striker: Side,
    pub attacker_damage_dealt: u64,
    pub defender_damage_dealt: u64,
    pub attacker_losses: Composition,
    pub defender_losses: Composition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatOutcome {
    pub winner: Option<Side>,
    pub result_type: ResultType,
    pub rounds: Vec<RoundLog>,
    pub final_attacker: Composition,
    pub final_defender: Composition,
    pub attacker_experience_delta: u32,
    pub defender_experience_delta: u32,
    pub attacker_morale_delta: i32,
    pub defender_morale_delta: i32,
}

fn composition_total(c: &Composition) -> u64 {
    c.values().map(|&v| v as u64).sum()
}

fn weighted_average_speed(c: &Composition) -> f64 {
    let total = composition_total(c);
    if total == 0 {
        return 0.0;
    }
    let sum: f64 = c
        .iter()
        .map(|(t, &count)| t.base_stats().speed as f64 * count as f64)
        .sum();
    sum / total as f64
}

/// Sum of `count * health` across surviving ships, used both as the
/// denominator for initial health and the numerator for the retreat check.
fn aggregate_health(c: &Composition) -> f64 {
    c.iter()
        .map(|(t, &count)| t.base_stats().health as f64 * count as f64)
        .sum()
}

fn single_salvo_damage(
    attacker_type: ShipType,
    defender_type: ShipType,
    attacker_exp: u32,
    attacker_morale: i32,
    attacking_side: Side,
    round: u32,
    options: &CombatOptions,
    rng: &mut impl Rng,
) -> u64 {
    let a_stats = attacker_type.base_stats();
    let d_stats = defender_type.base_stats();

    let eff = effectiveness(a_stats.weapon_class, d_stats.armor_class);
    let mut raw = a_stats.attack as f64 * eff * (1.0 - d_stats.defense as f64 / (d_stats.defense as f64 + 10.0));

    raw *= 1.0 + attacker_exp as f64 * COMBAT_EXPERIENCE_BONUS_PER_LEVEL;
    raw *= 1.0 + (attacker_morale as f64 - 50.0) / 50.0 * COMBAT_MORALE_BONUS_RANGE;

    if options.surprise_attack && round == 1 && attacking_side == Side::Attacker {
        raw *= COMBAT_SURPRISE_ATTACK_MULTIPLIER;
    }
    if attacking_side == Side::Attacker {
        raw /= COMBAT_DEFENDER_DAMAGE_DIVISOR;
    }
    if options.terrain_modifier > 0.0 {
        raw *= options.terrain_modifier;
    }

    raw *= rng.gen_range(galaxy_common::constants::COMBAT_DAMAGE_VARIANCE_LOW..=galaxy_common::constants::COMBAT_DAMAGE_VARIANCE_HIGH);

    (raw.round() as i64).max(1) as u64
}

/// One side's turn within a round: every ship type with survivors picks a
/// random live enemy target type and fires one salvo scaled by its count.
fn fire_side(
    attacker_side: Side,
    attacker_composition: &Composition,
    defender_composition: &mut Composition,
    attacker_exp: u32,
    attacker_morale: i32,
    round: u32,
    options: &CombatOptions,
    rng: &mut impl Rng,
) -> (u64, Composition) {
    let mut total_damage = 0u64;
    let mut losses: Composition = Composition::new();

    let attacker_types: Vec<ShipType> = attacker_composition
        .iter()
        .filter(|(_, &c)| c > 0)
        .map(|(&t, _)| t)
        .collect();

    for attacker_type in attacker_types {
        let count = *attacker_composition.get(&attacker_type).unwrap_or(&0);
        if count == 0 {
            continue;
        }

        let live_targets: Vec<ShipType> = defender_composition
            .iter()
            .filter(|(_, &c)| c > 0)
            .map(|(&t, _)| t)
            .collect();
        let Some(&target_type) = live_targets.get(rng.gen_range(0..live_targets.len().max(1))) else {
            continue;
        };

        let per_ship_damage = single_salvo_damage(
            attacker_type,
            target_type,
            attacker_exp,
            attacker_morale,
            attacker_side,
            round,
            options,
            rng,
        );
        let salvo_damage = per_ship_damage * count as u64;
        total_damage += salvo_damage;

        let target_health = target_type.base_stats().health as u64;
        let surviving = *defender_composition.get(&target_type).unwrap_or(&0);
        let destroyed = (salvo_damage / target_health).min(surviving as u64) as u32;

        if destroyed > 0 {
            *defender_composition.get_mut(&target_type).unwrap() -= destroyed;
            *losses.entry(target_type).or_insert(0) += destroyed;
        }
    }

    (total_damage, losses)
}

/// Resolves a full engagement per §4.C: initiative, up to
/// [`COMBAT_MAX_ROUNDS`] rounds of mutual salvos, retreat/defeat
/// termination, outcome classification, and post-combat experience/morale
/// deltas. Takes an injectable RNG so tests pin a seed (§9 Determinism).
pub fn resolve_combat(
    attacker: &FleetSnapshot,
    defender: &FleetSnapshot,
    options: CombatOptions,
    rng: &mut impl Rng,
) -> CombatOutcome {
    let mut attacker_composition = attacker.composition.clone();
    let mut defender_composition = defender.composition.clone();

    let attacker_initial_health = aggregate_health(&attacker_composition).max(1.0);
    let defender_initial_health = aggregate_health(&defender_composition).max(1.0);

    let mut rounds = Vec::new();
    let mut round = 1u32;
    let mut attacker_retreated = false;
    let mut defender_retreated = false;

    loop {
        if composition_total(&attacker_composition) == 0 || composition_total(&defender_composition) == 0 {
            break;
        }
        if round > COMBAT_MAX_ROUNDS {
            break;
        }

        let attacker_speed = weighted_average_speed(&attacker_composition);
        let defender_speed = weighted_average_speed(&defender_composition);
        // Tie goes to the attacker (§4.C initiative).
        let attacker_first = attacker_speed >= defender_speed;

        let mut attacker_damage = 0u64;
        let mut defender_damage = 0u64;
        let mut attacker_losses = Composition::new();
        let mut defender_losses = Composition::new();

        macro_rules! attacker_fires {
            () => {{
                let (dmg, losses) = fire_side(
                    Side::Attacker,
                    &attacker_composition,
                    &mut defender_composition,
                    attacker.experience,
                    attacker.morale,
                    round,
                    &options,
                    rng,
                );
                attacker_damage += dmg;
                for (t, c) in losses {
                    *defender_losses.entry(t).or_insert(0) += c;
                }
            }};
        }
        macro_rules! defender_fires {
            () => {{
                let (dmg, losses) = fire_side(
                    Side::Defender,
                    &defender_composition,
                    &mut attacker_composition,
                    defender.experience,
                    defender.morale,
                    round,
                    &options,
                    rng,
                );
                defender_damage += dmg;
                for (t, c) in losses {
                    *attacker_losses.entry(t).or_insert(0) += c;
                }
            }};
        }

        if attacker_first {
            attacker_fires!();
            if composition_total(&defender_composition) > 0 {
                defender_fires!();
            }
        } else {
            defender_fires!();
            if composition_total(&attacker_composition) > 0 {
                attacker_fires!();
            }
        }

        rounds.push(RoundLog {
            round,
            first_striker: if attacker_first { Side::Attacker } else { Side::Defender },
            attacker_damage_dealt: attacker_damage,
            defender_damage_dealt: defender_damage,
            attacker_losses,
            defender_losses,
        });

        let attacker_remaining_frac = aggregate_health(&attacker_composition) / attacker_initial_health;
        let defender_remaining_frac = aggregate_health(&defender_composition) / defender_initial_health;

        let attacker_empty = composition_total(&attacker_composition) == 0;
        let defender_empty = composition_total(&defender_composition) == 0;

        if !attacker_empty && attacker_remaining_frac <= COMBAT_RETREAT_HEALTH_FRACTION {
            attacker_retreated = true;
        }
        if !defender_empty && defender_remaining_frac <= COMBAT_RETREAT_HEALTH_FRACTION {
            defender_retreated = true;
        }

        if attacker_empty || defender_empty || attacker_retreated || defender_retreated {
            break;
        }

        round += 1;
    }

    let attacker_empty = composition_total(&attacker_composition) == 0;
    let defender_empty = composition_total(&defender_composition) == 0;

    let (winner, result_type) = classify(
        attacker_empty,
        defender_empty,
        attacker_retreated,
        defender_retreated,
        rounds.len() as u32 >= COMBAT_MAX_ROUNDS,
    );

    let attacker_power = fleet_power(&attacker.composition);
    let defender_power = fleet_power(&defender.composition);

    let (attacker_exp, attacker_morale) = post_combat_deltas(
        &result_type,
        winner == Some(Side::Attacker),
        defender_power > attacker_power,
        attacker.experience,
    );
    let (defender_exp, defender_morale) = post_combat_deltas(
        &result_type,
        winner == Some(Side::Defender),
        attacker_power > defender_power,
        defender.experience,
    );

    CombatOutcome {
        winner,
        result_type,
        rounds,
        final_attacker: attacker_composition,
        final_defender: defender_composition,
        attacker_experience_delta: attacker_exp,
        defender_experience_delta: defender_exp,
        attacker_morale_delta: attacker_morale,
        defender_morale_delta: defender_morale,
    }
}

/// Pre-battle strength used only for the underdog experience bonus (§4.C
/// Post-combat): attack+defense weighted by health, so a handful of
/// durable, hard-hitting ships outweighs a larger but fragile swarm.
fn fleet_power(composition: &Composition) -> u64 {
    composition
        .iter()
        .map(|(t, &count)| {
            let stats = t.base_stats();
            (stats.attack as u64 + stats.defense as u64) * stats.health as u64 * count as u64
        })
        .sum()
}

/// §4.C outcome table, exhaustive over the five boolean inputs.
fn classify(
    attacker_empty: bool,
    defender_empty: bool,
    attacker_retreated: bool,
    defender_retreated: bool,
    hit_round_cap: bool,
) -> (Option<Side>, ResultType) {
    match (attacker_empty, defender_empty) {
        (false, true) => (Some(Side::Attacker), ResultType::DecisiveVictory),
        (true, false) => (Some(Side::Defender), ResultType::DefensiveVictory),
        (true, true) => (None, ResultType::MutualDestruction),
        (false, false) => {
            if attacker_retreated {
                (Some(Side::Defender), ResultType::AttackerRetreat)
            } else if defender_retreated {
                (Some(Side::Attacker), ResultType::DefenderRetreat)
            } else if hit_round_cap {
                (None, ResultType::Draw)
            } else {
                // Unreachable in practice: the loop only stops when one of
                // the above conditions holds, kept exhaustive for safety.
                (None, ResultType::Draw)
            }
        }
    }
}

/// Per-side experience/morale deltas (§4.C Post-combat).
fn post_combat_deltas(
    result_type: &ResultType,
    is_victor: bool,
    enemy_power_higher: bool,
    current_exp: u32,
) -> (u32, i32) {
    use galaxy_common::constants::{
        COMBAT_BASE_EXPERIENCE, COMBAT_MORALE_DEFEAT_DELTA, COMBAT_MORALE_RETREAT_DELTA,
        COMBAT_MORALE_VICTORY_DELTA,
    };

    let mut exp = COMBAT_BASE_EXPERIENCE as f64;
    if is_victor {
        exp += 1.0;
    }
    if enemy_power_higher {
        exp += 1.0;
    }
    exp *= (1.0 - 0.1 * current_exp as f64).max(0.1);
    let exp_delta = exp.round().max(0.0) as u32;

    let morale_delta = match result_type {
        ResultType::DecisiveVictory | ResultType::DefensiveVictory => {
            if is_victor {
                COMBAT_MORALE_VICTORY_DELTA
            } else {
                COMBAT_MORALE_DEFEAT_DELTA
            }
        }
        ResultType::AttackerRetreat | ResultType::DefenderRetreat => {
            if is_victor {
                COMBAT_MORALE_VICTORY_DELTA
            } else {
                COMBAT_MORALE_RETREAT_DELTA
            }
        }
        ResultType::MutualDestruction => COMBAT_MORALE_DEFEAT_DELTA,
        ResultType::Draw => 0,
    };

    (exp_delta, morale_delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn composition(ship: ShipType, count: u32) -> Composition {
        let mut c = Composition::new();
        c.insert(ship, count);
        c
    }

    #[test]
    fn destroyer_fleet_decisively_beats_corvette_fleet_with_pinned_seed() {
        let attacker = FleetSnapshot {
            composition: composition(ShipType::Destroyer, 5),
            experience: 0,
            morale: 50,
        };
        let defender = FleetSnapshot {
            composition: composition(ShipType::Corvette, 10),
            experience: 0,
            morale: 50,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let outcome = resolve_combat(&attacker, &defender, CombatOptions::default(), &mut rng);

        assert_eq!(outcome.winner, Some(Side::Attacker));
        assert_eq!(outcome.result_type, ResultType::DecisiveVictory);
        assert!(outcome.rounds.len() as u32 <= COMBAT_MAX_ROUNDS);
        assert!(composition_total(&outcome.final_attacker) > 0);
        assert_eq!(composition_total(&outcome.final_defender), 0);
        assert_eq!(outcome.attacker_experience_delta, 2);
        assert_eq!(outcome.attacker_morale_delta, 10); // starting morale 50 -> 60
    }

    #[test]
    fn weakest_attacker_still_deals_minimum_one_damage() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let damage = single_salvo_damage(
            ShipType::Scout,
            ShipType::Dreadnought,
            0,
            50,
            Side::Attacker,
            1,
            &CombatOptions::default(),
            &mut rng,
        );
        assert!(damage >= 1);
    }

    #[test]
    fn never_exceeds_max_rounds() {
        // Two evenly matched superheavy fleets tend to grind; confirm the
        // hard cap still applies.
        let attacker = FleetSnapshot {
            composition: composition(ShipType::Dreadnought, 3),
            experience: 0,
            morale: 50,
        };
        let defender = FleetSnapshot {
            composition: composition(ShipType::Dreadnought, 3),
            experience: 0,
            morale: 50,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let outcome = resolve_combat(&attacker, &defender, CombatOptions::default(), &mut rng);
        assert!(outcome.rounds.len() as u32 <= COMBAT_MAX_ROUNDS);
    }

    #[test]
    fn outcome_classification_is_exhaustive() {
        assert_eq!(
            classify(false, true, false, false, false),
            (Some(Side::Attacker), ResultType::DecisiveVictory)
        );
        assert_eq!(
            classify(true, false, false, false, false),
            (Some(Side::Defender), ResultType::DefensiveVictory)
        );
        assert_eq!(classify(true, true, false, false, false), (None, ResultType::MutualDestruction));
        assert_eq!(
            classify(false, false, true, false, false),
            (Some(Side::Defender), ResultType::AttackerRetreat)
        );
        assert_eq!(
            classify(false, false, false, true, false),
            (Some(Side::Attacker), ResultType::DefenderRetreat)
        );
        assert_eq!(classify(false, false, false, false, true), (None, ResultType::Draw));
    }
}
