//! Pure snapshot-to-outcome calculation (§4.B): the part of the Resource
//! Calculator with no store dependency, kept separate so it's trivially
//! unit-testable without a `Store`.

use galaxy_common::constants::{MIN_STORAGE_CAP, OVERFLOW_TO_RESEARCH_RATE, STORAGE_CAP_PRODUCTION_MULTIPLIER};
use galaxy_common::Resources;
use serde::{Deserialize, Serialize};

use crate::production::{building_consumption, planet_production, ship_maintenance};
use galaxy_store::{Fleet, Planet};

/// Result of evaluating one empire's economy for a turn, before persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomySnapshot {
    pub production: Resources,
    pub consumption: Resources,
    pub net: Resources,
    pub sustainable: bool,
    pub storage_cap: Resources,
}

/// Storage cap per resource: `max(MIN_STORAGE_CAP, STORAGE_CAP_PRODUCTION_MULTIPLIER * production)`.
pub fn storage_cap(production: &Resources) -> Resources {
    let capped = |p: i64| (p * STORAGE_CAP_PRODUCTION_MULTIPLIER).max(MIN_STORAGE_CAP);
    Resources::new(
        capped(production.metal),
        capped(production.energy),
        capped(production.food),
        capped(production.research),
    )
}

/// Evaluates production, consumption, and net for one empire from a
/// snapshot of its planets and fleets (§4.B).
pub fn evaluate(planets: &[Planet], fleets: &[Fleet]) -> EconomySnapshot {
    let mut production = Resources::zero();
    let mut consumption = Resources::zero();

    for planet in planets {
        if !matches!(planet.status, galaxy_common::PlanetStatus::Active) {
            continue;
        }
        production += planet_production(planet.planet_type, &planet.buildings);
        consumption += building_consumption(&planet.buildings);
    }

    for fleet in fleets {
        for (&ship_type, &count) in &fleet.composition {
            if count == 0 {
                continue;
            }
            let maintenance = ship_maintenance(ship_type);
            for _ in 0..count {
                consumption += maintenance;
            }
        }
    }

    let net = production - consumption;
    let sustainable = net.metal >= 0 && net.energy >= 0 && net.food >= 0 && net.research >= 0;
    let storage_cap = storage_cap(&production);

    EconomySnapshot {
        production,
        consumption,
        net,
        sustainable,
        storage_cap,
    }
}

/// Applies a net delta to the current resource vector, clamping to
/// `[0, cap]` and converting overflow above the cap into research at
/// [`OVERFLOW_TO_RESEARCH_RATE`] (§4.B). Research itself never overflows
/// into research.
pub fn apply(current: Resources, net: Resources, cap: Resources) -> Resources {
    let mut result = current;
    let mut overflow_to_research = 0i64;

    apply_component(&mut result.metal, net.metal, cap.metal, &mut overflow_to_research);
    apply_component(&mut result.energy, net.energy, cap.energy, &mut overflow_to_research);
    apply_component(&mut result.food, net.food, cap.food, &mut overflow_to_research);

    // Research accumulates net + any overflow-converted amount, still clamped
    // to its own cap, but never itself overflows back into research.
    let raw_research = (result.research + net.research + overflow_to_research).max(0);
    result.research = raw_research.min(cap.research);

    result
}

fn apply_component(value: &mut i64, net: i64, cap: i64, overflow_accum: &mut i64) {
    let raw = (*value + net).max(0);
    if raw > cap {
        let overflow = raw - cap;
        *overflow_accum += (overflow as f64 * OVERFLOW_TO_RESEARCH_RATE).floor() as i64;
        *value = cap;
    } else {
        *value = raw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_converts_excess_to_research_at_configured_rate() {
        let cap = Resources::new(1000, 1000, 1000, 1000);
        let current = Resources::new(900, 0, 0, 0);
        let net = Resources::new(500, 0, 0, 0);

        let result = apply(current, net, cap);

        assert_eq!(result.metal, 1000);
        // overflow = (900 + 500) - 1000 = 400, floor(400 * 0.10) = 40
        assert_eq!(result.research, 40);
    }

    #[test]
    fn resources_never_go_negative() {
        let cap = Resources::new(1000, 1000, 1000, 1000);
        let current = Resources::new(10, 10, 10, 10);
        let net = Resources::new(-50, -50, -50, -50);

        let result = apply(current, net, cap);
        assert_eq!(result.metal, 0);
        assert_eq!(result.research, 0);
    }
}
