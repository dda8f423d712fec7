//! Base production table and building/fleet consumption (§4.B).

use galaxy_common::{BuildingType, PlanetType, Resources, ShipType};
use std::collections::BTreeMap;

/// Base per-turn production for an unimproved planet of this type.
pub fn base_production(planet_type: PlanetType) -> Resources {
    match planet_type {
        PlanetType::Mining => Resources::new(200, 20, 10, 5),
        PlanetType::Energy => Resources::new(20, 200, 10, 5),
        PlanetType::Agricultural => Resources::new(10, 20, 200, 5),
        PlanetType::Research => Resources::new(10, 10, 10, 100),
        PlanetType::Industrial => Resources::new(100, 100, 20, 10),
        PlanetType::Fortress => Resources::new(30, 30, 30, 10),
        PlanetType::Balanced => Resources::new(60, 60, 60, 20),
    }
}

/// Per-instance-per-turn maintenance for a fleet's ship type (§4.B
/// "fleet maintenance"); scaled off construction cost so heavier hulls
/// cost more to keep fielded.
pub fn ship_maintenance(ship_type: ShipType) -> Resources {
    let cost = ship_type.construction_cost();
    Resources::new(0, (cost.metal + cost.energy) / 200, 0, 0)
}

/// Final per-planet production after building multipliers: `floor(base *
/// factor^count)` per resource kind, per §4.B.
pub fn planet_production(
    planet_type: PlanetType,
    buildings: &BTreeMap<BuildingType, u32>,
) -> Resources {
    let base = base_production(planet_type);
    let mut total = base;

    for (&building_type, &count) in buildings {
        if count == 0 {
            continue;
        }
        let factor = building_type.multiplier_factor().powi(count as i32);
        for resource_kind in building_type.boosts() {
            let current = resource_component(&total, *resource_kind);
            let boosted = (current as f64 * factor).floor() as i64 - current;
            add_to_component(&mut total, *resource_kind, boosted);
        }
    }
    total
}

/// Building maintenance summed across every building on the planet.
pub fn building_consumption(buildings: &BTreeMap<BuildingType, u32>) -> Resources {
    let mut total = Resources::zero();
    for (&building_type, &count) in buildings {
        for _ in 0..count {
            total += building_type.maintenance();
        }
    }
    total
}

fn resource_component(resources: &Resources, kind: galaxy_common::ResourceKind) -> i64 {
    use galaxy_common::ResourceKind::*;
    match kind {
        Metal => resources.metal,
        Energy => resources.energy,
        Food => resources.food,
        Research => resources.research,
    }
}

fn add_to_component(resources: &mut Resources, kind: galaxy_common::ResourceKind, delta: i64) {
    use galaxy_common::ResourceKind::*;
    match kind {
        Metal => resources.metal += delta,
        Energy => resources.energy += delta,
        Food => resources.food += delta,
        Research => resources.research += delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn building_multiplier_scales_only_its_resource() {
        let mut buildings = BTreeMap::new();
        buildings.insert(BuildingType::MiningFacility, 1);
        let production = planet_production(PlanetType::Mining, &buildings);
        let base = base_production(PlanetType::Mining);

        assert!(production.metal > base.metal);
        assert_eq!(production.energy, base.energy);
    }

    #[test]
    fn zero_buildings_yields_base_production() {
        let production = planet_production(PlanetType::Balanced, &BTreeMap::new());
        assert_eq!(production, base_production(PlanetType::Balanced));
    }
}
