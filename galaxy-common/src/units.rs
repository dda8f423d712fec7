//! Ship types and fleet composition (§3 Fleet, §4.C Combat Resolver).
//!
//! Keeps a base-stats table and experience-bonus shape, drops
//! cargo/fuel fields (this engine has no flight-path fuel model), trims
//! the roster down to seven combat-relevant types, and
//! adds `weapon_class`/`armor_class` for the Combat Resolver's
//! effectiveness matrix.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::resources::Resources;

/// Ship class a fleet's `composition` map is keyed by (§3 Fleet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipType {
    Scout,
    Fighter,
    Corvette,
    Destroyer,
    Cruiser,
    Battleship,
    Dreadnought,
}

impl ShipType {
    pub fn all() -> [ShipType; 7] {
        [
            ShipType::Scout,
            ShipType::Fighter,
            ShipType::Corvette,
            ShipType::Destroyer,
            ShipType::Cruiser,
            ShipType::Battleship,
            ShipType::Dreadnought,
        ]
    }

    pub fn base_stats(&self) -> ShipStats {
        match self {
            ShipType::Scout => ShipStats {
                attack: 5,
                defense: 2,
                health: 50,
                speed: 200,
                weapon_class: WeaponClass::Light,
                armor_class: ArmorClass::Light,
            },
            ShipType::Fighter => ShipStats {
                attack: 25,
                defense: 10,
                health: 100,
                speed: 150,
                weapon_class: WeaponClass::Light,
                armor_class: ArmorClass::Light,
            },
            ShipType::Corvette => ShipStats {
                attack: 40,
                defense: 18,
                health: 150,
                speed: 130,
                weapon_class: WeaponClass::Medium,
                armor_class: ArmorClass::Medium,
            },
            ShipType::Destroyer => ShipStats {
                attack: 60,
                defense: 30,
                health: 200,
                speed: 120,
                weapon_class: WeaponClass::Medium,
                armor_class: ArmorClass::Medium,
            },
            ShipType::Cruiser => ShipStats {
                attack: 80,
                defense: 40,
                health: 300,
                speed: 100,
                weapon_class: WeaponClass::Heavy,
                armor_class: ArmorClass::Medium,
            },
            ShipType::Battleship => ShipStats {
                attack: 200,
                defense: 100,
                health: 800,
                speed: 60,
                weapon_class: WeaponClass::Heavy,
                armor_class: ArmorClass::Heavy,
            },
            ShipType::Dreadnought => ShipStats {
                attack: 1000,
                defense: 500,
                health: 5000,
                speed: 20,
                weapon_class: WeaponClass::SuperHeavy,
                armor_class: ArmorClass::SuperHeavy,
            },
        }
    }

    pub fn construction_cost(&self) -> Resources {
        match self {
            ShipType::Scout => Resources::new(100, 50, 0, 0),
            ShipType::Fighter => Resources::new(500, 200, 0, 0),
            ShipType::Corvette => Resources::new(900, 400, 0, 0),
            ShipType::Destroyer => Resources::new(1500, 750, 20, 0),
            ShipType::Cruiser => Resources::new(2000, 1000, 10, 0),
            ShipType::Battleship => Resources::new(8000, 4000, 50, 0),
            ShipType::Dreadnought => Resources::new(100_000, 50_000, 5000, 0),
        }
    }

    pub fn construction_time_secs(&self) -> u64 {
        match self {
            ShipType::Scout => 60,
            ShipType::Fighter => 300,
            ShipType::Corvette => 450,
            ShipType::Destroyer => 500,
            ShipType::Cruiser => 900,
            ShipType::Battleship => 3600,
            ShipType::Dreadnought => 86_400,
        }
    }

    /// Minimum colonization composition: 2 scouts OR 1 corvette (§4.E).
    pub fn satisfies_colonization_minimum(composition: &BTreeMap<ShipType, u32>) -> bool {
        composition.get(&ShipType::Corvette).copied().unwrap_or(0) >= 1
            || composition.get(&ShipType::Scout).copied().unwrap_or(0) >= 2
    }
}

/// Weapon class for the combat effectiveness matrix (§4.C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponClass {
    Light,
    Medium,
    Heavy,
    SuperHeavy,
}

/// Armor class for the combat effectiveness matrix (§4.C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmorClass {
    Light,
    Medium,
    Heavy,
    SuperHeavy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShipStats {
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
    pub speed: u32,
    pub weapon_class: WeaponClass,
    pub armor_class: ArmorClass,
}

/// Fleet lifecycle state (§3 Fleet `status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleetStatus {
    Active,
    Moving,
    InCombat,
    Colonizing,
    Exploring,
    Destroyed,
}

/// A fleet's ship composition: type -> surviving count. `Σ = 0 <=> destroyed` (§3).
pub type Composition = BTreeMap<ShipType, u32>;

pub fn composition_total(composition: &Composition) -> u64 {
    composition.values().map(|&c| c as u64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colonization_minimum_accepts_either_path() {
        let mut scouts = Composition::new();
        scouts.insert(ShipType::Scout, 2);
        assert!(ShipType::satisfies_colonization_minimum(&scouts));

        let mut corvette = Composition::new();
        corvette.insert(ShipType::Corvette, 1);
        assert!(ShipType::satisfies_colonization_minimum(&corvette));

        let mut insufficient = Composition::new();
        insufficient.insert(ShipType::Scout, 1);
        assert!(!ShipType::satisfies_colonization_minimum(&insufficient));
    }
}
