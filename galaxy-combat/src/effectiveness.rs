//! Weapon/armor effectiveness matrix (§4.C): `weapon_class x armor_class`,
//! bounded to `[COMBAT_EFFECTIVENESS_MIN, COMBAT_EFFECTIVENESS_MAX]`.
//!
//! Only the bounds are fixed elsewhere; the entries are a
//! rock-paper-scissors table (light beats light, heavy beats superheavy
//! armor poorly head-on, superheavy crushes light armor) chosen to respect
//! those bounds — see DESIGN.md for the Open Question decision.

use galaxy_common::{ArmorClass, WeaponClass};

pub fn effectiveness(weapon: WeaponClass, armor: ArmorClass) -> f64 {
    use ArmorClass::*;
    use WeaponClass::*;
    match (weapon, armor) {
        (Light, Light) => 1.2,
        (Light, Medium) => 1.0,
        (Light, Heavy) => 0.6,
        (Light, SuperHeavy) => 0.4,

        (Medium, Light) => 1.3,
        (Medium, Medium) => 1.2,
        (Medium, Heavy) => 0.9,
        (Medium, SuperHeavy) => 0.6,

        (Heavy, Light) => 1.0,
        (Heavy, Medium) => 1.3,
        (Heavy, Heavy) => 1.2,
        (Heavy, SuperHeavy) => 0.9,

        (SuperHeavy, Light) => 0.8,
        (SuperHeavy, Medium) => 1.0,
        (SuperHeavy, Heavy) => 1.4,
        (SuperHeavy, SuperHeavy) => 1.6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::constants::{COMBAT_EFFECTIVENESS_MAX, COMBAT_EFFECTIVENESS_MIN};

    #[test]
    fn every_entry_is_within_the_spec_bounds() {
        for weapon in [
            WeaponClass::Light,
            WeaponClass::Medium,
            WeaponClass::Heavy,
            WeaponClass::SuperHeavy,
        ] {
            for armor in [
                ArmorClass::Light,
                ArmorClass::Medium,
                ArmorClass::Heavy,
                ArmorClass::SuperHeavy,
            ] {
                let eff = effectiveness(weapon, armor);
                assert!(eff >= COMBAT_EFFECTIVENESS_MIN && eff <= COMBAT_EFFECTIVENESS_MAX);
            }
        }
    }
}
