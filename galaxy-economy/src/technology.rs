//! Technology bonus hook (§3 Empire `technology`): the bonus function is
//! left design-level, a named hook rather than a fixed curve. `Empire::technology` already
//! carries a `TechnologyCategory -> level` map; this module is the trait
//! boundary a future bonus formula plugs into without the calculator
//! needing to know what that formula is.

use galaxy_common::TechnologyCategory;

/// Maps a technology category and its current level to a production
/// multiplier. Implementations decide their own curve; the calculator
/// only needs the resulting scalar.
pub trait TechnologyBonuses: Send + Sync {
    fn production_multiplier(&self, category: TechnologyCategory, level: u32) -> f64;
}

/// Default hook: no bonus regardless of level. Used wherever a caller
/// doesn't plug in a real bonus curve, keeping `evaluate`/`process_turn`
/// unaffected until one is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBonuses;

impl TechnologyBonuses for NoBonuses {
    fn production_multiplier(&self, _category: TechnologyCategory, _level: u32) -> f64 {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_bonuses_hook_is_a_true_no_op_at_every_level() {
        let hook = NoBonuses;
        for level in [0, 1, 5, 100] {
            assert_eq!(hook.production_multiplier(TechnologyCategory::Mining, level), 1.0);
        }
    }
}
