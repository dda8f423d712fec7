//! The four-resource economic vector (§3 Empire, §4.B Resource Calculator).
//!
//! Saturating-arithmetic operator overloads over four named resources
//! (metal/energy/food/research), using `i64` since resources are bounded
//! by a storage cap well within range and nothing here needs a wider or
//! GraphQL-friendly integer type.

use serde::{Deserialize, Serialize};

/// Non-negative amounts of the four tradeable resources.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Resources {
    pub metal: i64,
    pub energy: i64,
    pub food: i64,
    pub research: i64,
}

impl Resources {
    pub const fn new(metal: i64, energy: i64, food: i64, research: i64) -> Self {
        Self {
            metal,
            energy,
            food,
            research,
        }
    }

    pub const fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn has_at_least(&self, other: &Resources) -> bool {
        self.metal >= other.metal
            && self.energy >= other.energy
            && self.food >= other.food
            && self.research >= other.research
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    pub fn saturating_add(&self, other: &Resources) -> Resources {
        Resources {
            metal: self.metal.saturating_add(other.metal),
            energy: self.energy.saturating_add(other.energy),
            food: self.food.saturating_add(other.food),
            research: self.research.saturating_add(other.research),
        }
    }

    pub fn saturating_sub(&self, other: &Resources) -> Resources {
        Resources {
            metal: (self.metal - other.metal).max(0),
            energy: (self.energy - other.energy).max(0),
            food: (self.food - other.food).max(0),
            research: (self.research - other.research).max(0),
        }
    }

    /// Scale every component by a per-mille multiplier (used for the
    /// balance engine's scaled-cost multiplier, §4.F).
    pub fn scaled(&self, numerator: i64, denominator: i64) -> Resources {
        Resources {
            metal: self.metal * numerator / denominator,
            energy: self.energy * numerator / denominator,
            food: self.food * numerator / denominator,
            research: self.research * numerator / denominator,
        }
    }

    /// Total across all four resources, used by exploit heuristics (§4.F)
    /// and the out-of-scope leaderboard's power rating.
    pub fn total(&self) -> i64 {
        self.metal + self.energy + self.food + self.research
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, i64)> {
        [
            (ResourceKind::Metal, self.metal),
            (ResourceKind::Energy, self.energy),
            (ResourceKind::Food, self.food),
            (ResourceKind::Research, self.research),
        ]
        .into_iter()
    }
}

impl std::ops::Add for Resources {
    type Output = Resources;
    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(&rhs)
    }
}

impl std::ops::Sub for Resources {
    type Output = Resources;
    fn sub(self, rhs: Self) -> Self::Output {
        self.saturating_sub(&rhs)
    }
}

impl std::ops::AddAssign for Resources {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(&rhs);
    }
}

impl std::ops::SubAssign for Resources {
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.saturating_sub(&rhs);
    }
}

/// The fixed set of tradeable resource types (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Metal,
    Energy,
    Food,
    Research,
}

impl ResourceKind {
    pub fn all() -> [ResourceKind; 4] {
        [
            ResourceKind::Metal,
            ResourceKind::Energy,
            ResourceKind::Food,
            ResourceKind::Research,
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, thiserror::Error)]
pub enum ResourceError {
    #[error("insufficient resources: required {required:?}, available {available:?}")]
    InsufficientResources {
        required: Resources,
        available: Resources,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturating_sub_never_negative() {
        let a = Resources::new(5, 5, 5, 5);
        let b = Resources::new(10, 0, 0, 0);
        let result = a - b;
        assert_eq!(result.metal, 0);
        assert_eq!(result.energy, 5);
    }

    #[test]
    fn has_at_least_is_componentwise() {
        let wallet = Resources::new(100, 50, 0, 0);
        assert!(!wallet.has_at_least(&Resources::new(0, 0, 1, 0)));
        assert!(wallet.has_at_least(&Resources::new(100, 50, 0, 0)));
    }
}
