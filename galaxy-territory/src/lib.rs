//! # Galaxy Turn Engine — Territory
//!
//! Component E, Territory Expansion: sector exploration, colonization and
//! its completion sweep, and colony abandonment.

pub mod buildings;
pub mod colonization;
pub mod costs;
pub mod error;
pub mod exploration;

pub use buildings::{building_cost, queue_building};
pub use colonization::{abandon_colony, colonize_planet, process_colonization_completion};
pub use costs::colonization_cost;
pub use error::TerritoryError;
pub use exploration::explore_sector;
