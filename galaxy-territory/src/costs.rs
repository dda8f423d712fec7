//! Per-planet-type colonization cost (§4.E: "Empire must afford the
//! per-planet-type colonization cost"), scaled roughly with how valuable
//! the resulting production is.

use galaxy_common::{PlanetType, Resources};

pub fn colonization_cost(planet_type: PlanetType) -> Resources {
    match planet_type {
        PlanetType::Mining => Resources::new(2000, 1000, 500, 0),
        PlanetType::Energy => Resources::new(1000, 2000, 500, 0),
        PlanetType::Agricultural => Resources::new(1000, 500, 1500, 0),
        PlanetType::Research => Resources::new(1500, 1500, 500, 0),
        PlanetType::Industrial => Resources::new(2500, 2000, 1000, 0),
        PlanetType::Fortress => Resources::new(3000, 2000, 500, 0),
        PlanetType::Balanced => Resources::new(1800, 1800, 1000, 0),
    }
}
