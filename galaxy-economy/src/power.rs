//! Power rating: a single scalar summarizing an empire's economic and
//! military weight, used only by out-of-core consumers (e.g. a
//! leaderboard) that read it through the gateway.

use galaxy_common::Resources;
use galaxy_store::Fleet;

/// Weighted sum of resources and fielded ship attack/defense; intentionally
/// simple since no in-core system currently reads it back.
pub fn power_rating(resources: &Resources, fleets: &[Fleet]) -> i64 {
    let resource_component = resources.total();
    let military_component: i64 = fleets
        .iter()
        .flat_map(|f| f.composition.iter())
        .map(|(ship_type, &count)| {
            let stats = ship_type.base_stats();
            (stats.attack + stats.defense) as i64 * count as i64
        })
        .sum();
    resource_component + military_component * 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn more_ships_increase_power_rating() {
        let resources = Resources::new(100, 100, 100, 100);
        let without_fleets = power_rating(&resources, &[]);
        assert_eq!(without_fleets, resources.total());
    }
}
