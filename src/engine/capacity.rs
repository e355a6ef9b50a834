use crate::engine::store::LotStore;
use crate::error::Result;
use crate::models::Catalog;

/// Warehouse volume picture for one scenario at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacitySnapshot {
    pub capacity_m3: f64,
    pub occupied_m3: f64,
    pub free_m3: f64,
}

impl CapacitySnapshot {
    pub fn occupancy_pct(&self) -> f64 {
        if self.capacity_m3 > 0.0 {
            (self.occupied_m3 / self.capacity_m3) * 100.0
        } else {
            0.0
        }
    }
}

/// Total volume occupied by every lot: Σ unit_volume × quantity.
///
/// Lots whose ingredient is unknown to the catalog contribute nothing.
pub fn occupied_volume(catalog: &Catalog, store: &LotStore) -> f64 {
    store
        .lots()
        .iter()
        .map(|lot| {
            catalog
                .ingredient(lot.ingredient_id)
                .map(|i| i.unit_volume_m3 * lot.qty)
                .unwrap_or(0.0)
        })
        .sum()
}

/// Capacity, occupied and free volume for a scenario.
///
/// Fails when the scenario has no configured capacity; callers must consult
/// the free volume before creating any lot — there is no rollback.
pub fn capacity_free(catalog: &Catalog, store: &LotStore, scenario: &str) -> Result<CapacitySnapshot> {
    let capacity_m3 = catalog.capacity_of(scenario)?;
    let occupied_m3 = occupied_volume(catalog, store);
    Ok(CapacitySnapshot {
        capacity_m3,
        occupied_m3,
        free_m3: capacity_m3 - occupied_m3,
    })
}
