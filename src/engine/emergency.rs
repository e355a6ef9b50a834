use log::{debug, info};
use rand::Rng;

use crate::engine::capacity;
use crate::engine::constants::LOT_EPSILON;
use crate::engine::draw_shelf_life;
use crate::engine::menu::Shortage;
use crate::engine::store::LotStore;
use crate::error::Result;
use crate::models::{Catalog, PurchaseLine};

/// Ad-hoc just-in-time purchase of shortage quantities, bounded by the free
/// warehouse volume.
///
/// Entries are taken in shortage order against a running free-volume budget;
/// discrete ingredients are rounded up to whole units before their volume is
/// computed. Entries that do not fit are skipped and stay with the cart.
/// Perishables get a random shelf life. Stops early once the budget is gone.
pub fn buy_emergency(
    catalog: &Catalog,
    store: &mut LotStore,
    scenario: &str,
    shortages: &[Shortage],
    day: u32,
    rng: &mut impl Rng,
) -> Result<Vec<PurchaseLine>> {
    if shortages.is_empty() {
        return Ok(Vec::new());
    }

    let snapshot = capacity::capacity_free(catalog, store, scenario)?;
    let mut free = snapshot.free_m3.max(0.0);
    let mut purchases: Vec<PurchaseLine> = Vec::new();

    for shortage in shortages {
        if free <= LOT_EPSILON {
            break;
        }
        let Some(ingredient) = catalog.ingredient(shortage.ingredient_id) else {
            continue;
        };

        let mut need = shortage.quantity;
        if ingredient.unit.is_discrete() {
            need = (need - LOT_EPSILON).ceil();
        }
        if need <= LOT_EPSILON {
            continue;
        }

        let volume = ingredient.unit_volume_m3 * need;
        // Zero-volume ingredients always fit.
        if ingredient.unit_volume_m3 > 0.0 && volume > free {
            debug!(
                "emergency purchase skipped, no room: {} x{:.4} needs {:.4} m3, free {:.4} m3",
                ingredient.name, need, volume, free
            );
            continue;
        }

        let shelf_life = draw_shelf_life(ingredient, rng);
        store.add_lot(ingredient.id, need, shelf_life, day);
        info!(
            "emergency purchase: {} x{:.4} (shelf life {:?})",
            ingredient.name, need, shelf_life
        );

        match purchases.iter_mut().find(|p| p.ingredient_id == ingredient.id) {
            Some(line) => line.quantity += need,
            None => purchases.push(PurchaseLine {
                ingredient_id: ingredient.id,
                name: ingredient.name.clone(),
                unit: ingredient.unit.label().to_string(),
                quantity: need,
                eta_day: None,
                shelf_life_days: shelf_life,
            }),
        }
        free -= volume;
    }

    Ok(purchases)
}
