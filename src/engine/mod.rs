pub mod capacity;
pub mod cart;
pub mod constants;
pub mod day;
pub mod emergency;
pub mod menu;
pub mod procurement;
pub mod runtime;
pub mod store;

pub use capacity::{capacity_free, occupied_volume, CapacitySnapshot};
pub use cart::Cart;
pub use day::{Population, SimConfig, Simulation};
pub use emergency::buy_emergency;
pub use menu::{can_cook, consume_dish, pick_and_cook, MealOutcome, Shortage};
pub use procurement::{
    apply_arrivals, projected_demand, schedule_from_cart, OrderBook, OrderStatus, PurchaseOrder,
    PurchaseOrderItem,
};
pub use runtime::Runtime;
pub use store::{Drawdown, InventoryLot, LotStore};

use rand::Rng;

use crate::models::Ingredient;

/// Shelf life for a newly created lot: random 1–30 days for perishables,
/// none for everything else.
pub(crate) fn draw_shelf_life(ingredient: &Ingredient, rng: &mut impl Rng) -> Option<u32> {
    if ingredient.perishable {
        Some(rng.gen_range(constants::SHELF_LIFE_MIN_DAYS..=constants::SHELF_LIFE_MAX_DAYS))
    } else {
        None
    }
}
