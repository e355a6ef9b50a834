use log::{debug, info};
use rand::Rng;

use crate::engine::capacity;
use crate::engine::cart::Cart;
use crate::engine::constants::LOT_EPSILON;
use crate::engine::day::Population;
use crate::engine::draw_shelf_life;
use crate::engine::store::LotStore;
use crate::error::Result;
use crate::models::{Catalog, PopulationClass, PurchaseLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Scheduled,
    Arrived,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrderItem {
    pub ingredient_id: u32,
    pub qty: f64,
}

/// A scheduled purchase, owned by the order book until its arrival converts
/// the items into inventory lots. The status transition is one-way.
#[derive(Debug, Clone)]
pub struct PurchaseOrder {
    pub id: u64,
    pub planned_day: u32,
    pub eta_day: u32,
    pub scenario: String,
    pub status: OrderStatus,
    pub items: Vec<PurchaseOrderItem>,
}

/// All purchase orders of a simulation run.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Vec<PurchaseOrder>,
    next_id: u64,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        planned_day: u32,
        eta_day: u32,
        scenario: &str,
        items: Vec<PurchaseOrderItem>,
    ) -> u64 {
        self.next_id += 1;
        self.orders.push(PurchaseOrder {
            id: self.next_id,
            planned_day,
            eta_day,
            scenario: scenario.to_string(),
            status: OrderStatus::Scheduled,
            items,
        });
        self.next_id
    }

    pub fn orders(&self) -> &[PurchaseOrder] {
        &self.orders
    }

    fn scheduled_for_mut(&mut self, eta_day: u32) -> impl Iterator<Item = &mut PurchaseOrder> {
        self.orders
            .iter_mut()
            .filter(move |o| o.status == OrderStatus::Scheduled && o.eta_day == eta_day)
    }
}

/// Demand for one ingredient projected over a coverage window, using only
/// dishes flagged as base-for-projection, at the given population mix,
/// summed across both classes.
pub fn projected_demand(
    catalog: &Catalog,
    ingredient_id: u32,
    days: u32,
    population: &Population,
) -> f64 {
    let base = catalog.base_dishes();
    if base.is_empty() {
        return 0.0;
    }

    let mut per_day = 0.0;
    for dish in &base {
        for class in PopulationClass::all() {
            let served = population.count_for(class) as f64;
            for line in catalog.recipe_lines(dish.id, class) {
                if line.ingredient_id == ingredient_id {
                    per_day += line.qty_per_serving * served;
                }
            }
        }
    }
    per_day * days as f64
}

/// Periodic-review order generation from the cart.
///
/// For every cart entry, in cart order: need = max(pending, projected demand
/// over the coverage window minus stock), rounded up for discrete units, then
/// greedily accepted while its volume fits a running free-capacity budget.
/// If anything was accepted a single scheduled order is created and the
/// accepted quantities come off the cart; remainders stay pending.
pub fn schedule_from_cart(
    catalog: &Catalog,
    store: &LotStore,
    orders: &mut OrderBook,
    cart: &mut Cart,
    scenario: &str,
    day: u32,
    lead_days: u32,
    coverage_days: u32,
    population: &Population,
) -> Result<Vec<PurchaseLine>> {
    if cart.is_empty() {
        return Ok(Vec::new());
    }

    let snapshot = capacity::capacity_free(catalog, store, scenario)?;
    let mut free = snapshot.free_m3.max(0.0);
    if free <= LOT_EPSILON {
        debug!("review day {day}: no free volume, nothing ordered");
        return Ok(Vec::new());
    }

    let mut items: Vec<PurchaseOrderItem> = Vec::new();
    for (ingredient_id, pending) in cart.iter() {
        let Some(ingredient) = catalog.ingredient(ingredient_id) else {
            continue;
        };

        let projected = projected_demand(catalog, ingredient_id, coverage_days, population);
        let stock = store.stock_of(ingredient_id);
        let mut need = pending.max((projected - stock).max(0.0));
        if ingredient.unit.is_discrete() {
            need = (need - LOT_EPSILON).ceil();
        }
        if need <= LOT_EPSILON {
            continue;
        }

        let volume = ingredient.unit_volume_m3 * need;
        if volume <= free {
            items.push(PurchaseOrderItem {
                ingredient_id,
                qty: need,
            });
            free -= volume;
        } else {
            debug!(
                "review day {day}: {} x{:.4} does not fit ({:.4} m3 > {:.4} m3 free), left in cart",
                ingredient.name, need, volume, free
            );
        }
        if free <= LOT_EPSILON {
            break;
        }
    }

    if items.is_empty() {
        return Ok(Vec::new());
    }

    let eta_day = day + lead_days;
    let order_id = orders.create(day, eta_day, scenario, items.clone());
    info!(
        "review day {day}: scheduled order {order_id} with {} item(s), eta day {eta_day}",
        items.len()
    );

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        cart.fulfill(item.ingredient_id, item.qty);
        lines.push(PurchaseLine {
            ingredient_id: item.ingredient_id,
            name: catalog.ingredient_name(item.ingredient_id),
            unit: catalog
                .ingredient(item.ingredient_id)
                .map(|i| i.unit.label().to_string())
                .unwrap_or_default(),
            quantity: item.qty,
            eta_day: Some(eta_day),
            shelf_life_days: None,
        });
    }

    Ok(lines)
}

/// Convert every scheduled order due today into inventory lots and mark it
/// arrived. Idempotent for a given day: arrived orders are never matched
/// again.
pub fn apply_arrivals(
    catalog: &Catalog,
    store: &mut LotStore,
    orders: &mut OrderBook,
    today: u32,
    rng: &mut impl Rng,
) -> usize {
    let mut arrived = 0;
    for order in orders.scheduled_for_mut(today) {
        for item in &order.items {
            let shelf_life = catalog
                .ingredient(item.ingredient_id)
                .and_then(|i| draw_shelf_life(i, rng));
            store.add_lot(item.ingredient_id, item.qty, shelf_life, today);
        }
        order.status = OrderStatus::Arrived;
        info!("order {} arrived on day {today}", order.id);
        arrived += 1;
    }
    arrived
}
