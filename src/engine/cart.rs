use std::collections::BTreeMap;

use crate::engine::constants::LOT_EPSILON;
use crate::models::{CartEntry, Catalog};

/// Accumulator of unmet ingredient demand awaiting purchase.
///
/// One entry per ingredient. Grows when consumption falls short; shrinks only
/// when the procurement planner converts entries into a scheduled order.
/// Iteration is in ascending ingredient id, which is the order the planner
/// greedily accepts entries in.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    entries: BTreeMap<u32, f64>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shortage. Quantities at or below epsilon are ignored.
    pub fn add(&mut self, ingredient_id: u32, quantity: f64) {
        if quantity > LOT_EPSILON {
            *self.entries.entry(ingredient_id).or_insert(0.0) += quantity;
        }
    }

    /// Deduct a fulfilled quantity; the entry disappears once (near) empty.
    pub fn fulfill(&mut self, ingredient_id: u32, quantity: f64) {
        if let Some(pending) = self.entries.get_mut(&ingredient_id) {
            *pending -= quantity;
            if *pending <= LOT_EPSILON {
                self.entries.remove(&ingredient_id);
            }
        }
    }

    pub fn quantity_of(&self, ingredient_id: u32) -> f64 {
        self.entries.get(&ingredient_id).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.entries.iter().map(|(id, qty)| (*id, *qty))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Snapshot for report assembly.
    pub fn snapshot(&self, catalog: &Catalog) -> Vec<CartEntry> {
        self.entries
            .iter()
            .map(|(&id, &qty)| CartEntry {
                ingredient_id: id,
                name: catalog.ingredient_name(id),
                unit: catalog
                    .ingredient(id)
                    .map(|i| i.unit.label().to_string())
                    .unwrap_or_default(),
                quantity: qty,
            })
            .collect()
    }
}
