use crate::engine::constants::LOT_EPSILON;
use crate::models::{Catalog, WasteEntry};

/// A quantity of one ingredient with an optional expiry countdown.
///
/// `days_remaining == None` means the lot never expires.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryLot {
    pub id: u64,
    pub ingredient_id: u32,
    pub qty: f64,
    pub days_remaining: Option<u32>,
    pub created_day: u32,
}

/// Result of a consumption call. `taken + missing == needed` always holds;
/// shortfall is the signaling mechanism, never an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawdown {
    pub taken: f64,
    pub missing: f64,
}

/// Mutable inventory: owns every lot, consumes FIFO by expiry, and handles
/// daily aging.
#[derive(Debug, Default)]
pub struct LotStore {
    lots: Vec<InventoryLot>,
    next_id: u64,
}

impl LotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new lot. Capacity is the caller's responsibility: the free
    /// volume must be checked before calling, no re-check happens here.
    pub fn add_lot(
        &mut self,
        ingredient_id: u32,
        qty: f64,
        days_remaining: Option<u32>,
        created_day: u32,
    ) -> u64 {
        self.next_id += 1;
        self.lots.push(InventoryLot {
            id: self.next_id,
            ingredient_id,
            qty,
            days_remaining,
            created_day,
        });
        self.next_id
    }

    /// Total stock for an ingredient across all lots. Read-only; used by
    /// feasibility checks and demand projection.
    pub fn stock_of(&self, ingredient_id: u32) -> f64 {
        self.lots
            .iter()
            .filter(|l| l.ingredient_id == ingredient_id)
            .map(|l| l.qty)
            .sum()
    }

    /// Consume up to `needed` of an ingredient, soonest-expiring lots first,
    /// non-expiring lots last, arrival order within ties.
    ///
    /// Lots drained to (near) zero are deleted immediately so they can never
    /// show up as waste later.
    pub fn consume(&mut self, ingredient_id: u32, needed: f64) -> Drawdown {
        if needed <= 0.0 {
            return Drawdown {
                taken: 0.0,
                missing: 0.0,
            };
        }

        // (expires-never, days, id) sorts defined expiries first, soonest
        // first, and keeps arrival order among equals.
        let mut order: Vec<(bool, u32, u64)> = self
            .lots
            .iter()
            .filter(|l| l.ingredient_id == ingredient_id)
            .map(|l| (l.days_remaining.is_none(), l.days_remaining.unwrap_or(0), l.id))
            .collect();
        order.sort_unstable();

        let mut need = needed;
        let mut taken = 0.0;

        for (_, _, lot_id) in order {
            if need <= 0.0 {
                break;
            }
            let idx = match self.lots.iter().position(|l| l.id == lot_id) {
                Some(i) => i,
                None => continue,
            };
            let take = self.lots[idx].qty.min(need);
            if take > 0.0 {
                self.lots[idx].qty -= take;
                taken += take;
                need -= take;
                if self.lots[idx].qty <= LOT_EPSILON {
                    self.lots.remove(idx);
                }
            }
        }

        Drawdown {
            taken,
            missing: need.max(0.0),
        }
    }

    /// Age every expiring lot by one day and purge the ones that reach zero.
    ///
    /// Empty lots are deleted silently first; only lots expiring with a
    /// quantity above the epsilon threshold are reported as waste.
    pub fn age_and_purge(&mut self, catalog: &Catalog) -> Vec<WasteEntry> {
        self.lots.retain(|l| l.qty > LOT_EPSILON);

        let mut waste = Vec::new();
        self.lots.retain_mut(|lot| {
            let Some(days) = lot.days_remaining else {
                return true;
            };
            if days <= 1 {
                if lot.qty > LOT_EPSILON {
                    let unit = catalog
                        .ingredient(lot.ingredient_id)
                        .map(|i| i.unit.label().to_string())
                        .unwrap_or_default();
                    waste.push(WasteEntry {
                        ingredient_id: lot.ingredient_id,
                        name: catalog.ingredient_name(lot.ingredient_id),
                        unit,
                        quantity: lot.qty,
                    });
                }
                false
            } else {
                lot.days_remaining = Some(days - 1);
                true
            }
        });
        waste
    }

    pub fn lots(&self) -> &[InventoryLot] {
        &self.lots
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }
}
