use serde::{Deserialize, Serialize};

/// The dish chosen for one meal time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuChoice {
    pub dish_id: u32,
    pub dish_name: String,
}

/// The full menu served in one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayMenu {
    pub morning: MenuChoice,
    pub midday: MenuChoice,
    pub evening: MenuChoice,
}

/// One purchased line item: either scheduled (carries an ETA day) or an
/// emergency buy (carries the randomly assigned shelf life).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub ingredient_id: u32,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub eta_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub shelf_life_days: Option<u32>,
}

/// An expired lot reported at purge time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteEntry {
    pub ingredient_id: u32,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
}

/// A pending shortage awaiting purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartEntry {
    pub ingredient_id: u32,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
}

/// Per-day snapshot assembled at the end of each simulated day.
///
/// One row per (day, scenario); the report store upserts on that key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub day: u32,
    pub scenario: String,
    pub population_total: u32,
    pub population_plus: u32,
    pub menu: DayMenu,
    pub scheduled_purchases: Vec<PurchaseLine>,
    pub emergency_purchases: Vec<PurchaseLine>,
    pub cart: Vec<CartEntry>,
    pub waste: Vec<WasteEntry>,
    pub occupancy_pct: f64,
    pub capacity_m3: f64,
    pub occupied_m3: f64,
    pub free_m3: f64,
}

/// Round to 4 decimals, as quantities are reported.
pub fn round_qty(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Round to 2 decimals, as percentages are reported.
pub fn round_pct(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding() {
        assert_eq!(round_qty(1.23456789), 1.2346);
        assert_eq!(round_qty(75.0), 75.0);
        assert_eq!(round_pct(3.14159), 3.14);
    }
}
