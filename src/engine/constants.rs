/// Quantity at or below which a lot counts as empty.
///
/// Shared by consumption and the aging step so that near-zero lots are purged
/// silently and never surface as waste.
pub const LOT_EPSILON: f64 = 1e-9;

/// Fraction of the review interval a scheduled order aims to cover.
pub const COVERAGE_FACTOR: f64 = 0.85;

/// Shelf life assigned to perishable lots on arrival or emergency purchase.
pub const SHELF_LIFE_MIN_DAYS: u32 = 1;
pub const SHELF_LIFE_MAX_DAYS: u32 = 30;

/// Default periodic-review spacing, in days.
pub const DEFAULT_REVIEW_INTERVAL: u32 = 4;

/// Default days between order creation and arrival.
pub const DEFAULT_LEAD_DAYS: u32 = 1;

/// Daily population draw range (inclusive).
pub const DEFAULT_POPULATION_MIN: u32 = 175;
pub const DEFAULT_POPULATION_MAX: u32 = 180;

/// Share of the daily population in the plus class.
pub const DEFAULT_PLUS_SHARE: f64 = 0.20;

/// Scenario used when none is given.
pub const DEFAULT_SCENARIO: &str = "cap";
