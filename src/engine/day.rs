use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::cart::Cart;
use crate::engine::constants::{
    COVERAGE_FACTOR, DEFAULT_LEAD_DAYS, DEFAULT_PLUS_SHARE, DEFAULT_POPULATION_MAX,
    DEFAULT_POPULATION_MIN, DEFAULT_REVIEW_INTERVAL, DEFAULT_SCENARIO,
};
use crate::engine::procurement::OrderBook;
use crate::engine::store::LotStore;
use crate::engine::{capacity, menu, procurement};
use crate::error::{Result, SimError};
use crate::models::report::{round_pct, round_qty};
use crate::models::{Catalog, DailyReport, DayMenu, MealTime, PopulationClass};

/// Today's serving counts, split into the two population classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Population {
    pub standard: u32,
    pub plus: u32,
}

impl Population {
    pub fn total(&self) -> u32 {
        self.standard + self.plus
    }

    pub fn count_for(&self, class: PopulationClass) -> u32 {
        match class {
            PopulationClass::Standard => self.standard,
            PopulationClass::Plus => self.plus,
        }
    }
}

/// Simulation parameters. `seed` makes a run reproducible.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub scenario: String,
    pub review_interval: u32,
    pub lead_days: u32,
    pub population_min: u32,
    pub population_max: u32,
    pub plus_share: f64,
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scenario: DEFAULT_SCENARIO.to_string(),
            review_interval: DEFAULT_REVIEW_INTERVAL,
            lead_days: DEFAULT_LEAD_DAYS,
            population_min: DEFAULT_POPULATION_MIN,
            population_max: DEFAULT_POPULATION_MAX,
            plus_share: DEFAULT_PLUS_SHARE,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if self.review_interval == 0 {
            return Err(SimError::InvalidConfig(
                "review interval must be at least 1 day".to_string(),
            ));
        }
        if self.population_min > self.population_max {
            return Err(SimError::InvalidConfig(
                "population minimum exceeds maximum".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.plus_share) {
            return Err(SimError::InvalidConfig(
                "plus share must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// The live simulation: clock, cart, inventory, order book and rng.
///
/// All mutation happens inside `advance_one_day`, one strictly sequential day
/// at a time. An explicit struct rather than process-global state so multiple
/// scenario runs can coexist and tests can seed the rng.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    day: u32,
    cart: Cart,
    store: LotStore,
    orders: OrderBook,
    rng: StdRng,
    last_report: Option<DailyReport>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            day: 0,
            cart: Cart::new(),
            store: LotStore::new(),
            orders: OrderBook::new(),
            rng,
            last_report: None,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn store(&self) -> &LotStore {
        &self.store
    }

    pub fn orders(&self) -> &OrderBook {
        &self.orders
    }

    pub fn last_report(&self) -> Option<&DailyReport> {
        self.last_report.as_ref()
    }

    fn is_review_day(&self, day: u32) -> bool {
        (day - 1) % self.config.review_interval == 0
    }

    fn draw_population(&mut self) -> Population {
        let total = self
            .rng
            .gen_range(self.config.population_min..=self.config.population_max);
        let plus = (total as f64 * self.config.plus_share).round() as u32;
        Population {
            standard: total - plus,
            plus,
        }
    }

    /// Run one full simulated day and return its report.
    ///
    /// Sequence: advance the clock, apply arrivals, draw today's population,
    /// run the periodic review if due, serve the three meals, age and purge
    /// lots, measure occupancy, assemble the snapshot. Persisting the report
    /// is the driver's job. A failure mid-day leaves already-applied
    /// mutations in place; processing is best-effort, not transactional.
    pub fn advance_one_day(&mut self, catalog: &Catalog) -> Result<DailyReport> {
        self.day += 1;
        let today = self.day;
        let scenario = self.config.scenario.clone();

        procurement::apply_arrivals(
            catalog,
            &mut self.store,
            &mut self.orders,
            today,
            &mut self.rng,
        );

        let population = self.draw_population();
        let review_day = self.is_review_day(today);

        let scheduled_purchases = if review_day {
            let coverage_days =
                ((COVERAGE_FACTOR * self.config.review_interval as f64).floor() as u32).max(1);
            procurement::schedule_from_cart(
                catalog,
                &self.store,
                &mut self.orders,
                &mut self.cart,
                &scenario,
                today,
                self.config.lead_days,
                coverage_days,
                &population,
            )?
        } else {
            Vec::new()
        };

        let mut outcomes = Vec::with_capacity(3);
        for meal in MealTime::all() {
            outcomes.push(menu::pick_and_cook(
                catalog,
                &mut self.store,
                &mut self.cart,
                &scenario,
                meal,
                &population,
                review_day,
                today,
                &mut self.rng,
            )?);
        }

        let mut waste = self.store.age_and_purge(catalog);
        for entry in &mut waste {
            entry.quantity = round_qty(entry.quantity);
        }

        let snapshot = capacity::capacity_free(catalog, &self.store, &scenario)?;
        debug!(
            "day {today}: occupancy {:.2}%, cart {} item(s)",
            snapshot.occupancy_pct(),
            self.cart.len()
        );

        let mut emergency_purchases = Vec::new();
        for outcome in &mut outcomes {
            emergency_purchases.append(&mut outcome.emergency_purchases);
        }
        // One outcome per entry of MealTime::all(), in serving order.
        let [morning, midday, evening] = [
            outcomes.remove(0).choice,
            outcomes.remove(0).choice,
            outcomes.remove(0).choice,
        ];

        let mut cart_snapshot = self.cart.snapshot(catalog);
        for entry in &mut cart_snapshot {
            entry.quantity = round_qty(entry.quantity);
        }

        let report = DailyReport {
            day: today,
            scenario,
            population_total: population.total(),
            population_plus: population.plus,
            menu: DayMenu {
                morning,
                midday,
                evening,
            },
            scheduled_purchases,
            emergency_purchases,
            cart: cart_snapshot,
            waste,
            occupancy_pct: round_pct(snapshot.occupancy_pct()),
            capacity_m3: snapshot.capacity_m3,
            occupied_m3: round_qty(snapshot.occupied_m3),
            free_m3: round_qty(snapshot.free_m3),
        };

        self.last_report = Some(report.clone());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dish, Ingredient, RecipeLine, ScenarioCapacity, UnitKind};
    use assert_float_eq::assert_float_absolute_eq;

    fn catalog() -> Catalog {
        let dishes = vec![
            Dish {
                id: 1,
                name: "Porridge".to_string(),
                meal_time: MealTime::Morning,
                base_for_projection: true,
            },
            Dish {
                id: 2,
                name: "Soup".to_string(),
                meal_time: MealTime::Midday,
                base_for_projection: true,
            },
            Dish {
                id: 3,
                name: "Stew".to_string(),
                meal_time: MealTime::Evening,
                base_for_projection: false,
            },
        ];
        let mut recipes = Vec::new();
        for dish in &dishes {
            for class in PopulationClass::all() {
                recipes.push(RecipeLine {
                    dish_id: dish.id,
                    class,
                    ingredient_id: 1,
                    qty_per_serving: 0.1,
                });
            }
        }
        Catalog::new(
            vec![Ingredient {
                id: 1,
                name: "Oats".to_string(),
                unit: UnitKind::Kilogram,
                unit_volume_m3: 0.002,
                perishable: false,
            }],
            dishes,
            recipes,
            vec![ScenarioCapacity {
                scenario: "cap".to_string(),
                capacity_m3: 50.0,
            }],
        )
    }

    fn config() -> SimConfig {
        SimConfig {
            population_min: 100,
            population_max: 100,
            seed: Some(42),
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_config_validation() {
        let mut cfg = config();
        cfg.review_interval = 0;
        assert!(Simulation::new(cfg).is_err());

        let mut cfg = config();
        cfg.population_min = 200;
        assert!(Simulation::new(cfg).is_err());
    }

    #[test]
    fn test_population_split() {
        let mut sim = Simulation::new(config()).unwrap();
        let pop = sim.draw_population();
        assert_eq!(pop.total(), 100);
        assert_eq!(pop.plus, 20);
        assert_eq!(pop.standard, 80);
    }

    #[test]
    fn test_review_day_schedule() {
        let sim = Simulation::new(config()).unwrap();
        // interval 4: days 1, 5, 9 are review days
        assert!(sim.is_review_day(1));
        assert!(!sim.is_review_day(2));
        assert!(!sim.is_review_day(4));
        assert!(sim.is_review_day(5));
        assert!(sim.is_review_day(9));
    }

    #[test]
    fn test_advance_one_day_produces_report() {
        let cat = catalog();
        let mut sim = Simulation::new(config()).unwrap();

        let report = sim.advance_one_day(&cat).unwrap();
        assert_eq!(report.day, 1);
        assert_eq!(report.scenario, "cap");
        assert_eq!(report.population_total, 100);
        assert_eq!(report.population_plus, 20);
        assert_float_absolute_eq!(report.capacity_m3, 50.0, 1e-9);
        assert_eq!(sim.day(), 1);
        assert_eq!(sim.last_report().unwrap().day, 1);

        let report2 = sim.advance_one_day(&cat).unwrap();
        assert_eq!(report2.day, 2);
    }

    #[test]
    fn test_day_one_is_review_day_so_no_emergency() {
        // Empty stock on a review day: meals are infeasible, the shortfall
        // accumulates in the cart, nothing is bought on the spot.
        let cat = catalog();
        let mut sim = Simulation::new(config()).unwrap();

        let report = sim.advance_one_day(&cat).unwrap();
        assert!(report.emergency_purchases.is_empty());
        // 3 meals x 0.1 per serving x 100 people = 30 kg pending.
        assert_float_absolute_eq!(sim.cart().quantity_of(1), 30.0, 1e-9);
    }

    #[test]
    fn test_capacity_invariant_holds_across_days() {
        let cat = catalog();
        let mut sim = Simulation::new(config()).unwrap();

        for _ in 0..20 {
            let report = sim.advance_one_day(&cat).unwrap();
            assert!(
                report.occupied_m3 <= report.capacity_m3 + 1e-6,
                "day {}: occupied {} exceeds capacity {}",
                report.day,
                report.occupied_m3,
                report.capacity_m3
            );
        }
    }

    #[test]
    fn test_unknown_scenario_fails_the_day() {
        let cat = catalog();
        let cfg = SimConfig {
            scenario: "cap99".to_string(),
            ..config()
        };
        let mut sim = Simulation::new(cfg).unwrap();
        assert!(sim.advance_one_day(&cat).is_err());
    }
}
