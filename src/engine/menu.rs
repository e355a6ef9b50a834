use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::engine::cart::Cart;
use crate::engine::constants::LOT_EPSILON;
use crate::engine::day::Population;
use crate::engine::emergency::buy_emergency;
use crate::engine::store::LotStore;
use crate::error::{Result, SimError};
use crate::models::{Catalog, Dish, MealTime, MenuChoice, PopulationClass, PurchaseLine};

/// An unmet ingredient requirement discovered during consumption.
#[derive(Debug, Clone, PartialEq)]
pub struct Shortage {
    pub ingredient_id: u32,
    pub quantity: f64,
}

/// What one meal time produced: the dish served and any emergency purchases
/// made to serve it.
#[derive(Debug, Clone)]
pub struct MealOutcome {
    pub meal: MealTime,
    pub choice: MenuChoice,
    pub emergency_purchases: Vec<PurchaseLine>,
}

/// True iff every recipe requirement of the dish, for both population
/// classes, is coverable by current stock. Check-only, no mutation.
pub fn can_cook(catalog: &Catalog, store: &LotStore, dish: &Dish, population: &Population) -> bool {
    for class in PopulationClass::all() {
        let served = population.count_for(class) as f64;
        for line in catalog.recipe_lines(dish.id, class) {
            let required = line.qty_per_serving * served;
            if store.stock_of(line.ingredient_id) + LOT_EPSILON < required {
                return false;
            }
        }
    }
    true
}

/// Consume the dish's full recipe requirement from stock, both classes.
///
/// Returns the shortages left unmet, merged per ingredient. Shortfall is a
/// signal, not an error.
pub fn consume_dish(
    catalog: &Catalog,
    store: &mut LotStore,
    dish: &Dish,
    population: &Population,
) -> Vec<Shortage> {
    let mut shortages: Vec<Shortage> = Vec::new();

    for class in PopulationClass::all() {
        let served = population.count_for(class) as f64;
        for line in catalog.recipe_lines(dish.id, class) {
            let required = line.qty_per_serving * served;
            let drawdown = store.consume(line.ingredient_id, required);
            if drawdown.missing > LOT_EPSILON {
                match shortages
                    .iter_mut()
                    .find(|s| s.ingredient_id == line.ingredient_id)
                {
                    Some(s) => s.quantity += drawdown.missing,
                    None => shortages.push(Shortage {
                        ingredient_id: line.ingredient_id,
                        quantity: drawdown.missing,
                    }),
                }
            }
        }
    }

    shortages
}

/// Run one meal time: pick a dish and feed the population from stock.
///
/// Feasible dishes are preferred, chosen uniformly at random; when none is
/// feasible the meal is still served from the full option list. On a
/// non-review day an infeasible meal triggers an emergency purchase of the
/// missing quantities with one consumption retry; on a review day (the order
/// already ran) shortfall goes straight to the cart.
pub fn pick_and_cook(
    catalog: &Catalog,
    store: &mut LotStore,
    cart: &mut Cart,
    scenario: &str,
    meal: MealTime,
    population: &Population,
    is_review_day: bool,
    day: u32,
    rng: &mut impl Rng,
) -> Result<MealOutcome> {
    let options = catalog.dishes_for(meal);
    if options.is_empty() {
        return Err(SimError::NoDishes(meal));
    }

    let feasible: Vec<&Dish> = options
        .iter()
        .copied()
        .filter(|d| can_cook(catalog, store, d, population))
        .collect();

    let mut emergency_purchases = Vec::new();

    let chosen = if let Some(&dish) = feasible.choose(rng) {
        // Feasibility was checked against un-reserved stock; any shortfall
        // that still shows up during consumption lands in the cart.
        let shortages = consume_dish(catalog, store, dish, population);
        for s in &shortages {
            warn!(
                "shortfall on feasible dish '{}': ingredient {} missing {:.4}",
                dish.name, s.ingredient_id, s.quantity
            );
            cart.add(s.ingredient_id, s.quantity);
        }
        dish
    } else {
        // The population is fed regardless of shortage.
        let dish = match options.choose(rng) {
            Some(&d) => d,
            None => return Err(SimError::NoDishes(meal)),
        };
        debug!("no feasible dish for {meal}; serving '{}' anyway", dish.name);

        let shortages = consume_dish(catalog, store, dish, population);
        if !shortages.is_empty() {
            if is_review_day {
                for s in &shortages {
                    cart.add(s.ingredient_id, s.quantity);
                }
            } else {
                emergency_purchases =
                    buy_emergency(catalog, store, scenario, &shortages, day, rng)?;
                // One retry against whatever the purchase brought in; the
                // remainder waits in the cart for the next review.
                for s in &shortages {
                    let retry = store.consume(s.ingredient_id, s.quantity);
                    if retry.missing > LOT_EPSILON {
                        cart.add(s.ingredient_id, retry.missing);
                    }
                }
            }
        }
        dish
    };

    Ok(MealOutcome {
        meal,
        choice: MenuChoice {
            dish_id: chosen.id,
            dish_name: chosen.name.clone(),
        },
        emergency_purchases,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, RecipeLine, ScenarioCapacity, UnitKind};
    use assert_float_eq::assert_float_absolute_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog(capacity_m3: f64) -> Catalog {
        Catalog::new(
            vec![Ingredient {
                id: 1,
                name: "Flour".to_string(),
                unit: UnitKind::Unit,
                unit_volume_m3: 0.02,
                perishable: false,
            }],
            vec![Dish {
                id: 10,
                name: "Bread".to_string(),
                meal_time: MealTime::Morning,
                base_for_projection: true,
            }],
            vec![
                RecipeLine {
                    dish_id: 10,
                    class: PopulationClass::Standard,
                    ingredient_id: 1,
                    qty_per_serving: 1.0,
                },
                RecipeLine {
                    dish_id: 10,
                    class: PopulationClass::Plus,
                    ingredient_id: 1,
                    qty_per_serving: 1.0,
                },
            ],
            vec![ScenarioCapacity {
                scenario: "cap".to_string(),
                capacity_m3,
            }],
        )
    }

    fn population() -> Population {
        // 60 standard + 15 plus = 75 servings of 1.0 flour each.
        Population {
            standard: 60,
            plus: 15,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn test_can_cook_against_stock() {
        let cat = catalog(50.0);
        let mut store = LotStore::new();
        let dish = &cat.dishes()[0];

        assert!(!can_cook(&cat, &store, dish, &population()));
        store.add_lot(1, 75.0, None, 0);
        assert!(can_cook(&cat, &store, dish, &population()));
    }

    #[test]
    fn test_consume_dish_reports_merged_shortage() {
        let cat = catalog(50.0);
        let mut store = LotStore::new();
        store.add_lot(1, 50.0, None, 0);

        let shortages = consume_dish(&cat, &mut store, &cat.dishes()[0], &population());
        assert_eq!(shortages.len(), 1);
        assert_eq!(shortages[0].ingredient_id, 1);
        // 75 required, 50 in stock.
        assert_float_absolute_eq!(shortages[0].quantity, 25.0, 1e-9);
        assert!(store.is_empty());
    }

    #[test]
    fn test_feasible_dish_is_consumed_without_cart_growth() {
        let cat = catalog(50.0);
        let mut store = LotStore::new();
        let mut cart = Cart::new();
        store.add_lot(1, 100.0, None, 0);

        let outcome = pick_and_cook(
            &cat,
            &mut store,
            &mut cart,
            "cap",
            MealTime::Morning,
            &population(),
            false,
            1,
            &mut rng(),
        )
        .unwrap();

        assert_eq!(outcome.choice.dish_id, 10);
        assert!(outcome.emergency_purchases.is_empty());
        assert!(cart.is_empty());
        assert_float_absolute_eq!(store.stock_of(1), 25.0, 1e-9);
    }

    #[test]
    fn test_infeasible_meal_triggers_emergency_and_cart_stays_empty() {
        // Free capacity 50 m³ comfortably fits the 1.5 m³ the 75 missing
        // units occupy: emergency buys exactly 75, retry succeeds fully.
        let cat = catalog(50.0);
        let mut store = LotStore::new();
        let mut cart = Cart::new();

        let outcome = pick_and_cook(
            &cat,
            &mut store,
            &mut cart,
            "cap",
            MealTime::Morning,
            &population(),
            false,
            1,
            &mut rng(),
        )
        .unwrap();

        assert_eq!(outcome.emergency_purchases.len(), 1);
        assert_float_absolute_eq!(outcome.emergency_purchases[0].quantity, 75.0, 1e-9);
        assert!(cart.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_infeasible_meal_without_capacity_feeds_cart() {
        // 1.0 m³ free < 1.5 m³ needed: purchase skipped, cart gains 75.
        let cat = catalog(1.0);
        let mut store = LotStore::new();
        let mut cart = Cart::new();

        let outcome = pick_and_cook(
            &cat,
            &mut store,
            &mut cart,
            "cap",
            MealTime::Morning,
            &population(),
            false,
            1,
            &mut rng(),
        )
        .unwrap();

        assert!(outcome.emergency_purchases.is_empty());
        assert_float_absolute_eq!(cart.quantity_of(1), 75.0, 1e-9);
    }

    #[test]
    fn test_review_day_skips_emergency() {
        let cat = catalog(50.0);
        let mut store = LotStore::new();
        let mut cart = Cart::new();

        let outcome = pick_and_cook(
            &cat,
            &mut store,
            &mut cart,
            "cap",
            MealTime::Morning,
            &population(),
            true,
            1,
            &mut rng(),
        )
        .unwrap();

        assert!(outcome.emergency_purchases.is_empty());
        assert_float_absolute_eq!(cart.quantity_of(1), 75.0, 1e-9);
    }

    #[test]
    fn test_empty_meal_time_is_an_error() {
        let cat = catalog(50.0);
        let mut store = LotStore::new();
        let mut cart = Cart::new();

        let err = pick_and_cook(
            &cat,
            &mut store,
            &mut cart,
            "cap",
            MealTime::Evening,
            &population(),
            false,
            1,
            &mut rng(),
        )
        .unwrap_err();

        assert!(matches!(err, SimError::NoDishes(MealTime::Evening)));
    }
}
