use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::error::{Result, SimError};

/// How an ingredient is measured.
///
/// `Unit` quantities are discrete and get rounded up to whole units when
/// ordered or purchased; weight and volume quantities stay continuous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Unit,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "l")]
    Liter,
}

impl UnitKind {
    #[inline]
    pub fn is_discrete(&self) -> bool {
        matches!(self, UnitKind::Unit)
    }

    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Unit => "unit",
            UnitKind::Kilogram => "kg",
            UnitKind::Liter => "l",
        }
    }
}

/// One of the three meal times served each simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTime {
    Morning,
    Midday,
    Evening,
}

impl MealTime {
    /// Meal times in serving order.
    pub fn all() -> [MealTime; 3] {
        [MealTime::Morning, MealTime::Midday, MealTime::Evening]
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealTime::Morning => "morning",
            MealTime::Midday => "midday",
            MealTime::Evening => "evening",
        }
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Population class; the two classes have distinct recipe requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopulationClass {
    Standard,
    Plus,
}

impl PopulationClass {
    pub fn all() -> [PopulationClass; 2] {
        [PopulationClass::Standard, PopulationClass::Plus]
    }
}

/// An ingredient kept in the warehouse. Immutable reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: u32,
    pub name: String,
    pub unit: UnitKind,
    /// Warehouse volume occupied per unit of quantity, in m³.
    pub unit_volume_m3: f64,
    pub perishable: bool,
}

/// A dish that can be served at one meal time. Immutable reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    pub id: u32,
    pub name: String,
    pub meal_time: MealTime,
    /// Marks the dish as representative for demand projection.
    pub base_for_projection: bool,
}

/// Quantity of one ingredient required per served unit of a dish, for one
/// population class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeLine {
    pub dish_id: u32,
    pub class: PopulationClass,
    pub ingredient_id: u32,
    pub qty_per_serving: f64,
}

/// Warehouse capacity bound for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioCapacity {
    pub scenario: String,
    pub capacity_m3: f64,
}

/// Read-only reference data: ingredients, dishes, recipe lines indexed by
/// (dish, class), and per-scenario capacities.
#[derive(Debug, Clone)]
pub struct Catalog {
    ingredients: HashMap<u32, Ingredient>,
    dishes: Vec<Dish>,
    recipes: HashMap<(u32, PopulationClass), Vec<RecipeLine>>,
    capacities: HashMap<String, f64>,
}

impl Catalog {
    pub fn new(
        ingredients: Vec<Ingredient>,
        dishes: Vec<Dish>,
        recipes: Vec<RecipeLine>,
        capacities: Vec<ScenarioCapacity>,
    ) -> Self {
        let ingredients = ingredients.into_iter().map(|i| (i.id, i)).collect();

        let mut by_dish_class: HashMap<(u32, PopulationClass), Vec<RecipeLine>> = HashMap::new();
        for line in recipes {
            by_dish_class
                .entry((line.dish_id, line.class))
                .or_default()
                .push(line);
        }

        let capacities = capacities
            .into_iter()
            .map(|c| (c.scenario, c.capacity_m3))
            .collect();

        Self {
            ingredients,
            dishes,
            recipes: by_dish_class,
            capacities,
        }
    }

    pub fn ingredient(&self, id: u32) -> Option<&Ingredient> {
        self.ingredients.get(&id)
    }

    /// Display name for an ingredient; falls back to the raw id.
    pub fn ingredient_name(&self, id: u32) -> String {
        self.ingredients
            .get(&id)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.values()
    }

    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    pub fn dishes_for(&self, meal: MealTime) -> Vec<&Dish> {
        self.dishes.iter().filter(|d| d.meal_time == meal).collect()
    }

    pub fn base_dishes(&self) -> Vec<&Dish> {
        self.dishes.iter().filter(|d| d.base_for_projection).collect()
    }

    pub fn recipe_lines(&self, dish_id: u32, class: PopulationClass) -> &[RecipeLine] {
        self.recipes
            .get(&(dish_id, class))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Capacity bound for a scenario, in m³.
    ///
    /// A missing scenario is a fatal configuration error; the error carries
    /// the closest known scenario name when one is similar enough.
    pub fn capacity_of(&self, scenario: &str) -> Result<f64> {
        if let Some(cap) = self.capacities.get(scenario) {
            return Ok(*cap);
        }

        let suggestion = self
            .capacities
            .keys()
            .map(|name| (name, jaro_winkler(name, scenario)))
            .filter(|(_, score)| *score > 0.7)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(name, _)| name.clone());

        Err(SimError::ScenarioNotFound {
            name: scenario.to_string(),
            suggestion,
        })
    }

    pub fn scenario_names(&self) -> Vec<&str> {
        self.capacities.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        Catalog::new(
            vec![
                Ingredient {
                    id: 1,
                    name: "Flour".to_string(),
                    unit: UnitKind::Unit,
                    unit_volume_m3: 0.02,
                    perishable: false,
                },
                Ingredient {
                    id: 2,
                    name: "Milk".to_string(),
                    unit: UnitKind::Liter,
                    unit_volume_m3: 0.001,
                    perishable: true,
                },
            ],
            vec![
                Dish {
                    id: 10,
                    name: "Porridge".to_string(),
                    meal_time: MealTime::Morning,
                    base_for_projection: true,
                },
                Dish {
                    id: 20,
                    name: "Stew".to_string(),
                    meal_time: MealTime::Evening,
                    base_for_projection: false,
                },
            ],
            vec![RecipeLine {
                dish_id: 10,
                class: PopulationClass::Standard,
                ingredient_id: 1,
                qty_per_serving: 0.5,
            }],
            vec![ScenarioCapacity {
                scenario: "cap".to_string(),
                capacity_m3: 50.0,
            }],
        )
    }

    #[test]
    fn test_dishes_for_meal_time() {
        let catalog = sample_catalog();
        let morning = catalog.dishes_for(MealTime::Morning);
        assert_eq!(morning.len(), 1);
        assert_eq!(morning[0].name, "Porridge");
        assert!(catalog.dishes_for(MealTime::Midday).is_empty());
    }

    #[test]
    fn test_base_dishes() {
        let catalog = sample_catalog();
        let base = catalog.base_dishes();
        assert_eq!(base.len(), 1);
        assert_eq!(base[0].id, 10);
    }

    #[test]
    fn test_recipe_lines_missing_class_is_empty() {
        let catalog = sample_catalog();
        assert_eq!(catalog.recipe_lines(10, PopulationClass::Standard).len(), 1);
        assert!(catalog.recipe_lines(10, PopulationClass::Plus).is_empty());
    }

    #[test]
    fn test_capacity_lookup() {
        let catalog = sample_catalog();
        assert_eq!(catalog.capacity_of("cap").unwrap(), 50.0);
    }

    #[test]
    fn test_missing_scenario_suggests_closest() {
        let catalog = sample_catalog();
        let err = catalog.capacity_of("capp").unwrap_err();
        match err {
            SimError::ScenarioNotFound { name, suggestion } => {
                assert_eq!(name, "capp");
                assert_eq!(suggestion.as_deref(), Some("cap"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_discrete_units() {
        assert!(UnitKind::Unit.is_discrete());
        assert!(!UnitKind::Kilogram.is_discrete());
        assert!(!UnitKind::Liter.is_discrete());
    }
}
