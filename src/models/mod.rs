pub mod catalog;
pub mod report;

pub use catalog::{
    Catalog, Dish, Ingredient, MealTime, PopulationClass, RecipeLine, ScenarioCapacity, UnitKind,
};
pub use report::{CartEntry, DailyReport, DayMenu, MenuChoice, PurchaseLine, WasteEntry};
