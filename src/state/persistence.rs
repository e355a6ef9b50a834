use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{
    Catalog, DailyReport, Dish, Ingredient, RecipeLine, ScenarioCapacity,
};

fn read_csv<T, P>(path: P) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Load the four reference tables from a directory of CSV files:
/// `ingredients.csv`, `dishes.csv`, `recipes.csv`, `warehouse.csv`.
pub fn load_catalog<P: AsRef<Path>>(dir: P) -> Result<Catalog> {
    let dir = dir.as_ref();
    let ingredients: Vec<Ingredient> = read_csv(dir.join("ingredients.csv"))?;
    let dishes: Vec<Dish> = read_csv(dir.join("dishes.csv"))?;
    let recipes: Vec<RecipeLine> = read_csv(dir.join("recipes.csv"))?;
    let capacities: Vec<ScenarioCapacity> = read_csv(dir.join("warehouse.csv"))?;
    Ok(Catalog::new(ingredients, dishes, recipes, capacities))
}

/// Persisted daily reports: one row per (day, scenario), kept day-ascending
/// in a JSON file.
#[derive(Debug)]
pub struct ReportStore {
    path: PathBuf,
    rows: Vec<DailyReport>,
}

impl ReportStore {
    /// Open a store, loading existing rows if the file is present.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let rows = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };
        Ok(Self { path, rows })
    }

    /// Insert or replace the row for the report's (day, scenario) key and
    /// write the file through.
    pub fn upsert(&mut self, report: DailyReport) -> Result<()> {
        match self
            .rows
            .iter_mut()
            .find(|r| r.day == report.day && r.scenario == report.scenario)
        {
            Some(row) => *row = report,
            None => self.rows.push(report),
        }
        self.rows.sort_by_key(|r| r.day);
        self.save()
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.rows)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Rows with `from <= day <= to`, optionally filtered by scenario,
    /// day-ascending, at most `limit` rows.
    pub fn query(
        &self,
        from: u32,
        to: u32,
        scenario: Option<&str>,
        limit: usize,
    ) -> Vec<&DailyReport> {
        self.rows
            .iter()
            .filter(|r| r.day >= from && r.day <= to)
            .filter(|r| scenario.map(|s| r.scenario == s).unwrap_or(true))
            .take(limit)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop every row and write the empty file through.
    pub fn clear(&mut self) -> Result<()> {
        self.rows.clear();
        self.save()
    }
}
