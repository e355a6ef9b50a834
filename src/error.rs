use thiserror::Error;

use crate::models::MealTime;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("No capacity configured for scenario '{name}'{}", suggestion_text(.suggestion))]
    ScenarioNotFound {
        name: String,
        suggestion: Option<String>,
    },

    #[error("No dishes configured for meal time: {0}")]
    NoDishes(MealTime),

    #[error("Simulation has not been started")]
    NotRunning,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

fn suggestion_text(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
