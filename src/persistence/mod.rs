use crate::plan::{PlanSummary, ProjectPlan};
use polars::prelude::PolarsError;
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("dataframe conversion error: {0}")]
    DataFrame(#[from] PolarsError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("plan store lock poisoned")]
    LockPoisoned,
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Storage for project plans and their derived task rows.
pub trait PlanStore {
    fn save_plan(&self, plan: &ProjectPlan) -> PersistenceResult<()>;
    fn load_plan(&self, id: i32) -> PersistenceResult<Option<ProjectPlan>>;
    fn list_plans(&self) -> PersistenceResult<Vec<PlanSummary>>;
    fn delete_plan(&self, id: i32) -> PersistenceResult<bool>;
}

/// Checks applied before a plan is written and after it is read back.
pub fn validate_plan(plan: &ProjectPlan) -> PersistenceResult<()> {
    if plan.name.trim().is_empty() {
        return Err(PersistenceError::InvalidData(format!(
            "plan {} has a blank name",
            plan.id
        )));
    }
    if plan.start_date > plan.end_date {
        return Err(PersistenceError::InvalidData(format!(
            "plan {} starts on {} after its end date {}",
            plan.id, plan.start_date, plan.end_date
        )));
    }
    for (idx, task) in plan.tasks.iter().enumerate() {
        if task.title.trim().is_empty() {
            return Err(PersistenceError::InvalidData(format!(
                "plan {} task #{} has a blank title",
                plan.id, idx
            )));
        }
        if task.due_date < plan.start_date {
            return Err(PersistenceError::InvalidData(format!(
                "plan {} task '{}' is due {} before the project start {}",
                plan.id, task.title, task.due_date, plan.start_date
            )));
        }
    }
    // Cumulative offsets never move backwards.
    if let Some(pair) = plan
        .tasks
        .windows(2)
        .find(|pair| pair[1].due_date < pair[0].due_date)
    {
        return Err(PersistenceError::InvalidData(format!(
            "plan {} task '{}' is due before the preceding task '{}'",
            plan.id, pair[1].title, pair[0].title
        )));
    }
    Ok(())
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{load_plan_from_csv, load_plan_from_json, save_plan_to_csv, save_plan_to_json};
