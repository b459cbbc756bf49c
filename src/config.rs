//! Environment-driven settings shared by the `cli` and `http` binaries.
//!
//! | variable                 | meaning                                        |
//! |--------------------------|------------------------------------------------|
//! | `RENO_PLANNER_HTTP_ADDR` | bind address, default `0.0.0.0:3000`           |
//! | `RENO_PLANNER_CATALOG`   | JSON catalog replacing the built-in templates  |
//! | `RENO_PLANNER_CALENDAR`  | JSON work calendar for working-day counts      |
//! | `RENO_PLANNER_DB`        | SQLite file for stored plans                   |

use crate::calendar::{CalendarError, WorkCalendar, WorkCalendarConfig};
use crate::catalog::{CatalogError, TemplateCatalog};
use std::fs::File;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

pub const HTTP_ADDR_VAR: &str = "RENO_PLANNER_HTTP_ADDR";
pub const CATALOG_VAR: &str = "RENO_PLANNER_CATALOG";
pub const CALENDAR_VAR: &str = "RENO_PLANNER_CALENDAR";
pub const DATABASE_VAR: &str = "RENO_PLANNER_DB";

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid http address '{value}': {source}")]
    InvalidAddress {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("calendar json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub http_addr: SocketAddr,
    pub catalog_path: Option<PathBuf>,
    pub calendar_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let raw_addr = get(HTTP_ADDR_VAR).unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidAddress {
                value: raw_addr.clone(),
                source,
            })?;

        Ok(Self {
            http_addr,
            catalog_path: get(CATALOG_VAR).map(PathBuf::from),
            calendar_path: get(CALENDAR_VAR).map(PathBuf::from),
            database_path: get(DATABASE_VAR).map(PathBuf::from),
        })
    }

    pub fn load_catalog(&self) -> Result<TemplateCatalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => Ok(TemplateCatalog::from_json_path(path)?),
            None => Ok(TemplateCatalog::builtin().clone()),
        }
    }

    /// The configured work calendar, if any. Callers opt into working-day
    /// counting with it; calendar-day arithmetic stays the default.
    pub fn load_work_calendar(&self) -> Result<Option<WorkCalendar>, ConfigError> {
        let Some(path) = &self.calendar_path else {
            return Ok(None);
        };
        let file = File::open(path)?;
        let config: WorkCalendarConfig = serde_json::from_reader(file)?;
        let calendar = WorkCalendar::from_config(&config)?;
        info!(path = %path.display(), "loaded work calendar");
        Ok(Some(calendar))
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            catalog_path: None,
            calendar_path: None,
            database_path: None,
        }
    }
}
