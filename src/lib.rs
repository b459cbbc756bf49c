pub mod calendar;
pub mod catalog;
pub mod config;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod persistence;
pub mod plan;
pub mod schedule;
pub mod template;
pub(crate) mod template_validation;

pub use calendar::{CalendarError, WorkCalendar, WorkCalendarConfig};
pub use catalog::{CatalogError, TemplateCatalog};
pub use config::{ConfigError, PlannerConfig};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqlitePlanStore;
pub use persistence::{
    PersistenceError, PlanStore, load_plan_from_csv, load_plan_from_json, save_plan_to_csv,
    save_plan_to_json, validate_plan,
};
pub use plan::{PlanError, PlanSummary, ProjectBook, ProjectPlan};
pub use schedule::{
    DayCounting, DerivedTask, ScheduleDeriver, ScheduleError, TaskStatus, calculate_end_date,
    generate_tasks_from_template,
};
pub use template::{BudgetRange, ProjectTemplate, TaskBlueprint, TaskPriority};
pub use template_validation::TemplateValidationError;
