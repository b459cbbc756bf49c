//! Date derivation for template-driven projects.
//!
//! Every offset is measured from the previous task's due date, so the due date
//! of task N is the project start plus the sum of the first N offsets.

use crate::calendar::WorkCalendar;
use crate::template::{ProjectTemplate, TaskBlueprint, TaskPriority};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid date '{input}' (expected YYYY-MM-DD)")]
    InvalidDate { input: String },
    #[error("invalid duration {days}: durations must be zero or positive")]
    InvalidDuration { days: i64 },
    #[error("{start} plus {days} days is outside the supported date range")]
    DateOutOfRange { start: NaiveDate, days: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status '{other}'")),
        }
    }
}

/// A concrete task with an absolute due date, ready to be stored against a
/// newly created project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedTask {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
}

impl DerivedTask {
    fn from_blueprint(blueprint: &TaskBlueprint, due_date: NaiveDate) -> Self {
        Self {
            title: blueprint.title.clone(),
            description: blueprint.description.clone(),
            priority: blueprint.priority,
            due_date,
            status: TaskStatus::Pending,
        }
    }
}

/// How an offset of N days is counted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DayCounting {
    /// Every calendar day counts, weekends included.
    #[default]
    CalendarDays,
    /// Only days the crew works count.
    WorkingDays(WorkCalendar),
}

/// Stateless date arithmetic over templates. Cheap to clone and safe to share.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleDeriver {
    counting: DayCounting,
}

impl ScheduleDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_work_calendar(calendar: WorkCalendar) -> Self {
        Self {
            counting: DayCounting::WorkingDays(calendar),
        }
    }

    pub fn counting(&self) -> &DayCounting {
        &self.counting
    }

    /// Advance `from` by `days`, rejecting negative offsets.
    pub fn add_days(&self, from: NaiveDate, days: i64) -> Result<NaiveDate, ScheduleError> {
        let offset = u64::try_from(days).map_err(|_| ScheduleError::InvalidDuration { days })?;
        let advanced = match &self.counting {
            DayCounting::CalendarDays => from.checked_add_days(Days::new(offset)),
            DayCounting::WorkingDays(calendar) => calendar.find_next_available(from, offset),
        };
        advanced.ok_or(ScheduleError::DateOutOfRange { start: from, days })
    }

    pub fn end_date(&self, start: NaiveDate, duration_days: i64) -> Result<NaiveDate, ScheduleError> {
        self.add_days(start, duration_days)
    }

    pub fn calculate_end_date(
        &self,
        start_date: &str,
        duration_days: i64,
    ) -> Result<String, ScheduleError> {
        let start = parse_date(start_date)?;
        let end = self.end_date(start, duration_days)?;
        Ok(format_date(end))
    }

    pub fn derive_tasks(
        &self,
        template: &ProjectTemplate,
        project_start: NaiveDate,
    ) -> Result<Vec<DerivedTask>, ScheduleError> {
        let (last_due, tasks) = template.tasks.iter().try_fold(
            (project_start, Vec::with_capacity(template.tasks.len())),
            |(cursor, mut tasks), blueprint| {
                let due = self.add_days(cursor, blueprint.estimated_days)?;
                tasks.push(DerivedTask::from_blueprint(blueprint, due));
                Ok::<_, ScheduleError>((due, tasks))
            },
        )?;

        debug!(
            template = %template.id,
            start = %project_start,
            tasks = tasks.len(),
            last_due = %last_due,
            "derived tasks from template"
        );
        Ok(tasks)
    }

    pub fn generate_tasks_from_template(
        &self,
        template: &ProjectTemplate,
        project_start_date: &str,
    ) -> Result<Vec<DerivedTask>, ScheduleError> {
        let start = parse_date(project_start_date)?;
        self.derive_tasks(template, start)
    }
}

/// Strict `YYYY-MM-DD` parsing; surrounding whitespace is ignored.
///
/// chrono accepts unpadded fields and a leading sign for `%Y-%m-%d`, so the
/// parsed date must format back to exactly the trimmed input.
pub fn parse_date(input: &str) -> Result<NaiveDate, ScheduleError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .filter(|date| format_date(*date) == trimmed)
        .ok_or_else(|| ScheduleError::InvalidDate {
            input: input.to_string(),
        })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `start_date` plus `duration_days` calendar days, as `YYYY-MM-DD`.
pub fn calculate_end_date(start_date: &str, duration_days: i64) -> Result<String, ScheduleError> {
    ScheduleDeriver::new().calculate_end_date(start_date, duration_days)
}

/// Calendar-day task derivation with cumulative offsets.
pub fn generate_tasks_from_template(
    template: &ProjectTemplate,
    project_start_date: &str,
) -> Result<Vec<DerivedTask>, ScheduleError> {
    ScheduleDeriver::new().generate_tasks_from_template(template, project_start_date)
}
