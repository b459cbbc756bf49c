use crate::schedule::{DerivedTask, ScheduleDeriver, ScheduleError, TaskStatus};
use crate::template::{BudgetRange, ProjectTemplate};
use chrono::{Datelike, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("project start date {start} must be on or before project end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
    #[error("plan id {id} is already in use")]
    IdInUse { id: i32 },
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// A project record together with the task rows derived for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPlan {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<BudgetRange>,
    #[serde(default)]
    pub suggested_documents: Vec<String>,
    pub tasks: Vec<DerivedTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub id: i32,
    pub name: String,
    pub template_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub task_count: usize,
    pub pending_count: usize,
    pub latest_due: Option<NaiveDate>,
}

impl PlanSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("id={}", self.id));
        parts.push(format!("name={}", self.name));
        if let Some(template_id) = &self.template_id {
            parts.push(format!("template={template_id}"));
        }
        parts.push(format!("start={}", self.start_date));
        parts.push(format!("end={}", self.end_date));
        parts.push(format!("tasks={}", self.task_count));
        if self.pending_count > 0 {
            parts.push(format!("pending={}", self.pending_count));
        }
        if let Some(date) = self.latest_due {
            parts.push(format!("last_due={date}"));
        }
        parts.join(", ")
    }
}

impl ProjectPlan {
    /// Create a plan from a template: the end date comes from the template's
    /// estimated duration and the tasks from its blueprints.
    pub fn from_template(
        id: i32,
        name: impl Into<String>,
        template: &ProjectTemplate,
        start_date: NaiveDate,
        deriver: &ScheduleDeriver,
    ) -> Result<Self, PlanError> {
        let end_date = deriver.end_date(start_date, template.estimated_duration)?;
        let tasks = deriver.derive_tasks(template, start_date)?;
        let plan = Self {
            id,
            name: name.into(),
            template_id: Some(template.id.clone()),
            start_date,
            end_date,
            budget_range: Some(template.budget_range),
            suggested_documents: template.suggested_documents.clone(),
            tasks,
        };
        debug!(id, template = %template.id, end = %plan.end_date, "created plan from template");
        Ok(plan)
    }

    /// A project without a template: no generated tasks.
    pub fn custom(
        id: i32,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, PlanError> {
        if start_date > end_date {
            return Err(PlanError::StartAfterEnd {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            template_id: None,
            start_date,
            end_date,
            budget_range: None,
            suggested_documents: Vec::new(),
            tasks: Vec::new(),
        })
    }

    pub fn latest_due(&self) -> Option<NaiveDate> {
        self.tasks.iter().map(|task| task.due_date).max()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            id: self.id,
            name: self.name.clone(),
            template_id: self.template_id.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            task_count: self.tasks.len(),
            pending_count: self
                .tasks
                .iter()
                .filter(|task| task.status == TaskStatus::Pending)
                .count(),
            latest_due: self.latest_due(),
        }
    }

    /// Tasks due strictly after the project end date. Templates whose task
    /// offsets outgrow their estimated duration show up here.
    pub fn tasks_past_end(&self) -> Vec<&DerivedTask> {
        self.tasks
            .iter()
            .filter(|task| task.due_date > self.end_date)
            .collect()
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let positions: Vec<i32> = (1..=self.tasks.len() as i32).collect();
        let titles: Vec<&str> = self.tasks.iter().map(|t| t.title.as_str()).collect();
        let priorities: Vec<&str> = self.tasks.iter().map(|t| t.priority.as_str()).collect();
        let due_days: Vec<i32> = self
            .tasks
            .iter()
            .map(|t| date_to_polars_days(t.due_date))
            .collect();
        let statuses: Vec<&str> = self.tasks.iter().map(|t| t.status.as_str()).collect();

        let columns: Vec<Column> = vec![
            Series::new(PlSmallStr::from_static("position"), positions).into_column(),
            Series::new(PlSmallStr::from_static("title"), titles).into_column(),
            Series::new(PlSmallStr::from_static("priority"), priorities).into_column(),
            Series::new(PlSmallStr::from_static("due_date"), due_days)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("status"), statuses).into_column(),
        ];

        DataFrame::new(columns)
    }
}

/// In-memory registry of plans keyed by id. Ids are handed out sequentially
/// starting at 1 and never reused.
#[derive(Debug, Clone)]
pub struct ProjectBook {
    plans: BTreeMap<i32, ProjectPlan>,
    next_id: i32,
}

impl Default for ProjectBook {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectBook {
    pub fn new() -> Self {
        Self {
            plans: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn create_from_template(
        &mut self,
        name: impl Into<String>,
        template: &ProjectTemplate,
        start_date: NaiveDate,
        deriver: &ScheduleDeriver,
    ) -> Result<&ProjectPlan, PlanError> {
        let plan = ProjectPlan::from_template(self.next_id, name, template, start_date, deriver)?;
        self.register(plan)
    }

    pub fn create_custom(
        &mut self,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<&ProjectPlan, PlanError> {
        let plan = ProjectPlan::custom(self.next_id, name, start_date, end_date)?;
        self.register(plan)
    }

    /// Add a plan built elsewhere (for example loaded from disk), keeping its
    /// id and moving the id counter past it. Returns the plan it replaced.
    pub fn insert(&mut self, plan: ProjectPlan) -> Option<ProjectPlan> {
        self.next_id = self.next_id.max(plan.id.saturating_add(1));
        self.plans.insert(plan.id, plan)
    }

    /// Stores a freshly created plan. Once the counter has reached `i32::MAX`
    /// and that id is taken, creation fails instead of replacing the plan.
    fn register(&mut self, plan: ProjectPlan) -> Result<&ProjectPlan, PlanError> {
        let id = plan.id;
        match self.plans.entry(id) {
            Entry::Occupied(_) => Err(PlanError::IdInUse { id }),
            Entry::Vacant(slot) => {
                self.next_id = id.saturating_add(1);
                Ok(slot.insert(plan))
            }
        }
    }

    pub fn get(&self, id: i32) -> Option<&ProjectPlan> {
        self.plans.get(&id)
    }

    pub fn remove(&mut self, id: i32) -> Option<ProjectPlan> {
        self.plans.remove(&id)
    }

    pub fn summaries(&self) -> Vec<PlanSummary> {
        self.plans.values().map(ProjectPlan::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

// Days from 0001-01-01 to 1970-01-01; polars dates count from the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Physical value of a polars `Date` cell.
pub fn date_to_polars_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn date_from_polars_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polars_days_count_from_unix_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_polars_days(epoch), 0);
        let date = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
        assert_eq!(date_to_polars_days(date), 20_096);
        assert_eq!(date_from_polars_days(20_096), Some(date));
        assert_eq!(date_from_polars_days(i32::MAX), None);
    }
}
