use super::{PersistenceError, PersistenceResult};
use crate::plan::ProjectPlan;
use crate::schedule::{DATE_FORMAT, DerivedTask, TaskStatus};
use crate::template::{BudgetRange, TaskPriority};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::info;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct PlanSnapshot {
    version: u32,
    plan: ProjectPlan,
}

pub fn save_plan_to_json<P: AsRef<Path>>(plan: &ProjectPlan, path: P) -> PersistenceResult<()> {
    super::validate_plan(plan)?;
    let snapshot = PlanSnapshot {
        version: SNAPSHOT_VERSION,
        plan: plan.clone(),
    };
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    info!(id = plan.id, path = %path.as_ref().display(), "saved plan as json");
    Ok(())
}

pub fn load_plan_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<ProjectPlan> {
    let file = File::open(path)?;
    let snapshot: PlanSnapshot = serde_json::from_reader(file)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(PersistenceError::InvalidData(format!(
            "unsupported plan snapshot version {}",
            snapshot.version
        )));
    }
    super::validate_plan(&snapshot.plan)?;
    Ok(snapshot.plan)
}

/// Everything about a plan except its tasks; stored as JSON in the first CSV
/// row.
#[derive(Serialize, Deserialize)]
struct PlanHeader {
    id: i32,
    name: String,
    template_id: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget_range: Option<BudgetRange>,
    #[serde(default)]
    suggested_documents: Vec<String>,
}

impl From<&ProjectPlan> for PlanHeader {
    fn from(plan: &ProjectPlan) -> Self {
        Self {
            id: plan.id,
            name: plan.name.clone(),
            template_id: plan.template_id.clone(),
            start_date: plan.start_date,
            end_date: plan.end_date,
            budget_range: plan.budget_range,
            suggested_documents: plan.suggested_documents.clone(),
        }
    }
}

impl PlanHeader {
    fn into_plan(self, tasks: Vec<DerivedTask>) -> ProjectPlan {
        ProjectPlan {
            id: self.id,
            name: self.name,
            template_id: self.template_id,
            start_date: self.start_date,
            end_date: self.end_date,
            budget_range: self.budget_range,
            suggested_documents: self.suggested_documents,
            tasks,
        }
    }
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    position: usize,
    title: String,
    description: String,
    priority: String,
    due_date: String,
    status: String,
    #[serde(default)]
    plan_json: String,
}

impl TaskCsvRecord {
    fn header_row(plan: &ProjectPlan) -> PersistenceResult<Self> {
        Ok(Self {
            plan_json: serde_json::to_string(&PlanHeader::from(plan))?,
            ..Self::default()
        })
    }

    fn from_task(position: usize, task: &DerivedTask) -> Self {
        Self {
            position,
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority.as_str().to_string(),
            due_date: task.due_date.format(DATE_FORMAT).to_string(),
            status: task.status.as_str().to_string(),
            plan_json: String::new(),
        }
    }

    fn is_header_row(&self) -> bool {
        !self.plan_json.trim().is_empty()
    }

    fn into_task(self) -> PersistenceResult<DerivedTask> {
        let priority = self
            .priority
            .parse::<TaskPriority>()
            .map_err(PersistenceError::InvalidData)?;
        let status = self
            .status
            .parse::<TaskStatus>()
            .map_err(PersistenceError::InvalidData)?;
        let due_date = NaiveDate::parse_from_str(self.due_date.trim(), DATE_FORMAT).map_err(|e| {
            PersistenceError::InvalidData(format!("invalid date '{}': {e}", self.due_date))
        })?;
        Ok(DerivedTask {
            title: self.title,
            description: self.description,
            priority,
            due_date,
            status,
        })
    }
}

pub fn save_plan_to_csv<P: AsRef<Path>>(plan: &ProjectPlan, path: P) -> PersistenceResult<()> {
    super::validate_plan(plan)?;
    let file = File::create(path.as_ref())?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(TaskCsvRecord::header_row(plan)?)?;
    for (idx, task) in plan.tasks.iter().enumerate() {
        writer.serialize(TaskCsvRecord::from_task(idx + 1, task))?;
    }
    writer.flush()?;
    info!(id = plan.id, path = %path.as_ref().display(), "saved plan as csv");
    Ok(())
}

pub fn load_plan_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<ProjectPlan> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut header: Option<PlanHeader> = None;
    let mut rows: Vec<(usize, DerivedTask)> = Vec::new();

    for record in reader.deserialize::<TaskCsvRecord>() {
        let record = record?;
        if record.is_header_row() {
            if header.is_some() {
                return Err(PersistenceError::InvalidData(
                    "CSV file contained multiple plan rows".into(),
                ));
            }
            header = Some(serde_json::from_str(&record.plan_json).map_err(|err| {
                PersistenceError::InvalidData(format!("invalid plan json: {err}"))
            })?);
            continue;
        }
        let position = record.position;
        rows.push((position, record.into_task()?));
    }

    let header = header
        .ok_or_else(|| PersistenceError::InvalidData("CSV file contained no plan row".into()))?;

    rows.sort_by_key(|(position, _)| *position);
    let tasks = rows.into_iter().map(|(_, task)| task).collect();
    let plan = header.into_plan(tasks);
    super::validate_plan(&plan)?;
    Ok(plan)
}
