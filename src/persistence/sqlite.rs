use super::{PersistenceError, PersistenceResult, PlanStore};
use crate::plan::{PlanSummary, ProjectPlan};
use crate::schedule::{DerivedTask, TaskStatus};
use crate::template::{BudgetRange, TaskPriority};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

/// Stores each plan as a `projects` row plus one `project_tasks` row per
/// derived task.
pub struct SqlitePlanStore {
    connection: Mutex<Connection>,
}

impl SqlitePlanStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::from_connection(connection)
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> PersistenceResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                template_id TEXT,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                budget_min INTEGER,
                budget_max INTEGER,
                suggested_documents_json TEXT NOT NULL DEFAULT '[]'
            );
            CREATE TABLE IF NOT EXISTS project_tasks (
                project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                priority TEXT NOT NULL,
                due_date TEXT NOT NULL,
                status TEXT NOT NULL,
                PRIMARY KEY (project_id, position)
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)
    }

    fn load_tasks(conn: &Connection, project_id: i32) -> PersistenceResult<Vec<DerivedTask>> {
        let mut stmt = conn.prepare(
            "SELECT title, description, priority, due_date, status
             FROM project_tasks WHERE project_id = ?1 ORDER BY position ASC",
        )?;
        let rows = stmt.query_map(params![project_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, NaiveDate>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            let (title, description, priority, due_date, status) = row?;
            tasks.push(DerivedTask {
                title,
                description,
                priority: priority
                    .parse::<TaskPriority>()
                    .map_err(PersistenceError::InvalidData)?,
                due_date,
                status: status
                    .parse::<TaskStatus>()
                    .map_err(PersistenceError::InvalidData)?,
            });
        }
        Ok(tasks)
    }
}

struct ProjectRow {
    id: i32,
    name: String,
    template_id: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget_min: Option<i64>,
    budget_max: Option<i64>,
    suggested_documents_json: String,
}

impl ProjectRow {
    const COLUMNS: &'static str = "id, name, template_id, start_date, end_date, budget_min, budget_max, suggested_documents_json";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            template_id: row.get(2)?,
            start_date: row.get(3)?,
            end_date: row.get(4)?,
            budget_min: row.get(5)?,
            budget_max: row.get(6)?,
            suggested_documents_json: row.get(7)?,
        })
    }

    fn into_plan(self, tasks: Vec<DerivedTask>) -> PersistenceResult<ProjectPlan> {
        let budget_range = match (self.budget_min, self.budget_max) {
            (Some(min), Some(max)) => Some(BudgetRange::new(min, max)),
            _ => None,
        };
        Ok(ProjectPlan {
            id: self.id,
            name: self.name,
            template_id: self.template_id,
            start_date: self.start_date,
            end_date: self.end_date,
            budget_range,
            suggested_documents: serde_json::from_str(&self.suggested_documents_json)?,
            tasks,
        })
    }
}

impl PlanStore for SqlitePlanStore {
    fn save_plan(&self, plan: &ProjectPlan) -> PersistenceResult<()> {
        super::validate_plan(plan)?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM projects WHERE id = ?1", params![plan.id])?;
        tx.execute(
            "INSERT INTO projects (id, name, template_id, start_date, end_date, budget_min, budget_max, suggested_documents_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                plan.id,
                plan.name,
                plan.template_id,
                plan.start_date,
                plan.end_date,
                plan.budget_range.map(|b| b.min),
                plan.budget_range.map(|b| b.max),
                serde_json::to_string(&plan.suggested_documents)?,
            ],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO project_tasks (project_id, position, title, description, priority, due_date, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (idx, task) in plan.tasks.iter().enumerate() {
                stmt.execute(params![
                    plan.id,
                    idx as i64 + 1,
                    task.title,
                    task.description,
                    task.priority.as_str(),
                    task.due_date,
                    task.status.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        info!(id = plan.id, tasks = plan.tasks.len(), "stored plan in sqlite");
        Ok(())
    }

    fn load_plan(&self, id: i32) -> PersistenceResult<Option<ProjectPlan>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM projects WHERE id = ?1", ProjectRow::COLUMNS);
        let row = conn
            .query_row(&sql, params![id], ProjectRow::from_row)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let tasks = Self::load_tasks(&conn, id)?;
        let plan = row.into_plan(tasks)?;
        super::validate_plan(&plan)?;
        Ok(Some(plan))
    }

    fn list_plans(&self) -> PersistenceResult<Vec<PlanSummary>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM projects ORDER BY id ASC", ProjectRow::COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], ProjectRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            let tasks = Self::load_tasks(&conn, row.id)?;
            summaries.push(row.into_plan(tasks)?.summary());
        }
        Ok(summaries)
    }

    fn delete_plan(&self, id: i32) -> PersistenceResult<bool> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}
