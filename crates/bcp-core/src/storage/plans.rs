//! Plan CRUD operations

use chrono::{DateTime, Utc};
use rusqlite::params;

use super::database::Database;
use super::new_id;
use crate::error::{BcpError, Result};
use crate::model::Plan;

/// Scalar fields of a plan, as captured by the first wizard step.
#[derive(Debug, Clone)]
pub struct PlanFields<'a> {
    pub name: &'a str,
    pub business_unit: Option<&'a str>,
    pub sub_business_unit: Option<&'a str>,
    pub service_name: &'a str,
    pub service_description: Option<&'a str>,
}

/// Store for the parent `bcps` table.
pub struct PlanStore<'a> {
    db: &'a Database,
}

impl<'a> PlanStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new plan and return its generated identifier.
    pub fn create_plan(&self, fields: &PlanFields<'_>) -> Result<String> {
        let id = new_id();
        let now = Utc::now().to_rfc3339();

        self.db
            .lock()
            .execute(
                "INSERT INTO bcps (id, name, business_unit, sub_business_unit, service_name, service_description, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    id,
                    fields.name,
                    fields.business_unit,
                    fields.sub_business_unit,
                    fields.service_name,
                    fields.service_description,
                    now,
                    now
                ],
            )
            .map_err(BcpError::storage("create_plan", &id))?;

        Ok(id)
    }

    /// Update an existing plan's scalar fields. `created_at` is never
    /// touched; `updated_at` is refreshed. Returns false when no row
    /// matched the identifier.
    pub fn update_plan(&self, plan_id: &str, fields: &PlanFields<'_>) -> Result<bool> {
        let now = Utc::now().to_rfc3339();

        let updated = self
            .db
            .lock()
            .execute(
                "UPDATE bcps SET name = ?1, business_unit = ?2, sub_business_unit = ?3, service_name = ?4, service_description = ?5, updated_at = ?6
                 WHERE id = ?7",
                params![
                    fields.name,
                    fields.business_unit,
                    fields.sub_business_unit,
                    fields.service_name,
                    fields.service_description,
                    now,
                    plan_id
                ],
            )
            .map_err(BcpError::storage("update_plan", plan_id))?;

        Ok(updated > 0)
    }

    /// Fetch one plan by identifier.
    pub fn get_plan(&self, plan_id: &str) -> Result<Option<Plan>> {
        let conn = self.db.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, name, business_unit, sub_business_unit, service_name, service_description, created_at, updated_at
                 FROM bcps WHERE id = ?1",
            )
            .map_err(BcpError::storage("get_plan", plan_id))?;

        match stmt.query_row([plan_id], map_plan_row) {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BcpError::storage("get_plan", plan_id)(e)),
        }
    }

    /// List every plan, most recently created first.
    pub fn list_plans(&self) -> Result<Vec<Plan>> {
        let conn = self.db.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, name, business_unit, sub_business_unit, service_name, service_description, created_at, updated_at
                 FROM bcps ORDER BY created_at DESC, rowid DESC",
            )
            .map_err(BcpError::storage_unscoped("list_plans"))?;

        let plans = stmt
            .query_map([], map_plan_row)
            .map_err(BcpError::storage_unscoped("list_plans"))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(BcpError::storage_unscoped("list_plans"))?;

        Ok(plans)
    }
}

fn map_plan_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Plan> {
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(Plan {
        id: row.get(0)?,
        name: row.get(1)?,
        business_unit: row.get(2)?,
        sub_business_unit: row.get(3)?,
        service_name: row.get(4)?,
        service_description: row.get(5)?,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
