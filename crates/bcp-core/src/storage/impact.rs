//! Impact-analysis rows
//!
//! The table can historically hold several rows per plan; each submission
//! clears them and writes one fresh record.

use rusqlite::params;

use super::database::Database;
use super::new_id;
use crate::codec;
use crate::error::{BcpError, Result};
use crate::model::{CriticalityUnit, ImpactRecord, ImpactSubmission};

/// Store for the `bia_data` child table.
pub struct ImpactStore<'a> {
    db: &'a Database,
}

impl<'a> ImpactStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Replace the plan's impact record with the submitted one.
    pub fn replace_for_plan(&self, plan_id: &str, impact: &ImpactSubmission) -> Result<()> {
        let mut conn = self.db.lock();
        let tx = conn
            .transaction()
            .map_err(BcpError::storage("replace_impact", plan_id))?;

        tx.execute("DELETE FROM bia_data WHERE bcp_id = ?1", params![plan_id])
            .map_err(BcpError::storage("replace_impact", plan_id))?;

        tx.execute(
            "INSERT INTO bia_data (id, bcp_id, criticality_unit, criticality_value, headcount_requirement, dependencies)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new_id(),
                plan_id,
                impact.criticality_unit.map(|u| u.as_str()),
                impact.criticality_value,
                impact.headcount_requirement,
                codec::encode(&impact.dependencies)
            ],
        )
        .map_err(BcpError::storage("replace_impact", plan_id))?;

        tx.commit()
            .map_err(BcpError::storage("replace_impact", plan_id))?;

        tracing::info!(plan_id = %plan_id, dependencies = impact.dependencies.len(), "Replaced impact record");
        Ok(())
    }

    /// List the plan's impact rows, dependency lists decoded.
    pub fn list_for_plan(&self, plan_id: &str) -> Result<Vec<ImpactRecord>> {
        let conn = self.db.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, bcp_id, criticality_unit, criticality_value, headcount_requirement, dependencies
                 FROM bia_data WHERE bcp_id = ?1 ORDER BY rowid",
            )
            .map_err(BcpError::storage("list_impact", plan_id))?;

        let records = stmt
            .query_map([plan_id], |row| {
                let unit: Option<String> = row.get(2)?;
                let dependencies: Option<String> = row.get(5)?;
                Ok(ImpactRecord {
                    id: row.get(0)?,
                    plan_id: row.get(1)?,
                    criticality_unit: unit.as_deref().and_then(CriticalityUnit::parse),
                    criticality_value: row.get(3)?,
                    headcount_requirement: row.get(4)?,
                    dependencies: codec::decode(dependencies.as_deref()),
                })
            })
            .map_err(BcpError::storage("list_impact", plan_id))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(BcpError::storage("list_impact", plan_id))?;

        Ok(records)
    }
}
