//! Risk notes
//!
//! A blank submission clears the plan's notes instead of storing an
//! empty row.

use rusqlite::params;

use super::database::Database;
use super::new_id;
use crate::error::{BcpError, Result};
use crate::model::RiskNote;

/// Store for the `risks` child table.
pub struct RiskStore<'a> {
    db: &'a Database,
}

impl<'a> RiskStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Replace the plan's risk notes with the submitted description.
    pub fn replace_for_plan(&self, plan_id: &str, description: &str) -> Result<()> {
        let mut conn = self.db.lock();
        let tx = conn
            .transaction()
            .map_err(BcpError::storage("replace_risks", plan_id))?;

        tx.execute("DELETE FROM risks WHERE bcp_id = ?1", params![plan_id])
            .map_err(BcpError::storage("replace_risks", plan_id))?;

        let recorded = !description.trim().is_empty();
        if recorded {
            tx.execute(
                "INSERT INTO risks (id, bcp_id, description) VALUES (?1, ?2, ?3)",
                params![new_id(), plan_id, description],
            )
            .map_err(BcpError::storage("replace_risks", plan_id))?;
        }

        tx.commit()
            .map_err(BcpError::storage("replace_risks", plan_id))?;

        tracing::info!(plan_id = %plan_id, recorded, "Replaced risk notes");
        Ok(())
    }

    /// List the plan's risk notes in insertion order.
    pub fn list_for_plan(&self, plan_id: &str) -> Result<Vec<RiskNote>> {
        let conn = self.db.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, bcp_id, description FROM risks WHERE bcp_id = ?1 ORDER BY rowid",
            )
            .map_err(BcpError::storage("list_risks", plan_id))?;

        let notes = stmt
            .query_map([plan_id], |row| {
                let description: Option<String> = row.get(2)?;
                Ok(RiskNote {
                    id: row.get(0)?,
                    plan_id: row.get(1)?,
                    description: description.unwrap_or_default(),
                })
            })
            .map_err(BcpError::storage("list_risks", plan_id))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(BcpError::storage("list_risks", plan_id))?;

        Ok(notes)
    }
}
