//! Process rows, replaced as a set per step submission

use rusqlite::params;

use super::database::Database;
use super::new_id;
use crate::codec;
use crate::error::{BcpError, Result};
use crate::model::{Owner, Process, ProcessSubmission};

/// Store for the `processes` child table.
pub struct ProcessStore<'a> {
    db: &'a Database,
}

impl<'a> ProcessStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Replace the plan's entire process set with the submitted one.
    ///
    /// The delete and inserts run in one transaction under the
    /// connection lock, so a reader sees the old set or the new set,
    /// never a mix, and two concurrent resubmissions cannot interleave.
    pub fn replace_for_plan(
        &self,
        plan_id: &str,
        processes: &[ProcessSubmission],
    ) -> Result<()> {
        let mut conn = self.db.lock();
        let tx = conn
            .transaction()
            .map_err(BcpError::storage("replace_processes", plan_id))?;

        tx.execute("DELETE FROM processes WHERE bcp_id = ?1", params![plan_id])
            .map_err(BcpError::storage("replace_processes", plan_id))?;

        for process in processes {
            tx.execute(
                "INSERT INTO processes (id, bcp_id, name, sites, primary_owner_name, primary_owner_email, backup_owner_name, backup_owner_email)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    new_id(),
                    plan_id,
                    process.name,
                    codec::encode(&process.sites),
                    process.primary_owner.name,
                    process.primary_owner.email,
                    process.backup_owner.name,
                    process.backup_owner.email
                ],
            )
            .map_err(BcpError::storage("replace_processes", plan_id))?;
        }

        tx.commit()
            .map_err(BcpError::storage("replace_processes", plan_id))?;

        tracing::info!(plan_id = %plan_id, count = processes.len(), "Replaced process set");
        Ok(())
    }

    /// List the plan's processes in insertion order, site lists decoded.
    pub fn list_for_plan(&self, plan_id: &str) -> Result<Vec<Process>> {
        let conn = self.db.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, bcp_id, name, sites, primary_owner_name, primary_owner_email, backup_owner_name, backup_owner_email
                 FROM processes WHERE bcp_id = ?1 ORDER BY rowid",
            )
            .map_err(BcpError::storage("list_processes", plan_id))?;

        let processes = stmt
            .query_map([plan_id], |row| {
                let sites: Option<String> = row.get(3)?;
                Ok(Process {
                    id: row.get(0)?,
                    plan_id: row.get(1)?,
                    name: row.get(2)?,
                    sites: codec::decode(sites.as_deref()),
                    primary_owner: Owner {
                        name: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                        email: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                    },
                    backup_owner: Owner {
                        name: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                        email: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
                    },
                })
            })
            .map_err(BcpError::storage("list_processes", plan_id))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(BcpError::storage("list_processes", plan_id))?;

        Ok(processes)
    }
}
