//! Communication contacts, replaced as a set per step submission

use rusqlite::params;

use super::database::Database;
use super::new_id;
use crate::error::{BcpError, Result};
use crate::model::{Contact, ContactSubmission, ContactType};

/// Store for the `communications` child table.
pub struct ContactStore<'a> {
    db: &'a Database,
}

impl<'a> ContactStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Replace the plan's contact set with the submitted one.
    pub fn replace_for_plan(&self, plan_id: &str, contacts: &[ContactSubmission]) -> Result<()> {
        let mut conn = self.db.lock();
        let tx = conn
            .transaction()
            .map_err(BcpError::storage("replace_communications", plan_id))?;

        tx.execute(
            "DELETE FROM communications WHERE bcp_id = ?1",
            params![plan_id],
        )
        .map_err(BcpError::storage("replace_communications", plan_id))?;

        for contact in contacts {
            tx.execute(
                "INSERT INTO communications (id, bcp_id, name, email, type)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    new_id(),
                    plan_id,
                    contact.name,
                    contact.email,
                    contact.kind.as_str()
                ],
            )
            .map_err(BcpError::storage("replace_communications", plan_id))?;
        }

        tx.commit()
            .map_err(BcpError::storage("replace_communications", plan_id))?;

        tracing::info!(plan_id = %plan_id, count = contacts.len(), "Replaced contact set");
        Ok(())
    }

    /// List the plan's contacts in insertion order.
    pub fn list_for_plan(&self, plan_id: &str) -> Result<Vec<Contact>> {
        let conn = self.db.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, bcp_id, name, email, type
                 FROM communications WHERE bcp_id = ?1 ORDER BY rowid",
            )
            .map_err(BcpError::storage("list_communications", plan_id))?;

        let contacts = stmt
            .query_map([plan_id], |row| {
                let kind: Option<String> = row.get(4)?;
                Ok(Contact {
                    id: row.get(0)?,
                    plan_id: row.get(1)?,
                    name: row.get(2)?,
                    email: row.get(3)?,
                    kind: kind.as_deref().map(ContactType::parse).unwrap_or_default(),
                })
            })
            .map_err(BcpError::storage("list_communications", plan_id))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(BcpError::storage("list_communications", plan_id))?;

        Ok(contacts)
    }
}
