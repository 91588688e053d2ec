//! Report aggregation
//!
//! Reassembles one plan's records into a single denormalized document.
//! The five table reads are independent, so they are launched together
//! and joined; the first failure wins.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{BcpError, Result};
use crate::model::{Contact, ImpactRecord, Plan, Process, RiskNote};
use crate::storage::{ContactStore, Database, ImpactStore, PlanStore, ProcessStore, RiskStore};

/// The denormalized report document.
///
/// `bcp` and `bia` are arrays for wire compatibility with the wizard's
/// report view: zero-or-one elements each.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub bcp: Vec<Plan>,
    pub processes: Vec<Process>,
    pub bia: Vec<ImpactRecord>,
    pub communications: Vec<Contact>,
    pub risks: Vec<RiskNote>,
}

/// Assembles plan reports from the store.
#[derive(Clone)]
pub struct ReportBuilder {
    db: Arc<Database>,
}

impl ReportBuilder {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Fetch all five record sets for the plan and join them into one
    /// document. Fails with `NotFound` when no plan row exists.
    pub async fn assemble(&self, plan_id: &str) -> Result<PlanReport> {
        let (plan, processes, bia, communications, risks) = tokio::try_join!(
            read(&self.db, plan_id, |db, id| PlanStore::new(db).get_plan(id)),
            read(&self.db, plan_id, |db, id| {
                ProcessStore::new(db).list_for_plan(id)
            }),
            read(&self.db, plan_id, |db, id| {
                ImpactStore::new(db).list_for_plan(id)
            }),
            read(&self.db, plan_id, |db, id| {
                ContactStore::new(db).list_for_plan(id)
            }),
            read(&self.db, plan_id, |db, id| {
                RiskStore::new(db).list_for_plan(id)
            }),
        )?;

        let plan = plan.ok_or_else(|| BcpError::NotFound(plan_id.to_string()))?;

        Ok(PlanReport {
            bcp: vec![plan],
            processes,
            bia,
            communications,
            risks,
        })
    }
}

/// Run one synchronous store query on the blocking pool.
async fn read<T, F>(db: &Arc<Database>, plan_id: &str, query: F) -> Result<T>
where
    F: FnOnce(&Database, &str) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(db);
    let plan_id = plan_id.to_string();
    tokio::task::spawn_blocking(move || query(&db, &plan_id)).await?
}
