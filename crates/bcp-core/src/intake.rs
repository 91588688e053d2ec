//! Staged write protocol
//!
//! One method per wizard step. Each validates its required fields before
//! touching storage, then hands the payload to the matching replace
//! operation, so a resubmitted step always leaves exactly the rows of
//! the latest payload.

use std::sync::Arc;

use crate::error::{BcpError, Result};
use crate::model::{ContactSubmission, ImpactSubmission, PlanSubmission, ProcessSubmission};
use crate::storage::{
    ContactStore, Database, ImpactStore, PlanFields, PlanStore, ProcessStore, RiskStore,
};

/// Entry point for the wizard's per-step saves.
#[derive(Clone)]
pub struct PlanIntake {
    db: Arc<Database>,
}

impl PlanIntake {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Step 1: create or update the plan, and capture its process set
    /// when one is attached. Returns the plan identifier.
    pub fn save_plan(&self, submission: &PlanSubmission) -> Result<String> {
        require("name", &submission.name)?;
        require("serviceName", &submission.service_name)?;

        let fields = PlanFields {
            name: submission.name.trim(),
            business_unit: submission.business_unit.as_deref(),
            sub_business_unit: submission.sub_business_unit.as_deref(),
            service_name: submission.service_name.trim(),
            service_description: submission.service_description.as_deref(),
        };

        let store = PlanStore::new(&self.db);
        let plan_id = match submission.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                if !store.update_plan(id, &fields)? {
                    return Err(BcpError::NotFound(id.to_string()));
                }
                id.to_string()
            }
            _ => store.create_plan(&fields)?,
        };

        if let Some(processes) = &submission.processes {
            self.save_processes(&plan_id, processes)?;
        }

        Ok(plan_id)
    }

    /// Step 1 (process part): replace the plan's process set.
    pub fn save_processes(&self, plan_id: &str, processes: &[ProcessSubmission]) -> Result<()> {
        require("id", plan_id)?;
        for process in processes {
            require("process name", &process.name)?;
        }
        ProcessStore::new(&self.db).replace_for_plan(plan_id, processes)
    }

    /// Step 2: replace the plan's impact-analysis record.
    pub fn save_impact(&self, plan_id: &str, impact: &ImpactSubmission) -> Result<()> {
        require("id", plan_id)?;
        for dependency in &impact.dependencies {
            require("dependency description", &dependency.description)?;
        }
        ImpactStore::new(&self.db).replace_for_plan(plan_id, impact)
    }

    /// Step 3: replace the plan's communication contacts.
    pub fn save_communications(
        &self,
        plan_id: &str,
        contacts: &[ContactSubmission],
    ) -> Result<()> {
        require("id", plan_id)?;
        for contact in contacts {
            require("contact name", &contact.name)?;
            require("contact email", &contact.email)?;
        }
        ContactStore::new(&self.db).replace_for_plan(plan_id, contacts)
    }

    /// Step 4: replace the plan's risk notes. A blank description means
    /// "no risk recorded" and clears prior notes.
    pub fn save_risks(&self, plan_id: &str, description: &str) -> Result<()> {
        require("id", plan_id)?;
        RiskStore::new(&self.db).replace_for_plan(plan_id, description)
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BcpError::Validation(field.to_string()));
    }
    Ok(())
}
