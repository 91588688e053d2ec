//! Domain types for continuity plans
//!
//! Row structs mirror the five tables; submission structs mirror the
//! wizard's per-step payloads. All wire names are camelCase, and the
//! enumerated fields use the exact strings the wizard sends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How plan criticality is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriticalityUnit {
    Hours,
    Days,
}

impl CriticalityUnit {
    /// Persisted text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            CriticalityUnit::Hours => "Hours",
            CriticalityUnit::Days => "Days",
        }
    }

    /// Parse the persisted form. Unknown text degrades to `None` so that
    /// historical rows with free-form values still read back.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Hours" => Some(CriticalityUnit::Hours),
            "Days" => Some(CriticalityUnit::Days),
            _ => None,
        }
    }
}

/// Category of an impact-analysis dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyType {
    Upstream,
    #[serde(rename = "IT")]
    It,
    Equipment,
    External,
}

/// One impact-analysis dependency: a category plus free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "type")]
    pub kind: DependencyType,
    pub description: String,
}

/// Kind of communication contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    #[default]
    Individual,
    Group,
    DistributionList,
}

impl ContactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactType::Individual => "individual",
            ContactType::Group => "group",
            ContactType::DistributionList => "distribution_list",
        }
    }

    /// Parse the persisted form, defaulting unknown text to `individual`
    /// (the column default in the schema).
    pub fn parse(raw: &str) -> Self {
        match raw {
            "group" => ContactType::Group,
            "distribution_list" => ContactType::DistributionList,
            _ => ContactType::Individual,
        }
    }
}

/// Name + email pair for a process owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// One continuity plan (parent row).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub business_unit: Option<String>,
    pub sub_business_unit: Option<String>,
    pub service_name: String,
    pub service_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A business process belonging to a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: String,
    pub plan_id: String,
    pub name: String,
    pub sites: Vec<String>,
    pub primary_owner: Owner,
    pub backup_owner: Owner,
}

/// Impact-analysis record for a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactRecord {
    pub id: String,
    pub plan_id: String,
    pub criticality_unit: Option<CriticalityUnit>,
    pub criticality_value: Option<i64>,
    pub headcount_requirement: Option<i64>,
    pub dependencies: Vec<Dependency>,
}

/// A communication contact for a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub plan_id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: ContactType,
}

/// A free-text risk note for a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskNote {
    pub id: String,
    pub plan_id: String,
    pub description: String,
}

/// Step-1 payload: plan scalar fields plus, optionally, the process set
/// captured in the same step.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSubmission {
    /// Present when re-running the step against an existing plan.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub business_unit: Option<String>,
    #[serde(default)]
    pub sub_business_unit: Option<String>,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub service_description: Option<String>,
    #[serde(default)]
    pub processes: Option<Vec<ProcessSubmission>>,
}

/// One process within the step-1 payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sites: Vec<String>,
    #[serde(default)]
    pub primary_owner: Owner,
    #[serde(default)]
    pub backup_owner: Owner,
}

/// Impact-analysis step payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSubmission {
    #[serde(default)]
    pub criticality_unit: Option<CriticalityUnit>,
    #[serde(default)]
    pub criticality_value: Option<i64>,
    #[serde(default)]
    pub headcount_requirement: Option<i64>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// One contact within the communications step payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type", default)]
    pub kind: ContactType,
}
