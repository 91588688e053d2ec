//! Error taxonomy for plan persistence and reporting

use thiserror::Error;

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, BcpError>;

/// Errors surfaced by the staged write protocol and the report aggregator.
#[derive(Debug, Error)]
pub enum BcpError {
    /// A required field was missing or blank. Raised at the intake
    /// boundary, before any storage I/O.
    #[error("missing required field: {0}")]
    Validation(String),

    /// No plan row exists for the identifier.
    #[error("plan not found: {0}")]
    NotFound(String),

    /// An underlying storage operation faulted. Carries the operation
    /// name and, where one applies, the plan identifier.
    #[error("storage failure in {op}: {source}")]
    Storage {
        op: &'static str,
        plan_id: Option<String>,
        #[source]
        source: rusqlite::Error,
    },

    /// A background report query never completed.
    #[error("report query interrupted: {0}")]
    Background(#[from] tokio::task::JoinError),
}

impl BcpError {
    /// Build a `map_err` closure tagging a storage fault with its
    /// operation and plan identifier.
    pub(crate) fn storage(
        op: &'static str,
        plan_id: &str,
    ) -> impl FnOnce(rusqlite::Error) -> BcpError {
        let plan_id = plan_id.to_string();
        move |source| BcpError::Storage {
            op,
            plan_id: Some(plan_id),
            source,
        }
    }

    /// Like [`BcpError::storage`] for operations not scoped to one plan.
    pub(crate) fn storage_unscoped(op: &'static str) -> impl FnOnce(rusqlite::Error) -> BcpError {
        move |source| BcpError::Storage {
            op,
            plan_id: None,
            source,
        }
    }
}
