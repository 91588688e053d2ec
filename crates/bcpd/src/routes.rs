//! HTTP surface for the wizard and report collaborators
//!
//! JSON in, JSON out. Write endpoints run the synchronous store work on
//! the blocking pool; the report endpoint is async end to end.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::task;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use bcp_core::model::{ContactSubmission, ImpactSubmission, Plan, PlanSubmission, ProcessSubmission};
use bcp_core::storage::PlanStore;
use bcp_core::{Database, PlanIntake, PlanReport, ReportBuilder};

use crate::error::ApiError;

/// Shared state: the process-wide database handle.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Build the application router.
///
/// The wizard is served from a different origin, hence the permissive
/// CORS layer.
pub fn router(db: Arc<Database>) -> Router {
    Router::new()
        .route("/api/bcp", post(create_plan))
        .route("/api/bcp/:id/processes", post(save_processes))
        .route("/api/bcp/:id/bia", post(save_impact))
        .route("/api/bcp/:id/communications", post(save_communications))
        .route("/api/bcp/:id/risks", post(save_risks))
        .route("/api/bcps", get(list_plans))
        .route("/api/bcp/:id/report", get(plan_report))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { db })
}

#[derive(Debug, Serialize)]
struct Created {
    id: String,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct Saved {
    message: &'static str,
}

#[derive(Debug, Deserialize)]
struct ProcessesBody {
    #[serde(default)]
    processes: Vec<ProcessSubmission>,
}

#[derive(Debug, Deserialize)]
struct CommunicationsBody {
    #[serde(default)]
    communications: Vec<ContactSubmission>,
}

#[derive(Debug, Deserialize)]
struct RisksBody {
    #[serde(default)]
    description: String,
}

async fn create_plan(
    State(state): State<AppState>,
    Json(submission): Json<PlanSubmission>,
) -> Result<Json<Created>, ApiError> {
    let intake = PlanIntake::new(state.db.clone());
    let id = task::spawn_blocking(move || intake.save_plan(&submission)).await??;
    Ok(Json(Created {
        id,
        message: "BCP created successfully",
    }))
}

async fn save_processes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ProcessesBody>,
) -> Result<Json<Saved>, ApiError> {
    let intake = PlanIntake::new(state.db.clone());
    task::spawn_blocking(move || intake.save_processes(&id, &body.processes)).await??;
    Ok(Json(Saved {
        message: "Processes saved successfully",
    }))
}

async fn save_impact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ImpactSubmission>,
) -> Result<Json<Saved>, ApiError> {
    let intake = PlanIntake::new(state.db.clone());
    task::spawn_blocking(move || intake.save_impact(&id, &body)).await??;
    Ok(Json(Saved {
        message: "BIA data saved successfully",
    }))
}

async fn save_communications(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CommunicationsBody>,
) -> Result<Json<Saved>, ApiError> {
    let intake = PlanIntake::new(state.db.clone());
    task::spawn_blocking(move || intake.save_communications(&id, &body.communications)).await??;
    Ok(Json(Saved {
        message: "Communications saved successfully",
    }))
}

async fn save_risks(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RisksBody>,
) -> Result<Json<Saved>, ApiError> {
    let intake = PlanIntake::new(state.db.clone());
    task::spawn_blocking(move || intake.save_risks(&id, &body.description)).await??;
    Ok(Json(Saved {
        message: "Risks saved successfully",
    }))
}

async fn list_plans(State(state): State<AppState>) -> Result<Json<Vec<Plan>>, ApiError> {
    let db = state.db.clone();
    let plans = task::spawn_blocking(move || PlanStore::new(&db).list_plans()).await??;
    Ok(Json(plans))
}

async fn plan_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlanReport>, ApiError> {
    let report = ReportBuilder::new(state.db.clone()).assemble(&id).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use bcp_core::Database;

    use super::router;

    fn test_app() -> (Router, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::new(&db_path).expect("Failed to create database"));
        (router(db), temp_dir)
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        send(app, request).await
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        send(app, request).await
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    async fn create_plan(app: &Router, name: &str) -> String {
        let (status, body) = post_json(
            app,
            "/api/bcp",
            json!({ "name": name, "serviceName": "Payments" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "BCP created successfully");
        body["id"].as_str().expect("id").to_string()
    }

    #[tokio::test]
    async fn test_wizard_flow_produces_complete_report() {
        let (app, _temp) = test_app();
        let id = create_plan(&app, "Payments BCP").await;

        let (status, _) = post_json(
            &app,
            &format!("/api/bcp/{id}/processes"),
            json!({
                "processes": [
                    {
                        "name": "Settlement",
                        "sites": ["Site A", "Site B"],
                        "primaryOwner": { "name": "Ana", "email": "ana@example.com" },
                        "backupOwner": { "name": "Ben", "email": "ben@example.com" }
                    },
                    { "name": "Clearing" }
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = post_json(
            &app,
            &format!("/api/bcp/{id}/bia"),
            json!({
                "criticalityUnit": "Hours",
                "criticalityValue": 4,
                "headcountRequirement": 12,
                "dependencies": [
                    { "type": "Upstream", "description": "payments feed" },
                    { "type": "IT", "description": "core ledger" },
                    { "type": "External", "description": "card network" }
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = post_json(
            &app,
            &format!("/api/bcp/{id}/communications"),
            json!({
                "communications": [
                    { "name": "Ana", "email": "ana@example.com" },
                    { "name": "Ben", "email": "ben@example.com" },
                    { "name": "Ops", "email": "ops@example.com", "type": "group" }
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = post_json(
            &app,
            &format!("/api/bcp/{id}/risks"),
            json!({ "description": "Single datacenter dependency" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, report) = get_json(&app, &format!("/api/bcp/{id}/report")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["bcp"].as_array().expect("bcp").len(), 1);
        assert_eq!(report["bcp"][0]["serviceName"], "Payments");
        assert_eq!(report["processes"].as_array().expect("processes").len(), 2);
        assert_eq!(report["processes"][0]["sites"], json!(["Site A", "Site B"]));
        assert_eq!(report["bia"].as_array().expect("bia").len(), 1);
        assert_eq!(
            report["bia"][0]["dependencies"].as_array().expect("deps").len(),
            3
        );
        assert_eq!(report["bia"][0]["dependencies"][1]["type"], "IT");
        assert_eq!(
            report["communications"].as_array().expect("comms").len(),
            3
        );
        assert_eq!(report["communications"][2]["type"], "group");
        assert_eq!(report["risks"].as_array().expect("risks").len(), 1);
    }

    #[tokio::test]
    async fn test_create_plan_validation_is_400_with_error_body() {
        let (app, _temp) = test_app();

        let (status, body) =
            post_json(&app, "/api/bcp", json!({ "serviceName": "Payments" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().expect("error").contains("name"));
    }

    #[tokio::test]
    async fn test_report_for_unknown_plan_is_404() {
        let (app, _temp) = test_app();

        let (status, body) = get_json(&app, "/api/bcp/no-such-plan/report").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().expect("error").contains("no-such-plan"));
    }

    #[tokio::test]
    async fn test_list_plans_newest_first() {
        let (app, _temp) = test_app();

        let first = create_plan(&app, "First").await;
        let second = create_plan(&app, "Second").await;
        let third = create_plan(&app, "Third").await;

        let (status, body) = get_json(&app, "/api/bcps").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .expect("plans")
            .iter()
            .map(|p| p["id"].as_str().expect("id"))
            .collect();
        assert_eq!(ids, vec![third.as_str(), second.as_str(), first.as_str()]);
    }

    #[tokio::test]
    async fn test_resubmitting_risks_blank_clears_them() {
        let (app, _temp) = test_app();
        let id = create_plan(&app, "Payments BCP").await;

        post_json(
            &app,
            &format!("/api/bcp/{id}/risks"),
            json!({ "description": "Old risk" }),
        )
        .await;
        post_json(&app, &format!("/api/bcp/{id}/risks"), json!({ "description": "  " })).await;

        let (_, report) = get_json(&app, &format!("/api/bcp/{id}/report")).await;
        assert_eq!(report["risks"], json!([]));
    }
}
