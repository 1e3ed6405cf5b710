//! Server target endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::actors::SweepReport;
use crate::api::{
    error::{ApiError, ApiResult},
    state::ApiState,
};
use crate::store::ServerRecord;

/// Request body for registering a server
#[derive(Debug, Deserialize)]
pub struct AddServerRequest {
    pub name: String,
    pub host: String,
    #[serde(default = "crate::util::get_default_port")]
    pub port: u16,
    pub api_key: String,
}

/// GET /api/v1/servers
///
/// List all registered servers with their stored monitoring state
pub async fn list_servers(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    let servers = state.store.list_servers().await?;

    Ok(Json(json!({
        "count": servers.len(),
        "servers": servers,
    })))
}

/// POST /api/v1/servers
///
/// Register a new server; it starts with status UNKNOWN and is picked
/// up on the next sweep
pub async fn add_server(
    State(state): State<ApiState>,
    Json(body): Json<AddServerRequest>,
) -> ApiResult<Json<Value>> {
    if body.name.trim().is_empty() {
        return Err(ApiError::InvalidRequest("name must not be empty".into()));
    }
    if body.host.trim().is_empty() {
        return Err(ApiError::InvalidRequest("host must not be empty".into()));
    }

    let record = ServerRecord::new(body.name, body.host, body.port, body.api_key);
    let inserted = state.store.insert_server(record).await?;

    Ok(Json(json!({
        "message": "Server registered.",
        "server": inserted,
    })))
}

/// DELETE /api/v1/servers/:id
pub async fn delete_server(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    state.store.delete_server(id).await?;

    Ok(Json(json!({
        "message": "Server removed.",
        "id": id,
    })))
}

/// GET /api/v1/servers/check
///
/// On-demand sweep of every server. Reconciliation and persistence
/// behave exactly like a scheduled tick; notifications are suppressed
/// and the snapshot is returned as the response body. An empty target
/// list is an explicit indication, not an error.
pub async fn check_servers(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    match state.server_monitor.check_now().await? {
        SweepReport::NoTargets => Ok(Json(json!({
            "message": "No servers found to monitor.",
            "results": [],
        }))),
        SweepReport::Rows(rows) => Ok(Json(json!({
            "message": "Server monitoring completed.",
            "results": rows,
        }))),
    }
}
