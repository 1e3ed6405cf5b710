//! Website target endpoints

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
use crate::store::WebsiteRecord;

/// Request body for registering a website
#[derive(Debug, Deserialize)]
pub struct AddWebsiteRequest {
    pub url: String,
    pub display: Option<String>,
}

/// GET /api/v1/websites
pub async fn list_websites(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    let websites = state.store.list_websites().await?;

    Ok(Json(json!({
        "count": websites.len(),
        "websites": websites,
    })))
}

/// POST /api/v1/websites
pub async fn add_website(
    State(state): State<ApiState>,
    Json(body): Json<AddWebsiteRequest>,
) -> ApiResult<Json<Value>> {
    if !body.url.starts_with("http://") && !body.url.starts_with("https://") {
        return Err(ApiError::InvalidRequest(
            "url must start with http:// or https://".into(),
        ));
    }

    let record = WebsiteRecord::new(body.url, body.display);
    let inserted = state.store.insert_website(record).await?;

    Ok(Json(json!({
        "message": "Website registered.",
        "website": inserted,
    })))
}

/// DELETE /api/v1/websites/:id
pub async fn delete_website(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    state.store.delete_website(id).await?;

    Ok(Json(json!({
        "message": "Website removed.",
        "id": id,
    })))
}

/// GET /api/v1/websites/check
///
/// On-demand sweep of every website; same semantics as the server
/// variant.
pub async fn check_websites(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    match state.website_monitor.check_now().await? {
        SweepReport::NoTargets => Ok(Json(json!({
            "message": "No websites found to monitor.",
            "results": [],
        }))),
        SweepReport::Rows(rows) => Ok(Json(json!({
            "message": "Website monitoring completed.",
            "results": rows,
        }))),
    }
}
