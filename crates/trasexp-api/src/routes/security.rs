//! Security routes - active sessions and recent sign-ins

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use trasexp_core::{ActiveSession, LoginRecord};

use crate::error::ApiResult;
use crate::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 5;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityOverview {
    pub sessions: Vec<ActiveSession>,
    pub login_history: Vec<LoginRecord>,
}

pub async fn api_security(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<SecurityOverview>> {
    state.require_user()?;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let (sessions, login_history) = tokio::join!(
        state.backend.active_sessions(),
        state.backend.login_history(limit)
    );
    Ok(Json(SecurityOverview {
        sessions: sessions?,
        login_history: login_history?,
    }))
}

pub async fn api_terminate_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.require_user()?;
    state.backend.terminate_session(&id).await?;
    log::info!("Terminated session {}", id);
    Ok(Json(serde_json::json!({ "success": true, "id": id })))
}
