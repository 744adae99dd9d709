//! Dashboard route - summary cards and recent transactions

use axum::extract::State;
use axum::Json;
use trasexp_core::DashboardView;

use crate::error::ApiResult;
use crate::AppState;

/// Dashboard over every transaction of the user, whatever account is selected
pub async fn api_dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardView>> {
    state.require_user()?;
    let transactions = state.backend.list_transactions(None).await?;
    let today = chrono::Local::now().date_naive();

    Ok(Json(DashboardView::build(
        &transactions,
        today,
        state.currency(),
        state.config.dashboard.recent_count,
    )))
}
