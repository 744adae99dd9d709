//! Transactions API endpoints
//!
//! Endpoints:
//! - api_transactions: Filtered transaction list (JSON)
//! - api_create_transaction: Validate and create a transaction
//! - api_update_transaction: Validate and update a transaction
//! - api_delete_transaction: Delete a transaction
//! - api_monthly_summary: Income and expenses by category for one month

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Datelike;
use serde::Deserialize;
use trasexp_core::{
    FilterCriteria, FilterQuery, MonthlySummaryView, Transaction, TransactionDraft,
    TransactionListView,
};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Get the transactions of the selected account, narrowed by the filter
/// query (`keyword`, `type`, `category`, `dateFrom`, `dateTo`)
pub async fn api_transactions(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<Json<TransactionListView>> {
    state.require_user()?;
    let criteria = FilterCriteria::from_query(&query)?;

    let account_id = state.session.selected_account_id();
    let transactions = state.backend.list_transactions(account_id.as_deref()).await?;
    log::debug!(
        "Filtering {} transactions with {} active filter(s)",
        transactions.len(),
        criteria.active_count()
    );

    Ok(Json(TransactionListView::build(
        &transactions,
        &criteria,
        state.currency(),
    )))
}

fn validated(mut draft: TransactionDraft, state: &AppState) -> ApiResult<TransactionDraft> {
    if let Some(err) = ApiError::from_fields(draft.validate()) {
        return Err(err);
    }
    if draft.account_id.is_none() {
        draft.account_id = state.session.selected_account_id();
    }
    Ok(draft)
}

/// Create a transaction; new transactions land in the selected account
/// unless the draft names one
pub async fn api_create_transaction(
    State(state): State<AppState>,
    Json(draft): Json<TransactionDraft>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    state.require_user()?;
    let draft = validated(draft, &state)?;
    let created = state.backend.create_transaction(&draft).await?;
    log::info!("Created transaction {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn api_update_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<TransactionDraft>,
) -> ApiResult<Json<Transaction>> {
    state.require_user()?;
    let draft = validated(draft, &state)?;
    let updated = state.backend.update_transaction(&id, &draft).await?;
    log::info!("Updated transaction {}", id);
    Ok(Json(updated))
}

pub async fn api_delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.require_user()?;
    state.backend.delete_transaction(&id).await?;
    log::info!("Deleted transaction {}", id);
    Ok(Json(serde_json::json!({ "success": true, "id": id })))
}

/// Month to summarise; the current month when absent
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

pub async fn api_monthly_summary(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<MonthlySummaryView>> {
    state.require_user()?;
    let today = chrono::Local::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    if !(1..=12).contains(&month) {
        return Err(ApiError::bad_request(format!("Invalid month: {}", month)));
    }

    let summary = state.backend.monthly_summary(year, month).await?;
    Ok(Json(MonthlySummaryView::from_summary(
        &summary,
        year,
        month,
        state.currency(),
    )))
}
