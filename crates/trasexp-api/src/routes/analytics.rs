//! Analytics routes - charts, income allocation and tax estimate

use axum::extract::{Query, State};
use axum::Json;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use trasexp_core::tax::{year_options, COUNTRIES};
use trasexp_core::{AnalyticsView, TaxQuery, TaxType, TaxView};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub account_id: Option<String>,
}

pub async fn api_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<AnalyticsView>> {
    state.require_user()?;
    let summary = state
        .backend
        .analytics_summary(query.account_id.as_deref())
        .await?;
    Ok(Json(AnalyticsView::from_summary(&summary, state.currency())))
}

#[derive(Debug, Default, Deserialize)]
pub struct TaxParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub country: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CountryOption {
    pub code: &'static str,
    pub name: &'static str,
}

/// Tax estimate with the choices offered by the form
#[derive(Debug, Serialize)]
pub struct TaxPage {
    #[serde(flatten)]
    pub view: TaxView,
    pub years: Vec<i32>,
    pub countries: Vec<CountryOption>,
}

pub async fn api_tax(
    State(state): State<AppState>,
    Query(params): Query<TaxParams>,
) -> ApiResult<Json<TaxPage>> {
    state.require_user()?;
    let current_year = chrono::Local::now().year();

    let kind = match params.kind.as_deref() {
        None | Some("") => TaxType::default(),
        Some(raw) => raw.parse().map_err(ApiError::bad_request)?,
    };
    let mut query = TaxQuery::new(kind, params.year.unwrap_or(current_year));
    if let Some(country) = params.country.filter(|c| !c.is_empty()) {
        query.country = country.to_uppercase();
    }

    let result = state.backend.tax_estimate(&query).await?;
    Ok(Json(TaxPage {
        view: TaxView::from_result(query, &result),
        years: year_options(current_year),
        countries: COUNTRIES
            .iter()
            .map(|&(code, name)| CountryOption { code, name })
            .collect(),
    }))
}
