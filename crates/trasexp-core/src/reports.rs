//! Report DTOs produced by the backend's analytics endpoints

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::models::de_id;
use crate::types::Category;

/// Amounts in reports may be serialised as numbers or numeric strings
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
    Null(()),
}

pub(crate) fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) => n,
        RawAmount::Text(s) => s.trim().parse().unwrap_or(0.0),
        RawAmount::Null(()) => 0.0,
    })
}

/// Spending per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub category: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount: f64,
}

impl CategorySlice {
    /// Chart label, e.g. `FOOD` becomes `Food`
    pub fn label(&self) -> String {
        let mut chars = self.category.chars();
        match chars.next() {
            Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
            None => String::new(),
        }
    }

    pub fn category(&self) -> Category {
        Category::from(self.category.as_str())
    }
}

/// Income and expense totals for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub month: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub income: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub expense: f64,
}

/// Point on the running-balance chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancePoint {
    pub month: String,
    pub balance: f64,
}

/// Allocation state of one income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSource {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub remaining_balance: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub allocated_amount: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub percentage_allocated: f64,
}

/// Payload of `/analytics/summary`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub category_breakdown: Vec<CategorySlice>,
    #[serde(default)]
    pub monthly_trends: Vec<MonthlyTrend>,
    #[serde(default)]
    pub income_sources: Vec<IncomeSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_expenses: Option<f64>,
}

impl AnalyticsSummary {
    pub fn has_data(&self) -> bool {
        !self.category_breakdown.is_empty() || !self.monthly_trends.is_empty()
    }

    /// Cumulative income minus expense, month by month
    pub fn balance_series(&self) -> Vec<BalancePoint> {
        let mut running = 0.0;
        self.monthly_trends
            .iter()
            .map(|trend| {
                running += trend.income - trend.expense;
                BalancePoint {
                    month: trend.month.clone(),
                    balance: running,
                }
            })
            .collect()
    }
}

/// Income and expense within one category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmounts {
    #[serde(default, deserialize_with = "de_amount")]
    pub income: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub expense: f64,
}

/// Payload of `/transactions/monthly`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    #[serde(default, deserialize_with = "de_amount")]
    pub total_income: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_expenses: f64,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryAmounts>,
}

impl MonthlySummary {
    pub fn has_data(&self) -> bool {
        self.total_income > 0.0 || self.total_expenses > 0.0 || !self.categories.is_empty()
    }

    pub fn net(&self) -> f64 {
        self.total_income - self.total_expenses
    }
}

/// Payload of `/analytics/tax`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResult {
    #[serde(default, deserialize_with = "de_amount")]
    pub income: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub expenses: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub taxable_income: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub annual_tax: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub monthly_tax: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub effective_rate: f64,
    #[serde(default)]
    pub breakdown: serde_json::Map<String, serde_json::Value>,
}
