//! Tax estimate query and display
//!
//! The estimate itself is computed by the backend; this module only builds
//! the query and turns the result into labelled strings.

use serde::{Deserialize, Serialize};
use trasexp_utils::humanize_key;

use crate::currency::{format_percentage, CurrencyCode};
use crate::reports::TaxResult;

/// Countries the backend can estimate for
pub const COUNTRIES: [(&str, &str); 1] = [("NG", "Nigeria")];

/// Number of years offered, counting the current one
const YEAR_OPTION_COUNT: i32 = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaxType {
    /// Personal income tax
    #[default]
    Pit,
    /// Company income tax
    Cit,
    /// Value added tax
    Vat,
}

impl TaxType {
    pub fn label(&self) -> &'static str {
        match self {
            TaxType::Pit => "Personal Income Tax (PIT)",
            TaxType::Cit => "Company Income Tax (CIT)",
            TaxType::Vat => "Value Added Tax (VAT)",
        }
    }

    /// Label of the taxable-amount card
    pub fn taxable_label(&self) -> &'static str {
        match self {
            TaxType::Cit => "Taxable Profit",
            _ => "Taxable Income",
        }
    }
}

impl std::str::FromStr for TaxType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PIT" => Ok(TaxType::Pit),
            "CIT" => Ok(TaxType::Cit),
            "VAT" => Ok(TaxType::Vat),
            _ => Err(format!("Invalid tax type: {}", s)),
        }
    }
}

impl std::fmt::Display for TaxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxType::Pit => write!(f, "PIT"),
            TaxType::Cit => write!(f, "CIT"),
            TaxType::Vat => write!(f, "VAT"),
        }
    }
}

/// Parameters of a tax estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxQuery {
    #[serde(rename = "type", default)]
    pub kind: TaxType,
    #[serde(default = "default_country")]
    pub country: String,
    pub year: i32,
}

fn default_country() -> String {
    "NG".to_string()
}

impl TaxQuery {
    pub fn new(kind: TaxType, year: i32) -> Self {
        Self {
            kind,
            country: default_country(),
            year,
        }
    }
}

/// Current year first, then the five before it
pub fn year_options(current_year: i32) -> Vec<i32> {
    (0..YEAR_OPTION_COUNT).map(|offset| current_year - offset).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledValue {
    pub label: String,
    pub value: String,
}

impl LabelledValue {
    fn new(label: impl Into<String>, value: String) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Tax estimate ready for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxView {
    pub query: TaxQuery,
    /// False when there was no income in the year
    pub has_data: bool,
    pub message: Option<String>,
    pub cards: Vec<LabelledValue>,
    pub breakdown: Vec<LabelledValue>,
}

impl TaxView {
    pub fn from_result(query: TaxQuery, result: &TaxResult) -> Self {
        let naira = CurrencyCode::Ngn;
        if result.income <= 0.0 {
            let message = format!("No transaction data available for {}", query.year);
            return Self {
                query,
                has_data: false,
                message: Some(message),
                cards: vec![],
                breakdown: vec![],
            };
        }

        let cards = vec![
            LabelledValue::new("Total Income", naira.format(result.income)),
            LabelledValue::new("Deductions/Expenses", naira.format(result.expenses)),
            LabelledValue::new(query.kind.taxable_label(), naira.format(result.taxable_income)),
            LabelledValue::new("Annual Tax", naira.format(result.annual_tax)),
            LabelledValue::new("Monthly Tax", naira.format(result.monthly_tax)),
            LabelledValue::new("Effective Rate", format_percentage(result.effective_rate)),
        ];

        let breakdown = result
            .breakdown
            .iter()
            .map(|(key, value)| LabelledValue::new(humanize_key(key), breakdown_value(value, naira)))
            .collect();

        Self {
            query,
            has_data: true,
            message: None,
            cards,
            breakdown,
        }
    }
}

fn breakdown_value(value: &serde_json::Value, currency: CurrencyCode) -> String {
    use serde_json::Value;
    match value {
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Number(n) => currency.format(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) if !s.trim().is_empty() => currency.format(n),
            _ => s.clone(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
