//! Transaction filter criteria and the predicate evaluating them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::models::Transaction;
use crate::time::{self, DateWindow};
use crate::types::{Category, TransactionType};

/// Value the UI sends for "no constraint"
pub const ALL: &str = "all";

/// Type constraint of a filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TypeFilter {
    #[default]
    All,
    Only(TransactionType),
}

impl From<TypeFilter> for String {
    fn from(filter: TypeFilter) -> Self {
        match filter {
            TypeFilter::All => ALL.to_string(),
            TypeFilter::Only(kind) => kind.to_string(),
        }
    }
}

impl TryFrom<String> for TypeFilter {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for TypeFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            Ok(TypeFilter::All)
        } else {
            s.parse().map(TypeFilter::Only)
        }
    }
}

/// Category constraint of a filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => ALL.to_string(),
            CategoryFilter::Only(category) => category.into(),
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(Category::from(trimmed))
        }
    }
}

/// Raw filter inputs as they arrive from a query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub keyword: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// Active constraints of the transaction list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub keyword: String,
    #[serde(rename = "type", default)]
    pub kind: TypeFilter,
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    pub fn with_type(mut self, kind: TransactionType) -> Self {
        self.kind = TypeFilter::Only(kind);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = CategoryFilter::Only(category);
        self
    }

    pub fn with_dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Build criteria from raw inputs.
    ///
    /// Unreadable dates are dropped; an unknown type is rejected.
    pub fn from_query(query: &FilterQuery) -> CoreResult<Self> {
        let kind = match query.kind.as_deref() {
            None => TypeFilter::All,
            Some(raw) => raw
                .parse()
                .map_err(|message| CoreError::ValidationError { message })?,
        };
        let category = query
            .category
            .clone()
            .map(CategoryFilter::from)
            .unwrap_or_default();

        Ok(Self {
            keyword: query.keyword.clone().unwrap_or_default(),
            kind,
            category,
            date_from: parse_bound("dateFrom", query.date_from.as_deref()),
            date_to: parse_bound("dateTo", query.date_to.as_deref()),
        })
    }

    /// Reset every constraint
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Number of constraints currently narrowing the list
    pub fn active_count(&self) -> usize {
        [
            !self.keyword.is_empty(),
            self.kind != TypeFilter::All,
            self.category != CategoryFilter::All,
            self.date_from.is_some(),
            self.date_to.is_some(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.date_from, self.date_to)
    }

    /// Whether a transaction satisfies every active constraint
    pub fn matches(&self, tx: &Transaction) -> bool {
        if !self.keyword.is_empty() {
            let needle = self.keyword.to_lowercase();
            match &tx.title {
                Some(title) if title.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }

        if let TypeFilter::Only(kind) = self.kind {
            if tx.kind != kind {
                return false;
            }
        }

        if let CategoryFilter::Only(ref category) = self.category {
            if tx.category.as_ref() != Some(category) {
                return false;
            }
        }

        let window = self.window();
        if !window.is_open() {
            // A transaction with an unreadable date is never outside the window
            if let Some(ts) = tx.timestamp() {
                if !window.contains(&ts) {
                    return false;
                }
            }
        }

        true
    }
}

fn parse_bound(field: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = time::parse_date(raw);
    if parsed.is_none() {
        log::debug!("Ignoring unreadable {} filter value '{}'", field, raw);
    }
    parsed
}

/// Transactions matching all active criteria, in their original order
pub fn filter_transactions(transactions: &[Transaction], criteria: &FilterCriteria) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| criteria.matches(tx))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scenario() -> Vec<Transaction> {
        vec![
            Transaction::new("1", TransactionType::Income, 1000.0, "2024-01-05")
                .with_title("January salary")
                .with_category(Category::Food),
            Transaction::new("2", TransactionType::Expense, 300.0, "2024-01-10")
                .with_title("Groceries")
                .with_category(Category::Food),
        ]
    }

    fn sample() -> Vec<Transaction> {
        let mut list = scenario();
        list.push(
            Transaction::new("3", TransactionType::Expense, 45.0, "2024-02-01T18:30:00")
                .with_title("Bus pass")
                .with_category(Category::Transport),
        );
        list.push(Transaction::new("4", TransactionType::Expense, 12.0, "2024-02-03"));
        list.push(
            Transaction::new("5", TransactionType::Income, 80.0, "not a date")
                .with_title("Refund")
                .with_category(Category::Other),
        );
        list
    }

    fn ids(list: &[Transaction]) -> Vec<&str> {
        list.iter().map(|tx| tx.id.as_str()).collect()
    }

    #[test]
    fn test_type_filter_scenario() {
        let list = scenario();
        let result = filter_transactions(&list, &FilterCriteria::new().with_type(TransactionType::Expense));
        assert_eq!(result, vec![list[1].clone()]);
    }

    #[test]
    fn test_date_window_scenario() {
        let list = scenario();
        let criteria = FilterCriteria::new().with_dates(Some(date(2024, 1, 6)), Some(date(2024, 1, 31)));
        assert_eq!(ids(&filter_transactions(&list, &criteria)), vec!["2"]);
    }

    #[test]
    fn test_unmatched_keyword_empties_result() {
        let list = sample();
        let criteria = FilterCriteria::new().with_keyword("zzz");
        assert!(filter_transactions(&list, &criteria).is_empty());
        let narrowed = criteria.with_type(TransactionType::Income).with_dates(Some(date(2000, 1, 1)), None);
        assert!(filter_transactions(&list, &narrowed).is_empty());
    }

    #[test]
    fn test_default_criteria_is_identity() {
        let list = sample();
        assert_eq!(filter_transactions(&list, &FilterCriteria::default()), list);
    }

    #[test]
    fn test_result_is_ordered_subset() {
        let list = sample();
        let criteria = FilterCriteria::new().with_type(TransactionType::Expense);
        let result = filter_transactions(&list, &criteria);
        assert_eq!(ids(&result), vec!["2", "3", "4"]);
        assert!(result.iter().all(|tx| list.contains(tx)));
    }

    #[test]
    fn test_filters_compose() {
        let list = sample();
        let by_type = FilterCriteria::new().with_type(TransactionType::Expense);
        let by_date = FilterCriteria::new().with_dates(Some(date(2024, 1, 6)), Some(date(2024, 2, 1)));
        let both = by_type.clone().with_dates(by_date.date_from, by_date.date_to);

        let chained = filter_transactions(&filter_transactions(&list, &by_type), &by_date);
        let reversed = filter_transactions(&filter_transactions(&list, &by_date), &by_type);
        let combined = filter_transactions(&list, &both);
        assert_eq!(chained, combined);
        assert_eq!(reversed, combined);
        assert_eq!(ids(&combined), vec!["2", "3"]);
    }

    #[test]
    fn test_keyword_is_case_insensitive_and_needs_title() {
        let list = sample();
        let result = filter_transactions(&list, &FilterCriteria::new().with_keyword("GROC"));
        assert_eq!(ids(&result), vec!["2"]);
        // id 4 has no title
        let result = filter_transactions(&list, &FilterCriteria::new().with_keyword("a"));
        assert!(!ids(&result).contains(&"4"));
    }

    #[test]
    fn test_missing_category_never_matches() {
        let list = sample();
        let result = filter_transactions(&list, &FilterCriteria::new().with_category(Category::Food));
        assert_eq!(ids(&result), vec!["1", "2"]);
    }

    #[test]
    fn test_date_to_includes_whole_day() {
        let list = sample();
        let criteria = FilterCriteria::new().with_dates(None, Some(date(2024, 2, 1)));
        let result = filter_transactions(&list, &criteria);
        assert!(ids(&result).contains(&"3"));
        assert!(!ids(&result).contains(&"4"));
    }

    #[test]
    fn test_unreadable_transaction_date_is_kept() {
        let list = sample();
        let criteria = FilterCriteria::new().with_dates(Some(date(2030, 1, 1)), None);
        assert_eq!(ids(&filter_transactions(&list, &criteria)), vec!["5"]);
    }

    #[test]
    fn test_from_query() {
        let query = FilterQuery {
            keyword: Some("bus".to_string()),
            kind: Some("expense".to_string()),
            category: Some("all".to_string()),
            date_from: Some("2024-02-01".to_string()),
            date_to: Some("31/02/2024".to_string()),
        };
        let criteria = FilterCriteria::from_query(&query).unwrap();
        assert_eq!(criteria.kind, TypeFilter::Only(TransactionType::Expense));
        assert_eq!(criteria.category, CategoryFilter::All);
        assert_eq!(criteria.date_from, Some(date(2024, 2, 1)));
        assert_eq!(criteria.date_to, None);
        assert_eq!(criteria.active_count(), 3);
    }

    #[test]
    fn test_from_query_rejects_unknown_type() {
        let query = FilterQuery {
            kind: Some("transfer".to_string()),
            ..Default::default()
        };
        let err = FilterCriteria::from_query(&query).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError { .. }));
    }

    #[test]
    fn test_clear_resets_active_count() {
        let mut criteria = FilterCriteria::new()
            .with_keyword("rent")
            .with_category(Category::Utilities)
            .with_dates(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)));
        assert_eq!(criteria.active_count(), 4);
        criteria.clear();
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_criteria_serialization() {
        let criteria = FilterCriteria::new().with_type(TransactionType::Income);
        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["type"], "INCOME");
        assert_eq!(json["category"], "all");
    }
}
