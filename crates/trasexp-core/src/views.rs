//! View models for the transaction list, dashboard, monthly summary and
//! analytics pages
//!
//! Each builder takes already-fetched data and returns display strings
//! alongside the raw figures.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::aggregates::{self, Aggregates};
use crate::allocation::IncomeSourceView;
use crate::currency::{format_fixed, CurrencyCode};
use crate::filter::{filter_transactions, FilterCriteria};
use crate::models::Transaction;
use crate::reports::{AnalyticsSummary, BalancePoint, MonthlySummary};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Color hint of a summary card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Income,
    Expense,
    Positive,
    Negative,
    Info,
}

impl Tone {
    /// Tone of a net figure
    pub fn of_net(value: f64) -> Self {
        if value > 0.0 {
            Tone::Positive
        } else if value < 0.0 {
            Tone::Negative
        } else {
            Tone::Info
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCard {
    pub title: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub tone: Tone,
}

impl SummaryCard {
    fn new(title: &str, value: String, tone: Tone) -> Self {
        Self {
            title: title.to_string(),
            value,
            subtitle: None,
            tone,
        }
    }

    fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

/// One line of a transaction list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRow {
    #[serde(flatten)]
    pub transaction: Transaction,
    /// Signed and formatted, e.g. `+₦1,000.00`
    pub display_amount: String,
    pub category_label: Option<String>,
    pub date_label: String,
}

impl TransactionRow {
    pub fn new(tx: &Transaction, currency: CurrencyCode) -> Self {
        let sign = if tx.is_income() { '+' } else { '-' };
        Self {
            transaction: tx.clone(),
            display_amount: format!("{}{}", sign, currency.format(tx.amount.abs())),
            category_label: tx.category.as_ref().map(|category| category.label()),
            date_label: tx
                .date_naive()
                .map(|date| date.format("%d %b %Y").to_string())
                .unwrap_or_else(|| tx.date.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyKind {
    /// The user has no transactions at all
    NoTransactions,
    /// Transactions exist but none pass the filters
    NoMatches,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyState {
    pub kind: EmptyKind,
    pub title: &'static str,
    pub message: &'static str,
}

impl EmptyState {
    fn new(kind: EmptyKind) -> Self {
        match kind {
            EmptyKind::NoTransactions => Self {
                kind,
                title: "No transactions yet",
                message: "Add your first income or expense to get started.",
            },
            EmptyKind::NoMatches => Self {
                kind,
                title: "No transactions found",
                message: "Try adjusting your filters to see more results.",
            },
        }
    }
}

/// Transaction list page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListView {
    pub criteria: FilterCriteria,
    /// e.g. `3 of 10 transactions`
    pub header: String,
    pub total_count: usize,
    pub filtered_count: usize,
    pub active_filter_count: usize,
    pub filtered_income: f64,
    pub filtered_expenses: f64,
    pub filtered_net: f64,
    /// Empty when nothing passes the filters
    pub summary: Vec<SummaryCard>,
    pub empty_state: Option<EmptyState>,
    pub transactions: Vec<TransactionRow>,
}

impl TransactionListView {
    pub fn build(all: &[Transaction], criteria: &FilterCriteria, currency: CurrencyCode) -> Self {
        let filtered = filter_transactions(all, criteria);
        let income = aggregates::total_income(&filtered);
        let expenses = aggregates::total_expenses(&filtered);
        let net = income - expenses;

        let summary = if filtered.is_empty() {
            vec![]
        } else {
            vec![
                SummaryCard::new("Filtered Income", currency.format(income), Tone::Income),
                SummaryCard::new("Filtered Expenses", currency.format(expenses), Tone::Expense),
                SummaryCard::new("Net (Filtered)", currency.format(net), Tone::of_net(net)),
            ]
        };

        let empty_state = match (filtered.is_empty(), all.is_empty()) {
            (false, _) => None,
            (true, true) => Some(EmptyState::new(EmptyKind::NoTransactions)),
            (true, false) => Some(EmptyState::new(EmptyKind::NoMatches)),
        };

        let noun = if all.len() == 1 { "transaction" } else { "transactions" };
        Self {
            criteria: criteria.clone(),
            header: format!("{} of {} {}", filtered.len(), all.len(), noun),
            total_count: all.len(),
            filtered_count: filtered.len(),
            active_filter_count: criteria.active_count(),
            filtered_income: income,
            filtered_expenses: expenses,
            filtered_net: net,
            summary,
            empty_state,
            transactions: filtered.iter().map(|tx| TransactionRow::new(tx, currency)).collect(),
        }
    }
}

/// Dashboard page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub aggregates: Aggregates,
    pub cards: Vec<SummaryCard>,
    pub recent: Vec<TransactionRow>,
    /// True when the user has no transactions at all
    pub is_empty: bool,
}

impl DashboardView {
    pub fn build(all: &[Transaction], today: NaiveDate, currency: CurrencyCode, recent_count: usize) -> Self {
        let aggregates = Aggregates::compute(all, today.month(), today.year());
        let cards = vec![
            SummaryCard::new("Total Income", currency.format(aggregates.total_income), Tone::Income),
            SummaryCard::new("Total Expenses", currency.format(aggregates.total_expenses), Tone::Expense),
            SummaryCard::new(
                "Net Balance",
                currency.format(aggregates.net_balance),
                Tone::of_net(aggregates.net_balance),
            ),
            SummaryCard::new("Total Transactions", aggregates.transaction_count.to_string(), Tone::Info)
                .with_subtitle("All time"),
            SummaryCard::new(
                "This Month",
                currency.format(aggregates.monthly_total),
                Tone::of_net(aggregates.monthly_total),
            )
            .with_subtitle(plural(aggregates.monthly_count, "transaction")),
            SummaryCard::new(
                "Average Transaction",
                currency.format(aggregates.average_transaction),
                Tone::Info,
            )
            .with_subtitle("Per transaction"),
            SummaryCard::new(
                "Unallocated Income",
                currency.format(aggregates.unallocated_income),
                Tone::Income,
            ),
        ];

        let recent = aggregates::recent_transactions(all, recent_count)
            .iter()
            .map(|tx| TransactionRow::new(tx, currency))
            .collect();

        Self {
            aggregates,
            cards,
            recent,
            is_empty: all.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    /// e.g. `+12.00`, absent when there was no income
    pub income: Option<String>,
    /// e.g. `-3.50`, absent when there was no expense
    pub expense: Option<String>,
}

/// Monthly summary page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummaryView {
    pub year: i32,
    pub month: u32,
    pub month_label: String,
    pub has_data: bool,
    pub cards: Vec<SummaryCard>,
    pub categories: Vec<CategoryRow>,
}

impl MonthlySummaryView {
    pub fn from_summary(summary: &MonthlySummary, year: i32, month: u32, currency: CurrencyCode) -> Self {
        let month_label = month
            .checked_sub(1)
            .and_then(|index| MONTH_NAMES.get(index as usize))
            .map(|name| format!("{} {}", name, year))
            .unwrap_or_else(|| year.to_string());

        let has_data = summary.has_data();
        let cards = if has_data {
            vec![
                SummaryCard::new("Total Income", currency.format(summary.total_income), Tone::Income),
                SummaryCard::new("Total Expenses", currency.format(summary.total_expenses), Tone::Expense),
            ]
        } else {
            vec![]
        };

        let categories = summary
            .categories
            .iter()
            .map(|(category, amounts)| CategoryRow {
                category: category.clone(),
                income: (amounts.income > 0.0).then(|| format!("+{}", format_fixed(amounts.income))),
                expense: (amounts.expense > 0.0).then(|| format!("-{}", format_fixed(amounts.expense))),
            })
            .collect();

        Self {
            year,
            month,
            month_label,
            has_data,
            cards,
            categories,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySliceView {
    pub category: String,
    pub label: String,
    pub amount: f64,
    pub display_amount: String,
}

/// Analytics page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    pub has_data: bool,
    pub categories: Vec<CategorySliceView>,
    pub trends: Vec<crate::reports::MonthlyTrend>,
    pub balance: Vec<BalancePoint>,
    pub income_sources: Vec<IncomeSourceView>,
}

impl AnalyticsView {
    pub fn from_summary(summary: &AnalyticsSummary, currency: CurrencyCode) -> Self {
        Self {
            has_data: summary.has_data(),
            categories: summary
                .category_breakdown
                .iter()
                .map(|slice| CategorySliceView {
                    category: slice.category.clone(),
                    label: slice.label(),
                    amount: slice.amount,
                    display_amount: currency.format(slice.amount),
                })
                .collect(),
            trends: summary.monthly_trends.clone(),
            balance: summary.balance_series(),
            income_sources: summary
                .income_sources
                .iter()
                .map(|source| IncomeSourceView::new(source, currency))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{CategoryAmounts, CategorySlice, MonthlyTrend};
    use crate::types::{Category, TransactionType};

    fn list() -> Vec<Transaction> {
        vec![
            Transaction::new("1", TransactionType::Income, 1000.0, "2024-01-05")
                .with_title("Salary")
                .with_category(Category::Salary)
                .with_remaining_balance(400.0),
            Transaction::new("2", TransactionType::Expense, 300.0, "2024-01-10")
                .with_title("Groceries")
                .with_category(Category::Food),
            Transaction::new("3", TransactionType::Expense, 50.0, "2023-12-28").with_title("Taxi"),
        ]
    }

    #[test]
    fn test_list_view_counts_and_summary() {
        let criteria = FilterCriteria::new().with_type(TransactionType::Expense);
        let view = TransactionListView::build(&list(), &criteria, CurrencyCode::Ngn);
        assert_eq!(view.header, "2 of 3 transactions");
        assert_eq!(view.active_filter_count, 1);
        assert_eq!(view.filtered_expenses, 350.0);
        assert_eq!(view.summary[1].value, "₦350.00");
        assert_eq!(view.summary[2].value, "-₦350.00");
        assert_eq!(view.summary[2].tone, Tone::Negative);
        assert!(view.empty_state.is_none());
        assert_eq!(view.transactions[0].display_amount, "-₦300.00");
    }

    #[test]
    fn test_list_view_no_matches() {
        let criteria = FilterCriteria::new().with_keyword("zzz");
        let view = TransactionListView::build(&list(), &criteria, CurrencyCode::Usd);
        assert!(view.summary.is_empty());
        assert_eq!(view.empty_state.unwrap().kind, EmptyKind::NoMatches);
        assert_eq!(view.header, "0 of 3 transactions");
    }

    #[test]
    fn test_list_view_no_transactions() {
        let view = TransactionListView::build(&[], &FilterCriteria::default(), CurrencyCode::Usd);
        let empty = view.empty_state.unwrap();
        assert_eq!(empty.kind, EmptyKind::NoTransactions);
        assert_eq!(empty.title, "No transactions yet");
    }

    #[test]
    fn test_single_transaction_header() {
        let one = vec![list().remove(0)];
        let view = TransactionListView::build(&one, &FilterCriteria::default(), CurrencyCode::Ngn);
        assert_eq!(view.header, "1 of 1 transaction");
        assert_eq!(view.summary[2].tone, Tone::Positive);
    }

    #[test]
    fn test_dashboard_view() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let view = DashboardView::build(&list(), today, CurrencyCode::Ngn, 2);
        assert_eq!(view.aggregates.net_balance, 650.0);
        assert_eq!(view.aggregates.monthly_total, 700.0);
        assert_eq!(view.cards[3].value, "3");
        assert_eq!(view.cards[4].subtitle.as_deref(), Some("2 transactions"));
        assert_eq!(view.cards[5].value, "₦450.00");
        assert_eq!(view.cards[6].value, "₦400.00");
        let recent: Vec<&str> = view.recent.iter().map(|row| row.transaction.id.as_str()).collect();
        assert_eq!(recent, vec!["2", "1"]);
        assert!(!view.is_empty);
    }

    #[test]
    fn test_empty_dashboard() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let view = DashboardView::build(&[], today, CurrencyCode::Usd, 5);
        assert!(view.is_empty);
        assert_eq!(view.cards[5].value, "$0.00");
        assert_eq!(view.cards[4].subtitle.as_deref(), Some("0 transactions"));
    }

    #[test]
    fn test_monthly_summary_view() {
        let mut summary = MonthlySummary {
            total_income: 500.0,
            total_expenses: 3.5,
            ..Default::default()
        };
        summary.categories.insert("FOOD".to_string(), CategoryAmounts { income: 0.0, expense: 3.5 });
        summary.categories.insert("SALARY".to_string(), CategoryAmounts { income: 500.0, expense: 0.0 });

        let view = MonthlySummaryView::from_summary(&summary, 2024, 2, CurrencyCode::Ngn);
        assert_eq!(view.month_label, "February 2024");
        assert!(view.has_data);
        assert_eq!(view.categories[0].expense.as_deref(), Some("-3.50"));
        assert_eq!(view.categories[0].income, None);
        assert_eq!(view.categories[1].income.as_deref(), Some("+500.00"));
    }

    #[test]
    fn test_empty_monthly_summary_view() {
        let view = MonthlySummaryView::from_summary(&MonthlySummary::default(), 2024, 13, CurrencyCode::Ngn);
        assert!(!view.has_data);
        assert!(view.cards.is_empty());
        assert_eq!(view.month_label, "2024");
    }

    #[test]
    fn test_analytics_view() {
        let summary = AnalyticsSummary {
            category_breakdown: vec![CategorySlice { category: "TRANSPORT".to_string(), amount: 45.0 }],
            monthly_trends: vec![MonthlyTrend { month: "Jan".to_string(), income: 10.0, expense: 4.0 }],
            ..Default::default()
        };
        let view = AnalyticsView::from_summary(&summary, CurrencyCode::Gbp);
        assert!(view.has_data);
        assert_eq!(view.categories[0].label, "Transport");
        assert_eq!(view.categories[0].display_amount, "£45.00");
        assert_eq!(view.balance[0].balance, 6.0);
    }

    #[test]
    fn test_row_serializes_transaction_fields() {
        let row = TransactionRow::new(&list()[0], CurrencyCode::Ngn);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["type"], "INCOME");
        assert_eq!(json["displayAmount"], "+₦1,000.00");
        assert_eq!(json["dateLabel"], "05 Jan 2024");
        assert_eq!(json["categoryLabel"], "Salary");
    }
}
