//! Summary figures over a set of transactions
//!
//! Every function here is total: an empty slice yields zero and nothing
//! divides by the transaction count without checking it first.

use serde::Serialize;

use crate::models::Transaction;
use crate::time::in_month;

/// Sum of income amounts
pub fn total_income(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|tx| tx.is_income())
        .map(|tx| tx.amount)
        .sum()
}

/// Absolute sum of expense amounts, whichever sign the backend used
pub fn total_expenses(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|tx| tx.is_expense())
        .map(|tx| tx.amount)
        .sum::<f64>()
        .abs()
}

pub fn net_balance(transactions: &[Transaction]) -> f64 {
    total_income(transactions) - total_expenses(transactions)
}

fn in_period<'a>(
    transactions: &'a [Transaction],
    month: u32,
    year: i32,
) -> impl Iterator<Item = &'a Transaction> {
    transactions.iter().filter(move |tx| {
        tx.date_naive()
            .map(|date| in_month(date, month, year))
            .unwrap_or(false)
    })
}

/// Net of one calendar month: income added, expenses subtracted
pub fn monthly_total(transactions: &[Transaction], month: u32, year: i32) -> f64 {
    in_period(transactions, month, year)
        .map(|tx| tx.signed_amount())
        .sum()
}

/// Number of transactions dated in one calendar month
pub fn monthly_count(transactions: &[Transaction], month: u32, year: i32) -> usize {
    in_period(transactions, month, year).count()
}

/// Mean absolute transaction size, zero for an empty list
pub fn average_transaction(transactions: &[Transaction]) -> f64 {
    if transactions.is_empty() {
        return 0.0;
    }
    (total_income(transactions) + total_expenses(transactions)) / transactions.len() as f64
}

/// Income not yet spent by funded expenses
pub fn unallocated_income(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|tx| tx.is_income())
        .filter_map(|tx| tx.remaining_balance)
        .sum()
}

/// The `count` newest transactions, newest first.
///
/// Ties keep their input order; unreadable dates sort last.
pub fn recent_transactions(transactions: &[Transaction], count: usize) -> Vec<Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    sorted.into_iter().take(count).cloned().collect()
}

/// Snapshot of every aggregate for one transaction set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
    pub monthly_total: f64,
    pub monthly_count: usize,
    pub average_transaction: f64,
    pub unallocated_income: f64,
    pub transaction_count: usize,
}

impl Aggregates {
    pub fn compute(transactions: &[Transaction], month: u32, year: i32) -> Self {
        let total_income = total_income(transactions);
        let total_expenses = total_expenses(transactions);
        Self {
            total_income,
            total_expenses,
            net_balance: total_income - total_expenses,
            monthly_total: monthly_total(transactions, month, year),
            monthly_count: monthly_count(transactions, month, year),
            average_transaction: average_transaction(transactions),
            unallocated_income: unallocated_income(transactions),
            transaction_count: transactions.len(),
        }
    }
}
