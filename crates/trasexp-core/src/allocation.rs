//! How much of each income has been spent by the expenses it funds

use serde::Serialize;

use crate::currency::CurrencyCode;
use crate::reports::IncomeSource;

/// Allocation status of an income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AllocationStatus {
    FullySpent,
    PartiallyAllocated,
    Unallocated,
}

impl AllocationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AllocationStatus::FullySpent => "Fully spent",
            AllocationStatus::PartiallyAllocated => "Partially allocated",
            AllocationStatus::Unallocated => "Unallocated",
        }
    }
}

impl IncomeSource {
    pub fn is_fully_allocated(&self) -> bool {
        self.remaining_balance <= 0.0
    }

    pub fn is_partially_allocated(&self) -> bool {
        self.percentage_allocated > 0.0 && !self.is_fully_allocated()
    }

    pub fn status(&self) -> AllocationStatus {
        if self.is_fully_allocated() {
            AllocationStatus::FullySpent
        } else if self.is_partially_allocated() {
            AllocationStatus::PartiallyAllocated
        } else {
            AllocationStatus::Unallocated
        }
    }

    /// Width of the progress bar in percent
    pub fn progress_width(&self) -> f64 {
        if self.percentage_allocated.is_finite() {
            self.percentage_allocated.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

/// Display row for one income source
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSourceView {
    pub id: String,
    pub title: String,
    pub total: String,
    pub remaining: String,
    pub allocated: String,
    /// One decimal, e.g. `42.5%`
    pub percentage: String,
    pub progress_width: f64,
    pub status: AllocationStatus,
    pub status_label: &'static str,
}

impl IncomeSourceView {
    pub fn new(source: &IncomeSource, currency: CurrencyCode) -> Self {
        let percentage = if source.percentage_allocated.is_finite() {
            source.percentage_allocated
        } else {
            0.0
        };
        let status = source.status();
        Self {
            id: source.id.clone(),
            title: source.title.clone(),
            total: currency.format(source.amount),
            remaining: currency.format(source.remaining_balance),
            allocated: currency.format(source.allocated_amount),
            percentage: format!("{:.1}%", percentage),
            progress_width: source.progress_width(),
            status,
            status_label: status.label(),
        }
    }
}
