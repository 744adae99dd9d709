//! Transaction routes
//!
//! Features:
//! - Filtered list with summary cards, scoped to the selected account
//! - Create, update and delete with form validation
//! - Monthly summary by category

pub mod api;

pub use api::{
    api_create_transaction, api_delete_transaction, api_monthly_summary, api_transactions,
    api_update_transaction, MonthQuery,
};
