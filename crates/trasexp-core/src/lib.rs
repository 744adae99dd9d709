//! Core client logic for trasexp
//!
//! Domain models, the transaction filter, summary figures, money
//! formatting, session state and the view models built from them.

pub mod accounts;
pub mod aggregates;
pub mod allocation;
pub mod currency;
pub mod error;
pub mod filter;
pub mod models;
pub mod reports;
pub mod session;
pub mod store;
pub mod tax;
pub mod theme;
pub mod time;
pub mod types;
pub mod views;

pub use accounts::{AccountOption, AccountSelection};
pub use aggregates::Aggregates;
pub use currency::{currency_symbol, format_currency, format_percentage, CurrencyCode};
pub use error::{
    CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails, ErrorLogger,
    ErrorSeverity, FieldErrors,
};
pub use filter::{filter_transactions, FilterCriteria, FilterQuery};
pub use models::*;
pub use reports::*;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionHandle, SessionStore};
pub use store::{Store, SubscriptionId};
pub use tax::{TaxQuery, TaxType, TaxView};
pub use theme::{AppliedTheme, ThemeState};
pub use types::{AccountKind, Category, TransactionType};
pub use views::{AnalyticsView, DashboardView, MonthlySummaryView, TransactionListView};

pub use trasexp_config::ThemeMode;
