//! The operations the finance backend offers

use async_trait::async_trait;
use trasexp_core::{
    Account, AccountDraft, ActiveSession, AnalyticsSummary, AuthResponse, Category, Credentials,
    LoginRecord, MonthlySummary, NotificationPreferences, PasswordChange, Preferences,
    ProfileUpdate, Registration, TaxQuery, TaxResult, Transaction, TransactionDraft, UserProfile,
};

use crate::error::ClientResult;

/// Finance REST backend.
///
/// Calls scoped to a user read the user id from the session and fail with
/// `NotAuthenticated` before any request when nobody is signed in.
#[async_trait]
pub trait FinanceBackend: Send + Sync {
    // ==================== Auth ====================

    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthResponse>;
    async fn register(&self, registration: &Registration) -> ClientResult<AuthResponse>;

    // ==================== Accounts ====================

    async fn list_accounts(&self) -> ClientResult<Vec<Account>>;
    async fn create_account(&self, draft: &AccountDraft) -> ClientResult<Account>;
    async fn update_account(&self, id: &str, draft: &AccountDraft) -> ClientResult<Account>;
    async fn delete_account(&self, id: &str) -> ClientResult<()>;
    /// Whether the PIN unlocks the account
    async fn verify_account_pin(&self, id: &str, pin: &str) -> ClientResult<bool>;

    // ==================== Transactions ====================

    /// All transactions, or those of one account
    async fn list_transactions(&self, account_id: Option<&str>) -> ClientResult<Vec<Transaction>>;
    async fn get_transaction(&self, id: &str) -> ClientResult<Transaction>;
    async fn create_transaction(&self, draft: &TransactionDraft) -> ClientResult<Transaction>;
    async fn update_transaction(&self, id: &str, draft: &TransactionDraft) -> ClientResult<Transaction>;
    async fn delete_transaction(&self, id: &str) -> ClientResult<()>;
    async fn monthly_summary(&self, year: i32, month: u32) -> ClientResult<MonthlySummary>;
    async fn transactions_by_category(&self, category: &Category) -> ClientResult<Vec<Transaction>>;

    // ==================== Analytics ====================

    async fn analytics_summary(&self, account_id: Option<&str>) -> ClientResult<AnalyticsSummary>;
    async fn tax_estimate(&self, query: &TaxQuery) -> ClientResult<TaxResult>;

    // ==================== Settings ====================

    async fn preferences(&self) -> ClientResult<Preferences>;
    async fn update_preferences(&self, preferences: &Preferences) -> ClientResult<Preferences>;
    async fn notifications(&self) -> ClientResult<NotificationPreferences>;
    async fn update_notifications(
        &self,
        notifications: &NotificationPreferences,
    ) -> ClientResult<NotificationPreferences>;

    // ==================== Security ====================

    async fn active_sessions(&self) -> ClientResult<Vec<ActiveSession>>;
    async fn terminate_session(&self, id: &str) -> ClientResult<()>;
    async fn login_history(&self, limit: usize) -> ClientResult<Vec<LoginRecord>>;

    // ==================== User ====================

    async fn profile(&self) -> ClientResult<UserProfile>;
    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<UserProfile>;
    async fn change_password(&self, change: &PasswordChange) -> ClientResult<()>;
    async fn deactivate_user(&self, password: &str) -> ClientResult<()>;
    async fn delete_user(&self, password: &str) -> ClientResult<()>;
}
