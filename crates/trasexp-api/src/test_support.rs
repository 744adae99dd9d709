//! In-memory backend and request helpers for router tests

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use trasexp_client::{ClientError, ClientResult, FinanceBackend};
use trasexp_config::Config;
use trasexp_core::{
    Account, AccountDraft, AccountKind, ActiveSession, AnalyticsSummary, AuthResponse, Category,
    CategorySlice, Credentials, IncomeSource, LoginRecord, MonthlySummary, MonthlyTrend,
    NotificationPreferences, PasswordChange, Preferences, ProfileUpdate, Registration,
    SessionHandle, TaxQuery, TaxResult, Transaction, TransactionDraft, TransactionType,
    UserProfile,
};

use crate::{create_router, AppState};

pub const WALLET_PIN: &str = "1234";

#[derive(Default)]
pub struct FakeData {
    pub transactions: Vec<Transaction>,
    pub accounts: Vec<Account>,
    pub preferences: Preferences,
    pub notifications: NotificationPreferences,
    pub sessions: Vec<ActiveSession>,
    pub history: Vec<LoginRecord>,
    pub profile: UserProfile,
    /// Account filter of the last transaction listing
    pub last_account_filter: Option<Option<String>>,
    pub last_tax_query: Option<TaxQuery>,
    pub history_limit: Option<usize>,
    pub next_id: u64,
}

#[derive(Default)]
pub struct FakeBackend {
    pub data: Mutex<FakeData>,
    pub offline: AtomicBool,
}

fn account(id: &str, name: &str, kind: AccountKind, balance: f64, pin_required: bool) -> Account {
    Account {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        description: None,
        currency: Some("NGN".to_string()),
        balance,
        is_default: id == "1",
        pin_required,
        include_in_overall: true,
    }
}

fn transaction(id: &str, kind: TransactionType, amount: f64, date: &str, title: &str, category: Category, account: &str) -> Transaction {
    let mut tx = Transaction::new(id, kind, amount, date)
        .with_title(title)
        .with_category(category);
    tx.account_id = Some(account.to_string());
    tx
}

impl FakeBackend {
    pub fn with_sample_data() -> Self {
        let data = FakeData {
            transactions: vec![
                transaction("1", TransactionType::Income, 5000.0, "2024-03-01", "March salary", Category::Salary, "1"),
                transaction("2", TransactionType::Expense, 1200.0, "2024-03-05", "Groceries", Category::Food, "1"),
                transaction("3", TransactionType::Expense, 300.0, "2024-02-20", "Bus fare", Category::Transport, "2"),
            ],
            accounts: vec![
                account("1", "Main", AccountKind::Savings, 3800.0, false),
                account("2", "Wallet", AccountKind::Wallet, 700.0, true),
            ],
            sessions: vec![ActiveSession {
                id: "s1".to_string(),
                device: Some("Firefox on Linux".to_string()),
                user_agent: None,
                location: None,
                ip_address: Some("10.0.0.2".to_string()),
                last_accessed_at: None,
                is_current: true,
            }],
            history: vec![LoginRecord {
                id: "h1".to_string(),
                login_time: Some("2024-03-01T09:00:00".to_string()),
                device: None,
                ip_address: None,
                success: true,
            }],
            profile: UserProfile {
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                ..Default::default()
            },
            next_id: 100,
            ..Default::default()
        };
        Self {
            data: Mutex::new(data),
            offline: AtomicBool::new(false),
        }
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn data(&self) -> std::sync::MutexGuard<'_, FakeData> {
        self.data.lock().unwrap()
    }

    fn reachable(&self) -> ClientResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(ClientError::Network {
                detail: "connection refused".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn next_id(&self) -> String {
        let mut data = self.data();
        data.next_id += 1;
        data.next_id.to_string()
    }
}

fn auth_response(email: &str) -> AuthResponse {
    AuthResponse {
        token: Some("tok-1".to_string()),
        user_id: "1".to_string(),
        email: email.to_string(),
        username: "ada".to_string(),
    }
}

fn draft_to_transaction(id: String, draft: &TransactionDraft) -> Transaction {
    let mut tx = Transaction::new(id, draft.kind, draft.amount.unwrap_or_default(), draft.date.clone())
        .with_title(draft.title.clone());
    tx.category = draft.category.clone();
    tx.account_id = draft.account_id.clone();
    tx
}

fn draft_to_account(id: String, draft: &AccountDraft) -> Account {
    Account {
        id,
        name: draft.name.clone(),
        kind: draft.kind.clone(),
        description: draft.description.clone(),
        currency: draft.currency.clone(),
        balance: 0.0,
        is_default: draft.is_default,
        pin_required: draft.pin_required,
        include_in_overall: draft.include_in_overall,
    }
}

fn not_found(what: &str) -> ClientError {
    ClientError::NotFound {
        message: format!("{} not found", what),
    }
}

#[async_trait]
impl FinanceBackend for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthResponse> {
        self.reachable()?;
        if credentials.password == "secret" {
            Ok(auth_response(&credentials.email))
        } else {
            Err(ClientError::from_status(401, r#"{"message":"Invalid credentials"}"#))
        }
    }

    async fn register(&self, registration: &Registration) -> ClientResult<AuthResponse> {
        self.reachable()?;
        Ok(auth_response(&registration.email))
    }

    async fn list_accounts(&self) -> ClientResult<Vec<Account>> {
        self.reachable()?;
        Ok(self.data().accounts.clone())
    }

    async fn create_account(&self, draft: &AccountDraft) -> ClientResult<Account> {
        self.reachable()?;
        let account = draft_to_account(self.next_id(), draft);
        self.data().accounts.push(account.clone());
        Ok(account)
    }

    async fn update_account(&self, id: &str, draft: &AccountDraft) -> ClientResult<Account> {
        self.reachable()?;
        let mut data = self.data();
        let slot = data
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found("Account"))?;
        let balance = slot.balance;
        *slot = draft_to_account(id.to_string(), draft);
        slot.balance = balance;
        Ok(slot.clone())
    }

    async fn delete_account(&self, id: &str) -> ClientResult<()> {
        self.reachable()?;
        let mut data = self.data();
        let before = data.accounts.len();
        data.accounts.retain(|a| a.id != id);
        if data.accounts.len() == before {
            return Err(not_found("Account"));
        }
        Ok(())
    }

    async fn verify_account_pin(&self, id: &str, pin: &str) -> ClientResult<bool> {
        self.reachable()?;
        if !self.data().accounts.iter().any(|a| a.id == id) {
            return Err(not_found("Account"));
        }
        Ok(pin == WALLET_PIN)
    }

    async fn list_transactions(&self, account_id: Option<&str>) -> ClientResult<Vec<Transaction>> {
        self.reachable()?;
        let mut data = self.data();
        data.last_account_filter = Some(account_id.map(str::to_string));
        Ok(data
            .transactions
            .iter()
            .filter(|tx| account_id.is_none() || tx.account_id.as_deref() == account_id)
            .cloned()
            .collect())
    }

    async fn get_transaction(&self, id: &str) -> ClientResult<Transaction> {
        self.reachable()?;
        self.data()
            .transactions
            .iter()
            .find(|tx| tx.id == id)
            .cloned()
            .ok_or_else(|| not_found("Transaction"))
    }

    async fn create_transaction(&self, draft: &TransactionDraft) -> ClientResult<Transaction> {
        self.reachable()?;
        let tx = draft_to_transaction(self.next_id(), draft);
        self.data().transactions.push(tx.clone());
        Ok(tx)
    }

    async fn update_transaction(&self, id: &str, draft: &TransactionDraft) -> ClientResult<Transaction> {
        self.reachable()?;
        let mut data = self.data();
        let slot = data
            .transactions
            .iter_mut()
            .find(|tx| tx.id == id)
            .ok_or_else(|| not_found("Transaction"))?;
        *slot = draft_to_transaction(id.to_string(), draft);
        Ok(slot.clone())
    }

    async fn delete_transaction(&self, id: &str) -> ClientResult<()> {
        self.reachable()?;
        let mut data = self.data();
        let before = data.transactions.len();
        data.transactions.retain(|tx| tx.id != id);
        if data.transactions.len() == before {
            return Err(not_found("Transaction"));
        }
        Ok(())
    }

    async fn monthly_summary(&self, year: i32, month: u32) -> ClientResult<MonthlySummary> {
        self.reachable()?;
        let prefix = format!("{:04}-{:02}", year, month);
        let data = self.data();
        let mut summary = MonthlySummary::default();
        for tx in data.transactions.iter().filter(|tx| tx.date.starts_with(&prefix)) {
            let key = tx.category.as_ref().map(|c| c.as_str().to_string()).unwrap_or_default();
            let entry = summary.categories.entry(key).or_default();
            if tx.is_income() {
                summary.total_income += tx.amount;
                entry.income += tx.amount;
            } else {
                summary.total_expenses += tx.amount;
                entry.expense += tx.amount;
            }
        }
        Ok(summary)
    }

    async fn transactions_by_category(&self, category: &Category) -> ClientResult<Vec<Transaction>> {
        self.reachable()?;
        Ok(self
            .data()
            .transactions
            .iter()
            .filter(|tx| tx.category.as_ref() == Some(category))
            .cloned()
            .collect())
    }

    async fn analytics_summary(&self, _account_id: Option<&str>) -> ClientResult<AnalyticsSummary> {
        self.reachable()?;
        Ok(AnalyticsSummary {
            category_breakdown: vec![CategorySlice {
                category: "FOOD".to_string(),
                amount: 1200.0,
            }],
            monthly_trends: vec![
                MonthlyTrend { month: "Feb".to_string(), income: 0.0, expense: 300.0 },
                MonthlyTrend { month: "Mar".to_string(), income: 5000.0, expense: 1200.0 },
            ],
            income_sources: vec![IncomeSource {
                id: "1".to_string(),
                title: "March salary".to_string(),
                amount: 5000.0,
                remaining_balance: 3800.0,
                allocated_amount: 1200.0,
                percentage_allocated: 24.0,
            }],
            total_income: Some(5000.0),
            total_expenses: Some(1500.0),
        })
    }

    async fn tax_estimate(&self, query: &TaxQuery) -> ClientResult<TaxResult> {
        self.reachable()?;
        self.data().last_tax_query = Some(query.clone());
        if query.year != 2024 {
            return Ok(TaxResult::default());
        }
        let mut breakdown = serde_json::Map::new();
        breakdown.insert("consolidatedRelief".to_string(), serde_json::json!(200000));
        Ok(TaxResult {
            income: 1_200_000.0,
            expenses: 200_000.0,
            taxable_income: 800_000.0,
            annual_tax: 84_000.0,
            monthly_tax: 7_000.0,
            effective_rate: 7.0,
            breakdown,
        })
    }

    async fn preferences(&self) -> ClientResult<Preferences> {
        self.reachable()?;
        Ok(self.data().preferences.clone())
    }

    async fn update_preferences(&self, preferences: &Preferences) -> ClientResult<Preferences> {
        self.reachable()?;
        self.data().preferences = preferences.clone();
        Ok(preferences.clone())
    }

    async fn notifications(&self) -> ClientResult<NotificationPreferences> {
        self.reachable()?;
        Ok(self.data().notifications.clone())
    }

    async fn update_notifications(
        &self,
        notifications: &NotificationPreferences,
    ) -> ClientResult<NotificationPreferences> {
        self.reachable()?;
        self.data().notifications = notifications.clone();
        Ok(notifications.clone())
    }

    async fn active_sessions(&self) -> ClientResult<Vec<ActiveSession>> {
        self.reachable()?;
        Ok(self.data().sessions.clone())
    }

    async fn terminate_session(&self, id: &str) -> ClientResult<()> {
        self.reachable()?;
        self.data().sessions.retain(|s| s.id != id);
        Ok(())
    }

    async fn login_history(&self, limit: usize) -> ClientResult<Vec<LoginRecord>> {
        self.reachable()?;
        let mut data = self.data();
        data.history_limit = Some(limit);
        Ok(data.history.iter().take(limit).cloned().collect())
    }

    async fn profile(&self) -> ClientResult<UserProfile> {
        self.reachable()?;
        Ok(self.data().profile.clone())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<UserProfile> {
        self.reachable()?;
        let mut data = self.data();
        if let Some(ref username) = update.username {
            data.profile.username = username.clone();
        }
        if let Some(ref email) = update.email {
            data.profile.email = email.clone();
        }
        if update.phone_number.is_some() {
            data.profile.phone_number = update.phone_number.clone();
        }
        Ok(data.profile.clone())
    }

    async fn change_password(&self, change: &PasswordChange) -> ClientResult<()> {
        self.reachable()?;
        if change.current_password == "secret" {
            Ok(())
        } else {
            Err(ClientError::from_status(400, r#"{"message":"Current password is incorrect"}"#))
        }
    }

    async fn deactivate_user(&self, password: &str) -> ClientResult<()> {
        self.reachable()?;
        if password == "secret" {
            Ok(())
        } else {
            Err(ClientError::from_status(400, r#"{"message":"Incorrect password"}"#))
        }
    }

    async fn delete_user(&self, password: &str) -> ClientResult<()> {
        self.deactivate_user(password).await
    }
}

/// Router wired to a fake backend and an in-memory session
pub struct TestApp {
    pub router: Router,
    pub backend: Arc<FakeBackend>,
    pub session: SessionHandle,
}

impl TestApp {
    pub fn signed_out() -> Self {
        let backend = Arc::new(FakeBackend::with_sample_data());
        let session = SessionHandle::in_memory();
        let state = AppState::new(backend.clone(), session.clone(), Config::default());
        Self {
            router: create_router(state),
            backend,
            session,
        }
    }

    pub fn signed_in() -> Self {
        let app = Self::signed_out();
        app.session.sign_in(&auth_response("ada@example.com"));
        app
    }
}

/// Send one request through the router and decode the JSON reply
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
