//! reqwest implementation of [`FinanceBackend`]

use async_trait::async_trait;
use reqwest::{IntoUrl, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use trasexp_config::Config;
use trasexp_core::{
    Account, AccountDraft, ActiveSession, AnalyticsSummary, AuthResponse, Category, Credentials,
    LoginRecord, MonthlySummary, NotificationPreferences, PasswordChange, PasswordConfirmation,
    PinEntry, Preferences, ProfileUpdate, Registration, SessionHandle, TaxQuery, TaxResult,
    Transaction, TransactionDraft, UserProfile,
};

use crate::backend::FinanceBackend;
use crate::error::{ClientError, ClientResult};

/// HTTP client for the finance REST API.
///
/// Every request carries the session token as a Bearer header. A 401 from
/// the backend clears the stored token and user.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionHandle) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_secs))
            .build()
            .map_err(|e| ClientError::InvalidRequest {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            base_url: config.backend_url(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Id of the signed-in user, needed as the `userId` query parameter
    fn user_id(&self) -> ClientResult<String> {
        self.session.user_id().ok_or(ClientError::NotAuthenticated)
    }

    /// URL of a single record; every segment is escaped, so an id cannot
    /// change which endpoint is called
    fn record_url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = Url::parse(&self.url("")).map_err(|e| ClientError::InvalidRequest {
            message: format!("Invalid backend URL {}: {}", self.base_url, e),
        })?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidRequest {
                message: format!("Backend URL {} cannot have a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_to(method, self.url(path))
    }

    fn request_to(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Request scoped to the signed-in user
    fn user_request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let user_id = self.user_id()?;
        Ok(self.request(method, path).query(&[("userId", user_id)]))
    }

    /// User-scoped request for one record
    fn record_request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let user_id = self.user_id()?;
        let url = self.record_url(segments)?;
        Ok(self.request_to(method, url).query(&[("userId", user_id)]))
    }

    /// Send the request and return the body of a successful response
    async fn execute(&self, builder: RequestBuilder) -> ClientResult<String> {
        let request = builder.build().map_err(|e| ClientError::InvalidRequest {
            message: e.to_string(),
        })?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        log::debug!("[API Request] {} {}", method, path);

        let response = self.http.execute(request).await.map_err(|e| {
            log::warn!("[API Error] {} {}: {}", method, path, e);
            ClientError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                log::warn!("Backend rejected the session token, signing out");
                self.session.clear_auth();
            } else {
                log::warn!("[API Error] {} {} -> {}", method, path, status);
            }
            return Err(ClientError::from_status(status.as_u16(), &body));
        }

        log::debug!("[API Response] {} {} -> {}", method, path, status);
        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let body = self.execute(builder).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse {
            message: e.to_string(),
        })
    }

    /// Send a request whose response body is not needed
    async fn send(&self, builder: RequestBuilder) -> ClientResult<()> {
        self.execute(builder).await.map(|_| ())
    }
}

/// The PIN endpoint answers with a bare boolean or an object carrying one
fn pin_verdict(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(valid) => *valid,
        serde_json::Value::Object(map) => ["valid", "isValid", "verified", "success"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_bool()))
            .unwrap_or(false),
        _ => false,
    }
}

#[async_trait]
impl FinanceBackend for ApiClient {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthResponse> {
        self.fetch(self.request(Method::POST, "/auth/login").json(credentials))
            .await
    }

    async fn register(&self, registration: &Registration) -> ClientResult<AuthResponse> {
        self.fetch(self.request(Method::POST, "/auth/register").json(registration))
            .await
    }

    async fn list_accounts(&self) -> ClientResult<Vec<Account>> {
        self.fetch(self.user_request(Method::GET, "/accounts")?).await
    }

    async fn create_account(&self, draft: &AccountDraft) -> ClientResult<Account> {
        self.fetch(self.user_request(Method::POST, "/accounts")?.json(draft))
            .await
    }

    async fn update_account(&self, id: &str, draft: &AccountDraft) -> ClientResult<Account> {
        self.fetch(self.record_request(Method::PUT, &["accounts", id])?.json(draft))
            .await
    }

    async fn delete_account(&self, id: &str) -> ClientResult<()> {
        self.send(self.record_request(Method::DELETE, &["accounts", id])?)
            .await
    }

    async fn verify_account_pin(&self, id: &str, pin: &str) -> ClientResult<bool> {
        let entry = PinEntry { pin: pin.to_string() };
        let builder = self.record_request(Method::POST, &["accounts", id, "verify-pin"])?;
        let verdict: serde_json::Value = self
            .fetch(builder.json(&entry))
            .await?;
        Ok(pin_verdict(&verdict))
    }

    async fn list_transactions(&self, account_id: Option<&str>) -> ClientResult<Vec<Transaction>> {
        let mut builder = self.user_request(Method::GET, "/transactions")?;
        if let Some(account_id) = account_id {
            builder = builder.query(&[("accountId", account_id)]);
        }
        self.fetch(builder).await
    }

    async fn get_transaction(&self, id: &str) -> ClientResult<Transaction> {
        self.fetch(self.record_request(Method::GET, &["transactions", id])?)
            .await
    }

    async fn create_transaction(&self, draft: &TransactionDraft) -> ClientResult<Transaction> {
        self.fetch(self.user_request(Method::POST, "/transactions")?.json(draft))
            .await
    }

    async fn update_transaction(&self, id: &str, draft: &TransactionDraft) -> ClientResult<Transaction> {
        self.fetch(self.record_request(Method::PUT, &["transactions", id])?.json(draft))
            .await
    }

    async fn delete_transaction(&self, id: &str) -> ClientResult<()> {
        self.send(self.record_request(Method::DELETE, &["transactions", id])?)
            .await
    }

    async fn monthly_summary(&self, year: i32, month: u32) -> ClientResult<MonthlySummary> {
        let builder = self
            .user_request(Method::GET, "/transactions/monthly")?
            .query(&[("year", year.to_string()), ("month", month.to_string())]);
        self.fetch(builder).await
    }

    async fn transactions_by_category(&self, category: &Category) -> ClientResult<Vec<Transaction>> {
        let builder = self
            .user_request(Method::GET, "/transactions/category")?
            .query(&[("category", category.as_str())]);
        self.fetch(builder).await
    }

    async fn analytics_summary(&self, account_id: Option<&str>) -> ClientResult<AnalyticsSummary> {
        let mut builder = self.user_request(Method::GET, "/analytics/summary")?;
        if let Some(account_id) = account_id {
            builder = builder.query(&[("accountId", account_id)]);
        }
        self.fetch(builder).await
    }

    async fn tax_estimate(&self, query: &TaxQuery) -> ClientResult<TaxResult> {
        let builder = self.user_request(Method::GET, "/analytics/tax")?.query(&[
            ("type", query.kind.to_string()),
            ("country", query.country.clone()),
            ("year", query.year.to_string()),
        ]);
        self.fetch(builder).await
    }

    async fn preferences(&self) -> ClientResult<Preferences> {
        self.fetch(self.request(Method::GET, "/settings/preferences")).await
    }

    async fn update_preferences(&self, preferences: &Preferences) -> ClientResult<Preferences> {
        self.fetch(self.request(Method::PUT, "/settings/preferences").json(preferences))
            .await
    }

    async fn notifications(&self) -> ClientResult<NotificationPreferences> {
        self.fetch(self.request(Method::GET, "/settings/notifications")).await
    }

    async fn update_notifications(
        &self,
        notifications: &NotificationPreferences,
    ) -> ClientResult<NotificationPreferences> {
        self.fetch(self.request(Method::PUT, "/settings/notifications").json(notifications))
            .await
    }

    async fn active_sessions(&self) -> ClientResult<Vec<ActiveSession>> {
        self.fetch(self.request(Method::GET, "/security/sessions")).await
    }

    async fn terminate_session(&self, id: &str) -> ClientResult<()> {
        let url = self.record_url(&["security", "sessions", id])?;
        self.send(self.request_to(Method::DELETE, url)).await
    }

    async fn login_history(&self, limit: usize) -> ClientResult<Vec<LoginRecord>> {
        let builder = self
            .request(Method::GET, "/security/login-history")
            .query(&[("limit", limit.to_string())]);
        self.fetch(builder).await
    }

    async fn profile(&self) -> ClientResult<UserProfile> {
        self.fetch(self.request(Method::GET, "/users/me")).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<UserProfile> {
        self.fetch(self.request(Method::PUT, "/users/me").json(update)).await
    }

    async fn change_password(&self, change: &PasswordChange) -> ClientResult<()> {
        self.send(self.request(Method::PUT, "/users/me/password").json(change))
            .await
    }

    async fn deactivate_user(&self, password: &str) -> ClientResult<()> {
        let body = PasswordConfirmation { password: password.to_string() };
        self.send(self.request(Method::POST, "/users/deactivate").json(&body))
            .await
    }

    async fn delete_user(&self, password: &str) -> ClientResult<()> {
        let body = PasswordConfirmation { password: password.to_string() };
        self.send(self.request(Method::DELETE, "/users/delete").json(&body))
            .await
    }
}
