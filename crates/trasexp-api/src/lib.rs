//! Local JSON server over the finance backend
//!
//! Routes are organized into modules:
//! - routes::auth: Sign in, sign up and sign out
//! - routes::dashboard: Summary cards and recent transactions
//! - routes::transactions: Filtered list, create/update/delete, monthly summary
//! - routes::accounts: Account switcher and account management
//! - routes::analytics: Charts and tax estimate
//! - routes::settings: Preferences, notifications and theme
//! - routes::security: Active sessions and login history
//! - routes::profile: Profile, password and account closure

pub mod error;
pub mod routes;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use trasexp_client::FinanceBackend;
use trasexp_config::Config;
use trasexp_core::{CurrencyCode, SessionHandle, StoredUser};

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn FinanceBackend>,
    pub session: SessionHandle,
    pub config: Config,
}

impl AppState {
    pub fn new(backend: Arc<dyn FinanceBackend>, session: SessionHandle, config: Config) -> Self {
        Self {
            backend,
            session,
            config,
        }
    }

    /// The signed-in user, or 401
    pub fn require_user(&self) -> ApiResult<StoredUser> {
        match (self.session.is_authenticated(), self.session.user()) {
            (true, Some(user)) => Ok(user),
            _ => Err(ApiError::not_signed_in()),
        }
    }

    pub fn currency(&self) -> CurrencyCode {
        CurrencyCode::resolve(&self.config.currency.default_currency)
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::accounts::{
        api_accounts, api_create_account, api_delete_account, api_select_account, api_update_account,
        api_verify_pin,
    };
    use routes::analytics::{api_analytics, api_tax};
    use routes::auth::{api_login, api_logout, api_me, api_register};
    use routes::dashboard::api_dashboard;
    use routes::profile::{
        api_change_password, api_deactivate, api_delete_profile, api_profile, api_update_profile,
    };
    use routes::security::{api_security, api_terminate_session};
    use routes::settings::{
        api_notifications, api_preferences, api_theme, api_toggle_theme, api_update_notifications,
        api_update_preferences,
    };
    use routes::transactions::{
        api_create_transaction, api_delete_transaction, api_monthly_summary, api_transactions,
        api_update_transaction,
    };

    Router::new()
        .route("/api/health", get(health_check))
        // Auth
        .route("/api/auth/login", post(api_login))
        .route("/api/auth/register", post(api_register))
        .route("/api/auth/logout", post(api_logout))
        .route("/api/auth/me", get(api_me))
        // Dashboard
        .route("/api/dashboard", get(api_dashboard))
        // Transactions
        .route("/api/transactions", get(api_transactions).post(api_create_transaction))
        .route("/api/transactions/monthly", get(api_monthly_summary))
        .route(
            "/api/transactions/:id",
            put(api_update_transaction).delete(api_delete_transaction),
        )
        // Accounts
        .route("/api/accounts", get(api_accounts).post(api_create_account))
        .route("/api/accounts/select", post(api_select_account))
        .route("/api/accounts/:id", put(api_update_account).delete(api_delete_account))
        .route("/api/accounts/:id/verify-pin", post(api_verify_pin))
        // Analytics
        .route("/api/analytics", get(api_analytics))
        .route("/api/analytics/tax", get(api_tax))
        // Settings
        .route("/api/settings/preferences", get(api_preferences).put(api_update_preferences))
        .route(
            "/api/settings/notifications",
            get(api_notifications).put(api_update_notifications),
        )
        .route("/api/settings/theme", get(api_theme))
        .route("/api/settings/theme/toggle", post(api_toggle_theme))
        // Security
        .route("/api/security", get(api_security))
        .route("/api/security/sessions/:id", delete(api_terminate_session))
        // Profile
        .route(
            "/api/profile",
            get(api_profile).put(api_update_profile).delete(api_delete_profile),
        )
        .route("/api/profile/password", put(api_change_password))
        .route("/api/profile/deactivate", post(api_deactivate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// Bind the configured address and serve until the process stops
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = state.config.bind_address();
    let backend_url = state.config.backend_url();
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting trasexp server on http://{}", addr);
    log::info!("Forwarding to finance backend at {}", backend_url);

    match axum::serve(listener, router).await {
        Ok(()) => {
            log::info!("Server stopped gracefully");
            Ok(())
        }
        Err(e) => {
            log::error!("Server error: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support;
