//! Account API endpoints
//!
//! Endpoints:
//! - api_accounts: Account switcher options with the current selection
//! - api_create_account / api_update_account / api_delete_account
//! - api_select_account: Switch account, checking the PIN when required
//! - api_verify_pin: Check a PIN without switching

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use trasexp_client::ClientError;
use trasexp_core::{Account, AccountDraft, AccountOption, AccountSelection, FieldErrors, PinEntry};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Account switcher contents
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsResponse {
    /// Overall account first, then every real account
    pub options: Vec<AccountOption>,
    pub selected: AccountOption,
    pub selected_account_id: Option<String>,
}

impl From<&AccountSelection> for AccountsResponse {
    fn from(selection: &AccountSelection) -> Self {
        Self {
            options: selection.options(),
            selected: selection.selected_account(),
            selected_account_id: selection.selected.clone(),
        }
    }
}

/// Fetch accounts and drop a stored selection that no longer exists
async fn load_selection(state: &AppState) -> ApiResult<AccountSelection> {
    let accounts = state.backend.list_accounts().await?;
    let stored = state.session.selected_account_id();
    let selection = AccountSelection::new(accounts, stored.clone());
    if selection.selected != stored {
        state.session.select_account(selection.selected.clone());
    }
    Ok(selection)
}

fn validated(draft: AccountDraft) -> ApiResult<AccountDraft> {
    match ApiError::from_fields(draft.validate()) {
        Some(err) => Err(err),
        None => Ok(draft),
    }
}

pub async fn api_accounts(State(state): State<AppState>) -> ApiResult<Json<AccountsResponse>> {
    state.require_user()?;
    let selection = load_selection(&state).await?;
    Ok(Json(AccountsResponse::from(&selection)))
}

pub async fn api_create_account(
    State(state): State<AppState>,
    Json(draft): Json<AccountDraft>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    state.require_user()?;
    let draft = validated(draft)?;
    let account = state.backend.create_account(&draft).await?;
    log::info!("Created account {} ({})", account.name, account.id);
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn api_update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<AccountDraft>,
) -> ApiResult<Json<Account>> {
    state.require_user()?;
    let draft = validated(draft)?;
    let account = state.backend.update_account(&id, &draft).await?;
    log::info!("Updated account {}", id);
    Ok(Json(account))
}

/// Delete an account; deleting the selected one falls back to the overall account
pub async fn api_delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AccountsResponse>> {
    state.require_user()?;
    state.backend.delete_account(&id).await?;
    log::info!("Deleted account {}", id);
    if state.session.selected_account_id().as_deref() == Some(id.as_str()) {
        state.session.select_account(None);
    }
    let selection = load_selection(&state).await?;
    Ok(Json(AccountsResponse::from(&selection)))
}

/// `accountId: null` selects the overall account
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAccountRequest {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub pin: Option<String>,
}

/// Whether the backend accepts the PIN. Rejections other than an
/// unreachable backend count as a wrong PIN.
async fn pin_accepted(state: &AppState, id: &str, pin: &str) -> ApiResult<bool> {
    match state.backend.verify_account_pin(id, pin).await {
        Ok(valid) => Ok(valid),
        Err(err @ ClientError::Network { .. }) => Err(err.into()),
        Err(err) => {
            log::warn!("PIN verification failed for account {}: {}", id, err);
            Ok(false)
        }
    }
}

pub async fn api_select_account(
    State(state): State<AppState>,
    Json(request): Json<SelectAccountRequest>,
) -> ApiResult<Json<AccountsResponse>> {
    state.require_user()?;
    let mut selection = load_selection(&state).await?;

    let target = request.account_id.filter(|id| !id.is_empty());
    if let Some(ref id) = target {
        let account = selection
            .find(id)
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("account {}", id),
            })?;
        let already_selected = selection.selected.as_deref() == Some(id.as_str());
        if account.pin_required && !already_selected {
            let pin = request.pin.unwrap_or_default();
            if pin.is_empty() {
                let mut fields = FieldErrors::new();
                fields.insert("pin".to_string(), "PIN is required".to_string());
                return Err(ApiError::Validation { fields });
            }
            if !pin_accepted(&state, id, &pin).await? {
                return Err(ApiError::Forbidden {
                    message: "Invalid PIN".to_string(),
                });
            }
        }
    }

    selection.select(target)?;
    state.session.select_account(selection.selected.clone());
    log::info!("Selected account {}", selection.selected_account().name);
    Ok(Json(AccountsResponse::from(&selection)))
}

pub async fn api_verify_pin(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(entry): Json<PinEntry>,
) -> ApiResult<Json<serde_json::Value>> {
    state.require_user()?;
    let valid = pin_accepted(&state, &id, &entry.pin).await?;
    Ok(Json(serde_json::json!({ "valid": valid })))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, TestApp, WALLET_PIN};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_accounts_start_with_overall() {
        let app = TestApp::signed_in();
        let (status, body) = send(&app.router, "GET", "/api/accounts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["options"][0]["name"], "Overall Account");
        assert_eq!(body["options"][0]["balance"], 4500.0);
        assert_eq!(body["options"].as_array().unwrap().len(), 3);
        assert_eq!(body["selected"]["isOverall"], true);
    }

    #[tokio::test]
    async fn test_stale_selection_is_dropped() {
        let app = TestApp::signed_in();
        app.session.select_account(Some("99".to_string()));
        let (_, body) = send(&app.router, "GET", "/api/accounts", None).await;
        assert_eq!(body["selectedAccountId"], serde_json::Value::Null);
        assert!(app.session.selected_account_id().is_none());
    }

    #[tokio::test]
    async fn test_select_unprotected_account() {
        let app = TestApp::signed_in();
        let (status, body) = send(
            &app.router,
            "POST",
            "/api/accounts/select",
            Some(json!({"accountId": "1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected"]["name"], "Main");
        assert_eq!(app.session.selected_account_id().as_deref(), Some("1"));

        let (_, body) = send(
            &app.router,
            "POST",
            "/api/accounts/select",
            Some(json!({"accountId": null})),
        )
        .await;
        assert_eq!(body["selected"]["isOverall"], true);
        assert!(app.session.selected_account_id().is_none());
    }

    #[tokio::test]
    async fn test_select_protected_account_checks_pin() {
        let app = TestApp::signed_in();
        let (status, _) = send(
            &app.router,
            "POST",
            "/api/accounts/select",
            Some(json!({"accountId": "2"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(
            &app.router,
            "POST",
            "/api/accounts/select",
            Some(json!({"accountId": "2", "pin": "0000"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Invalid PIN");
        assert!(app.session.selected_account_id().is_none());

        let (status, _) = send(
            &app.router,
            "POST",
            "/api/accounts/select",
            Some(json!({"accountId": "2", "pin": WALLET_PIN})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.session.selected_account_id().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_select_unknown_account() {
        let app = TestApp::signed_in();
        let (status, _) = send(
            &app.router,
            "POST",
            "/api/accounts/select",
            Some(json!({"accountId": "7"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_verify_pin() {
        let app = TestApp::signed_in();
        let (_, body) = send(
            &app.router,
            "POST",
            "/api/accounts/2/verify-pin",
            Some(json!({"pin": WALLET_PIN})),
        )
        .await;
        assert_eq!(body["valid"], true);

        let (status, body) = send(
            &app.router,
            "POST",
            "/api/accounts/42/verify-pin",
            Some(json!({"pin": WALLET_PIN})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
    }

    #[tokio::test]
    async fn test_create_account_validation() {
        let app = TestApp::signed_in();
        let (status, body) = send(
            &app.router,
            "POST",
            "/api/accounts",
            Some(json!({"name": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["details"]["fields"]["name"].is_string());

        let (status, body) = send(
            &app.router,
            "POST",
            "/api/accounts",
            Some(json!({"name": "Holiday", "type": "SAVINGS"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Holiday");
    }

    #[tokio::test]
    async fn test_delete_selected_account_resets_selection() {
        let app = TestApp::signed_in();
        app.session.select_account(Some("1".to_string()));
        let (status, body) = send(&app.router, "DELETE", "/api/accounts/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected"]["isOverall"], true);
        assert_eq!(body["options"].as_array().unwrap().len(), 2);
        assert!(app.session.selected_account_id().is_none());
    }
}
