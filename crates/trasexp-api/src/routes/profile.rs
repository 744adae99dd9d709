//! Profile routes - profile details, password and account closure

use axum::extract::State;
use axum::Json;
use trasexp_core::{FieldErrors, PasswordChange, PasswordConfirmation, ProfileUpdate, UserProfile};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub async fn api_profile(State(state): State<AppState>) -> ApiResult<Json<UserProfile>> {
    state.require_user()?;
    Ok(Json(state.backend.profile().await?))
}

pub async fn api_update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<UserProfile>> {
    state.require_user()?;
    if update.email.as_deref().is_some_and(|email| email.trim().is_empty()) {
        let mut fields = FieldErrors::new();
        fields.insert("email".to_string(), "Email is required".to_string());
        return Err(ApiError::Validation { fields });
    }
    Ok(Json(state.backend.update_profile(&update).await?))
}

pub async fn api_change_password(
    State(state): State<AppState>,
    Json(change): Json<PasswordChange>,
) -> ApiResult<Json<serde_json::Value>> {
    state.require_user()?;
    if let Some(err) = ApiError::from_fields(change.validate()) {
        return Err(err);
    }
    state.backend.change_password(&change).await?;
    log::info!("Password changed");
    Ok(Json(serde_json::json!({ "success": true })))
}

fn confirmed(confirmation: &PasswordConfirmation) -> ApiResult<()> {
    if confirmation.password.is_empty() {
        let mut fields = FieldErrors::new();
        fields.insert("password".to_string(), "Password is required".to_string());
        return Err(ApiError::Validation { fields });
    }
    Ok(())
}

/// Deactivate the user on the backend, then sign out locally
pub async fn api_deactivate(
    State(state): State<AppState>,
    Json(confirmation): Json<PasswordConfirmation>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = state.require_user()?;
    confirmed(&confirmation)?;
    state.backend.deactivate_user(&confirmation.password).await?;
    log::warn!("User {} deactivated their account", user.user_id);
    state.session.sign_out();
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Permanently delete the user on the backend, then sign out locally
pub async fn api_delete_profile(
    State(state): State<AppState>,
    Json(confirmation): Json<PasswordConfirmation>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = state.require_user()?;
    confirmed(&confirmation)?;
    state.backend.delete_user(&confirmation.password).await?;
    log::warn!("User {} deleted their account", user.user_id);
    state.session.sign_out();
    Ok(Json(serde_json::json!({ "success": true })))
}
