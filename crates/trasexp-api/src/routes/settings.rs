//! Settings routes - preferences, notifications and theme
//!
//! Theme routes work signed out: the theme lives in the local session,
//! not on the backend.

use axum::extract::State;
use axum::Json;
use trasexp_core::theme::toggle;
use trasexp_core::{NotificationPreferences, Preferences, ThemeMode, ThemeState};

use crate::error::ApiResult;
use crate::AppState;

pub async fn api_preferences(State(state): State<AppState>) -> ApiResult<Json<Preferences>> {
    state.require_user()?;
    Ok(Json(state.backend.preferences().await?))
}

/// Save preferences; the theme chosen there also becomes the local theme
pub async fn api_update_preferences(
    State(state): State<AppState>,
    Json(preferences): Json<Preferences>,
) -> ApiResult<Json<Preferences>> {
    state.require_user()?;
    let saved = state.backend.update_preferences(&preferences).await?;
    state.session.set_theme(saved.theme);
    Ok(Json(saved))
}

pub async fn api_notifications(
    State(state): State<AppState>,
) -> ApiResult<Json<NotificationPreferences>> {
    state.require_user()?;
    Ok(Json(state.backend.notifications().await?))
}

pub async fn api_update_notifications(
    State(state): State<AppState>,
    Json(notifications): Json<NotificationPreferences>,
) -> ApiResult<Json<NotificationPreferences>> {
    state.require_user()?;
    Ok(Json(state.backend.update_notifications(&notifications).await?))
}

fn current_mode(state: &AppState) -> ThemeMode {
    state
        .session
        .theme()
        .unwrap_or(state.config.appearance.theme)
}

pub async fn api_theme(State(state): State<AppState>) -> Json<ThemeState> {
    Json(ThemeState::new(
        current_mode(&state),
        state.config.appearance.system_prefers_dark,
    ))
}

/// Flip what is shown between light and dark
pub async fn api_toggle_theme(State(state): State<AppState>) -> Json<ThemeState> {
    let prefers_dark = state.config.appearance.system_prefers_dark;
    let next = toggle(current_mode(&state), prefers_dark);
    state.session.set_theme(next);
    log::debug!("Theme set to {}", next);
    Json(ThemeState::new(next, prefers_dark))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, TestApp};
    use axum::http::StatusCode;
    use serde_json::json;
    use trasexp_core::ThemeMode;

    #[tokio::test]
    async fn test_theme_defaults_to_system() {
        let app = TestApp::signed_out();
        let (status, body) = send(&app.router, "GET", "/api/settings/theme", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "SYSTEM");
        assert_eq!(body["applied"], "light");
    }

    #[tokio::test]
    async fn test_toggle_theme_persists_in_session() {
        let app = TestApp::signed_out();
        let (_, body) = send(&app.router, "POST", "/api/settings/theme/toggle", None).await;
        assert_eq!(body["mode"], "DARK");
        assert_eq!(body["applied"], "dark");
        assert_eq!(app.session.theme(), Some(ThemeMode::Dark));

        let (_, body) = send(&app.router, "POST", "/api/settings/theme/toggle", None).await;
        assert_eq!(body["mode"], "LIGHT");
    }

    #[tokio::test]
    async fn test_update_preferences_sets_theme() {
        let app = TestApp::signed_in();
        let (status, body) = send(
            &app.router,
            "PUT",
            "/api/settings/preferences",
            Some(json!({"theme": "DARK", "defaultCurrency": "USD"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["defaultCurrency"], "USD");
        assert_eq!(body["language"], "en");
        assert_eq!(app.session.theme(), Some(ThemeMode::Dark));
    }

    #[tokio::test]
    async fn test_notifications_round_trip() {
        let app = TestApp::signed_in();
        let (_, body) = send(&app.router, "GET", "/api/settings/notifications", None).await;
        assert_eq!(body["emailNotifications"], true);

        let (status, _) = send(
            &app.router,
            "PUT",
            "/api/settings/notifications",
            Some(json!({"emailNotifications": false})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!app.backend.data().notifications.email_notifications);
        assert!(app.backend.data().notifications.transaction_alerts);
    }
}
