//! Auth API endpoints

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use trasexp_core::{Credentials, FieldErrors, Registration, SessionHandle, StoredUser};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

const MIN_PASSWORD_LENGTH: usize = 6;

/// Who is signed in
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub authenticated: bool,
    pub user: Option<StoredUser>,
}

impl AuthStatus {
    fn of(session: &SessionHandle) -> Self {
        let authenticated = session.is_authenticated();
        Self {
            authenticated,
            user: if authenticated { session.user() } else { None },
        }
    }
}

fn require(fields: &mut FieldErrors, name: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        fields.insert(name.to_string(), message.to_string());
    }
}

/// Sign in against the backend and keep the token
pub async fn api_login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<Json<AuthStatus>> {
    let mut fields = FieldErrors::new();
    require(&mut fields, "email", &credentials.email, "Email is required");
    require(&mut fields, "password", &credentials.password, "Password is required");
    if let Some(err) = ApiError::from_fields(fields) {
        return Err(err);
    }

    let auth = state.backend.login(&credentials).await?;
    state.session.sign_in(&auth);
    Ok(Json(AuthStatus::of(&state.session)))
}

/// Create an account on the backend and sign in with it
pub async fn api_register(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> ApiResult<Json<AuthStatus>> {
    let mut fields = FieldErrors::new();
    require(&mut fields, "username", &registration.username, "Username is required");
    require(&mut fields, "email", &registration.email, "Email is required");
    if registration.password.chars().count() < MIN_PASSWORD_LENGTH {
        fields.insert(
            "password".to_string(),
            format!("Password must be at least {} characters long", MIN_PASSWORD_LENGTH),
        );
    }
    if let Some(err) = ApiError::from_fields(fields) {
        return Err(err);
    }

    let auth = state.backend.register(&registration).await?;
    state.session.sign_in(&auth);
    Ok(Json(AuthStatus::of(&state.session)))
}

/// Forget the token, the user and the selected account
pub async fn api_logout(State(state): State<AppState>) -> Json<AuthStatus> {
    state.session.sign_out();
    log::info!("Signed out");
    Json(AuthStatus::of(&state.session))
}

pub async fn api_me(State(state): State<AppState>) -> Json<AuthStatus> {
    Json(AuthStatus::of(&state.session))
}
