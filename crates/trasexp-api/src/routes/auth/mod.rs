//! Auth routes - sign in, sign up and sign out
//!
//! The backend issues the token; this server keeps it in the session so
//! later calls go out authenticated.

pub mod api;

pub use api::{api_login, api_logout, api_me, api_register, AuthStatus};
