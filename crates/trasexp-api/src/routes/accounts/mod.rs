//! Account routes - account switcher and account management
//!
//! Structure:
//! - api.rs: JSON endpoints

pub mod api;

pub use api::{
    api_accounts, api_create_account, api_delete_account, api_select_account, api_update_account,
    api_verify_pin, AccountsResponse, SelectAccountRequest,
};
