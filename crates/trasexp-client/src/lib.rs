//! Client for the finance REST backend

pub mod backend;
pub mod client;
pub mod error;

pub use backend::FinanceBackend;
pub use client::ApiClient;
pub use error::{ClientError, ClientResult, NETWORK_ERROR_MESSAGE};
