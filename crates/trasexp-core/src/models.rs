//! Core data models exchanged with the finance backend

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FieldErrors;
use crate::time;
use crate::types::{AccountKind, Category, TransactionType};
use trasexp_config::ThemeMode;

/// Backend identifiers arrive as numbers or strings; both are kept as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => n.to_string(),
            RawId::Float(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

pub(crate) fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

pub(crate) fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|id| id.map(String::from))
}

/// A single income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Always positive; the sign comes from `kind`
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub category: Option<Category>,
    /// `YYYY-MM-DD`, optionally followed by a time part
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "de_opt_id", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Unspent part of an income
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocated_amount: Option<f64>,
    /// Income an expense is drawn from
    #[serde(default, deserialize_with = "de_opt_id", skip_serializing_if = "Option::is_none")]
    pub funding_income_id: Option<String>,
}

impl Transaction {
    pub fn new(id: impl Into<String>, kind: TransactionType, amount: f64, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
            amount,
            kind,
            category: None,
            date: date.into(),
            account_id: None,
            remaining_balance: None,
            allocated_amount: None,
            funding_income_id: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_remaining_balance(mut self, remaining: f64) -> Self {
        self.remaining_balance = Some(remaining);
        self
    }

    /// Parsed date and time, `None` when the backend sent something unreadable
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        time::parse_timestamp(&self.date)
    }

    pub fn date_naive(&self) -> Option<NaiveDate> {
        self.timestamp().map(|ts| ts.date())
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Amount with the sign implied by the type
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.amount.abs(),
            TransactionType::Expense => -self.amount.abs(),
        }
    }
}

/// Input for creating or updating a transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(rename = "type", default)]
    pub kind: TransactionType,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "de_opt_id", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id", skip_serializing_if = "Option::is_none")]
    pub funding_income_id: Option<String>,
}

impl TransactionDraft {
    /// Check the form fields. An empty map means the draft can be sent.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.insert("title".to_string(), "Title is required".to_string());
        }
        match self.amount {
            Some(amount) if amount.is_finite() && amount > 0.0 => {}
            _ => {
                errors.insert("amount".to_string(), "Amount must be a positive number".to_string());
            }
        }
        let category_missing = match &self.category {
            None => true,
            Some(category) => category.as_str().trim().is_empty(),
        };
        if category_missing {
            errors.insert("category".to_string(), "Category is required".to_string());
        }
        if self.date.trim().is_empty() {
            errors.insert("date".to_string(), "Date is required".to_string());
        } else if time::parse_date(&self.date).is_none() {
            errors.insert("date".to_string(), "Date must be a valid date".to_string());
        }
        errors
    }
}

/// A money account owned by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: AccountKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub pin_required: bool,
    /// Missing means included
    #[serde(default = "default_true")]
    pub include_in_overall: bool,
}

fn default_true() -> bool {
    true
}

/// Input for creating or updating an account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDraft {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: AccountKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    #[serde(default)]
    pub pin_required: bool,
    #[serde(default = "default_true")]
    pub include_in_overall: bool,
    #[serde(default)]
    pub is_default: bool,
}

impl AccountDraft {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name".to_string(), "Account name is required".to_string());
        }
        if self.pin_required {
            match self.pin.as_deref() {
                Some(pin) if !pin.is_empty() && pin.chars().all(|c| c.is_ascii_digit()) => {}
                _ => {
                    errors.insert("pin".to_string(), "PIN must contain only digits".to_string());
                }
            }
        }
        errors
    }
}

/// Login form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Sign-up form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Backend response to login and register
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(deserialize_with = "de_id")]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
}

/// User identity kept in the session (never the password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    #[serde(deserialize_with = "de_id", alias = "id")]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
}

impl From<&AuthResponse> for StoredUser {
    fn from(auth: &AuthResponse) -> Self {
        Self {
            user_id: auth.user_id.clone(),
            email: auth.email.clone(),
            username: auth.username.clone(),
        }
    }
}

/// Profile as returned by `/users/me`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    /// Fields this client does not model
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.current_password.is_empty() {
            errors.insert("currentPassword".to_string(), "Current password is required".to_string());
        }
        if self.new_password.is_empty() {
            errors.insert("newPassword".to_string(), "New password is required".to_string());
        } else if self.new_password != self.confirm_password {
            errors.insert("confirmPassword".to_string(), "Passwords do not match".to_string());
        }
        errors
    }
}

/// Password confirmation for deactivate and delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfirmation {
    pub password: String,
}

/// PIN entered to unlock an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinEntry {
    pub pin: String,
}

/// User preferences stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_currency")]
    pub default_currency: String,
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default = "default_true")]
    pub auto_categorization_toggle: bool,
    #[serde(default)]
    pub tax_calculation_toggle: bool,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_currency() -> String {
    "NGN".to_string()
}

fn default_category() -> String {
    "General".to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            language: default_language(),
            default_currency: default_currency(),
            default_category: default_category(),
            auto_categorization_toggle: true,
            tax_calculation_toggle: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default = "default_true")]
    pub in_app_notifications: bool,
    #[serde(default = "default_true")]
    pub transaction_alerts: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email_notifications: true,
            in_app_notifications: true,
            transaction_alerts: true,
        }
    }
}

/// A signed-in device
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub last_accessed_at: Option<String>,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRecord {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub login_time: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub success: bool,
}
