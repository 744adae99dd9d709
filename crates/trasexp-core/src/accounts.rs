//! Account list and the currently selected account
//!
//! No selection means the "Overall Account", a virtual account whose balance
//! sums every account that is included in the overall total.

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::models::Account;
use crate::types::AccountKind;

pub const OVERALL_ACCOUNT_NAME: &str = "Overall Account";

/// An entry of the account switcher, real or overall
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOption {
    /// `None` for the overall account
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    pub balance: f64,
    pub is_default: bool,
    pub pin_required: bool,
    pub is_overall: bool,
}

impl From<&Account> for AccountOption {
    fn from(account: &Account) -> Self {
        Self {
            id: Some(account.id.clone()),
            name: account.name.clone(),
            kind: account.kind.clone(),
            balance: account.balance,
            is_default: account.is_default,
            pin_required: account.pin_required,
            is_overall: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSelection {
    pub accounts: Vec<Account>,
    pub selected: Option<String>,
}

impl AccountSelection {
    pub fn new(accounts: Vec<Account>, selected: Option<String>) -> Self {
        let mut selection = Self {
            accounts: vec![],
            selected,
        };
        selection.reconcile(accounts);
        selection
    }

    pub fn overall_account(&self) -> AccountOption {
        let balance = self
            .accounts
            .iter()
            .filter(|account| account.include_in_overall)
            .map(|account| account.balance)
            .sum();
        AccountOption {
            id: None,
            name: OVERALL_ACCOUNT_NAME.to_string(),
            kind: AccountKind::Custom("OVERALL".to_string()),
            balance,
            is_default: false,
            pin_required: false,
            is_overall: true,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    /// Select an account, or the overall account with `None`
    pub fn select(&mut self, id: Option<String>) -> CoreResult<()> {
        if let Some(ref id) = id {
            if self.find(id).is_none() {
                return Err(CoreError::AccountNotFound { id: id.clone() });
            }
        }
        self.selected = id;
        Ok(())
    }

    /// Replace the account list, dropping a selection that no longer exists
    pub fn reconcile(&mut self, accounts: Vec<Account>) {
        self.accounts = accounts;
        if let Some(ref id) = self.selected {
            if self.find(id).is_none() {
                log::info!("Selected account {} no longer exists, showing overall account", id);
                self.selected = None;
            }
        }
    }

    /// Forget a deleted account
    pub fn remove(&mut self, id: &str) {
        self.accounts.retain(|account| account.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
    }

    pub fn selected_account(&self) -> AccountOption {
        self.selected
            .as_deref()
            .and_then(|id| self.find(id))
            .map(AccountOption::from)
            .unwrap_or_else(|| self.overall_account())
    }

    /// Overall account first, then every real account
    pub fn options(&self) -> Vec<AccountOption> {
        std::iter::once(self.overall_account())
            .chain(self.accounts.iter().map(AccountOption::from))
            .collect()
    }
}
