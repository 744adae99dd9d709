//! Basic enumerations shared by the models

use serde::{Deserialize, Serialize};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    #[serde(alias = "income")]
    Income,
    #[serde(alias = "expense")]
    Expense,
}

impl Default for TransactionType {
    fn default() -> Self {
        TransactionType::Expense
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "INCOME"),
            TransactionType::Expense => write!(f, "EXPENSE"),
        }
    }
}

/// Spending or income category.
///
/// The backend owns the category list; names it sends that are not known here
/// are kept verbatim in `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Utilities,
    Healthcare,
    Shopping,
    Education,
    Salary,
    Freelance,
    Other,
    Custom(String),
}

impl Category {
    /// Categories offered by the transaction filter
    pub const FILTERABLE: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Utilities,
        Category::Healthcare,
        Category::Shopping,
        Category::Education,
        Category::Other,
    ];

    /// Wire name, e.g. `FOOD`
    pub fn as_str(&self) -> &str {
        match self {
            Category::Food => "FOOD",
            Category::Transport => "TRANSPORT",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Utilities => "UTILITIES",
            Category::Healthcare => "HEALTHCARE",
            Category::Shopping => "SHOPPING",
            Category::Education => "EDUCATION",
            Category::Salary => "SALARY",
            Category::Freelance => "FREELANCE",
            Category::Other => "OTHER",
            Category::Custom(name) => name,
        }
    }

    /// Human label, e.g. `Food`
    pub fn label(&self) -> String {
        match self {
            Category::Custom(name) => name.clone(),
            known => {
                let name = known.as_str();
                let mut label = name[..1].to_string();
                label.push_str(&name[1..].to_lowercase());
                label
            }
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        match name.to_uppercase().as_str() {
            "FOOD" => Category::Food,
            "TRANSPORT" | "TRANSPORTATION" => Category::Transport,
            "ENTERTAINMENT" => Category::Entertainment,
            "UTILITIES" => Category::Utilities,
            "HEALTHCARE" => Category::Healthcare,
            "SHOPPING" => Category::Shopping,
            "EDUCATION" => Category::Education,
            "SALARY" => Category::Salary,
            "FREELANCE" => Category::Freelance,
            "OTHER" => Category::Other,
            _ => Category::Custom(name),
        }
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Category::from(name.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of money account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountKind {
    Savings,
    Current,
    Wallet,
    Business,
    Investment,
    Custom(String),
}

impl Default for AccountKind {
    fn default() -> Self {
        AccountKind::Savings
    }
}

impl From<String> for AccountKind {
    fn from(name: String) -> Self {
        match name.to_uppercase().as_str() {
            "SAVINGS" => AccountKind::Savings,
            "CURRENT" => AccountKind::Current,
            "WALLET" => AccountKind::Wallet,
            "BUSINESS" => AccountKind::Business,
            "INVESTMENT" => AccountKind::Investment,
            _ => AccountKind::Custom(name),
        }
    }
}

impl From<AccountKind> for String {
    fn from(kind: AccountKind) -> Self {
        match kind {
            AccountKind::Savings => "SAVINGS".to_string(),
            AccountKind::Current => "CURRENT".to_string(),
            AccountKind::Wallet => "WALLET".to_string(),
            AccountKind::Business => "BUSINESS".to_string(),
            AccountKind::Investment => "INVESTMENT".to_string(),
            AccountKind::Custom(name) => name,
        }
    }
}
