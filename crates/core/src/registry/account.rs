//! Account records and account types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tally_shared::{AccountId, TenantId};

/// The five fundamental account types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, receivables, inventory).
    Asset,
    /// Obligations owed (payables, loans).
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Returns true if this account type increases with debits.
    ///
    /// Asset and expense accounts are debit-normal; liability, equity
    /// and revenue accounts are credit-normal.
    #[must_use]
    pub fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }

    /// Returns the lowercase string form used in storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown account type: {other}")),
        }
    }
}

/// An account in a tenant's chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Tenant-unique account code (e.g. "1000").
    pub code: String,
    /// Human-readable account name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Fundamental account type.
    pub account_type: AccountType,
    /// Optional parent for hierarchical charts.
    pub parent_id: Option<AccountId>,
    /// Inactive accounts cannot appear on new entries.
    pub is_active: bool,
    /// System accounts cannot be deactivated.
    pub is_system: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    /// Tenant-unique account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Fundamental account type.
    pub account_type: AccountType,
    /// Optional parent account.
    pub parent_id: Option<AccountId>,
    /// Whether this is a system account.
    #[serde(default)]
    pub is_system: bool,
}

/// Input for updating an account. `None` fields are left unchanged.
///
/// The code, type and parent of an account are fixed at creation;
/// changing them would silently rewrite history.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccount {
    /// New name.
    pub name: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New active flag.
    pub is_active: Option<bool>,
}
