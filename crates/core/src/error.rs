//! Error types for ledger operations.
//!
//! All fallible operations in this crate return [`LedgerError`]. Each
//! variant belongs to exactly one [`ErrorKind`], which adapters and
//! callers can use for coarse-grained handling (retry, 4xx vs 5xx, ...).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use tally_shared::{AccountId, EntryId};

use crate::store::StoreError;

/// Coarse classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is invalid.
    Validation,
    /// A referenced record does not exist.
    NotFound,
    /// The record exists but is in the wrong state, or a concurrent
    /// writer got there first.
    Conflict,
    /// The storage backend failed.
    Storage,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Entry is not balanced in base currency (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount in base currency.
        debit: Decimal,
        /// Total credit amount in base currency.
        credit: Decimal,
    },

    /// Line must carry exactly one strictly positive side.
    #[error("Line {index} must have exactly one positive side (debit or credit)")]
    InvalidLine {
        /// Zero-based position of the offending line.
        index: usize,
    },

    /// Exchange rate must be positive.
    #[error("Exchange rate must be positive")]
    InvalidRate,

    /// Period start must not be after period end.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Requested period start.
        start: NaiveDate,
        /// Requested period end.
        end: NaiveDate,
    },

    /// Account is inactive and cannot be used on new entries.
    #[error("Account {0} is inactive")]
    InactiveAccount(AccountId),

    /// Account code already exists for this tenant.
    #[error("Account code already exists: {0}")]
    DuplicateCode(String),

    /// Account code or name is empty.
    #[error("Account field must not be empty: {0}")]
    EmptyField(&'static str),

    /// Parent account is missing or would create a cycle.
    #[error("Invalid parent account: {0}")]
    InvalidParent(AccountId),

    /// The proposed reversal does not mirror the original entry.
    #[error("Reversal entry does not mirror the original")]
    ReversalMismatch,

    /// System accounts cannot be deactivated.
    #[error("Account {0} is a system account and cannot be deactivated")]
    SystemAccount(AccountId),

    // ========== Not Found Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(EntryId),

    // ========== State Errors ==========
    /// Entry is already posted (or voided) and cannot be posted again.
    #[error("Journal entry {0} is not in draft status")]
    AlreadyPosted(EntryId),

    /// Entry is not posted and cannot be voided.
    #[error("Journal entry {0} is not posted")]
    NotPosted(EntryId),

    /// Only draft entries can be deleted.
    #[error("Journal entry {0} is not a draft")]
    NotDraft(EntryId),

    /// Concurrent modification detected.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    // ========== Storage Errors ==========
    /// Storage backend error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the coarse classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientLines
            | Self::Unbalanced { .. }
            | Self::InvalidLine { .. }
            | Self::InvalidRate
            | Self::InvalidDateRange { .. }
            | Self::InactiveAccount(_)
            | Self::DuplicateCode(_)
            | Self::EmptyField(_)
            | Self::InvalidParent(_)
            | Self::ReversalMismatch
            | Self::SystemAccount(_) => ErrorKind::Validation,

            Self::AccountNotFound(_) | Self::EntryNotFound(_) => ErrorKind::NotFound,

            Self::AlreadyPosted(_)
            | Self::NotPosted(_)
            | Self::NotDraft(_)
            | Self::ConcurrentModification => ErrorKind::Conflict,

            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::InvalidLine { .. } => "INVALID_LINE",
            Self::InvalidRate => "INVALID_RATE",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::InactiveAccount(_) => "ACCOUNT_INACTIVE",
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::EmptyField(_) => "EMPTY_FIELD",
            Self::InvalidParent(_) => "INVALID_PARENT_ACCOUNT",
            Self::ReversalMismatch => "REVERSAL_MISMATCH",
            Self::SystemAccount(_) => "SYSTEM_ACCOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::NotPosted(_) => "NOT_POSTED",
            Self::NotDraft(_) => "NOT_DRAFT",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification | Self::Storage(_))
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PreconditionFailed | StoreError::UniqueViolation => {
                Self::ConcurrentModification
            }
            StoreError::Backend(message) => Self::Storage(message),
        }
    }
}
