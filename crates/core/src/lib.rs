//! Core ledger logic for Tally.
//!
//! This crate contains the business rules of the double-entry journal:
//! the chart of accounts, currency conversion, the journal entry state
//! machine, and balance queries. It has no database or web
//! dependencies; persistence is abstracted behind [`store::LedgerStore`].

pub mod balance;
pub mod currency;
pub mod error;
pub mod journal;
pub mod registry;
pub mod store;

pub use balance::{AccountBalance, BalanceQuery};
pub use currency::{BASE_SCALE, CurrencyConverter};
pub use error::{ErrorKind, LedgerError};
pub use journal::{
    EntryDraft, EntryStatus, EntryTotals, JournalEngine, JournalEntry, JournalLine, LineDraft,
    SourceRef,
};
pub use registry::{Account, AccountRegistry, AccountType, NewAccount, UpdateAccount};
pub use store::{AccountActivity, LedgerStore, StatusChange, StoreError, VoidChange};
