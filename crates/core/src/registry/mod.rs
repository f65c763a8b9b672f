//! Chart of accounts: account types, records, and the registry service.

mod account;
mod service;

pub use account::{Account, AccountType, NewAccount, UpdateAccount};
pub use service::AccountRegistry;
