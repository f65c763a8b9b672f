//! Common domain types shared across crates.

pub mod id;
pub mod tenant;

pub use id::{AccountId, EntryId, LineId, TenantId, UserId};
pub use tenant::TenantContext;
