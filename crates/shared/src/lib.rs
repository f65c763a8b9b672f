//! Shared types and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Tenant context passed to every store call
//! - Configuration management

pub mod config;
pub mod types;

pub use config::TallyConfig;
pub use types::{AccountId, EntryId, LineId, TenantContext, TenantId, UserId};
