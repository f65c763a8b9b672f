//! Tenant scoping for storage operations.

use serde::{Deserialize, Serialize};

use super::id::TenantId;

/// Identifies which tenant a storage operation acts on.
///
/// Every store call carries one of these. The `schema` names the
/// database schema holding the tenant's tables, and `tenant_id` is
/// additionally checked on every row as a second line of isolation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    /// Database schema name for this tenant.
    pub schema: String,
    /// Tenant identifier, filtered on every query.
    pub tenant_id: TenantId,
}

impl TenantContext {
    /// Creates a new tenant context.
    #[must_use]
    pub fn new(schema: impl Into<String>, tenant_id: TenantId) -> Self {
        Self {
            schema: schema.into(),
            tenant_id,
        }
    }
}
