//! Account registry service.

use chrono::Utc;

use tally_shared::{AccountId, TenantContext};

use crate::error::LedgerError;
use crate::store::{LedgerStore, StoreError};

use super::account::{Account, NewAccount, UpdateAccount};

/// Manages a tenant's chart of accounts.
#[derive(Debug, Clone)]
pub struct AccountRegistry<S> {
    store: S,
}

impl<S: LedgerStore> AccountRegistry<S> {
    /// Creates a registry backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateCode`] if the code is already
    /// taken, [`LedgerError::InvalidParent`] if the parent is missing
    /// or its ancestry is cyclic, or a validation error for an empty
    /// code or name.
    pub async fn create_account(
        &self,
        ctx: &TenantContext,
        input: NewAccount,
    ) -> Result<Account, LedgerError> {
        let code = input.code.trim().to_string();
        let name = input.name.trim().to_string();
        if code.is_empty() {
            return Err(LedgerError::EmptyField("code"));
        }
        if name.is_empty() {
            return Err(LedgerError::EmptyField("name"));
        }

        if self.store.find_account_by_code(ctx, &code).await?.is_some() {
            return Err(LedgerError::DuplicateCode(code));
        }

        if let Some(parent_id) = input.parent_id {
            self.check_parent_chain(ctx, parent_id).await?;
        }

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            tenant_id: ctx.tenant_id,
            code,
            name,
            description: input.description,
            account_type: input.account_type,
            parent_id: input.parent_id,
            is_active: true,
            is_system: input.is_system,
            created_at: now,
            updated_at: now,
        };

        // A concurrent caller can slip past the code check above; the
        // unique index on (tenant_id, code) catches the loser.
        match self.store.insert_account(ctx, &account).await {
            Ok(()) => Ok(account),
            Err(StoreError::UniqueViolation) => Err(LedgerError::DuplicateCode(account.code)),
            Err(err) => Err(err.into()),
        }
    }

    /// Fetches an account by ID.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if no such account
    /// exists for this tenant.
    pub async fn get_account(
        &self,
        ctx: &TenantContext,
        id: AccountId,
    ) -> Result<Account, LedgerError> {
        self.store
            .get_account(ctx, id)
            .await?
            .ok_or(LedgerError::AccountNotFound(id))
    }

    /// Lists accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    pub async fn list_accounts(
        &self,
        ctx: &TenantContext,
        active_only: bool,
    ) -> Result<Vec<Account>, LedgerError> {
        Ok(self.store.list_accounts(ctx, active_only).await?)
    }

    /// Updates an account's name, description, or active flag.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if the account does not
    /// exist, or [`LedgerError::SystemAccount`] when trying to
    /// deactivate a system account.
    pub async fn update_account(
        &self,
        ctx: &TenantContext,
        id: AccountId,
        input: UpdateAccount,
    ) -> Result<Account, LedgerError> {
        let mut account = self.get_account(ctx, id).await?;

        if input.is_active == Some(false) && account.is_system {
            return Err(LedgerError::SystemAccount(id));
        }

        if let Some(name) = input.name {
            account.name = name;
        }
        if let Some(description) = input.description {
            account.description = description;
        }
        if let Some(is_active) = input.is_active {
            account.is_active = is_active;
        }
        account.updated_at = Utc::now();

        self.store.update_account(ctx, &account).await?;
        Ok(account)
    }

    /// Walks the parent chain upward, ensuring it exists and terminates.
    async fn check_parent_chain(
        &self,
        ctx: &TenantContext,
        parent_id: AccountId,
    ) -> Result<(), LedgerError> {
        let mut seen = vec![parent_id];
        let mut current = parent_id;
        loop {
            let account = self
                .store
                .get_account(ctx, current)
                .await?
                .ok_or(LedgerError::InvalidParent(current))?;
            match account.parent_id {
                None => return Ok(()),
                Some(next) => {
                    if seen.contains(&next) {
                        return Err(LedgerError::InvalidParent(parent_id));
                    }
                    seen.push(next);
                    current = next;
                }
            }
        }
    }
}
