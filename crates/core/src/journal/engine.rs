//! Journal entry lifecycle engine.
//!
//! [`JournalEngine`] owns the Draft -> Posted -> Voided state machine.
//! It validates drafts, posts them, and voids posted entries by pairing
//! them with a posted reversing entry. All state transitions go through
//! conditional store writes, so two concurrent callers can never both
//! win the same transition.

use chrono::{NaiveDate, Utc};

use tally_shared::{EntryId, TenantContext, UserId};

use crate::currency::CurrencyConverter;
use crate::error::LedgerError;
use crate::store::{LedgerStore, StatusChange, StoreError, VoidChange};

use super::entry::{EntryDraft, JournalEntry};
use super::reversal::{build_reversal, mirrors};
use super::status::EntryStatus;
use super::validation;

/// Creates, posts, and voids journal entries.
#[derive(Debug, Clone)]
pub struct JournalEngine<S> {
    store: S,
    converter: CurrencyConverter,
}

impl<S: LedgerStore> JournalEngine<S> {
    /// Creates an engine backed by the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            converter: CurrencyConverter::new(),
        }
    }

    /// Creates a new draft entry.
    ///
    /// Lines are converted to base currency and the entry must balance
    /// before anything is written. The store assigns the sequential
    /// entry number at insert.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed or unbalanced lines,
    /// [`LedgerError::AccountNotFound`] or
    /// [`LedgerError::InactiveAccount`] for bad account references.
    pub async fn create_entry(
        &self,
        ctx: &TenantContext,
        draft: EntryDraft,
        created_by: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        validation::check_line_sides(&draft.lines)?;

        for line in &draft.lines {
            let account = self
                .store
                .get_account(ctx, line.account_id)
                .await?
                .ok_or(LedgerError::AccountNotFound(line.account_id))?;
            if !account.is_active {
                return Err(LedgerError::InactiveAccount(line.account_id));
            }
        }

        let id = EntryId::new();
        let lines = validation::resolve_lines(&self.converter, id, &draft.lines)?;
        validation::ensure_balanced(validation::totals(&lines))?;

        let mut entry = JournalEntry {
            id,
            tenant_id: ctx.tenant_id,
            entry_number: 0,
            entry_date: draft.entry_date,
            description: draft.description,
            reference: draft.reference,
            source: draft.source,
            status: EntryStatus::Draft,
            posted_at: None,
            posted_by: None,
            voided_at: None,
            voided_by: None,
            void_reason: None,
            created_at: Utc::now(),
            created_by,
            lines,
        };

        entry.entry_number = self.store.insert_entry(ctx, &entry).await?;
        Ok(entry)
    }

    /// Fetches an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EntryNotFound`] if no such entry exists
    /// for this tenant.
    pub async fn get_entry(
        &self,
        ctx: &TenantContext,
        id: EntryId,
    ) -> Result<JournalEntry, LedgerError> {
        self.store
            .get_entry(ctx, id)
            .await?
            .ok_or(LedgerError::EntryNotFound(id))
    }

    /// Posts a draft entry, making it part of every balance.
    ///
    /// The balance invariant is re-checked before posting. The status
    /// write is conditional on the entry still being a draft; if a
    /// concurrent caller posted it first, this returns
    /// [`LedgerError::AlreadyPosted`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EntryNotFound`],
    /// [`LedgerError::AlreadyPosted`] for non-draft entries, or
    /// [`LedgerError::Unbalanced`] if the stored lines no longer
    /// balance.
    pub async fn post_entry(
        &self,
        ctx: &TenantContext,
        id: EntryId,
        posted_by: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        let mut entry = self.get_entry(ctx, id).await?;
        if !entry.status.can_post() {
            return Err(LedgerError::AlreadyPosted(id));
        }
        validation::ensure_balanced(entry.totals())?;

        let change = StatusChange {
            status: EntryStatus::Posted,
            at: Utc::now(),
            by: posted_by,
        };
        let applied = self
            .store
            .update_entry_status(ctx, id, EntryStatus::Draft, &change)
            .await?;
        if !applied {
            return Err(LedgerError::AlreadyPosted(id));
        }

        entry.status = EntryStatus::Posted;
        entry.posted_at = Some(change.at);
        entry.posted_by = Some(change.by);
        Ok(entry)
    }

    /// Voids a posted entry by posting a mirroring reversal.
    ///
    /// The reversal is built from the original's lines with debits and
    /// credits swapped, dated `reversal_date` (the original's entry
    /// date if `None`). Marking the original voided and inserting the
    /// reversal happen atomically; if a concurrent caller voided the
    /// entry first, this returns [`LedgerError::NotPosted`] and no
    /// reversal is written.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EntryNotFound`] or
    /// [`LedgerError::NotPosted`] for entries that are not posted.
    pub async fn void_entry(
        &self,
        ctx: &TenantContext,
        id: EntryId,
        voided_by: UserId,
        reason: &str,
        reversal_date: Option<NaiveDate>,
    ) -> Result<(JournalEntry, JournalEntry), LedgerError> {
        let original = self.get_entry(ctx, id).await?;
        if !original.status.can_void() {
            return Err(LedgerError::NotPosted(id));
        }

        let now = Utc::now();
        let reversal = build_reversal(
            &original,
            reversal_date.unwrap_or(original.entry_date),
            now,
            voided_by,
            reason,
        );
        self.void_with_reversal(ctx, original, reversal, voided_by, reason, now)
            .await
    }

    /// Voids a posted entry using a caller-built reversal.
    ///
    /// The reversal must belong to the same tenant, carry its own
    /// entry id, and already be posted, balanced, and an exact
    /// line-for-line mirror of the original.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ReversalMismatch`] if the reversal does
    /// not mirror the original, plus the errors of
    /// [`Self::void_entry`].
    pub async fn void_entry_with_reversal(
        &self,
        ctx: &TenantContext,
        id: EntryId,
        reversal: JournalEntry,
        voided_by: UserId,
        reason: &str,
    ) -> Result<(JournalEntry, JournalEntry), LedgerError> {
        let original = self.get_entry(ctx, id).await?;
        if !original.status.can_void() {
            return Err(LedgerError::NotPosted(id));
        }
        if reversal.tenant_id != ctx.tenant_id
            || reversal.id == original.id
            || reversal.status != EntryStatus::Posted
            || !reversal.totals().is_balanced()
            || !mirrors(&original, &reversal)
        {
            return Err(LedgerError::ReversalMismatch);
        }
        self.void_with_reversal(ctx, original, reversal, voided_by, reason, Utc::now())
            .await
    }

    async fn void_with_reversal(
        &self,
        ctx: &TenantContext,
        mut original: JournalEntry,
        mut reversal: JournalEntry,
        voided_by: UserId,
        reason: &str,
        now: chrono::DateTime<Utc>,
    ) -> Result<(JournalEntry, JournalEntry), LedgerError> {
        let change = VoidChange {
            voided_at: now,
            voided_by,
            reason: reason.to_string(),
        };
        let number = match self
            .store
            .void_entry(ctx, original.id, &reversal, &change)
            .await
        {
            Ok(number) => number,
            Err(StoreError::PreconditionFailed) => {
                return Err(LedgerError::NotPosted(original.id));
            }
            Err(err) => return Err(err.into()),
        };

        original.status = EntryStatus::Voided;
        original.voided_at = Some(change.voided_at);
        original.voided_by = Some(change.voided_by);
        original.void_reason = Some(change.reason);
        reversal.entry_number = number;
        Ok((original, reversal))
    }

    /// Deletes a draft entry outright.
    ///
    /// Posted and voided entries can never be deleted.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EntryNotFound`] or
    /// [`LedgerError::NotDraft`] for non-draft entries.
    pub async fn delete_draft(&self, ctx: &TenantContext, id: EntryId) -> Result<(), LedgerError> {
        let entry = self.get_entry(ctx, id).await?;
        if entry.status != EntryStatus::Draft {
            return Err(LedgerError::NotDraft(id));
        }
        if !self.store.delete_draft_entry(ctx, id).await? {
            return Err(LedgerError::NotDraft(id));
        }
        Ok(())
    }
}
