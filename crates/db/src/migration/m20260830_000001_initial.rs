//! Initial database migration.
//!
//! Creates the enum types, the chart of accounts, and the journal
//! tables with their constraints and indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRY_LINES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Account types
DO $$ BEGIN
    CREATE TYPE account_type AS ENUM (
        'asset',
        'liability',
        'equity',
        'revenue',
        'expense'
    );
EXCEPTION
    WHEN duplicate_object THEN NULL;
END $$;

-- Journal entry lifecycle
DO $$ BEGIN
    CREATE TYPE entry_status AS ENUM (
        'draft',
        'posted',
        'voided'
    );
EXCEPTION
    WHEN duplicate_object THEN NULL;
END $$;
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    code VARCHAR(64) NOT NULL,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    account_type account_type NOT NULL,
    parent_id UUID REFERENCES accounts(id),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    is_system BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    UNIQUE (tenant_id, code)
);

CREATE INDEX idx_accounts_tenant ON accounts(tenant_id);
CREATE INDEX idx_accounts_parent ON accounts(parent_id);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    entry_number BIGINT NOT NULL,
    entry_date DATE NOT NULL,
    description TEXT NOT NULL,
    reference VARCHAR(255),
    source_type VARCHAR(64),
    source_id UUID,
    status entry_status NOT NULL DEFAULT 'draft',
    posted_at TIMESTAMPTZ,
    posted_by UUID,
    voided_at TIMESTAMPTZ,
    voided_by UUID,
    void_reason TEXT,
    created_at TIMESTAMPTZ NOT NULL,
    created_by UUID NOT NULL,
    UNIQUE (tenant_id, entry_number),
    -- Posted entries must say when and by whom
    CHECK (status <> 'posted' OR (posted_at IS NOT NULL AND posted_by IS NOT NULL)),
    CHECK (status <> 'voided' OR (voided_at IS NOT NULL AND voided_by IS NOT NULL))
);

CREATE INDEX idx_journal_entries_tenant ON journal_entries(tenant_id);
CREATE INDEX idx_journal_entries_tenant_status_date
    ON journal_entries(tenant_id, status, entry_date);
";

const JOURNAL_ENTRY_LINES_SQL: &str = r"
CREATE TABLE journal_entry_lines (
    id UUID PRIMARY KEY,
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit NUMERIC(28, 8) NOT NULL DEFAULT 0,
    credit NUMERIC(28, 8) NOT NULL DEFAULT 0,
    currency CHAR(3) NOT NULL,
    exchange_rate NUMERIC(20, 10) NOT NULL,
    base_debit NUMERIC(28, 8) NOT NULL DEFAULT 0,
    base_credit NUMERIC(28, 8) NOT NULL DEFAULT 0,
    UNIQUE (entry_id, position),
    -- Exactly one side of a line is positive
    CHECK (debit >= 0 AND credit >= 0),
    CHECK ((debit > 0) <> (credit > 0)),
    CHECK (exchange_rate > 0)
);

CREATE INDEX idx_journal_entry_lines_entry ON journal_entry_lines(entry_id);
CREATE INDEX idx_journal_entry_lines_account ON journal_entry_lines(account_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS journal_entry_lines;
DROP TABLE IF EXISTS journal_entries;
DROP TABLE IF EXISTS accounts;
DROP TYPE IF EXISTS entry_status;
DROP TYPE IF EXISTS account_type;
";
