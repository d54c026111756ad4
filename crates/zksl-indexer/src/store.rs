//! Relational persistence for the indexer: proofs, validators, and the
//! single-row indexer cursor. Built on `sqlx` against Postgres, using the
//! runtime-checked `query_as` form so this crate type-checks without a live
//! `DATABASE_URL` (no `query!`/`query_as!` compile-time macros).
//!
//! No migration files are produced — out of scope per this workspace's
//! charter — so each table gets a `CREATE TABLE IF NOT EXISTS` bootstrap
//! function instead, called once at indexer startup.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::FromRow;

use crate::records::{ProofRecord, ValidatorRecord, ValidatorStatus};
use zksl_core::CommitmentLevel;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub struct ProofStore {
    pool: PgPool,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProofRow {
    pub artifact_id: uuid::Uuid,
    pub start_slot: i64,
    pub end_slot: i64,
    pub proof_hash: Vec<u8>,
    pub ds_hash: Vec<u8>,
    pub artifact_len: i32,
    pub state_root_before: Vec<u8>,
    pub state_root_after: Vec<u8>,
    pub aggregator_pubkey: String,
    pub ts: DateTime<Utc>,
    pub seq: i64,
    pub commitment_level: i16,
    pub txid: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ValidatorRow {
    pub pubkey: String,
    pub status: String,
    pub escrow: String,
    pub lock_ts: Option<DateTime<Utc>>,
    pub unlock_ts: Option<DateTime<Utc>>,
    pub num_accepts: i64,
    pub last_seen: DateTime<Utc>,
}

impl ProofStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn bootstrap(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS proofs (
                artifact_id UUID UNIQUE NOT NULL,
                start_slot BIGINT NOT NULL,
                end_slot BIGINT NOT NULL,
                proof_hash BYTEA NOT NULL,
                ds_hash BYTEA NOT NULL,
                artifact_len INTEGER NOT NULL CHECK (artifact_len BETWEEN 0 AND 524288),
                state_root_before BYTEA NOT NULL,
                state_root_after BYTEA NOT NULL,
                submitted_by TEXT,
                aggregator_pubkey TEXT NOT NULL,
                ts TIMESTAMPTZ NOT NULL,
                seq BIGINT NOT NULL,
                commitment_level SMALLINT NOT NULL CHECK (commitment_level BETWEEN 0 AND 2),
                txid TEXT UNIQUE,
                PRIMARY KEY (proof_hash, seq)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS validators (
                pubkey TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                escrow TEXT NOT NULL,
                lock_ts TIMESTAMPTZ,
                unlock_ts TIMESTAMPTZ,
                num_accepts BIGINT NOT NULL,
                last_seen TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS indexer_state (
                id INTEGER PRIMARY KEY DEFAULT 1,
                last_scan_ts TIMESTAMPTZ,
                last_seen_slot BIGINT NOT NULL DEFAULT 0,
                last_signature TEXT,
                last_reconciled_ts TIMESTAMPTZ,
                CHECK (id = 1)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO indexer_state (id, last_seen_slot)
            VALUES (1, 0)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Upsert a decoded proof record. Re-inserting an already-present
    /// `(proof_hash, seq)` pair mutates only `commitment_level` and `txid`.
    pub async fn upsert_proof(
        &self,
        record: &ProofRecord,
        aggregator_pubkey_hex: &str,
        commitment_level: CommitmentLevel,
        txid: Option<&str>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO proofs (
                artifact_id, start_slot, end_slot, proof_hash, ds_hash,
                artifact_len, state_root_before, state_root_after,
                aggregator_pubkey, ts, seq, commitment_level, txid
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (proof_hash, seq) DO UPDATE SET
                commitment_level = EXCLUDED.commitment_level,
                txid = COALESCE(EXCLUDED.txid, proofs.txid)
            "#,
        )
        .bind(record.artifact_id.0)
        .bind(record.start_slot as i64)
        .bind(record.end_slot as i64)
        .bind(record.proof_hash.as_bytes().to_vec())
        .bind(record.ds_hash.to_vec())
        .bind(record.artifact_len as i32)
        .bind(record.state_root_before.as_bytes().to_vec())
        .bind(record.state_root_after.as_bytes().to_vec())
        .bind(aggregator_pubkey_hex)
        .bind(Utc::now())
        .bind(record.seq as i64)
        .bind(commitment_level as i16)
        .bind(txid)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Up to 100 oldest rows below finalized commitment level, for the
    /// reconciliation cycle.
    pub async fn pending_reconciliation_rows(&self) -> Result<Vec<ProofRow>, StoreError> {
        let rows = sqlx::query_as::<_, ProofRow>(
            r#"
            SELECT artifact_id, start_slot, end_slot, proof_hash, ds_hash,
                   artifact_len, state_root_before, state_root_after,
                   aggregator_pubkey, ts, seq, commitment_level, txid
            FROM proofs
            WHERE commitment_level < 2
            ORDER BY ts ASC
            LIMIT 100
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Look up one proof by its artifact id, for `GET /proof/:id`. Unlike
    /// `pending_reconciliation_rows`, this is a direct point lookup with no
    /// commitment-level filter or row cap, so it keeps returning finalized
    /// rows after they drop out of the reconciliation cycle's working set.
    pub async fn get_proof(&self, artifact_id: uuid::Uuid) -> Result<Option<ProofRow>, StoreError> {
        let row = sqlx::query_as::<_, ProofRow>(
            r#"
            SELECT artifact_id, start_slot, end_slot, proof_hash, ds_hash,
                   artifact_len, state_root_before, state_root_after,
                   aggregator_pubkey, ts, seq, commitment_level, txid
            FROM proofs
            WHERE artifact_id = $1
            "#,
        )
        .bind(artifact_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn bump_commitment_level(
        &self,
        proof_hash: &[u8],
        seq: i64,
        level: CommitmentLevel,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE proofs SET commitment_level = $3 WHERE proof_hash = $1 AND seq = $2",
        )
        .bind(proof_hash)
        .bind(seq)
        .bind(level as i16)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn purge(&self, proof_hash: &[u8], seq: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM proofs WHERE proof_hash = $1 AND seq = $2")
            .bind(proof_hash)
            .bind(seq)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Upsert a decoded validator record. Re-inserting an already-present
    /// pubkey updates status, accept counter, and last-seen timestamp.
    pub async fn upsert_validator(&self, record: &ValidatorRecord) -> Result<(), StoreError> {
        let status = match record.status {
            ValidatorStatus::Active => "Active",
            ValidatorStatus::Unlocked => "Unlocked",
        };
        sqlx::query(
            r#"
            INSERT INTO validators (pubkey, status, escrow, lock_ts, num_accepts, last_seen)
            VALUES ($1, $2, $3, to_timestamp($4), $5, NOW())
            ON CONFLICT (pubkey) DO UPDATE SET
                status = EXCLUDED.status,
                num_accepts = EXCLUDED.num_accepts,
                last_seen = NOW()
            "#,
        )
        .bind(record.pubkey.to_hex())
        .bind(status)
        .bind(record.escrow.to_hex())
        .bind(record.lock_ts as f64)
        .bind(record.num_accepts as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Look up one validator by its hex-encoded pubkey, for `GET /validator/:pubkey`.
    pub async fn get_validator(&self, pubkey_hex: &str) -> Result<Option<ValidatorRow>, StoreError> {
        let row = sqlx::query_as::<_, ValidatorRow>(
            r#"
            SELECT pubkey, status, escrow, lock_ts, unlock_ts, num_accepts, last_seen
            FROM validators
            WHERE pubkey = $1
            "#,
        )
        .bind(pubkey_hex)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn advance_cursor(
        &self,
        last_seen_slot: i64,
        last_signature: Option<&str>,
        scanned_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE indexer_state
            SET last_seen_slot = GREATEST(last_seen_slot, $1),
                last_signature = COALESCE($2, last_signature),
                last_scan_ts = $3
            WHERE id = 1
            "#,
        )
        .bind(last_seen_slot)
        .bind(last_signature)
        .bind(scanned_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn mark_reconciled(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query("UPDATE indexer_state SET last_reconciled_ts = $1 WHERE id = 1")
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn last_seen_slot(&self) -> Result<i64, StoreError> {
        let row: (i64,) = sqlx::query_as("SELECT last_seen_slot FROM indexer_state WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
