//! SQLite-backed implementation of the `SignalStore` trait.
//!
//! Two tables:
//!   - `signals`: one row per tracked token (upsert semantics), holding
//!     the price/market cap observed at signal time
//!   - `price_updates`: append-only log of sent updates
//!
//! The engine's "update count" and "last update" inputs are derived here
//! with `COUNT(*)` and `ORDER BY created_at_ms DESC LIMIT 1`.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use corelib::models::{PriceUpdateRecord, SignalRecord, Token};

use crate::SignalStore;

pub struct SqliteSignalStore {
    pool: SqlitePool,
}

impl SqliteSignalStore {
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect and ensure the schema exists.
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(path).await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS signals (
                token_address TEXT NOT NULL,
                chain TEXT NOT NULL,
                symbol TEXT,

                created_at_ms INTEGER NOT NULL,
                price REAL NOT NULL,
                market_cap REAL NOT NULL,

                PRIMARY KEY (token_address, chain)
            );
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS price_updates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                token_address TEXT NOT NULL,
                chain TEXT NOT NULL,

                created_at_ms INTEGER NOT NULL,
                price REAL NOT NULL,
                market_cap REAL NOT NULL
            );
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_price_updates_token
                ON price_updates (token_address, chain, created_at_ms);
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SignalStore for SqliteSignalStore {
    async fn tracked_tokens(&self) -> anyhow::Result<Vec<Token>> {
        let rows = sqlx::query("SELECT token_address, chain, symbol FROM signals")
            .fetch_all(&self.pool)
            .await?;

        let mut tokens = Vec::with_capacity(rows.len());
        for row in rows {
            tokens.push(Token {
                address: row.try_get("token_address")?,
                chain: row.try_get("chain")?,
                symbol: row.try_get("symbol")?,
            });
        }

        Ok(tokens)
    }

    async fn signal_for(&self, token: &Token) -> anyhow::Result<Option<SignalRecord>> {
        let row = sqlx::query(
            "SELECT created_at_ms, price, market_cap FROM signals
             WHERE token_address = ? AND chain = ?",
        )
        .bind(&token.address)
        .bind(&token.chain)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(SignalRecord {
                created_at_ms: row.try_get("created_at_ms")?,
                price: row.try_get("price")?,
                market_cap: row.try_get("market_cap")?,
            })),
            None => Ok(None),
        }
    }

    async fn latest_update(&self, token: &Token) -> anyhow::Result<Option<PriceUpdateRecord>> {
        let row = sqlx::query(
            "SELECT created_at_ms, price, market_cap FROM price_updates
             WHERE token_address = ? AND chain = ?
             ORDER BY created_at_ms DESC, id DESC
             LIMIT 1",
        )
        .bind(&token.address)
        .bind(&token.chain)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(PriceUpdateRecord {
                created_at_ms: row.try_get("created_at_ms")?,
                price: row.try_get("price")?,
                market_cap: row.try_get("market_cap")?,
            })),
            None => Ok(None),
        }
    }

    async fn update_count(&self, token: &Token) -> anyhow::Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM price_updates WHERE token_address = ? AND chain = ?",
        )
        .bind(&token.address)
        .bind(&token.chain)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn record_signal(&self, token: &Token, signal: &SignalRecord) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO signals
                (token_address, chain, symbol, created_at_ms, price, market_cap)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&token.address)
        .bind(&token.chain)
        .bind(&token.symbol)
        .bind(signal.created_at_ms)
        .bind(signal.price)
        .bind(signal.market_cap)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_update(
        &self,
        token: &Token,
        update: &PriceUpdateRecord,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO price_updates
                (token_address, chain, created_at_ms, price, market_cap)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&token.address)
        .bind(&token.chain)
        .bind(update.created_at_ms)
        .bind(update.price)
        .bind(update.market_cap)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_token(&self, token: &Token) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM price_updates WHERE token_address = ? AND chain = ?")
            .bind(&token.address)
            .bind(&token.chain)
            .execute(&self.pool)
            .await?;

        sqlx::query("DELETE FROM signals WHERE token_address = ? AND chain = ?")
            .bind(&token.address)
            .bind(&token.chain)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
