//! SQLite store backend.
//!
//! Durable counterpart to [`crate::MemStorage`] behind the same [`Storage`]
//! trait, selected at startup when a database path is configured.  Records
//! survive process restarts; everything else about the contract is identical.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::migrations;
use crate::models::{MemeCoin, MemeCoinUpdate, NewMemeCoin, NewUser, User};
use crate::store::Storage;

const COIN_COLUMNS: &str = "id, name, symbol, image_url, contract_address, \
     creator_address, deployment_tx_hash, farcaster_post_url, created_at";

/// [`Storage`] implementation over a [`rusqlite::Connection`].
///
/// `rusqlite` connections are not `Sync`, so the connection sits behind a
/// `Mutex`; every operation is one or two short statements under the lock.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the default application database in the
    /// platform-appropriate data directory.
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("io", "memeforge", "memeforge").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("memeforge.db");

        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// Useful for tests and for embedding the store inside custom directory
    /// layouts.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Recommended SQLite settings.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        // Run schema migrations.
        migrations::run_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for SqliteStorage {
    fn create_user(&self, user: NewUser) -> Result<User> {
        let record = User {
            id: Uuid::new_v4(),
            username: user.username,
            password: user.password,
        };

        self.conn().execute(
            "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)",
            params![record.id.to_string(), record.username, record.password],
        )?;

        Ok(record)
    }

    fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, username, password FROM users WHERE id = ?1",
                params![id.to_string()],
                row_to_user,
            )
            .optional()?)
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, username, password FROM users WHERE username = ?1 LIMIT 1",
                params![username],
                row_to_user,
            )
            .optional()?)
    }

    fn create_meme_coin(&self, coin: NewMemeCoin) -> Result<MemeCoin> {
        let record = MemeCoin {
            id: Uuid::new_v4(),
            name: coin.name,
            symbol: coin.symbol,
            image_url: coin.image_url,
            contract_address: None,
            creator_address: coin.creator_address,
            deployment_tx_hash: None,
            farcaster_post_url: None,
            created_at: Utc::now(),
        };

        self.conn().execute(
            "INSERT INTO meme_coins (id, name, symbol, image_url, creator_address, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id.to_string(),
                record.name,
                record.symbol,
                record.image_url,
                record.creator_address,
                record.created_at.to_rfc3339(),
            ],
        )?;

        Ok(record)
    }

    fn get_meme_coin(&self, id: Uuid) -> Result<Option<MemeCoin>> {
        Ok(self
            .conn()
            .query_row(
                &format!("SELECT {COIN_COLUMNS} FROM meme_coins WHERE id = ?1"),
                params![id.to_string()],
                row_to_coin,
            )
            .optional()?)
    }

    fn update_meme_coin(&self, id: Uuid, update: MemeCoinUpdate) -> Result<Option<MemeCoin>> {
        // Read-merge-write under one lock; the whole update is atomic with
        // respect to other store calls, but last write still wins across
        // interleaved requests.
        let conn = self.conn();

        let Some(mut coin) = conn
            .query_row(
                &format!("SELECT {COIN_COLUMNS} FROM meme_coins WHERE id = ?1"),
                params![id.to_string()],
                row_to_coin,
            )
            .optional()?
        else {
            return Ok(None);
        };

        if let Some(addr) = update.contract_address {
            coin.contract_address = Some(addr);
        }
        if let Some(hash) = update.deployment_tx_hash {
            coin.deployment_tx_hash = Some(hash);
        }
        if let Some(url) = update.farcaster_post_url {
            coin.farcaster_post_url = Some(url);
        }

        conn.execute(
            "UPDATE meme_coins
             SET contract_address = ?2, deployment_tx_hash = ?3, farcaster_post_url = ?4
             WHERE id = ?1",
            params![
                id.to_string(),
                coin.contract_address,
                coin.deployment_tx_hash,
                coin.farcaster_post_url,
            ],
        )?;

        Ok(Some(coin))
    }

    fn meme_coins_by_creator(&self, creator_address: &str) -> Result<Vec<MemeCoin>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COIN_COLUMNS} FROM meme_coins
             WHERE creator_address = ?1
             ORDER BY rowid ASC"
        ))?;

        let rows = stmt.query_map(params![creator_address], row_to_coin)?;

        let mut coins = Vec::new();
        for row in rows {
            coins.push(row?);
        }
        Ok(coins)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`User`].
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let id_str: String = row.get(0)?;
    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(User {
        id,
        username: row.get(1)?,
        password: row.get(2)?,
    })
}

/// Map a `rusqlite::Row` to a [`MemeCoin`].
fn row_to_coin(row: &rusqlite::Row<'_>) -> rusqlite::Result<MemeCoin> {
    let id_str: String = row.get(0)?;
    let created_str: String = row.get(8)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(MemeCoin {
        id,
        name: row.get(1)?,
        symbol: row.get(2)?,
        image_url: row.get(3)?,
        contract_address: row.get(4)?,
        creator_address: row.get(5)?,
        deployment_tx_hash: row.get(6)?,
        farcaster_post_url: row.get(7)?,
        created_at,
    })
}
