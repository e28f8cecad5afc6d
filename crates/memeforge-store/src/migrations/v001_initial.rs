//! v001 -- Initial schema creation.
//!
//! Creates the two core tables: `users` and `meme_coins`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id       TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Meme coins
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS meme_coins (
    id                 TEXT PRIMARY KEY NOT NULL,  -- UUID v4
    name               TEXT NOT NULL,
    symbol             TEXT NOT NULL,
    image_url          TEXT NOT NULL,
    contract_address   TEXT,                       -- null until deployed
    creator_address    TEXT NOT NULL,              -- 0x + 40 hex chars
    deployment_tx_hash TEXT,
    farcaster_post_url TEXT,
    created_at         TEXT NOT NULL               -- ISO-8601 / RFC-3339
);

CREATE INDEX IF NOT EXISTS idx_meme_coins_creator ON meme_coins(creator_address);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
