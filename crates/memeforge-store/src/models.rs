//! Domain model structs shared by every store backend.
//!
//! Every record derives `Serialize` and `Deserialize` so it can be handed
//! directly to HTTP responses; field names serialize in camelCase to match
//! the wire contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered user.  Created once via registration; immutable afterwards
/// except via full replace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// Unique by schema (the SQLite backend enforces it; the in-memory
    /// backend does not).
    pub username: String,
    pub password: String,
}

/// Fields required to register a user.  The store assigns the id.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// MemeCoin
// ---------------------------------------------------------------------------

/// One user-initiated token creation request and its simulated deployment
/// outcome.
///
/// The three deployment fields start `None` and are filled in place as the
/// deployment pipeline progresses; once set they are never cleared.  There is
/// no deletion path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemeCoin {
    /// Store-assigned identifier, never reused.
    pub id: Uuid,
    /// Token name, 1–50 characters.
    pub name: String,
    /// Token symbol, 1–10 uppercase alphanumeric characters.
    pub symbol: String,
    /// Content-address URL of the token image.
    pub image_url: String,
    pub contract_address: Option<String>,
    /// Wallet address of the creator (`0x` + 40 hex chars); the listing
    /// partition key.
    pub creator_address: String,
    pub deployment_tx_hash: Option<String>,
    pub farcaster_post_url: Option<String>,
    /// Set at creation, immutable.
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new coin record.  The store assigns the id
/// and timestamp and initializes the deployment fields to `None`.
#[derive(Debug, Clone)]
pub struct NewMemeCoin {
    pub name: String,
    pub symbol: String,
    pub image_url: String,
    pub creator_address: String,
}

/// Partial update merged onto an existing record: each `Some` field
/// overwrites the stored value, `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct MemeCoinUpdate {
    pub contract_address: Option<String>,
    pub deployment_tx_hash: Option<String>,
    pub farcaster_post_url: Option<String>,
}
