//! The storage capability shared by every backend.

use uuid::Uuid;

use crate::error::Result;
use crate::models::{MemeCoin, MemeCoinUpdate, NewMemeCoin, NewUser, User};

/// Create/read/update/list operations over users and coin records.
///
/// Handlers receive an `Arc<dyn Storage>` constructed at startup, so the
/// backing implementation (in-memory for the simulated flow, SQLite for
/// durable installs) can be swapped without touching callers — and tests get
/// isolated instances instead of process-wide globals.
///
/// Absence is reported as `Ok(None)`, never as an error.
pub trait Storage: Send + Sync {
    /// Assign a fresh id, store, and return the full record.
    ///
    /// Username uniqueness is a schema concern, not a store guarantee: the
    /// SQLite backend rejects duplicates via its `UNIQUE` constraint, the
    /// in-memory backend accepts them.
    fn create_user(&self, user: NewUser) -> Result<User>;

    fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Linear scan over all users; returns the first match.
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Assign a fresh id, initialize the deployment fields to `None` and
    /// `created_at` to now, store, and return the full record.
    fn create_meme_coin(&self, coin: NewMemeCoin) -> Result<MemeCoin>;

    fn get_meme_coin(&self, id: Uuid) -> Result<Option<MemeCoin>>;

    /// Shallow merge of `update` onto the stored record.  Returns the updated
    /// record, or `None` for an unknown id.  Concurrent updates to the same
    /// id are not isolated: last write wins, no version check.
    fn update_meme_coin(&self, id: Uuid, update: MemeCoinUpdate) -> Result<Option<MemeCoin>>;

    /// All records whose creator exactly equals `creator_address`, in
    /// insertion order.
    fn meme_coins_by_creator(&self, creator_address: &str) -> Result<Vec<MemeCoin>>;
}
