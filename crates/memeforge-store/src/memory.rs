//! In-memory store backend.
//!
//! The default backend for the simulated deployment flow: records live in
//! process memory and vanish on restart.  A real deployment would swap this
//! for [`crate::SqliteStorage`] behind the same [`Storage`] trait.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{MemeCoin, MemeCoinUpdate, NewMemeCoin, NewUser, User};
use crate::store::Storage;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    coins: HashMap<Uuid, MemeCoin>,
    /// Coin ids in creation order.  `HashMap` iteration order is arbitrary
    /// and listings must come back in insertion order.
    coin_log: Vec<Uuid>,
}

/// In-memory [`Storage`] implementation.
#[derive(Default)]
pub struct MemStorage {
    inner: RwLock<Inner>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    // Recover the guard on poisoning instead of propagating the panic.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemStorage {
    fn create_user(&self, user: NewUser) -> Result<User> {
        let record = User {
            id: Uuid::new_v4(),
            username: user.username,
            password: user.password,
        };
        self.write().users.insert(record.id, record.clone());
        Ok(record)
    }

    fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.read().users.get(&id).cloned())
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
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

        let mut inner = self.write();
        inner.coin_log.push(record.id);
        inner.coins.insert(record.id, record.clone());
        Ok(record)
    }

    fn get_meme_coin(&self, id: Uuid) -> Result<Option<MemeCoin>> {
        Ok(self.read().coins.get(&id).cloned())
    }

    fn update_meme_coin(&self, id: Uuid, update: MemeCoinUpdate) -> Result<Option<MemeCoin>> {
        let mut inner = self.write();
        let Some(coin) = inner.coins.get_mut(&id) else {
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

        Ok(Some(coin.clone()))
    }

    fn meme_coins_by_creator(&self, creator_address: &str) -> Result<Vec<MemeCoin>> {
        let inner = self.read();
        Ok(inner
            .coin_log
            .iter()
            .filter_map(|id| inner.coins.get(id))
            .filter(|coin| coin.creator_address == creator_address)
            .cloned()
            .collect())
    }
}
