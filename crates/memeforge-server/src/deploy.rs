//! Staged deployment engine.
//!
//! Deployment walks an explicit state machine: a record starts `Created`,
//! gains chain identifiers in `ContractAssigned`, and finishes `Posted` once
//! the announcement cast exists.  Each transition is keyed by record id and
//! idempotent, so an interrupted deployment leaves resumable state instead of
//! a permanently half-filled record.
//!
//! The chain and the social network are stubs: identifiers come from
//! [`memeforge_shared::synth`] and the confirmation wait is a plain sleep.
//! No rollback happens on mid-pipeline failure — the created record stays.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use memeforge_shared::{synth, ValidatedDeploy};
use memeforge_store::{MemeCoin, MemeCoinUpdate, NewMemeCoin, Storage, StoreError};

/// Flat gas cost reported for every simulated deployment, in ETH.
pub const GAS_USED: &str = "0.0001";

#[derive(Debug, Error)]
pub enum DeployError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The record disappeared between stages.  No deletion path exists, so
    /// this is unreachable with the in-memory backend; kept explicit for
    /// durable ones.
    #[error("Coin record {0} vanished mid-deployment")]
    RecordVanished(Uuid),
}

/// Where a record sits in the deployment sequence, derived from which
/// deployment fields are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentStage {
    Created,
    ContractAssigned,
    Posted,
}

impl DeploymentStage {
    pub fn of(coin: &MemeCoin) -> Self {
        match (&coin.contract_address, &coin.farcaster_post_url) {
            (Some(_), Some(_)) => Self::Posted,
            (Some(_), None) => Self::ContractAssigned,
            _ => Self::Created,
        }
    }
}

/// Outcome of a completed deployment.
#[derive(Debug, Clone)]
pub struct DeployReceipt {
    /// The record with every deployment field filled.
    pub coin: MemeCoin,
    pub contract_address: String,
    pub deployment_tx_hash: String,
}

/// Runs the simulated deployment pipeline against the record store.
pub struct Deployer {
    store: Arc<dyn Storage>,
    confirmation_delay: Duration,
}

impl Deployer {
    pub fn new(store: Arc<dyn Storage>, confirmation_delay: Duration) -> Self {
        Self {
            store,
            confirmation_delay,
        }
    }

    /// Create a record for a validated request and run it to completion.
    pub async fn deploy(&self, input: ValidatedDeploy) -> Result<DeployReceipt, DeployError> {
        let coin = self.store.create_meme_coin(NewMemeCoin {
            name: input.name,
            symbol: input.symbol,
            image_url: input.image_url,
            creator_address: input.creator_address,
        })?;

        debug!(id = %coin.id, name = %coin.name, "coin record created");

        self.resume(coin.id).await
    }

    /// Complete every outstanding stage for an existing record.
    ///
    /// Safe to call at any stage, including `Posted`.
    pub async fn resume(&self, id: Uuid) -> Result<DeployReceipt, DeployError> {
        let (contract_address, deployment_tx_hash) = self.assign_contract(id).await?;
        let coin = self.publish_cast(id)?;

        Ok(DeployReceipt {
            coin,
            contract_address,
            deployment_tx_hash,
        })
    }

    /// Stage transition `Created -> ContractAssigned`: synthesize chain
    /// identifiers, await the simulated confirmation, persist both fields.
    /// Idempotent — an already-assigned record returns its stored
    /// identifiers without re-synthesizing.
    async fn assign_contract(&self, id: Uuid) -> Result<(String, String), DeployError> {
        let coin = self.fetch(id)?;
        if let (Some(addr), Some(hash)) = (coin.contract_address, coin.deployment_tx_hash) {
            return Ok((addr, hash));
        }

        let contract_address = synth::contract_address();
        let deployment_tx_hash = synth::transaction_hash();

        // Placeholder for awaiting on-chain confirmation.
        tokio::time::sleep(self.confirmation_delay).await;

        self.store
            .update_meme_coin(
                id,
                MemeCoinUpdate {
                    contract_address: Some(contract_address.clone()),
                    deployment_tx_hash: Some(deployment_tx_hash.clone()),
                    ..Default::default()
                },
            )?
            .ok_or(DeployError::RecordVanished(id))?;

        info!(id = %id, contract = %contract_address, "contract deployment simulated");

        Ok((contract_address, deployment_tx_hash))
    }

    /// Stage transition `ContractAssigned -> Posted`: synthesize the
    /// announcement cast URL and persist it.  Idempotent.
    fn publish_cast(&self, id: Uuid) -> Result<MemeCoin, DeployError> {
        let coin = self.fetch(id)?;
        if coin.farcaster_post_url.is_some() {
            return Ok(coin);
        }

        let cast_url = synth::cast_url(&coin.name, &coin.symbol);

        let updated = self
            .store
            .update_meme_coin(
                id,
                MemeCoinUpdate {
                    farcaster_post_url: Some(cast_url),
                    ..Default::default()
                },
            )?
            .ok_or(DeployError::RecordVanished(id))?;

        info!(id = %id, "announcement cast simulated");

        Ok(updated)
    }

    fn fetch(&self, id: Uuid) -> Result<MemeCoin, DeployError> {
        self.store
            .get_meme_coin(id)?
            .ok_or(DeployError::RecordVanished(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memeforge_shared::DeployRequest;
    use memeforge_store::MemStorage;

    const CREATOR: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

    fn test_deployer() -> (Deployer, Arc<dyn Storage>) {
        let store: Arc<dyn Storage> = Arc::new(MemStorage::new());
        (Deployer::new(store.clone(), Duration::ZERO), store)
    }

    fn valid_input() -> ValidatedDeploy {
        ValidatedDeploy::parse(DeployRequest {
            name: "Boss Coin".to_string(),
            symbol: "BOSS".to_string(),
            image_url: "https://ipfs.io/ipfs/abc".to_string(),
            creator_address: CREATOR.to_string(),
        })
        .unwrap()
    }

    fn is_contract_address(s: &str) -> bool {
        match s.strip_prefix("0x") {
            Some(rest) => {
                rest.len() == 40
                    && rest
                        .bytes()
                        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
            }
            None => false,
        }
    }

    #[tokio::test]
    async fn test_deploy_fills_every_field() {
        let (deployer, store) = test_deployer();
        let receipt = deployer.deploy(valid_input()).await.unwrap();

        assert!(is_contract_address(&receipt.contract_address));
        assert_eq!(receipt.deployment_tx_hash.len(), 66);

        let coin = &receipt.coin;
        assert_eq!(DeploymentStage::of(coin), DeploymentStage::Posted);
        assert_eq!(coin.contract_address.as_deref(), Some(receipt.contract_address.as_str()));
        assert_eq!(
            coin.deployment_tx_hash.as_deref(),
            Some(receipt.deployment_tx_hash.as_str())
        );

        let cast = coin.farcaster_post_url.as_deref().unwrap();
        assert!(cast.contains("Boss Coin"));
        assert!(cast.contains("BOSS"));

        // The receipt matches what the store now holds.
        let stored = store.get_meme_coin(coin.id).unwrap().unwrap();
        assert_eq!(&stored, coin);
    }

    #[tokio::test]
    async fn test_stage_derivation() {
        let (deployer, store) = test_deployer();
        let coin = store
            .create_meme_coin(NewMemeCoin {
                name: "Boss Coin".to_string(),
                symbol: "BOSS".to_string(),
                image_url: "https://ipfs.io/ipfs/abc".to_string(),
                creator_address: CREATOR.to_string(),
            })
            .unwrap();
        assert_eq!(DeploymentStage::of(&coin), DeploymentStage::Created);

        let (_, _) = deployer.assign_contract(coin.id).await.unwrap();
        let coin = store.get_meme_coin(coin.id).unwrap().unwrap();
        assert_eq!(DeploymentStage::of(&coin), DeploymentStage::ContractAssigned);

        deployer.publish_cast(coin.id).unwrap();
        let coin = store.get_meme_coin(coin.id).unwrap().unwrap();
        assert_eq!(DeploymentStage::of(&coin), DeploymentStage::Posted);
    }

    #[tokio::test]
    async fn test_resume_completes_partial_deployment() {
        let (deployer, store) = test_deployer();
        let coin = store
            .create_meme_coin(NewMemeCoin {
                name: "Boss Coin".to_string(),
                symbol: "BOSS".to_string(),
                image_url: "https://ipfs.io/ipfs/abc".to_string(),
                creator_address: CREATOR.to_string(),
            })
            .unwrap();

        // Simulate a crash after the contract was assigned but before the
        // cast was published.
        store
            .update_meme_coin(
                coin.id,
                MemeCoinUpdate {
                    contract_address: Some(format!("0x{}", "a".repeat(40))),
                    deployment_tx_hash: Some(format!("0x{}", "b".repeat(64))),
                    ..Default::default()
                },
            )
            .unwrap();

        let receipt = deployer.resume(coin.id).await.unwrap();

        // Existing identifiers were kept, only the cast was added.
        assert_eq!(receipt.contract_address, format!("0x{}", "a".repeat(40)));
        assert!(receipt.coin.farcaster_post_url.is_some());
    }

    #[tokio::test]
    async fn test_resume_is_idempotent() {
        let (deployer, _store) = test_deployer();
        let first = deployer.deploy(valid_input()).await.unwrap();
        let second = deployer.resume(first.coin.id).await.unwrap();

        assert_eq!(first.contract_address, second.contract_address);
        assert_eq!(first.deployment_tx_hash, second.deployment_tx_hash);
        assert_eq!(first.coin, second.coin);
    }

    #[tokio::test]
    async fn test_resume_unknown_record_fails() {
        let (deployer, _store) = test_deployer();
        let result = deployer.resume(Uuid::new_v4()).await;
        assert!(matches!(result, Err(DeployError::RecordVanished(_))));
    }
}
