//! Synthetic identifiers for the stubbed collaborators.
//!
//! Nothing here talks to a chain, an IPFS node, or a social network.  Every
//! function fabricates an identifier with the right shape so the rest of the
//! system can treat the stub exactly like the real service it stands in for.

use rand::RngCore;
use uuid::Uuid;

/// Gateway prefix used for fabricated content addresses.
const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs";

/// Block explorer for the target chain.
const BASESCAN: &str = "https://basescan.org/address";

/// Fabricate a content-address URL for an uploaded image.
///
/// The identifier is random, not derived from the payload.
pub fn content_address_url() -> String {
    format!("{IPFS_GATEWAY}/{}", Uuid::new_v4())
}

/// Fabricate an Ethereum-style contract address: `0x` + 40 lowercase hex.
pub fn contract_address() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

/// Fabricate a transaction hash: `0x` + 64 lowercase hex (32 bytes).
pub fn transaction_hash() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

/// Block-explorer page for a contract address.
pub fn basescan_url(contract_address: &str) -> String {
    format!("{BASESCAN}/{contract_address}")
}

/// Warpcast compose link announcing a freshly deployed token.
pub fn cast_url(name: &str, symbol: &str) -> String {
    format!(
        "https://warpcast.com/~/compose?text=Just deployed my meme coin: {name} (${symbol}) on Base! 🚀"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_lower_hex(s: &str) -> bool {
        s.bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }

    #[test]
    fn test_contract_address_shape() {
        let addr = contract_address();
        let hex_part = addr.strip_prefix("0x").unwrap();
        assert_eq!(hex_part.len(), 40);
        assert!(is_lower_hex(hex_part));
    }

    #[test]
    fn test_transaction_hash_shape() {
        let hash = transaction_hash();
        let hex_part = hash.strip_prefix("0x").unwrap();
        assert_eq!(hex_part.len(), 64);
        assert!(is_lower_hex(hex_part));
    }

    #[test]
    fn test_identifiers_are_unique() {
        assert_ne!(contract_address(), contract_address());
        assert_ne!(transaction_hash(), transaction_hash());
        assert_ne!(content_address_url(), content_address_url());
    }

    #[test]
    fn test_content_address_is_gateway_url() {
        assert!(content_address_url().starts_with("https://ipfs.io/ipfs/"));
    }

    #[test]
    fn test_basescan_url_embeds_contract() {
        let url = basescan_url("0xabc");
        assert_eq!(url, "https://basescan.org/address/0xabc");
    }

    #[test]
    fn test_cast_url_mentions_token() {
        let url = cast_url("Boss Coin", "BOSS");
        assert!(url.contains("Boss Coin"));
        assert!(url.contains("$BOSS"));
    }
}
