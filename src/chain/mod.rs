//! Contract gateway: addresses, the read/write traits the game logic talks to,
//! and their browser implementations (JSON-RPC over fetch, injected EIP-1193 wallet).

pub mod abi;
pub mod rpc;
pub mod wallet;

use std::fmt;

use crate::error::GameError;
use crate::state::leaderboard::ScoreRecord;
use crate::util::shorten_hex;

pub use rpc::RpcClient;
pub use wallet::InjectedWallet;

/// 20-byte account address, stored lowercase with `0x` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self, GameError> {
        let body = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or(GameError::InvalidInput("address must start with 0x"))?;
        if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GameError::InvalidInput("address must be 20 hex bytes"));
        }
        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    pub fn from_bytes(bytes: &[u8; 20]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> String {
        shorten_hex(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxHash(pub String);

impl TxHash {
    /// 32-byte hash with `0x` prefix, stored lowercase.
    pub fn parse(raw: &str) -> Result<Self, GameError> {
        let body = raw
            .strip_prefix("0x")
            .ok_or(GameError::InvalidInput("tx hash must start with 0x"))?;
        if body.len() != 64 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GameError::InvalidInput("tx hash must be 32 hex bytes"));
        }
        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    pub fn short(&self) -> String {
        shorten_hex(&self.0)
    }
}

/// What the wallet currently exposes. Both fields are absent until connected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Account {
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
}

impl Account {
    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn require(&self) -> Result<&Address, GameError> {
        self.address.as_ref().ok_or(GameError::NotConnected)
    }

    /// A connected wallet on a chain other than `expected_chain`.
    pub fn on_wrong_chain(&self, expected_chain: u64) -> bool {
        matches!(self.chain_id, Some(id) if id != expected_chain)
    }
}

/// Read side of the score contract. Side-effect free; never retried automatically.
#[allow(async_fn_in_trait)]
pub trait ScoreReader {
    async fn high_score(&self, player: &Address) -> Result<u64, GameError>;
    async fn top_scores(&self) -> Result<Vec<ScoreRecord>, GameError>;
}

/// Write side: one transaction per call, then wait for it to land.
#[allow(async_fn_in_trait)]
pub trait ScoreWriter {
    /// Resolves once the wallet has signed and broadcast.
    async fn submit_score(&self, score: u64) -> Result<TxHash, GameError>;
    async fn wait_for_confirmation(&self, tx: &TxHash) -> Result<(), GameError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_parse_normalizes_case() {
        let a = Address::parse("0x52908400098527886E0F7030069857D2E4169EE7").unwrap();
        assert_eq!(a.as_str(), "0x52908400098527886e0f7030069857d2e4169ee7");
        assert_eq!(a.short(), "0x5290...9ee7");
        assert!(Address::parse("52908400098527886e0f7030069857d2e4169ee7").is_err());
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("0xzz908400098527886e0f7030069857d2e4169ee7").is_err());
    }

    #[test]
    fn tx_hash_parse_requires_32_hex_bytes() {
        let raw = format!("0x{}", "AB".repeat(32));
        let hash = TxHash::parse(&raw).unwrap();
        assert_eq!(hash.0, format!("0x{}", "ab".repeat(32)));
        assert_eq!(hash.short(), "0xabab...abab");
        assert!(TxHash::parse(&"ab".repeat(32)).is_err());
        assert!(TxHash::parse("0xfeed").is_err());
        assert!(TxHash::parse(&format!("0x{}é", "a".repeat(62))).is_err());
    }

    #[test]
    fn account_gating() {
        let mut acct = Account::default();
        assert_eq!(acct.require(), Err(GameError::NotConnected));
        assert!(!acct.on_wrong_chain(84532));
        acct.address = Some(Address::from_bytes(&[0x11; 20]));
        acct.chain_id = Some(8453);
        assert!(acct.require().is_ok());
        assert!(acct.on_wrong_chain(84532));
        assert!(!acct.on_wrong_chain(8453));
    }
}
