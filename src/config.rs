use serde::{Deserialize, Serialize};

use crate::chain::Address;
use crate::error::GameError;
use crate::util::cwarn;

pub const CONFIG_STORAGE_KEY: &str = "wam_config";

pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84532;

/// Runtime settings. Every field has a default so partial JSON overrides merge cleanly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Spawner period in milliseconds.
    pub tick_ms: u32,
    pub max_misses: u32,
    pub grid_cells: u8,
    pub leaderboard_limit: usize,
    pub contract_address: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub explorer_url: String,
    pub receipt_poll_ms: u32,
    pub receipt_max_polls: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_ms: 800,
            max_misses: 5,
            grid_cells: 9,
            leaderboard_limit: 100,
            contract_address: "0x0000000000000000000000000000000000000000".to_string(),
            chain_id: BASE_SEPOLIA_CHAIN_ID,
            rpc_url: "https://base-sepolia-rpc.publicnode.com".to_string(),
            explorer_url: "https://sepolia.basescan.org".to_string(),
            receipt_poll_ms: 2000,
            receipt_max_polls: 90,
        }
    }
}

impl GameConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Defaults merged with the JSON override in localStorage, if any.
    pub fn load() -> Self {
        let Some(store) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return Self::default();
        };
        match store.get_item(CONFIG_STORAGE_KEY) {
            Ok(Some(raw)) => match Self::from_json(&raw) {
                Ok(cfg) => cfg,
                Err(e) => {
                    cwarn(&format!("config: ignoring malformed {} ({})", CONFIG_STORAGE_KEY, e));
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    pub fn contract(&self) -> Result<Address, GameError> {
        Address::parse(&self.contract_address)
    }

    pub fn network_name(&self) -> &'static str {
        network_name(Some(self.chain_id))
    }

    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }
}

pub fn network_name(chain_id: Option<u64>) -> &'static str {
    if chain_id == Some(BASE_SEPOLIA_CHAIN_ID) {
        "Base Sepolia Testnet"
    } else {
        "Base Mainnet"
    }
}
