// Injected EIP-1193 provider (window.ethereum): accounts, chain id, score writes.

use gloo_timers::future::TimeoutFuture;
use js_sys::{Function, JSON, Object, Promise, Reflect};
use serde_json::{Value, json};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::{Account, Address, RpcClient, ScoreWriter, TxHash, abi};
use crate::config::GameConfig;
use crate::error::{GameError, js_error_message};
use crate::util::{clog, cwarn};

/// EIP-1193 "user rejected request".
const USER_REJECTED: f64 = 4001.0;

/// Provider events after which the exposed account must be re-read.
const ACCOUNT_EVENTS: [&str; 2] = ["accountsChanged", "chainChanged"];

fn provider_error(err: JsValue) -> GameError {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());
    let message = js_error_message(&err, "wallet request failed");
    if code == Some(USER_REJECTED) {
        GameError::TransactionRejected(message)
    } else {
        GameError::GatewayUnavailable(message)
    }
}

fn parse_chain_id(raw: &Value) -> Option<u64> {
    raw.as_str()
        .and_then(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).ok())
}

fn first_address(raw: &Value) -> Option<Address> {
    raw.as_array()?
        .first()?
        .as_str()
        .and_then(|s| Address::parse(s).ok())
}

/// Account as the provider reports it right now. An empty account list means disconnected.
fn account_from(accounts: &Value, chain_id: &Value) -> Account {
    Account {
        address: first_address(accounts),
        chain_id: parse_chain_id(chain_id),
    }
}

fn listener_call(
    provider: &Object,
    method: &str,
    event: &str,
    callback: &Closure<dyn FnMut(JsValue)>,
) -> Result<(), GameError> {
    let f: Function = Reflect::get(provider, &JsValue::from_str(method))
        .map_err(provider_error)?
        .dyn_into()
        .map_err(|_| GameError::GatewayUnavailable(format!("provider has no {}()", method)))?;
    f.call2(provider, &JsValue::from_str(event), callback.as_ref())
        .map_err(provider_error)?;
    Ok(())
}

/// Live subscription to account and chain switches made in the wallet.
/// Dropping it removes the listeners.
pub struct AccountWatch {
    provider: Object,
    callback: Closure<dyn FnMut(JsValue)>,
}

impl Drop for AccountWatch {
    fn drop(&mut self) {
        for event in ACCOUNT_EVENTS {
            if let Err(e) = listener_call(&self.provider, "removeListener", event, &self.callback) {
                cwarn(&format!("wallet: removeListener({}) failed: {}", event, e));
            }
        }
    }
}

#[derive(Clone)]
pub struct InjectedWallet {
    provider: Object,
    rpc: RpcClient,
    config: GameConfig,
}

impl InjectedWallet {
    /// Fails with `NotConnected` when the page has no injected provider.
    pub fn detect(config: &GameConfig) -> Result<Self, GameError> {
        let window = web_sys::window().ok_or(GameError::NotConnected)?;
        let provider = Reflect::get(&window, &JsValue::from_str("ethereum"))
            .ok()
            .filter(|p| !p.is_undefined() && !p.is_null())
            .ok_or(GameError::NotConnected)?;
        Ok(Self {
            provider: provider.unchecked_into(),
            rpc: RpcClient::new(config)?,
            config: config.clone(),
        })
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, GameError> {
        let args = json!({ "method": method, "params": params }).to_string();
        let args = JSON::parse(&args).map_err(provider_error)?;
        let request: Function = Reflect::get(&self.provider, &JsValue::from_str("request"))
            .map_err(provider_error)?
            .dyn_into()
            .map_err(|_| GameError::GatewayUnavailable("provider has no request()".to_string()))?;
        let promise: Promise = request
            .call1(&self.provider, &args)
            .map_err(provider_error)?
            .dyn_into()
            .map_err(|_| GameError::GatewayUnavailable("request() did not return a promise".to_string()))?;
        let result = JsFuture::from(promise).await.map_err(provider_error)?;
        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        let text = JSON::stringify(&result)
            .map_err(provider_error)?
            .as_string()
            .unwrap_or_default();
        serde_json::from_str(&text).map_err(|e| GameError::GatewayUnavailable(e.to_string()))
    }

    async fn chain_id(&self) -> Result<Option<u64>, GameError> {
        Ok(parse_chain_id(&self.request("eth_chainId", json!([])).await?))
    }

    /// Already-authorized account, without prompting.
    pub async fn current_account(&self) -> Result<Account, GameError> {
        let accounts = self.request("eth_accounts", json!([])).await?;
        let chain_id = self.request("eth_chainId", json!([])).await?;
        Ok(account_from(&accounts, &chain_id))
    }

    /// Call `on_change` whenever the wallet switches account or chain.
    pub fn watch_account(&self, on_change: impl Fn() + 'static) -> Result<AccountWatch, GameError> {
        let callback = Closure::wrap(Box::new(move |_payload: JsValue| on_change())
            as Box<dyn FnMut(JsValue)>);
        for event in ACCOUNT_EVENTS {
            listener_call(&self.provider, "on", event, &callback)?;
        }
        Ok(AccountWatch {
            provider: self.provider.clone(),
            callback,
        })
    }

    /// Prompt for access, then ask the wallet to move to the configured chain.
    pub async fn connect(&self) -> Result<Account, GameError> {
        let accounts = self.request("eth_requestAccounts", json!([])).await?;
        let address = first_address(&accounts).ok_or(GameError::NotConnected)?;
        let wanted = format!("0x{:x}", self.config.chain_id);
        if let Err(e) = self
            .request("wallet_switchEthereumChain", json!([{ "chainId": wanted }]))
            .await
        {
            // Leaving the wallet on another chain is recoverable; reads still go to our RPC.
            clog(&format!("wallet switch_chain failed: {}", e));
        }
        let account = Account {
            address: Some(address),
            chain_id: self.chain_id().await?,
        };
        clog(&format!(
            "wallet connected address={} chain_id={:?}",
            account.address.as_ref().map(Address::short).unwrap_or_default(),
            account.chain_id
        ));
        Ok(account)
    }
}

impl ScoreWriter for InjectedWallet {
    async fn submit_score(&self, score: u64) -> Result<TxHash, GameError> {
        let account = self.current_account().await?;
        let from = account.require()?;
        let tx = json!([{
            "from": from.as_str(),
            "to": self.rpc.contract().as_str(),
            "data": abi::encode_submit_score(score),
        }]);
        let hash = self.request("eth_sendTransaction", tx).await?;
        let hash = hash
            .as_str()
            .ok_or_else(|| GameError::GatewayUnavailable("wallet returned no tx hash".to_string()))?;
        TxHash::parse(hash)
            .map_err(|_| GameError::GatewayUnavailable("wallet returned a malformed tx hash".to_string()))
    }

    async fn wait_for_confirmation(&self, tx: &TxHash) -> Result<(), GameError> {
        for _ in 0..self.config.receipt_max_polls {
            match self.rpc.receipt(tx).await {
                Ok(Some(true)) => return Ok(()),
                Ok(Some(false)) => {
                    return Err(GameError::TransactionRejected("reverted on chain".to_string()));
                }
                Ok(None) => {}
                // a flaky poll is not fatal; keep waiting until the budget runs out
                Err(e) => clog(&format!("receipt poll tx={} err={}", tx.short(), e)),
            }
            TimeoutFuture::new(self.config.receipt_poll_ms).await;
        }
        Err(GameError::GatewayUnavailable(
            "timed out waiting for confirmation".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_hex() {
        assert_eq!(parse_chain_id(&json!("0x14a34")), Some(84532));
        assert_eq!(parse_chain_id(&json!("0x2105")), Some(8453));
        assert_eq!(parse_chain_id(&Value::Null), None);
    }

    #[test]
    fn first_address_picks_head() {
        let accounts = json!([
            "0x52908400098527886E0F7030069857D2E4169EE7",
            "0x0000000000000000000000000000000000000001"
        ]);
        assert_eq!(
            first_address(&accounts).map(|a| a.short()),
            Some("0x5290...9ee7".to_string())
        );
        assert_eq!(first_address(&json!([])), None);
    }

    #[test]
    fn wallet_side_switches_reach_the_account() {
        let player = "0x52908400098527886E0F7030069857D2E4169EE7";
        let before = account_from(&json!([player]), &json!("0x14a34"));
        assert!(before.is_connected());
        assert!(!before.on_wrong_chain(84532));

        let switched = account_from(&json!([player]), &json!("0x2105"));
        assert!(switched.on_wrong_chain(84532));

        let locked = account_from(&json!([]), &json!("0x14a34"));
        assert_eq!(locked.require(), Err(GameError::NotConnected));
        assert_eq!(ACCOUNT_EVENTS, ["accountsChanged", "chainChanged"]);
    }
}
