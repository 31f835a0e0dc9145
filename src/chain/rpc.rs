// JSON-RPC reads against the configured node, posted with fetch.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use super::{Address, ScoreReader, TxHash, abi};
use crate::config::GameConfig;
use crate::error::{GameError, js_error_message};
use crate::state::leaderboard::ScoreRecord;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u32,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Pull `result` out of a JSON-RPC response body. A null result is passed through.
pub fn parse_rpc_response(body: &str) -> Result<Value, GameError> {
    let resp: RpcResponse = serde_json::from_str(body)
        .map_err(|e| GameError::GatewayUnavailable(format!("bad RPC response: {}", e)))?;
    if let Some(err) = resp.error {
        return Err(GameError::GatewayUnavailable(format!(
            "RPC error {}: {}",
            err.code, err.message
        )));
    }
    Ok(resp.result.unwrap_or(Value::Null))
}

/// Receipt `status`: `Some(true)` mined ok, `Some(false)` reverted, `None` still pending.
pub fn receipt_status(result: &Value) -> Result<Option<bool>, GameError> {
    if result.is_null() {
        return Ok(None);
    }
    match result.get("status").and_then(Value::as_str) {
        Some("0x1") => Ok(Some(true)),
        Some("0x0") => Ok(Some(false)),
        Some(other) => Err(GameError::GatewayUnavailable(format!(
            "unexpected receipt status {}",
            other
        ))),
        None => Err(GameError::GatewayUnavailable("receipt without status".to_string())),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RpcClient {
    url: String,
    contract: Address,
}

impl RpcClient {
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        Ok(Self {
            url: config.rpc_url.clone(),
            contract: config.contract()?,
        })
    }

    pub fn contract(&self) -> &Address {
        &self.contract
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, GameError> {
        let body = serde_json::to_string(&RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        })
        .map_err(|e| GameError::GatewayUnavailable(e.to_string()))?;
        let text = post_json(&self.url, &body)
            .await
            .map_err(|e| GameError::GatewayUnavailable(js_error_message(&e, "request failed")))?;
        parse_rpc_response(&text)
    }

    async fn eth_call(&self, data: String) -> Result<String, GameError> {
        let result = self
            .call(
                "eth_call",
                json!([{ "to": self.contract.as_str(), "data": data }, "latest"]),
            )
            .await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| GameError::GatewayUnavailable("eth_call returned no data".to_string()))
    }

    pub async fn receipt(&self, tx: &TxHash) -> Result<Option<bool>, GameError> {
        let result = self.call("eth_getTransactionReceipt", json!([tx.0])).await?;
        receipt_status(&result)
    }
}

impl ScoreReader for RpcClient {
    async fn high_score(&self, player: &Address) -> Result<u64, GameError> {
        let raw = self.eth_call(abi::encode_get_high_score(player)).await?;
        abi::decode_uint(&raw)
    }

    async fn top_scores(&self) -> Result<Vec<ScoreRecord>, GameError> {
        let raw = self.eth_call(abi::encode_get_top_scores()).await?;
        abi::decode_score_records(&raw)
    }
}

async fn post_json(url: &str, body: &str) -> Result<String, wasm_bindgen::JsValue> {
    let window = web_sys::window().ok_or_else(|| wasm_bindgen::JsValue::from_str("no window"))?;
    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&wasm_bindgen::JsValue::from_str(body));
    let request = Request::new_with_str_and_init(url, &init)?;
    let response = JsFuture::from(window.fetch_with_request(&request)).await?;
    let response: Response = response.dyn_into()?;
    let text = JsFuture::from(response.text()?).await?;
    if !response.ok() {
        let message = text
            .as_string()
            .unwrap_or_else(|| format!("HTTP {}", response.status()));
        return Err(wasm_bindgen::JsValue::from_str(&message));
    }
    Ok(text.as_string().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_result_and_error() {
        assert_eq!(
            parse_rpc_response(r#"{"jsonrpc":"2.0","id":1,"result":"0x2a"}"#),
            Ok(json!("0x2a"))
        );
        let err = parse_rpc_response(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"execution reverted"}}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            GameError::GatewayUnavailable("RPC error -32000: execution reverted".to_string())
        );
        assert!(parse_rpc_response("<html>").is_err());
    }

    #[test]
    fn receipt_states() {
        assert_eq!(receipt_status(&Value::Null), Ok(None));
        assert_eq!(receipt_status(&json!({"status": "0x1"})), Ok(Some(true)));
        assert_eq!(receipt_status(&json!({"status": "0x0"})), Ok(Some(false)));
        assert!(receipt_status(&json!({"blockHash": "0x00"})).is_err());
    }
}
