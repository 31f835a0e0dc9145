use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Failures surfaced by the submission flow, the leaderboard and wallet plumbing.
/// The session state machine itself never fails.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("wallet not connected")]
    NotConnected,
    #[error("gateway unavailable: {0}")]
    GatewayUnavailable(String),
    #[error("wrong network, expected {expected}")]
    WrongNetwork { expected: String },
    #[error("transaction rejected: {0}")]
    TransactionRejected(String),
    #[error("a score submission is already in progress")]
    SubmissionPending,
    /// Requests that make no sense right now (e.g. submitting a zero score). Ignored, never shown.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

impl GameError {
    /// Whether the rendering layer should show this to the player.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, GameError::InvalidInput(_))
    }

    pub fn user_message(&self) -> String {
        match self {
            GameError::NotConnected => "Please connect wallet first!".to_string(),
            GameError::GatewayUnavailable(reason) => format!("Network error: {}", reason),
            GameError::WrongNetwork { expected } => {
                format!("Failed to load. Please ensure you are connected to {}.", expected)
            }
            GameError::TransactionRejected(reason) => format!("Transaction rejected: {}", reason),
            GameError::SubmissionPending => {
                "A submission is already in progress. Please wait for it to finish.".to_string()
            }
            GameError::InvalidInput(reason) => reason.to_string(),
        }
    }
}

/// Best-effort message extraction from a thrown JS value.
pub fn js_error_message(err: &JsValue, fallback: &str) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return error.message().into();
    }
    if let Ok(message) = js_sys::Reflect::get(err, &JsValue::from_str("message")) {
        if let Some(message) = message.as_string() {
            return message;
        }
    }
    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_silent() {
        assert!(!GameError::InvalidInput("score is 0").is_reportable());
        assert!(GameError::NotConnected.is_reportable());
        assert!(GameError::SubmissionPending.is_reportable());
    }

    #[test]
    fn wrong_network_names_expected_chain() {
        let err = GameError::WrongNetwork {
            expected: "Base Sepolia Testnet".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "Failed to load. Please ensure you are connected to Base Sepolia Testnet."
        );
    }
}
