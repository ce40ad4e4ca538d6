//! Error types shared by every provider module and the kit façade.
//!
//! Wallet vendors fail in wildly different shapes: some reject with
//! `{ error: { code, message } }`, some with a flat `{ code, message }`, some with a
//! bare string. [`parse_error`] folds all of them into one [`NormalizedError`] and
//! [`KitError`] carries that shape up to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::constants::{GENERIC_ERROR_CODE, UNSUPPORTED_OPERATION_CODE};

pub const UNHANDLED_WALLET_ERROR: &str = "Unhandled error from the wallet";

/// The one error shape a UI ever has to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
}

impl NormalizedError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            ext: None,
        }
    }

    pub fn with_ext(mut self, ext: Value) -> Self {
        self.ext = Some(ext);
        self
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// Convert any thrown value into a [`NormalizedError`].
///
/// Lookup order per field is nested `error.<field>` first, then the top-level
/// field. Falsy candidates (`null`, `false`, `0`, `""`) are skipped, so a wallet
/// reporting `code: 0` still ends up with the generic `-1`.
pub fn parse_error(thrown: &Value) -> NormalizedError {
    let nested = thrown.get("error");

    let code = [nested.and_then(|e| e.get("code")), thrown.get("code")]
        .into_iter()
        .flatten()
        .filter(|v| is_truthy(v))
        .find_map(as_code)
        .unwrap_or(GENERIC_ERROR_CODE);

    let message = [nested.and_then(|e| e.get("message")), thrown.get("message")]
        .into_iter()
        .flatten()
        .find(|v| is_truthy(v))
        .map(value_to_message)
        .or_else(|| match thrown {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_else(|| UNHANDLED_WALLET_ERROR.to_string());

    let ext = [nested.and_then(|e| e.get("ext")), thrown.get("ext")]
        .into_iter()
        .flatten()
        .find(|v| is_truthy(v))
        .cloned();

    NormalizedError { code, message, ext }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn as_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coarse classification of a [`KitError`], handy for `match`ing in UI code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    NoProviderSelected,
    UnknownProvider,
    ProviderUnavailable,
    UnsupportedOperation,
    UserCancelled,
    PairingRejected,
    NativeProviderError,
    InvalidNetwork,
    InvalidInput,
    Config,
    Storage,
    Http,
}

#[derive(Debug, Clone, Error)]
pub enum KitError {
    #[error("Please set the wallet first")]
    NoProviderSelected,

    #[error("Wallet id \"{0}\" is not supported")]
    UnknownProvider(String),

    #[error("{0}")]
    ProviderUnavailable(String),

    #[error("{0}")]
    UnsupportedOperation(String),

    #[error("{}", .0.message)]
    UserCancelled(NormalizedError),

    #[error("{}", .0.message)]
    PairingRejected(NormalizedError),

    #[error("{}", .0.message)]
    Native(NormalizedError),

    #[error("Wallet network \"{0}\" is not supported")]
    InvalidNetwork(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl KitError {
    /// Standard wording used by most providers for a capability they lack.
    pub fn unsupported(provider: &str, method: &str) -> Self {
        KitError::UnsupportedOperation(format!(
            "{} does not support the \"{}\" function",
            provider, method
        ))
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        KitError::ProviderUnavailable(message.into())
    }

    /// Route a rejection from a wallet's native API through the normalizer.
    pub fn from_native(thrown: Value) -> Self {
        KitError::Native(parse_error(&thrown))
    }

    pub fn cancelled(detail: NormalizedError) -> Self {
        KitError::UserCancelled(detail)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            KitError::NoProviderSelected => ErrorKind::NoProviderSelected,
            KitError::UnknownProvider(_) => ErrorKind::UnknownProvider,
            KitError::ProviderUnavailable(_) => ErrorKind::ProviderUnavailable,
            KitError::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            KitError::UserCancelled(_) => ErrorKind::UserCancelled,
            KitError::PairingRejected(_) => ErrorKind::PairingRejected,
            KitError::Native(_) => ErrorKind::NativeProviderError,
            KitError::InvalidNetwork(_) => ErrorKind::InvalidNetwork,
            KitError::InvalidInput(_) => ErrorKind::InvalidInput,
            KitError::Config(_) => ErrorKind::Config,
            KitError::Storage(_) => ErrorKind::Storage,
            KitError::Http(_) => ErrorKind::Http,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            KitError::NoProviderSelected | KitError::UnsupportedOperation(_) => {
                UNSUPPORTED_OPERATION_CODE
            }
            KitError::UserCancelled(detail)
            | KitError::PairingRejected(detail)
            | KitError::Native(detail) => detail.code,
            _ => GENERIC_ERROR_CODE,
        }
    }

    pub fn to_normalized(&self) -> NormalizedError {
        let ext = match self {
            KitError::UserCancelled(detail)
            | KitError::PairingRejected(detail)
            | KitError::Native(detail) => detail.ext.clone(),
            _ => None,
        };

        NormalizedError {
            code: self.code(),
            message: self.to_string(),
            ext,
        }
    }
}

impl From<NormalizedError> for KitError {
    fn from(err: NormalizedError) -> Self {
        KitError::Native(err)
    }
}

impl From<reqwest::Error> for KitError {
    fn from(err: reqwest::Error) -> Self {
        KitError::Http(err.to_string())
    }
}

impl From<std::io::Error> for KitError {
    fn from(err: std::io::Error) -> Self {
        KitError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for KitError {
    fn from(err: serde_json::Error) -> Self {
        KitError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KitError>;

/// Outcome of a call into a wallet's own API. The error side is whatever the
/// wallet rejected with, still unnormalized.
pub type NativeResult<T> = std::result::Result<T, Value>;
