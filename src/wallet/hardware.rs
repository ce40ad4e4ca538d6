//! Pieces shared by the Ledger and Trezor adapters.

use crate::constants::STELLAR_COIN_TYPE;
use crate::errors::{KitError, NativeResult, Result};
use crate::types::SignRequestOptions;
use crate::utils::Validator;
use crate::wallet::ModuleContext;

/// Ledger-style path for account `index`: `44'/148'/{index}'`.
pub fn ledger_derivation_path(index: u32) -> String {
    format!("44'/{}'/{}'", STELLAR_COIN_TYPE, index)
}

/// Trezor-style path for account `index`: `m/44'/148'/{index}'`.
pub fn trezor_derivation_path(index: u32) -> String {
    format!("m/{}", ledger_derivation_path(index))
}

/// Transaction decoding and signature attachment, supplied by the host's
/// Stellar SDK binding. The kit never looks inside the XDR itself.
pub trait TransactionCodec: Send + Sync {
    fn decode(&self, xdr: &str, network_passphrase: &str) -> NativeResult<Box<dyn TransactionEnvelope>>;
}

pub trait TransactionEnvelope: Send {
    /// Network id followed by the tagged transaction, as signed by wallets.
    fn signature_base(&self) -> Vec<u8>;

    fn add_signature(&mut self, public_key: &str, signature_base64: &str) -> NativeResult<()>;

    fn to_xdr(&self) -> String;
}

/// Which key a hardware signature request should use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningTarget {
    pub path: String,
    /// Known up front when the address came out of the account cache.
    pub public_key: Option<String>,
}

/// Resolve the signing path, in order: the explicit `path` option, the cached
/// account matching `address`, then the path bound by account selection.
pub fn resolve_signing_target(
    ctx: &ModuleContext,
    opts: &SignRequestOptions,
    path_for_index: fn(u32) -> String,
    not_loaded_message: &str,
) -> Result<SigningTarget> {
    if let Some(path) = &opts.path {
        Validator::validate_derivation_path(path)?;
        return Ok(SigningTarget {
            path: path.clone(),
            public_key: None,
        });
    }

    if let Some(address) = &opts.address {
        let account = ctx
            .hardware_accounts()
            .into_iter()
            .find(|a| &a.public_key == address)
            .ok_or_else(|| KitError::unavailable(not_loaded_message))?;
        return Ok(SigningTarget {
            path: path_for_index(account.index),
            public_key: Some(account.public_key),
        });
    }

    let path = ctx.derivation_path().ok_or_else(|| {
        KitError::unavailable("There is no path available, please call the `getAddress` method first.")
    })?;
    Ok(SigningTarget {
        path,
        public_key: None,
    })
}
