use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::{ModuleContext, WalletModule};
use crate::errors::{KitError, NativeResult, Result};
use crate::types::{
    AddressResponse, Capability, ModuleType, NetworkDetails, ProviderDescriptor,
    SignRequestOptions, SignedAuthEntry, SignedMessage, SignedTransaction,
};

pub const XBULL_ID: &str = "xbull";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XBullSignRequest {
    pub xdr: String,
    pub public_key: Option<String>,
    pub network: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XBullMessageOptions {
    pub address: Option<String>,
    pub network_passphrase: Option<String>,
}

/// One short-lived connection to the xBull wallet.
#[async_trait]
pub trait XBullBridge: Send + Sync {
    async fn connect(&self) -> NativeResult<String>;

    async fn sign(&self, request: XBullSignRequest) -> NativeResult<String>;

    async fn sign_message(
        &self,
        message: &str,
        opts: &XBullMessageOptions,
    ) -> NativeResult<SignedMessage>;

    fn close_connections(&self);
}

/// Opens a fresh bridge for every request.
pub trait XBullConnector: Send + Sync {
    fn open(&self) -> Box<dyn XBullBridge>;
}

pub struct XBullModule {
    descriptor: ProviderDescriptor,
    connector: Arc<dyn XBullConnector>,
}

impl XBullModule {
    pub fn new(connector: Arc<dyn XBullConnector>) -> Self {
        Self {
            descriptor: ProviderDescriptor::new(
                XBULL_ID,
                "xBull",
                "https://stellar.creit.tech/wallet-icons/xbull.png",
                "https://xbull.app",
                ModuleType::HotWallet,
            ),
            connector,
        }
    }
}

/// Closes the bridge whether or not the request succeeded.
fn finish<T>(bridge: Box<dyn XBullBridge>, outcome: NativeResult<T>) -> Result<T> {
    bridge.close_connections();
    debug!("xBull bridge closed");
    outcome.map_err(KitError::from_native)
}

#[async_trait]
impl WalletModule for XBullModule {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[
            Capability::GetAddress,
            Capability::SignTransaction,
            Capability::SignMessage,
        ]
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn get_address(&self, _ctx: &ModuleContext, _opts: &SignRequestOptions) -> Result<AddressResponse> {
        let bridge = self.connector.open();
        let outcome = bridge.connect().await;
        let address = finish(bridge, outcome)?;
        Ok(AddressResponse { address })
    }

    async fn sign_transaction(
        &self,
        _ctx: &ModuleContext,
        xdr: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedTransaction> {
        let bridge = self.connector.open();
        let outcome = bridge
            .sign(XBullSignRequest {
                xdr: xdr.to_string(),
                public_key: opts.address.clone(),
                network: opts.network_passphrase.clone(),
            })
            .await;
        let signed_tx_xdr = finish(bridge, outcome)?;

        Ok(SignedTransaction {
            signed_tx_xdr,
            signer_address: opts.address.clone(),
        })
    }

    async fn sign_auth_entry(
        &self,
        _ctx: &ModuleContext,
        _auth_entry: &str,
        _opts: &SignRequestOptions,
    ) -> Result<SignedAuthEntry> {
        Err(KitError::unsupported("xBull", "signAuthEntry"))
    }

    async fn sign_message(
        &self,
        _ctx: &ModuleContext,
        message: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedMessage> {
        let bridge = self.connector.open();
        let message_opts = XBullMessageOptions {
            address: opts.address.clone(),
            network_passphrase: opts.network_passphrase.clone(),
        };
        let outcome = bridge.sign_message(message, &message_opts).await;
        finish(bridge, outcome)
    }

    async fn get_network(&self, _ctx: &ModuleContext) -> Result<NetworkDetails> {
        Err(KitError::unsupported("xBull", "getNetwork"))
    }
}
