use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use super::module::decode_native;
use super::{ModuleContext, WalletModule};
use crate::errors::{KitError, NativeResult, Result};
use crate::types::{
    AddressResponse, Capability, ModuleType, NetworkDetails, ProviderDescriptor,
    SignRequestOptions, SignedAuthEntry, SignedMessage, SignedTransaction, WalletNetwork,
};

pub const HOTWALLET_ID: &str = "hot-wallet";

/// HOT Wallet SDK request channel.
#[async_trait]
pub trait HotWalletApi: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> NativeResult<Value>;
}

pub struct HotWalletModule {
    descriptor: ProviderDescriptor,
    api: Arc<dyn HotWalletApi>,
}

impl HotWalletModule {
    pub fn new(api: Arc<dyn HotWalletApi>) -> Self {
        Self {
            descriptor: ProviderDescriptor::new(
                HOTWALLET_ID,
                "HOT Wallet",
                "https://storage.herewallet.app/logo.png",
                "https://hot-labs.org/wallet",
                ModuleType::HotWallet,
            ),
            api,
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        self.api
            .request(method, params)
            .await
            .map_err(KitError::from_native)
    }
}

#[async_trait]
impl WalletModule for HotWalletModule {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[
            Capability::GetAddress,
            Capability::SignTransaction,
            Capability::SignAuthEntry,
            Capability::SignMessage,
            Capability::GetNetwork,
        ]
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn get_address(&self, _ctx: &ModuleContext, _opts: &SignRequestOptions) -> Result<AddressResponse> {
        let answer = self.call("stellar:getAddress", json!({})).await?;
        decode_native("HOT Wallet", answer)
    }

    async fn sign_transaction(
        &self,
        _ctx: &ModuleContext,
        xdr: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedTransaction> {
        let answer = self
            .call(
                "stellar:signTransaction",
                json!({ "xdr": xdr, "accountToSign": opts.address }),
            )
            .await?;
        decode_native("HOT Wallet", answer)
    }

    async fn sign_auth_entry(
        &self,
        _ctx: &ModuleContext,
        auth_entry: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedAuthEntry> {
        let answer = self
            .call(
                "stellar:signAuthEntry",
                json!({ "authEntry": auth_entry, "accountToSign": opts.address }),
            )
            .await?;
        decode_native("HOT Wallet", answer)
    }

    async fn sign_message(
        &self,
        _ctx: &ModuleContext,
        message: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedMessage> {
        let answer = self
            .call(
                "stellar:signMessage",
                json!({ "message": message, "accountToSign": opts.address }),
            )
            .await?;
        decode_native("HOT Wallet", answer)
    }

    /// HOT only operates on the public network.
    async fn get_network(&self, _ctx: &ModuleContext) -> Result<NetworkDetails> {
        Ok(NetworkDetails {
            network: "mainnet".to_string(),
            network_passphrase: WalletNetwork::Public.passphrase().to_string(),
        })
    }
}
