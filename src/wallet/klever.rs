use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::module::decode_native;
use super::{ModuleContext, WalletModule};
use crate::errors::{KitError, NativeResult, Result};
use crate::types::{
    AddressResponse, Capability, ModuleType, NetworkDetails, ProviderDescriptor,
    SignRequestOptions, SignedAuthEntry, SignedMessage, SignedTransaction,
};

pub const KLEVER_ID: &str = "klever";

/// `kleverWallet.stellar`. Answers already use the kit's response shapes and
/// are decoded as such.
#[async_trait]
pub trait KleverApi: Send + Sync {
    fn is_injected(&self) -> bool;

    async fn get_address(&self) -> NativeResult<Value>;

    async fn sign_transaction(&self, xdr: &str, opts: &SignRequestOptions) -> NativeResult<Value>;

    async fn sign_auth_entry(&self, auth_entry: &str, opts: &SignRequestOptions) -> NativeResult<Value>;

    async fn sign_message(&self, message: &str, opts: &SignRequestOptions) -> NativeResult<Value>;

    async fn get_network(&self) -> NativeResult<Value>;
}

pub struct KleverModule {
    descriptor: ProviderDescriptor,
    api: Arc<dyn KleverApi>,
}

impl KleverModule {
    pub fn new(api: Arc<dyn KleverApi>) -> Self {
        Self {
            descriptor: ProviderDescriptor::new(
                KLEVER_ID,
                "Klever Wallet",
                "https://stellar.creit.tech/wallet-icons/klever.png",
                "https://klever.io/",
                ModuleType::HotWallet,
            ),
            api,
        }
    }

    fn run_checks(&self) -> Result<()> {
        if !self.api.is_injected() {
            return Err(KitError::unavailable("Klever Wallet is not installed"));
        }
        Ok(())
    }
}

#[async_trait]
impl WalletModule for KleverModule {
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
        self.api.is_injected()
    }

    async fn get_address(&self, _ctx: &ModuleContext, _opts: &SignRequestOptions) -> Result<AddressResponse> {
        self.run_checks()?;
        let answer = self.api.get_address().await.map_err(KitError::from_native)?;
        decode_native("Klever Wallet", answer)
    }

    async fn sign_transaction(
        &self,
        _ctx: &ModuleContext,
        xdr: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedTransaction> {
        self.run_checks()?;
        let answer = self
            .api
            .sign_transaction(xdr, opts)
            .await
            .map_err(KitError::from_native)?;
        decode_native("Klever Wallet", answer)
    }

    async fn sign_auth_entry(
        &self,
        _ctx: &ModuleContext,
        auth_entry: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedAuthEntry> {
        self.run_checks()?;
        let answer = self
            .api
            .sign_auth_entry(auth_entry, opts)
            .await
            .map_err(KitError::from_native)?;
        decode_native("Klever Wallet", answer)
    }

    async fn sign_message(
        &self,
        _ctx: &ModuleContext,
        message: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedMessage> {
        self.run_checks()?;
        let answer = self
            .api
            .sign_message(message, opts)
            .await
            .map_err(KitError::from_native)?;
        decode_native("Klever Wallet", answer)
    }

    async fn get_network(&self, _ctx: &ModuleContext) -> Result<NetworkDetails> {
        self.run_checks()?;
        let answer = self.api.get_network().await.map_err(KitError::from_native)?;
        decode_native("Klever Wallet", answer)
    }
}
