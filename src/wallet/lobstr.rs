use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use super::{ModuleContext, WalletModule};
use crate::errors::{KitError, NativeResult, Result};
use crate::types::{
    AddressResponse, Capability, ModuleType, NetworkDetails, ProviderDescriptor,
    SignRequestOptions, SignedAuthEntry, SignedMessage, SignedTransaction,
};

pub const LOBSTR_ID: &str = "lobstr";

/// LOBSTR signer extension API.
#[async_trait]
pub trait LobstrApi: Send + Sync {
    async fn is_connected(&self) -> bool;

    async fn get_public_key(&self) -> NativeResult<String>;

    /// Signs with whatever account and network the extension has active.
    async fn sign_transaction(&self, xdr: &str) -> NativeResult<String>;
}

pub struct LobstrModule {
    descriptor: ProviderDescriptor,
    api: Arc<dyn LobstrApi>,
}

impl LobstrModule {
    pub fn new(api: Arc<dyn LobstrApi>) -> Self {
        Self {
            descriptor: ProviderDescriptor::new(
                LOBSTR_ID,
                "LOBSTR",
                "https://stellar.creit.tech/wallet-icons/lobstr.png",
                "https://lobstr.co",
                ModuleType::HotWallet,
            ),
            api,
        }
    }

    async fn run_checks(&self) -> Result<()> {
        if !self.api.is_connected().await {
            return Err(KitError::unavailable("Lobstr is not connected"));
        }
        Ok(())
    }
}

#[async_trait]
impl WalletModule for LobstrModule {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::GetAddress, Capability::SignTransaction]
    }

    async fn is_available(&self) -> bool {
        self.api.is_connected().await
    }

    async fn get_address(&self, _ctx: &ModuleContext, _opts: &SignRequestOptions) -> Result<AddressResponse> {
        self.run_checks().await?;
        let address = self.api.get_public_key().await.map_err(KitError::from_native)?;
        Ok(AddressResponse { address })
    }

    /// `address` and `network_passphrase` are ignored with a warning.
    async fn sign_transaction(
        &self,
        _ctx: &ModuleContext,
        xdr: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedTransaction> {
        self.run_checks().await?;

        if opts.address.is_some() {
            warn!("Lobstr doesn't allow specifying what public key should sign the transaction, we skip the value");
        }
        if opts.network_passphrase.is_some() {
            warn!("Lobstr doesn't allow specifying the network that should be used, we skip the value");
        }

        let signed_tx_xdr = self.api.sign_transaction(xdr).await.map_err(KitError::from_native)?;
        Ok(SignedTransaction {
            signed_tx_xdr,
            signer_address: None,
        })
    }

    async fn sign_auth_entry(
        &self,
        _ctx: &ModuleContext,
        _auth_entry: &str,
        _opts: &SignRequestOptions,
    ) -> Result<SignedAuthEntry> {
        Err(KitError::unsupported("Lobstr", "signAuthEntry"))
    }

    async fn sign_message(
        &self,
        _ctx: &ModuleContext,
        _message: &str,
        _opts: &SignRequestOptions,
    ) -> Result<SignedMessage> {
        Err(KitError::unsupported("Lobstr", "signMessage"))
    }

    async fn get_network(&self, _ctx: &ModuleContext) -> Result<NetworkDetails> {
        Err(KitError::unsupported("Lobstr", "getNetwork"))
    }
}
