use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ModuleContext, WalletModule};
use crate::errors::{KitError, NativeResult, Result};
use crate::types::{
    AddressResponse, Capability, ModuleType, NetworkDetails, ProviderDescriptor,
    SignRequestOptions, SignedAuthEntry, SignedMessage, SignedTransaction, WalletNetwork,
};

pub const ALBEDO_ID: &str = "albedo";

/// Albedo only distinguishes these two networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbedoNetwork {
    Public,
    Testnet,
}

impl AlbedoNetwork {
    pub fn from_passphrase(passphrase: &str) -> Self {
        if WalletNetwork::is_public(passphrase) {
            AlbedoNetwork::Public
        } else {
            AlbedoNetwork::Testnet
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbedoTxIntent {
    pub xdr: String,
    pub pubkey: Option<String>,
    pub network: Option<AlbedoNetwork>,
}

/// Albedo intent API.
#[async_trait]
pub trait AlbedoApi: Send + Sync {
    /// Returns the chosen account's public key.
    async fn public_key(&self) -> NativeResult<String>;

    /// Returns the signed envelope XDR.
    async fn tx(&self, intent: AlbedoTxIntent) -> NativeResult<String>;
}

pub struct AlbedoModule {
    descriptor: ProviderDescriptor,
    api: Arc<dyn AlbedoApi>,
}

impl AlbedoModule {
    pub fn new(api: Arc<dyn AlbedoApi>) -> Self {
        Self {
            descriptor: ProviderDescriptor::new(
                ALBEDO_ID,
                "Albedo",
                "https://stellar.creit.tech/wallet-icons/albedo.png",
                "https://albedo.link/",
                ModuleType::HotWallet,
            ),
            api,
        }
    }
}

#[async_trait]
impl WalletModule for AlbedoModule {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::GetAddress, Capability::SignTransaction]
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn get_address(&self, _ctx: &ModuleContext, _opts: &SignRequestOptions) -> Result<AddressResponse> {
        let address = self.api.public_key().await.map_err(KitError::from_native)?;
        Ok(AddressResponse { address })
    }

    async fn sign_transaction(
        &self,
        _ctx: &ModuleContext,
        xdr: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedTransaction> {
        let intent = AlbedoTxIntent {
            xdr: xdr.to_string(),
            pubkey: opts.address.clone(),
            network: opts
                .network_passphrase
                .as_deref()
                .map(AlbedoNetwork::from_passphrase),
        };

        let signed_tx_xdr = self.api.tx(intent).await.map_err(KitError::from_native)?;
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
        Err(KitError::unsupported("Albedo", "signAuthEntry"))
    }

    // Albedo can sign messages, but not in the SEP-43 shape.
    async fn sign_message(
        &self,
        _ctx: &ModuleContext,
        _message: &str,
        _opts: &SignRequestOptions,
    ) -> Result<SignedMessage> {
        Err(KitError::unsupported("Albedo", "signMessage"))
    }

    async fn get_network(&self, _ctx: &ModuleContext) -> Result<NetworkDetails> {
        Err(KitError::unsupported("Albedo", "getNetwork"))
    }
}
