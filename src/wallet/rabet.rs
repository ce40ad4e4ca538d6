use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::{ModuleContext, WalletModule};
use crate::constants::RABET_INJECTION_DELAY;
use crate::errors::{KitError, NativeResult, Result};
use crate::types::{
    AddressResponse, Capability, ModuleType, NetworkDetails, ProviderDescriptor,
    SignRequestOptions, SignedAuthEntry, SignedMessage, SignedTransaction, WalletNetwork,
};

pub const RABET_ID: &str = "rabet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RabetNetwork {
    Mainnet,
    Testnet,
}

impl RabetNetwork {
    pub fn from_passphrase(passphrase: Option<&str>) -> Self {
        match passphrase {
            Some(p) if WalletNetwork::is_public(p) => RabetNetwork::Mainnet,
            _ => RabetNetwork::Testnet,
        }
    }
}

/// The `rabet` global the extension injects.
#[async_trait]
pub trait RabetApi: Send + Sync {
    fn is_injected(&self) -> bool;

    async fn connect(&self) -> NativeResult<String>;

    /// Returns the signed XDR, or nothing when the extension gave no answer.
    async fn sign(&self, xdr: &str, network: RabetNetwork) -> NativeResult<Option<String>>;
}

pub struct RabetModule {
    descriptor: ProviderDescriptor,
    api: Arc<dyn RabetApi>,
}

impl RabetModule {
    pub fn new(api: Arc<dyn RabetApi>) -> Self {
        Self {
            descriptor: ProviderDescriptor::new(
                RABET_ID,
                "Rabet",
                "https://stellar.creit.tech/wallet-icons/rabet.png",
                "https://rabet.io/",
                ModuleType::HotWallet,
            ),
            api,
        }
    }

    async fn run_checks(&self) -> Result<()> {
        if !self.is_available().await {
            return Err(KitError::unavailable("Rabet is not installed"));
        }
        Ok(())
    }
}

#[async_trait]
impl WalletModule for RabetModule {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::GetAddress, Capability::SignTransaction]
    }

    /// The extension injects itself late, so give it a moment first.
    async fn is_available(&self) -> bool {
        tokio::time::sleep(RABET_INJECTION_DELAY).await;
        self.api.is_injected()
    }

    async fn get_address(&self, _ctx: &ModuleContext, _opts: &SignRequestOptions) -> Result<AddressResponse> {
        self.run_checks().await?;
        let address = self.api.connect().await.map_err(KitError::from_native)?;
        Ok(AddressResponse { address })
    }

    /// Only public and test networks can be targeted once an address is
    /// given; the address itself is ignored with a warning.
    async fn sign_transaction(
        &self,
        _ctx: &ModuleContext,
        xdr: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedTransaction> {
        self.run_checks().await?;

        let passphrase = opts.network_passphrase.as_deref();
        if opts.address.is_some() {
            let supported = matches!(
                passphrase.and_then(WalletNetwork::from_passphrase),
                Some(WalletNetwork::Public) | Some(WalletNetwork::Testnet)
            );
            if !supported {
                return Err(KitError::InvalidNetwork(passphrase.unwrap_or_default().to_string()));
            }
            warn!("Rabet doesn't allow specifying what public key should sign the transaction, we skip the value");
        }

        let signed = self
            .api
            .sign(xdr, RabetNetwork::from_passphrase(passphrase))
            .await
            .map_err(KitError::from_native)?;
        let signed_tx_xdr = signed.ok_or_else(|| KitError::from_native(serde_json::Value::Null))?;

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
        Err(KitError::unsupported("Rabet", "signAuthEntry"))
    }

    async fn sign_message(
        &self,
        _ctx: &ModuleContext,
        _message: &str,
        _opts: &SignRequestOptions,
    ) -> Result<SignedMessage> {
        Err(KitError::unsupported("Rabet", "signMessage"))
    }

    async fn get_network(&self, _ctx: &ModuleContext) -> Result<NetworkDetails> {
        Err(KitError::unsupported("Rabet", "getNetwork"))
    }
}
