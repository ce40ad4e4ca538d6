use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ModuleContext, WalletModule};
use crate::errors::{KitError, NativeResult, Result};
use crate::types::{
    AddressResponse, Capability, ModuleType, NetworkDetails, ProviderDescriptor,
    SignRequestOptions, SignedAuthEntry, SignedMessage, SignedTransaction,
};

pub const HANA_ID: &str = "hana";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HanaSignRequest {
    pub xdr: String,
    pub account_to_sign: Option<String>,
    pub network_passphrase: Option<String>,
}

/// `hanaWallet.stellar` as injected by the extension.
#[async_trait]
pub trait HanaApi: Send + Sync {
    fn is_injected(&self) -> bool;

    async fn get_public_key(&self) -> NativeResult<String>;

    async fn sign_transaction(&self, request: HanaSignRequest) -> NativeResult<String>;

    async fn sign_auth_entry(
        &self,
        auth_entry: &str,
        account_to_sign: Option<&str>,
    ) -> NativeResult<String>;

    async fn sign_message(&self, message: &str, account_to_sign: Option<&str>) -> NativeResult<String>;
}

pub struct HanaModule {
    descriptor: ProviderDescriptor,
    api: Arc<dyn HanaApi>,
}

impl HanaModule {
    pub fn new(api: Arc<dyn HanaApi>) -> Self {
        Self {
            descriptor: ProviderDescriptor::new(
                HANA_ID,
                "Hana Wallet",
                "https://stellar.creit.tech/wallet-icons/hana.png",
                "https://hanawallet.io/",
                ModuleType::HotWallet,
            ),
            api,
        }
    }

    fn run_checks(&self) -> Result<()> {
        if !self.api.is_injected() {
            return Err(KitError::unavailable("Hana Wallet is not installed"));
        }
        Ok(())
    }
}

#[async_trait]
impl WalletModule for HanaModule {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[
            Capability::GetAddress,
            Capability::SignTransaction,
            Capability::SignAuthEntry,
            Capability::SignMessage,
        ]
    }

    async fn is_available(&self) -> bool {
        self.api.is_injected()
    }

    async fn get_address(&self, _ctx: &ModuleContext, _opts: &SignRequestOptions) -> Result<AddressResponse> {
        self.run_checks()?;
        let address = self.api.get_public_key().await.map_err(KitError::from_native)?;
        Ok(AddressResponse { address })
    }

    async fn sign_transaction(
        &self,
        _ctx: &ModuleContext,
        xdr: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedTransaction> {
        self.run_checks()?;
        let signed_tx_xdr = self
            .api
            .sign_transaction(HanaSignRequest {
                xdr: xdr.to_string(),
                account_to_sign: opts.address.clone(),
                network_passphrase: opts.network_passphrase.clone(),
            })
            .await
            .map_err(KitError::from_native)?;

        Ok(SignedTransaction {
            signed_tx_xdr,
            signer_address: opts.address.clone(),
        })
    }

    async fn sign_auth_entry(
        &self,
        _ctx: &ModuleContext,
        auth_entry: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedAuthEntry> {
        self.run_checks()?;
        let signed_auth_entry = self
            .api
            .sign_auth_entry(auth_entry, opts.address.as_deref())
            .await
            .map_err(KitError::from_native)?;

        Ok(SignedAuthEntry {
            signed_auth_entry,
            signer_address: opts.address.clone(),
        })
    }

    async fn sign_message(
        &self,
        _ctx: &ModuleContext,
        message: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedMessage> {
        self.run_checks()?;
        let signed_message = self
            .api
            .sign_message(message, opts.address.as_deref())
            .await
            .map_err(KitError::from_native)?;

        Ok(SignedMessage {
            signed_message,
            signer_address: opts.address.clone(),
        })
    }

    async fn get_network(&self, _ctx: &ModuleContext) -> Result<NetworkDetails> {
        Err(KitError::unsupported("Hana", "getNetwork"))
    }
}
