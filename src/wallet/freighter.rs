use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::{HostEnvironment, ModuleContext, WalletModule};
use crate::constants::UNSUPPORTED_OPERATION_CODE;
use crate::errors::{KitError, NativeResult, NormalizedError, Result};
use crate::types::{
    AddressResponse, Capability, ModuleType, NetworkDetails, ProviderDescriptor,
    SignRequestOptions, SignedAuthEntry, SignedMessage, SignedTransaction,
};

pub const FREIGHTER_ID: &str = "freighter";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreighterSignOptions {
    pub address: Option<String>,
    pub network_passphrase: Option<String>,
}

impl From<&SignRequestOptions> for FreighterSignOptions {
    fn from(opts: &SignRequestOptions) -> Self {
        Self {
            address: opts.address.clone(),
            network_passphrase: opts.network_passphrase.clone(),
        }
    }
}

/// A signed payload as Freighter hands it back; `signed` may be missing when
/// the extension declines without an error object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreighterSignature<T> {
    pub signed: Option<T>,
    pub signer_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePayload {
    Text(String),
    Bytes(Vec<u8>),
}

impl MessagePayload {
    fn into_string(self) -> String {
        match self {
            MessagePayload::Text(text) => text,
            MessagePayload::Bytes(bytes) => STANDARD.encode(bytes),
        }
    }
}

/// Freighter extension API.
#[async_trait]
pub trait FreighterApi: Send + Sync {
    async fn is_connected(&self) -> NativeResult<bool>;

    async fn request_access(&self) -> NativeResult<String>;

    /// Empty when the site has not been granted access.
    async fn get_address(&self) -> NativeResult<String>;

    async fn sign_transaction(
        &self,
        xdr: &str,
        opts: &FreighterSignOptions,
    ) -> NativeResult<SignedTransaction>;

    async fn sign_auth_entry(
        &self,
        auth_entry: &str,
        opts: &FreighterSignOptions,
    ) -> NativeResult<FreighterSignature<Vec<u8>>>;

    async fn sign_message(
        &self,
        message: &str,
        opts: &FreighterSignOptions,
    ) -> NativeResult<FreighterSignature<MessagePayload>>;

    async fn get_network(&self) -> NativeResult<NetworkDetails>;
}

pub struct FreighterModule {
    descriptor: ProviderDescriptor,
    api: Arc<dyn FreighterApi>,
    host: HostEnvironment,
}

impl FreighterModule {
    pub fn new(api: Arc<dyn FreighterApi>, host: HostEnvironment) -> Self {
        Self {
            descriptor: ProviderDescriptor::new(
                FREIGHTER_ID,
                "Freighter",
                "https://stellar.creit.tech/wallet-icons/freighter.png",
                "https://freighter.app",
                ModuleType::HotWallet,
            ),
            api,
            host,
        }
    }

    async fn run_checks(&self) -> Result<()> {
        if !self.is_available().await {
            return Err(KitError::unavailable("Freighter is not connected"));
        }
        Ok(())
    }
}

#[async_trait]
impl WalletModule for FreighterModule {
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

    /// The mobile in-app browser is served by the bridge module instead.
    async fn is_available(&self) -> bool {
        if self.host.is_freighter_mobile() {
            return false;
        }
        self.api.is_connected().await.unwrap_or(false)
    }

    async fn get_address(&self, _ctx: &ModuleContext, opts: &SignRequestOptions) -> Result<AddressResponse> {
        self.run_checks().await?;

        if !opts.skip_request_access {
            self.api.request_access().await.map_err(KitError::from_native)?;
        } else {
            debug!("Skipping Freighter access request");
        }

        let address = self.api.get_address().await.map_err(KitError::from_native)?;
        if address.is_empty() {
            return Err(KitError::Native(NormalizedError::new(
                UNSUPPORTED_OPERATION_CODE,
                "Getting the address is not allowed, please request access first.",
            )));
        }
        Ok(AddressResponse { address })
    }

    async fn sign_transaction(
        &self,
        _ctx: &ModuleContext,
        xdr: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedTransaction> {
        self.run_checks().await?;
        self.api
            .sign_transaction(xdr, &opts.into())
            .await
            .map_err(KitError::from_native)
    }

    async fn sign_auth_entry(
        &self,
        _ctx: &ModuleContext,
        auth_entry: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedAuthEntry> {
        self.run_checks().await?;
        let result = self
            .api
            .sign_auth_entry(auth_entry, &opts.into())
            .await
            .map_err(KitError::from_native)?;

        let signed = result.signed.ok_or_else(|| KitError::from_native(Value::Null))?;
        Ok(SignedAuthEntry {
            signed_auth_entry: STANDARD.encode(signed),
            signer_address: result.signer_address,
        })
    }

    async fn sign_message(
        &self,
        _ctx: &ModuleContext,
        message: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedMessage> {
        self.run_checks().await?;
        let result = self
            .api
            .sign_message(message, &opts.into())
            .await
            .map_err(KitError::from_native)?;

        let signed = result.signed.ok_or_else(|| KitError::from_native(Value::Null))?;
        Ok(SignedMessage {
            signed_message: signed.into_string(),
            signer_address: result.signer_address,
        })
    }

    async fn get_network(&self, _ctx: &ModuleContext) -> Result<NetworkDetails> {
        self.run_checks().await?;
        self.api.get_network().await.map_err(KitError::from_native)
    }
}
