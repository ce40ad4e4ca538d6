use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use super::hardware::{resolve_signing_target, trezor_derivation_path, TransactionCodec};
use super::{ModuleContext, WalletModule};
use crate::constants::GENERIC_ERROR_CODE;
use crate::errors::{KitError, NativeResult, NormalizedError, Result};
use crate::pairing::HardwareAccountSource;
use crate::types::{
    AddressResponse, Capability, HardwareAccount, ModuleType, NetworkDetails, ProviderDescriptor,
    SignRequestOptions, SignedAuthEntry, SignedMessage, SignedTransaction,
};
use crate::utils::{format_address, Validator};

pub const TREZOR_ID: &str = "TREZOR";

/// App identity Trezor Connect requires before it will talk to a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrezorManifest {
    pub app_name: String,
    pub app_url: String,
    pub email: String,
    pub debug: bool,
    pub lazy_load: bool,
    pub core_mode: String,
}

impl Default for TrezorManifest {
    fn default() -> Self {
        Self {
            app_name: String::new(),
            app_url: String::new(),
            email: String::new(),
            debug: false,
            lazy_load: false,
            core_mode: "auto".to_string(),
        }
    }
}

/// Trezor Connect.
#[async_trait]
pub trait TrezorConnect: Send + Sync {
    async fn init(&self, manifest: &TrezorManifest) -> NativeResult<()>;

    async fn get_address(&self, path: &str) -> NativeResult<String>;

    /// One address per path, in order.
    async fn get_addresses(&self, paths: &[String]) -> NativeResult<Vec<String>>;

    /// Returns the hex-encoded signature.
    async fn sign_transaction(
        &self,
        path: &str,
        xdr: &str,
        network_passphrase: &str,
    ) -> NativeResult<String>;
}

pub struct TrezorModule {
    descriptor: ProviderDescriptor,
    connect: Arc<dyn TrezorConnect>,
    codec: Arc<dyn TransactionCodec>,
    manifest: TrezorManifest,
    ready: AtomicBool,
}

impl TrezorModule {
    pub fn new(
        connect: Arc<dyn TrezorConnect>,
        codec: Arc<dyn TransactionCodec>,
        manifest: TrezorManifest,
    ) -> Self {
        Self {
            descriptor: ProviderDescriptor::new(
                TREZOR_ID,
                "Trezor",
                "https://stellar.creit.tech/wallet-icons/trezor.png",
                "https://www.trezor.com/",
                ModuleType::HwWallet,
            ),
            connect,
            codec,
            manifest,
            ready: AtomicBool::new(false),
        }
    }

    /// Start Trezor Connect. Every device operation fails until this succeeds.
    pub async fn init(&self) -> Result<()> {
        self.connect
            .init(&self.manifest)
            .await
            .map_err(KitError::from_native)?;
        self.ready.store(true, Ordering::SeqCst);
        info!("🔐 Trezor is ready");
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn run_checks(&self) -> Result<()> {
        if !self.is_ready() {
            return Err(KitError::unavailable("Trezor connection has not been started yet."));
        }
        Ok(())
    }

    async fn address_at(&self, path: &str) -> Result<String> {
        Validator::validate_derivation_path(path)?;
        self.connect
            .get_address(path)
            .await
            .map_err(KitError::from_native)
    }

    /// Read accounts page `page` off the device and cache them in the session.
    pub async fn get_addresses(&self, ctx: &ModuleContext, page: u32) -> Result<Vec<HardwareAccount>> {
        self.run_checks()?;
        ctx.pairing().load_account_page(self, page).await
    }
}

#[async_trait]
impl HardwareAccountSource for TrezorModule {
    fn derivation_path(&self, index: u32) -> String {
        trezor_derivation_path(index)
    }

    async fn fetch_accounts(&self, indices: Range<u32>) -> Result<Vec<HardwareAccount>> {
        let paths: Vec<String> = indices.clone().map(trezor_derivation_path).collect();
        let addresses = self
            .connect
            .get_addresses(&paths)
            .await
            .map_err(KitError::from_native)?;

        if addresses.len() != paths.len() {
            return Err(KitError::Native(NormalizedError::new(
                GENERIC_ERROR_CODE,
                format!("Trezor returned {} addresses for {} paths", addresses.len(), paths.len()),
            )));
        }

        Ok(addresses
            .into_iter()
            .zip(indices)
            .map(|(public_key, index)| HardwareAccount { public_key, index })
            .collect())
    }
}

#[async_trait]
impl WalletModule for TrezorModule {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[
            Capability::GetAddress,
            Capability::SignTransaction,
            Capability::Disconnect,
        ]
    }

    /// Connect is expected to be started by the time a user reaches for the
    /// device, so this always answers yes.
    async fn is_available(&self) -> bool {
        true
    }

    async fn get_address(&self, ctx: &ModuleContext, opts: &SignRequestOptions) -> Result<AddressResponse> {
        self.run_checks()?;

        match opts.path.clone().or_else(|| ctx.derivation_path()) {
            Some(path) => Ok(AddressResponse {
                address: self.address_at(&path).await?,
            }),
            None => {
                let account = ctx.pairing().select_hardware_account(self).await?;
                Ok(AddressResponse {
                    address: account.public_key,
                })
            }
        }
    }

    async fn sign_transaction(
        &self,
        ctx: &ModuleContext,
        xdr: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedTransaction> {
        self.run_checks()?;

        let target = resolve_signing_target(
            ctx,
            opts,
            trezor_derivation_path,
            "This address has not been loaded from this device",
        )?;
        let account = match target.public_key {
            Some(public_key) => public_key,
            None => self.address_at(&target.path).await?,
        };

        let network = ctx.passphrase_or_session(opts);
        let mut envelope = self
            .codec
            .decode(xdr, &network)
            .map_err(KitError::from_native)?;

        let signature_hex = self
            .connect
            .sign_transaction(&target.path, xdr, &network)
            .await
            .map_err(KitError::from_native)?;
        let signature = hex::decode(signature_hex.trim_start_matches("0x")).map_err(|e| {
            KitError::Native(NormalizedError::new(
                GENERIC_ERROR_CODE,
                format!("Trezor returned a malformed signature: {}", e),
            ))
        })?;

        envelope
            .add_signature(&account, &STANDARD.encode(signature))
            .map_err(KitError::from_native)?;
        info!("🔐 Trezor signed transaction for {}", format_address(&account));

        Ok(SignedTransaction {
            signed_tx_xdr: envelope.to_xdr(),
            signer_address: Some(account),
        })
    }

    async fn sign_auth_entry(
        &self,
        _ctx: &ModuleContext,
        _auth_entry: &str,
        _opts: &SignRequestOptions,
    ) -> Result<SignedAuthEntry> {
        Err(KitError::UnsupportedOperation(
            "Trezor Wallets do not support the \"signAuthEntry\" method".to_string(),
        ))
    }

    async fn sign_message(
        &self,
        _ctx: &ModuleContext,
        _message: &str,
        _opts: &SignRequestOptions,
    ) -> Result<SignedMessage> {
        Err(KitError::UnsupportedOperation(
            "Trezor Wallets do not support the \"signMessage\" method".to_string(),
        ))
    }

    async fn get_network(&self, _ctx: &ModuleContext) -> Result<NetworkDetails> {
        Err(KitError::UnsupportedOperation(
            "Trezor Wallets do not support the \"getNetwork\" method".to_string(),
        ))
    }

    async fn disconnect(&self, ctx: &ModuleContext) -> Result<()> {
        ctx.pairing().release_hardware_bindings();
        Ok(())
    }
}
