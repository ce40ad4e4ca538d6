use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use std::ops::Range;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::hardware::{ledger_derivation_path, resolve_signing_target, TransactionCodec};
use super::{ModuleContext, WalletModule};
use crate::errors::{KitError, NativeResult, Result};
use crate::pairing::HardwareAccountSource;
use crate::types::{
    AddressResponse, Capability, HardwareAccount, ModuleType, NetworkDetails, ProviderDescriptor,
    SignRequestOptions, SignedAuthEntry, SignedMessage, SignedTransaction,
};
use crate::utils::{format_address, Validator};

pub const LEDGER_ID: &str = "LEDGER";

/// Opens the USB transport to the device.
#[async_trait]
pub trait LedgerTransportFactory: Send + Sync {
    async fn is_supported(&self) -> bool;

    async fn create(&self) -> NativeResult<Arc<dyn LedgerStellarApp>>;
}

/// The Stellar app running on an open Ledger transport.
#[async_trait]
pub trait LedgerStellarApp: Send + Sync {
    /// Encoded `G...` account id at `path`.
    async fn get_public_key(&self, path: &str) -> NativeResult<String>;

    async fn sign_hash(&self, path: &str, hash: &[u8]) -> NativeResult<Vec<u8>>;

    /// Signs the full signature base so the device can display the transaction.
    async fn sign_transaction(&self, path: &str, signature_base: &[u8]) -> NativeResult<Vec<u8>>;

    async fn close(&self);
}

pub struct LedgerModule {
    descriptor: ProviderDescriptor,
    factory: Arc<dyn LedgerTransportFactory>,
    codec: Arc<dyn TransactionCodec>,
    app: Mutex<Option<Arc<dyn LedgerStellarApp>>>,
}

impl LedgerModule {
    pub fn new(factory: Arc<dyn LedgerTransportFactory>, codec: Arc<dyn TransactionCodec>) -> Self {
        Self {
            descriptor: ProviderDescriptor::new(
                LEDGER_ID,
                "Ledger",
                "https://stellar.creit.tech/wallet-icons/ledger.png",
                "https://www.ledger.com/",
                ModuleType::HwWallet,
            ),
            factory,
            codec,
            app: Mutex::new(None),
        }
    }

    async fn run_checks(&self) -> Result<()> {
        if !self.is_available().await {
            return Err(KitError::unavailable("Ledger wallets can not be used"));
        }
        Ok(())
    }

    /// The open device handle, created on first use.
    async fn app(&self) -> Result<Arc<dyn LedgerStellarApp>> {
        if !self.factory.is_supported().await {
            return Err(KitError::unavailable("Ledger can not be used with this device."));
        }

        let mut slot = self.app.lock().await;
        if let Some(app) = slot.as_ref() {
            return Ok(app.clone());
        }

        info!("🔐 Opening Ledger transport");
        let app = self.factory.create().await.map_err(KitError::from_native)?;
        *slot = Some(app.clone());
        Ok(app)
    }

    /// Read accounts page `page` off the device and cache them in the session.
    pub async fn get_addresses(&self, ctx: &ModuleContext, page: u32) -> Result<Vec<HardwareAccount>> {
        ctx.pairing().load_account_page(self, page).await
    }
}

#[async_trait]
impl HardwareAccountSource for LedgerModule {
    fn derivation_path(&self, index: u32) -> String {
        ledger_derivation_path(index)
    }

    async fn fetch_accounts(&self, indices: Range<u32>) -> Result<Vec<HardwareAccount>> {
        let app = self.app().await?;
        let mut accounts = Vec::with_capacity(indices.len());
        for index in indices {
            let public_key = app
                .get_public_key(&ledger_derivation_path(index))
                .await
                .map_err(KitError::from_native)?;
            accounts.push(HardwareAccount { public_key, index });
        }
        Ok(accounts)
    }
}

#[async_trait]
impl WalletModule for LedgerModule {
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

    /// Devices are plugged in on demand, so this only asks whether USB access
    /// is possible at all.
    async fn is_available(&self) -> bool {
        self.factory.is_supported().await
    }

    async fn get_address(&self, ctx: &ModuleContext, opts: &SignRequestOptions) -> Result<AddressResponse> {
        self.run_checks().await?;
        let app = self.app().await?;

        let path = match opts.path.clone().or_else(|| ctx.derivation_path()) {
            Some(path) => path,
            None => {
                let account = ctx.pairing().select_hardware_account(self).await?;
                self.derivation_path(account.index)
            }
        };
        Validator::validate_derivation_path(&path)?;

        let address = app.get_public_key(&path).await.map_err(KitError::from_native)?;
        Ok(AddressResponse { address })
    }

    async fn sign_transaction(
        &self,
        ctx: &ModuleContext,
        xdr: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedTransaction> {
        self.run_checks().await?;
        let app = self.app().await?;

        let target = resolve_signing_target(
            ctx,
            opts,
            ledger_derivation_path,
            "This address has not been loaded from this ledger",
        )?;
        let account = match target.public_key {
            Some(public_key) => public_key,
            None => app
                .get_public_key(&target.path)
                .await
                .map_err(KitError::from_native)?,
        };

        let network = ctx.passphrase_or_session(opts);
        let mut envelope = self
            .codec
            .decode(xdr, &network)
            .map_err(KitError::from_native)?;
        let signature_base = envelope.signature_base();

        let signed = if opts.non_blind_tx {
            debug!("Signing full transaction on Ledger at {}", target.path);
            app.sign_transaction(&target.path, &signature_base).await
        } else {
            let hash = Sha256::digest(&signature_base);
            app.sign_hash(&target.path, hash.as_slice()).await
        };
        let signature = signed.map_err(KitError::from_native)?;

        envelope
            .add_signature(&account, &STANDARD.encode(signature))
            .map_err(KitError::from_native)?;
        info!("🔐 Ledger signed transaction for {}", format_address(&account));

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
            "Ledger Wallets do not support the \"signAuthEntry\" function".to_string(),
        ))
    }

    async fn sign_message(
        &self,
        _ctx: &ModuleContext,
        _message: &str,
        _opts: &SignRequestOptions,
    ) -> Result<SignedMessage> {
        Err(KitError::UnsupportedOperation(
            "Ledger Wallets do not support the \"signMessage\" function".to_string(),
        ))
    }

    async fn get_network(&self, _ctx: &ModuleContext) -> Result<NetworkDetails> {
        Err(KitError::UnsupportedOperation(
            "Ledger Wallets do not support the \"getNetwork\" function".to_string(),
        ))
    }

    /// Drops the bound path and cached accounts, then closes the transport.
    async fn disconnect(&self, ctx: &ModuleContext) -> Result<()> {
        ctx.pairing().release_hardware_bindings();
        if let Some(app) = self.app.lock().await.take() {
            app.close().await;
            info!("🔐 Ledger transport closed");
        }
        Ok(())
    }
}
