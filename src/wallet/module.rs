use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::constants::GENERIC_ERROR_CODE;
use crate::errors::{KitError, NormalizedError, Result};
use crate::pairing::{PairingCoordinator, PairingSession};
use crate::state::{SessionSnapshot, SessionState};
use crate::types::{
    AddressResponse, Capability, HardwareAccount, NetworkDetails, ProviderDescriptor,
    SignRequestOptions, SignedAuthEntry, SignedMessage, SignedTransaction, WalletNetwork,
};

/// What a provider module sees of the kit while serving a call.
///
/// Session state is read-only from here; the only way to change it is through
/// the pairing coordinator.
#[derive(Clone)]
pub struct ModuleContext {
    state: Arc<SessionState>,
    pairing: Arc<PairingCoordinator>,
}

impl ModuleContext {
    pub fn new(state: Arc<SessionState>, pairing: Arc<PairingCoordinator>) -> Self {
        Self { state, pairing }
    }

    pub fn network(&self) -> WalletNetwork {
        self.state.network()
    }

    pub fn derivation_path(&self) -> Option<String> {
        self.state.derivation_path()
    }

    pub fn hardware_accounts(&self) -> Vec<HardwareAccount> {
        self.state.hardware_accounts()
    }

    pub fn bridge_sessions(&self) -> Vec<PairingSession> {
        self.state.bridge_sessions()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    pub fn pairing(&self) -> &Arc<PairingCoordinator> {
        &self.pairing
    }

    /// The caller's passphrase, or the session's when none was given.
    pub fn passphrase_or_session(&self, opts: &SignRequestOptions) -> String {
        opts.network_passphrase
            .clone()
            .unwrap_or_else(|| self.network().passphrase().to_string())
    }
}

/// Common contract every wallet adapter implements.
///
/// All operations are mandatory; an adapter that cannot do something answers
/// with [`KitError::UnsupportedOperation`] and leaves it out of
/// [`capabilities`](WalletModule::capabilities), so callers can check
/// [`supports`](WalletModule::supports) before paying for a call.
#[async_trait]
pub trait WalletModule: Send + Sync {
    fn descriptor(&self) -> &ProviderDescriptor;

    fn capabilities(&self) -> &'static [Capability];

    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    fn id(&self) -> &str {
        &self.descriptor().id
    }

    /// Never fails; a provider that cannot answer is simply not available.
    async fn is_available(&self) -> bool;

    async fn is_platform_wrapper(&self) -> bool {
        false
    }

    async fn get_address(
        &self,
        ctx: &ModuleContext,
        opts: &SignRequestOptions,
    ) -> Result<AddressResponse>;

    async fn sign_transaction(
        &self,
        ctx: &ModuleContext,
        xdr: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedTransaction>;

    async fn sign_auth_entry(
        &self,
        ctx: &ModuleContext,
        auth_entry: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedAuthEntry>;

    async fn sign_message(
        &self,
        ctx: &ModuleContext,
        message: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedMessage>;

    async fn get_network(&self, ctx: &ModuleContext) -> Result<NetworkDetails>;

    async fn disconnect(&self, _ctx: &ModuleContext) -> Result<()> {
        Err(KitError::unsupported(
            &self.descriptor().display_name,
            "disconnect",
        ))
    }
}

/// Decode a JSON answer from a wallet into the expected response shape.
pub(crate) fn decode_native<T: DeserializeOwned>(provider: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        KitError::Native(NormalizedError::new(
            GENERIC_ERROR_CODE,
            format!("{} returned an unexpected response: {}", provider, e),
        ))
    })
}
