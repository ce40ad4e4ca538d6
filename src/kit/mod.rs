//! The public entry point: provider registry, selection and dispatch.

mod builder;
mod picker;

pub use builder::WalletsKitBuilder;
pub use picker::{PickedWallet, PickerEvent, WalletPickerUi};

use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, info_span, Instrument};

use crate::errors::{KitError, Result};
use crate::pairing::PairingCoordinator;
use crate::prober::AvailabilityProber;
use crate::services::AccountService;
use crate::state::{SessionSnapshot, SessionState};
use crate::storage::UsedWalletsRegistry;
use crate::types::{
    AddressResponse, Capability, NetworkDetails, ProviderListing, SignRequestOptions,
    SignedAuthEntry, SignedMessage, SignedTransaction, WalletNetwork,
};
use crate::utils::format_address;
use crate::wallet::{ModuleContext, WalletModule};

pub struct WalletsKit {
    modules: IndexMap<String, Arc<dyn WalletModule>>,
    state: Arc<SessionState>,
    pairing: Arc<PairingCoordinator>,
    prober: AvailabilityProber,
    used_wallets: UsedWalletsRegistry,
    accounts: AccountService,
}

impl WalletsKit {
    pub fn builder() -> WalletsKitBuilder {
        WalletsKitBuilder::new()
    }

    /// Registered modules, in registration order.
    pub fn modules(&self) -> impl Iterator<Item = &Arc<dyn WalletModule>> {
        self.modules.values()
    }

    pub fn module(&self, id: &str) -> Option<Arc<dyn WalletModule>> {
        self.modules.get(id).cloned()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn prober(&self) -> &AvailabilityProber {
        &self.prober
    }

    pub fn used_wallets(&self) -> &UsedWalletsRegistry {
        &self.used_wallets
    }

    /// What provider modules get to see while serving a call.
    pub fn context(&self) -> ModuleContext {
        ModuleContext::new(self.state.clone(), self.pairing.clone())
    }

    pub fn select_provider(&self, id: &str) -> Result<()> {
        if !self.modules.contains_key(id) {
            return Err(KitError::UnknownProvider(id.to_string()));
        }
        self.state.set_selected_provider(id);
        info!("👛 Selected wallet {}", id);
        Ok(())
    }

    pub fn selected_module(&self) -> Result<Arc<dyn WalletModule>> {
        let id = self
            .state
            .selected_provider_id()
            .ok_or(KitError::NoProviderSelected)?;
        self.modules
            .get(&id)
            .cloned()
            .ok_or(KitError::UnknownProvider(id))
    }

    pub fn set_network(&self, network: WalletNetwork) {
        self.state.set_network(network);
    }

    pub fn set_network_passphrase(&self, passphrase: &str) -> Result<()> {
        self.state.set_network_passphrase(passphrase)
    }

    /// Ask the selected wallet for its address and remember it once it answers.
    pub async fn get_address(&self, opts: SignRequestOptions) -> Result<AddressResponse> {
        let module = self.selected_module()?;
        let opts = self.with_session_network(opts);
        let span = info_span!("get_address", provider = %module.id());

        async {
            let response = module.get_address(&self.context(), &opts).await?;
            self.state.set_active_address(&response.address);
            debug!("Active address is now {}", format_address(&response.address));
            Ok(response)
        }
        .instrument(span)
        .await
    }

    pub async fn sign_transaction(
        &self,
        xdr: &str,
        opts: SignRequestOptions,
    ) -> Result<SignedTransaction> {
        let module = self.selected_module()?;
        let opts = self.with_session_network(opts);
        let span = info_span!("sign_transaction", provider = %module.id());

        module
            .sign_transaction(&self.context(), xdr, &opts)
            .instrument(span)
            .await
    }

    pub async fn sign_auth_entry(
        &self,
        auth_entry: &str,
        opts: SignRequestOptions,
    ) -> Result<SignedAuthEntry> {
        let module = self.selected_module()?;
        let opts = self.with_session_network(opts);
        let span = info_span!("sign_auth_entry", provider = %module.id());

        module
            .sign_auth_entry(&self.context(), auth_entry, &opts)
            .instrument(span)
            .await
    }

    pub async fn sign_message(
        &self,
        message: &str,
        opts: SignRequestOptions,
    ) -> Result<SignedMessage> {
        let module = self.selected_module()?;
        let opts = self.with_session_network(opts);
        let span = info_span!("sign_message", provider = %module.id());

        module
            .sign_message(&self.context(), message, &opts)
            .instrument(span)
            .await
    }

    pub async fn get_network(&self) -> Result<NetworkDetails> {
        let module = self.selected_module()?;
        let span = info_span!("get_network", provider = %module.id());

        module.get_network(&self.context()).instrument(span).await
    }

    /// Forget the active address, then let the selected wallet release
    /// whatever it holds.
    pub async fn disconnect(&self) -> Result<()> {
        self.state.remove_active_address();

        let module = self.selected_module()?;
        if !module.supports(Capability::Disconnect) {
            debug!("{} holds nothing to release", module.id());
            return Ok(());
        }

        let span = info_span!("disconnect", provider = %module.id());
        module.disconnect(&self.context()).instrument(span).await?;
        info!("👋 Disconnected from {}", module.id());
        Ok(())
    }

    /// Drop the selection and everything bound to it. The network stays.
    pub fn reset(&self) {
        self.state.reset();
    }

    /// Every registered provider, probed and ordered for display.
    pub async fn list_supported_providers(&self) -> Vec<ProviderListing> {
        let modules: Vec<Arc<dyn WalletModule>> = self.modules.values().cloned().collect();
        let used = self.used_wallets.read_blocking().await;
        self.prober.rank_and_annotate(&modules, &used).await
    }

    /// Native balance of the active address.
    pub async fn account_balance(&self) -> Result<String> {
        let address = self.state.active_address().ok_or_else(|| {
            KitError::unavailable("There is no active address, call `get_address` first")
        })?;
        self.accounts.fetch_native_balance(&address).await
    }

    fn with_session_network(&self, mut opts: SignRequestOptions) -> SignRequestOptions {
        if opts.network_passphrase.is_none() {
            opts.network_passphrase = Some(self.state.network().passphrase().to_string());
        }
        opts
    }
}
