use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::WalletsKit;
use crate::constants::DEFAULT_PROBE_TIMEOUT;
use crate::errors::{KitError, Result};
use crate::pairing::{PairingCoordinator, PairingUi};
use crate::prober::AvailabilityProber;
use crate::services::AccountService;
use crate::state::SessionState;
use crate::storage::{FileStore, KeyValueStore, MemoryStore, UsedWalletsRegistry};
use crate::types::WalletNetwork;
use crate::utils::KitConfig;
use crate::wallet::WalletModule;

pub struct WalletsKitBuilder {
    network: WalletNetwork,
    modules: Vec<Arc<dyn WalletModule>>,
    selected_wallet_id: Option<String>,
    pairing_ui: Option<Arc<dyn PairingUi>>,
    store: Option<Arc<dyn KeyValueStore>>,
    probe_timeout: Duration,
    horizon_url: Option<String>,
}

impl Default for WalletsKitBuilder {
    fn default() -> Self {
        Self {
            network: WalletNetwork::Testnet,
            modules: Vec::new(),
            selected_wallet_id: None,
            pairing_ui: None,
            store: None,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            horizon_url: None,
        }
    }
}

impl WalletsKitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed network, timeout, Horizon URL, initial selection and storage from
    /// a loaded configuration.
    pub fn from_config(config: &KitConfig) -> Self {
        let store: Arc<dyn KeyValueStore> = match &config.storage_path {
            Some(path) => Arc::new(FileStore::new(path.clone())),
            None => Arc::new(MemoryStore::new()),
        };

        Self {
            network: config.network,
            selected_wallet_id: config.selected_wallet_id.clone(),
            store: Some(store),
            probe_timeout: config.probe_timeout,
            horizon_url: config.horizon_url.clone(),
            ..Self::default()
        }
    }

    pub fn network(mut self, network: WalletNetwork) -> Self {
        self.network = network;
        self
    }

    pub fn module(mut self, module: Arc<dyn WalletModule>) -> Self {
        self.modules.push(module);
        self
    }

    pub fn modules(mut self, modules: impl IntoIterator<Item = Arc<dyn WalletModule>>) -> Self {
        self.modules.extend(modules);
        self
    }

    pub fn selected_wallet_id(mut self, id: impl Into<String>) -> Self {
        self.selected_wallet_id = Some(id.into());
        self
    }

    pub fn pairing_ui(mut self, ui: Arc<dyn PairingUi>) -> Self {
        self.pairing_ui = Some(ui);
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn horizon_url(mut self, url: impl Into<String>) -> Self {
        self.horizon_url = Some(url.into());
        self
    }

    /// Fails on duplicate module ids and on an initial selection that names
    /// no registered module.
    pub fn build(self) -> Result<WalletsKit> {
        let mut registry: IndexMap<String, Arc<dyn WalletModule>> = IndexMap::new();
        for module in self.modules {
            let id = module.id().to_string();
            if registry.contains_key(&id) {
                return Err(KitError::Config(format!(
                    "Wallet id \"{}\" is registered more than once",
                    id
                )));
            }
            registry.insert(id, module);
        }

        let state = Arc::new(SessionState::new(self.network));
        state.set_horizon_url(self.horizon_url.clone());
        let pairing = Arc::new(PairingCoordinator::new(state.clone(), self.pairing_ui));
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));

        let kit = WalletsKit {
            modules: registry,
            state,
            pairing,
            prober: AvailabilityProber::new(self.probe_timeout),
            used_wallets: UsedWalletsRegistry::new(store),
            accounts: AccountService::new(self.horizon_url),
        };

        if let Some(id) = self.selected_wallet_id {
            kit.select_provider(&id)?;
        }

        info!(
            "🚀 Wallets kit ready with {} providers on {}",
            kit.modules.len(),
            kit.state.network()
        );
        Ok(kit)
    }
}
