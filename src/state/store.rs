use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::errors::{KitError, Result};
use crate::pairing::PairingSession;
use crate::types::{HardwareAccount, WalletNetwork};

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub selected_provider_id: Option<String>,
    pub selected_network: WalletNetwork,
    pub active_address: Option<String>,
    pub derivation_path: Option<String>,
    pub hardware_accounts: Vec<HardwareAccount>,
    pub bridge_sessions: Vec<PairingSession>,
    pub horizon_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SessionSnapshot {
    fn new(network: WalletNetwork) -> Self {
        Self {
            selected_provider_id: None,
            selected_network: network,
            active_address: None,
            derivation_path: None,
            hardware_accounts: Vec::new(),
            bridge_sessions: Vec::new(),
            horizon_url: None,
            updated_at: Utc::now(),
        }
    }
}

/// Mutable session shared by one kit instance and its pairing coordinator.
///
/// Writers are the façade and the coordinator; provider modules only read.
/// Every change is published to subscribers.
#[derive(Debug)]
pub struct SessionState {
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionState {
    pub fn new(network: WalletNetwork) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::new(network));
        Self { tx }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub fn selected_provider_id(&self) -> Option<String> {
        self.tx.borrow().selected_provider_id.clone()
    }

    pub fn network(&self) -> WalletNetwork {
        self.tx.borrow().selected_network
    }

    pub fn active_address(&self) -> Option<String> {
        self.tx.borrow().active_address.clone()
    }

    pub fn derivation_path(&self) -> Option<String> {
        self.tx.borrow().derivation_path.clone()
    }

    pub fn hardware_accounts(&self) -> Vec<HardwareAccount> {
        self.tx.borrow().hardware_accounts.clone()
    }

    pub fn bridge_sessions(&self) -> Vec<PairingSession> {
        self.tx.borrow().bridge_sessions.clone()
    }

    pub fn horizon_url(&self) -> Option<String> {
        self.tx.borrow().horizon_url.clone()
    }

    /// Switch network by passphrase; unknown passphrases are rejected.
    pub fn set_network_passphrase(&self, passphrase: &str) -> Result<()> {
        let network = WalletNetwork::from_passphrase(passphrase)
            .ok_or_else(|| KitError::InvalidNetwork(passphrase.to_string()))?;
        self.set_network(network);
        Ok(())
    }

    pub fn set_network(&self, network: WalletNetwork) {
        debug!("Session network set to {}", network);
        self.update(|s| s.selected_network = network);
    }

    pub fn set_horizon_url(&self, url: Option<String>) {
        self.update(|s| s.horizon_url = url);
    }

    pub(crate) fn set_selected_provider(&self, id: &str) {
        self.update(|s| s.selected_provider_id = Some(id.to_string()));
    }

    pub(crate) fn set_active_address(&self, address: &str) {
        self.update(|s| s.active_address = Some(address.to_string()));
    }

    pub(crate) fn remove_active_address(&self) {
        self.update(|s| s.active_address = None);
    }

    pub(crate) fn set_derivation_path(&self, path: &str) {
        self.update(|s| s.derivation_path = Some(path.to_string()));
    }

    pub(crate) fn set_hardware_accounts(&self, accounts: Vec<HardwareAccount>) {
        self.update(|s| s.hardware_accounts = accounts);
    }

    pub(crate) fn clear_hardware_bindings(&self) {
        self.update(|s| {
            s.derivation_path = None;
            s.hardware_accounts.clear();
        });
    }

    /// Insert or replace a bridge session, keyed by id.
    pub(crate) fn store_bridge_session(&self, session: PairingSession) {
        self.update(|s| {
            s.bridge_sessions.retain(|existing| existing.id != session.id);
            s.bridge_sessions.push(session);
        });
    }

    pub(crate) fn remove_bridge_session(&self, id: &str) {
        self.update(|s| s.bridge_sessions.retain(|existing| existing.id != id));
    }

    /// Clear every field except the selected network.
    pub(crate) fn reset(&self) {
        self.update(|s| {
            let network = s.selected_network;
            let horizon_url = s.horizon_url.take();
            *s = SessionSnapshot::new(network);
            s.horizon_url = horizon_url;
        });
    }

    fn update(&self, f: impl FnOnce(&mut SessionSnapshot)) {
        self.tx.send_modify(|snapshot| {
            f(snapshot);
            snapshot.updated_at = Utc::now();
        });
    }
}
