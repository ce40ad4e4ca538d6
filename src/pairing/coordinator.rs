use async_trait::async_trait;
use futures::future::BoxFuture;
use qrcode::render::svg;
use qrcode::QrCode;
use std::ops::Range;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::session::PairingSession;
use super::ui::{AccountSelectorEvent, PairingPrompt, PairingPromptEvent, PairingUi};
use crate::constants::{
    ACCOUNT_SELECTOR_CLOSED, GENERIC_ERROR_CODE, HARDWARE_PAGE_SIZE, PAIRING_PROMPT_CLOSED,
};
use crate::errors::{parse_error, KitError, NativeResult, NormalizedError, Result};
use crate::state::SessionState;
use crate::types::HardwareAccount;
use crate::utils::format_address;

/// Account indices shown on selector page `page`.
pub fn page_indices(page: u32) -> Range<u32> {
    let start = page.saturating_mul(HARDWARE_PAGE_SIZE);
    start..start.saturating_add(HARDWARE_PAGE_SIZE)
}

/// A device that can enumerate its accounts by index.
#[async_trait]
pub trait HardwareAccountSource: Send + Sync {
    fn derivation_path(&self, index: u32) -> String;

    async fn fetch_accounts(&self, indices: Range<u32>) -> Result<Vec<HardwareAccount>>;
}

/// A bridge connection request that is waiting on the remote wallet.
pub struct PendingPairing {
    /// Pairing URI to show the user; absent when the bridge reuses a known peer.
    pub uri: Option<String>,
    pub approval: BoxFuture<'static, NativeResult<PairingSession>>,
}

/// Runs the interactive pairing flows and is, with the kit façade, the only
/// writer of session state.
pub struct PairingCoordinator {
    state: Arc<SessionState>,
    ui: Option<Arc<dyn PairingUi>>,
}

impl PairingCoordinator {
    pub fn new(state: Arc<SessionState>, ui: Option<Arc<dyn PairingUi>>) -> Self {
        Self { state, ui }
    }

    pub fn has_ui(&self) -> bool {
        self.ui.is_some()
    }

    /// Read one page of accounts off the device and cache it in session state.
    pub async fn load_account_page(
        &self,
        source: &dyn HardwareAccountSource,
        page: u32,
    ) -> Result<Vec<HardwareAccount>> {
        let indices = page_indices(page);
        debug!("Loading hardware accounts {:?}", indices);

        let accounts = source.fetch_accounts(indices).await?;
        self.state.set_hardware_accounts(accounts.clone());
        Ok(accounts)
    }

    /// Let the user pick an account from the device and bind its derivation path.
    pub async fn select_hardware_account(
        &self,
        source: &dyn HardwareAccountSource,
    ) -> Result<HardwareAccount> {
        let ui = self.ui.clone().ok_or_else(|| {
            KitError::unavailable("There is no interface available to select a hardware account")
        })?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        ui.open_account_selector(tx);
        let _teardown = Teardown::new(|| ui.close_account_selector());

        let first_page = self.load_account_page(source, 0).await?;
        ui.show_accounts(0, &first_page);

        loop {
            match rx.recv().await {
                Some(AccountSelectorEvent::Selected(account)) => {
                    let path = source.derivation_path(account.index);
                    self.state.set_derivation_path(&path);
                    info!("🔐 Bound hardware account {} at {}", format_address(&account.public_key), path);
                    return Ok(account);
                }
                Some(AccountSelectorEvent::PageRequested(page)) => {
                    let accounts = self.load_account_page(source, page).await?;
                    ui.show_accounts(page, &accounts);
                }
                Some(AccountSelectorEvent::Closed(detail)) => {
                    debug!("Account selector closed: {}", detail);
                    return Err(KitError::cancelled(detail));
                }
                None => {
                    return Err(KitError::cancelled(NormalizedError::new(
                        GENERIC_ERROR_CODE,
                        ACCOUNT_SELECTOR_CLOSED,
                    )));
                }
            }
        }
    }

    pub fn release_hardware_bindings(&self) {
        self.state.clear_hardware_bindings();
    }

    /// Show the pairing URI and wait for the remote wallet to approve.
    ///
    /// Closing the prompt cancels the flow and leaves session state untouched.
    pub async fn pair_bridge(&self, pending: PendingPairing) -> Result<PairingSession> {
        let PendingPairing { uri, approval } = pending;

        let (uri, ui) = match (uri, self.ui.clone()) {
            (Some(uri), Some(ui)) => (uri, ui),
            (Some(_), None) => {
                warn!("No interface attached to show the pairing URI, waiting for approval anyway");
                return self.finish_pairing(approval.await);
            }
            (None, _) => return self.finish_pairing(approval.await),
        };

        let prompt = PairingPrompt {
            flow_id: Uuid::new_v4(),
            qr_svg: render_qr_svg(&uri),
            uri,
        };
        info!("🔗 Waiting for bridge approval (flow {})", prompt.flow_id);

        let (tx, mut rx) = mpsc::unbounded_channel();
        ui.open_pairing_prompt(prompt, tx);
        let _teardown = Teardown::new(|| ui.close_pairing_prompt());

        tokio::select! {
            outcome = approval => self.finish_pairing(outcome),
            event = rx.recv() => {
                let detail = match event {
                    Some(PairingPromptEvent::Closed(detail)) => detail,
                    None => NormalizedError::new(GENERIC_ERROR_CODE, PAIRING_PROMPT_CLOSED),
                };
                debug!("Pairing prompt closed: {}", detail);
                Err(KitError::cancelled(detail))
            }
        }
    }

    pub fn forget_bridge_session(&self, id: &str) {
        self.state.remove_bridge_session(id);
    }

    fn finish_pairing(&self, outcome: NativeResult<PairingSession>) -> Result<PairingSession> {
        match outcome {
            Ok(session) => {
                info!("🔗 Bridge session {} approved by {}", session.id, session.name);
                self.state.store_bridge_session(session.clone());
                Ok(session)
            }
            Err(rejection) => {
                let detail = parse_error(&rejection);
                warn!("Bridge pairing rejected: {}", detail);
                Err(KitError::PairingRejected(detail))
            }
        }
    }
}

/// Runs its closure once when dropped.
pub(crate) struct Teardown<F: FnOnce()> {
    on_drop: Option<F>,
}

impl<F: FnOnce()> Teardown<F> {
    pub(crate) fn new(on_drop: F) -> Self {
        Self {
            on_drop: Some(on_drop),
        }
    }
}

impl<F: FnOnce()> Drop for Teardown<F> {
    fn drop(&mut self) {
        if let Some(f) = self.on_drop.take() {
            f();
        }
    }
}

fn render_qr_svg(uri: &str) -> Option<String> {
    match QrCode::new(uri.as_bytes()) {
        Ok(code) => Some(
            code.render::<svg::Color<'_>>()
                .min_dimensions(240, 240)
                .build(),
        ),
        Err(e) => {
            warn!("Pairing URI can not be rendered as a QR code: {}", e);
            None
        }
    }
}
