use tokio::sync::mpsc;
use uuid::Uuid;

use crate::errors::NormalizedError;
use crate::types::HardwareAccount;

/// Signals the hardware account selector sends back to the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountSelectorEvent {
    Selected(HardwareAccount),
    /// The user paged the list; the coordinator answers with `show_accounts`.
    PageRequested(u32),
    Closed(NormalizedError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PairingPromptEvent {
    Closed(NormalizedError),
}

/// What the pairing prompt should display while a bridge approval is pending.
#[derive(Debug, Clone)]
pub struct PairingPrompt {
    pub flow_id: Uuid,
    pub uri: String,
    /// SVG rendering of `uri`, absent when the URI does not fit a QR code.
    pub qr_svg: Option<String>,
}

/// Presentation layer for the transient pairing surfaces.
///
/// The coordinator opens a surface, hands it a sender, and closes it exactly
/// once when the flow ends, whichever way it ends.
pub trait PairingUi: Send + Sync {
    fn open_account_selector(&self, events: mpsc::UnboundedSender<AccountSelectorEvent>);

    fn show_accounts(&self, page: u32, accounts: &[HardwareAccount]);

    fn close_account_selector(&self);

    fn open_pairing_prompt(
        &self,
        prompt: PairingPrompt,
        events: mpsc::UnboundedSender<PairingPromptEvent>,
    );

    fn close_pairing_prompt(&self);
}
