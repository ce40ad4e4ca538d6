//! Secondary interactive flows some providers need before they can sign:
//! picking an account off a hardware device, and approving a bridge session.

mod coordinator;
mod session;
mod ui;

pub(crate) use coordinator::Teardown;
pub use coordinator::{page_indices, HardwareAccountSource, PairingCoordinator, PendingPairing};
pub use session::{find_target_session, BoundAccount, BridgeSession, PairingSession, PeerMetadata};
pub use ui::{AccountSelectorEvent, PairingPrompt, PairingPromptEvent, PairingUi};
