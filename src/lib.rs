//! One interface over heterogeneous Stellar wallets: browser extensions,
//! hardware devices and bridge sessions.
//!
//! Register provider modules with a [`WalletsKit`], select one, and call
//! `get_address` or one of the signing operations. Every failure reaches the
//! caller as a [`KitError`] that normalizes to `{code, message, ext}`.

pub mod constants;
pub mod errors;
pub mod kit;
pub mod logging;
pub mod pairing;
pub mod prober;
pub mod services;
pub mod state;
pub mod storage;
pub mod types;
pub mod utils;
pub mod wallet;

pub use errors::{parse_error, ErrorKind, KitError, NormalizedError, Result};
pub use kit::{PickedWallet, PickerEvent, WalletPickerUi, WalletsKit, WalletsKitBuilder};
pub use logging::{init_logging, LoggingConfig};
pub use prober::AvailabilityProber;
pub use state::{SessionSnapshot, SessionState};
pub use types::{
    AddressResponse, Capability, HardwareAccount, ModuleType, NetworkDetails, ProviderDescriptor,
    ProviderListing, SignRequestOptions, SignedAuthEntry, SignedMessage, SignedTransaction,
    WalletNetwork,
};
pub use utils::KitConfig;
pub use wallet::{allow_all_modules, sep43_modules, ModuleBindings, ModuleContext, WalletModule};
