use std::time::Duration;

/// Code carried by every "this wallet cannot do that" failure.
pub const UNSUPPORTED_OPERATION_CODE: i64 = -3;
pub const GENERIC_ERROR_CODE: i64 = -1;

/// Upper bound for a single provider's readiness probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Rabet injects itself late, so its probe waits before looking.
pub const RABET_INJECTION_DELAY: Duration = Duration::from_millis(100);

/// Accounts fetched from a hardware device per selector page.
pub const HARDWARE_PAGE_SIZE: u32 = 10;

/// SLIP-44 coin type for Stellar.
pub const STELLAR_COIN_TYPE: u32 = 148;

/// Storage key of the most-recently-used provider id list.
pub const USED_WALLETS_KEY: &str = "@StellarWalletsKit/usedWalletsIds";

pub const ACCOUNT_SELECTOR_CLOSED: &str = "Account selector closed";
pub const PAIRING_PROMPT_CLOSED: &str = "Pairing prompt closed";
pub const WALLET_PICKER_CLOSED: &str = "Modal closed";
