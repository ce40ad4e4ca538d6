//! Provider modules: one adapter per wallet, all behind [`WalletModule`].

mod albedo;
mod freighter;
mod hana;
pub mod hardware;
mod host;
mod hot_wallet;
mod klever;
mod ledger;
mod lobstr;
mod module;
mod rabet;
mod trezor;
mod walletconnect;
mod xbull;

use std::sync::Arc;

pub use albedo::{AlbedoApi, AlbedoModule, AlbedoNetwork, AlbedoTxIntent, ALBEDO_ID};
pub use freighter::{
    FreighterApi, FreighterModule, FreighterSignOptions, FreighterSignature, MessagePayload,
    FREIGHTER_ID,
};
pub use hana::{HanaApi, HanaModule, HanaSignRequest, HANA_ID};
pub use hardware::{TransactionCodec, TransactionEnvelope};
pub use host::HostEnvironment;
pub use hot_wallet::{HotWalletApi, HotWalletModule, HOTWALLET_ID};
pub use klever::{KleverApi, KleverModule, KLEVER_ID};
pub use ledger::{LedgerModule, LedgerStellarApp, LedgerTransportFactory, LEDGER_ID};
pub use lobstr::{LobstrApi, LobstrModule, LOBSTR_ID};
pub use module::{ModuleContext, WalletModule};
pub use rabet::{RabetApi, RabetModule, RabetNetwork, RABET_ID};
pub use trezor::{TrezorConnect, TrezorManifest, TrezorModule, TREZOR_ID};
pub use walletconnect::{
    chain_for_passphrase, BridgeConnection, DisconnectReason, RequiredNamespace,
    SessionDeletedCallback, SignClient, WalletConnectMethod, WalletConnectModule,
    WalletConnectParams, PUBNET_CHAIN, TESTNET_CHAIN, WALLET_CONNECT_ID,
};
pub use xbull::{XBullBridge, XBullConnector, XBullModule, XBullMessageOptions, XBullSignRequest, XBULL_ID};

/// Native APIs for the wallets that need no configuration of their own.
#[derive(Clone)]
pub struct ModuleBindings {
    pub host: HostEnvironment,
    pub albedo: Arc<dyn AlbedoApi>,
    pub freighter: Arc<dyn FreighterApi>,
    pub rabet: Arc<dyn RabetApi>,
    pub xbull: Arc<dyn XBullConnector>,
    pub lobstr: Arc<dyn LobstrApi>,
    pub hana: Arc<dyn HanaApi>,
    pub hot_wallet: Arc<dyn HotWalletApi>,
    pub klever: Arc<dyn KleverApi>,
}

pub type ModuleFilter<'a> = &'a dyn Fn(&dyn WalletModule) -> bool;

fn apply_filter(
    modules: Vec<Arc<dyn WalletModule>>,
    filter: Option<ModuleFilter<'_>>,
) -> Vec<Arc<dyn WalletModule>> {
    match filter {
        Some(keep) => modules.into_iter().filter(|m| keep(m.as_ref())).collect(),
        None => modules,
    }
}

/// Every module that works without extra configuration.
pub fn allow_all_modules(
    bindings: &ModuleBindings,
    filter: Option<ModuleFilter<'_>>,
) -> Vec<Arc<dyn WalletModule>> {
    let modules: Vec<Arc<dyn WalletModule>> = vec![
        Arc::new(AlbedoModule::new(bindings.albedo.clone())),
        Arc::new(FreighterModule::new(bindings.freighter.clone(), bindings.host.clone())),
        Arc::new(RabetModule::new(bindings.rabet.clone())),
        Arc::new(XBullModule::new(bindings.xbull.clone())),
        Arc::new(LobstrModule::new(bindings.lobstr.clone())),
        Arc::new(HanaModule::new(bindings.hana.clone())),
        Arc::new(HotWalletModule::new(bindings.hot_wallet.clone())),
        Arc::new(KleverModule::new(bindings.klever.clone())),
    ];
    apply_filter(modules, filter)
}

/// Modules that implement the SEP-43 wallet interface in full.
pub fn sep43_modules(
    bindings: &ModuleBindings,
    filter: Option<ModuleFilter<'_>>,
) -> Vec<Arc<dyn WalletModule>> {
    let modules: Vec<Arc<dyn WalletModule>> = vec![
        Arc::new(FreighterModule::new(bindings.freighter.clone(), bindings.host.clone())),
        Arc::new(HotWalletModule::new(bindings.hot_wallet.clone())),
    ];
    apply_filter(modules, filter)
}
