mod common;

use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::*;
use stellar_wallets_kit::kit::PickerEvent;
use stellar_wallets_kit::storage::MemoryStore;
use stellar_wallets_kit::wallet::{
    FreighterModule, HostEnvironment, WalletConnectModule, ALBEDO_ID, FREIGHTER_ID,
    WALLET_CONNECT_ID,
};
use stellar_wallets_kit::{
    Capability, ErrorKind, KitError, SignRequestOptions, WalletModule, WalletNetwork, WalletsKit,
};

fn freighter_kit(freighter: Arc<FakeFreighter>) -> WalletsKit {
    WalletsKit::builder()
        .module(Arc::new(FreighterModule::new(freighter, HostEnvironment::default())))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_get_address_requires_selection() {
    let freighter = FakeFreighter::connected(&key('F'));
    let kit = freighter_kit(freighter.clone());

    let err = kit.get_address(SignRequestOptions::default()).await.unwrap_err();
    assert!(matches!(err, KitError::NoProviderSelected));
    assert_eq!(err.code(), -3);
    assert_eq!(freighter.address_calls.load(Ordering::SeqCst), 0);

    let err = kit.sign_transaction("AAAA", SignRequestOptions::default()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoProviderSelected);
}

#[tokio::test]
async fn test_unknown_provider_leaves_selection_unchanged() {
    let kit = freighter_kit(FakeFreighter::connected(&key('F')));
    kit.select_provider(FREIGHTER_ID).unwrap();

    let err = kit.select_provider("metamask").unwrap_err();
    assert!(matches!(err, KitError::UnknownProvider(ref id) if id == "metamask"));
    assert_eq!(
        kit.snapshot().selected_provider_id.as_deref(),
        Some(FREIGHTER_ID)
    );
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let freighter = FakeFreighter::connected(&key('F'));
    let result = WalletsKit::builder()
        .module(Arc::new(FreighterModule::new(freighter.clone(), HostEnvironment::default())))
        .module(Arc::new(FreighterModule::new(freighter, HostEnvironment::default())))
        .build();
    assert!(matches!(result, Err(KitError::Config(_))));
}

#[test]
fn test_initial_selection_must_be_registered() {
    let result = WalletsKit::builder()
        .module(Arc::new(FreighterModule::new(
            FakeFreighter::connected(&key('F')),
            HostEnvironment::default(),
        )))
        .selected_wallet_id("albedo")
        .build();
    assert!(matches!(result, Err(KitError::UnknownProvider(_))));
}

#[tokio::test]
async fn test_session_passphrase_is_injected() {
    let freighter = FakeFreighter::connected(&key('F'));
    let kit = freighter_kit(freighter.clone());
    kit.select_provider(FREIGHTER_ID).unwrap();
    kit.set_network(WalletNetwork::Public);

    kit.sign_transaction("AAAA", SignRequestOptions::default())
        .await
        .unwrap();
    kit.sign_transaction(
        "BBBB",
        SignRequestOptions::new().with_network(WalletNetwork::Futurenet.passphrase()),
    )
    .await
    .unwrap();
    kit.sign_message("hello", SignRequestOptions::default())
        .await
        .unwrap();

    let seen = freighter.seen_passphrases.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            Some(WalletNetwork::Public.passphrase().to_string()),
            Some(WalletNetwork::Futurenet.passphrase().to_string()),
            Some(WalletNetwork::Public.passphrase().to_string()),
        ]
    );
}

#[test]
fn test_unknown_passphrase_is_rejected() {
    let kit = freighter_kit(FakeFreighter::connected(&key('F')));
    let err = kit.set_network_passphrase("My Private Network").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidNetwork);
    assert_eq!(kit.snapshot().selected_network, WalletNetwork::Testnet);
}

#[tokio::test]
async fn test_address_is_stored_only_after_success() {
    let freighter = FakeFreighter::connected(&key('F'));
    *freighter.reject_address.lock().unwrap() =
        Some(json!({ "error": { "code": 4, "message": "User declined access" } }));
    let kit = freighter_kit(freighter.clone());
    kit.select_provider(FREIGHTER_ID).unwrap();

    let err = kit.get_address(SignRequestOptions::default()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NativeProviderError);
    assert_eq!(err.code(), 4);
    assert_eq!(err.to_string(), "User declined access");
    assert!(kit.snapshot().active_address.is_none());

    *freighter.reject_address.lock().unwrap() = None;
    let response = kit.get_address(SignRequestOptions::default()).await.unwrap();
    assert_eq!(response.address, key('F'));
    assert_eq!(kit.snapshot().active_address, Some(key('F')));
}

#[tokio::test]
async fn test_disconnect_clears_address() {
    let kit = freighter_kit(FakeFreighter::connected(&key('F')));
    kit.select_provider(FREIGHTER_ID).unwrap();
    kit.get_address(SignRequestOptions::default()).await.unwrap();

    kit.disconnect().await.unwrap();
    let snapshot = kit.snapshot();
    assert!(snapshot.active_address.is_none());
    assert_eq!(snapshot.selected_provider_id.as_deref(), Some(FREIGHTER_ID));
}

#[tokio::test]
async fn test_disconnect_closes_bridge_sessions() {
    let client = Arc::new(FakeSignClient::new(&["stellar:pubnet:GBRIDGE"]));
    let module = WalletConnectModule::new(wallet_connect_params(), client.clone(), HostEnvironment::default());
    let kit = WalletsKit::builder()
        .module(Arc::new(module))
        .build()
        .unwrap();
    kit.select_provider(WALLET_CONNECT_ID).unwrap();

    kit.get_address(SignRequestOptions::default()).await.unwrap();
    *client.listed.lock().unwrap() = vec![FakeSignClient::session("topic-1", &client.accounts)];
    assert_eq!(kit.snapshot().bridge_sessions.len(), 1);

    kit.disconnect().await.unwrap();
    assert_eq!(*client.disconnected.lock().unwrap(), vec!["topic-1".to_string()]);
    assert!(kit.snapshot().bridge_sessions.is_empty());
    assert!(kit.snapshot().active_address.is_none());
}

#[tokio::test]
async fn test_missing_capabilities_fail_as_unsupported() {
    let kit = WalletsKit::builder()
        .modules(every_module())
        .build()
        .unwrap();
    let ctx = kit.context();
    let opts = SignRequestOptions::default();

    for module in kit.modules() {
        let module: &dyn WalletModule = module.as_ref();
        let mut checked = Vec::new();

        if !module.supports(Capability::SignAuthEntry) {
            checked.push(module.sign_auth_entry(&ctx, "entry", &opts).await.map(|_| ()));
        }
        if !module.supports(Capability::SignMessage) {
            checked.push(module.sign_message(&ctx, "message", &opts).await.map(|_| ()));
        }
        if !module.supports(Capability::GetNetwork) {
            checked.push(module.get_network(&ctx).await.map(|_| ()));
        }
        if !module.supports(Capability::Disconnect) {
            checked.push(module.disconnect(&ctx).await);
        }

        for outcome in checked {
            let err = outcome.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedOperation, "{}", module.id());
            assert_eq!(err.to_normalized().code, -3, "{}", module.id());
        }
    }
}

#[tokio::test]
async fn test_picker_records_and_selects() {
    let freighter = FakeFreighter::missing();
    let kit = WalletsKit::builder()
        .modules(allow_all_modules_with(freighter))
        .store(Arc::new(MemoryStore::new()))
        .build()
        .unwrap();

    let picker = ScriptedPicker::with_script(vec![
        PickerEvent::Selected(FREIGHTER_ID.to_string()),
        PickerEvent::Selected(ALBEDO_ID.to_string()),
    ]);
    let picked = kit.open_picker(&picker).await.unwrap();

    assert_eq!(picked.listing.id(), ALBEDO_ID);
    assert_eq!(picked.address.address, key('A'));
    assert_eq!(*picker.homepages.lock().unwrap(), vec!["https://freighter.app".to_string()]);
    assert_eq!(picker.closes.load(Ordering::SeqCst), 1);
    assert_eq!(kit.used_wallets().read(), vec![ALBEDO_ID.to_string()]);

    let snapshot = kit.snapshot();
    assert_eq!(snapshot.selected_provider_id.as_deref(), Some(ALBEDO_ID));
    assert_eq!(snapshot.active_address, Some(key('A')));
}

#[tokio::test]
async fn test_picker_close_cancels() {
    let kit = WalletsKit::builder()
        .modules(allow_all_modules_with(FakeFreighter::connected(&key('F'))))
        .build()
        .unwrap();
    let picker = ScriptedPicker::with_script(vec![PickerEvent::Closed(
        stellar_wallets_kit::NormalizedError::new(-1, "Modal closed"),
    )]);

    let err = kit.open_picker(&picker).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UserCancelled);
    assert_eq!(picker.closes.load(Ordering::SeqCst), 1);
    assert!(kit.snapshot().selected_provider_id.is_none());
    assert!(kit.used_wallets().read().is_empty());
}

#[tokio::test]
async fn test_platform_wrapper_skips_picker() {
    let client = Arc::new(FakeSignClient::new(&["stellar:pubnet:GWRAPPED"]));
    let module = WalletConnectModule::new(
        wallet_connect_params(),
        client,
        HostEnvironment::new("freighter", "mobile"),
    );
    let kit = WalletsKit::builder()
        .module(StubModule::new("other", Probe::Ready(true)))
        .module(Arc::new(module))
        .build()
        .unwrap();

    let picker = ScriptedPicker::default();
    let picked = kit.open_picker(&picker).await.unwrap();

    assert_eq!(picked.listing.id(), WALLET_CONNECT_ID);
    assert!(picked.listing.is_platform_wrapper);
    assert_eq!(picked.address.address, "GWRAPPED");
    assert_eq!(picker.opens.load(Ordering::SeqCst), 0);
}

fn allow_all_modules_with(freighter: Arc<FakeFreighter>) -> Vec<Arc<dyn WalletModule>> {
    stellar_wallets_kit::allow_all_modules(&bindings(freighter), None)
}

#[tokio::test]
async fn test_account_balance_needs_address_and_horizon() {
    let kit = freighter_kit(FakeFreighter::connected(&key('F')));
    kit.select_provider(FREIGHTER_ID).unwrap();

    let err = kit.account_balance().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProviderUnavailable);

    kit.get_address(SignRequestOptions::default()).await.unwrap();
    let err = kit.account_balance().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("There is no Horizon URL set"));
}
