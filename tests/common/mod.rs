#![allow(dead_code)]

use async_trait::async_trait;
use futures::future::{self, FutureExt};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use stellar_wallets_kit::errors::NativeResult;
use stellar_wallets_kit::kit::{PickerEvent, WalletPickerUi};
use stellar_wallets_kit::pairing::{
    AccountSelectorEvent, BridgeSession, PairingPrompt, PairingPromptEvent, PairingUi,
    PeerMetadata,
};
use stellar_wallets_kit::wallet::*;
use stellar_wallets_kit::{
    AddressResponse, Capability, HardwareAccount, KitError, ModuleType, NetworkDetails, NormalizedError,
    ProviderDescriptor, ProviderListing, Result, SignRequestOptions, SignedAuthEntry,
    SignedMessage, SignedTransaction, WalletNetwork,
};

/// A syntactically valid account id built from one base32 letter.
pub fn key(letter: char) -> String {
    format!("G{}", letter.to_string().repeat(55))
}

/// Account id a fake device reports for the last index of `path`.
pub fn device_key(path: &str) -> String {
    let index: u32 = path
        .rsplit('/')
        .next()
        .map(|segment| segment.trim_end_matches('\''))
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(u32::MAX);
    format!("GDEVICE{:0>49}", index)
}

// Freighter

pub struct FakeFreighter {
    pub connected: bool,
    pub address: Mutex<String>,
    pub reject_address: Mutex<Option<Value>>,
    pub access_requests: AtomicUsize,
    pub address_calls: AtomicUsize,
    pub seen_passphrases: Mutex<Vec<Option<String>>>,
}

impl FakeFreighter {
    fn build(connected: bool, address: &str) -> Arc<Self> {
        Arc::new(Self {
            connected,
            address: Mutex::new(address.to_string()),
            reject_address: Mutex::new(None),
            access_requests: AtomicUsize::new(0),
            address_calls: AtomicUsize::new(0),
            seen_passphrases: Mutex::new(Vec::new()),
        })
    }

    pub fn connected(address: &str) -> Arc<Self> {
        Self::build(true, address)
    }

    pub fn missing() -> Arc<Self> {
        Self::build(false, "")
    }
}

#[async_trait]
impl FreighterApi for FakeFreighter {
    async fn is_connected(&self) -> NativeResult<bool> {
        Ok(self.connected)
    }

    async fn request_access(&self) -> NativeResult<String> {
        self.access_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.address.lock().unwrap().clone())
    }

    async fn get_address(&self) -> NativeResult<String> {
        self.address_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(rejection) = self.reject_address.lock().unwrap().clone() {
            return Err(rejection);
        }
        Ok(self.address.lock().unwrap().clone())
    }

    async fn sign_transaction(
        &self,
        xdr: &str,
        opts: &FreighterSignOptions,
    ) -> NativeResult<SignedTransaction> {
        self.seen_passphrases
            .lock()
            .unwrap()
            .push(opts.network_passphrase.clone());
        Ok(SignedTransaction {
            signed_tx_xdr: format!("signed:{}", xdr),
            signer_address: opts.address.clone(),
        })
    }

    async fn sign_auth_entry(
        &self,
        _auth_entry: &str,
        opts: &FreighterSignOptions,
    ) -> NativeResult<FreighterSignature<Vec<u8>>> {
        self.seen_passphrases
            .lock()
            .unwrap()
            .push(opts.network_passphrase.clone());
        Ok(FreighterSignature {
            signed: Some(vec![1, 2, 3]),
            signer_address: Some(self.address.lock().unwrap().clone()),
        })
    }

    async fn sign_message(
        &self,
        message: &str,
        opts: &FreighterSignOptions,
    ) -> NativeResult<FreighterSignature<MessagePayload>> {
        self.seen_passphrases
            .lock()
            .unwrap()
            .push(opts.network_passphrase.clone());
        Ok(FreighterSignature {
            signed: Some(MessagePayload::Text(format!("signed:{}", message))),
            signer_address: Some(self.address.lock().unwrap().clone()),
        })
    }

    async fn get_network(&self) -> NativeResult<NetworkDetails> {
        Ok(NetworkDetails {
            network: "TESTNET".to_string(),
            network_passphrase: WalletNetwork::Testnet.passphrase().to_string(),
        })
    }
}

// Albedo

#[derive(Default)]
pub struct FakeAlbedo {
    pub intents: Mutex<Vec<AlbedoTxIntent>>,
}

#[async_trait]
impl AlbedoApi for FakeAlbedo {
    async fn public_key(&self) -> NativeResult<String> {
        Ok(key('A'))
    }

    async fn tx(&self, intent: AlbedoTxIntent) -> NativeResult<String> {
        let signed = format!("signed:{}", intent.xdr);
        self.intents.lock().unwrap().push(intent);
        Ok(signed)
    }
}

// xBull

#[derive(Default)]
pub struct FakeXBull {
    pub reject: bool,
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
}

struct FakeXBullBridge {
    reject: bool,
    closed: Arc<AtomicUsize>,
}

impl XBullConnector for FakeXBull {
    fn open(&self) -> Box<dyn XBullBridge> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Box::new(FakeXBullBridge {
            reject: self.reject,
            closed: self.closed.clone(),
        })
    }
}

#[async_trait]
impl XBullBridge for FakeXBullBridge {
    async fn connect(&self) -> NativeResult<String> {
        if self.reject {
            return Err(json!({ "code": -1, "message": "Request was rejected" }));
        }
        Ok(key('X'))
    }

    async fn sign(&self, request: XBullSignRequest) -> NativeResult<String> {
        if self.reject {
            return Err(json!({ "code": -1, "message": "Request was rejected" }));
        }
        Ok(format!("signed:{}", request.xdr))
    }

    async fn sign_message(
        &self,
        message: &str,
        opts: &XBullMessageOptions,
    ) -> NativeResult<SignedMessage> {
        Ok(SignedMessage {
            signed_message: format!("signed:{}", message),
            signer_address: opts.address.clone(),
        })
    }

    fn close_connections(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

// LOBSTR

pub struct FakeLobstr {
    pub connected: bool,
}

#[async_trait]
impl LobstrApi for FakeLobstr {
    async fn is_connected(&self) -> bool {
        self.connected
    }

    async fn get_public_key(&self) -> NativeResult<String> {
        Ok(key('L'))
    }

    async fn sign_transaction(&self, xdr: &str) -> NativeResult<String> {
        Ok(format!("signed:{}", xdr))
    }
}

// Rabet

pub struct FakeRabet {
    pub injected: bool,
    pub networks: Mutex<Vec<RabetNetwork>>,
}

impl FakeRabet {
    pub fn new(injected: bool) -> Self {
        Self {
            injected,
            networks: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RabetApi for FakeRabet {
    fn is_injected(&self) -> bool {
        self.injected
    }

    async fn connect(&self) -> NativeResult<String> {
        Ok(key('R'))
    }

    async fn sign(&self, xdr: &str, network: RabetNetwork) -> NativeResult<Option<String>> {
        self.networks.lock().unwrap().push(network);
        Ok(Some(format!("signed:{}", xdr)))
    }
}

// Hana

pub struct FakeHana {
    pub injected: bool,
    pub accounts_to_sign: Mutex<Vec<Option<String>>>,
}

impl FakeHana {
    pub fn new(injected: bool) -> Self {
        Self {
            injected,
            accounts_to_sign: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl HanaApi for FakeHana {
    fn is_injected(&self) -> bool {
        self.injected
    }

    async fn get_public_key(&self) -> NativeResult<String> {
        Ok(key('H'))
    }

    async fn sign_transaction(&self, request: HanaSignRequest) -> NativeResult<String> {
        self.accounts_to_sign
            .lock()
            .unwrap()
            .push(request.account_to_sign);
        Ok(format!("signed:{}", request.xdr))
    }

    async fn sign_auth_entry(
        &self,
        auth_entry: &str,
        account_to_sign: Option<&str>,
    ) -> NativeResult<String> {
        self.accounts_to_sign
            .lock()
            .unwrap()
            .push(account_to_sign.map(str::to_string));
        Ok(format!("signed:{}", auth_entry))
    }

    async fn sign_message(&self, message: &str, account_to_sign: Option<&str>) -> NativeResult<String> {
        self.accounts_to_sign
            .lock()
            .unwrap()
            .push(account_to_sign.map(str::to_string));
        Ok(format!("signed:{}", message))
    }
}

// HOT Wallet

#[derive(Default)]
pub struct FakeHotWallet {
    pub calls: Mutex<Vec<(String, Value)>>,
}

#[async_trait]
impl HotWalletApi for FakeHotWallet {
    async fn request(&self, method: &str, params: Value) -> NativeResult<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params.clone()));
        match method {
            "stellar:getAddress" => Ok(json!({ "address": key('O') })),
            "stellar:signTransaction" => Ok(json!({ "signedTxXdr": "signed-by-hot" })),
            "stellar:signAuthEntry" => Ok(json!({ "signedAuthEntry": "entry-by-hot" })),
            "stellar:signMessage" => Ok(json!({ "signedMessage": "message-by-hot" })),
            _ => Err(json!({ "error": { "code": -32601, "message": "Method not found" } })),
        }
    }
}

// Klever

pub struct FakeKlever {
    pub injected: bool,
}

#[async_trait]
impl KleverApi for FakeKlever {
    fn is_injected(&self) -> bool {
        self.injected
    }

    async fn get_address(&self) -> NativeResult<Value> {
        Ok(json!({ "address": key('K') }))
    }

    async fn sign_transaction(&self, xdr: &str, _opts: &SignRequestOptions) -> NativeResult<Value> {
        Ok(json!({ "signedTxXdr": format!("signed:{}", xdr), "signerAddress": key('K') }))
    }

    async fn sign_auth_entry(&self, _auth_entry: &str, _opts: &SignRequestOptions) -> NativeResult<Value> {
        Ok(json!({ "unexpected": true }))
    }

    async fn sign_message(&self, message: &str, _opts: &SignRequestOptions) -> NativeResult<Value> {
        Ok(json!({ "signedMessage": format!("signed:{}", message) }))
    }

    async fn get_network(&self) -> NativeResult<Value> {
        Ok(json!({
            "network": "PUBLIC",
            "networkPassphrase": WalletNetwork::Public.passphrase(),
        }))
    }
}

// Transaction codec

pub struct FakeCodec;

pub struct FakeEnvelope {
    xdr: String,
    passphrase: String,
    signatures: Vec<String>,
}

impl TransactionCodec for FakeCodec {
    fn decode(&self, xdr: &str, network_passphrase: &str) -> NativeResult<Box<dyn TransactionEnvelope>> {
        if xdr.is_empty() {
            return Err(json!({ "code": -1, "message": "Empty transaction" }));
        }
        Ok(Box::new(FakeEnvelope {
            xdr: xdr.to_string(),
            passphrase: network_passphrase.to_string(),
            signatures: Vec::new(),
        }))
    }
}

impl TransactionEnvelope for FakeEnvelope {
    fn signature_base(&self) -> Vec<u8> {
        format!("{}|{}", self.passphrase, self.xdr).into_bytes()
    }

    fn add_signature(&mut self, public_key: &str, signature_base64: &str) -> NativeResult<()> {
        self.signatures
            .push(format!("{}:{}", public_key, signature_base64));
        Ok(())
    }

    fn to_xdr(&self) -> String {
        format!("{}+{}", self.xdr, self.signatures.join(","))
    }
}

// Ledger

#[derive(Default)]
pub struct FakeLedgerApp {
    pub hash_signs: Mutex<Vec<(String, Vec<u8>)>>,
    pub full_signs: Mutex<Vec<(String, Vec<u8>)>>,
    pub key_reads: AtomicUsize,
    pub closed: AtomicUsize,
}

#[async_trait]
impl LedgerStellarApp for FakeLedgerApp {
    async fn get_public_key(&self, path: &str) -> NativeResult<String> {
        self.key_reads.fetch_add(1, Ordering::SeqCst);
        Ok(device_key(path))
    }

    async fn sign_hash(&self, path: &str, hash: &[u8]) -> NativeResult<Vec<u8>> {
        self.hash_signs
            .lock()
            .unwrap()
            .push((path.to_string(), hash.to_vec()));
        Ok(vec![1, 2, 3])
    }

    async fn sign_transaction(&self, path: &str, signature_base: &[u8]) -> NativeResult<Vec<u8>> {
        self.full_signs
            .lock()
            .unwrap()
            .push((path.to_string(), signature_base.to_vec()));
        Ok(vec![4, 5, 6])
    }

    async fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeLedgerFactory {
    pub supported: bool,
    pub app: Arc<FakeLedgerApp>,
    pub created: AtomicUsize,
}

impl FakeLedgerFactory {
    pub fn new(supported: bool) -> Arc<Self> {
        Arc::new(Self {
            supported,
            app: Arc::new(FakeLedgerApp::default()),
            created: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl LedgerTransportFactory for FakeLedgerFactory {
    async fn is_supported(&self) -> bool {
        self.supported
    }

    async fn create(&self) -> NativeResult<Arc<dyn LedgerStellarApp>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(self.app.clone())
    }
}

// Trezor

#[derive(Default)]
pub struct FakeTrezor {
    pub fail_init: bool,
    pub batches: Mutex<Vec<Vec<String>>>,
    pub signed: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl TrezorConnect for FakeTrezor {
    async fn init(&self, _manifest: &TrezorManifest) -> NativeResult<()> {
        if self.fail_init {
            return Err(json!({ "error": { "code": 10, "message": "Manifest not set" } }));
        }
        Ok(())
    }

    async fn get_address(&self, path: &str) -> NativeResult<String> {
        Ok(device_key(path))
    }

    async fn get_addresses(&self, paths: &[String]) -> NativeResult<Vec<String>> {
        self.batches.lock().unwrap().push(paths.to_vec());
        Ok(paths.iter().map(|p| device_key(p)).collect())
    }

    async fn sign_transaction(
        &self,
        path: &str,
        _xdr: &str,
        network_passphrase: &str,
    ) -> NativeResult<String> {
        self.signed
            .lock()
            .unwrap()
            .push((path.to_string(), network_passphrase.to_string()));
        Ok("0x010203".to_string())
    }
}

// WalletConnect

pub struct FakeSignClient {
    pub accounts: Vec<String>,
    pub hold_approval: bool,
    pub reject_approval: bool,
    /// How long the remote wallet takes to approve a pairing.
    pub approval_delay: Duration,
    pub connects: AtomicUsize,
    pub listed: Arc<Mutex<Vec<BridgeSession>>>,
    pub requests: Mutex<Vec<(String, String, String)>>,
    pub disconnected: Mutex<Vec<String>>,
    pub delete_listeners: Mutex<Vec<SessionDeletedCallback>>,
}

impl FakeSignClient {
    pub fn new(accounts: &[&str]) -> Self {
        Self {
            accounts: accounts.iter().map(|a| a.to_string()).collect(),
            hold_approval: false,
            reject_approval: false,
            approval_delay: Duration::ZERO,
            connects: AtomicUsize::new(0),
            listed: Arc::new(Mutex::new(Vec::new())),
            requests: Mutex::new(Vec::new()),
            disconnected: Mutex::new(Vec::new()),
            delete_listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn session(topic: &str, accounts: &[String]) -> BridgeSession {
        BridgeSession {
            topic: topic.to_string(),
            peer: PeerMetadata {
                name: "Fake Wallet".to_string(),
                ..PeerMetadata::default()
            },
            accounts: accounts.to_vec(),
        }
    }

    /// The remote wallet drops `topic` and notifies every listener.
    pub fn delete_remotely(&self, topic: &str) {
        self.listed.lock().unwrap().retain(|s| s.topic != topic);
        for listener in self.delete_listeners.lock().unwrap().iter() {
            listener(topic.to_string());
        }
    }
}

#[async_trait]
impl SignClient for FakeSignClient {
    async fn connect(&self, _required: RequiredNamespace) -> NativeResult<BridgeConnection> {
        let n = self.connects.fetch_add(1, Ordering::SeqCst) + 1;
        let topic = format!("topic-{}", n);
        let session = Self::session(&topic, &self.accounts);

        let approval = if self.hold_approval {
            future::pending::<NativeResult<BridgeSession>>().boxed()
        } else if self.reject_approval {
            future::ready(Err::<BridgeSession, Value>(json!({ "code": 5000, "message": "User rejected." }))).boxed()
        } else {
            let listed = self.listed.clone();
            let delay = self.approval_delay;
            async move {
                tokio::time::sleep(delay).await;
                listed.lock().unwrap().push(session.clone());
                Ok(session)
            }
            .boxed()
        };

        Ok(BridgeConnection {
            uri: Some(format!("wc:{}@2?relay-protocol=irn&symKey=00", topic)),
            approval,
        })
    }

    async fn sessions(&self) -> NativeResult<Vec<BridgeSession>> {
        Ok(self.listed.lock().unwrap().clone())
    }

    async fn request(&self, topic: &str, chain_id: &str, method: &str, _params: Value) -> NativeResult<Value> {
        if !self.listed.lock().unwrap().iter().any(|s| s.topic == topic) {
            return Err(json!({
                "code": 7001,
                "message": format!("No matching key. session topic doesn't exist: {}", topic),
            }));
        }
        self.requests.lock().unwrap().push((
            topic.to_string(),
            chain_id.to_string(),
            method.to_string(),
        ));
        Ok(json!({ "signedXDR": format!("signed-via-{}", topic) }))
    }

    async fn disconnect(&self, topic: &str, _reason: DisconnectReason) -> NativeResult<()> {
        self.disconnected.lock().unwrap().push(topic.to_string());
        self.listed.lock().unwrap().retain(|s| s.topic != topic);
        Ok(())
    }

    fn on_session_delete(&self, callback: SessionDeletedCallback) {
        self.delete_listeners.lock().unwrap().push(callback);
    }
}

pub fn wallet_connect_params() -> WalletConnectParams {
    WalletConnectParams {
        project_id: "test-project".to_string(),
        name: "Kit tests".to_string(),
        description: String::new(),
        url: "https://example.org".to_string(),
        icons: Vec::new(),
        method: WalletConnectMethod::Sign,
        network: WalletNetwork::Public,
        session_id: None,
    }
}

// Pairing UI

#[derive(Default)]
pub struct ScriptedPairingUi {
    pub selector_script: Mutex<Vec<AccountSelectorEvent>>,
    pub close_prompt: AtomicBool,
    pub held_selector: Mutex<Option<mpsc::UnboundedSender<AccountSelectorEvent>>>,
    pub held_prompt: Mutex<Option<mpsc::UnboundedSender<PairingPromptEvent>>>,
    pub prompts: Mutex<Vec<PairingPrompt>>,
    pub shown_pages: Mutex<Vec<u32>>,
    pub selector_closes: AtomicUsize,
    pub prompt_closes: AtomicUsize,
}

impl PairingUi for ScriptedPairingUi {
    fn open_account_selector(&self, events: mpsc::UnboundedSender<AccountSelectorEvent>) {
        for event in self.selector_script.lock().unwrap().drain(..) {
            events.send(event).unwrap();
        }
        *self.held_selector.lock().unwrap() = Some(events);
    }

    fn show_accounts(&self, page: u32, _accounts: &[HardwareAccount]) {
        self.shown_pages.lock().unwrap().push(page);
    }

    fn close_account_selector(&self) {
        self.selector_closes.fetch_add(1, Ordering::SeqCst);
    }

    fn open_pairing_prompt(&self, prompt: PairingPrompt, events: mpsc::UnboundedSender<PairingPromptEvent>) {
        self.prompts.lock().unwrap().push(prompt);
        if self.close_prompt.load(Ordering::SeqCst) {
            events
                .send(PairingPromptEvent::Closed(NormalizedError::new(-1, "Modal closed")))
                .unwrap();
        }
        *self.held_prompt.lock().unwrap() = Some(events);
    }

    fn close_pairing_prompt(&self) {
        self.prompt_closes.fetch_add(1, Ordering::SeqCst);
    }
}

// Wallet picker UI

#[derive(Default)]
pub struct ScriptedPicker {
    pub script: Mutex<Vec<PickerEvent>>,
    pub held: Mutex<Option<mpsc::UnboundedSender<PickerEvent>>>,
    pub shown: Mutex<Vec<ProviderListing>>,
    pub homepages: Mutex<Vec<String>>,
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
}

impl ScriptedPicker {
    pub fn with_script(script: Vec<PickerEvent>) -> Self {
        let picker = Self::default();
        *picker.script.lock().unwrap() = script;
        picker
    }
}

impl WalletPickerUi for ScriptedPicker {
    fn open(&self, listings: &[ProviderListing], events: mpsc::UnboundedSender<PickerEvent>) {
        self.opens.fetch_add(1, Ordering::SeqCst);
        *self.shown.lock().unwrap() = listings.to_vec();
        for event in self.script.lock().unwrap().drain(..) {
            events.send(event).unwrap();
        }
        *self.held.lock().unwrap() = Some(events);
    }

    fn open_homepage(&self, url: &str) {
        self.homepages.lock().unwrap().push(url.to_string());
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

// Probe stubs

pub enum Probe {
    Ready(bool),
    Hang,
}

/// A module whose readiness answer is scripted; every operation is unsupported.
pub struct StubModule {
    descriptor: ProviderDescriptor,
    probe: Probe,
    wrapper: bool,
}

impl StubModule {
    pub fn new(id: &str, probe: Probe) -> Arc<Self> {
        Arc::new(Self {
            descriptor: ProviderDescriptor::new(id, id, "", &format!("https://{}.example", id), ModuleType::HotWallet),
            probe,
            wrapper: false,
        })
    }

    pub fn wrapper(id: &str) -> Arc<Self> {
        Arc::new(Self {
            descriptor: ProviderDescriptor::new(id, id, "", "", ModuleType::HotWallet),
            probe: Probe::Ready(true),
            wrapper: true,
        })
    }
}

#[async_trait]
impl WalletModule for StubModule {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn capabilities(&self) -> &'static [Capability] {
        if self.wrapper {
            &[Capability::PlatformWrapperDetection]
        } else {
            &[]
        }
    }

    async fn is_available(&self) -> bool {
        match self.probe {
            Probe::Ready(answer) => answer,
            Probe::Hang => future::pending().await,
        }
    }

    async fn is_platform_wrapper(&self) -> bool {
        self.wrapper
    }

    async fn get_address(&self, _ctx: &ModuleContext, _opts: &SignRequestOptions) -> Result<AddressResponse> {
        Err(KitError::unsupported(&self.descriptor.display_name, "getAddress"))
    }

    async fn sign_transaction(
        &self,
        _ctx: &ModuleContext,
        _xdr: &str,
        _opts: &SignRequestOptions,
    ) -> Result<SignedTransaction> {
        Err(KitError::unsupported(&self.descriptor.display_name, "signTransaction"))
    }

    async fn sign_auth_entry(
        &self,
        _ctx: &ModuleContext,
        _auth_entry: &str,
        _opts: &SignRequestOptions,
    ) -> Result<SignedAuthEntry> {
        Err(KitError::unsupported(&self.descriptor.display_name, "signAuthEntry"))
    }

    async fn sign_message(
        &self,
        _ctx: &ModuleContext,
        _message: &str,
        _opts: &SignRequestOptions,
    ) -> Result<SignedMessage> {
        Err(KitError::unsupported(&self.descriptor.display_name, "signMessage"))
    }

    async fn get_network(&self, _ctx: &ModuleContext) -> Result<NetworkDetails> {
        Err(KitError::unsupported(&self.descriptor.display_name, "getNetwork"))
    }
}

// Wiring

pub fn bindings(freighter: Arc<FakeFreighter>) -> ModuleBindings {
    ModuleBindings {
        host: HostEnvironment::default(),
        albedo: Arc::new(FakeAlbedo::default()),
        freighter,
        rabet: Arc::new(FakeRabet::new(true)),
        xbull: Arc::new(FakeXBull::default()),
        lobstr: Arc::new(FakeLobstr { connected: true }),
        hana: Arc::new(FakeHana::new(true)),
        hot_wallet: Arc::new(FakeHotWallet::default()),
        klever: Arc::new(FakeKlever { injected: true }),
    }
}

/// One instance of every provider module, all backed by fakes.
pub fn every_module() -> Vec<Arc<dyn WalletModule>> {
    let mut modules = allow_all_modules(&bindings(FakeFreighter::connected(&key('F'))), None);
    let ledger = LedgerModule::new(FakeLedgerFactory::new(true), Arc::new(FakeCodec));
    let trezor = TrezorModule::new(
        Arc::new(FakeTrezor::default()),
        Arc::new(FakeCodec),
        TrezorManifest::default(),
    );
    let wallet_connect = WalletConnectModule::new(
        wallet_connect_params(),
        Arc::new(FakeSignClient::new(&[])),
        HostEnvironment::default(),
    );
    modules.push(Arc::new(ledger));
    modules.push(Arc::new(trezor));
    modules.push(Arc::new(wallet_connect));
    modules
}
