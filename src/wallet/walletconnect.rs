use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::{HostEnvironment, ModuleContext, WalletModule};
use crate::constants::GENERIC_ERROR_CODE;
use crate::errors::{KitError, NativeResult, NormalizedError, Result};
use crate::pairing::{find_target_session, BridgeSession, PairingSession, PendingPairing};
use crate::types::{
    AddressResponse, Capability, ModuleType, NetworkDetails, ProviderDescriptor,
    SignRequestOptions, SignedAuthEntry, SignedMessage, SignedTransaction, WalletNetwork,
};

pub const WALLET_CONNECT_ID: &str = "wallet_connect";

pub const PUBNET_CHAIN: &str = "stellar:pubnet";
pub const TESTNET_CHAIN: &str = "stellar:testnet";

/// Chain id for a passphrase; anything but the public network maps to testnet.
pub fn chain_for_passphrase(passphrase: Option<&str>) -> &'static str {
    match passphrase {
        Some(p) if WalletNetwork::is_public(p) => PUBNET_CHAIN,
        _ => TESTNET_CHAIN,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletConnectMethod {
    #[serde(rename = "stellar_signXDR")]
    Sign,
    #[serde(rename = "stellar_signAndSubmitXDR")]
    SignAndSubmit,
}

impl WalletConnectMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletConnectMethod::Sign => "stellar_signXDR",
            WalletConnectMethod::SignAndSubmit => "stellar_signAndSubmitXDR",
        }
    }
}

impl fmt::Display for WalletConnectMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletConnectMethod {
    type Err = KitError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "stellar_signXDR" | "sign" => Ok(WalletConnectMethod::Sign),
            "stellar_signAndSubmitXDR" | "sign_and_submit" => Ok(WalletConnectMethod::SignAndSubmit),
            other => Err(KitError::Config(format!(
                "Unknown WalletConnect method \"{}\"",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConnectParams {
    pub project_id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub icons: Vec<String>,
    pub method: WalletConnectMethod,
    pub network: WalletNetwork,
    /// Session to use before any pairing happens.
    pub session_id: Option<String>,
}

/// Capabilities requested from the remote wallet when pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredNamespace {
    pub methods: Vec<String>,
    pub chains: Vec<String>,
    pub events: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisconnectReason {
    pub message: String,
    pub code: i64,
}

pub struct BridgeConnection {
    pub uri: Option<String>,
    pub approval: BoxFuture<'static, NativeResult<BridgeSession>>,
}

pub type SessionDeletedCallback = Box<dyn Fn(String) + Send + Sync>;

/// WalletConnect sign client.
#[async_trait]
pub trait SignClient: Send + Sync {
    async fn connect(&self, required: RequiredNamespace) -> NativeResult<BridgeConnection>;

    async fn sessions(&self) -> NativeResult<Vec<BridgeSession>>;

    async fn request(&self, topic: &str, chain_id: &str, method: &str, params: Value) -> NativeResult<Value>;

    async fn disconnect(&self, topic: &str, reason: DisconnectReason) -> NativeResult<()>;

    fn on_session_delete(&self, callback: SessionDeletedCallback);
}

pub struct WalletConnectModule {
    descriptor: ProviderDescriptor,
    params: WalletConnectParams,
    client: Arc<dyn SignClient>,
    host: HostEnvironment,
    active_session: Arc<RwLock<Option<String>>>,
    // Held across lookup and pairing so concurrent calls share one approval flow.
    pairing_gate: Mutex<()>,
}

impl WalletConnectModule {
    pub fn new(params: WalletConnectParams, client: Arc<dyn SignClient>, host: HostEnvironment) -> Self {
        let active_session = Arc::new(RwLock::new(params.session_id.clone()));
        Self {
            descriptor: ProviderDescriptor::new(
                WALLET_CONNECT_ID,
                "Wallet Connect",
                "https://stellar.creit.tech/wallet-icons/walletconnect.png",
                "https://walletconnect.com/",
                ModuleType::BridgeWallet,
            ),
            params,
            client,
            host,
            active_session,
            pairing_gate: Mutex::new(()),
        }
    }

    /// Make `session_id` (a bridge topic) the session used when a request
    /// names no address.
    pub async fn set_session(&self, session_id: &str) {
        *self.active_session.write().await = Some(session_id.to_string());
    }

    pub async fn active_session(&self) -> Option<String> {
        self.active_session.read().await.clone()
    }

    /// Sessions the bridge client currently holds.
    pub async fn get_sessions(&self) -> Result<Vec<PairingSession>> {
        let sessions = self.client.sessions().await.map_err(KitError::from_native)?;
        Ok(sessions.into_iter().map(PairingSession::from).collect())
    }

    pub async fn close_session(
        &self,
        ctx: &ModuleContext,
        session_id: &str,
        reason: Option<&str>,
    ) -> Result<()> {
        let reason = DisconnectReason {
            message: reason.unwrap_or("Session closed").to_string(),
            code: GENERIC_ERROR_CODE,
        };
        self.client
            .disconnect(session_id, reason)
            .await
            .map_err(KitError::from_native)?;

        ctx.pairing().forget_bridge_session(session_id);
        let mut active = self.active_session.write().await;
        if active.as_deref() == Some(session_id) {
            *active = None;
        }
        info!("🔗 Closed bridge session {}", session_id);
        Ok(())
    }

    /// Run `callback` with the topic of every session the remote wallet
    /// deletes. The kit forgets the session before the callback runs.
    pub fn on_session_deleted(&self, ctx: &ModuleContext, callback: SessionDeletedCallback) {
        let pairing = ctx.pairing().clone();
        let active_session = self.active_session.clone();

        self.client.on_session_delete(Box::new(move |topic: String| {
            pairing.forget_bridge_session(&topic);
            match active_session.try_write() {
                Ok(mut active) if active.as_deref() == Some(topic.as_str()) => *active = None,
                Ok(_) => {}
                // The next lookup prunes it instead.
                Err(_) => debug!("Active session busy while {} was deleted", topic),
            }
            info!("🔗 Bridge session {} deleted by the wallet", topic);
            callback(topic);
        }));
    }

    /// Sessions the client still holds. Stored sessions the client no longer
    /// lists were deleted remotely and are forgotten here.
    async fn live_sessions(&self, ctx: &ModuleContext) -> Result<Vec<PairingSession>> {
        let live = self.get_sessions().await?;
        let is_live = |id: &str| live.iter().any(|session| session.id == id);

        for stale in ctx.bridge_sessions().iter().filter(|known| !is_live(known.id.as_str())) {
            debug!("Dropping bridge session {}, the wallet no longer holds it", stale.id);
            ctx.pairing().forget_bridge_session(&stale.id);
        }

        let mut active = self.active_session.write().await;
        if active.as_deref().is_some_and(|id| !is_live(id)) {
            *active = None;
        }
        drop(active);

        Ok(live)
    }

    /// Reuse a session holding `address` (or the active one when no address is
    /// given); otherwise pair a new one.
    async fn target_session(&self, ctx: &ModuleContext, address: Option<&str>) -> Result<PairingSession> {
        let _gate = self.pairing_gate.lock().await;
        let sessions = self.live_sessions(ctx).await?;
        let active = self.active_session().await;

        if let Some(session) = find_target_session(&sessions, active.as_deref(), address) {
            debug!("Reusing bridge session {}", session.id);
            return Ok(session.clone());
        }

        let session = self.pair(ctx).await?;
        self.set_session(&session.id).await;
        Ok(session)
    }

    async fn pair(&self, ctx: &ModuleContext) -> Result<PairingSession> {
        let required = RequiredNamespace {
            methods: vec![self.params.method.to_string()],
            chains: vec![chain_for_passphrase(Some(self.params.network.passphrase())).to_string()],
            events: Vec::new(),
        };

        let connection = self
            .client
            .connect(required)
            .await
            .map_err(KitError::from_native)?;

        let pending = PendingPairing {
            uri: connection.uri,
            approval: connection
                .approval
                .map(|outcome| outcome.map(PairingSession::from))
                .boxed(),
        };
        ctx.pairing().pair_bridge(pending).await
    }
}

#[async_trait]
impl WalletModule for WalletConnectModule {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[
            Capability::GetAddress,
            Capability::SignTransaction,
            Capability::Disconnect,
            Capability::PlatformWrapperDetection,
        ]
    }

    /// The bridge falls back to a QR code, so it is always usable.
    async fn is_available(&self) -> bool {
        true
    }

    async fn is_platform_wrapper(&self) -> bool {
        self.host.is_freighter_mobile()
    }

    async fn get_address(&self, ctx: &ModuleContext, _opts: &SignRequestOptions) -> Result<AddressResponse> {
        let session = self.target_session(ctx, None).await?;
        let account = session
            .primary_account()
            .ok_or_else(|| KitError::unavailable("The paired wallet did not share any account"))?;
        Ok(AddressResponse {
            address: account.public_key.clone(),
        })
    }

    async fn sign_transaction(
        &self,
        ctx: &ModuleContext,
        xdr: &str,
        opts: &SignRequestOptions,
    ) -> Result<SignedTransaction> {
        let session = self.target_session(ctx, opts.address.as_deref()).await?;
        let chain_id = chain_for_passphrase(opts.network_passphrase.as_deref());

        let answer = self
            .client
            .request(&session.id, chain_id, self.params.method.as_str(), json!({ "xdr": xdr }))
            .await
            .map_err(KitError::from_native)?;

        let signed_tx_xdr = answer
            .get("signedXDR")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                KitError::Native(NormalizedError::new(
                    GENERIC_ERROR_CODE,
                    "WalletConnect response did not include a signed transaction",
                ))
            })?;

        Ok(SignedTransaction {
            signed_tx_xdr,
            signer_address: None,
        })
    }

    async fn sign_auth_entry(
        &self,
        _ctx: &ModuleContext,
        _auth_entry: &str,
        _opts: &SignRequestOptions,
    ) -> Result<SignedAuthEntry> {
        Err(KitError::unsupported("WalletConnect", "signAuthEntry"))
    }

    async fn sign_message(
        &self,
        _ctx: &ModuleContext,
        _message: &str,
        _opts: &SignRequestOptions,
    ) -> Result<SignedMessage> {
        Err(KitError::unsupported("WalletConnect", "signMessage"))
    }

    async fn get_network(&self, _ctx: &ModuleContext) -> Result<NetworkDetails> {
        Err(KitError::unsupported("WalletConnect", "getNetwork"))
    }

    /// Closes every session the client holds.
    async fn disconnect(&self, ctx: &ModuleContext) -> Result<()> {
        for session in self.get_sessions().await? {
            self.close_session(ctx, &session.id, None).await?;
        }
        for stale in ctx.bridge_sessions() {
            ctx.pairing().forget_bridge_session(&stale.id);
        }
        *self.active_session.write().await = None;
        Ok(())
    }
}
