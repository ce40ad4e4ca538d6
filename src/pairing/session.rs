use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account a remote wallet bound to a bridge session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundAccount {
    /// Chain reference, e.g. `pubnet` or `testnet`.
    pub network: String,
    pub public_key: String,
}

/// An approved out-of-band session with a remote wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingSession {
    /// Bridge topic.
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub icon: Option<String>,
    pub accounts: Vec<BoundAccount>,
    pub paired_at: DateTime<Utc>,
}

impl PairingSession {
    pub fn holds(&self, public_key: &str) -> bool {
        self.accounts.iter().any(|a| a.public_key == public_key)
    }

    pub fn primary_account(&self) -> Option<&BoundAccount> {
        self.accounts.first()
    }
}

/// Session shape as reported by the bridge client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeSession {
    pub topic: String,
    pub peer: PeerMetadata,
    /// CAIP-10 style accounts: `stellar:<network>:<publicKey>`.
    pub accounts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerMetadata {
    pub name: String,
    pub description: String,
    pub url: String,
    pub icons: Vec<String>,
}

impl From<BridgeSession> for PairingSession {
    fn from(session: BridgeSession) -> Self {
        let accounts = session
            .accounts
            .iter()
            .filter_map(|account| {
                let mut parts = account.split(':');
                let _namespace = parts.next()?;
                let network = parts.next()?;
                let public_key = parts.next()?;
                Some(BoundAccount {
                    network: network.to_string(),
                    public_key: public_key.to_string(),
                })
            })
            .collect();

        PairingSession {
            id: session.topic,
            name: session.peer.name,
            description: session.peer.description,
            url: session.peer.url,
            icon: session.peer.icons.into_iter().next(),
            accounts,
            paired_at: Utc::now(),
        }
    }
}

/// Pick the session a request should go through.
///
/// With an address, only a session holding that address qualifies. Without one,
/// the explicitly activated session is used.
pub fn find_target_session<'a>(
    sessions: &'a [PairingSession],
    active_session: Option<&str>,
    address: Option<&str>,
) -> Option<&'a PairingSession> {
    match address {
        Some(public_key) => sessions.iter().find(|s| s.holds(public_key)),
        None => active_session.and_then(|id| sessions.iter().find(|s| s.id == id)),
    }
}
