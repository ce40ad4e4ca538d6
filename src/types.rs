use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::KitError;

/// Stellar networks a wallet can be asked to sign for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WalletNetwork {
    Public,
    Testnet,
    Futurenet,
    Sandbox,
    Standalone,
}

impl WalletNetwork {
    pub const ALL: [WalletNetwork; 5] = [
        WalletNetwork::Public,
        WalletNetwork::Testnet,
        WalletNetwork::Futurenet,
        WalletNetwork::Sandbox,
        WalletNetwork::Standalone,
    ];

    pub fn passphrase(&self) -> &'static str {
        match self {
            WalletNetwork::Public => "Public Global Stellar Network ; September 2015",
            WalletNetwork::Testnet => "Test SDF Network ; September 2015",
            WalletNetwork::Futurenet => "Test SDF Future Network ; October 2022",
            WalletNetwork::Sandbox => "Local Sandbox Stellar Network ; September 2022",
            WalletNetwork::Standalone => "Standalone Network ; February 2017",
        }
    }

    pub fn from_passphrase(passphrase: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.passphrase() == passphrase)
    }

    pub fn is_public(passphrase: &str) -> bool {
        passphrase == WalletNetwork::Public.passphrase()
    }
}

impl fmt::Display for WalletNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.passphrase())
    }
}

impl FromStr for WalletNetwork {
    type Err = KitError;

    /// Accepts either a short name (`public`, `testnet`, ...) or a full passphrase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" | "pubnet" | "mainnet" => Ok(WalletNetwork::Public),
            "testnet" => Ok(WalletNetwork::Testnet),
            "futurenet" => Ok(WalletNetwork::Futurenet),
            "sandbox" => Ok(WalletNetwork::Sandbox),
            "standalone" => Ok(WalletNetwork::Standalone),
            _ => Self::from_passphrase(s.trim()).ok_or_else(|| KitError::InvalidNetwork(s.to_string())),
        }
    }
}

impl TryFrom<String> for WalletNetwork {
    type Error = KitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WalletNetwork> for String {
    fn from(network: WalletNetwork) -> Self {
        network.passphrase().to_string()
    }
}

/// Category of wallet a provider module talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleType {
    HwWallet,
    HotWallet,
    BridgeWallet,
    AirGapedWallet,
}

/// Static identity of a registered provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    pub id: String,
    pub display_name: String,
    pub icon_url: String,
    pub homepage_url: String,
    pub category: ModuleType,
}

impl ProviderDescriptor {
    pub fn new(
        id: &str,
        display_name: &str,
        icon_url: &str,
        homepage_url: &str,
        category: ModuleType,
    ) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            icon_url: icon_url.to_string(),
            homepage_url: homepage_url.to_string(),
            category,
        }
    }
}

/// Operations a provider module may or may not implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    GetAddress,
    SignTransaction,
    SignAuthEntry,
    SignMessage,
    GetNetwork,
    Disconnect,
    PlatformWrapperDetection,
}

/// Per-call options. The façade fills `network_passphrase` from the session
/// when the caller leaves it empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequestOptions {
    pub network_passphrase: Option<String>,
    pub address: Option<String>,
    /// Hardware derivation path, e.g. `44'/148'/0'`.
    pub path: Option<String>,
    /// Ledger: sign the full signature base instead of the hash.
    #[serde(default)]
    pub non_blind_tx: bool,
    /// Freighter: skip the access prompt when reading the address.
    #[serde(default)]
    pub skip_request_access: bool,
}

impl SignRequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_network(mut self, passphrase: impl Into<String>) -> Self {
        self.network_passphrase = Some(passphrase.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn non_blind(mut self) -> Self {
        self.non_blind_tx = true;
        self
    }

    pub fn skip_request_access(mut self) -> Self {
        self.skip_request_access = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    pub signed_tx_xdr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedAuthEntry {
    pub signed_auth_entry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedMessage {
    pub signed_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDetails {
    pub network: String,
    pub network_passphrase: String,
}

/// One account read off a hardware device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareAccount {
    pub public_key: String,
    pub index: u32,
}

/// A provider as shown to the user: identity plus probe results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderListing {
    #[serde(flatten)]
    pub descriptor: ProviderDescriptor,
    pub is_available: bool,
    pub is_platform_wrapper: bool,
}

impl ProviderListing {
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }
}
