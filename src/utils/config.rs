use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::DEFAULT_PROBE_TIMEOUT;
use crate::errors::KitError;
use crate::logging::LoggingConfig;
use crate::types::WalletNetwork;
use crate::utils::Validator;
use crate::wallet::{TrezorManifest, WalletConnectMethod, WalletConnectParams};

#[derive(Debug, Clone)]
pub struct KitConfig {
    pub network: WalletNetwork,
    pub selected_wallet_id: Option<String>,
    pub probe_timeout: Duration,
    pub horizon_url: Option<String>,
    /// Where the used-wallets record lives; in memory when unset.
    pub storage_path: Option<PathBuf>,
    pub wallet_connect: Option<WalletConnectParams>,
    pub trezor: Option<TrezorManifest>,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            network: WalletNetwork::Testnet,
            selected_wallet_id: None,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            horizon_url: None,
            storage_path: None,
            wallet_connect: None,
            trezor: None,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl KitConfig {
    /// Read configuration from the process environment, loading `.env` first.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let network = match optional_var("STELLAR_NETWORK") {
            Some(raw) => raw
                .parse::<WalletNetwork>()
                .with_context(|| format!("STELLAR_NETWORK=\"{}\" is not a known network", raw))?,
            None => WalletNetwork::Testnet,
        };

        let probe_timeout = match optional_var("WALLETS_KIT_PROBE_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(
                raw.parse()
                    .with_context(|| format!("WALLETS_KIT_PROBE_TIMEOUT_MS=\"{}\" is not a number", raw))?,
            ),
            None => DEFAULT_PROBE_TIMEOUT,
        };

        Ok(Self {
            network,
            selected_wallet_id: optional_var("STELLAR_WALLET_ID"),
            probe_timeout,
            horizon_url: optional_var("HORIZON_URL"),
            storage_path: optional_var("WALLETS_KIT_STORAGE_PATH").map(PathBuf::from),
            wallet_connect: Self::wallet_connect_from_env(network)?,
            trezor: Self::trezor_from_env(),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_json: env::var("LOG_JSON")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }

    fn wallet_connect_from_env(network: WalletNetwork) -> Result<Option<WalletConnectParams>> {
        let Ok(project_id) = env::var("WALLET_CONNECT_PROJECT_ID") else {
            return Ok(None);
        };

        let method = match optional_var("WALLET_CONNECT_METHOD") {
            Some(raw) => raw.parse::<WalletConnectMethod>()?,
            None => WalletConnectMethod::Sign,
        };

        Ok(Some(WalletConnectParams {
            project_id,
            name: env::var("WALLET_CONNECT_NAME").unwrap_or_else(|_| "Stellar Wallets Kit".to_string()),
            description: env::var("WALLET_CONNECT_DESCRIPTION").unwrap_or_default(),
            url: env::var("WALLET_CONNECT_URL").unwrap_or_default(),
            icons: Vec::new(),
            method,
            network,
            session_id: None,
        }))
    }

    fn trezor_from_env() -> Option<TrezorManifest> {
        let app_name = optional_var("TREZOR_APP_NAME")?;
        Some(TrezorManifest {
            app_name,
            app_url: env::var("TREZOR_APP_URL").unwrap_or_default(),
            email: env::var("TREZOR_EMAIL").unwrap_or_default(),
            ..TrezorManifest::default()
        })
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            json: self.log_json,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.probe_timeout.is_zero() {
            return Err(KitError::Config("Probe timeout must be greater than zero".into()).into());
        }

        if let Some(wc) = &self.wallet_connect {
            if wc.project_id.trim().is_empty() {
                return Err(KitError::Config("WalletConnect project id is required".into()).into());
            }
        }

        if let Some(url) = &self.horizon_url {
            Validator::validate_url(url).map_err(|e| KitError::Config(e.to_string()))?;
        }

        Ok(())
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
