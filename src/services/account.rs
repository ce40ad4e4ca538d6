use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::{KitError, Result};
use crate::utils::{format_address, with_timeout, Validator};

const HORIZON_TIMEOUT: Duration = Duration::from_secs(10);

/// Reads account data from a Horizon server.
pub struct AccountService {
    client: Client,
    horizon_url: Option<String>,
}

impl AccountService {
    pub fn new(horizon_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            horizon_url,
        }
    }

    pub fn horizon_url(&self) -> Option<&str> {
        self.horizon_url.as_deref()
    }

    /// Native (XLM) balance of `public_key`, as Horizon formats it.
    pub async fn fetch_native_balance(&self, public_key: &str) -> Result<String> {
        Validator::validate_public_key(public_key)?;
        let horizon = self
            .horizon_url
            .as_deref()
            .ok_or_else(|| KitError::Config("There is no Horizon URL set".to_string()))?;

        let url = format!(
            "{}/accounts/{}",
            horizon.trim_end_matches('/'),
            urlencoding::encode(public_key)
        );
        debug!("Fetching account {}", url);

        let account = with_timeout(self.fetch_json(&url), HORIZON_TIMEOUT, "horizon_account").await?;
        let balance = extract_native_balance(&account)?;

        info!("💰 Native balance of {}: {}", format_address(public_key), balance);
        Ok(balance)
    }

    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(KitError::Http(format!(
                "Horizon answered {} for {}",
                response.status(),
                url
            )));
        }
        Ok(response.json().await?)
    }
}

/// Pull the native balance out of a Horizon account record.
pub fn extract_native_balance(account: &Value) -> Result<String> {
    account
        .get("balances")
        .and_then(Value::as_array)
        .and_then(|balances| {
            balances
                .iter()
                .find(|b| b.get("asset_type").and_then(Value::as_str) == Some("native"))
        })
        .and_then(|native| native.get("balance"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| KitError::Http("Account record has no native balance".to_string()))
}
