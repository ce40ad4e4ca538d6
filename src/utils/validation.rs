use regex::Regex;
use std::sync::LazyLock;

use crate::errors::{KitError, Result};

static PUBLIC_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^G[A-Z2-7]{55}$").expect("public key pattern is valid"));

const HARDENED_OFFSET: u32 = 0x8000_0000;

pub struct Validator;

impl Validator {
    /// Shape check for an ed25519 account id (`G...`, 56 base32 chars).
    pub fn validate_public_key(address: &str) -> Result<()> {
        if PUBLIC_KEY_RE.is_match(address) {
            Ok(())
        } else {
            Err(KitError::InvalidInput(format!(
                "\"{}\" is not a valid Stellar public key",
                address
            )))
        }
    }

    /// Parse a BIP44 path like `44'/148'/0'` (optionally `m/`-prefixed) into
    /// its components, hardened ones carrying the high bit.
    pub fn validate_derivation_path(path: &str) -> Result<Vec<u32>> {
        let trimmed = path.trim_start_matches("m/");
        if trimmed.is_empty() {
            return Err(KitError::InvalidInput("Derivation path cannot be empty".into()));
        }

        trimmed
            .split('/')
            .map(|segment| {
                let hardened = segment.ends_with('\'');
                let digits = segment.trim_end_matches('\'');
                let index: u32 = digits.parse().map_err(|_| {
                    KitError::InvalidInput(format!(
                        "Invalid derivation path component: {}",
                        segment
                    ))
                })?;
                if index >= HARDENED_OFFSET {
                    return Err(KitError::InvalidInput(format!(
                        "Derivation index out of range: {}",
                        segment
                    )));
                }
                Ok(if hardened { index | HARDENED_OFFSET } else { index })
            })
            .collect()
    }

    /// Validate HTTP URL format
    pub fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(KitError::InvalidInput("URL cannot be empty".into()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(KitError::InvalidInput(
                "URL must start with http:// or https://".into(),
            ));
        }

        Ok(())
    }
}
