use serde::{Deserialize, Serialize};

/// What the hosting environment says about an injected wallet, if anything.
/// Mirrors the `stellar` global some in-app browsers expose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEnvironment {
    pub injected_provider: Option<String>,
    pub platform: Option<String>,
}

impl HostEnvironment {
    pub fn new(provider: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            injected_provider: Some(provider.into()),
            platform: Some(platform.into()),
        }
    }

    pub fn is_embedded(&self, provider: &str, platform: &str) -> bool {
        self.injected_provider.as_deref() == Some(provider)
            && self.platform.as_deref() == Some(platform)
    }

    /// Running inside the Freighter mobile in-app browser.
    pub fn is_freighter_mobile(&self) -> bool {
        self.is_embedded("freighter", "mobile")
    }
}
