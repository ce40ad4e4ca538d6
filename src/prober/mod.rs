//! Concurrent readiness checks and the ranked provider listing.

mod ranking;

pub use ranking::rank;

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::constants::DEFAULT_PROBE_TIMEOUT;
use crate::types::{Capability, ProviderListing};
use crate::utils::false_after_deadline;
use crate::wallet::WalletModule;

pub struct AvailabilityProber {
    timeout: Duration,
}

impl Default for AvailabilityProber {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

impl AvailabilityProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe every module at once. A module that does not answer within the
    /// timeout is listed as unavailable; it never holds up the others.
    pub async fn probe_all(&self, modules: &[Arc<dyn WalletModule>]) -> Vec<ProviderListing> {
        let deadline = Instant::now() + self.timeout;
        let probes = modules.iter().map(|module| probe_one(module.as_ref(), deadline));
        let listings = join_all(probes).await;

        debug!(
            "Probed {} providers, {} available",
            listings.len(),
            listings.iter().filter(|l| l.is_available).count()
        );
        listings
    }

    /// Probe, then order the listing for presentation.
    pub async fn rank_and_annotate(
        &self,
        modules: &[Arc<dyn WalletModule>],
        used_ids: &[String],
    ) -> Vec<ProviderListing> {
        let listings = self.probe_all(modules).await;
        rank(listings, used_ids)
    }
}

async fn probe_one(module: &dyn WalletModule, deadline: Instant) -> ProviderListing {
    let id = module.id();
    let available = false_after_deadline(module.is_available(), deadline, id);
    let wrapper = async {
        if module.supports(Capability::PlatformWrapperDetection) {
            false_after_deadline(module.is_platform_wrapper(), deadline, id).await
        } else {
            false
        }
    };
    let (is_available, is_platform_wrapper) = tokio::join!(available, wrapper);

    ProviderListing {
        descriptor: module.descriptor().clone(),
        is_available,
        is_platform_wrapper,
    }
}
