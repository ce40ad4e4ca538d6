use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::WalletsKit;
use crate::constants::{GENERIC_ERROR_CODE, WALLET_PICKER_CLOSED};
use crate::errors::{KitError, NormalizedError, Result};
use crate::pairing::Teardown;
use crate::types::{AddressResponse, ProviderListing, SignRequestOptions};

#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
    /// The user clicked the provider with this id.
    Selected(String),
    Closed(NormalizedError),
}

/// Presentation layer for the wallet picker.
pub trait WalletPickerUi: Send + Sync {
    fn open(&self, listings: &[ProviderListing], events: mpsc::UnboundedSender<PickerEvent>);

    /// Send the user to a wallet's homepage so they can install it.
    fn open_homepage(&self, url: &str);

    fn close(&self);
}

/// Outcome of a completed pick.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedWallet {
    pub listing: ProviderListing,
    pub address: AddressResponse,
}

impl WalletsKit {
    /// Let the user choose a wallet, then select it and read its address.
    ///
    /// When the kit runs inside a wallet's own browser that wallet is taken
    /// without showing the picker.
    pub async fn open_picker(&self, ui: &dyn WalletPickerUi) -> Result<PickedWallet> {
        let listings = self.list_supported_providers().await;

        if let Some(wrapper) = listings
            .iter()
            .find(|l| l.is_platform_wrapper && l.is_available)
        {
            info!("👛 Running inside {}, skipping the picker", wrapper.descriptor.display_name);
            return self.confirm_pick(wrapper.clone()).await;
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        ui.open(&listings, tx);
        let teardown = Teardown::new(|| ui.close());

        let picked = loop {
            match rx.recv().await {
                Some(PickerEvent::Selected(id)) => {
                    let Some(listing) = listings.iter().find(|l| l.id() == id) else {
                        warn!("Picker sent unknown wallet id {}", id);
                        continue;
                    };
                    if !listing.is_available {
                        debug!("{} is not available, opening its homepage", id);
                        ui.open_homepage(&listing.descriptor.homepage_url);
                        continue;
                    }
                    break listing.clone();
                }
                Some(PickerEvent::Closed(detail)) => return Err(KitError::cancelled(detail)),
                None => {
                    return Err(KitError::cancelled(NormalizedError::new(
                        GENERIC_ERROR_CODE,
                        WALLET_PICKER_CLOSED,
                    )))
                }
            }
        };
        drop(teardown);

        self.confirm_pick(picked).await
    }

    async fn confirm_pick(&self, listing: ProviderListing) -> Result<PickedWallet> {
        if let Err(e) = self.used_wallets.record_blocking(listing.id()).await {
            warn!("Could not remember {} as used: {}", listing.id(), e);
        }
        self.select_provider(listing.id())?;
        let address = self.get_address(SignRequestOptions::default()).await?;
        Ok(PickedWallet { listing, address })
    }
}
