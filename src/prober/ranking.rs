use crate::types::ProviderListing;

/// Order listings for the picker:
/// previously used and available ones first (most recent first), then the
/// other available ones, then the unavailable ones. Ties keep registration
/// order.
pub fn rank(listings: Vec<ProviderListing>, used_ids: &[String]) -> Vec<ProviderListing> {
    let mut used: Vec<(usize, ProviderListing)> = Vec::new();
    let mut available = Vec::new();
    let mut unavailable = Vec::new();

    for listing in listings {
        if !listing.is_available {
            unavailable.push(listing);
            continue;
        }
        match used_ids.iter().position(|id| id == listing.id()) {
            Some(recency) => used.push((recency, listing)),
            None => available.push(listing),
        }
    }

    used.sort_by_key(|(recency, _)| *recency);

    used.into_iter()
        .map(|(_, listing)| listing)
        .chain(available)
        .chain(unavailable)
        .collect()
}
