use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    domain::{Market, CURRENT_SCHEMA_VERSION},
    errors::MarketError,
    utils::{ensure_dir, write_atomic, PathResolver},
};

use super::{LoadReport, Result, StorageBackend};

/// Stores the whole marketplace as one pretty-printed JSON document.
#[derive(Clone, Debug)]
pub struct JsonStorage {
    root: PathBuf,
    market_file: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let market_file = PathResolver::market_file_in(&app_root);
        Ok(Self {
            root: app_root,
            market_file,
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<LoadReport> {
        if !self.market_file.exists() {
            tracing::debug!(path = %self.market_file.display(), "no snapshot yet, starting empty");
            return Ok(LoadReport {
                market: Market::default(),
                warnings: Vec::new(),
            });
        }
        let data = fs::read_to_string(&self.market_file)?;
        let market: Market = serde_json::from_str(&data)?;
        if market.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(MarketError::SchemaVersion {
                found: market.schema_version,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }
        let warnings = market_warnings(&market);
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        Ok(LoadReport { market, warnings })
    }

    fn save(&self, market: &Market) -> Result<()> {
        let json = serde_json::to_string_pretty(market)?;
        write_atomic(&self.market_file, &json)?;
        tracing::debug!(
            path = %self.market_file.display(),
            listings = market.listings.len(),
            reservations = market.reservations.len(),
            "marketplace saved"
        );
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.market_file
    }
}

/// Dangling references that a hand-edited or partially written snapshot may carry.
pub fn market_warnings(market: &Market) -> Vec<String> {
    let listing_ids: HashSet<_> = market.listings.iter().map(|l| l.id).collect();
    let user_ids: HashSet<_> = market.users.iter().map(|u| u.id).collect();
    let mut warnings = Vec::new();

    for listing in &market.listings {
        if !user_ids.contains(&listing.owner_id) {
            warnings.push(format!(
                "listing {} references unknown owner {}",
                listing.id, listing.owner_id
            ));
        }
    }
    for reservation in &market.reservations {
        if !listing_ids.contains(&reservation.listing_id) {
            warnings.push(format!(
                "reservation {} references missing listing {}",
                reservation.id, reservation.listing_id
            ));
        }
        if !user_ids.contains(&reservation.user_id) {
            warnings.push(format!(
                "reservation {} references unknown guest {}",
                reservation.id, reservation.user_id
            ));
        }
    }
    for user in &market.users {
        for favorite in &user.favorite_ids {
            if !listing_ids.contains(favorite) {
                warnings.push(format!(
                    "user {} favorites missing listing {}",
                    user.id, favorite
                ));
            }
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Listing, ListingDraft, User};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
        (storage, temp)
    }

    fn sample_market() -> Market {
        let mut market = Market::default();
        let owner = User::new("Host", "host@example.com", "hash");
        market.listings.push(Listing::new(
            owner.id,
            ListingDraft {
                category: "Cave".into(),
                location_value: "ES".into(),
                guest_count: 2,
                room_count: 1,
                bathroom_count: 1,
                image_src: "https://img.example.com/cave.jpg".into(),
                title: "Cave house".into(),
                description: "Cool in summer".into(),
                price: 70,
            },
        ));
        market.users.push(owner);
        market
    }

    #[test]
    fn load_without_snapshot_is_empty() {
        let (storage, _guard) = storage_with_temp_dir();
        let report = storage.load().expect("load");
        assert!(report.market.listings.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let market = sample_market();
        storage.save(&market).expect("save market");
        let loaded = storage.load().expect("load market").market;
        assert_eq!(loaded, market);
        assert!(storage.path().starts_with(storage.base_dir()));
    }

    #[test]
    fn newer_schema_is_rejected() {
        let (storage, _guard) = storage_with_temp_dir();
        let mut market = sample_market();
        market.schema_version = CURRENT_SCHEMA_VERSION + 1;
        storage.save(&market).expect("save market");
        let err = storage.load().expect_err("newer schema must fail");
        assert!(matches!(err, MarketError::SchemaVersion { .. }));
    }

    #[test]
    fn dangling_references_become_warnings() {
        let mut market = sample_market();
        market.users[0].favorite_ids.push(Uuid::new_v4());
        market.listings[0].owner_id = Uuid::new_v4();
        let warnings = market_warnings(&market);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("unknown owner"));
        assert!(warnings[1].contains("favorites missing listing"));
    }
}
