//! Snapshot loading: assets, scans and tenant scope

use anyhow::{Context, Result};
use posture_core::{Asset, AssetRecord, Scan, TenantContext};
use posture_scope::{ActiveScope, FileScopeSource, ScopeLoader};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Listing endpoints return either a bare array or a paged envelope
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Paged { items: Vec<T> },
}

impl<T> Listing<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Paged { items } => items,
        }
    }
}

fn read_listing<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    let listing: Listing<T> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {:?}", path))?;
    Ok(listing.into_items())
}

/// Converts raw records, skipping the ones that do not form a valid asset
pub fn assets_from_records(records: Vec<AssetRecord>) -> Vec<Asset> {
    let mut assets = Vec::with_capacity(records.len());
    for record in records {
        let id = record.id.clone();
        match Asset::try_from(record) {
            Ok(asset) => assets.push(asset),
            Err(e) => warn!("Skipping asset '{}': {}", id, e),
        }
    }
    assets
}

pub fn load_assets(path: &Path) -> Result<Vec<Asset>> {
    let records: Vec<AssetRecord> = read_listing(path)?;
    let total = records.len();
    let assets = assets_from_records(records);
    info!("Loaded {} of {} assets from {:?}", assets.len(), total, path);
    Ok(assets)
}

pub fn load_scans(path: &Path) -> Result<Vec<Scan>> {
    let scans: Vec<Scan> = read_listing(path)?;
    info!("Loaded {} scans from {:?}", scans.len(), path);
    Ok(scans)
}

pub async fn load_scope(scope_dir: &Path, tenant: &str) -> Result<ActiveScope> {
    let loader = ScopeLoader::new(FileScopeSource::new(scope_dir));
    loader
        .active_scope(&TenantContext::new(tenant))
        .await
        .with_context(|| format!("Failed to load scope for tenant '{}'", tenant))
}
