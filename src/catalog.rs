// Listing catalog entries and loading them from JSON feeds

use crate::amenity::Amenity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    #[error("Duplicate listing id: {0}")]
    DuplicateId(String),

    #[error("Negative price for listing {0}")]
    NegativePrice(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: String,
    pub title: String,
    pub location: String,
    pub price_per_night: Decimal,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub amenities: BTreeSet<Amenity>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ListingRecord {
    pub fn has_amenity(&self, amenity: Amenity) -> bool {
        self.amenities.contains(&amenity)
    }
}

// Bundled mock catalog used by the results page
pub const SAMPLE_CATALOG_PATH: &str = "samples/listings.json";

// Parses a JSON array of listings, keeping feed order.
pub fn load_catalog_json(json: &str) -> Result<Vec<ListingRecord>, CatalogError> {
    let listings: Vec<ListingRecord> =
        serde_json::from_str(json).map_err(|e| CatalogError::JsonParseError(e.to_string()))?;

    let mut seen = BTreeSet::new();
    for listing in &listings {
        if !seen.insert(listing.id.as_str()) {
            return Err(CatalogError::DuplicateId(listing.id.clone()));
        }
        if listing.price_per_night.is_sign_negative() && !listing.price_per_night.is_zero() {
            return Err(CatalogError::NegativePrice(listing.id.clone()));
        }
    }

    debug!(count = listings.len(), "catalog loaded");
    Ok(listings)
}

pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<Vec<ListingRecord>, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    load_catalog_json(&content)
}
