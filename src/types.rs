//! Photo records decoded from the photo API.
//!
//! Field names match the API's JSON payloads. Unknown fields are ignored so
//! the records survive the API adding data we don't use.

use serde::{Deserialize, Serialize};

/// A single photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub urls: ImageUrls,
}

impl Image {
    /// URL used for grid cells.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.urls.small.as_deref()
    }
}

/// Resolution-keyed URLs for a photo. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrls {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub full: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub total: u64,
    pub total_pages: u32,
    pub results: Vec<Image>,
}
