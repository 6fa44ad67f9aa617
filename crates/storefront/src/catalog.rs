//! Product catalog loading.
//!
//! The catalog is a JSON array of product records fetched once at startup,
//! either over HTTP or from a local file. Loading never fails the caller:
//! [`load_catalog`] logs whatever went wrong and hands back an empty catalog,
//! so the page renders with zero product cards.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use sweetcart_core::{ItemId, ProductEntry, ProductImages};
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use url::Url;

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Catalog request returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Reading the catalog file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload is not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Remote JSON document.
    Http(Url),
    /// Local JSON file.
    File(PathBuf),
}

impl CatalogSource {
    /// Interpret a configured location: `http(s)://` URLs are fetched, anything
    /// else is read as a file path.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Http(url),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map_or_else(|()| Self::File(PathBuf::from(location)), Self::File),
            _ => Self::File(PathBuf::from(location)),
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Raw catalog record as served.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub name: String,
    pub image: CatalogImages,
}

/// Raw image set of a catalog record.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogImages {
    pub desktop: String,
    pub mobile: String,
    pub tablet: String,
    pub thumbnail: String,
}

impl CatalogRecord {
    /// Convert into a [`ProductEntry`] with the given array index as its id.
    #[must_use]
    pub fn into_entry(self, index: usize) -> ProductEntry {
        ProductEntry {
            id: ItemId::from_index(index),
            category: self.category,
            product_name: self.name,
            price: self.price,
            images: ProductImages {
                desktop: self.image.desktop,
                tablet: self.image.tablet,
                mobile: self.image.mobile,
                thumbnail: self.image.thumbnail,
            },
        }
    }
}

/// Normalize a raw catalog payload.
///
/// A payload that is not an array yields an empty catalog. Records that do not
/// match the expected shape or carry a negative price are skipped; the
/// remaining records keep their array index as their id.
#[must_use]
pub fn normalize(payload: Value) -> Vec<ProductEntry> {
    let Value::Array(records) = payload else {
        warn!("Catalog payload is not an array, no products loaded");
        return Vec::new();
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, record)| match serde_json::from_value::<CatalogRecord>(record) {
                Ok(record) if record.price.is_sign_negative() => {
                    warn!(index, price = %record.price, "Skipping catalog record with negative price");
                    None
                }
                Ok(record) => Some(record.into_entry(index)),
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed catalog record");
                    None
                }
            },
        )
        .collect()
}

/// Fetch the raw catalog payload.
///
/// # Errors
///
/// Returns an error if the request or read fails, the server answers with a
/// non-success status, or the body is not JSON.
pub async fn fetch_catalog(
    source: &CatalogSource,
    timeout: Duration,
) -> Result<Value, CatalogError> {
    let body = match source {
        CatalogSource::Http(url) => {
            let client = reqwest::Client::builder().timeout(timeout).build()?;
            let response = client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(CatalogError::Status(status));
            }
            response.text().await?
        }
        CatalogSource::File(path) => tokio::fs::read_to_string(path).await?,
    };

    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(e) => {
            error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog payload"
            );
            Err(CatalogError::Parse(e))
        }
    }
}

/// Load and normalize the catalog, falling back to an empty catalog on any
/// failure.
#[instrument(skip_all, fields(source = %source))]
pub async fn load_catalog(source: &CatalogSource, timeout: Duration) -> Vec<ProductEntry> {
    match fetch_catalog(source, timeout).await {
        Ok(payload) => {
            let entries = normalize(payload);
            info!(products = entries.len(), "Catalog loaded");
            entries
        }
        Err(e) => {
            error!(error = %e, "Failed to load catalog, rendering no products");
            Vec::new()
        }
    }
}
