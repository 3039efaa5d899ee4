//! # Remote Item Fetcher
//!
//! Retrieves a batch of items by ID with all-settle semantics.
//!
//! ## Batch Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        fetch_all([A, B, C, A])                          │
//! │                                                                         │
//! │  dedupe ──► [A, B, C]                                                   │
//! │                │                                                        │
//! │                ├──► fetch_item(A) ──► Ok(item)  ──► on_item(A)          │
//! │                ├──► fetch_item(B) ──► Err(...)  ──► warn!, recorded     │
//! │                └──► fetch_item(C) ──► Ok(item)  ──► on_item(C)          │
//! │                                                                         │
//! │  at most `max_concurrent` requests in flight, arrival order is not     │
//! │  issue order                                                            │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  barrier: every ID succeeded or failed ──► FetchReport                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries and no timeouts. A request that never resolves holds the
//! barrier open.

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use nftcart_core::validation::{validate_item, validate_rating};
use nftcart_core::{Item, Money};

use crate::config::FetchSettings;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Item Source
// =============================================================================

/// Network boundary: retrieves one item document by ID.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Fetches and decodes the item with this ID.
    async fn fetch_item(&self, id: &str) -> ClientResult<Item>;
}

/// Item document as the NFT backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteItemRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rating: Option<i64>,
    /// Decimal price in ETH.
    #[serde(default)]
    pub price: Option<f64>,
}

impl RemoteItemRecord {
    /// Decodes a record from its JSON document.
    pub fn from_json(json: &str) -> ClientResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts the record into a validated [`Item`].
    ///
    /// The first image becomes the item's image reference.
    pub fn into_item(self) -> ClientResult<Item> {
        let mut item = Item::new(
            self.id,
            self.name,
            self.images.into_iter().next().unwrap_or_default(),
        );

        if let Some(rating) = self.rating {
            item.rating = Some(validate_rating(rating)?);
        }
        if let Some(price) = self.price {
            item.price = Some(Money::from_decimal(price)?);
        }

        validate_item(&item)?;
        Ok(item)
    }
}

/// In-process item source keyed by ID.
///
/// Unknown IDs fail with `FetchFailed`. Used by the demo binary and tests.
#[derive(Debug, Default)]
pub struct StaticItemSource {
    items: HashMap<String, Item>,
    failures: HashMap<String, String>,
}

impl StaticItemSource {
    /// Creates a source serving `items`.
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        StaticItemSource {
            items: items.into_iter().map(|item| (item.id.clone(), item)).collect(),
            failures: HashMap::new(),
        }
    }

    /// Makes every request for `id` fail with `reason`.
    pub fn with_failure(mut self, id: impl Into<String>, reason: impl Into<String>) -> Self {
        self.failures.insert(id.into(), reason.into());
        self
    }
}

#[async_trait]
impl ItemSource for StaticItemSource {
    async fn fetch_item(&self, id: &str) -> ClientResult<Item> {
        if let Some(reason) = self.failures.get(id) {
            return Err(ClientError::FetchFailed {
                id: id.to_string(),
                reason: reason.clone(),
            });
        }

        self.items
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::FetchFailed {
                id: id.to_string(),
                reason: "not found".into(),
            })
    }
}

// =============================================================================
// Fetch Report
// =============================================================================

/// One ID that could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub id: String,
    pub message: String,
}

/// Outcome of one settled batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Distinct IDs requested.
    pub requested: usize,
    /// IDs retrieved, in arrival order.
    pub fetched: Vec<String>,
    /// IDs that failed, in arrival order.
    pub failed: Vec<FetchFailure>,
}

impl FetchReport {
    /// Returns true if every requested ID was retrieved.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.fetched.len() == self.requested
    }
}

// =============================================================================
// Fetcher
// =============================================================================

/// Issues one independent request per ID and waits for all of them.
#[derive(Clone)]
pub struct RemoteItemFetcher {
    source: Arc<dyn ItemSource>,
    max_concurrent: usize,
}

impl RemoteItemFetcher {
    /// Creates a fetcher with the default concurrency.
    pub fn new(source: Arc<dyn ItemSource>) -> Self {
        Self::with_settings(source, &FetchSettings::default())
    }

    /// Creates a fetcher bounded by `settings.max_concurrent_requests`.
    pub fn with_settings(source: Arc<dyn ItemSource>, settings: &FetchSettings) -> Self {
        RemoteItemFetcher {
            source,
            max_concurrent: settings.max_concurrent_requests.max(1),
        }
    }

    /// Fetches every ID, handing each item to `on_item` as it arrives.
    ///
    /// Returns only after every request has succeeded or failed. A failure
    /// is logged and recorded, never propagated. An item whose ID differs
    /// from the requested one counts as a failure and is not handed over.
    pub async fn fetch_all<F>(&self, ids: &[String], mut on_item: F) -> FetchReport
    where
        F: FnMut(Item),
    {
        let mut seen = HashSet::new();
        let unique: Vec<String> = ids
            .iter()
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect();

        if unique.len() < ids.len() {
            debug!(
                requested = ids.len(),
                unique = unique.len(),
                "Dropped duplicate item IDs"
            );
        }

        let mut report = FetchReport {
            requested: unique.len(),
            ..FetchReport::default()
        };

        info!(count = report.requested, "Fetching items");

        let mut responses = stream::iter(unique)
            .map(|id| {
                let source = Arc::clone(&self.source);
                async move {
                    let result = source.fetch_item(&id).await;
                    (id, result)
                }
            })
            .buffer_unordered(self.max_concurrent);

        while let Some((id, result)) = responses.next().await {
            match result {
                Ok(item) if item.id != id => {
                    warn!(id = %id, returned = %item.id, "Source returned a different item");
                    report.failed.push(FetchFailure {
                        message: format!("requested {} but received {}", id, item.id),
                        id,
                    });
                }
                Ok(item) => {
                    debug!(id = %id, "Item fetched");
                    report.fetched.push(id);
                    on_item(item);
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "Failed to fetch item");
                    report.failed.push(FetchFailure {
                        id,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            fetched = report.fetched.len(),
            failed = report.failed.len(),
            "Item batch settled"
        );

        report
    }
}
