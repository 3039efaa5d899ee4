//! Profile data source: which items the signed-in user owns.

use serde::{Deserialize, Serialize};

use crate::error::ClientResult;

/// Read access to the current user's profile.
pub trait ProfileSource: Send + Sync {
    /// IDs of owned items, or `None` when no profile is loaded.
    fn owned_item_ids(&self) -> Option<Vec<String>>;
}

/// Profile document as the NFT backend returns it.
///
/// Only the fields the client reads are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Owned NFT IDs.
    #[serde(default)]
    pub nfts: Vec<String>,
    /// Liked NFT IDs.
    #[serde(default)]
    pub likes: Vec<String>,
}

impl ProfileRecord {
    /// Decodes a profile from its JSON document.
    pub fn from_json(json: &str) -> ClientResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Profile held in memory, possibly not loaded yet.
#[derive(Debug, Clone, Default)]
pub struct StaticProfile {
    record: Option<ProfileRecord>,
}

impl StaticProfile {
    /// A loaded profile.
    pub fn loaded(record: ProfileRecord) -> Self {
        StaticProfile {
            record: Some(record),
        }
    }

    /// A loaded profile owning exactly `ids`.
    pub fn owning<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::loaded(ProfileRecord {
            nfts: ids.into_iter().map(Into::into).collect(),
            ..ProfileRecord::default()
        })
    }

    /// No profile loaded.
    pub fn missing() -> Self {
        StaticProfile { record: None }
    }
}

impl ProfileSource for StaticProfile {
    fn owned_item_ids(&self) -> Option<Vec<String>> {
        self.record.as_ref().map(|record| record.nfts.clone())
    }
}
