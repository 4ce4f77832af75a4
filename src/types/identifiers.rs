use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::allocation::CategoryAllocation;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                $name(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                $name(raw.to_string())
            }
        }
    };
}

string_id!(
    /// Video category key. Ordering is lexicographic and drives aggregate output order.
    CategoryId
);
string_id!(VideoId);
string_id!(
    /// Viewer region as it appears in watch logs.
    Region
);
string_id!(UserId);

/// `sha256:<hex>` content hash of an allocation slate or a session snapshot.
///
/// Computed over the canonical JSON of the rows in output order, so two
/// allocations with equal digests are identical row for row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    pub fn from_allocation(rows: &[CategoryAllocation]) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(rows)?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn from_bytes(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        ContentDigest(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
