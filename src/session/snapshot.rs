use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::interaction::InteractionLog;
use crate::session::context::SessionContext;
use crate::types::allocation::CategoryAllocation;
use crate::types::identifiers::{ContentDigest, UserId};

pub const SNAPSHOT_FILE: &str = "snapshot.json";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Output directory already exists: {0}")]
    OutputExists(PathBuf),
    #[error("Snapshot digest mismatch: recorded {recorded}, content hashes to {computed}")]
    DigestMismatch { recorded: String, computed: String },
    #[error("Invalid snapshot digest format: {0}")]
    InvalidDigest(String),
}

// Hashed fields only. Field order is part of the digest.
#[derive(Serialize)]
struct DigestInput<'a> {
    user_id: &'a UserId,
    baseline: &'a [CategoryAllocation],
    interactions: &'a InteractionLog,
}

/// Persisted form of a session: the current slate plus the full interaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub digest: ContentDigest,
    pub created_at: DateTime<Utc>, // informational only
    pub user_id: UserId,
    pub baseline: Vec<CategoryAllocation>,
    pub interactions: InteractionLog,
}

impl SessionSnapshot {
    pub fn capture(session: &SessionContext) -> Result<Self, SnapshotError> {
        let digest = compute_digest(&session.user_id, session.baseline(), session.interactions())?;
        Ok(Self {
            digest,
            created_at: Utc::now(),
            user_id: session.user_id.clone(),
            baseline: session.baseline().to_vec(),
            interactions: session.interactions().clone(),
        })
    }

    pub fn into_session(self) -> SessionContext {
        SessionContext::from_parts(self.user_id, self.baseline, self.interactions)
    }

    /// Write `snapshot.json` into a fresh `output_dir`, via a temp dir and rename.
    pub fn write(&self, output_dir: &Path) -> Result<(), SnapshotError> {
        if output_dir.exists() {
            return Err(SnapshotError::OutputExists(output_dir.to_path_buf()));
        }

        // Temp dir name derives from the digest
        let hex = self
            .digest
            .as_str()
            .strip_prefix("sha256:")
            .ok_or_else(|| SnapshotError::InvalidDigest(self.digest.as_str().to_string()))?;
        let stem = hex.get(..12).filter(|s| s.bytes().all(|b| b.is_ascii_hexdigit()));
        let Some(stem) = stem else {
            return Err(SnapshotError::InvalidDigest(self.digest.as_str().to_string()));
        };
        let temp_suffix = format!("tmp.{stem}");
        let temp_dir = output_dir.with_extension(temp_suffix);

        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir)?;
        }
        fs::create_dir_all(&temp_dir)?;

        let f = fs::File::create(temp_dir.join(SNAPSHOT_FILE))?;
        serde_json::to_writer_pretty(&f, self)?;
        f.sync_all()?;

        fs::rename(&temp_dir, output_dir)?;

        info!(
            user_id = self.user_id.as_str(),
            digest = self.digest.as_str(),
            interactions = self.interactions.len(),
            "Session snapshot written"
        );
        Ok(())
    }

    /// Load a snapshot and verify its digest against the content.
    pub fn read(dir: &Path) -> Result<Self, SnapshotError> {
        let f = fs::File::open(dir.join(SNAPSHOT_FILE))?;
        let snapshot: SessionSnapshot = serde_json::from_reader(f)?;

        let computed = compute_digest(&snapshot.user_id, &snapshot.baseline, &snapshot.interactions)?;
        if computed != snapshot.digest {
            return Err(SnapshotError::DigestMismatch {
                recorded: snapshot.digest.as_str().to_string(),
                computed: computed.as_str().to_string(),
            });
        }

        info!(
            user_id = snapshot.user_id.as_str(),
            digest = snapshot.digest.as_str(),
            "Session snapshot loaded"
        );
        Ok(snapshot)
    }
}

fn compute_digest(
    user_id: &UserId,
    baseline: &[CategoryAllocation],
    interactions: &InteractionLog,
) -> Result<ContentDigest, SnapshotError> {
    let bytes = serde_json::to_vec(&DigestInput {
        user_id,
        baseline,
        interactions,
    })?;
    Ok(ContentDigest::from_bytes(&bytes))
}
