//! Artifact cache
//!
//! Maps each origin to the artifact it was uploaded as, and each artifact back
//! to its origin, so an origin is handed to the ingestion collaborator at most
//! once. A recency index records when every artifact was last ingested or
//! requested again; eviction based on it is left to the caller.

use crate::ingest::client::{ArtifactId, IngestionClient};
use crate::ingest::staging::write_staging_file;
use crate::storage::{KeyValueStore, WriteOp};
use crate::url::staging_file_name;
use crate::{IngestError, IngestStage, Result, UrlError};
use chrono::Utc;
use std::path::PathBuf;
use url::Url;

/// What the cache did for one `ingest` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOutcome {
    /// The origin was already ingested; only its recency was refreshed
    Hit { refreshed_at: i64 },

    /// The blob was uploaded and registered
    Ingested {
        registration_id: String,
        staging_path: PathBuf,
        indexed_at: i64,
    },
}

/// Result of an `ingest` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub origin: String,
    pub artifact_id: ArtifactId,
    pub outcome: CacheOutcome,
}

impl IngestReport {
    pub fn is_cache_hit(&self) -> bool {
        matches!(self.outcome, CacheOutcome::Hit { .. })
    }
}

/// An entry of the recency index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentArtifact {
    pub artifact_id: ArtifactId,
    /// The origin the artifact maps back to, if the mapping exists
    pub origin: Option<String>,
    /// Unix timestamp of the last ingestion or refresh
    pub touched_at: i64,
}

/// Deduplicating cache in front of the ingestion collaborator
///
/// Concurrent `ingest` calls for the same origin are not guarded; callers that
/// ingest concurrently must serialize per origin themselves.
pub struct ArtifactCache<'s, S: KeyValueStore + ?Sized> {
    store: &'s mut S,
    staging_dir: PathBuf,
    recency_key: String,
}

impl<'s, S: KeyValueStore + ?Sized> ArtifactCache<'s, S> {
    pub fn new(
        store: &'s mut S,
        staging_dir: impl Into<PathBuf>,
        recency_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            staging_dir: staging_dir.into(),
            recency_key: recency_key.into(),
        }
    }

    /// Ingests `blob` for `origin` unless the origin is already known
    ///
    /// # Flow
    ///
    /// - Hit: refresh the artifact's recency to now and return its identifier.
    ///   The client is not called.
    /// - Miss: write `<staging-dir>/<host>.txt`, upload, register, then record
    ///   both mapping directions and the recency entry in one atomic batch.
    ///   The recency entry uses the registration timestamp when there is one.
    ///
    /// A failed upload or registration returns [`IngestError::Ingestion`] and
    /// leaves the store untouched; the staging file stays behind.
    pub async fn ingest<C>(&mut self, origin: &str, blob: &str, client: &C) -> Result<IngestReport>
    where
        C: IngestionClient + ?Sized,
    {
        if let Some(artifact_id) = self.lookup_artifact(origin)? {
            let now = Utc::now().timestamp();
            self.store.zadd(&self.recency_key, artifact_id.as_str(), now)?;
            tracing::info!("Cache hit for {}: artifact {} refreshed", origin, artifact_id);
            return Ok(IngestReport {
                origin: origin.to_string(),
                artifact_id,
                outcome: CacheOutcome::Hit { refreshed_at: now },
            });
        }

        let file_name = Url::parse(origin)
            .ok()
            .as_ref()
            .and_then(staging_file_name)
            .ok_or(UrlError::MissingDomain)?;
        let staging_path = write_staging_file(&self.staging_dir, &file_name, blob).await?;

        tracing::info!("Uploading {} ({} bytes) for {}", file_name, blob.len(), origin);
        let artifact_id = client
            .upload(blob, &file_name)
            .await
            .map_err(|e| as_ingestion_failure(IngestStage::Upload, e))?;

        let registration = client
            .register_for_retrieval(&artifact_id)
            .await
            .map_err(|e| as_ingestion_failure(IngestStage::Registration, e))?;

        let indexed_at = registration
            .created_at
            .unwrap_or_else(|| Utc::now().timestamp());

        self.store.write_batch(&[
            WriteOp::set(origin, artifact_id.as_str()),
            WriteOp::set(artifact_id.as_str(), origin),
            WriteOp::zadd(&self.recency_key, artifact_id.as_str(), indexed_at),
        ])?;

        tracing::info!(
            "Ingested {} as artifact {} (registration {})",
            origin,
            artifact_id,
            registration.id
        );

        Ok(IngestReport {
            origin: origin.to_string(),
            artifact_id,
            outcome: CacheOutcome::Ingested {
                registration_id: registration.id,
                staging_path,
                indexed_at,
            },
        })
    }

    /// Returns the artifact recorded for `origin`
    pub fn lookup_artifact(&self, origin: &str) -> Result<Option<ArtifactId>> {
        Ok(self.store.get(origin)?.map(ArtifactId::from))
    }

    /// Returns the origin recorded for `artifact`
    pub fn lookup_origin(&self, artifact: &ArtifactId) -> Result<Option<String>> {
        Ok(self.store.get(artifact.as_str())?)
    }

    /// Returns the recency index, oldest first
    pub fn recent_artifacts(&self) -> Result<Vec<RecentArtifact>> {
        self.store
            .zrange(&self.recency_key)?
            .into_iter()
            .map(|(member, touched_at)| {
                let artifact_id = ArtifactId::from(member);
                let origin = self.lookup_origin(&artifact_id)?;
                Ok(RecentArtifact {
                    artifact_id,
                    origin,
                    touched_at,
                })
            })
            .collect()
    }
}

fn as_ingestion_failure(stage: IngestStage, error: IngestError) -> IngestError {
    match error {
        IngestError::Ingestion { .. } => error,
        other => IngestError::ingestion(stage, other.to_string()),
    }
}
