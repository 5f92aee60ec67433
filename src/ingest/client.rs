use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an uploaded artifact in the downstream retrieval store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ArtifactId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Result of registering an artifact with the retrieval index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Identifier of the registration itself
    pub id: String,

    /// Unix timestamp of the registration, when the collaborator reports one
    pub created_at: Option<i64>,
}

/// Collaborator that stores aggregated text and indexes it for retrieval
///
/// Implementations report failures as [`crate::IngestError::Ingestion`];
/// the cache converts any other error into that variant.
#[allow(async_fn_in_trait)]
pub trait IngestionClient {
    /// Uploads `text` under the file name `name_hint` and returns its identifier
    async fn upload(&self, text: &str, name_hint: &str) -> Result<ArtifactId>;

    /// Registers an uploaded artifact with the retrieval index
    async fn register_for_retrieval(&self, artifact: &ArtifactId) -> Result<Registration>;
}
