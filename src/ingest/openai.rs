//! Ingestion client for an OpenAI-compatible files and vector store API
//!
//! - `POST {api-base}/files` (multipart `purpose` + `file`) uploads the text
//! - `POST {api-base}/vector_stores/{id}/files` registers it for retrieval

use crate::config::IngestionConfig;
use crate::ingest::client::{ArtifactId, IngestionClient, Registration};
use crate::{IngestError, IngestStage, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct FileObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct VectorStoreFile {
    id: String,
    #[serde(default)]
    created_at: Option<i64>,
}

/// HTTP implementation of [`IngestionClient`]
#[derive(Debug, Clone)]
pub struct OpenAiIngestionClient {
    client: Client,
    api_base: String,
    api_key: String,
    vector_store_id: String,
    purpose: String,
}

impl OpenAiIngestionClient {
    /// Creates a client from configuration, reading the key from its environment variable
    pub fn from_config(config: &IngestionConfig) -> Result<Self> {
        let api_key = config.api_key()?;
        Self::new(config, api_key)
    }

    /// Creates a client with an explicit API key
    pub fn new(config: &IngestionConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            vector_store_id: config.vector_store_id.clone(),
            purpose: config.purpose.clone(),
        })
    }
}

/// Turns a non-success response into an ingestion failure carrying the body
async fn check_status(stage: IngestStage, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(IngestError::ingestion(
        stage,
        format!("HTTP {}: {}", status.as_u16(), body.trim()),
    ))
}

impl IngestionClient for OpenAiIngestionClient {
    async fn upload(&self, text: &str, name_hint: &str) -> Result<ArtifactId> {
        let stage = IngestStage::Upload;
        let transport = |e: reqwest::Error| IngestError::ingestion(stage, e.to_string());

        let file = Part::text(text.to_string())
            .file_name(name_hint.to_string())
            .mime_str("text/plain")
            .map_err(transport)?;
        let form = Form::new()
            .text("purpose", self.purpose.clone())
            .part("file", file);

        let response = self
            .client
            .post(format!("{}/files", self.api_base))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let file: FileObject = check_status(stage, response)
            .await?
            .json()
            .await
            .map_err(transport)?;

        Ok(ArtifactId::new(file.id))
    }

    async fn register_for_retrieval(&self, artifact: &ArtifactId) -> Result<Registration> {
        let stage = IngestStage::Registration;
        let transport = |e: reqwest::Error| IngestError::ingestion(stage, e.to_string());

        let response = self
            .client
            .post(format!(
                "{}/vector_stores/{}/files",
                self.api_base, self.vector_store_id
            ))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
            .json(&serde_json::json!({ "file_id": artifact.as_str() }))
            .send()
            .await
            .map_err(transport)?;

        let registered: VectorStoreFile = check_status(stage, response)
            .await?
            .json()
            .await
            .map_err(transport)?;

        Ok(Registration {
            id: registered.id,
            created_at: registered.created_at,
        })
    }
}
