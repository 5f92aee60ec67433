//! Ingestion module: the artifact cache and its upload collaborator
//!
//! This module contains:
//! - The `IngestionClient` collaborator interface and its HTTP implementation
//! - Staging files written before every upload
//! - The `ArtifactCache`, which uploads each origin at most once

mod cache;
mod client;
mod openai;
mod staging;

pub use cache::{ArtifactCache, CacheOutcome, IngestReport, RecentArtifact};
pub use client::{ArtifactId, IngestionClient, Registration};
pub use openai::OpenAiIngestionClient;
pub use staging::write_staging_file;
