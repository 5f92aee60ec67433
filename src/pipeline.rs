//! End-to-end ingestion of one origin
//!
//! lookup (optional) -> origin -> crawl -> aggregate -> artifact cache

use crate::crawler::{aggregate, CrawlReport, Crawler};
use crate::ingest::{ArtifactCache, IngestReport, IngestionClient};
use crate::lookup::{AccountLookup, AccountProfile};
use crate::state::ProgressSink;
use crate::storage::KeyValueStore;
use crate::url::{extract_company_label, normalize_origin};
use crate::{IngestError, Result};

/// Result of ingesting one origin
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub crawl: CrawlReport,
    pub artifact: IngestReport,
    /// Short organization label derived from the origin's host
    pub company: String,
    /// Size of the aggregated text in bytes
    pub aggregated_bytes: usize,
}

/// Result of ingesting the origin registered for a wallet address
#[derive(Debug, Clone)]
pub struct AccountReport {
    pub profile: AccountProfile,
    pub ingest: PipelineReport,
}

/// Crawls an origin and aggregates its pages without touching the cache
pub async fn crawl_and_aggregate(
    crawler: &Crawler,
    origin: &str,
    progress: &mut dyn ProgressSink,
) -> Result<(CrawlReport, String)> {
    let origin = normalize_origin(origin)?;
    let crawl = crawler.crawl(&origin, progress).await;
    let text = aggregate(&crawl.pages);
    Ok((crawl, text))
}

/// Crawler, artifact cache, and ingestion client wired together
pub struct Pipeline<'s, S: KeyValueStore + ?Sized, C: IngestionClient> {
    crawler: Crawler,
    cache: ArtifactCache<'s, S>,
    client: C,
}

impl<'s, S: KeyValueStore + ?Sized, C: IngestionClient> Pipeline<'s, S, C> {
    pub fn new(crawler: Crawler, cache: ArtifactCache<'s, S>, client: C) -> Self {
        Self {
            crawler,
            cache,
            client,
        }
    }

    /// Crawls `origin`, aggregates it, and ingests the text once per origin
    ///
    /// The crawl runs even when the origin is already cached; a cache hit only
    /// refreshes the artifact's recency. A crawl that fetched no page at all is
    /// not ingested, so an unreachable site never occupies the cache.
    pub async fn ingest_origin(
        &mut self,
        origin: &str,
        progress: &mut dyn ProgressSink,
    ) -> Result<PipelineReport> {
        let (crawl, text) = crawl_and_aggregate(&self.crawler, origin, progress).await?;

        if crawl.pages.is_empty() {
            return Err(IngestError::EmptyCrawl {
                origin: crawl.origin,
            });
        }

        let artifact = self.cache.ingest(&crawl.origin, &text, &self.client).await?;
        let company = extract_company_label(&crawl.origin);

        Ok(PipelineReport {
            company,
            aggregated_bytes: text.len(),
            crawl,
            artifact,
        })
    }

    /// Looks up a wallet address and ingests the domain its profile names
    ///
    /// The crawl is only attempted for a profile with a domain, a social
    /// handle, and both balances.
    pub async fn ingest_account<L>(
        &mut self,
        lookup: &L,
        address: &str,
        progress: &mut dyn ProgressSink,
    ) -> Result<AccountReport>
    where
        L: AccountLookup + ?Sized,
    {
        let profile = lookup.account(address).await?;
        profile.require_complete()?;
        let origin = profile.origin()?;

        tracing::info!("Account {} resolves to {}", address, origin);
        let ingest = self.ingest_origin(&origin, progress).await?;

        Ok(AccountReport { profile, ingest })
    }

    /// The artifact cache, for lookups after ingestion
    pub fn cache(&self) -> &ArtifactCache<'s, S> {
        &self.cache
    }
}
