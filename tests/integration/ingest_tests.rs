//! Integration tests for the ingestion pipeline
//!
//! A wiremock server plays the site, a second one the files/vector store API
//! and a third the account explorer. State lives in a temporary SQLite file.

use site_ingest::config::{CrawlConfig, FetcherConfig, IngestionConfig, LookupConfig};
use site_ingest::crawler::Crawler;
use site_ingest::ingest::{ArtifactCache, ArtifactId, CacheOutcome, OpenAiIngestionClient};
use site_ingest::lookup::{LookupError, XrpScanLookup};
use site_ingest::pipeline::Pipeline;
use site_ingest::state::NoProgress;
use site_ingest::storage::{KeyValueStore, SqliteStore};
use site_ingest::IngestError;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECENCY: &str = "vs_files";

fn crawler() -> Crawler {
    let fetcher = FetcherConfig {
        timeout_secs: 5,
        connect_timeout_secs: 2,
        ..FetcherConfig::default()
    };
    Crawler::new(&fetcher, CrawlConfig::default()).unwrap()
}

fn ingestion_client(api: &MockServer) -> OpenAiIngestionClient {
    let config = IngestionConfig {
        api_base: format!("{}/v1", api.uri()),
        api_key_env: "SITE_INGEST_TEST_KEY".to_string(),
        vector_store_id: "vs_test".to_string(),
        purpose: "assistants".to_string(),
    };
    OpenAiIngestionClient::new(&config, "sk-test").unwrap()
}

/// Serves a home page linking to /about, and the about page
async fn mount_site(site: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><h1>Welcome</h1><a href="/about">About</a></body></html>"#,
        ))
        .mount(site)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>We build things</p></body></html>"),
        )
        .mount(site)
        .await;
}

/// Accepts exactly `uploads` uploads and registrations
async fn mount_api(api: &MockServer, uploads: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/files"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "id": "file-site", "object": "file" })),
        )
        .expect(uploads)
        .mount(api)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/vector_stores/vs_test/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "file-site",
            "object": "vector_store.file",
            "created_at": 1_700_000_000
        })))
        .expect(uploads)
        .mount(api)
        .await;
}

fn database(dir: &TempDir) -> PathBuf {
    dir.path().join("state").join("cache.db")
}

#[tokio::test]
async fn test_origin_is_uploaded_once() {
    let site = MockServer::start().await;
    let api = MockServer::start().await;
    mount_site(&site).await;
    mount_api(&api, 1).await;

    let dir = TempDir::new().unwrap();
    let staging = dir.path().join("data");
    let mut store = SqliteStore::open(&database(&dir)).unwrap();

    let cache = ArtifactCache::new(&mut store, &staging, RECENCY);
    let mut pipeline = Pipeline::new(crawler(), cache, ingestion_client(&api));

    let first = pipeline
        .ingest_origin(&format!("{}/", site.uri()), &mut NoProgress)
        .await
        .unwrap();
    assert_eq!(first.crawl.origin, site.uri());
    assert_eq!(first.crawl.pages.len(), 2);
    assert_eq!(first.artifact.artifact_id, ArtifactId::new("file-site"));

    let CacheOutcome::Ingested {
        staging_path,
        indexed_at,
        ..
    } = &first.artifact.outcome
    else {
        panic!("expected an upload, got {:?}", first.artifact.outcome);
    };
    assert_eq!(*indexed_at, 1_700_000_000);
    assert!(staging_path.starts_with(&staging));
    let staged = std::fs::read_to_string(staging_path).unwrap();
    assert!(staged.contains("Welcome"));
    assert!(staged.contains("We build things"));
    assert_eq!(staged.len(), first.aggregated_bytes);

    let second = pipeline
        .ingest_origin(&site.uri(), &mut NoProgress)
        .await
        .unwrap();
    assert!(second.artifact.is_cache_hit());
    assert_eq!(second.artifact.artifact_id, first.artifact.artifact_id);
    assert_eq!(
        pipeline
            .cache()
            .lookup_origin(&ArtifactId::new("file-site"))
            .unwrap(),
        Some(site.uri())
    );
}

#[tokio::test]
async fn test_cache_survives_restart() {
    let site = MockServer::start().await;
    let api = MockServer::start().await;
    mount_site(&site).await;
    mount_api(&api, 1).await;

    let dir = TempDir::new().unwrap();
    let db = database(&dir);

    {
        let mut store = SqliteStore::open(&db).unwrap();
        let cache = ArtifactCache::new(&mut store, dir.path(), RECENCY);
        let mut pipeline = Pipeline::new(crawler(), cache, ingestion_client(&api));
        pipeline
            .ingest_origin(&site.uri(), &mut NoProgress)
            .await
            .unwrap();
    }

    let mut store = SqliteStore::open(&db).unwrap();
    assert_eq!(store.get(&site.uri()).unwrap(), Some("file-site".to_string()));
    assert_eq!(store.get("file-site").unwrap(), Some(site.uri()));

    let cache = ArtifactCache::new(&mut store, dir.path(), RECENCY);
    let mut pipeline = Pipeline::new(crawler(), cache, ingestion_client(&api));
    let again = pipeline
        .ingest_origin(&site.uri(), &mut NoProgress)
        .await
        .unwrap();
    assert!(again.artifact.is_cache_hit());

    let recent = pipeline.cache().recent_artifacts().unwrap();
    assert_eq!(recent.len(), 1);
    assert!(recent[0].touched_at > 1_700_000_000);
}

#[tokio::test]
async fn test_unreachable_site_is_not_ingested() {
    let site = MockServer::start().await;
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&site)
        .await;
    mount_api(&api, 0).await;

    let dir = TempDir::new().unwrap();
    let mut store = SqliteStore::open(&database(&dir)).unwrap();
    let cache = ArtifactCache::new(&mut store, dir.path(), RECENCY);
    let mut pipeline = Pipeline::new(crawler(), cache, ingestion_client(&api));

    let err = pipeline
        .ingest_origin(&site.uri(), &mut NoProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::EmptyCrawl { ref origin } if *origin == site.uri()));
    assert_eq!(pipeline.cache().lookup_artifact(&site.uri()).unwrap(), None);
}

#[tokio::test]
async fn test_failed_upload_leaves_cache_empty() {
    let site = MockServer::start().await;
    let api = MockServer::start().await;
    mount_site(&site).await;
    Mock::given(method("POST"))
        .and(path("/v1/files"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&api)
        .await;

    let dir = TempDir::new().unwrap();
    let mut store = SqliteStore::open(&database(&dir)).unwrap();
    let cache = ArtifactCache::new(&mut store, dir.path(), RECENCY);
    let mut pipeline = Pipeline::new(crawler(), cache, ingestion_client(&api));

    let err = pipeline
        .ingest_origin(&site.uri(), &mut NoProgress)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("upstream down"));
    assert_eq!(pipeline.cache().lookup_artifact(&site.uri()).unwrap(), None);
    assert!(pipeline.cache().recent_artifacts().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_origin_is_rejected() {
    let api = MockServer::start().await;
    mount_api(&api, 0).await;

    let dir = TempDir::new().unwrap();
    let mut store = SqliteStore::open(&database(&dir)).unwrap();
    let cache = ArtifactCache::new(&mut store, dir.path(), RECENCY);
    let mut pipeline = Pipeline::new(crawler(), cache, ingestion_client(&api));

    let err = pipeline
        .ingest_origin("ftp://files.a.test", &mut NoProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::Url(_)));
}

#[tokio::test]
async fn test_incomplete_account_is_not_crawled() {
    let explorer = MockServer::start().await;
    let site = MockServer::start().await;
    let api = MockServer::start().await;
    mount_api(&api, 0).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>never</p>"))
        .expect(0)
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v1/account/r[A-Za-z0-9]+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accountName": {
                "domain": site.uri().trim_start_matches("http://"),
                "twitter": "",
                "verified": true
            },
            "xrpBalance": "125.5"
        })))
        .expect(1)
        .mount(&explorer)
        .await;

    let lookup = XrpScanLookup::new(&LookupConfig {
        api_base: explorer.uri(),
    })
    .unwrap();

    let dir = TempDir::new().unwrap();
    let mut store = SqliteStore::open(&database(&dir)).unwrap();
    let cache = ArtifactCache::new(&mut store, dir.path(), RECENCY);
    let mut pipeline = Pipeline::new(crawler(), cache, ingestion_client(&api));

    let err = pipeline
        .ingest_account(&lookup, "rExampleAddress1", &mut NoProgress)
        .await
        .unwrap_err();

    match err {
        IngestError::Lookup(LookupError::InsufficientInformation { missing }) => {
            assert_eq!(missing, vec!["social_handle", "initial_balance"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unknown_account_is_not_crawled() {
    let explorer = MockServer::start().await;
    let api = MockServer::start().await;
    mount_api(&api, 0).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&explorer)
        .await;

    let lookup = XrpScanLookup::new(&LookupConfig {
        api_base: explorer.uri(),
    })
    .unwrap();

    let dir = TempDir::new().unwrap();
    let mut store = SqliteStore::open(&database(&dir)).unwrap();
    let cache = ArtifactCache::new(&mut store, dir.path(), RECENCY);
    let mut pipeline = Pipeline::new(crawler(), cache, ingestion_client(&api));

    let err = pipeline
        .ingest_account(&lookup, "rUnknown", &mut NoProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::Lookup(LookupError::Status(404))));
}

#[test]
fn test_staging_dir_is_created_lazily() {
    let dir = TempDir::new().unwrap();
    let staging = dir.path().join("never-used");
    let mut store = SqliteStore::open_in_memory().unwrap();
    let _cache = ArtifactCache::new(&mut store, &staging, RECENCY);
    assert!(!staging.exists());
}
