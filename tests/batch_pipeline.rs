#![allow(clippy::unwrap_used)]
//! End-to-end batch pipeline tests.
//!
//! The translator is wired to a dead endpoint with a pre-populated cache,
//! so these tests prove the full coordinator → orchestrator → cache path
//! without any network: cached files translate successfully, uncached files
//! fail with a classified network error, and the two never interfere.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;

use lingo_cli::api::ApiClient;
use lingo_cli::batch::{BatchCoordinator, BatchOptions};
use lingo_cli::cache::{CacheOptions, TranslationCache};
use lingo_cli::translation::{TranslationParams, Translator};

fn offline_stack(temp_dir: &TempDir) -> (Translator, Arc<TranslationCache>) {
    let client = ApiClient::new(
        "http://127.0.0.1:9".to_string(),
        "test-key".to_string(),
        Duration::from_millis(200),
        0,
    )
    .unwrap();

    let cache = Arc::new(
        TranslationCache::open(temp_dir.path().join("cache.db"), &CacheOptions::default())
            .unwrap(),
    );

    (Translator::new(client, Arc::clone(&cache)), cache)
}

fn seed_cache(cache: &TranslationCache, params: &TranslationParams, text: &str, translated: &str) {
    let key = params.fingerprint(text);
    cache
        .set(
            &key,
            &json!({"text": translated, "detected_source_language": "en"}),
        )
        .unwrap();
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_batch_served_entirely_from_cache() {
    let temp_dir = TempDir::new().unwrap();
    let (translator, cache) = offline_stack(&temp_dir);
    let params = TranslationParams::new("de");

    let one = write_file(&temp_dir, "one.txt", "first document");
    let two = write_file(&temp_dir, "two.txt", "second document");
    seed_cache(&cache, &params, "first document", "erstes Dokument");
    seed_cache(&cache, &params, "second document", "zweites Dokument");

    let coordinator =
        BatchCoordinator::new(Arc::new(translator), BatchOptions::default()).unwrap();

    let result = coordinator
        .translate_files(&[one.clone(), two.clone()], &params, None)
        .await
        .unwrap();

    assert_eq!(result.successful.len(), 2);
    assert!(result.failed.is_empty());

    let out_one = temp_dir.path().join("one.de.txt");
    let out_two = temp_dir.path().join("two.de.txt");
    assert_eq!(std::fs::read_to_string(out_one).unwrap(), "erstes Dokument");
    assert_eq!(std::fs::read_to_string(out_two).unwrap(), "zweites Dokument");
}

#[tokio::test]
async fn test_cache_miss_fails_unit_without_aborting_batch() {
    let temp_dir = TempDir::new().unwrap();
    let (translator, cache) = offline_stack(&temp_dir);
    let params = TranslationParams::new("de");

    let cached = write_file(&temp_dir, "cached.txt", "known text");
    let uncached = write_file(&temp_dir, "uncached.txt", "unknown text");
    seed_cache(&cache, &params, "known text", "bekannter Text");

    let coordinator =
        BatchCoordinator::new(Arc::new(translator), BatchOptions::default()).unwrap();

    let result = coordinator
        .translate_files(&[cached.clone(), uncached.clone()], &params, None)
        .await
        .unwrap();

    assert_eq!(result.successful.len(), 1);
    assert_eq!(result.successful[0].source_path, cached);

    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].source_path, uncached);
    assert!(result.failed[0].error.contains("network error"));

    // The failed unit must not leave a bogus cache entry behind.
    let miss_key = params.fingerprint("unknown text");
    assert!(cache.get(&miss_key).unwrap().is_none());
}

#[tokio::test]
async fn test_fingerprint_separates_target_languages_in_batch() {
    let temp_dir = TempDir::new().unwrap();
    let (translator, cache) = offline_stack(&temp_dir);

    let de = TranslationParams::new("de");
    let fr = TranslationParams::new("fr");

    let source = write_file(&temp_dir, "doc.txt", "shared text");
    seed_cache(&cache, &de, "shared text", "geteilter Text");

    let coordinator =
        BatchCoordinator::new(Arc::new(translator), BatchOptions::default()).unwrap();

    // German target is cached; French is not and must fail offline.
    let result = coordinator
        .translate_files(std::slice::from_ref(&source), &de, None)
        .await
        .unwrap();
    assert_eq!(result.successful.len(), 1);

    let result = coordinator
        .translate_files(std::slice::from_ref(&source), &fr, None)
        .await
        .unwrap();
    assert_eq!(result.failed.len(), 1);
}
