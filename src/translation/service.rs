//! Cache-aware translation orchestration.
//!
//! [`Translator`] sits between callers and the API client: every request is
//! fingerprinted, served from the cache on a hit, and otherwise sent to the
//! service and cached on success. Classified errors pass through unchanged
//! and are never cached. Cache I/O failures degrade to a miss with a
//! warning rather than failing the translation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::{ApiClient, ApiError, ErrorKind, Translation};
use crate::cache::TranslationCache;

use super::params::TranslationParams;

/// A finished translation, with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
    pub detected_source_language: Option<String>,
    /// True when the result came from the local cache.
    #[serde(skip)]
    pub from_cache: bool,
}

/// The seam the batch coordinator drives.
///
/// [`Translator`] is the production implementation; tests substitute mocks.
#[async_trait]
pub trait TextTranslator: Send + Sync {
    async fn translate_text(
        &self,
        text: &str,
        params: &TranslationParams,
    ) -> Result<TranslationResult, ApiError>;
}

pub struct Translator {
    client: ApiClient,
    cache: Arc<TranslationCache>,
}

impl Translator {
    pub fn new(client: ApiClient, cache: Arc<TranslationCache>) -> Self {
        Self { client, cache }
    }

    /// Translates one text, consulting the cache first.
    pub async fn translate(
        &self,
        text: &str,
        params: &TranslationParams,
    ) -> Result<TranslationResult, ApiError> {
        let key = params.fingerprint(text);

        if let Some(hit) = self.lookup(&key) {
            return Ok(TranslationResult {
                text: hit.text,
                detected_source_language: hit.detected_source_language,
                from_cache: true,
            });
        }

        let texts = [text.to_string()];
        let translations = self.client.translate(&texts, params).await?;
        let Some(translation) = translations.into_iter().next() else {
            return Err(ApiError::new(
                ErrorKind::Malformed,
                "empty translations array",
            ));
        };

        self.store(&key, &translation);

        Ok(TranslationResult {
            text: translation.text,
            detected_source_language: translation.detected_source_language,
            from_cache: false,
        })
    }

    /// Translates each text in `texts`, consulting the cache per text.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        params: &TranslationParams,
    ) -> Result<Vec<TranslationResult>, ApiError> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.translate(text, params).await?);
        }
        Ok(results)
    }

    /// Translates one text into several target languages.
    ///
    /// Each target has its own fingerprint, so cached targets are served
    /// locally while the rest go to the service.
    pub async fn translate_to_multiple(
        &self,
        text: &str,
        params: &TranslationParams,
        targets: &[String],
    ) -> Result<Vec<(String, TranslationResult)>, ApiError> {
        let mut results = Vec::with_capacity(targets.len());
        for target in targets {
            let retargeted = params.for_target(target);
            let result = self.translate(text, &retargeted).await?;
            results.push((target.clone(), result));
        }
        Ok(results)
    }

    /// The trace id from the most recent API response.
    pub fn last_trace_id(&self) -> Option<String> {
        self.client.last_trace_id()
    }

    fn lookup(&self, key: &str) -> Option<Translation> {
        match self.cache.get(key) {
            // A decoded-but-wrong-shape value is an old schema: treat as a miss.
            Ok(Some(value)) => serde_json::from_value(value).ok(),
            Ok(None) => None,
            Err(err) => {
                crate::warn!("Warning: cache read failed: {err}");
                None
            }
        }
    }

    fn store(&self, key: &str, translation: &Translation) {
        let value = match serde_json::to_value(translation) {
            Ok(value) => value,
            Err(err) => {
                crate::warn!("Warning: cache serialization failed: {err}");
                return;
            }
        };

        if let Err(err) = self.cache.set(key, &value) {
            crate::warn!("Warning: cache write failed: {err}");
        }
    }
}

#[async_trait]
impl TextTranslator for Translator {
    async fn translate_text(
        &self,
        text: &str,
        params: &TranslationParams,
    ) -> Result<TranslationResult, ApiError> {
        self.translate(text, params).await
    }
}
