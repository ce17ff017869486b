/// Batch file translation command handler.
pub mod batch;

/// Cache inspection and maintenance command handlers.
pub mod cache;

/// Configure command handler for editing default settings.
pub mod configure;

/// Language listing command handler.
pub mod languages;

/// Single-text translation command handler.
pub mod translate;

/// Account usage command handler.
pub mod usage;

use anyhow::Result;
use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::cache::TranslationCache;
use crate::config::ResolvedConfig;
use crate::translation::Translator;

/// Builds the client/cache/orchestrator stack from resolved configuration.
///
/// The cache handle is returned alongside the translator so commands can
/// report on it; both share one underlying database connection.
pub(crate) fn build_translator(resolved: &ResolvedConfig) -> Result<(Translator, Arc<TranslationCache>)> {
    let cache = Arc::new(TranslationCache::open_default(&resolved.cache)?);
    let client = ApiClient::new(
        resolved.endpoint.clone(),
        resolved.api_key.clone(),
        resolved.timeout,
        resolved.max_retries,
    )?;

    Ok((Translator::new(client, Arc::clone(&cache)), cache))
}

/// Converts a classified API error into a user-facing error, appending the
/// trace id when the service provided one.
pub(crate) fn render_api_error(err: &ApiError) -> anyhow::Error {
    match err.trace_id.as_deref() {
        Some(trace_id) => anyhow::anyhow!("{err}\nTrace ID: {trace_id}"),
        None => anyhow::anyhow!("{err}"),
    }
}
