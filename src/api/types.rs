//! Request and response payloads for the translation service.

use serde::{Deserialize, Serialize};

use crate::translation::TranslationParams;

/// Body of a `POST /v2/translate` request.
///
/// Borrowed fields keep the serialization allocation-free; the request is
/// built fresh per attempt from the caller's params.
#[derive(Debug, Serialize)]
pub struct TranslateBody<'a> {
    pub text: Vec<&'a str>,
    pub target_lang: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formality: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glossary_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_handling: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_sentences: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_formatting: Option<bool>,
}

impl<'a> TranslateBody<'a> {
    pub fn new(texts: &'a [String], params: &'a TranslationParams) -> Self {
        Self {
            text: texts.iter().map(String::as_str).collect(),
            target_lang: &params.target_lang,
            source_lang: params.source_lang.as_deref(),
            formality: params.formality.map(|f| f.as_str()),
            glossary_id: params.glossary_id.as_deref(),
            model_type: params.model_type.as_deref(),
            tag_handling: params.tag_handling.as_deref(),
            split_sentences: params.split_sentences.as_deref(),
            preserve_formatting: params.preserve_formatting,
        }
    }
}

/// One translated segment in a `/v2/translate` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub detected_source_language: Option<String>,
    pub text: String,
}

/// Full `/v2/translate` response payload.
#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub translations: Vec<Translation>,
}

/// `/v2/usage` response payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub character_count: u64,
    pub character_limit: u64,
}

impl Usage {
    /// Fraction of the quota consumed, in percent.
    pub fn percent_used(&self) -> f64 {
        if self.character_limit == 0 {
            return 0.0;
        }
        self.character_count as f64 / self.character_limit as f64 * 100.0
    }
}

/// One entry of a `/v2/languages` response.
#[derive(Debug, Clone, Deserialize)]
pub struct Language {
    pub language: String,
    pub name: String,
    #[serde(default)]
    pub supports_formality: bool,
}
