//! Request parameters and cache fingerprinting.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Formality preference forwarded to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    Default,
    More,
    Less,
    PreferMore,
    PreferLess,
}

impl Formality {
    /// Parses a config-file value like `"prefer_more"`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "default" => Some(Self::Default),
            "more" => Some(Self::More),
            "less" => Some(Self::Less),
            "prefer_more" => Some(Self::PreferMore),
            "prefer_less" => Some(Self::PreferLess),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::More => "more",
            Self::Less => "less",
            Self::PreferMore => "prefer_more",
            Self::PreferLess => "prefer_less",
        }
    }
}

/// Everything that affects the service's output for a given text.
///
/// The fingerprint is derived from all of these fields, so adding a field
/// here automatically invalidates stale cache entries for requests that set
/// it.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationParams {
    pub target_lang: String,
    pub source_lang: Option<String>,
    pub formality: Option<Formality>,
    pub glossary_id: Option<String>,
    pub model_type: Option<String>,
    pub tag_handling: Option<String>,
    pub split_sentences: Option<String>,
    pub preserve_formatting: Option<bool>,
}

impl TranslationParams {
    pub fn new(target_lang: impl Into<String>) -> Self {
        Self {
            target_lang: target_lang.into(),
            source_lang: None,
            formality: None,
            glossary_id: None,
            model_type: None,
            tag_handling: None,
            split_sentences: None,
            preserve_formatting: None,
        }
    }

    /// Returns a copy aimed at a different target language.
    #[must_use]
    pub fn for_target(&self, target_lang: &str) -> Self {
        let mut params = self.clone();
        params.target_lang = target_lang.to_string();
        params
    }

    /// Computes the cache key for translating `text` with these parameters.
    ///
    /// SHA-256 over a JSON object containing the text and every
    /// output-affecting field. Stable across processes.
    pub fn fingerprint(&self, text: &str) -> String {
        let input = serde_json::json!({
            "text": text,
            "params": self,
        });

        let mut hasher = Sha256::new();
        hasher.update(input.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}
