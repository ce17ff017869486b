mod language;
mod params;
mod service;

pub use language::{SUPPORTED_LANGUAGES, print_local_languages, validate_language};
pub use params::{Formality, TranslationParams};
pub use service::{TextTranslator, TranslationResult, Translator};
