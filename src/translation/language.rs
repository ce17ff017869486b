//! Local language-code registry.
//!
//! Validated before any request is built, so the core never sees an unknown
//! code. `lingo languages` queries the service for the authoritative list;
//! this table exists for offline validation.

use anyhow::Result;

use crate::ui::Style;

/// Target language codes the service accepts, with display names.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("bg", "Bulgarian"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("nb", "Norwegian Bokmål"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sv", "Swedish"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese (Simplified)"),
    ("zh-hant", "Chinese (Traditional)"),
];

/// Prints the locally known language codes to stdout.
pub fn print_local_languages() {
    println!("{}", Style::header("Supported target language codes"));
    for (code, name) in SUPPORTED_LANGUAGES {
        println!("  {:8} {}", Style::code(code), Style::secondary(name));
    }
}

/// Validates that the given language code is known.
///
/// # Errors
///
/// Returns an error if the language code is not in the supported list.
pub fn validate_language(lang: &str) -> Result<()> {
    if SUPPORTED_LANGUAGES.iter().any(|(code, _)| *code == lang) {
        Ok(())
    } else {
        anyhow::bail!(
            "Invalid language code: '{lang}'\n\n\
             Valid codes: de, en, fr, ja, zh, ...\n\
             Run 'lingo languages' to see the full list."
        )
    }
}
