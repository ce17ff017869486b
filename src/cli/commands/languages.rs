use anyhow::Result;

use crate::api::ApiClient;
use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::translation::print_local_languages;
use crate::ui::Style;

use super::render_api_error;

/// Runs `lingo languages`.
///
/// Queries the service for its authoritative target-language list; with
/// `--local`, prints the built-in table without touching the network.
pub async fn run_languages(local: bool) -> Result<()> {
    if local {
        print_local_languages();
        return Ok(());
    }

    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default();

    if config.defaults.to.is_none() {
        config.defaults.to = Some("en".to_string());
    }
    let resolved = resolve_config(&ResolveOptions::default(), &config)?;

    let client = ApiClient::new(
        resolved.endpoint,
        resolved.api_key,
        resolved.timeout,
        resolved.max_retries,
    )?;

    let languages = client
        .languages()
        .await
        .map_err(|err| render_api_error(&err))?;

    println!("{}", Style::header("Supported target languages"));
    for language in languages {
        let formality = if language.supports_formality {
            Style::secondary("(formality)")
        } else {
            String::new()
        };
        println!(
            "  {:8} {} {}",
            Style::code(language.language),
            language.name,
            formality
        );
    }

    Ok(())
}
