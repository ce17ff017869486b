use anyhow::Result;

use crate::api::ApiClient;
use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::ui::Style;

use super::render_api_error;

/// Runs `lingo usage`: fetches and prints account character usage.
pub async fn run_usage() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default();

    // Usage needs no target language; satisfy resolution with a dummy.
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

    let usage = client.usage().await.map_err(|err| render_api_error(&err))?;

    println!("{}", Style::header("Character usage"));
    println!(
        "  {}      {}",
        Style::label("used"),
        Style::value(usage.character_count)
    );
    println!(
        "  {}     {}",
        Style::label("limit"),
        Style::value(usage.character_limit)
    );
    println!(
        "  {}   {}",
        Style::label("percent"),
        Style::value(format!("{:.1}%", usage.percent_used()))
    );

    Ok(())
}
