//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Select, Text};

use crate::config::{ConfigManager, DEFAULT_API_KEY_ENV};
use crate::translation::SUPPORTED_LANGUAGES;
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the configure command.
///
/// With `--show`, prints the current configuration; otherwise interactively
/// edits the endpoint, API key source, and default target language.
pub fn run_configure(show: bool) -> Result<()> {
    if show {
        return show_config();
    }
    handle_prompt_cancellation(run_configure_inner)
}

fn show_config() -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default();

    let not_set = || Style::secondary("(not set)");

    println!("{}", Style::header("Current configuration"));
    println!(
        "  {}      {}",
        Style::label("endpoint"),
        config.api.endpoint.as_deref().map_or_else(not_set, Style::value)
    );
    println!(
        "  {}       {}",
        Style::label("api key"),
        if config.api.get_api_key().is_some() {
            Style::value("(set)")
        } else {
            not_set()
        }
    );
    println!(
        "  {}            {}",
        Style::label("to"),
        config.defaults.to.as_deref().map_or_else(not_set, Style::value)
    );
    println!(
        "  {}     {}",
        Style::label("formality"),
        config
            .defaults
            .formality
            .as_deref()
            .map_or_else(not_set, Style::value)
    );
    println!(
        "  {}         {}",
        Style::label("cache"),
        Style::value(format!(
            "{} ({} max, {}s ttl)",
            if config.cache.enabled { "enabled" } else { "disabled" },
            config.cache.max_size_bytes,
            config.cache.ttl_secs
        ))
    );
    println!(
        "  {}   {}",
        Style::label("concurrency"),
        Style::value(config.batch.concurrency)
    );
    println!();
    println!(
        "{}",
        Style::secondary(format!("Config file: {}", manager.config_path().display()))
    );

    Ok(())
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default();

    let endpoint = {
        let mut prompt =
            Text::new("API endpoint:").with_help_message("Base URL of the translation service");
        if let Some(current) = config.api.endpoint.as_deref() {
            prompt = prompt.with_default(current);
        }
        let endpoint = prompt.prompt()?;
        if endpoint.trim().is_empty() {
            bail!("Endpoint cannot be empty");
        }
        endpoint.trim().to_string()
    };

    let api_key_env = {
        let current = config
            .api
            .api_key_env
            .clone()
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        let value = Text::new("API key environment variable:")
            .with_default(&current)
            .with_help_message("The variable your API key is exported as")
            .prompt()?;
        value.trim().to_string()
    };

    let to = select_target_language(config.defaults.to.as_deref())?;

    config.api.endpoint = Some(endpoint);
    config.api.api_key_env = if api_key_env.is_empty() {
        None
    } else {
        Some(api_key_env)
    };
    config.defaults.to = Some(to);

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

fn select_target_language(default: Option<&str>) -> Result<String> {
    let options: Vec<String> = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| format!("{code} - {name}"))
        .collect();

    let default_index = default
        .and_then(|d| SUPPORTED_LANGUAGES.iter().position(|(code, _)| *code == d))
        .unwrap_or(0);

    let selection = Select::new("Default target language:", options)
        .with_starting_cursor(default_index)
        .prompt()?;

    // Extract code from "code - Name" format
    let code = selection.split(" - ").next().unwrap_or(&selection);

    Ok(code.to_string())
}
