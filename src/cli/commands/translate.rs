use anyhow::{Result, bail};
use std::io::{self, Write};

use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::input::InputReader;
use crate::status;
use crate::translation::{Formality, TranslationParams, validate_language};
use crate::ui::{Spinner, Style};

use super::{build_translator, render_api_error};

pub struct TranslateOptions {
    pub file: Option<String>,
    pub to: Option<String>,
    pub from: Option<String>,
    pub formality: Option<Formality>,
    pub no_cache: bool,
}

pub async fn run_translate(options: TranslateOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default();

    let resolved = resolve_config(
        &ResolveOptions {
            to: options.to.clone(),
            formality: options.formality,
            no_cache: options.no_cache,
            concurrency: None,
        },
        &config,
    )?;

    // The target may be a comma-separated fan-out list.
    let targets: Vec<String> = resolved
        .target_lang
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(String::from)
        .collect();

    if targets.is_empty() {
        bail!("Error: No target language given");
    }
    for target in &targets {
        validate_language(target)?;
    }
    if let Some(ref from) = options.from {
        validate_language(from)?;
    }

    let source_text = InputReader::read(options.file.as_deref())?;
    if source_text.is_empty() {
        bail!("Error: Input is empty");
    }

    let (translator, _cache) = build_translator(&resolved)?;

    let mut params = TranslationParams::new(targets[0].clone());
    params.source_lang = options.from;
    params.formality = resolved.formality;

    let spinner = Spinner::new("Translating...");

    if let [target] = targets.as_slice() {
        let result = match translator.translate(&source_text, &params).await {
            Ok(result) => result,
            Err(err) => {
                spinner.stop();
                return Err(render_api_error(&err));
            }
        };
        spinner.stop();

        print!("{}", result.text);
        if !result.text.ends_with('\n') {
            println!();
        }
        io::stdout().flush()?;

        if result.from_cache {
            status!("{}", Style::secondary(format!("[{target}] served from cache")));
        }
    } else {
        let results = match translator
            .translate_to_multiple(&source_text, &params, &targets)
            .await
        {
            Ok(results) => results,
            Err(err) => {
                spinner.stop();
                return Err(render_api_error(&err));
            }
        };
        spinner.stop();

        for (target, result) in results {
            println!("{}", Style::header(format!("[{target}]")));
            print!("{}", result.text);
            if !result.text.ends_with('\n') {
                println!();
            }
            println!();

            if result.from_cache {
                status!("{}", Style::secondary(format!("[{target}] served from cache")));
            }
        }
        io::stdout().flush()?;
    }

    Ok(())
}
