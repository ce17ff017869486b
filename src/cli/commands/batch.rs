use anyhow::{Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;

use crate::batch::{BatchCoordinator, BatchOptions, BatchResult, ProgressFn};
use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::output;
use crate::translation::{Formality, TranslationParams, validate_language};
use crate::ui::Style;

use super::build_translator;

pub struct BatchCliOptions {
    pub paths: Vec<PathBuf>,
    pub dir: Option<PathBuf>,
    pub to: Option<String>,
    pub from: Option<String>,
    pub formality: Option<Formality>,
    pub recursive: bool,
    pub pattern: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub output_template: Option<String>,
    pub concurrency: Option<usize>,
    pub no_cache: bool,
}

pub async fn run_batch(options: BatchCliOptions) -> Result<()> {
    if options.paths.is_empty() && options.dir.is_none() {
        bail!(
            "Error: No input given\n\n\
             Pass files directly:     lingo batch a.md b.md\n\
             Or a whole directory:    lingo batch --dir ./docs"
        );
    }

    let manager = ConfigManager::new()?;
    let config = manager.load_or_default();

    let resolved = resolve_config(
        &ResolveOptions {
            to: options.to.clone(),
            formality: options.formality,
            no_cache: options.no_cache,
            concurrency: options.concurrency,
        },
        &config,
    )?;

    validate_language(&resolved.target_lang)?;
    if let Some(ref from) = options.from {
        validate_language(from)?;
    }

    let (translator, _cache) = build_translator(&resolved)?;

    let coordinator = BatchCoordinator::new(
        Arc::new(translator),
        BatchOptions {
            concurrency: resolved.concurrency,
            recursive: options.recursive,
            pattern: options.pattern.clone(),
            output_dir: options.output_dir.clone(),
            output_template: options.output_template.clone(),
        },
    )?;

    let mut params = TranslationParams::new(resolved.target_lang.clone());
    params.source_lang = options.from.clone();
    params.formality = resolved.formality;

    let bar = progress_bar();
    let on_progress: ProgressFn = {
        let bar = bar.clone();
        Arc::new(move |progress| {
            bar.set_length(progress.total as u64);
            bar.set_position(progress.completed as u64);
            if let Some(current) = progress.current {
                bar.set_message(current);
            }
        })
    };

    let result = match options.dir {
        Some(ref dir) => {
            coordinator
                .translate_directory(dir, &params, Some(on_progress))
                .await?
        }
        None => {
            coordinator
                .translate_files(&options.paths, &params, Some(on_progress))
                .await?
        }
    };

    bar.finish_and_clear();
    print_summary(&result);

    if !result.failed.is_empty() {
        bail!("{} file(s) failed", result.failed.len());
    }

    Ok(())
}

#[allow(clippy::unwrap_used)]
fn progress_bar() -> ProgressBar {
    if output::is_quiet() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(0);
    // unwrap is safe: template string is a compile-time constant
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:30} {pos}/{len} {wide_msg}")
            .unwrap(),
    );
    bar
}

fn print_summary(result: &BatchResult) {
    let stats = result.statistics();

    crate::status!(
        "{} {} translated, {} failed, {} skipped",
        Style::success("✓"),
        stats.successful,
        stats.failed,
        stats.skipped
    );

    for file in &result.failed {
        crate::warn!(
            "{} {}: {}",
            Style::error("✗"),
            file.source_path.display(),
            file.error
        );
    }

    for file in &result.skipped {
        crate::status!(
            "{} {}: {}",
            Style::warning("-"),
            file.source_path.display(),
            file.reason
        );
    }
}
