use anyhow::Result;

use crate::cache::{CacheOptions, TranslationCache, default_db_path};
use crate::cli::CacheAction;
use crate::config::ConfigManager;
use crate::ui::Style;

/// Runs `lingo cache <stats|clear>`.
///
/// Cache maintenance needs no endpoint or API key; only the `[cache]`
/// section of the config file is consulted.
pub fn run_cache(action: CacheAction) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default();

    let cache = TranslationCache::open_default(&CacheOptions {
        max_size: config.cache.max_size_bytes,
        ttl_secs: config.cache.ttl_secs,
        enabled: config.cache.enabled,
    })?;

    match action {
        CacheAction::Stats => {
            let stats = cache.stats()?;
            println!("{}", Style::header("Cache statistics"));
            println!(
                "  {}    {}",
                Style::label("entries"),
                Style::value(stats.entry_count)
            );
            println!(
                "  {}       {} / {}",
                Style::label("size"),
                Style::value(format_bytes(stats.total_size)),
                Style::secondary(format_bytes(stats.max_size))
            );
            println!(
                "  {}    {}",
                Style::label("enabled"),
                Style::value(stats.enabled)
            );
            println!(
                "  {}   {}",
                Style::label("location"),
                Style::secondary(default_db_path().display().to_string())
            );
        }
        CacheAction::Clear => {
            cache.clear()?;
            println!("{} Cache cleared", Style::success("✓"));
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
