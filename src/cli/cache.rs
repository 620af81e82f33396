//! Cache management commands

use colored::Colorize;
use dialoguer::Confirm;

use crate::cache::{CacheStats, TtlCache};
use crate::cli::{CommandContext, OutputFormat};
use crate::error::{Error, Result};
use crate::models::CacheEntryDisplay;
use crate::output::Formattable;
use crate::output::formatters::{format_size, format_timestamp_local};
use crate::output::json;

fn with_cache<R>(ctx: &CommandContext, f: impl FnOnce(&TtlCache) -> R) -> Result<R> {
    let cache = ctx
        .cache
        .lock()
        .map_err(|_| Error::Other("cache lock poisoned".to_string()))?;
    Ok(f(&cache))
}

fn location(ctx: &CommandContext) -> String {
    ctx.cache_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "in-memory".to_string())
}

/// Show cache status/statistics
pub fn status(ctx: &CommandContext) -> Result<()> {
    let (namespace, stats): (String, CacheStats) =
        with_cache(ctx, |c| (c.namespace().to_string(), c.stats()))?;

    match ctx.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "total_entries": stats.total_entries,
                "fresh_entries": stats.fresh_entries,
                "stale_entries": stats.stale_entries,
                "total_size_bytes": stats.total_size_bytes,
                "total_size_human": format_size(stats.total_size_bytes),
                "oldest_entry_ms": stats.oldest_entry_ms,
                "newest_entry_ms": stats.newest_entry_ms,
                "path": location(ctx),
                "namespace": namespace,
            });
            println!("{}", json::format_json(&json)?);
        }
        _ => {
            println!("{}", "Cache Status".bold());
            println!("────────────────────────────────────────");
            println!("Location:       {}", location(ctx));
            println!("Namespace:      {}", namespace);
            println!("Fresh entries:  {}", stats.fresh_entries);
            println!("Expired:        {}", stats.stale_entries);
            println!("Total size:     {}", format_size(stats.total_size_bytes));

            if let Some(oldest) = stats.oldest_entry_ms {
                println!("Oldest entry:   {}", format_timestamp_local(oldest));
            }
            if let Some(newest) = stats.newest_entry_ms {
                println!("Newest entry:   {}", format_timestamp_local(newest));
            }
        }
    }

    Ok(())
}

/// List every cached entry
pub fn list(ctx: &CommandContext) -> Result<()> {
    let mut entries = with_cache(ctx, |c| c.entries())?;
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    let rows: Vec<CacheEntryDisplay> = entries.into_iter().map(CacheEntryDisplay::from).collect();
    rows.print(ctx.format)
}

/// Remove expired and unreadable entries
pub fn purge(ctx: &CommandContext) -> Result<()> {
    let removed = with_cache(ctx, |c| c.purge_expired())?;

    match ctx.format {
        OutputFormat::Json => {
            let json = serde_json::json!({ "entries_removed": removed });
            println!("{}", json::format_json(&json)?);
        }
        _ => println!("Removed {} expired cache entries", removed),
    }
    Ok(())
}

/// Clear all cache entries, asking first unless `yes`
pub fn clear(ctx: &CommandContext, yes: bool) -> Result<()> {
    let total = with_cache(ctx, |c| c.stats().total_entries)?;

    if total > 0 && !yes {
        eprintln!(
            "{} Clear {} cached entries from {}?",
            "⚠".yellow(),
            total,
            location(ctx)
        );

        let confirm = Confirm::new()
            .with_prompt("Confirm clear?")
            .default(false)
            .interact()?;

        if !confirm {
            eprintln!("Cancelled.");
            return Ok(());
        }
    }

    let removed = with_cache(ctx, |c| c.clear_all(""))?;

    match ctx.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "entries_removed": removed,
                "success": true,
            });
            println!("{}", json::format_json(&json)?);
        }
        _ => {
            if removed > 0 {
                println!("Cleared {} cache entries", removed);
            } else {
                println!("Cache was already empty");
            }
        }
    }

    Ok(())
}

/// Remove one entry by its key
pub fn invalidate(ctx: &CommandContext, key: &str) -> Result<()> {
    let removed = with_cache(ctx, |c| c.invalidate(key))?;

    match ctx.format {
        OutputFormat::Json => {
            let json = serde_json::json!({ "key": key, "removed": removed });
            println!("{}", json::format_json(&json)?);
        }
        _ if removed => println!("{} Removed {}", "✓".green(), key),
        _ => println!("No cache entry named {}", key),
    }
    Ok(())
}

/// Show cache path
pub fn path(ctx: &CommandContext) -> Result<()> {
    println!("{}", location(ctx));
    Ok(())
}
