//! SQLite-backed translation cache with TTL expiry and size-bounded eviction.
//!
//! Entries are keyed by request fingerprint and carry the serialized value,
//! an insertion timestamp, and the serialized size in bytes. Every lookup
//! and insertion first sweeps expired rows; insertions that would push the
//! store past its size bound evict the oldest entries (insertion/update
//! order, not access order — a `get` never refreshes an entry's position).

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::paths;

/// Stored in place of a JSON `null`, which cannot be told apart from a
/// missing row if serialized normally. Not valid JSON, so it can never
/// collide with a real serialized value.
const NULL_SENTINEL: &str = "__null__";

/// Cache sizing and expiry knobs, usually sourced from the config file.
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Upper bound on the summed size of stored values, in bytes.
    pub max_size: u64,
    /// Entry lifetime in seconds; 0 disables expiry.
    pub ttl_secs: u64,
    /// Whether `get`/`set` do anything at all.
    pub enabled: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_size: 100 * 1024 * 1024,
            ttl_secs: 30 * 24 * 60 * 60,
            enabled: true,
        }
    }
}

/// A point-in-time view of the cache, for `lingo cache stats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entry_count: u64,
    pub total_size: u64,
    pub max_size: u64,
    pub enabled: bool,
}

pub struct TranslationCache {
    conn: Mutex<Connection>,
    max_size: u64,
    ttl_secs: u64,
    enabled: AtomicBool,
}

impl TranslationCache {
    /// Opens (or creates) the cache database at the default location,
    /// `$XDG_CACHE_HOME/lingo/cache.db`.
    pub fn open_default(options: &CacheOptions) -> Result<Self> {
        let cache_dir = paths::cache_dir();
        std::fs::create_dir_all(&cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", cache_dir.display())
        })?;

        Self::open(cache_dir.join("cache.db"), options)
    }

    /// Opens (or creates) the cache database at `db_path`.
    ///
    /// The connection is opened once and shared for the life of the cache;
    /// concurrent callers are serialized through an internal mutex.
    pub fn open(db_path: PathBuf, options: &CacheOptions) -> Result<Self> {
        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open cache database: {}", db_path.display()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                key TEXT UNIQUE NOT NULL,
                value TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                size INTEGER NOT NULL
            )",
            [],
        )
        .context("Failed to create cache table")?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_entries_created_at ON entries(created_at)",
            [],
        )
        .context("Failed to create cache index")?;

        Ok(Self {
            conn: Mutex::new(conn),
            max_size: options.max_size,
            ttl_secs: options.ttl_secs,
            enabled: AtomicBool::new(options.enabled),
        })
    }

    /// Looks up a value by key.
    ///
    /// Sweeps expired entries first. A row whose stored value no longer
    /// deserializes is deleted and reported as absent.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let conn = self.lock_conn()?;
        Self::sweep_expired(&conn, self.ttl_secs)?;

        let stored: Option<String> = conn
            .query_row("SELECT value FROM entries WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .context("Failed to read cache entry")?;

        let Some(stored) = stored else {
            return Ok(None);
        };

        if stored == NULL_SENTINEL {
            return Ok(Some(Value::Null));
        }

        match serde_json::from_str(&stored) {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                // Corrupt row: drop it and treat the lookup as a miss.
                conn.execute("DELETE FROM entries WHERE key = ?1", [key])
                    .context("Failed to delete corrupt cache entry")?;
                Ok(None)
            }
        }
    }

    /// Inserts or replaces a value under `key`.
    ///
    /// Expired entries are swept first; if the store would exceed its size
    /// bound, the oldest entries are evicted until the new value fits.
    pub fn set(&self, key: &str, value: &Value) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let serialized = if value.is_null() {
            NULL_SENTINEL.to_string()
        } else {
            serde_json::to_string(value).context("Failed to serialize cache value")?
        };
        let size = serialized.len() as u64;

        let conn = self.lock_conn()?;
        Self::sweep_expired(&conn, self.ttl_secs)?;

        let current_total = Self::total_size(&conn)?;
        let replaced_size: u64 = conn
            .query_row("SELECT size FROM entries WHERE key = ?1", [key], |row| {
                row.get::<_, i64>(0)
            })
            .optional()
            .context("Failed to read cache entry size")?
            .map_or(0, |s| s as u64);

        if current_total + size - replaced_size > self.max_size {
            let to_free = current_total + size - self.max_size + 1;
            Self::evict_oldest(&conn, key, to_free)?;
        }

        conn.execute(
            "INSERT OR REPLACE INTO entries (key, value, created_at, size)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![key, serialized, now_secs(), size as i64],
        )
        .context("Failed to write cache entry")?;

        Ok(())
    }

    /// Entry count, sizes, and the enabled flag.
    pub fn stats(&self) -> Result<CacheStats> {
        let conn = self.lock_conn()?;

        let entry_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .context("Failed to count cache entries")?;

        Ok(CacheStats {
            entry_count: entry_count as u64,
            total_size: Self::total_size(&conn)?,
            max_size: self.max_size,
            enabled: self.is_enabled(),
        })
    }

    /// Removes every entry.
    pub fn clear(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM entries", [])
            .context("Failed to clear cache")?;
        Ok(())
    }

    /// Re-enables `get`/`set` after a `disable`.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    /// Turns `get`/`set` into no-ops without touching stored data.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Closes the underlying database handle.
    ///
    /// Dropping the cache closes the handle too; this exists for callers
    /// that want close failures surfaced.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| anyhow::anyhow!("Cache lock poisoned"))?;
        conn.close()
            .map_err(|(_, err)| err)
            .context("Failed to close cache database")
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Cache lock poisoned"))
    }

    fn sweep_expired(conn: &Connection, ttl_secs: u64) -> Result<()> {
        if ttl_secs == 0 {
            return Ok(());
        }

        let cutoff = now_secs() - ttl_secs as i64;
        conn.execute("DELETE FROM entries WHERE created_at <= ?1", [cutoff])
            .context("Failed to sweep expired cache entries")?;
        Ok(())
    }

    fn total_size(conn: &Connection) -> Result<u64> {
        let total: i64 = conn
            .query_row(
                "SELECT COALESCE(SUM(size), 0) FROM entries",
                [],
                |row| row.get(0),
            )
            .context("Failed to sum cache sizes")?;
        Ok(total as u64)
    }

    /// Deletes entries in insertion/update order (oldest first) until at
    /// least `to_free` bytes are reclaimed, skipping the key about to be
    /// written.
    fn evict_oldest(conn: &Connection, incoming_key: &str, to_free: u64) -> Result<()> {
        let victims = {
            let mut stmt = conn
                .prepare("SELECT key, size FROM entries WHERE key <> ?1 ORDER BY id ASC")
                .context("Failed to prepare eviction scan")?;

            let rows = stmt
                .query_map([incoming_key], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })
                .context("Failed to scan cache for eviction")?;

            let mut victims = Vec::new();
            let mut freed: u64 = 0;
            for row in rows {
                if freed >= to_free {
                    break;
                }
                let (key, size) = row.context("Failed to read eviction candidate")?;
                freed += size as u64;
                victims.push(key);
            }
            victims
        };

        for key in victims {
            conn.execute("DELETE FROM entries WHERE key = ?1", [key])
                .context("Failed to evict cache entry")?;
        }

        Ok(())
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() as i64)
}

/// Default cache database path, for display in `lingo cache stats`.
pub fn default_db_path() -> PathBuf {
    paths::cache_dir().join("cache.db")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn open_cache(temp_dir: &TempDir, options: CacheOptions) -> TranslationCache {
        TranslationCache::open(temp_dir.path().join("cache.db"), &options).unwrap()
    }

    fn backdate(cache: &TranslationCache, key: &str, secs: i64) {
        let conn = cache.conn.lock().unwrap();
        conn.execute(
            "UPDATE entries SET created_at = created_at - ?1 WHERE key = ?2",
            rusqlite::params![secs, key],
        )
        .unwrap();
    }

    #[test]
    fn test_miss_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(&temp_dir, CacheOptions::default());

        assert!(cache.get("absent").unwrap().is_none());
    }

    #[test]
    fn test_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(&temp_dir, CacheOptions::default());

        let value = json!({"text": "Hallo Welt", "detected_source_language": "en"});
        cache.set("k1", &value).unwrap();

        assert_eq!(cache.get("k1").unwrap(), Some(value));
    }

    #[test]
    fn test_null_round_trips_via_sentinel() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(&temp_dir, CacheOptions::default());

        cache.set("k1", &Value::Null).unwrap();

        // A cached null is distinguishable from a miss.
        assert_eq!(cache.get("k1").unwrap(), Some(Value::Null));
        assert!(cache.get("k2").unwrap().is_none());
    }

    #[test]
    fn test_sentinel_does_not_collide_with_string_value() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(&temp_dir, CacheOptions::default());

        let value = json!("__null__");
        cache.set("k1", &value).unwrap();

        assert_eq!(cache.get("k1").unwrap(), Some(value));
    }

    #[test]
    fn test_replace_updates_value_and_size() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(&temp_dir, CacheOptions::default());

        cache.set("k1", &json!("short")).unwrap();
        cache.set("k1", &json!("a considerably longer value")).unwrap();

        assert_eq!(cache.get("k1").unwrap(), Some(json!("a considerably longer value")));

        let stats = cache.stats().unwrap();
        assert_eq!(stats.entry_count, 1);
        assert_eq!(
            stats.total_size,
            serde_json::to_string(&json!("a considerably longer value"))
                .unwrap()
                .len() as u64
        );
    }

    #[test]
    fn test_eviction_drops_oldest_first() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(
            &temp_dir,
            CacheOptions {
                max_size: 100,
                ttl_secs: 0,
                enabled: true,
            },
        );

        // 58 chars of payload + 2 quotes = 60 bytes serialized.
        let sixty_bytes = json!("x".repeat(58));
        cache.set("a", &sixty_bytes).unwrap();
        cache.set("b", &sixty_bytes).unwrap();

        assert!(cache.get("a").unwrap().is_none());
        assert!(cache.get("b").unwrap().is_some());

        let stats = cache.stats().unwrap();
        assert!(stats.total_size <= stats.max_size);
        assert_eq!(stats.entry_count, 1);
    }

    #[test]
    fn test_size_bound_holds_across_many_sets() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(
            &temp_dir,
            CacheOptions {
                max_size: 200,
                ttl_secs: 0,
                enabled: true,
            },
        );

        for i in 0..20 {
            let value = json!("y".repeat(20 + i));
            cache.set(&format!("key-{i}"), &value).unwrap();

            let stats = cache.stats().unwrap();
            assert!(
                stats.total_size <= stats.max_size,
                "size bound violated after set #{i}: {} > {}",
                stats.total_size,
                stats.max_size
            );
        }
    }

    #[test]
    fn test_get_does_not_refresh_eviction_order() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(
            &temp_dir,
            CacheOptions {
                max_size: 130,
                ttl_secs: 0,
                enabled: true,
            },
        );

        let sixty_bytes = json!("x".repeat(58));
        cache.set("a", &sixty_bytes).unwrap();
        cache.set("b", &sixty_bytes).unwrap();

        // Touching "a" must not save it: eviction order is insertion order.
        assert!(cache.get("a").unwrap().is_some());
        cache.set("c", &sixty_bytes).unwrap();

        assert!(cache.get("a").unwrap().is_none());
        assert!(cache.get("b").unwrap().is_some());
        assert!(cache.get("c").unwrap().is_some());
    }

    #[test]
    fn test_expired_entry_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(
            &temp_dir,
            CacheOptions {
                max_size: 1024,
                ttl_secs: 60,
                enabled: true,
            },
        );

        cache.set("k1", &json!("value")).unwrap();
        backdate(&cache, "k1", 61);

        assert!(cache.get("k1").unwrap().is_none());
        assert_eq!(cache.stats().unwrap().entry_count, 0);
    }

    #[test]
    fn test_ttl_zero_never_expires() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(
            &temp_dir,
            CacheOptions {
                max_size: 1024,
                ttl_secs: 0,
                enabled: true,
            },
        );

        cache.set("k1", &json!("value")).unwrap();
        backdate(&cache, "k1", 10 * 365 * 24 * 60 * 60);

        assert!(cache.get("k1").unwrap().is_some());
    }

    #[test]
    fn test_set_sweeps_expired_entries() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(
            &temp_dir,
            CacheOptions {
                max_size: 1024,
                ttl_secs: 60,
                enabled: true,
            },
        );

        cache.set("old", &json!("value")).unwrap();
        backdate(&cache, "old", 120);

        cache.set("new", &json!("value")).unwrap();

        let stats = cache.stats().unwrap();
        assert_eq!(stats.entry_count, 1);
    }

    #[test]
    fn test_corrupt_entry_treated_as_miss_and_removed() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(&temp_dir, CacheOptions::default());

        cache.set("k1", &json!("value")).unwrap();
        {
            let conn = cache.conn.lock().unwrap();
            conn.execute(
                "UPDATE entries SET value = '{not json' WHERE key = 'k1'",
                [],
            )
            .unwrap();
        }

        assert!(cache.get("k1").unwrap().is_none());
        assert_eq!(cache.stats().unwrap().entry_count, 0);
    }

    #[test]
    fn test_disable_gates_reads_and_writes() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(&temp_dir, CacheOptions::default());

        cache.set("k1", &json!("value")).unwrap();
        cache.disable();

        assert!(cache.get("k1").unwrap().is_none());
        cache.set("k2", &json!("ignored")).unwrap();

        cache.enable();
        // The stored entry survived the disabled window; the write did not happen.
        assert!(cache.get("k1").unwrap().is_some());
        assert!(cache.get("k2").unwrap().is_none());
    }

    #[test]
    fn test_clear_removes_everything() {
        let temp_dir = TempDir::new().unwrap();
        let cache = open_cache(&temp_dir, CacheOptions::default());

        cache.set("k1", &json!("one")).unwrap();
        cache.set("k2", &json!("two")).unwrap();
        cache.clear().unwrap();

        let stats = cache.stats().unwrap();
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.total_size, 0);
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("cache.db");

        {
            let cache = TranslationCache::open(db_path.clone(), &CacheOptions::default()).unwrap();
            cache.set("k1", &json!("persisted")).unwrap();
            cache.close().unwrap();
        }

        let cache = TranslationCache::open(db_path, &CacheOptions::default()).unwrap();
        assert_eq!(cache.get("k1").unwrap(), Some(json!("persisted")));
    }
}
