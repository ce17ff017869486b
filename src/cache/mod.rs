mod store;

pub use store::{CacheOptions, CacheStats, TranslationCache, default_db_path};
