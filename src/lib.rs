//! # lingo - Resilient Translation CLI
//!
//! `lingo` is a command-line client for a remote text-translation service.
//! It wraps the service's HTTP API in a resilience layer: failed calls are
//! classified and retried with backoff where that makes sense, successful
//! translations land in a persistent size-bounded cache, and whole
//! directories of files can be translated with bounded concurrency.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate a file
//! lingo ./notes.md --to de
//!
//! # Translate from stdin
//! cat report.md | lingo --to ja
//!
//! # Fan out to several languages
//! lingo --to de,fr,ja ./notes.md
//!
//! # Translate a directory, five files at a time
//! lingo batch --dir ./docs --to de --recursive
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/lingo/config.toml`:
//!
//! ```toml
//! [api]
//! endpoint = "https://api.example.com"
//! api_key_env = "LINGO_API_KEY"
//!
//! [defaults]
//! to = "de"
//!
//! [cache]
//! max_size_bytes = 104857600
//! ttl_secs = 2592000
//!
//! [batch]
//! concurrency = 5
//! ```

/// Remote service client: typed errors, retry/backoff, payloads.
pub mod api;

/// Bounded-concurrency batch translation of files.
pub mod batch;

/// Persistent translation cache backed by `SQLite`.
pub mod cache;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management.
pub mod config;

/// File system utilities.
pub mod fs;

/// Input reading from files and stdin.
pub mod input;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration and cache.
pub mod paths;

/// Cache-aware translation orchestration and request parameters.
pub mod translation;

/// Terminal UI components (spinner, progress, colors).
pub mod ui;
