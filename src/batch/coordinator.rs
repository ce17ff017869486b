//! Bounded-concurrency batch translation of files.
//!
//! The coordinator resolves an input set (explicit paths or a directory
//! scan), skips unsupported file types up front, and drives the remaining
//! files through the translator with at most N units in flight. Every file
//! reaches exactly one terminal state; one file's failure never aborts the
//! batch.

use anyhow::{Context, Result, bail};
use futures_util::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

use crate::fs::{atomic_write, wildcard_match};
use crate::translation::{TextTranslator, TranslationParams};

use super::output::{DEFAULT_OUTPUT_TEMPLATE, output_path};

/// File extensions the batch pipeline will read as plain text.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "html", "htm", "xml", "srt"];

/// Hard ceiling on the concurrency knob.
pub const MAX_CONCURRENCY: usize = 100;

/// Batch behavior knobs, merged from CLI flags and the config file.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum number of files translated simultaneously (1..=100).
    pub concurrency: usize,
    /// Descend into subdirectories when scanning a directory.
    pub recursive: bool,
    /// Wildcard filter (`*`/`?`) applied to file names during a scan.
    pub pattern: Option<String>,
    /// Directory translated files are written into; next to the source
    /// file when absent.
    pub output_dir: Option<PathBuf>,
    /// Output file-name template; `{name}.{lang}.{ext}` when absent.
    pub output_template: Option<String>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: 5,
            recursive: false,
            pattern: None,
            output_dir: None,
            output_template: None,
        }
    }
}

/// A file translated and written successfully.
#[derive(Debug, Clone)]
pub struct TranslatedFile {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
}

/// A file whose translation or I/O failed.
#[derive(Debug, Clone)]
pub struct FailedFile {
    pub source_path: PathBuf,
    pub error: String,
}

/// A file rejected before translation started.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub source_path: PathBuf,
    pub reason: String,
}

/// Terminal outcomes of a batch run, one entry per input file.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub successful: Vec<TranslatedFile>,
    pub failed: Vec<FailedFile>,
    pub skipped: Vec<SkippedFile>,
}

/// Counts derived from a [`BatchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchResult {
    /// Pure view over the three outcome lists.
    pub fn statistics(&self) -> BatchStats {
        BatchStats {
            total: self.successful.len() + self.failed.len() + self.skipped.len(),
            successful: self.successful.len(),
            failed: self.failed.len(),
            skipped: self.skipped.len(),
        }
    }
}

/// Progress snapshot passed to the batch progress callback.
///
/// `completed` counts terminal successes and failures (skips are reported
/// up front, not through progress) and increases monotonically to `total`.
#[derive(Debug, Clone)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub current: Option<String>,
}

/// Callback invoked after each file reaches a terminal state.
pub type ProgressFn = Arc<dyn Fn(Progress) + Send + Sync>;

pub struct BatchCoordinator {
    translator: Arc<dyn TextTranslator>,
    options: BatchOptions,
}

impl BatchCoordinator {
    /// Creates a coordinator.
    ///
    /// # Errors
    ///
    /// Fails if `options.concurrency` is outside `1..=100`.
    pub fn new(translator: Arc<dyn TextTranslator>, options: BatchOptions) -> Result<Self> {
        if options.concurrency < 1 || options.concurrency > MAX_CONCURRENCY {
            bail!(
                "Concurrency must be between 1 and {MAX_CONCURRENCY}, got {}",
                options.concurrency
            );
        }

        Ok(Self {
            translator,
            options,
        })
    }

    /// Translates an explicit list of files.
    pub async fn translate_files(
        &self,
        paths: &[PathBuf],
        params: &TranslationParams,
        on_progress: Option<ProgressFn>,
    ) -> Result<BatchResult> {
        self.run(paths.to_vec(), params, None, on_progress).await
    }

    /// Translates every matching file under `dir`.
    ///
    /// # Errors
    ///
    /// Fails before any translation if `dir` does not exist or is not a
    /// directory.
    pub async fn translate_directory(
        &self,
        dir: &Path,
        params: &TranslationParams,
        on_progress: Option<ProgressFn>,
    ) -> Result<BatchResult> {
        if !dir.exists() {
            bail!("Directory not found: {}", dir.display());
        }
        if !dir.is_dir() {
            bail!("Not a directory: {}", dir.display());
        }

        let files = scan_directory(dir, self.options.recursive, self.options.pattern.as_deref())?;
        self.run(files, params, Some(dir), on_progress).await
    }

    async fn run(
        &self,
        paths: Vec<PathBuf>,
        params: &TranslationParams,
        base_dir: Option<&Path>,
        on_progress: Option<ProgressFn>,
    ) -> Result<BatchResult> {
        if paths.is_empty() {
            return Ok(BatchResult::default());
        }

        // Unsupported files are terminal immediately: no concurrency slot,
        // no progress callback.
        let mut result = BatchResult::default();
        let mut supported = Vec::new();
        for path in paths {
            if is_supported(&path) {
                supported.push(path);
            } else {
                result.skipped.push(SkippedFile {
                    source_path: path,
                    reason: "Unsupported file type".to_string(),
                });
            }
        }

        let template = self
            .options
            .output_template
            .as_deref()
            .unwrap_or(DEFAULT_OUTPUT_TEMPLATE);
        let units: Vec<(PathBuf, PathBuf)> = supported
            .into_iter()
            .map(|source| {
                let output = output_path(
                    &source,
                    &params.target_lang,
                    template,
                    self.options.output_dir.as_deref(),
                    base_dir,
                );
                (source, output)
            })
            .collect();

        let total = units.len();
        let completed = Arc::new(AtomicUsize::new(0));
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency));

        let futures = units.into_iter().map(|(source, output)| {
            let semaphore = Arc::clone(&semaphore);
            let completed = Arc::clone(&completed);
            let on_progress = on_progress.clone();

            async move {
                let outcome = {
                    // The semaphore is never closed, so acquire cannot fail.
                    #[allow(clippy::expect_used)]
                    let _permit = semaphore.acquire().await.expect("semaphore closed");
                    self.translate_one(&source, &output, params).await
                };

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(callback) = &on_progress {
                    callback(Progress {
                        completed: done,
                        total,
                        current: Some(source.display().to_string()),
                    });
                }

                (source, output, outcome)
            }
        });

        for (source, output, outcome) in join_all(futures).await {
            match outcome {
                Ok(()) => result.successful.push(TranslatedFile {
                    source_path: source,
                    output_path: output,
                }),
                Err(err) => result.failed.push(FailedFile {
                    source_path: source,
                    error: format!("{err:#}"),
                }),
            }
        }

        Ok(result)
    }

    /// One unit: read, translate, write. Steps run strictly in order for
    /// this file; failures are reported, never propagated.
    async fn translate_one(
        &self,
        source: &Path,
        output: &Path,
        params: &TranslationParams,
    ) -> Result<()> {
        let text = tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read file: {}", source.display()))?;

        let translated = self.translator.translate_text(&text, params).await?;

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }

        atomic_write(output, &translated.text)
            .with_context(|| format!("Failed to write output file: {}", output.display()))?;

        Ok(())
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Collects files under `dir`, optionally recursing and filtering names by
/// a wildcard pattern. Results are sorted for deterministic batch order.
fn scan_directory(dir: &Path, recursive: bool, pattern: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        let entries = std::fs::read_dir(&current)
            .with_context(|| format!("Failed to read directory: {}", current.display()))?;

        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read directory: {}", current.display()))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .with_context(|| format!("Failed to stat: {}", path.display()))?;

            if file_type.is_dir() {
                if recursive {
                    stack.push(path);
                }
            } else if file_type.is_file() {
                let matches = pattern.is_none_or(|p| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| wildcard_match(p, name))
                });
                if matches {
                    files.push(path);
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ErrorKind};
    use crate::translation::TranslationResult;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Uppercases input; fails for texts containing "FAIL"; tracks the
    /// peak number of concurrent calls.
    struct MockTranslator {
        delay: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockTranslator {
        fn new() -> Self {
            Self {
                delay: Duration::from_millis(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl TextTranslator for MockTranslator {
        async fn translate_text(
            &self,
            text: &str,
            _params: &TranslationParams,
        ) -> Result<TranslationResult, ApiError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if text.contains("FAIL") {
                return Err(ApiError::new(ErrorKind::ServiceUnavailable, "HTTP 503"));
            }

            Ok(TranslationResult {
                text: text.to_uppercase(),
                detected_source_language: Some("en".to_string()),
                from_cache: false,
            })
        }
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    fn coordinator(options: BatchOptions) -> (BatchCoordinator, Arc<MockTranslator>) {
        let translator = Arc::new(MockTranslator::new());
        let coordinator = BatchCoordinator::new(translator.clone(), options).unwrap();
        (coordinator, translator)
    }

    #[test]
    fn test_concurrency_validation() {
        let translator: Arc<dyn TextTranslator> = Arc::new(MockTranslator::new());

        for invalid in [0, 101, 500] {
            let options = BatchOptions {
                concurrency: invalid,
                ..BatchOptions::default()
            };
            assert!(BatchCoordinator::new(translator.clone(), options).is_err());
        }

        for valid in [1, 50, 100] {
            let options = BatchOptions {
                concurrency: valid,
                ..BatchOptions::default()
            };
            assert!(BatchCoordinator::new(translator.clone(), options).is_ok());
        }
    }

    #[tokio::test]
    async fn test_empty_input_returns_empty_result() {
        let (coordinator, _) = coordinator(BatchOptions::default());
        let params = TranslationParams::new("de");

        let result = coordinator
            .translate_files(&[], &params, None)
            .await
            .unwrap();

        let stats = result.statistics();
        assert_eq!(stats.total, 0);
    }

    #[tokio::test]
    async fn test_partition_skips_unsupported_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let txt = write_file(&temp_dir, "a.txt", "hello");
        let pdf = write_file(&temp_dir, "b.pdf", "binaryish");

        let (coordinator, _) = coordinator(BatchOptions::default());
        let params = TranslationParams::new("de");

        let result = coordinator
            .translate_files(&[txt, pdf.clone()], &params, None)
            .await
            .unwrap();

        assert_eq!(result.successful.len(), 1);
        assert!(result.failed.is_empty());
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].source_path, pdf);
        assert_eq!(result.skipped[0].reason, "Unsupported file type");
    }

    #[tokio::test]
    async fn test_failure_is_isolated_per_file() {
        let temp_dir = TempDir::new().unwrap();
        let good = write_file(&temp_dir, "good.txt", "hello");
        let bad = write_file(&temp_dir, "bad.txt", "FAIL please");
        let missing = temp_dir.path().join("missing.txt");

        let (coordinator, _) = coordinator(BatchOptions::default());
        let params = TranslationParams::new("de");

        let result = coordinator
            .translate_files(&[good, bad.clone(), missing.clone()], &params, None)
            .await
            .unwrap();

        assert_eq!(result.successful.len(), 1);
        assert_eq!(result.failed.len(), 2);

        let failed_sources: Vec<_> = result.failed.iter().map(|f| &f.source_path).collect();
        assert!(failed_sources.contains(&&bad));
        assert!(failed_sources.contains(&&missing));
        assert!(
            result
                .failed
                .iter()
                .any(|f| f.error.contains("service unavailable"))
        );
    }

    #[tokio::test]
    async fn test_concurrency_bound_is_respected() {
        let temp_dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..12)
            .map(|i| write_file(&temp_dir, &format!("file-{i}.txt"), "hello"))
            .collect();

        let translator = Arc::new(MockTranslator::with_delay(Duration::from_millis(20)));
        let options = BatchOptions {
            concurrency: 3,
            ..BatchOptions::default()
        };
        let coordinator = BatchCoordinator::new(translator.clone(), options).unwrap();
        let params = TranslationParams::new("de");

        let result = coordinator
            .translate_files(&paths, &params, None)
            .await
            .unwrap();

        assert_eq!(result.successful.len(), 12);
        let peak = translator.max_in_flight.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency {peak} exceeded bound 3");
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_complete() {
        let temp_dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..5)
            .map(|i| write_file(&temp_dir, &format!("file-{i}.txt"), "hello"))
            .collect();
        let unsupported = write_file(&temp_dir, "note.pdf", "skip me");

        let (coordinator, _) = coordinator(BatchOptions::default());
        let params = TranslationParams::new("de");

        let seen: Arc<Mutex<Vec<Progress>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let on_progress: ProgressFn = Arc::new(move |progress| {
            sink.lock().unwrap().push(progress);
        });

        let mut inputs = paths.clone();
        inputs.push(unsupported);
        coordinator
            .translate_files(&inputs, &params, Some(on_progress))
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        // Skipped files fire no progress callback.
        assert_eq!(seen.len(), 5);
        let completed: Vec<usize> = seen.iter().map(|p| p.completed).collect();
        assert_eq!(completed, vec![1, 2, 3, 4, 5]);
        assert!(seen.iter().all(|p| p.total == 5));
        assert!(seen.iter().all(|p| p.current.is_some()));
    }

    #[tokio::test]
    async fn test_outputs_written_with_translated_content() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_file(&temp_dir, "hello.txt", "hello world");

        let (coordinator, _) = coordinator(BatchOptions::default());
        let params = TranslationParams::new("de");

        let result = coordinator
            .translate_files(&[source], &params, None)
            .await
            .unwrap();

        assert_eq!(result.successful.len(), 1);
        let output = &result.successful[0].output_path;
        assert_eq!(output, &temp_dir.path().join("hello.de.txt"));
        assert_eq!(std::fs::read_to_string(output).unwrap(), "HELLO WORLD");
    }

    #[tokio::test]
    async fn test_directory_not_found_is_fatal() {
        let (coordinator, _) = coordinator(BatchOptions::default());
        let params = TranslationParams::new("de");

        let err = coordinator
            .translate_directory(Path::new("/nonexistent/dir"), &params, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Directory not found"));
    }

    #[tokio::test]
    async fn test_file_path_as_directory_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let file = write_file(&temp_dir, "plain.txt", "hello");

        let (coordinator, _) = coordinator(BatchOptions::default());
        let params = TranslationParams::new("de");

        let err = coordinator
            .translate_directory(&file, &params, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Not a directory"));
    }

    #[tokio::test]
    async fn test_directory_scan_honors_recursive_flag() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir, "top.txt", "hello");
        write_file(&temp_dir, "nested/inner.txt", "hello");

        let params = TranslationParams::new("de");

        let (flat, _) = coordinator(BatchOptions::default());
        let result = flat
            .translate_directory(temp_dir.path(), &params, None)
            .await
            .unwrap();
        assert_eq!(result.successful.len(), 1);

        let (recursive, _) = coordinator(BatchOptions {
            recursive: true,
            ..BatchOptions::default()
        });
        let result = recursive
            .translate_directory(temp_dir.path(), &params, None)
            .await
            .unwrap();
        assert_eq!(result.successful.len(), 2);
    }

    #[tokio::test]
    async fn test_directory_scan_honors_pattern() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir, "chapter-1.md", "hello");
        write_file(&temp_dir, "chapter-2.md", "hello");
        write_file(&temp_dir, "readme.txt", "hello");

        let (coordinator, _) = coordinator(BatchOptions {
            pattern: Some("chapter-*.md".to_string()),
            ..BatchOptions::default()
        });
        let params = TranslationParams::new("de");

        let result = coordinator
            .translate_directory(temp_dir.path(), &params, None)
            .await
            .unwrap();
        assert_eq!(result.successful.len(), 2);
        assert!(result.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_output_dir_mirrors_structure_in_directory_mode() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir, "src/guides/intro.txt", "hello");
        let out_dir = temp_dir.path().join("out");

        let (coordinator, _) = coordinator(BatchOptions {
            recursive: true,
            output_dir: Some(out_dir.clone()),
            ..BatchOptions::default()
        });
        let params = TranslationParams::new("de");

        let result = coordinator
            .translate_directory(&temp_dir.path().join("src"), &params, None)
            .await
            .unwrap();

        assert_eq!(result.successful.len(), 1);
        let expected = out_dir.join("guides/intro.de.txt");
        assert_eq!(result.successful[0].output_path, expected);
        assert_eq!(std::fs::read_to_string(&expected).unwrap(), "HELLO");
    }

    #[tokio::test]
    async fn test_statistics_counts() {
        let temp_dir = TempDir::new().unwrap();
        let good = write_file(&temp_dir, "good.txt", "hello");
        let bad = write_file(&temp_dir, "bad.txt", "FAIL");
        let pdf = write_file(&temp_dir, "doc.pdf", "skip");

        let (coordinator, _) = coordinator(BatchOptions::default());
        let params = TranslationParams::new("de");

        let result = coordinator
            .translate_files(&[good, bad, pdf], &params, None)
            .await
            .unwrap();

        assert_eq!(
            result.statistics(),
            BatchStats {
                total: 3,
                successful: 1,
                failed: 1,
                skipped: 1,
            }
        );
    }
}
