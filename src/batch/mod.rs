mod coordinator;
mod output;

pub use coordinator::{
    BatchCoordinator, BatchOptions, BatchResult, BatchStats, FailedFile, MAX_CONCURRENCY,
    Progress, ProgressFn, SUPPORTED_EXTENSIONS, SkippedFile, TranslatedFile,
};
pub use output::{DEFAULT_OUTPUT_TEMPLATE, output_path, render_file_name};
