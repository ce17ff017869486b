//! Output path derivation for batch translations.

use std::path::{Path, PathBuf};

/// Template used when the user supplies no `--output-template`.
///
/// Placeholders: `{name}` (source file stem), `{lang}` (target language
/// code), `{ext}` (source extension).
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "{name}.{lang}.{ext}";

/// Renders the output file name for one source file.
pub fn render_file_name(source: &Path, target_lang: &str, template: &str) -> String {
    let name = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    template
        .replace("{name}", &name)
        .replace("{lang}", target_lang)
        .replace("{ext}", &ext)
}

/// Computes the full output path for one source file.
///
/// With an output directory, the file lands there; if `base_dir` is given
/// (directory mode), the source's subdirectory structure relative to it is
/// mirrored beneath the output directory. Without an output directory the
/// translated file sits next to its source.
pub fn output_path(
    source: &Path,
    target_lang: &str,
    template: &str,
    output_dir: Option<&Path>,
    base_dir: Option<&Path>,
) -> PathBuf {
    let file_name = render_file_name(source, target_lang, template);

    match output_dir {
        Some(dir) => {
            let subdir = base_dir
                .and_then(|base| source.strip_prefix(base).ok())
                .and_then(Path::parent)
                .filter(|parent| !parent.as_os_str().is_empty());

            match subdir {
                Some(parent) => dir.join(parent).join(file_name),
                None => dir.join(file_name),
            }
        }
        None => source
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(file_name),
    }
}
