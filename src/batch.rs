// Batch checking of text files. Inputs are explicit paths (directories expand
// to their *.txt files); each file is checked against one shared index
// snapshot with bounded concurrency, and its matches are written to a marks
// file next to the source. Already-checked files are skipped unless the run
// overwrites.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::term_index::{Lang, TermIndex};
use crate::text_checker::{check_text, PhraseMatch};

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub lang: Lang,
    /// Rewrite marks files even when they already exist.
    pub overwrite: bool,
    /// Abort on first error instead of recording it per file.
    pub fail_fast: bool,
    /// Concurrent file checks.
    pub concurrency: usize,
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            lang: Lang::De,
            overwrite: false,
            fail_fast: false,
            concurrency: 8,
            show_progress: true,
        }
    }
}

/// Per-file outcome of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCheckStats {
    /// Source file path as given.
    pub path: String,
    /// Characters analyzed.
    pub chars_checked: u64,
    /// Final matches after overlap resolution.
    pub matches_found: u64,
    /// Wall time for read + check + write.
    pub duration_ms: u64,
    /// success, skipped or failed.
    pub status: String,
    pub error: Option<String>,
}

/// Whole-run summary written to the stats file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub files_total: u64,
    pub files_checked: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub total_chars: u64,
    pub total_matches: u64,
    pub duration_ms: u64,
    pub files: Vec<FileCheckStats>,
}

/// Marks file path for a source file: `<stem>_marks.json` in the same
/// directory.
pub fn marks_file_path(source_path: &Path) -> PathBuf {
    let mut marks_path = source_path.to_path_buf();
    let file_stem = marks_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    marks_path.set_file_name(format!("{file_stem}_marks.json"));
    marks_path
}

/// Check whether a source file already has a marks file.
pub fn marks_file_exists<P: AsRef<Path>>(source_path: P) -> bool {
    marks_file_path(source_path.as_ref()).exists()
}

/// Write resolved matches for one source file.
pub async fn write_marks_file(source_path: &Path, matches: &[PhraseMatch]) -> Result<PathBuf> {
    let marks_path = marks_file_path(source_path);
    let payload = serde_json::to_vec_pretty(matches)?;
    tokio::fs::write(&marks_path, payload)
        .await
        .with_context(|| format!("Failed to write marks file {}", marks_path.display()))?;
    Ok(marks_path)
}

/// Expand input paths: files pass through, directories contribute their
/// `*.txt` files (non-recursive), sorted for a deterministic run order.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let pattern = input.join("*.txt");
            let pattern = pattern
                .to_str()
                .with_context(|| format!("Non-UTF-8 path: {}", input.display()))?;
            let mut found = 0;
            for entry in glob::glob(pattern)? {
                paths.push(entry?);
                found += 1;
            }
            debug!("Expanded {} to {} text files", input.display(), found);
            if found == 0 {
                warn!("No *.txt files found under {}", input.display());
            }
        } else {
            paths.push(input.clone());
        }
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

/// Check a set of files against one index snapshot with bounded concurrency.
pub async fn check_files(
    paths: &[PathBuf],
    index: Arc<TermIndex>,
    config: &BatchConfig,
) -> Result<RunStats> {
    let run_start = std::time::Instant::now();
    info!(
        "Starting batch check of {} files ({} concurrent)",
        paths.len(),
        config.concurrency
    );

    let progress = if config.show_progress {
        let bar = ProgressBar::new(paths.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                .expect("static progress template"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut file_stats = Vec::with_capacity(paths.len());
    let mut results = stream::iter(paths.iter().cloned())
        .map(|path| {
            let index = Arc::clone(&index);
            async move { check_one_file(&path, &index, config).await }
        })
        .buffer_unordered(config.concurrency.max(1));

    while let Some(stats) = results.next().await {
        progress.inc(1);
        if let Some(ref error) = stats.error {
            warn!("Check failed for {}: {}", stats.path, error);
            if config.fail_fast {
                progress.abandon();
                anyhow::bail!("Aborting after failure on {}: {}", stats.path, error);
            }
        }
        file_stats.push(stats);
    }
    progress.finish_and_clear();

    // Deterministic stats order regardless of completion order.
    file_stats.sort_by(|a, b| a.path.cmp(&b.path));

    let stats = RunStats {
        files_total: file_stats.len() as u64,
        files_checked: count_status(&file_stats, "success"),
        files_skipped: count_status(&file_stats, "skipped"),
        files_failed: count_status(&file_stats, "failed"),
        total_chars: file_stats.iter().map(|s| s.chars_checked).sum(),
        total_matches: file_stats.iter().map(|s| s.matches_found).sum(),
        duration_ms: run_start.elapsed().as_millis() as u64,
        files: file_stats,
    };
    info!(
        "Batch check completed: {} checked, {} skipped, {} failed",
        stats.files_checked, stats.files_skipped, stats.files_failed
    );
    Ok(stats)
}

async fn check_one_file(path: &Path, index: &TermIndex, config: &BatchConfig) -> FileCheckStats {
    let file_start = std::time::Instant::now();
    let display_path = path.display().to_string();

    if !config.overwrite && marks_file_exists(path) {
        debug!("Skipping {}: marks file already exists", display_path);
        return FileCheckStats {
            path: display_path,
            chars_checked: 0,
            matches_found: 0,
            duration_ms: 0,
            status: "skipped".to_string(),
            error: None,
        };
    }

    let outcome = async {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let matches = check_text(&text, config.lang, index);
        write_marks_file(path, &matches).await?;
        Ok::<_, anyhow::Error>((text.chars().count() as u64, matches.len() as u64))
    }
    .await;

    match outcome {
        Ok((chars_checked, matches_found)) => FileCheckStats {
            path: display_path,
            chars_checked,
            matches_found,
            duration_ms: file_start.elapsed().as_millis() as u64,
            status: "success".to_string(),
            error: None,
        },
        Err(error) => FileCheckStats {
            path: display_path,
            chars_checked: 0,
            matches_found: 0,
            duration_ms: file_start.elapsed().as_millis() as u64,
            status: "failed".to_string(),
            error: Some(error.to_string()),
        },
    }
}

fn count_status(stats: &[FileCheckStats], status: &str) -> u64 {
    stats.iter().filter(|s| s.status == status).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_file_path() {
        let path = marks_file_path(Path::new("texts/essay.txt"));
        assert!(path.to_string_lossy().ends_with("essay_marks.json"));
        assert_eq!(path.parent(), Path::new("texts/essay.txt").parent());
    }

    #[test]
    fn test_marks_file_path_without_extension() {
        let path = marks_file_path(Path::new("essay"));
        assert!(path.to_string_lossy().ends_with("essay_marks.json"));
    }
}
