//! Turning album names into file names and cover URLs into files.

use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

use crate::{Res, error::AppError, types::CoverTask, warning};

pub const DEFAULT_OUTPUT_DIR: &str = "covers";
pub const COVER_EXTENSION: &str = "jfif";

/// Upper bound for a sanitized name, leaving room for a disambiguating album
/// id and the extension within the usual 255 byte limit.
pub const MAX_NAME_BYTES: usize = 200;

const ILLEGAL_CHARS: &[char] = &['/', '\\', '?', '<', '>', ':', '*', '|', '"'];

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// What to do when a single cover cannot be downloaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report the failure and keep downloading the remaining covers.
    #[default]
    Continue,
    /// Stop at the first failure.
    Abort,
}

/// A cover that could not be written and the reason why.
#[derive(Debug)]
pub struct FailedCover {
    pub task: CoverTask,
    pub error: AppError,
}

/// Outcome of [`download_covers`]: the files written and the covers that failed.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<FailedCover>,
}

impl DownloadReport {
    /// `true` when every cover was written.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Makes `name` usable as a file name on Linux, macOS and Windows.
///
/// Characters that are illegal on one of them and control characters become
/// spaces, whitespace runs collapse into one space, trailing dots and spaces
/// go away and Windows device names get a `_` appended to their stem. Names
/// that end up empty become `untitled`.
///
/// ```text
/// "Rock & Roll: Vol. 2/3"  ->  "Rock & Roll Vol. 2 3"
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if ILLEGAL_CHARS.contains(&c) || c.is_control() {
                ' '
            } else {
                c
            }
        })
        .collect();

    let mut result = replaced.split_whitespace().collect::<Vec<_>>().join(" ");

    if result.len() > MAX_NAME_BYTES {
        let mut end = MAX_NAME_BYTES;
        while !result.is_char_boundary(end) {
            end -= 1;
        }
        result.truncate(end);
    }

    let mut result = result.trim_end_matches(['.', ' ']).to_string();

    let stem_len = result.find('.').unwrap_or(result.len());
    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(&result[..stem_len]))
    {
        result.insert(stem_len, '_');
    }

    if result.is_empty() {
        return "untitled".to_string();
    }
    result
}

/// Assigns every task its own file name, in order.
///
/// The first album keeps the plain sanitized name. Later albums whose name
/// clashes with one already taken (compared case-insensitively, as on macOS
/// and Windows) get their album id appended, so no cover overwrites another
/// one from the same run.
pub fn cover_file_names(tasks: &[CoverTask]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();

    tasks
        .iter()
        .map(|task| {
            let base = sanitize_filename(&task.name);
            let mut stem = base.clone();
            let mut counter = 1;

            while taken.contains(&stem.to_lowercase()) {
                stem = if counter == 1 {
                    format!("{} ({})", base, sanitize_filename(&task.album_id))
                } else {
                    format!("{} ({}) {}", base, sanitize_filename(&task.album_id), counter)
                };
                counter += 1;
            }

            taken.insert(stem.to_lowercase());
            format!("{stem}.{COVER_EXTENSION}")
        })
        .collect()
}

/// Creates the output directory unless it already exists.
pub async fn ensure_output_dir(dir: &Path) -> Res<()> {
    match async_fs::create_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(source) => Err(AppError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Downloads one cover and writes it to `path`, replacing any older file.
pub async fn download_cover(http: &Client, task: &CoverTask, path: &Path) -> Res<()> {
    let fail = |reason: String| AppError::Download {
        name: task.name.clone(),
        url: task.url.clone(),
        reason,
    };

    let response = http
        .get(&task.url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| fail(e.to_string()))?;

    let bytes = response.bytes().await.map_err(|e| fail(e.to_string()))?;

    async_fs::write(path, &bytes)
        .await
        .map_err(|e| fail(format!("cannot write {}: {}", path.display(), e)))
}

/// Downloads every cover into `dir`, one after the other.
///
/// # Errors
///
/// [`AppError::CreateDir`] when `dir` cannot be created. With
/// [`FailurePolicy::Abort`] the first failed download is returned as well;
/// with [`FailurePolicy::Continue`] failures end up in the report instead.
pub async fn download_covers(
    http: &Client,
    tasks: &[CoverTask],
    dir: &Path,
    policy: FailurePolicy,
) -> Res<DownloadReport> {
    ensure_output_dir(dir).await?;

    let pb = ProgressBar::new(tasks.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }

    let mut report = DownloadReport::default();

    for (task, file_name) in tasks.iter().zip(cover_file_names(tasks)) {
        pb.set_message(task.name.clone());
        let path = dir.join(file_name);

        match download_cover(http, task, &path).await {
            Ok(()) => report.written.push(path),
            Err(error) => {
                if policy == FailurePolicy::Abort {
                    pb.finish_and_clear();
                    return Err(error);
                }
                pb.suspend(|| warning!("{}", error));
                report.failed.push(FailedCover {
                    task: task.clone(),
                    error,
                });
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(report)
}
