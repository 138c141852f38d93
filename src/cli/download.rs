use std::path::PathBuf;

use reqwest::Client;
use tabled::Table;

use crate::{
    Res,
    browser::BrowserLauncher,
    config::Config,
    covers::{self, DEFAULT_OUTPUT_DIR, DownloadReport, FailurePolicy},
    info,
    spotify::{self, albums::DEFAULT_PAGE_SIZE},
    success,
    types::FailedCoverRow,
    warning,
};

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub output_dir: PathBuf,
    pub page_size: u32,
    pub failure_policy: FailurePolicy,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            page_size: DEFAULT_PAGE_SIZE,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// One complete run: log in, list the library, download every cover.
///
/// Stages run strictly in sequence and the first unrecoverable error ends the
/// run. Covers already written when a later stage fails stay on disk.
pub async fn download(
    config: &Config,
    launcher: &dyn BrowserLauncher,
    options: &DownloadOptions,
) -> Res<DownloadReport> {
    let http = Client::new();

    let token = spotify::auth::authorize(&http, config, launcher).await?;

    let covers = spotify::albums::get_album_covers(&http, config, &token, options.page_size).await?;
    info!("Found {} albums with cover art.", covers.len());

    let report = covers::download_covers(
        &http,
        &covers,
        &options.output_dir,
        options.failure_policy,
    )
    .await?;

    if report.is_complete() {
        success!(
            "Album covers downloaded successfully ({} files in {}).",
            report.written.len(),
            options.output_dir.display()
        );
    } else {
        warning!(
            "Downloaded {} covers, {} failed:",
            report.written.len(),
            report.failed.len()
        );
        let rows: Vec<FailedCoverRow> = report
            .failed
            .iter()
            .map(|f| FailedCoverRow {
                album: f.task.name.clone(),
                url: f.task.url.clone(),
                error: f.error.to_string(),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    Ok(report)
}
