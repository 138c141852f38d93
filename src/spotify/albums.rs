use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

use crate::{
    Res,
    config::Config,
    error::AppError,
    types::{AccessToken, CoverTask, SavedAlbum, SavedAlbumsPage},
    warning,
};

/// Page size used when nothing else is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Largest `limit` the saved albums endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Retrieves one page of the user's saved albums.
///
/// Issues `GET {api_url}/me/albums?limit=..&offset=..&market=..` with the
/// access token as bearer credential.
///
/// # Errors
///
/// Network failures, non-success statuses and unparsable bodies all surface
/// as [`AppError::PageFetch`] carrying the requested `offset`.
pub async fn fetch_albums(
    http: &Client,
    config: &Config,
    token: &AccessToken,
    offset: u32,
    limit: u32,
) -> Res<SavedAlbumsPage> {
    let api_url = format!("{uri}/me/albums", uri = config.api_url);
    let page_error = |source| AppError::PageFetch { offset, source };

    let response = http
        .get(&api_url)
        .bearer_auth(token.as_str())
        .query(&[
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
            ("market", config.market.clone()),
        ])
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(page_error)?;

    response.json::<SavedAlbumsPage>().await.map_err(page_error)
}

/// Collects a [`CoverTask`] for every saved album, in library order.
///
/// Starts at offset 0 and advances by the number of items each page actually
/// returned until `total` is reached, so a last partial page is fetched as
/// well (`total = 25`, `limit = 10` reads offsets 0, 10 and 20). An empty page
/// ends the walk early in case the library shrinks while it runs.
///
/// Albums without artwork are skipped with a warning.
///
/// # Errors
///
/// The first failing page aborts the whole walk; nothing collected so far is
/// returned.
pub async fn get_album_covers(
    http: &Client,
    config: &Config,
    token: &AccessToken,
    page_size: u32,
) -> Res<Vec<CoverTask>> {
    let limit = page_size.clamp(1, MAX_PAGE_SIZE);

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching saved albums...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let mut covers: Vec<CoverTask> = Vec::new();
    let mut offset: u32 = 0;

    loop {
        let page = match fetch_albums(http, config, token, offset, limit).await {
            Ok(page) => page,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        let fetched = page.items.len() as u32;
        covers.extend(page.items.into_iter().filter_map(cover_task));
        offset += fetched;
        pb.set_message(format!("Fetching saved albums... {}/{}", offset, page.total));

        if fetched == 0 || offset >= page.total {
            break;
        }
    }

    pb.finish_and_clear();
    Ok(covers)
}

/// Picks the first (largest) image of a saved album.
pub fn cover_task(item: SavedAlbum) -> Option<CoverTask> {
    let album = item.album;
    match album.images.into_iter().next() {
        Some(image) => Some(CoverTask {
            album_id: album.id,
            name: album.name,
            url: image.url,
        }),
        None => {
            warning!("Album \"{}\" has no cover image, skipping.", album.name);
            None
        }
    }
}
