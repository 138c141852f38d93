mod common;

use albumcovers::{
    error::{AppError, EXIT_NETWORK},
    spotify::albums::{cover_task, fetch_albums, get_album_covers},
    types::{AccessToken, SavedAlbum},
};
use common::{album_page, saved_album, test_config};
use reqwest::Client;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves a library of `total` albums named `Album 0..total`, honouring the
/// `offset` and `limit` query parameters of every request.
async fn mount_library(mock: &MockServer, total: u32, limit: u32) {
    let mut offset = 0;
    loop {
        let items = (offset..(offset + limit).min(total))
            .map(|i| {
                saved_album(
                    &format!("id{i}"),
                    &format!("Album {i}"),
                    Some(&format!("https://i.scdn.co/image/{i}")),
                )
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/v1/me/albums"))
            .and(query_param("offset", offset.to_string()))
            .and(query_param("limit", limit.to_string()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(album_page(items, total, limit, offset)),
            )
            .mount(mock)
            .await;

        offset += limit;
        if offset >= total {
            break;
        }
    }
}

async fn requested_offsets(mock: &MockServer) -> Vec<String> {
    mock.received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/v1/me/albums")
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "offset")
                .map(|(_, v)| v.into_owned())
        })
        .collect()
}

#[tokio::test]
async fn test_fetch_albums_sends_paging_market_and_bearer() {
    let mock = MockServer::start().await;
    let config = test_config(&mock);

    Mock::given(method("GET"))
        .and(path("/v1/me/albums"))
        .and(query_param("limit", "5"))
        .and(query_param("offset", "15"))
        .and(query_param("market", "GB"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(album_page(
            vec![saved_album("a", "A", Some("https://img/a"))],
            16,
            5,
            15,
        )))
        .expect(1)
        .mount(&mock)
        .await;

    let page = fetch_albums(&Client::new(), &config, &AccessToken::new("token-1"), 15, 5)
        .await
        .unwrap();

    assert_eq!(page.total, 16);
    assert_eq!(page.offset, 15);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].album.name, "A");
    assert_eq!(page.items[0].album.images[0].height, Some(640));
}

#[tokio::test]
async fn test_pagination_includes_remainder_page() {
    // 25 albums in pages of 10: the last page only holds 5.
    let mock = MockServer::start().await;
    let config = test_config(&mock);
    mount_library(&mock, 25, 10).await;

    let covers = get_album_covers(&Client::new(), &config, &AccessToken::new("t"), 10)
        .await
        .unwrap();

    assert_eq!(requested_offsets(&mock).await, vec!["0", "10", "20"]);
    assert_eq!(covers.len(), 25);
    for (i, cover) in covers.iter().enumerate() {
        assert_eq!(cover.name, format!("Album {i}"));
        assert_eq!(cover.album_id, format!("id{i}"));
        assert_eq!(cover.url, format!("https://i.scdn.co/image/{i}"));
    }
}

#[tokio::test]
async fn test_pagination_exact_multiple_does_not_overfetch() {
    let mock = MockServer::start().await;
    let config = test_config(&mock);
    mount_library(&mock, 20, 10).await;

    let covers = get_album_covers(&Client::new(), &config, &AccessToken::new("t"), 10)
        .await
        .unwrap();

    assert_eq!(requested_offsets(&mock).await, vec!["0", "10"]);
    assert_eq!(covers.len(), 20);
}

#[tokio::test]
async fn test_pagination_for_various_sizes() {
    for (total, limit) in [(1, 10), (3, 2), (9, 3), (11, 5), (50, 50), (51, 50)] {
        let mock = MockServer::start().await;
        let config = test_config(&mock);
        mount_library(&mock, total, limit).await;

        let covers = get_album_covers(&Client::new(), &config, &AccessToken::new("t"), limit)
            .await
            .unwrap();

        let names: Vec<String> = covers.into_iter().map(|c| c.name).collect();
        let expected: Vec<String> = (0..total).map(|i| format!("Album {i}")).collect();
        assert_eq!(names, expected, "total={total} limit={limit}");

        let pages = requested_offsets(&mock).await.len() as u32;
        assert_eq!(pages, total.div_ceil(limit), "total={total} limit={limit}");
    }
}

#[tokio::test]
async fn test_empty_library_makes_one_request() {
    let mock = MockServer::start().await;
    let config = test_config(&mock);

    Mock::given(method("GET"))
        .and(path("/v1/me/albums"))
        .respond_with(ResponseTemplate::new(200).set_body_json(album_page(vec![], 0, 10, 0)))
        .expect(1)
        .mount(&mock)
        .await;

    let covers = get_album_covers(&Client::new(), &config, &AccessToken::new("t"), 10)
        .await
        .unwrap();
    assert!(covers.is_empty());
}

#[tokio::test]
async fn test_shrinking_library_stops_on_empty_page() {
    let mock = MockServer::start().await;
    let config = test_config(&mock);

    Mock::given(method("GET"))
        .and(path("/v1/me/albums"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(album_page(
            vec![
                saved_album("a", "A", Some("https://img/a")),
                saved_album("b", "B", Some("https://img/b")),
            ],
            6,
            2,
            0,
        )))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/albums"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(album_page(vec![], 6, 2, 2)))
        .expect(1)
        .mount(&mock)
        .await;

    let covers = get_album_covers(&Client::new(), &config, &AccessToken::new("t"), 2)
        .await
        .unwrap();
    assert_eq!(covers.len(), 2);
    assert_eq!(requested_offsets(&mock).await, vec!["0", "2"]);
}

#[tokio::test]
async fn test_failed_page_aborts_the_walk() {
    let mock = MockServer::start().await;
    let config = test_config(&mock);

    Mock::given(method("GET"))
        .and(path("/v1/me/albums"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(album_page(
            vec![
                saved_album("a", "A", Some("https://img/a")),
                saved_album("b", "B", Some("https://img/b")),
            ],
            5,
            2,
            0,
        )))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/albums"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock)
        .await;

    let err = get_album_covers(&Client::new(), &config, &AccessToken::new("t"), 2)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::PageFetch { offset: 2, .. }));
    assert_eq!(err.exit_code(), EXIT_NETWORK);
    assert_eq!(requested_offsets(&mock).await, vec!["0", "2"]);
}

#[tokio::test]
async fn test_page_size_is_clamped_to_api_maximum() {
    let mock = MockServer::start().await;
    let config = test_config(&mock);

    Mock::given(method("GET"))
        .and(path("/v1/me/albums"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(album_page(vec![], 0, 50, 0)))
        .expect(1)
        .mount(&mock)
        .await;

    get_album_covers(&Client::new(), &config, &AccessToken::new("t"), 500)
        .await
        .unwrap();
}

#[test]
fn test_cover_task_takes_first_image() {
    let item: SavedAlbum =
        serde_json::from_value(saved_album("id1", "Blue", Some("https://img/blue"))).unwrap();

    let task = cover_task(item).unwrap();
    assert_eq!(task.album_id, "id1");
    assert_eq!(task.name, "Blue");
    assert_eq!(task.url, "https://img/blue");
}

#[test]
fn test_cover_task_skips_album_without_images() {
    let item: SavedAlbum = serde_json::from_value(saved_album("id1", "Blank", None)).unwrap();
    assert!(cover_task(item).is_none());
}

#[test]
fn test_saved_album_accepts_minimal_json() {
    let item: SavedAlbum = serde_json::from_value(serde_json::json!({
        "album": { "id": "x", "name": "Minimal", "images": [{ "url": "https://img/x" }] }
    }))
    .unwrap();

    assert_eq!(item.album.name, "Minimal");
    assert_eq!(item.album.images[0].width, None);
    assert!(item.album.tracks.is_none());
}
