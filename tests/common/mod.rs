#![allow(dead_code)]

use std::{
    net::{SocketAddr, TcpListener},
    sync::{Arc, Mutex},
};

use albumcovers::{browser::BrowserLauncher, config::Config};
use reqwest::Url;
use serde_json::{Value, json};
use wiremock::MockServer;

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";

/// Asks the OS for a port nobody listens on right now.
pub fn free_local_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Config pointing every Spotify endpoint at `mock`, with the callback server
/// on a free local port.
pub fn test_config(mock: &MockServer) -> Config {
    let server_addr = free_local_addr();
    Config {
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        server_addr,
        redirect_uri: format!("http://{}", server_addr),
        auth_url: format!("{}/authorize", mock.uri()),
        token_url: format!("{}/api/token", mock.uri()),
        api_url: format!("{}/v1", mock.uri()),
        scope: "user-library-read".to_string(),
        market: "GB".to_string(),
    }
}

/// A saved album entry; `image` of `None` yields an album without artwork.
pub fn saved_album(id: &str, name: &str, image: Option<&str>) -> Value {
    let images = match image {
        Some(url) => json!([
            { "url": url, "height": 640, "width": 640 },
            { "url": format!("{url}-small"), "height": 64, "width": 64 }
        ]),
        None => json!([]),
    };

    json!({
        "added_at": "2023-10-17T12:00:00Z",
        "album": {
            "album_type": "album",
            "total_tracks": 10,
            "available_markets": ["GB"],
            "external_urls": { "spotify": format!("https://open.spotify.com/album/{id}") },
            "href": format!("https://api.spotify.com/v1/albums/{id}"),
            "id": id,
            "images": images,
            "name": name,
            "release_date": "1999-01-01",
            "release_date_precision": "day",
            "type": "album",
            "uri": format!("spotify:album:{id}"),
            "copyrights": [{ "text": "(C) 1999", "type": "C" }],
            "external_ids": { "upc": "123456789" },
            "genres": [],
            "label": "Label",
            "popularity": 42,
            "artists": [{
                "external_urls": { "spotify": "https://open.spotify.com/artist/a1" },
                "href": "https://api.spotify.com/v1/artists/a1",
                "id": "a1",
                "name": "Artist",
                "type": "artist",
                "uri": "spotify:artist:a1"
            }],
            "tracks": {
                "href": format!("https://api.spotify.com/v1/albums/{id}/tracks"),
                "limit": 50,
                "next": null,
                "offset": 0,
                "previous": null,
                "total": 0,
                "items": []
            }
        }
    })
}

pub fn album_page(items: Vec<Value>, total: u32, limit: u32, offset: u32) -> Value {
    json!({
        "href": format!("https://api.spotify.com/v1/me/albums?offset={offset}&limit={limit}"),
        "limit": limit,
        "next": null,
        "offset": offset,
        "previous": null,
        "total": total,
        "items": items
    })
}

/// Plays the part of the user's browser.
///
/// On `open` it reads the redirect URI and state from the consent URL and
/// fires the given query strings at the callback server, in order, the way a
/// browser would after Spotify redirected it. `{state}` in a query is replaced
/// with the real state value.
#[derive(Clone, Default)]
pub struct FakeBrowser {
    queries: Vec<String>,
    pub opened: Arc<Mutex<Vec<String>>>,
}

impl FakeBrowser {
    pub fn new(queries: &[&str]) -> Self {
        Self {
            queries: queries.iter().map(|q| q.to_string()).collect(),
            opened: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Grants access with `code` after a favicon probe.
    pub fn granting(code: &str) -> Self {
        Self::new(&["/favicon.ico", &format!("/?code={code}&state={{state}}")])
    }
}

impl BrowserLauncher for FakeBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());

        let url = Url::parse(url).unwrap();
        let param = |key: &str| {
            url.query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
                .unwrap()
        };
        let redirect_uri = param("redirect_uri");
        let state = param("state");

        let requests: Vec<String> = self
            .queries
            .iter()
            .map(|q| format!("{}{}", redirect_uri, q.replace("{state}", &state)))
            .collect();

        tokio::spawn(async move {
            let client = reqwest::Client::new();
            for request in requests {
                let _ = client.get(&request).send().await;
            }
        });

        Ok(())
    }
}

/// Form fields of a recorded `application/x-www-form-urlencoded` body.
pub fn form_fields(body: &[u8]) -> Vec<(String, String)> {
    let body = String::from_utf8_lossy(body);
    Url::parse(&format!("http://form.local/?{body}"))
        .unwrap()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
