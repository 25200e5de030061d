//! Tests for the Spotify catalog.

use super::types::SearchResponse;
use super::*;
use axum::{extract::Query, http::HeaderMap, http::StatusCode, routing::get, routing::post, Json, Router};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const TRACKS: &str = r#"{
  "tracks": {
    "href": "https://api.spotify.com/v1/search?query=bohemian",
    "items": [
      {
        "name": "Bohemian Rhapsody - Remastered 2011",
        "artists": [{"name": "Queen"}, {"name": "Someone Else"}],
        "album": {
          "name": "A Night At The Opera",
          "release_date": "1975-11-21",
          "images": [
            {"url": "https://i.scdn.co/image/640", "height": 640, "width": 640},
            {"url": "https://i.scdn.co/image/300", "height": 300, "width": 300},
            {"url": "https://i.scdn.co/image/64", "height": 64, "width": 64}
          ],
          "uri": "spotify:album:1GbtB4zTqAsyfZEsm1RZfx"
        },
        "duration_ms": 354947,
        "uri": "spotify:track:4u7EnebtmKWzUH433cf5Qv"
      },
      {
        "name": "Bohemian Rhapsody",
        "artists": [{"name": "Panic! At The Disco"}],
        "album": {"name": "Suicide Squad", "images": []},
        "duration_ms": 1999,
        "uri": "spotify:track:other"
      }
    ]
  }
}"#;

const ALBUMS: &str = r#"{
  "albums": {
    "items": [
      {
        "name": "Abbey Road",
        "artists": [{"name": "The Beatles"}],
        "images": [{"url": "big"}, {"url": "small"}],
        "total_tracks": 17,
        "release_date": "1969-09-26",
        "uri": "spotify:album:0ETFjACtuP2ADo6LFhL6HN"
      }
    ]
  }
}"#;

const PLAYLISTS: &str = r#"{
  "playlists": {
    "items": [
      null,
      {
        "name": "Friday Feeling",
        "owner": {"display_name": "Spotify", "id": "spotify"},
        "images": [{"url": "cover"}, {"url": "thumb"}],
        "tracks": {"total": 80},
        "uri": "spotify:playlist:37i9dQZF1DX1g0iEXLFycr"
      },
      {
        "name": "No owner name",
        "owner": {"display_name": null, "id": "fred"},
        "images": null,
        "tracks": {"total": 3},
        "uri": "spotify:playlist:abc"
      }
    ]
  }
}"#;

#[test]
fn test_track_mapping() {
    let parsed: SearchResponse = serde_json::from_str(TRACKS).unwrap();
    let results = parsed.into_results(5);
    assert_eq!(results.len(), 2);

    match &results[0] {
        SearchResult::Track(t) => {
            assert_eq!(t.title, "Bohemian Rhapsody - Remastered 2011");
            assert_eq!(t.artist, "Queen");
            assert_eq!(t.album, "A Night At The Opera");
            assert_eq!(t.image_url.as_deref(), Some("https://i.scdn.co/image/64"));
            assert_eq!(t.duration_secs, 354);
            assert_eq!(t.release_date.as_deref(), Some("1975-11-21"));
            assert_eq!(t.uri, "spotify:track:4u7EnebtmKWzUH433cf5Qv");
        }
        other => panic!("expected track, got {other:?}"),
    }
    assert_eq!(results[1].image_url(), None);
    assert_eq!(results[1].release_date(), None);
}

#[test]
fn test_album_mapping() {
    let parsed: SearchResponse = serde_json::from_str(ALBUMS).unwrap();
    match &parsed.into_results(5)[0] {
        SearchResult::Album(a) => {
            assert_eq!(a.title, "Abbey Road");
            assert_eq!(a.artist, "The Beatles");
            assert_eq!(a.total_tracks, 17);
            assert_eq!(a.image_url.as_deref(), Some("small"));
            assert_eq!(a.release_date.as_deref(), Some("1969-09-26"));
        }
        other => panic!("expected album, got {other:?}"),
    }
}

#[test]
fn test_playlist_mapping_skips_nulls() {
    let parsed: SearchResponse = serde_json::from_str(PLAYLISTS).unwrap();
    let results = parsed.into_results(5);
    assert_eq!(results.len(), 2);
    match &results[0] {
        SearchResult::Playlist(p) => {
            assert_eq!(p.title, "Friday Feeling");
            assert_eq!(p.owner, "Spotify");
            assert_eq!(p.total_tracks, 80);
            assert_eq!(p.image_url.as_deref(), Some("cover"));
        }
        other => panic!("expected playlist, got {other:?}"),
    }
    assert_eq!(results[1].artist(), "fred");
    assert_eq!(results[1].image_url(), None);
}

#[test]
fn test_results_truncated_to_limit() {
    let parsed: SearchResponse = serde_json::from_str(TRACKS).unwrap();
    let results = parsed.into_results(1);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].artist(), "Queen");
}

#[test]
fn test_empty_section() {
    let parsed: SearchResponse = serde_json::from_str(r#"{"tracks": {"items": []}}"#).unwrap();
    assert!(parsed.into_results(5).is_empty());
}

struct FakeSpotify {
    token_calls: Arc<AtomicUsize>,
    search_calls: Arc<AtomicUsize>,
    base: String,
}

/// Token endpoint plus `/v1/search`. The first `reject_first` searches get a 401.
async fn fake_spotify(reject_first: usize) -> FakeSpotify {
    let token_calls = Arc::new(AtomicUsize::new(0));
    let search_calls = Arc::new(AtomicUsize::new(0));

    let tc = token_calls.clone();
    let sc = search_calls.clone();
    let app = Router::new()
        .route(
            "/api/token",
            post(move |headers: HeaderMap, body: String| {
                let tc = tc.clone();
                async move {
                    let n = tc.fetch_add(1, Ordering::SeqCst);
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    if auth != "Basic aWQ6c2VjcmV0" || body != "grant_type=client_credentials" {
                        return (StatusCode::BAD_REQUEST, Json(serde_json::json!({"error": "invalid_client"})));
                    }
                    (
                        StatusCode::OK,
                        Json(serde_json::json!({
                            "access_token": format!("token-{n}"),
                            "token_type": "Bearer",
                            "expires_in": 3600
                        })),
                    )
                }
            }),
        )
        .route(
            "/v1/search",
            get(move |headers: HeaderMap, Query(q): Query<HashMap<String, String>>| {
                let sc = sc.clone();
                async move {
                    let n = sc.fetch_add(1, Ordering::SeqCst);
                    if n < reject_first {
                        return (StatusCode::UNAUTHORIZED, String::from("{}"));
                    }
                    let bearer = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default();
                    assert!(bearer.starts_with("Bearer token-"));
                    assert_eq!(q.get("market").map(String::as_str), Some("GB"));
                    let body = match q.get("type").map(String::as_str) {
                        Some("track") => TRACKS,
                        Some("album") => ALBUMS,
                        _ => PLAYLISTS,
                    };
                    (StatusCode::OK, body.to_string())
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeSpotify {
        token_calls,
        search_calls,
        base: format!("http://{addr}"),
    }
}

fn config(secret: &str) -> SpotifyConfig {
    SpotifyConfig {
        client_id: "id".into(),
        client_secret: secret.into(),
        market: "GB".into(),
        search_limit: 5,
    }
}

#[tokio::test]
async fn test_search_reuses_cached_token() {
    let fake = fake_spotify(0).await;
    let catalog = SpotifyCatalog::with_urls(&config("secret"), &fake.base, &fake.base);

    let tracks = catalog.search(SearchKind::Track, "bohemian", 5).await.unwrap();
    assert_eq!(tracks.len(), 2);
    let albums = catalog.search(SearchKind::Album, "abbey road", 5).await.unwrap();
    assert_eq!(albums[0].title(), "Abbey Road");

    assert_eq!(fake.token_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fake.search_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_search_refreshes_token_after_401() {
    let fake = fake_spotify(1).await;
    let catalog = SpotifyCatalog::with_urls(&config("secret"), &fake.base, &fake.base);

    let playlists = catalog.search(SearchKind::Playlist, "friday", 5).await.unwrap();
    assert_eq!(playlists.len(), 2);
    assert_eq!(fake.token_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_bad_credentials_are_catalog_error() {
    let fake = fake_spotify(0).await;
    let catalog = SpotifyCatalog::with_urls(&config("wrong"), &fake.base, &fake.base);

    let err = catalog.search(SearchKind::Track, "x", 5).await.unwrap_err();
    assert!(matches!(err, SonobotError::Catalog(_)));
    assert!(catalog.check_credentials().await.is_err());
    assert_eq!(fake.search_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_persistent_401_is_error() {
    let fake = fake_spotify(usize::MAX).await;
    let catalog = SpotifyCatalog::with_urls(&config("secret"), &fake.base, &fake.base);
    let err = catalog.search(SearchKind::Track, "x", 5).await.unwrap_err();
    assert!(err.to_string().contains("401"));
}
