//! Upstream stubs shared by the orchestrator and server tests.

use crate::search::LetterSource;
use serde_json::{Value, json};
use spotify::{Credentials, Endpoints, Spotify};
use std::{collections::VecDeque, sync::Mutex};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub fn client(server: &MockServer) -> Spotify {
    Spotify::builder(Credentials::new("id", "secret"))
        .endpoints(Endpoints::with_bases(&server.uri(), &server.uri()))
        .build()
        .unwrap()
}

pub async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "token_type": "Bearer",
            "expires_in": 3600,
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub async fn mount_token_failure(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Matches `/v1/search` for one term, or for every term when `term` is `None`.
pub fn search_route(term: Option<&str>) -> MockBuilder {
    let route = Mock::given(method("GET")).and(path("/v1/search"));
    match term {
        Some(term) => route.and(query_param("q", term)),
        None => route,
    }
}

pub fn search_mock(term: Option<&str>, albums: Vec<Value>) -> Mock {
    search_route(term).respond_with(search_response(albums))
}

pub fn search_response(albums: Vec<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "albums": { "items": albums } }))
}

pub async fn mount_artist(server: &MockServer, id: &str, genres: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/artists/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "name": "whoever",
            "genres": genres,
        })))
        .mount(server)
        .await;
}

pub fn album(id: &str, name: &str, release_date: &str, images: &[&str], artist_id: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "release_date": release_date,
        "images": images.iter().map(|url| json!({ "url": url })).collect::<Vec<_>>(),
        "artists": [{ "id": artist_id, "name": format!("artist {artist_id}") }],
        "total_tracks": 10,
    })
}

/// Hands out a fixed letter sequence, then repeats the last letter.
pub struct FixedLetters(Mutex<VecDeque<char>>);

impl FixedLetters {
    pub fn new(letters: &str) -> Self {
        Self(Mutex::new(letters.chars().collect()))
    }
}

impl LetterSource for FixedLetters {
    fn letter(&self) -> char {
        let mut letters = self.0.lock().unwrap();
        if letters.len() > 1 {
            letters.pop_front().unwrap()
        } else {
            letters.front().copied().unwrap_or('a')
        }
    }
}
