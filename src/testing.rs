//! A stand-in for the metadata API, served over real HTTP on an ephemeral port.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::config::{Config, DEFAULT_TMDB_IMAGE_URL};
use crate::tmdb::TmdbClient;
use crate::AppState;

type Requests = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

#[derive(Clone, Default)]
struct Upstream {
    requests: Requests,
    failing: Arc<AtomicBool>,
}

pub struct FakeUpstream {
    addr: SocketAddr,
    upstream: Upstream,
}

impl FakeUpstream {
    pub async fn start() -> Self {
        let upstream = Upstream::default();
        let app = Router::new().fallback(respond).with_state(upstream.clone());
        let addr = serve(app).await;
        Self { addr, upstream }
    }

    pub fn config(&self) -> Config {
        Config {
            tmdb_api_key: "test-key".to_owned(),
            tmdb_base_url: format!("http://{}", self.addr),
            tmdb_image_url: DEFAULT_TMDB_IMAGE_URL.to_owned(),
            bind_address: "127.0.0.1".to_owned(),
            port: 0,
        }
    }

    pub fn client(&self) -> TmdbClient {
        TmdbClient::new(&self.config())
    }

    pub fn state(&self) -> AppState {
        AppState {
            tmdb: self.client(),
        }
    }

    /// Makes every later request fail with a server error.
    pub fn set_failing(&self, failing: bool) {
        self.upstream.failing.store(failing, Ordering::SeqCst);
    }

    pub fn last_query(&self, path: &str) -> Option<String> {
        let requests = self.upstream.requests.lock().unwrap();
        requests
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .and_then(|(_, params)| params.get("query").cloned())
    }

    pub fn saw_api_key(&self) -> bool {
        let requests = self.upstream.requests.lock().unwrap();
        !requests.is_empty()
            && requests
                .iter()
                .all(|(_, params)| params.get("api_key").map(String::as_str) == Some("test-key"))
    }

    pub fn request_count(&self) -> usize {
        self.upstream.requests.lock().unwrap().len()
    }
}

/// Serves the site itself on an ephemeral port, backed by `upstream`.
pub async fn spawn_site(upstream: &FakeUpstream) -> SocketAddr {
    serve(crate::app(upstream.state())).await
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn movie(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "release_date": "2024-01-01",
        "overview": "Test overview",
        "poster_path": "/poster.jpg",
        "vote_average": 7.5,
    })
}

fn movie_list(prefix: &str) -> Value {
    let results: Vec<_> = (0..10)
        .map(|i| movie(100 + i, &format!("{prefix} {i}")))
        .collect();
    json!({ "results": results })
}

async fn respond(
    State(upstream): State<Upstream>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let path = uri.path().to_owned();
    upstream
        .requests
        .lock()
        .unwrap()
        .push((path.clone(), params.clone()));

    if upstream.failing.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let body = match path.as_str() {
        "/search/movie" => match params.get("query").map(String::as_str) {
            Some("nothing") => json!({ "results": [] }),
            _ => json!({ "results": [movie(1, "Test Movie")] }),
        },
        "/search/person" => json!({
            "results": [{
                "id": 7,
                "name": "Test Actor",
                "known_for_department": "Acting",
                "profile_path": null,
                "known_for": [{ "title": "Test Movie" }, { "name": "Test Show" }],
            }]
        }),
        "/trending/movie/week" => movie_list("Trending"),
        "/movie/top_rated" => movie_list("Top"),
        "/movie/upcoming" => movie_list("Upcoming"),
        "/movie/now_playing" => movie_list("Playing"),
        "/movie/1" => json!({
            "id": 1,
            "title": "Test Movie",
            "tagline": "A test tagline",
            "overview": "Test overview",
            "release_date": "2024-01-01",
            "runtime": 125,
            "genres": [{ "id": 1, "name": "Drama" }, { "id": 2, "name": "Crime" }],
            "poster_path": "/poster.jpg",
            "backdrop_path": null,
            "vote_average": 7.5,
        }),
        "/movie/1/credits" => json!({
            "cast": [{ "id": 7, "name": "Test Actor", "character": "Lead", "profile_path": null }],
            "crew": [
                { "id": 8, "name": "Test Director", "job": "Director" },
                { "id": 9, "name": "Test Editor", "job": "Editor" },
            ],
        }),
        "/movie/1/similar" => movie_list("Similar"),
        "/person/7" => json!({
            "id": 7,
            "name": "Test Actor",
            "biography": "Born somewhere.\n\nActed in things.",
            "birthday": "1970-05-04",
            "place_of_birth": "Testville",
            "known_for_department": "Acting",
            "profile_path": "/face.jpg",
        }),
        "/person/7/movie_credits" => json!({
            "cast": [
                { "id": 1, "title": "Test Movie", "character": "Lead", "release_date": "2024-01-01", "poster_path": null, "popularity": 3.0 },
                { "id": 2, "title": "Bigger Movie", "character": "Cameo", "release_date": "", "poster_path": null, "popularity": 9.0 },
            ]
        }),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };

    Json(body).into_response()
}
