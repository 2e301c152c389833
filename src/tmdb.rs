//! Read-only client for the movie metadata API.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("request to {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} answered with status {status}")]
    Status { path: String, status: u16 },
}

#[derive(Deserialize, Debug)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct KnownFor {
    pub title: Option<String>,
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PersonSummary {
    pub id: u64,
    pub name: String,
    pub known_for_department: Option<String>,
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for: Vec<KnownFor>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Genre {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MovieDetails {
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CrewMember {
    pub name: String,
    pub job: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PersonDetails {
    pub name: String,
    pub biography: Option<String>,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
    pub known_for_department: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PersonMovieCredit {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PersonCredits {
    #[serde(default)]
    pub cast: Vec<PersonMovieCredit>,
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    base_url: String,
    api_key: String,
    image_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.tmdb_base_url.trim_end_matches('/').to_owned(),
            api_key: config.tmdb_api_key.clone(),
            image_url: config.tmdb_image_url.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    /// Full image URL for a poster or profile path at the given size (e.g. `w500`).
    pub fn image(&self, size: &str, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{}/{size}{p}", self.image_url))
    }

    pub async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, TmdbError> {
        let page: Page<MovieSummary> = self.get("/search/movie", &[("query", query)]).await?;
        Ok(page.results)
    }

    pub async fn search_people(&self, query: &str) -> Result<Vec<PersonSummary>, TmdbError> {
        let page: Page<PersonSummary> = self.get("/search/person", &[("query", query)]).await?;
        Ok(page.results)
    }

    pub async fn trending_movies(&self) -> Result<Vec<MovieSummary>, TmdbError> {
        self.movie_list("/trending/movie/week").await
    }

    pub async fn top_rated_movies(&self) -> Result<Vec<MovieSummary>, TmdbError> {
        self.movie_list("/movie/top_rated").await
    }

    pub async fn upcoming_movies(&self) -> Result<Vec<MovieSummary>, TmdbError> {
        self.movie_list("/movie/upcoming").await
    }

    pub async fn now_playing_movies(&self) -> Result<Vec<MovieSummary>, TmdbError> {
        self.movie_list("/movie/now_playing").await
    }

    pub async fn movie(&self, id: u64) -> Result<MovieDetails, TmdbError> {
        self.get(&format!("/movie/{id}"), &[]).await
    }

    pub async fn movie_credits(&self, id: u64) -> Result<Credits, TmdbError> {
        self.get(&format!("/movie/{id}/credits"), &[]).await
    }

    pub async fn similar_movies(&self, id: u64) -> Result<Vec<MovieSummary>, TmdbError> {
        self.movie_list(&format!("/movie/{id}/similar")).await
    }

    pub async fn person(&self, id: u64) -> Result<PersonDetails, TmdbError> {
        self.get(&format!("/person/{id}"), &[]).await
    }

    pub async fn person_movie_credits(&self, id: u64) -> Result<PersonCredits, TmdbError> {
        self.get(&format!("/person/{id}/movie_credits"), &[]).await
    }

    async fn movie_list(&self, path: &str) -> Result<Vec<MovieSummary>, TmdbError> {
        let page: Page<MovieSummary> = self.get(path, &[("page", "1")]).await?;
        Ok(page.results)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TmdbError> {
        let url = format!("{}{path}", self.base_url);
        debug!(path, "upstream request");

        let request_error = |source| TmdbError::Request {
            path: path.to_owned(),
            source,
        };

        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TmdbError::Status {
                path: path.to_owned(),
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(request_error)
    }
}
