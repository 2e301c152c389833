use crate::html::pages::home::{HomeSection, SearchResults};

use super::*;

/// The index page: search results when a query is given, showcase sections otherwise.
pub async fn home(State(state): State<AppState>, Query(params): Query<SearchParams>) -> PageResult {
    let tmdb = &state.tmdb;
    let category = params.category();

    let Some(query) = params.query() else {
        return showcase(tmdb).await;
    };
    let search = SearchBar {
        query: query.to_owned(),
        category,
    };
    let from = Some((query, category));

    let results = match category {
        Category::Movie => tmdb.search_movies(query).await.map(|movies| {
            SearchResults::Movies(movies.iter().map(|m| movie_card(tmdb, m, from)).collect())
        }),
        Category::Actor => tmdb.search_people(query).await.map(|people| {
            SearchResults::People(people.iter().map(|p| person_card(tmdb, p, from)).collect())
        }),
    };

    match results {
        Ok(results) => Ok(html::pages::home::search(&search, &results)),
        Err(error) => {
            error!(%error, query, %category, "error searching");
            Err(unavailable(&search))
        }
    }
}

async fn showcase(tmdb: &tmdb::TmdbClient) -> PageResult {
    let lists = tokio::try_join!(
        tmdb.trending_movies(),
        tmdb.top_rated_movies(),
        tmdb.upcoming_movies(),
        tmdb.now_playing_movies(),
    );
    let (trending, top_rated, upcoming, now_playing) = match lists {
        Ok(lists) => lists,
        Err(error) => {
            error!(%error, "error fetching homepage sections");
            return Err(unavailable(&SearchBar::default()));
        }
    };

    let section = |title, id, movies: Vec<tmdb::MovieSummary>| HomeSection {
        title,
        id,
        movies: movies
            .iter()
            .take(SECTION_SIZE)
            .map(|m| movie_card(tmdb, m, None))
            .collect(),
    };

    let sections = [
        section("Now Playing", "now-playing", now_playing),
        section("Trending This Week", "trending", trending),
        section("Top Rated", "top-rated", top_rated),
        section("Coming Soon", "upcoming", upcoming),
    ];

    Ok(html::pages::home::home(&sections))
}

fn unavailable(search: &SearchBar) -> (StatusCode, Markup) {
    (StatusCode::BAD_GATEWAY, html::pages::home::unavailable(search))
}
