use super::*;

use crate::html::{BackLink, MovieCard, PersonCard, SearchBar};

pub mod details;
pub mod home;

/// How many records each homepage section shows.
const SECTION_SIZE: usize = 8;

fn movie_card(
    tmdb: &tmdb::TmdbClient,
    movie: &tmdb::MovieSummary,
    from: Option<(&str, Category)>,
) -> MovieCard {
    MovieCard {
        href: detail_href("movie", movie.id, from),
        title: movie.title.clone(),
        year: html::year(movie.release_date.as_deref()),
        poster: tmdb.image("w342", movie.poster_path.as_deref()),
        rating: movie.vote_average,
    }
}

fn person_card(
    tmdb: &tmdb::TmdbClient,
    person: &tmdb::PersonSummary,
    from: Option<(&str, Category)>,
) -> PersonCard {
    let known_for = person
        .known_for
        .iter()
        .filter_map(|k| k.title.clone().or_else(|| k.name.clone()))
        .take(3)
        .collect();

    PersonCard {
        href: detail_href("person", person.id, from),
        name: person.name.clone(),
        department: person.known_for_department.clone(),
        photo: tmdb.image("w185", person.profile_path.as_deref()),
        known_for,
    }
}

/// Detail pages return to the search they were opened from, or to home.
fn back_link(params: &SearchParams) -> BackLink {
    match params.from() {
        Some(from) => BackLink {
            href: search_href(from, params.category()),
            label: "Back to results",
        },
        None => BackLink {
            href: "/".to_owned(),
            label: "Back to home",
        },
    }
}

/// The header search form on a detail page, prefilled with the originating search.
fn detail_search_bar(params: &SearchParams) -> SearchBar {
    SearchBar {
        query: params.from().unwrap_or_default().to_owned(),
        category: params.category(),
    }
}

const MOVIE_NOT_FOUND: &str = "Movie not found or error occurred";
const PERSON_NOT_FOUND: &str = "Person not found or error occurred";

fn not_found(message: &'static str) -> impl Fn(TmdbError) -> (StatusCode, Markup) {
    move |error| {
        error!(%error, "error fetching details");
        (StatusCode::NOT_FOUND, html::pages::error(message))
    }
}
