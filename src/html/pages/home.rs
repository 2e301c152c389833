use super::*;
use crate::html::components::{movie_grid, person_grid};

pub enum SearchResults {
    Movies(Vec<MovieCard>),
    People(Vec<PersonCard>),
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        match self {
            SearchResults::Movies(movies) => movies.is_empty(),
            SearchResults::People(people) => people.is_empty(),
        }
    }
}

pub struct HomeSection {
    pub title: &'static str,
    pub id: &'static str,
    pub movies: Vec<MovieCard>,
}

pub fn home(sections: &[HomeSection]) -> Markup {
    let body = wrappers::results_section(html! {
        @for showcase in sections {
            section.showcase #(showcase.id) {
                h2 { (showcase.title) }
                (movie_grid(&showcase.movies))
            }
        }
    });
    let body = wrappers::standard(body, &SearchBar::default());
    wrappers::universal(body, "Home")
}

pub fn search(search: &SearchBar, results: &SearchResults) -> Markup {
    let kind = match results {
        SearchResults::Movies(_) => "movies",
        SearchResults::People(_) => "actors",
    };

    let body = wrappers::results_section(html! {
        h2.results-header {
            @if results.is_empty() {
                "No " (kind) " found for “" (search.query) "”"
            } @else {
                "Results for “" (search.query) "”"
            }
        }
        @match results {
            SearchResults::Movies(movies) => { (movie_grid(movies)) }
            SearchResults::People(people) => { (person_grid(people)) }
        }
    });
    let body = wrappers::standard(body, search);
    wrappers::universal(body, &format!("Search: {}", search.query))
}

/// The index page when the metadata API could not be reached.
pub fn unavailable(search: &SearchBar) -> Markup {
    let body = wrappers::results_section(html! {
        p.notice { "Nothing to show right now." }
    });
    let body = wrappers::with_notices(body, search, &[UNAVAILABLE_MESSAGE]);
    wrappers::universal(body, "Home")
}

const UNAVAILABLE_MESSAGE: &str = "An error occurred while fetching movies.";
