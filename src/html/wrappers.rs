use maud::DOCTYPE;

use super::*;

/// Site header with the search form, loading indicator and notification drawer.
///
/// Rendered on every page so a search can start from anywhere. The loading
/// indicator stays hidden until a client marks a search as in flight.
pub(super) fn standard(body: Markup, search: &SearchBar) -> Markup {
    with_notices(body, search, &[])
}

/// Like [`standard`], with notices the server already has to report.
pub(super) fn with_notices(body: Markup, search: &SearchBar, notices: &[&str]) -> Markup {
    html! {
        header #topbar {
            a #title href="/" { "Marquee" }
            form #searchForm action="/" method="get" role="search" {
                input #searchInput
                    type="search"
                    name="query"
                    value=(search.query)
                    placeholder="Search for a movie or an actor"
                    autocomplete="off";
                select #searchType name="searchType" {
                    option value=(Category::Movie.as_str()) selected[search.category == Category::Movie] { "Movies" }
                    option value=(Category::Actor.as_str()) selected[search.category == Category::Actor] { "Actors" }
                }
                button #searchButton type="submit" { "Search" }
            }
        }
        #loadingState.hidden {
            .spinner {}
            p { "Searching…" }
        }
        div #notifications role="status" {
            @for notice in notices {
                .notification.error { (notice) }
            }
        }
        main {
            (body)
        }
    }
}

pub(super) fn universal(body: Markup, title: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en-us" {
            head {
                title { "Marquee | " (title) }
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                link type="text/css" rel="stylesheet" href="/style/main.css";
            }
            body {
                (body)
            }
        }
    }
}

/// The swappable results region.
pub(super) fn results_section(content: Markup) -> Markup {
    html! {
        div id=(RESULTS_SECTION_ID) {
            (content)
        }
    }
}
