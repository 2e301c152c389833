//! Search-state synchronization for the browser side of the site.
//!
//! The controller keeps the visible query and category, the address bar and
//! history stack, and the results region consistent across form submits,
//! back/forward navigation and submits made from detail pages. Everything the
//! controller touches is injected through the traits in this module tree, so
//! the state machine runs the same against a real page or an in-memory one.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

pub use controller::SearchStateController;
pub use fragment::{extract_fragment, FetchedPage, FragmentSource, HttpFragmentSource};
pub use history::{History, MemoryHistory};
pub use notifications::{Notice, Notifications};
pub use page::{Document, Page};

pub mod controller;
pub mod fragment;
pub mod history;
pub mod notifications;
pub mod page;

/// Id of the element holding the results region in every rendered page.
pub const RESULTS_SECTION_ID: &str = "resultsSection";

/// Query parameter carrying the search text.
pub const QUERY_PARAM: &str = "query";

/// Query parameter carrying the search category.
pub const CATEGORY_PARAM: &str = "searchType";

/// What kind of record a search looks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Movie,
    Actor,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Movie => "movie",
            Category::Actor => "actor",
        }
    }

    /// Unknown or missing values fall back to [`Category::Movie`].
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("actor") => Category::Actor,
            _ => Category::Movie,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a transition was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// The user submitted the search form.
    Submit,

    /// The browser moved through its history stack.
    PopState,

    /// Code asked for the transition, e.g. a cross-page redirect.
    Programmatic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    pub query: String,
    pub category: Category,
    pub origin: Origin,
}

impl SearchState {
    pub fn new(query: impl Into<String>, category: Category, origin: Origin) -> Self {
        Self {
            query: query.into(),
            category,
            origin,
        }
    }

    /// Builds the home-route URL carrying this state as parameters.
    pub fn to_url(&self, location: &Url) -> Url {
        let mut url = home_url(location);
        url.query_pairs_mut()
            .append_pair(QUERY_PARAM, &self.query)
            .append_pair(CATEGORY_PARAM, self.category.as_str());
        url
    }
}

/// Query and category as read back from an address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationParams {
    pub query: Option<String>,
    pub category: Category,
}

impl LocationParams {
    /// A blank query counts as no query at all.
    pub fn from_url(url: &Url) -> Self {
        let mut query = None;
        let mut category = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                QUERY_PARAM => query = Some(value.into_owned()),
                CATEGORY_PARAM => category = Some(value.into_owned()),
                _ => {}
            }
        }

        Self {
            query: query.filter(|q| !q.trim().is_empty()),
            category: Category::parse(category.as_deref()),
        }
    }
}

/// The home route of the site `location` belongs to, without parameters.
pub fn home_url(location: &Url) -> Url {
    let mut url = location.clone();
    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// Which kind of page the controller was started on.
///
/// Decided once when the page boots. Detail pages have no results region to
/// patch, so searches from them navigate to the home route instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationContext {
    Home,
    Detail,
}

impl NavigationContext {
    /// Classification the page bootstrap uses for a freshly loaded address.
    pub fn for_path(path: &str) -> Self {
        if path == "/" || path.is_empty() {
            NavigationContext::Home
        } else {
            NavigationContext::Detail
        }
    }
}

/// Coarse state of the search area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiPhase {
    Idle,
    Loading,
    /// A notification is showing over the settled (or idle) page.
    Error,
    Settled,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search query is empty")]
    EmptyQuery,

    #[error("search request timed out")]
    Timeout,

    #[error("search request failed with status {status}")]
    Fetch { status: u16 },

    #[error("response has no results section")]
    MissingFragment,

    #[error("search request could not be sent: {0}")]
    Transport(String),
}

impl SearchError {
    /// Text shown to the user in the notification drawer.
    pub fn user_message(&self) -> &'static str {
        match self {
            SearchError::EmptyQuery => "Please enter a search term.",
            SearchError::Timeout => "The search took too long to respond. Please try again.",
            SearchError::Fetch { .. }
            | SearchError::MissingFragment
            | SearchError::Transport(_) => "An error occurred while searching. Please try again.",
        }
    }
}
