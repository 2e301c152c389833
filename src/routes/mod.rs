use axum::extract::{Path as ReqPath, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use maud::Markup;
use serde::Deserialize;
use tracing::error;
use url::form_urlencoded;

use crate::client::{Category, CATEGORY_PARAM, QUERY_PARAM};
use crate::html;
use crate::tmdb::{self, TmdbError};
use crate::AppState;

pub mod files;
pub mod pages;

/// A rendered page or a rendered error page, each with its status.
pub type PageResult = Result<Markup, (StatusCode, Markup)>;

/// Query string shared by the home route and detail pages.
#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    query: Option<String>,
    from: Option<String>,
    #[serde(rename = "searchType")]
    search_type: Option<String>,
}

impl SearchParams {
    pub fn category(&self) -> Category {
        Category::parse(self.search_type.as_deref())
    }

    /// The search text, if any non-blank text was given.
    pub fn query(&self) -> Option<&str> {
        non_blank(self.query.as_deref())
    }

    /// The search a detail page was reached from.
    pub fn from(&self) -> Option<&str> {
        non_blank(self.from.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Home-route address for a search.
pub fn search_href(query: &str, category: Category) -> String {
    let params = form_urlencoded::Serializer::new(String::new())
        .append_pair(QUERY_PARAM, query)
        .append_pair(CATEGORY_PARAM, category.as_str())
        .finish();
    format!("/?{params}")
}

/// Detail-page address that remembers the search it was opened from.
pub fn detail_href(kind: &str, id: u64, from: Option<(&str, Category)>) -> String {
    match from {
        Some((query, category)) => {
            let params = form_urlencoded::Serializer::new(String::new())
                .append_pair("from", query)
                .append_pair(CATEGORY_PARAM, category.as_str())
                .finish();
            format!("/{kind}/{id}?{params}")
        }
        None => format!("/{kind}/{id}"),
    }
}
