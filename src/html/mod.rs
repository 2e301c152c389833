use chrono::{Datelike, NaiveDate, Utc};
use maud::{html, Markup, PreEscaped};

use crate::client::{Category, RESULTS_SECTION_ID};

pub mod components;
pub mod pages;
mod wrappers;

pub use components::{MovieCard, PersonCard};

/// What the search form shows when a page is rendered.
#[derive(Debug, Clone, Default)]
pub struct SearchBar {
    pub query: String,
    pub category: Category,
}

/// Where a detail page's back link points.
#[derive(Debug, Clone)]
pub struct BackLink {
    pub href: String,
    pub label: &'static str,
}

/// Upstream dates are `YYYY-MM-DD`, often empty for unreleased titles.
pub fn parse_date(date: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date?.trim(), "%Y-%m-%d").ok()
}

/// Drops the year for dates in the current year.
pub fn date_naive(date: &NaiveDate) -> String {
    let now = Utc::now();
    if now.year_ce() == date.year_ce() {
        date.format("%b %-d").to_string()
    } else {
        date.format("%b %-d, %Y").to_string()
    }
}

pub fn year(date: Option<&str>) -> Option<String> {
    parse_date(date).map(|d| d.year().to_string())
}
