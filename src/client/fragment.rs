use std::future::Future;

use regex::Regex;
use url::Url;

use super::SearchError;

/// A fetched document before any fragment is pulled out of it.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Where the controller gets rendered pages from.
pub trait FragmentSource {
    fn fetch(&self, url: Url) -> impl Future<Output = Result<FetchedPage, SearchError>>;
}

/// Fetches pages from the site over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpFragmentSource {
    client: reqwest::Client,
}

impl HttpFragmentSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl FragmentSource for HttpFragmentSource {
    async fn fetch(&self, url: Url) -> Result<FetchedPage, SearchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        Ok(FetchedPage { status, body })
    }
}

/// Inner HTML of the element with the given id.
///
/// Nested elements with the same tag name are balanced, so the returned slice
/// ends at the element's own closing tag.
pub fn extract_fragment<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    let open_regex = Regex::new(&format!(
        r#"<([A-Za-z][A-Za-z0-9]*)\b[^>]*?\sid\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(id)
    ))
    .ok()?;
    let open = open_regex.captures(html)?;
    let whole = open.get(0)?;
    let tag = open.get(1)?.as_str();
    let start = whole.end();

    if whole.as_str().ends_with("/>") {
        return Some("");
    }

    let tag_regex = Regex::new(&format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(tag))).ok()?;
    let mut depth = 1usize;
    for instance in tag_regex.captures_iter(&html[start..]) {
        let matched = instance.get(0)?;
        if instance[1].is_empty() {
            if !matched.as_str().ends_with("/>") {
                depth += 1;
            }
        } else {
            depth -= 1;
            if depth == 0 {
                return Some(&html[start..start + matched.start()]);
            }
        }
    }

    None
}
