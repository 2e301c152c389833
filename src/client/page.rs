use std::sync::{Arc, Mutex, MutexGuard};

use super::Category;

/// The interactive search area the controller drives.
///
/// Methods take `&self` the way element handles do: a page is a set of
/// shared handles, not an owned value.
pub trait Page {
    fn query(&self) -> String;
    fn set_query(&self, query: &str);

    fn category(&self) -> Category;
    fn set_category(&self, category: Category);

    /// Shows the spinner, dims the results and disables the search button,
    /// or reverses all three.
    fn set_loading(&self, loading: bool);

    fn results(&self) -> String;
    fn set_results(&self, html: &str);
}

#[derive(Debug, Clone)]
struct DocumentState {
    query: String,
    category: Category,
    loading_visible: bool,
    results_dimmed: bool,
    search_enabled: bool,
    results: String,
}

/// In-memory page used by the headless client and by tests.
#[derive(Debug, Clone)]
pub struct Document {
    state: Arc<Mutex<DocumentState>>,
}

impl Document {
    /// A page whose results region was already rendered by the server.
    pub fn new(results: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(DocumentState {
                query: String::new(),
                category: Category::Movie,
                loading_visible: false,
                results_dimmed: false,
                search_enabled: true,
                results: results.into(),
            })),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading_visible
    }

    pub fn results_dimmed(&self) -> bool {
        self.state().results_dimmed
    }

    pub fn search_enabled(&self) -> bool {
        self.state().search_enabled
    }

    fn state(&self) -> MutexGuard<'_, DocumentState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Page for Document {
    fn query(&self) -> String {
        self.state().query.clone()
    }

    fn set_query(&self, query: &str) {
        self.state().query = query.to_owned();
    }

    fn category(&self) -> Category {
        self.state().category
    }

    fn set_category(&self, category: Category) {
        self.state().category = category;
    }

    fn set_loading(&self, loading: bool) {
        let mut state = self.state();
        state.loading_visible = loading;
        state.results_dimmed = loading;
        state.search_enabled = !loading;
    }

    fn results(&self) -> String {
        self.state().results.clone()
    }

    fn set_results(&self, html: &str) {
        self.state().results = html.to_owned();
    }
}
