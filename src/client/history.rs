use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;
use url::Url;

use super::SearchState;

/// The browser's address bar and session history.
pub trait History {
    /// The address currently shown, already updated by back/forward.
    fn location(&self) -> Url;

    /// Adds an entry without reloading the page.
    fn push_state(&self, state: &SearchState, url: Url);

    /// Full navigation away from the current document.
    fn assign(&self, state: &SearchState, url: Url);

    fn len(&self) -> usize;
}

/// One history record. The state is kept serialized, the way the browser
/// structured-clones whatever is pushed with an entry.
#[derive(Debug, Clone)]
struct Entry {
    url: Url,
    state: Option<String>,
}

impl Entry {
    fn new(url: Url, state: &SearchState) -> Self {
        let state = serde_json::to_string(state)
            .map_err(|error| warn!(%error, "could not store history state"))
            .ok();
        Self { url, state }
    }
}

#[derive(Debug)]
struct HistoryState {
    entries: Vec<Entry>,
    current: usize,
    navigations: Vec<Url>,
}

/// Session history kept in memory.
///
/// `back` and `forward` move the cursor the way the browser does before it
/// fires `popstate`; the caller then hands control to the controller.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    state: Arc<Mutex<HistoryState>>,
}

impl MemoryHistory {
    pub fn new(location: Url) -> Self {
        Self {
            state: Arc::new(Mutex::new(HistoryState {
                entries: vec![Entry {
                    url: location,
                    state: None,
                }],
                current: 0,
                navigations: Vec::new(),
            })),
        }
    }

    /// Returns false when already at the oldest entry.
    pub fn back(&self) -> bool {
        let mut state = self.state();
        if state.current == 0 {
            return false;
        }
        state.current -= 1;
        true
    }

    /// Returns false when already at the newest entry.
    pub fn forward(&self) -> bool {
        let mut state = self.state();
        if state.current + 1 >= state.entries.len() {
            return false;
        }
        state.current += 1;
        true
    }

    /// State stored with the current entry, if it was pushed with one.
    pub fn current_state(&self) -> Option<SearchState> {
        let state = self.state();
        let stored = state.entries[state.current].state.as_deref()?;
        serde_json::from_str(stored).ok()
    }

    /// Every full navigation requested so far, oldest first.
    pub fn navigations(&self) -> Vec<Url> {
        self.state().navigations.clone()
    }

    fn state(&self) -> MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Url {
        let state = self.state();
        state.entries[state.current].url.clone()
    }

    fn push_state(&self, search: &SearchState, url: Url) {
        let mut state = self.state();
        let next = state.current + 1;
        state.entries.truncate(next);
        state.entries.push(Entry::new(url, search));
        state.current = next;
    }

    fn assign(&self, search: &SearchState, url: Url) {
        let mut state = self.state();
        state.navigations.push(url.clone());
        let next = state.current + 1;
        state.entries.truncate(next);
        state.entries.push(Entry::new(url, search));
        state.current = next;
    }

    fn len(&self) -> usize {
        self.state().entries.len()
    }
}
