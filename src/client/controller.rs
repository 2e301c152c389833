use std::cell::Cell;
use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use super::*;

/// How long a fragment fetch may take before it is abandoned.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const RESET_FAILED_MESSAGE: &str = "An error occurred. Please refresh the page.";

/// Owns the search area of one loaded page.
///
/// Constructed once per page load with the page's handles injected. All
/// methods take `&self` so overlapping transitions can be in flight at once,
/// just as event handlers interleave on the browser's event loop.
pub struct SearchStateController<P, H, F> {
    page: P,
    history: H,
    source: F,
    context: NavigationContext,
    notifications: Notifications,
    timeout: Duration,
    in_flight: Cell<usize>,
    latest_request: Cell<u64>,
    resting_phase: Cell<UiPhase>,
}

/// Restores the interactive state when the last overlapping fetch finishes,
/// however the fetch sequence exits.
struct Loading<'c> {
    in_flight: &'c Cell<usize>,
    resting_phase: &'c Cell<UiPhase>,
    page: &'c dyn Page,
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        let remaining = self.in_flight.get().saturating_sub(1);
        self.in_flight.set(remaining);
        if remaining == 0 {
            self.page.set_loading(false);
            self.resting_phase.set(UiPhase::Settled);
        }
    }
}

impl<P, H, F> SearchStateController<P, H, F>
where
    P: Page,
    H: History,
    F: FragmentSource,
{
    pub fn new(page: P, history: H, source: F, context: NavigationContext) -> Self {
        Self {
            page,
            history,
            source,
            context,
            notifications: Notifications::new(),
            timeout: FETCH_TIMEOUT,
            in_flight: Cell::new(0),
            latest_request: Cell::new(0),
            resting_phase: Cell::new(UiPhase::Idle),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn context(&self) -> NavigationContext {
        self.context
    }

    pub fn phase(&self) -> UiPhase {
        if self.in_flight.get() > 0 {
            UiPhase::Loading
        } else if !self.notifications.is_empty() {
            UiPhase::Error
        } else {
            self.resting_phase.get()
        }
    }

    /// Mirrors the address bar into the query input and category selector.
    ///
    /// The results region is already server-rendered, so nothing is fetched.
    pub fn initialize_from_url(&self) {
        let params = LocationParams::from_url(&self.history.location());
        self.page.set_query(params.query.as_deref().unwrap_or(""));
        self.page.set_category(params.category);
    }

    /// Form submit handler: searches for whatever the inputs currently hold.
    pub async fn on_submit(&self) -> Result<(), SearchError> {
        let query = self.page.query();
        let category = self.page.category();
        self.submit(&query, category).await
    }

    /// Runs a user-submitted search.
    ///
    /// Any error has already been shown as a notification by the time it is
    /// returned; callers are free to drop it.
    pub async fn submit(&self, raw_query: &str, category: Category) -> Result<(), SearchError> {
        let state = SearchState::new(raw_query.trim(), category, Origin::Submit);
        self.search(state).await
    }

    /// Back/forward handler. The browser has already moved the address bar.
    pub async fn handle_pop_state(&self) -> Result<(), SearchError> {
        let params = LocationParams::from_url(&self.history.location());
        self.page.set_query(params.query.as_deref().unwrap_or(""));
        self.page.set_category(params.category);

        match params.query {
            Some(query) => {
                let state = SearchState::new(query.trim(), params.category, Origin::PopState);
                self.search(state).await
            }
            None => self.reset_to_home().await,
        }
    }

    /// Puts the home route's sections back into the results region.
    pub async fn reset_to_home(&self) -> Result<(), SearchError> {
        self.page.set_query("");
        self.page.set_category(Category::Movie);

        let url = home_url(&self.history.location());
        let _loading = self.begin_loading();
        let request = self.next_request();

        let result = self.fetch_fragment(url).await;
        self.finish(request, result, Some(RESET_FAILED_MESSAGE))
    }

    async fn search(&self, state: SearchState) -> Result<(), SearchError> {
        if state.query.is_empty() {
            return Err(self.fail(SearchError::EmptyQuery, None));
        }

        let url = state.to_url(&self.history.location());

        if self.context == NavigationContext::Detail {
            info!(query = %state.query, category = %state.category, "leaving detail page to search");
            let redirect = SearchState {
                origin: Origin::Programmatic,
                ..state
            };
            self.history.assign(&redirect, url);
            return Ok(());
        }

        self.page.set_query(&state.query);
        self.page.set_category(state.category);

        let _loading = self.begin_loading();
        let request = self.next_request();

        if state.origin == Origin::Submit {
            self.history.push_state(&state, url.clone());
        }

        let result = self.fetch_fragment(url).await;
        self.finish(request, result, None)
    }

    async fn fetch_fragment(&self, url: Url) -> Result<String, SearchError> {
        debug!(%url, "fetching fragment");
        let page = tokio::time::timeout(self.timeout, self.source.fetch(url))
            .await
            .map_err(|_| SearchError::Timeout)??;

        if !page.is_ok() {
            return Err(SearchError::Fetch {
                status: page.status,
            });
        }

        extract_fragment(&page.body, RESULTS_SECTION_ID)
            .map(str::to_owned)
            .ok_or(SearchError::MissingFragment)
    }

    /// Swaps in a fetched fragment unless a newer request has started since.
    fn finish(
        &self,
        request: u64,
        result: Result<String, SearchError>,
        failure_message: Option<&'static str>,
    ) -> Result<(), SearchError> {
        let fragment = match result {
            Ok(fragment) => fragment,
            Err(e) => return Err(self.fail(e, failure_message)),
        };

        if request != self.latest_request.get() {
            debug!(request, "discarding stale fragment");
            return Ok(());
        }

        self.page.set_results(&fragment);
        Ok(())
    }

    /// Timeouts keep their own message so the user can tell them apart.
    fn fail(&self, error: SearchError, failure_message: Option<&'static str>) -> SearchError {
        warn!(%error, "search transition failed");
        let message = match (&error, failure_message) {
            (SearchError::Timeout, _) | (_, None) => error.user_message(),
            (_, Some(message)) => message,
        };
        self.notifications.show(message);
        error
    }

    fn begin_loading(&self) -> Loading<'_> {
        self.in_flight.set(self.in_flight.get() + 1);
        self.page.set_loading(true);
        Loading {
            in_flight: &self.in_flight,
            resting_phase: &self.resting_phase,
            page: &self.page,
        }
    }

    fn next_request(&self) -> u64 {
        let request = self.latest_request.get() + 1;
        self.latest_request.set(request);
        request
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;

    enum Reply {
        Page { status: u16, body: String },
        Delayed(Duration, String),
        Hang,
    }

    /// Answers every request with a page whose results region names the query,
    /// unless a scripted reply is queued.
    #[derive(Clone, Default)]
    struct FakeSource {
        calls: Arc<Mutex<Vec<Url>>>,
        replies: Arc<Mutex<VecDeque<Reply>>>,
    }

    impl FakeSource {
        fn queue(&self, reply: Reply) {
            self.replies.lock().unwrap().push_back(reply);
        }

        fn calls(&self) -> Vec<Url> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn page_for(url: &Url) -> String {
        let region = match LocationParams::from_url(url).query {
            Some(query) => format!("results for {query}"),
            None => "home sections".to_owned(),
        };
        format!(r#"<html><body><main><div id="resultsSection">{region}</div></main></body></html>"#)
    }

    impl FragmentSource for FakeSource {
        async fn fetch(&self, url: Url) -> Result<FetchedPage, SearchError> {
            self.calls.lock().unwrap().push(url.clone());
            let reply = self.replies.lock().unwrap().pop_front();
            match reply {
                None => Ok(FetchedPage {
                    status: 200,
                    body: page_for(&url),
                }),
                Some(Reply::Page { status, body }) => Ok(FetchedPage { status, body }),
                Some(Reply::Delayed(delay, region)) => {
                    tokio::time::sleep(delay).await;
                    Ok(FetchedPage {
                        status: 200,
                        body: format!(r#"<div id="resultsSection">{region}</div>"#),
                    })
                }
                Some(Reply::Hang) => std::future::pending().await,
            }
        }
    }

    type TestController = SearchStateController<Document, MemoryHistory, FakeSource>;

    fn controller(location: &str, context: NavigationContext) -> (TestController, FakeSource) {
        let source = FakeSource::default();
        let controller = SearchStateController::new(
            Document::new("home sections"),
            MemoryHistory::new(Url::parse(location).unwrap()),
            source.clone(),
            context,
        );
        (controller, source)
    }

    #[tokio::test(start_paused = true)]
    async fn submit_updates_address_and_results() {
        let (controller, source) = controller("http://localhost:3000/", NavigationContext::Home);
        assert_eq!(controller.phase(), UiPhase::Idle);

        controller.submit("  blade runner ", Category::Actor).await.unwrap();

        let location = controller.history().location();
        let params = LocationParams::from_url(&location);
        assert_eq!(params.query.as_deref(), Some("blade runner"));
        assert_eq!(params.category, Category::Actor);
        assert_eq!(controller.history().len(), 2);
        assert_eq!(controller.phase(), UiPhase::Settled);
        assert_eq!(controller.page().results(), "results for blade runner");
        assert_eq!(controller.page().query(), "blade runner");
        assert_eq!(source.calls(), vec![location]);
    }

    #[tokio::test(start_paused = true)]
    async fn form_submit_reads_inputs() {
        let (controller, _) = controller("http://localhost:3000/", NavigationContext::Home);
        controller.page().set_query("alien");
        controller.page().set_category(Category::Movie);

        controller.on_submit().await.unwrap();
        assert_eq!(controller.page().results(), "results for alien");
    }

    #[tokio::test(start_paused = true)]
    async fn empty_query_never_fetches() {
        let (controller, source) = controller("http://localhost:3000/", NavigationContext::Home);

        for query in ["", "   "] {
            let result = controller.submit(query, Category::Movie).await;
            assert!(matches!(result, Err(SearchError::EmptyQuery)));
        }

        assert!(source.calls().is_empty());
        assert_eq!(controller.history().len(), 1);
        assert_eq!(controller.phase(), UiPhase::Error);
        assert!(controller.page().search_enabled());
        assert_eq!(controller.page().results(), "home sections");
    }

    #[tokio::test(start_paused = true)]
    async fn back_and_forward_do_not_grow_history() {
        let (controller, source) = controller("http://localhost:3000/", NavigationContext::Home);
        controller.submit("heat", Category::Movie).await.unwrap();
        controller.submit("ronin", Category::Movie).await.unwrap();
        assert_eq!(controller.history().len(), 3);

        assert!(controller.history().back());
        controller.handle_pop_state().await.unwrap();
        assert_eq!(controller.history().len(), 3);
        assert_eq!(controller.page().query(), "heat");
        assert_eq!(controller.page().results(), "results for heat");

        assert!(controller.history().back());
        controller.handle_pop_state().await.unwrap();
        assert_eq!(controller.history().len(), 3);
        assert_eq!(controller.page().query(), "");
        assert_eq!(controller.page().results(), "home sections");

        assert!(controller.history().forward());
        assert!(controller.history().forward());
        controller.handle_pop_state().await.unwrap();
        assert_eq!(controller.history().len(), 3);
        assert_eq!(controller.page().query(), "ronin");
        assert_eq!(controller.page().results(), "results for ronin");
        assert_eq!(source.calls().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn pop_state_reconciles_category() {
        let (controller, _) = controller("http://localhost:3000/", NavigationContext::Home);
        controller.submit("pacino", Category::Actor).await.unwrap();
        controller.submit("heat", Category::Movie).await.unwrap();

        controller.history().back();
        controller.handle_pop_state().await.unwrap();
        assert_eq!(controller.page().category(), Category::Actor);
        assert_eq!(controller.page().query(), "pacino");
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_leaves_loading() {
        let (controller, source) = controller("http://localhost:3000/", NavigationContext::Home);
        source.queue(Reply::Hang);

        let result = controller.submit("solaris", Category::Movie).await;
        assert!(matches!(result, Err(SearchError::Timeout)));
        assert_eq!(controller.phase(), UiPhase::Error);
        assert!(!controller.page().is_loading());
        assert!(controller.page().search_enabled());

        let notices = controller.notifications().visible();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, SearchError::Timeout.user_message());
        assert_eq!(controller.page().results(), "home sections");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetches_share_a_message() {
        let (controller, source) = controller("http://localhost:3000/", NavigationContext::Home);
        source.queue(Reply::Page {
            status: 502,
            body: "<p>upstream down</p>".to_owned(),
        });
        source.queue(Reply::Page {
            status: 200,
            body: "<p>no results region</p>".to_owned(),
        });

        let first = controller.submit("a", Category::Movie).await;
        assert!(matches!(first, Err(SearchError::Fetch { status: 502 })));
        let second = controller.submit("b", Category::Movie).await;
        assert!(matches!(second, Err(SearchError::MissingFragment)));

        let notices = controller.notifications().visible();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].message, notices[1].message);
        assert_ne!(notices[0].message, SearchError::Timeout.user_message());
        assert!(controller.page().search_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn error_overlay_clears_itself() {
        let (controller, _) = controller("http://localhost:3000/", NavigationContext::Home);
        controller.submit("heat", Category::Movie).await.unwrap();
        let _ = controller.submit(" ", Category::Movie).await;
        assert_eq!(controller.phase(), UiPhase::Error);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(controller.phase(), UiPhase::Settled);
    }

    #[tokio::test(start_paused = true)]
    async fn controls_are_locked_while_fetching() {
        let (controller, source) = controller("http://localhost:3000/", NavigationContext::Home);
        source.queue(Reply::Delayed(Duration::from_secs(3), "slow".to_owned()));

        let (outcome, ()) = tokio::join!(controller.submit("heat", Category::Movie), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            assert_eq!(controller.phase(), UiPhase::Loading);
            assert!(controller.page().is_loading());
            assert!(controller.page().results_dimmed());
            assert!(!controller.page().search_enabled());
        });
        outcome.unwrap();

        assert_eq!(controller.phase(), UiPhase::Settled);
        assert!(!controller.page().is_loading());
        assert!(controller.page().search_enabled());
        assert_eq!(controller.page().results(), "slow");
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_submissions_settle() {
        let (controller, source) = controller("http://localhost:3000/", NavigationContext::Home);
        source.queue(Reply::Delayed(Duration::from_secs(3), "first".to_owned()));
        source.queue(Reply::Delayed(Duration::from_secs(1), "second".to_owned()));

        let (first, second) = tokio::join!(
            controller.submit("first", Category::Movie),
            controller.submit("second", Category::Movie),
        );
        first.unwrap();
        second.unwrap();

        assert_ne!(controller.phase(), UiPhase::Loading);
        assert!(!controller.page().is_loading());
        assert!(controller.page().search_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_is_discarded() {
        let (controller, source) = controller("http://localhost:3000/", NavigationContext::Home);
        source.queue(Reply::Delayed(Duration::from_secs(3), "slow first".to_owned()));
        source.queue(Reply::Delayed(Duration::from_secs(1), "fast second".to_owned()));

        let _ = tokio::join!(
            controller.submit("first", Category::Movie),
            controller.submit("second", Category::Movie),
        );
        assert_eq!(controller.page().results(), "fast second");
    }

    #[tokio::test(start_paused = true)]
    async fn reset_restores_home_and_defaults() {
        let (controller, source) = controller("http://localhost:3000/", NavigationContext::Home);
        controller.submit("pacino", Category::Actor).await.unwrap();

        controller.reset_to_home().await.unwrap();
        assert_eq!(controller.page().results(), "home sections");
        assert_eq!(controller.page().query(), "");
        assert_eq!(controller.page().category(), Category::Movie);

        let last = source.calls().pop().unwrap();
        assert_eq!(last.path(), "/");
        assert_eq!(last.query(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_failure_is_reported() {
        let (controller, source) = controller("http://localhost:3000/?query=x", NavigationContext::Home);
        source.queue(Reply::Page {
            status: 500,
            body: String::new(),
        });

        let result = controller.reset_to_home().await;
        assert!(matches!(result, Err(SearchError::Fetch { status: 500 })));
        assert_eq!(
            controller.notifications().visible()[0].message,
            RESET_FAILED_MESSAGE
        );
        assert!(!controller.page().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn detail_page_navigates_instead_of_fetching() {
        let (controller, source) =
            controller("http://localhost:3000/movie/603?from=matrix", NavigationContext::Detail);

        controller.submit("heat", Category::Movie).await.unwrap();

        assert!(source.calls().is_empty());
        let navigations = controller.history().navigations();
        assert_eq!(navigations.len(), 1);
        assert_eq!(navigations[0].path(), "/");
        let params = LocationParams::from_url(&navigations[0]);
        assert_eq!(params.query.as_deref(), Some("heat"));
        assert_eq!(params.category, Category::Movie);
        assert_eq!(controller.phase(), UiPhase::Idle);

        let entry = controller.history().current_state().unwrap();
        assert_eq!(entry.origin, Origin::Programmatic);
        assert_eq!(entry.query, "heat");
    }

    #[tokio::test(start_paused = true)]
    async fn initialize_reads_address_without_fetching() {
        let (controller, source) = controller(
            "http://localhost:3000/?query=de%20niro&searchType=actor",
            NavigationContext::Home,
        );

        controller.initialize_from_url();
        assert_eq!(controller.page().query(), "de niro");
        assert_eq!(controller.page().category(), Category::Actor);
        assert!(source.calls().is_empty());
        assert_eq!(controller.phase(), UiPhase::Idle);
    }
}
