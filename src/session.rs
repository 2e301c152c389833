//! Headless search sessions against a running site.
//!
//! A session is what one browser tab would do with the search area: the
//! controller is built once per page load, and a full navigation (a search
//! submitted from a detail page) loads a new page with a new controller over
//! the same history.

use std::time::{Duration, Instant};

use clap::Args;
use regex::Regex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use url::Url;

use crate::client::{
    Category, Document, History, HttpFragmentSource, MemoryHistory, NavigationContext, Page,
    SearchError, SearchStateController,
};

#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Address the session starts on, as it would appear in the address bar.
    #[arg(long, default_value = "http://localhost:3000/")]
    pub server: Url,

    /// Seconds a search may take before it is abandoned.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

type Session = SearchStateController<Document, MemoryHistory, HttpFragmentSource>;

/// One line of input to [`browse`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Back,
    Forward,
    Home,
    Quit,
    Search {
        query: String,
        category: Option<Category>,
    },
}

impl BrowseCommand {
    /// `movie <query>` and `actor <query>` pick a category; any other text
    /// is searched with whatever category the page currently has selected.
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match (word, rest) {
            ("", _) => return None,
            ("back", "") => BrowseCommand::Back,
            ("forward", "") => BrowseCommand::Forward,
            ("home", "") => BrowseCommand::Home,
            ("quit" | "exit", "") => BrowseCommand::Quit,
            ("movie", query) => BrowseCommand::Search {
                query: query.to_owned(),
                category: Some(Category::Movie),
            },
            ("actor", query) => BrowseCommand::Search {
                query: query.to_owned(),
                category: Some(Category::Actor),
            },
            _ => BrowseCommand::Search {
                query: line.to_owned(),
                category: None,
            },
        };
        Some(command)
    }
}

fn http_client() -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Loads the page at the history's current location.
fn open(client: &reqwest::Client, history: MemoryHistory, timeout: Duration) -> Session {
    let location = history.location();
    let session = SearchStateController::new(
        Document::default(),
        history,
        HttpFragmentSource::new(client.clone()),
        NavigationContext::for_path(location.path()),
    )
    .with_timeout(timeout);
    session.initialize_from_url();
    info!(%location, context = ?session.context(), "page loaded");
    session
}

/// Runs a single search and prints what the page would show.
pub async fn search(query: &str, category: Category, args: &ClientArgs) -> anyhow::Result<()> {
    let client = http_client()?;
    let history = MemoryHistory::new(args.server.clone());
    let session = open(&client, history, Duration::from_secs(args.timeout));

    let start = Instant::now();
    let outcome = session.submit(query, category).await;
    info!(elapsed = ?start.elapsed(), phase = ?session.phase(), "search finished");

    report(&session, &outcome, 0);
    outcome.map_err(Into::into)
}

/// Reads commands from stdin until it closes or `quit` is entered.
pub async fn browse(args: &ClientArgs) -> anyhow::Result<()> {
    run(args, BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}

async fn run<R>(args: &ClientArgs, input: R) -> anyhow::Result<Session>
where
    R: AsyncBufRead + Unpin,
{
    let client = http_client()?;
    let timeout = Duration::from_secs(args.timeout);
    let history = MemoryHistory::new(args.server.clone());
    let mut session = open(&client, history.clone(), timeout);

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = BrowseCommand::parse(&line) else {
            continue;
        };
        let navigated = history.navigations().len();

        let outcome = match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Back => {
                if !history.back() {
                    eprintln!("Already at the oldest page.");
                    continue;
                }
                log_restored(&history);
                session.handle_pop_state().await
            }
            BrowseCommand::Forward => {
                if !history.forward() {
                    eprintln!("Already at the newest page.");
                    continue;
                }
                log_restored(&history);
                session.handle_pop_state().await
            }
            BrowseCommand::Home => session.reset_to_home().await,
            BrowseCommand::Search { query, category } => {
                session.page().set_query(&query);
                if let Some(category) = category {
                    session.page().set_category(category);
                }
                session.on_submit().await
            }
        };

        report(&session, &outcome, navigated);
        if history.navigations().len() > navigated {
            session = open(&client, history.clone(), timeout);
        }
    }

    Ok(session)
}

fn log_restored(history: &MemoryHistory) {
    match history.current_state() {
        Some(state) => debug!(query = %state.query, origin = ?state.origin, "restored history entry"),
        None => debug!(location = %history.location(), "restored entry without state"),
    }
}

/// Prints notifications, then either the navigation or the results region.
///
/// Printed notifications count as read and are dismissed.
fn report(session: &Session, outcome: &Result<(), SearchError>, navigated: usize) {
    let page = session.page();
    debug!(
        phase = ?session.phase(),
        loading = page.is_loading(),
        dimmed = page.results_dimmed(),
        search_enabled = page.search_enabled(),
        entries = session.history().len(),
        "page state"
    );

    for notice in session.notifications().visible() {
        eprintln!("{}", notice.message);
        session.notifications().dismiss(notice.id);
    }

    if let Some(url) = session.history().navigations().get(navigated) {
        println!("Navigated to {url}");
    } else if outcome.is_ok() {
        println!("{}", visible_text(&page.results()));
    }
}

/// Text content of an HTML fragment, one line per block of text.
fn visible_text(html: &str) -> String {
    let tag_regex = Regex::new(r"<[^>]*>").unwrap();
    let text = tag_regex.replace_all(html, "\n");
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| {
            l.replace("&amp;", "&")
                .replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&quot;", "\"")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
