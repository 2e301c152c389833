use anyhow::Context;
use axum::{routing::get, Router};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod client;
mod config;
mod html;
mod routes;
mod session;
#[cfg(test)]
mod testing;
mod tmdb;

use client::Category;
use session::ClientArgs;

#[derive(Clone)]
pub struct AppState {
    tmdb: tmdb::TmdbClient,
}

#[derive(Parser, Debug)]
#[command(name = "marquee", about = "Movie discovery website")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web server (default).
    Serve,

    /// Run a search against a running server the way the browser would.
    Search {
        query: String,

        /// Search for actors instead of movies.
        #[arg(long)]
        actor: bool,

        #[command(flatten)]
        client: ClientArgs,
    },

    /// Browse a running server from the terminal, one command per line:
    /// a search, `movie <query>`, `actor <query>`, `back`, `forward`, `home` or `quit`.
    Browse {
        #[command(flatten)]
        client: ClientArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Search {
            query,
            actor,
            client,
        } => {
            let category = if actor {
                Category::Actor
            } else {
                Category::Movie
            };
            session::search(&query, category, &client).await
        }
        Command::Browse { client } => session::browse(&client).await,
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::pages::home::home))
        .route("/movie/:id", get(routes::pages::details::movie))
        .route("/person/:id", get(routes::pages::details::person))
        .route("/style/:file", get(routes::files::style))
        .with_state(state)
}

async fn serve() -> anyhow::Result<()> {
    let config = config::Config::from_env().context("invalid configuration")?;
    let state = AppState {
        tmdb: tmdb::TmdbClient::new(&config),
    };

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {addr}"))?;
    info!("Server is running on http://{addr}");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
