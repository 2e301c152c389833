use crate::html::pages::movie::{CastView, MovieView};
use crate::html::pages::person::PersonView;

use super::*;

const CAST_SIZE: usize = 10;
const SIMILAR_SIZE: usize = 4;
const CREDITS_SIZE: usize = 12;

pub async fn movie(
    State(state): State<AppState>,
    ReqPath(id): ReqPath<String>,
    Query(params): Query<SearchParams>,
) -> PageResult {
    let tmdb = &state.tmdb;
    let id = parse_id(&id, MOVIE_NOT_FOUND)?;

    let (details, credits, similar) = tokio::try_join!(
        tmdb.movie(id),
        tmdb.movie_credits(id),
        tmdb.similar_movies(id),
    )
    .map_err(not_found(MOVIE_NOT_FOUND))?;

    let from = params.from().map(|q| (q, params.category()));

    let directors = credits
        .crew
        .iter()
        .filter(|c| c.job.as_deref() == Some("Director"))
        .map(|c| c.name.clone())
        .collect();

    let cast = credits
        .cast
        .iter()
        .take(CAST_SIZE)
        .map(|c| CastView {
            name: c.name.clone(),
            character: c.character.clone().filter(|c| !c.is_empty()),
            href: detail_href("person", c.id, from),
            photo: tmdb.image("w185", c.profile_path.as_deref()),
        })
        .collect();

    let view = MovieView {
        tagline: details.tagline.clone(),
        overview: details.overview.clone().filter(|o| !o.is_empty()),
        release: html::parse_date(details.release_date.as_deref()).map(|d| html::date_naive(&d)),
        runtime: details.runtime,
        genres: details.genres.iter().map(|g| g.name.clone()).collect(),
        poster: tmdb.image("w500", details.poster_path.as_deref()),
        rating: details.vote_average,
        directors,
        cast,
        similar: similar
            .iter()
            .take(SIMILAR_SIZE)
            .map(|m| movie_card(tmdb, m, from))
            .collect(),
        back: back_link(&params),
        title: details.title,
    };

    Ok(html::pages::movie::movie(&detail_search_bar(&params), &view))
}

pub async fn person(
    State(state): State<AppState>,
    ReqPath(id): ReqPath<String>,
    Query(params): Query<SearchParams>,
) -> PageResult {
    let tmdb = &state.tmdb;
    let id = parse_id(&id, PERSON_NOT_FOUND)?;

    let (details, credits) = tokio::try_join!(tmdb.person(id), tmdb.person_movie_credits(id))
        .map_err(not_found(PERSON_NOT_FOUND))?;

    let from = params.from().map(|q| (q, params.category()));

    // Most popular first, one card per movie even when several roles were played.
    let mut cast = credits.cast;
    cast.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    let mut seen = Vec::new();
    let credits = cast
        .iter()
        .filter(|c| {
            if seen.contains(&c.id) {
                return false;
            }
            seen.push(c.id);
            true
        })
        .take(CREDITS_SIZE)
        .map(|c| MovieCard {
            href: detail_href("movie", c.id, from),
            title: c.title.clone(),
            year: html::year(c.release_date.as_deref()),
            poster: tmdb.image("w342", c.poster_path.as_deref()),
            rating: 0.0,
        })
        .collect();

    let biography = details
        .biography
        .as_deref()
        .unwrap_or_default()
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect();

    let view = PersonView {
        department: details.known_for_department.clone(),
        birthday: html::parse_date(details.birthday.as_deref()).map(|d| html::date_naive(&d)),
        place_of_birth: details.place_of_birth.clone().filter(|p| !p.is_empty()),
        photo: tmdb.image("w500", details.profile_path.as_deref()),
        biography,
        credits,
        back: back_link(&params),
        name: details.name,
    };

    Ok(html::pages::person::person(&detail_search_bar(&params), &view))
}

fn parse_id(id: &str, message: &str) -> Result<u64, (StatusCode, Markup)> {
    id.parse()
        .map_err(|_| (StatusCode::NOT_FOUND, html::pages::error(message)))
}
