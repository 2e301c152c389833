use super::*;
use crate::html::components::movie_grid;

pub struct CastView {
    pub name: String,
    pub character: Option<String>,
    pub href: String,
    pub photo: Option<String>,
}

pub struct MovieView {
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub release: Option<String>,
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    pub poster: Option<String>,
    pub rating: f64,
    pub directors: Vec<String>,
    pub cast: Vec<CastView>,
    pub similar: Vec<MovieCard>,
    pub back: BackLink,
}

pub fn movie(search: &SearchBar, movie: &MovieView) -> Markup {
    let body = html! {
        (back_link(&movie.back))
        article.movie-details {
            @if let Some(poster) = &movie.poster {
                img.poster src=(poster) alt=(movie.title);
            }
            .info {
                h1 { (movie.title) }
                @if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
                    p.tagline { (tagline) }
                }
                p.facts {
                    @if let Some(release) = &movie.release {
                        span { (release) }
                    }
                    @if let Some(runtime) = movie.runtime.filter(|r| *r > 0) {
                        span { (runtime / 60) "h " (runtime % 60) "m" }
                    }
                    @if movie.rating > 0.0 {
                        span.rating { "★ " (format!("{:.1}", movie.rating)) }
                    }
                }
                @if !movie.genres.is_empty() {
                    ul.genres {
                        @for genre in &movie.genres {
                            li { (genre) }
                        }
                    }
                }
                @if !movie.directors.is_empty() {
                    p.directors { b { "Directed by " } (movie.directors.join(", ")) }
                }
                @if let Some(overview) = &movie.overview {
                    p.overview { (overview) }
                }
            }
        }
        @if !movie.cast.is_empty() {
            section #cast {
                h2 { "Cast" }
                ul.cast {
                    @for member in &movie.cast {
                        li {
                            a href=(member.href) {
                                @if let Some(photo) = &member.photo {
                                    img src=(photo) alt=(member.name) loading="lazy";
                                }
                                span.name { (member.name) }
                                @if let Some(character) = &member.character {
                                    span.character { (character) }
                                }
                            }
                        }
                    }
                }
            }
        }
        @if !movie.similar.is_empty() {
            section #similar {
                h2 { "Similar movies" }
                (movie_grid(&movie.similar))
            }
        }
    };
    let body = wrappers::standard(body, search);
    wrappers::universal(body, &movie.title)
}
