use super::*;

pub struct MovieCard {
    pub href: String,
    pub title: String,
    pub year: Option<String>,
    pub poster: Option<String>,
    pub rating: f64,
}

pub struct PersonCard {
    pub href: String,
    pub name: String,
    pub department: Option<String>,
    pub photo: Option<String>,
    pub known_for: Vec<String>,
}

pub fn movie_grid(movies: &[MovieCard]) -> Markup {
    html! {
        .grid {
            @for movie in movies {
                a.card.movie href=(movie.href) {
                    (poster(movie.poster.as_deref(), &movie.title))
                    h3 { (movie.title) }
                    p.meta {
                        @if let Some(year) = &movie.year {
                            span.year { (year) }
                        }
                        @if movie.rating > 0.0 {
                            span.rating { "★ " (format!("{:.1}", movie.rating)) }
                        }
                    }
                }
            }
        }
    }
}

pub fn person_grid(people: &[PersonCard]) -> Markup {
    html! {
        .grid {
            @for person in people {
                a.card.person href=(person.href) {
                    (poster(person.photo.as_deref(), &person.name))
                    h3 { (person.name) }
                    @if let Some(department) = &person.department {
                        p.meta { (department) }
                    }
                    @if !person.known_for.is_empty() {
                        p.known-for { "Known for " (person.known_for.join(", ")) }
                    }
                }
            }
        }
    }
}

fn poster(src: Option<&str>, alt: &str) -> Markup {
    html! {
        @if let Some(src) = src {
            img.poster src=(src) alt=(alt) loading="lazy";
        } @else {
            .poster.placeholder { (PreEscaped("&#127902;")) }
        }
    }
}
