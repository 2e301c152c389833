use super::*;
use crate::html::components::movie_grid;

pub struct PersonView {
    pub name: String,
    pub department: Option<String>,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
    pub photo: Option<String>,
    pub biography: Vec<String>,
    pub credits: Vec<MovieCard>,
    pub back: BackLink,
}

pub fn person(search: &SearchBar, person: &PersonView) -> Markup {
    let body = html! {
        (back_link(&person.back))
        article.person-details {
            @if let Some(photo) = &person.photo {
                img.poster src=(photo) alt=(person.name);
            }
            .info {
                h1 { (person.name) }
                p.facts {
                    @if let Some(department) = &person.department {
                        span { (department) }
                    }
                    @if let Some(birthday) = &person.birthday {
                        span { "Born " (birthday) }
                    }
                    @if let Some(place) = &person.place_of_birth {
                        span { (place) }
                    }
                }
                @if person.biography.is_empty() {
                    p.biography.empty { "No biography available." }
                }
                @for paragraph in &person.biography {
                    p.biography { (paragraph) }
                }
            }
        }
        @if !person.credits.is_empty() {
            section #credits {
                h2 { "Known for" }
                (movie_grid(&person.credits))
            }
        }
    };
    let body = wrappers::standard(body, search);
    wrappers::universal(body, &person.name)
}
