use super::*;

pub mod home;
pub mod movie;
pub mod person;

/// Best-effort page for failures that have no better place to go.
pub fn error(message: &str) -> Markup {
    let body = html! {
        .error-page {
            h1 { "Something went wrong" }
            p.message { (message) }
            a href="/" { "Back to home" }
        }
    };
    let body = wrappers::standard(body, &SearchBar::default());
    wrappers::universal(body, "Error")
}

fn back_link(back: &BackLink) -> Markup {
    html! {
        a.back href=(back.href) { "← " (back.label) }
    }
}
