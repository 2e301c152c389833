use std::fs;
use std::path::Path;

use super::*;

pub async fn style(ReqPath(file_name): ReqPath<String>) -> Response {
    static_file("static/styles", &file_name, "text/css")
}

fn static_file(folder: &str, file_name: &str, content_type: &'static str) -> Response {
    if file_name.contains("..") || file_name.contains('/') || file_name.contains('\\') {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = Path::new(folder).join(file_name);
    match fs::read_to_string(&path) {
        Ok(content) => ([(header::CONTENT_TYPE, content_type)], content).into_response(),
        Err(_) => {
            tracing::warn!(path = %path.display(), "static file not found");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
