//! The internal server error page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// Route handler for the internal server error page.
pub async fn get_internal_server_error_page() -> Response {
    render_internal_server_error(
        "Internal Server Error",
        "Sorry, something went wrong on our end. Try again later.",
    )
}

/// Get a response containing the 500 internal server error page.
///
/// `description` is a short summary of what went wrong and `fix` tells the
/// user what they can do about it.
pub fn render_internal_server_error(description: &str, fix: &str) -> Response {
    let page = error_view("Internal Server Error", "500", description, fix);

    (StatusCode::INTERNAL_SERVER_ERROR, page).into_response()
}
