//! Alert partials for displaying error messages to users.
//!
//! Alerts are rendered into the fixed `#alert-container` element of the base
//! layout via an htmx out-of-band swap, so endpoints can surface a single
//! transient message without replacing the page content.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Renders an error alert with a bolded `message` and `details` underneath.
pub fn alert_error(message: &str, details: &str) -> Markup {
    html! {
        div
            id="alert-container"
            hx-swap-oob="true"
            class="w-full max-w-md px-4"
            style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
        {
            div
                role="alert"
                class="p-4 rounded border border-red-300 bg-red-50 text-red-800 \
                    dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            {
                p class="font-medium" { (message) }

                @if !details.is_empty() {
                    p class="text-sm" { (details) }
                }
            }
        }
    }
}

/// Build a response carrying only an error alert.
pub fn alert_response(status_code: StatusCode, message: &str, details: &str) -> Response {
    (status_code, alert_error(message, details)).into_response()
}

#[cfg(test)]
mod alert_tests {
    use scraper::{Html, Selector};

    use super::alert_error;

    #[test]
    fn renders_message_and_details() {
        let markup = alert_error("Could not delete transaction", "Try again later.");

        let fragment = Html::parse_fragment(&markup.into_string());
        let selector = Selector::parse("div[role=alert] p").unwrap();
        let paragraphs: Vec<String> = fragment
            .select(&selector)
            .map(|p| p.text().collect::<String>())
            .collect();

        assert_eq!(
            paragraphs,
            vec!["Could not delete transaction", "Try again later."]
        );
    }

    #[test]
    fn swaps_out_of_band() {
        let markup = alert_error("Something went wrong", "");

        let fragment = Html::parse_fragment(&markup.into_string());
        let selector = Selector::parse("#alert-container").unwrap();
        let container = fragment
            .select(&selector)
            .next()
            .expect("expected alert container");

        assert_eq!(container.value().attr("hx-swap-oob"), Some("true"));
    }
}
