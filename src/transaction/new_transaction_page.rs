//! Renders the page for creating a new transaction.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::{
    AppState, Error, auth::Session, endpoints, html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar, timezone::get_local_offset,
};

use super::form::{TransactionForm, TransactionFormErrors, create_transaction_form};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for creating a transaction.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
    Extension(session): Extension<Session>,
) -> Response {
    let local_offset = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => return Error::InvalidTimezoneError(state.local_timezone).into_response(),
    };

    let values = TransactionForm {
        transaction_type: "expense".to_owned(),
        date: OffsetDateTime::now_utc().to_offset(local_offset).date().to_string(),
        ..Default::default()
    };

    let content = maud::html! {
        (NavBar::new(endpoints::NEW_TRANSACTION_VIEW, &session.email).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md mx-auto"
            {
                h1 class="text-xl font-bold leading-tight tracking-tight md:text-2xl mb-4"
                {
                    "Add Transaction"
                }

                (create_transaction_form(&values, &TransactionFormErrors::default()))
            }
        }
    };

    base("Add Transaction", &content).into_response()
}

#[cfg(test)]
mod view_tests {
    use axum::{Extension, extract::State};
    use scraper::Selector;

    use crate::{
        auth::{Email, Session, UserID},
        endpoints,
        test_utils::parse_html_document,
    };

    use super::{NewTransactionPageState, get_new_transaction_page};

    fn test_session() -> Session {
        Session {
            user_id: UserID::new(1),
            email: Email::new_unchecked("jane@example.com".to_owned()),
        }
    }

    #[tokio::test]
    async fn page_displays_form_posting_to_transactions_api() {
        let state = NewTransactionPageState {
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_new_transaction_page(State(state), Extension(test_session())).await;

        let document = parse_html_document(response).await;
        let form_selector = Selector::parse("form").unwrap();
        let form = document
            .select(&form_selector)
            .next()
            .expect("expected a form on the page");
        assert_eq!(
            form.value().attr("hx-post"),
            Some(endpoints::TRANSACTIONS_API)
        );

        for field in ["title", "amount", "category", "date"] {
            let selector = Selector::parse(&format!("input[name={field}]")).unwrap();
            assert!(
                document.select(&selector).next().is_some(),
                "expected an input for {field}"
            );
        }
    }

    #[tokio::test]
    async fn form_defaults_to_expense() {
        let state = NewTransactionPageState {
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_new_transaction_page(State(state), Extension(test_session())).await;

        let document = parse_html_document(response).await;
        let selector = Selector::parse("input[type=radio][value=expense]").unwrap();
        let expense_radio = document
            .select(&selector)
            .next()
            .expect("expected an expense radio input");
        assert!(expense_radio.value().attr("checked").is_some());
    }
}
