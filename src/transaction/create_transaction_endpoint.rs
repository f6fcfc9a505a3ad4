//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{AppState, Error, auth::Session, endpoints};

use super::{
    core::create_transaction,
    form::{TransactionForm, create_transaction_form, validate_transaction_form},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// The form is validated field by field before the database is touched: an
/// invalid submission re-renders the form with the entered values and an error
/// message per field. On success the new row is stamped with the session's
/// user ID and the client is redirected to the transactions view, which
/// re-fetches the list.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(session): Extension<Session>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let new_transaction = match validate_transaction_form(&form) {
        Ok(new_transaction) => new_transaction,
        Err(errors) => {
            return create_transaction_form(&form, &errors).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(new_transaction, session.user_id, &connection) {
        tracing::error!("Could not create transaction: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, body::Body, extract::State, http::Response, http::StatusCode,
        response::IntoResponse,
    };
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;

    use crate::{
        auth::{Email, Session, UserID},
        test_utils::parse_html_fragment,
        transaction::{
            TransactionType, core::get_transaction, core::test_utils::get_test_connection,
            count_transactions,
        },
    };

    use super::{CreateTransactionState, TransactionForm, create_transaction_endpoint};

    fn test_session(user_id: UserID) -> Session {
        Session {
            user_id,
            email: Email::new_unchecked("jane@example.com".to_owned()),
        }
    }

    fn valid_form() -> TransactionForm {
        TransactionForm {
            title: "Weekly shop".to_owned(),
            amount: "42.50".to_owned(),
            transaction_type: "expense".to_owned(),
            category: "Groceries".to_owned(),
            date: "2025-10-05".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let (conn, user_id) = get_test_connection();
        let state = CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = create_transaction_endpoint(
            State(state.clone()),
            Extension(test_session(user_id)),
            Form(valid_form()),
        )
        .await
        .into_response();

        assert_redirects_to_transactions_view(response);

        // Verify the transaction was actually created by getting it by ID
        // We know the first transaction will have ID 1
        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, user_id, &connection).unwrap();
        assert_eq!(transaction.amount, 42.5);
        assert_eq!(transaction.title, "Weekly shop");
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.user_id, user_id);
    }

    #[tokio::test]
    async fn rejects_non_positive_amounts_before_any_store_call() {
        for raw_amount in ["0", "-5"] {
            let (conn, user_id) = get_test_connection();
            let state = CreateTransactionState {
                db_connection: Arc::new(Mutex::new(conn)),
            };

            let form = TransactionForm {
                amount: raw_amount.to_owned(),
                ..valid_form()
            };
            let response = create_transaction_endpoint(
                State(state.clone()),
                Extension(test_session(user_id)),
                Form(form),
            )
            .await
            .into_response();

            assert_eq!(response.status(), StatusCode::OK);
            assert_form_error(response, "Amount must be greater than 0").await;

            let connection = state.db_connection.lock().unwrap();
            let count = count_transactions(user_id, &connection).unwrap();
            assert_eq!(count, 0, "want no transaction created for amount {raw_amount}");
        }
    }

    #[tokio::test]
    async fn rejects_invalid_date_before_any_store_call() {
        let (conn, user_id) = get_test_connection();
        let state = CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let form = TransactionForm {
            date: "not-a-date".to_owned(),
            ..valid_form()
        };
        let response = create_transaction_endpoint(
            State(state.clone()),
            Extension(test_session(user_id)),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_form_error(response, "Please enter a valid date").await;

        let connection = state.db_connection.lock().unwrap();
        let count = count_transactions(user_id, &connection).unwrap();
        assert_eq!(count, 0, "want no transaction created for an invalid date");
    }

    #[tokio::test]
    async fn invalid_form_keeps_entered_values() {
        let (conn, user_id) = get_test_connection();
        let state = CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let form = TransactionForm {
            amount: "0".to_owned(),
            ..valid_form()
        };
        let response = create_transaction_endpoint(
            State(state),
            Extension(test_session(user_id)),
            Form(form),
        )
        .await
        .into_response();

        let fragment = parse_html_fragment(response).await;
        let selector = scraper::Selector::parse("input[name=title]").unwrap();
        let title = fragment.select(&selector).next().unwrap();
        assert_eq!(title.value().attr("value"), Some("Weekly shop"));
    }

    #[track_caller]
    fn assert_redirects_to_transactions_view(response: Response<Body>) {
        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(
            location, "/transactions",
            "got redirect to {location:?}, want redirect to /transactions"
        );
    }

    async fn assert_form_error(response: Response<Body>, message: &str) {
        let fragment = parse_html_fragment(response).await;
        let selector = scraper::Selector::parse("p.text-red-500").unwrap();
        let errors: Vec<String> = fragment
            .select(&selector)
            .map(|error| error.text().collect::<String>().trim().to_string())
            .collect();
        assert!(
            errors.iter().any(|error| error == message),
            "want error message \"{message}\", got {errors:?}"
        );
    }
}
