//! Defines the endpoint for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{RedirectQuery, Session, normalize_redirect_url},
    endpoints,
};

use super::core::{TransactionId, delete_transaction};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// The delete is scoped to the session's user in SQL, a transaction owned by
/// another user is reported as not found. On success the client is redirected
/// back to the transactions view (preserving the active filters when the
/// request carries a `redirect_url`), which re-fetches the list and totals.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<RedirectQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let redirect_url = query
        .redirect_url
        .as_deref()
        .and_then(normalize_redirect_url)
        .unwrap_or_else(|| endpoints::TRANSACTIONS_VIEW.to_owned());

    match delete_transaction(transaction_id, session.user_id, &connection) {
        Ok(0) => Error::DeleteMissingTransaction.into_alert_response(),
        Ok(_) => (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_htmx::HX_REDIRECT;
    use time::macros::date;

    use crate::{
        Error,
        auth::{Email, RedirectQuery, Session, UserID},
        transaction::{
            TransactionType,
            core::{get_transaction, test_utils::get_test_connection, test_utils::new_transaction},
            create_transaction,
        },
    };

    use super::{DeleteTransactionState, delete_transaction_endpoint};

    fn test_session(user_id: UserID) -> Session {
        Session {
            user_id,
            email: Email::new_unchecked("jane@example.com".to_owned()),
        }
    }

    #[tokio::test]
    async fn deletes_transaction_and_redirects() {
        let (conn, user_id) = get_test_connection();
        let transaction = create_transaction(
            new_transaction(
                "Coffee",
                4.5,
                TransactionType::Expense,
                "Eating out",
                date!(2025 - 10 - 05),
            ),
            user_id,
            &conn,
        )
        .unwrap();
        let state = DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Extension(test_session(user_id)),
            Path(transaction.id),
            Query(RedirectQuery { redirect_url: None }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            "/transactions"
        );

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(transaction.id, user_id, &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn redirect_preserves_active_filters() {
        let (conn, user_id) = get_test_connection();
        let transaction = create_transaction(
            new_transaction(
                "Coffee",
                4.5,
                TransactionType::Expense,
                "Eating out",
                date!(2025 - 10 - 05),
            ),
            user_id,
            &conn,
        )
        .unwrap();
        let state = DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let redirect_url = "/transactions?type=expense&date=this_month";
        let response = delete_transaction_endpoint(
            State(state),
            Extension(test_session(user_id)),
            Path(transaction.id),
            Query(RedirectQuery {
                redirect_url: Some(redirect_url.to_owned()),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.headers().get(HX_REDIRECT).unwrap(), redirect_url);
    }

    #[tokio::test]
    async fn deleting_missing_transaction_returns_not_found_alert() {
        let (conn, user_id) = get_test_connection();
        let state = DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = delete_transaction_endpoint(
            State(state),
            Extension(test_session(user_id)),
            Path(42),
            Query(RedirectQuery { redirect_url: None }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cannot_delete_other_users_transaction() {
        let (conn, user_id) = get_test_connection();
        let transaction = create_transaction(
            new_transaction(
                "Coffee",
                4.5,
                TransactionType::Expense,
                "Eating out",
                date!(2025 - 10 - 05),
            ),
            user_id,
            &conn,
        )
        .unwrap();
        let state = DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let other_user = UserID::new(user_id.as_i64() + 1);
        let response = delete_transaction_endpoint(
            State(state.clone()),
            Extension(test_session(other_user)),
            Path(transaction.id),
            Query(RedirectQuery { redirect_url: None }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let connection = state.db_connection.lock().unwrap();
        assert!(
            get_transaction(transaction.id, user_id, &connection).is_ok(),
            "the transaction must still exist"
        );
    }
}
