//! Renders the page for editing an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, auth::Session, endpoints, html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
};

use super::{
    core::{TransactionId, get_transaction},
    form::{TransactionForm, TransactionFormErrors, edit_transaction_form},
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing a transaction.
///
/// Responds with the 404 page when the transaction does not exist or belongs
/// to another user.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, session.user_id, &connection)?;
    let values = TransactionForm::from_transaction(&transaction);

    let content = maud::html! {
        (NavBar::new(endpoints::TRANSACTIONS_VIEW, &session.email).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md mx-auto"
            {
                h1 class="text-xl font-bold leading-tight tracking-tight md:text-2xl mb-4"
                {
                    "Edit Transaction"
                }

                (edit_transaction_form(transaction.id, &values, &TransactionFormErrors::default()))
            }
        }
    };

    Ok(base("Edit Transaction", &content).into_response())
}
