//! Defines the route handler for the page that displays transactions.
//!
//! Each request re-fetches the user's transactions with the selected
//! server-side filters, recomputes the totals from that result, and then
//! applies the free-text search to the rows that will be displayed. A store
//! error aborts the request without touching anything: the page the user is
//! looking at stays as it was, and no retry is attempted.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{AppState, Error, auth::Session, endpoints, timezone::get_local_offset};

use super::{
    filter::{DateFilter, TypeFilter, date_bounds, get_transactions},
    form::DATE_INPUT_FORMAT,
    search::apply_search,
    totals::compute_totals,
    view::{FilterControls, transactions_view},
};

/// The query parameters of the transactions page.
///
/// The custom range dates are kept as raw strings: the filter form always
/// submits the `from`/`to` inputs, so they arrive as empty strings whenever
/// no custom range is selected.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    /// Which transaction types to show.
    #[serde(default, rename = "type")]
    type_filter: Option<TypeFilter>,
    /// Which date window to show.
    #[serde(default)]
    date: Option<DateFilter>,
    /// The start of the custom date range, used when `date` is `custom`.
    from: Option<String>,
    /// The end of the custom date range, used when `date` is `custom`.
    to: Option<String>,
    /// Free text matched against transaction titles and categories.
    search: Option<String>,
}

/// Parse a date from the filter form, treating empty or malformed values as
/// "not set".
fn parse_date_param(raw_date: Option<&str>) -> Option<Date> {
    raw_date
        .filter(|value| !value.is_empty())
        .and_then(|value| Date::parse(value, DATE_INPUT_FORMAT).ok())
}

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for reading transactions.
    db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    local_timezone: String,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render an overview of the user's transactions.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Extension(session): Extension<Session>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let type_filter = query.type_filter.unwrap_or_default();
    let date_filter = query.date.unwrap_or_default();
    let search = query.search.as_deref().unwrap_or_default();

    let custom_from = parse_date_param(query.from.as_deref());
    let custom_to = parse_date_param(query.to.as_deref());

    let today = current_local_date(&state.local_timezone)?;
    let bounds = date_bounds(date_filter, custom_from, custom_to, today);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(session.user_id, type_filter, bounds, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    // The totals reflect the server-side filters, so they must be computed
    // before the search narrows the displayed rows.
    let totals = compute_totals(&transactions);
    let displayed = apply_search(transactions, search);

    let from = custom_from.map(|date| date.to_string());
    let to = custom_to.map(|date| date.to_string());
    let controls = FilterControls {
        type_filter,
        date_filter,
        from: from.as_deref(),
        to: to.as_deref(),
        search,
    };

    let redirect_param = build_redirect_param(&current_page_url(
        type_filter,
        date_filter,
        custom_from,
        custom_to,
        search,
    ));

    Ok(transactions_view(
        &session,
        totals,
        &displayed,
        &controls,
        redirect_param.as_deref(),
    )
    .into_response())
}

fn current_local_date(local_timezone: &str) -> Result<Date, Error> {
    let Some(local_offset) = get_local_offset(local_timezone) else {
        tracing::error!("Invalid timezone {}", local_timezone);
        return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
    };

    Ok(OffsetDateTime::now_utc().to_offset(local_offset).date())
}

/// The URL of the transactions page with the active filters, used to come
/// back to the same view after editing or deleting a row.
fn current_page_url(
    type_filter: TypeFilter,
    date_filter: DateFilter,
    custom_from: Option<Date>,
    custom_to: Option<Date>,
    search: &str,
) -> String {
    let mut pairs = vec![
        ("type", type_filter.as_query_value().to_owned()),
        ("date", date_filter.as_query_value().to_owned()),
    ];

    if let Some(from) = custom_from {
        pairs.push(("from", from.to_string()));
    }
    if let Some(to) = custom_to {
        pairs.push(("to", to.to_string()));
    }
    if !search.is_empty() {
        pairs.push(("search", search.to_owned()));
    }

    match serde_urlencoded::to_string(&pairs) {
        Ok(query_string) => format!("{}?{}", endpoints::TRANSACTIONS_VIEW, query_string),
        Err(error) => {
            tracing::error!("Could not encode transactions page URL: {error}");
            endpoints::TRANSACTIONS_VIEW.to_owned()
        }
    }
}

fn build_redirect_param(redirect_url: &str) -> Option<String> {
    serde_urlencoded::to_string([("redirect_url", &redirect_url)])
        .inspect_err(|error| {
            tracing::error!(
                "Could not set redirect URL {redirect_url} due to encoding error: {error}"
            );
        })
        .ok()
}
