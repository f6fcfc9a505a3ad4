//! Renders the transactions page: summary cards, filter controls, and the
//! transaction list.

use maud::{Markup, html};

use crate::{
    auth::Session,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, CARD_BALANCE_STYLE, CARD_EXPENSE_STYLE, CARD_INCOME_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency,
    },
    navigation::NavBar,
    transaction::TransactionType,
};

use super::{
    core::Transaction,
    filter::{DateFilter, TypeFilter},
    totals::Totals,
};

/// The state of the filter controls, echoed back into the form inputs.
pub(crate) struct FilterControls<'a> {
    pub(crate) type_filter: TypeFilter,
    pub(crate) date_filter: DateFilter,
    pub(crate) from: Option<&'a str>,
    pub(crate) to: Option<&'a str>,
    pub(crate) search: &'a str,
}

fn summary_card(style: &str, label: &str, amount: f64) -> Markup {
    html! {
        div class=(style)
        {
            p class="text-sm font-medium" { (label) }
            p class="text-xl font-bold" { (format_currency(amount)) }
        }
    }
}

fn filter_bar(controls: &FilterControls) -> Markup {
    let type_options = [
        (TypeFilter::All, "All Types"),
        (TypeFilter::Income, "Income"),
        (TypeFilter::Expense, "Expense"),
    ];
    let date_options = [
        (DateFilter::All, "All Dates"),
        (DateFilter::ThisMonth, "This Month"),
        (DateFilter::Last30Days, "Last 30 Days"),
        (DateFilter::Custom, "Custom Range"),
    ];

    html! {
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="flex flex-wrap gap-3 mt-6 items-end"
        {
            select name="type" class=(FORM_TEXT_INPUT_STYLE) style="width: auto;"
            {
                @for (value, label) in type_options
                {
                    option
                        value=(value.as_query_value())
                        selected[controls.type_filter == value]
                    {
                        (label)
                    }
                }
            }

            select name="date" class=(FORM_TEXT_INPUT_STYLE) style="width: auto;"
            {
                @for (value, label) in date_options
                {
                    option
                        value=(value.as_query_value())
                        selected[controls.date_filter == value]
                    {
                        (label)
                    }
                }
            }

            input
                type="date"
                name="from"
                aria-label="From date"
                value=[controls.from]
                class=(FORM_TEXT_INPUT_STYLE)
                style="width: auto;";

            input
                type="date"
                name="to"
                aria-label="To date"
                value=[controls.to]
                class=(FORM_TEXT_INPUT_STYLE)
                style="width: auto;";

            input
                type="text"
                name="search"
                placeholder="Search by title or category"
                value=(controls.search)
                class=(FORM_TEXT_INPUT_STYLE)
                style="width: auto; flex-grow: 1;";

            button
                type="submit"
                class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                    hover:dark:bg-blue-700 text-white rounded"
            {
                "Apply"
            }
        }
    }
}

fn transaction_row(transaction: &Transaction, redirect_param: Option<&str>) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let mut delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);

    // Deleting returns the client to the list with the active filters intact.
    if let Some(redirect_param) = redirect_param {
        delete_url = format!("{delete_url}?{redirect_param}");
    }

    let amount_style = match transaction.transaction_type {
        TransactionType::Income => "text-green-600 dark:text-green-400",
        TransactionType::Expense => "text-red-600 dark:text-red-400",
    };

    html! {
        div class="p-4 border rounded shadow flex justify-between gap-4 bg-white dark:bg-gray-800 dark:border-gray-700"
        {
            div class="flex-1"
            {
                div class="font-semibold"
                {
                    (transaction.title)
                    " "
                    span class=(amount_style) { (format_currency(transaction.amount)) }
                }
                div class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (transaction.category) " | " (transaction.transaction_type) " | " (transaction.date)
                }
            }

            div class="flex items-start gap-2 flex-shrink-0"
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                button
                    type="button"
                    hx-delete=(delete_url)
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

/// The transactions page.
///
/// The summary cards reflect the server-side filters only; the search narrows
/// the rows shown underneath them.
pub(crate) fn transactions_view(
    session: &Session,
    totals: Totals,
    transactions: &[Transaction],
    controls: &FilterControls,
    redirect_param: Option<&str>,
) -> Markup {
    let content = html! {
        (NavBar::new(endpoints::TRANSACTIONS_VIEW, &session.email).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            (filter_bar(controls))

            div class="grid grid-cols-1 sm:grid-cols-3 gap-4 mt-3 mb-6"
            {
                (summary_card(CARD_INCOME_STYLE, "Total Income", totals.income))
                (summary_card(CARD_EXPENSE_STYLE, "Total Expense", totals.expense))
                (summary_card(CARD_BALANCE_STYLE, "Current Balance", totals.balance))
            }

            div class="mt-2 space-y-4"
            {
                @if transactions.is_empty() {
                    p class="text-sm text-center text-gray-500 dark:text-gray-400"
                    {
                        "No transactions found."
                    }
                } @else {
                    @for transaction in transactions {
                        (transaction_row(transaction, redirect_param))
                    }
                }
            }
        }
    };

    base("Transactions", &content)
}
