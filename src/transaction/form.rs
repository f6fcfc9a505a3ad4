//! The transaction form: the raw submitted payload, its field-by-field
//! validation, and the shared form markup for the create and edit pages.
//!
//! Validation happens before any database call. An invalid form never reaches
//! the store; it is re-rendered with the entered values and a message next to
//! each offending field.

use std::str::FromStr;

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
    transaction::{NewTransaction, TransactionId, TransactionType},
};

/// The format dates arrive in from an HTML date input.
pub(crate) const DATE_INPUT_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]");

/// The raw, unvalidated data submitted from the transaction form.
///
/// Every field is kept as a string so that an invalid submission can be
/// re-rendered exactly as the user entered it.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    /// A short text describing what the transaction was for.
    #[serde(default)]
    pub title: String,
    /// The amount of money, as entered.
    #[serde(default)]
    pub amount: String,
    /// "income" or "expense".
    #[serde(default, rename = "type")]
    pub transaction_type: String,
    /// A free text category.
    #[serde(default)]
    pub category: String,
    /// The transaction date in `YYYY-MM-DD` format.
    #[serde(default)]
    pub date: String,
}

impl TransactionForm {
    /// Pre-fill the form with the values of an existing transaction.
    pub(crate) fn from_transaction(transaction: &crate::transaction::Transaction) -> Self {
        Self {
            title: transaction.title.clone(),
            amount: format!("{:.2}", transaction.amount),
            transaction_type: transaction.transaction_type.as_str().to_owned(),
            category: transaction.category.clone(),
            date: transaction.date.to_string(),
        }
    }
}

/// The validation error messages for each field of the transaction form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TransactionFormErrors {
    pub(crate) title: Option<&'static str>,
    pub(crate) amount: Option<&'static str>,
    pub(crate) transaction_type: Option<&'static str>,
    pub(crate) category: Option<&'static str>,
    pub(crate) date: Option<&'static str>,
}

impl TransactionFormErrors {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.transaction_type.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }
}

/// Validate a submitted transaction form.
///
/// # Errors
///
/// Returns the per-field error messages if any field is invalid. The whole
/// submission is rejected when any field fails, there is no partial result.
pub(crate) fn validate_transaction_form(
    form: &TransactionForm,
) -> Result<NewTransaction, TransactionFormErrors> {
    let mut errors = TransactionFormErrors::default();

    let title = form.title.trim();
    if title.is_empty() {
        errors.title = Some("Title is required");
    }

    let amount = match form.amount.trim().parse::<f64>() {
        Ok(amount) => {
            if amount > 0.0 && amount.is_finite() {
                Some(amount)
            } else {
                errors.amount = Some("Amount must be greater than 0");
                None
            }
        }
        Err(_) => {
            errors.amount = Some("Amount must be a number");
            None
        }
    };

    let transaction_type = match TransactionType::from_str(&form.transaction_type) {
        Ok(transaction_type) => Some(transaction_type),
        Err(_) => {
            errors.transaction_type = Some("Select a transaction type");
            None
        }
    };

    let category = form.category.trim();
    if category.is_empty() {
        errors.category = Some("Category is required");
    }

    let date = match Date::parse(form.date.trim(), DATE_INPUT_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.date = Some("Please enter a valid date");
            None
        }
    };

    match (amount, transaction_type, date) {
        (Some(amount), Some(transaction_type), Some(date)) if errors.is_empty() => {
            Ok(NewTransaction {
                title: title.to_owned(),
                amount,
                transaction_type,
                category: category.to_owned(),
                date,
            })
        }
        _ => Err(errors),
    }
}

fn field_error(error_message: Option<&str>) -> Markup {
    html! {
        @if let Some(error_message) = error_message
        {
            p class="text-red-500 text-sm mt-1" { (error_message) }
        }
    }
}

/// The shared input fields of the transaction form.
pub(crate) fn transaction_form_fields(
    values: &TransactionForm,
    errors: &TransactionFormErrors,
) -> Markup {
    let is_income = values.transaction_type == "income";
    let is_expense = !is_income;

    html! {
        div
        {
            label
                for="title"
                class=(FORM_LABEL_STYLE)
            {
                "Title"
            }

            input
                name="title"
                id="title"
                type="text"
                placeholder="Enter expense title"
                value=(values.title)
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors.title))
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                min="0.01"
                placeholder="Enter amount"
                value=(values.amount)
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors.amount))
        }

        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    input
                        name="type"
                        id="transaction-type-expense"
                        type="radio"
                        value="expense"
                        checked[is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-expense"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Expense"
                    }
                }

                div class="flex items-center gap-3"
                {
                    input
                        name="type"
                        id="transaction-type-income"
                        type="radio"
                        value="income"
                        checked[is_income]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-income"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Income"
                    }
                }
            }

            (field_error(errors.transaction_type))
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            input
                name="category"
                id="category"
                type="text"
                placeholder="Enter category"
                value=(values.category)
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors.category))
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(values.date)
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors.date))
        }
    }
}

fn submit_button(label: &str) -> Markup {
    html! {
        button
            type="submit" id="submit-button" tabindex="0"
            class="w-full px-4 py-2 bg-blue-500 dark:bg-blue-600 disabled:bg-blue-700
                hover:enabled:bg-blue-600 hover:enabled:dark:bg-blue-700 text-white rounded"
        {
            span class="inline htmx-indicator" id="indicator"
            {
                (loading_spinner())
            }
            (label)
        }
    }
}

/// The form for creating a transaction. Swapped in place when validation fails.
pub(crate) fn create_transaction_form(
    values: &TransactionForm,
    errors: &TransactionFormErrors,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            class="space-y-4 md:space-y-6"
        {
            (transaction_form_fields(values, errors))
            (submit_button("Add Transaction"))
        }
    }
}

/// The form for editing the transaction `id`. Swapped in place when validation fails.
pub(crate) fn edit_transaction_form(
    id: TransactionId,
    values: &TransactionForm,
    errors: &TransactionFormErrors,
) -> Markup {
    html! {
        form
            hx-put=(endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, id))
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            class="space-y-4 md:space-y-6"
        {
            (transaction_form_fields(values, errors))
            (submit_button("Save Changes"))
        }
    }
}

#[cfg(test)]
mod validate_tests {
    use time::macros::date;

    use crate::transaction::TransactionType;

    use super::{TransactionForm, validate_transaction_form};

    fn valid_form() -> TransactionForm {
        TransactionForm {
            title: "Weekly shop".to_owned(),
            amount: "42.50".to_owned(),
            transaction_type: "expense".to_owned(),
            category: "Groceries".to_owned(),
            date: "2025-10-05".to_owned(),
        }
    }

    #[test]
    fn accepts_valid_form() {
        let new_transaction =
            validate_transaction_form(&valid_form()).expect("want valid form to pass validation");

        assert_eq!(new_transaction.title, "Weekly shop");
        assert_eq!(new_transaction.amount, 42.5);
        assert_eq!(new_transaction.transaction_type, TransactionType::Expense);
        assert_eq!(new_transaction.category, "Groceries");
        assert_eq!(new_transaction.date, date!(2025 - 10 - 05));
    }

    #[test]
    fn rejects_empty_title() {
        let form = TransactionForm {
            title: "   ".to_owned(),
            ..valid_form()
        };

        let errors = validate_transaction_form(&form).unwrap_err();

        assert_eq!(errors.title, Some("Title is required"));
    }

    #[test]
    fn rejects_zero_amount() {
        let form = TransactionForm {
            amount: "0".to_owned(),
            ..valid_form()
        };

        let errors = validate_transaction_form(&form).unwrap_err();

        assert_eq!(errors.amount, Some("Amount must be greater than 0"));
    }

    #[test]
    fn rejects_negative_amount() {
        let form = TransactionForm {
            amount: "-5".to_owned(),
            ..valid_form()
        };

        let errors = validate_transaction_form(&form).unwrap_err();

        assert_eq!(errors.amount, Some("Amount must be greater than 0"));
    }

    #[test]
    fn rejects_non_numeric_amount() {
        let form = TransactionForm {
            amount: "a lot".to_owned(),
            ..valid_form()
        };

        let errors = validate_transaction_form(&form).unwrap_err();

        assert_eq!(errors.amount, Some("Amount must be a number"));
    }

    #[test]
    fn rejects_non_finite_amount() {
        for raw_amount in ["inf", "NaN"] {
            let form = TransactionForm {
                amount: raw_amount.to_owned(),
                ..valid_form()
            };

            let errors = validate_transaction_form(&form).unwrap_err();

            assert_eq!(
                errors.amount,
                Some("Amount must be greater than 0"),
                "want {raw_amount} to be rejected"
            );
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let form = TransactionForm {
            transaction_type: "transfer".to_owned(),
            ..valid_form()
        };

        let errors = validate_transaction_form(&form).unwrap_err();

        assert_eq!(errors.transaction_type, Some("Select a transaction type"));
    }

    #[test]
    fn rejects_empty_category() {
        let form = TransactionForm {
            category: "".to_owned(),
            ..valid_form()
        };

        let errors = validate_transaction_form(&form).unwrap_err();

        assert_eq!(errors.category, Some("Category is required"));
    }

    #[test]
    fn rejects_invalid_date() {
        let form = TransactionForm {
            date: "not-a-date".to_owned(),
            ..valid_form()
        };

        let errors = validate_transaction_form(&form).unwrap_err();

        assert_eq!(errors.date, Some("Please enter a valid date"));
    }

    #[test]
    fn rejects_impossible_date() {
        let form = TransactionForm {
            date: "2025-02-30".to_owned(),
            ..valid_form()
        };

        let errors = validate_transaction_form(&form).unwrap_err();

        assert_eq!(errors.date, Some("Please enter a valid date"));
    }

    #[test]
    fn collects_errors_for_every_invalid_field() {
        let form = TransactionForm {
            title: "".to_owned(),
            amount: "zero".to_owned(),
            transaction_type: "".to_owned(),
            category: "".to_owned(),
            date: "".to_owned(),
        };

        let errors = validate_transaction_form(&form).unwrap_err();

        assert!(errors.title.is_some());
        assert!(errors.amount.is_some());
        assert!(errors.transaction_type.is_some());
        assert!(errors.category.is_some());
        assert!(errors.date.is_some());
    }
}
