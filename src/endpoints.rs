//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/goals/{goal_id}', use [format_endpoint].

/// The route for creating an account.
pub const REGISTER: &str = "/api/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for requesting a password reset token.
pub const FORGOT_PASSWORD: &str = "/api/forgot_password";
/// The route for redeeming a password reset token.
pub const RESET_PASSWORD: &str = "/api/reset_password";

/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to update or delete a category.
pub const CATEGORY: &str = "/api/categories/{category_id}";

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// The route to list and create recurring expenses.
pub const RECURRING_EXPENSES: &str = "/api/recurring_expenses";
/// The route to access a single recurring expense.
pub const RECURRING_EXPENSE: &str = "/api/recurring_expenses/{expense_id}";
/// The route to launch due recurring expenses as transactions.
pub const RECURRING_EXPENSES_LAUNCH: &str = "/api/recurring_expenses/launch";

/// The route to list and create financial goals.
pub const GOALS: &str = "/api/goals";
/// The route to access a single financial goal.
pub const GOAL: &str = "/api/goals/{goal_id}";
/// The route to add a contribution to a goal.
pub const GOAL_CONTRIBUTIONS: &str = "/api/goals/{goal_id}/contributions";
/// The route to remove a contribution from a goal.
pub const GOAL_CONTRIBUTION: &str = "/api/goals/{goal_id}/contributions/{contribution_id}";

/// The route to list and create credit cards.
pub const CARDS: &str = "/api/cards";
/// The route to access a single credit card.
pub const CARD: &str = "/api/cards/{card_id}";
/// The route to list a card's invoices.
pub const CARD_INVOICES: &str = "/api/cards/{card_id}/invoices";
/// The route to access a single invoice.
pub const INVOICE: &str = "/api/invoices/{invoice_id}";
/// The route to register a payment against an invoice.
pub const INVOICE_PAYMENT: &str = "/api/invoices/{invoice_id}/payment";
/// The route to list an invoice's purchases.
pub const INVOICE_PURCHASES: &str = "/api/invoices/{invoice_id}/purchases";

/// The route to create purchases (single or installment plans).
pub const PURCHASES: &str = "/api/purchases";
/// The route to delete a purchase.
pub const PURCHASE: &str = "/api/purchases/{purchase_id}";

/// The route to list and create transaction templates.
pub const TEMPLATES: &str = "/api/templates";
/// The route to access a single template.
pub const TEMPLATE: &str = "/api/templates/{template_id}";
/// The route to apply a template, bumping its usage count.
pub const TEMPLATE_USE: &str = "/api/templates/{template_id}/use";

/// The route to create feedback, and for admins to list all feedback.
pub const FEEDBACK: &str = "/api/feedback";
/// The route for admins to update a feedback item's status.
pub const FEEDBACK_STATUS: &str = "/api/feedback/{feedback_id}/status";
/// The route to upload a feedback attachment image.
pub const FEEDBACK_ATTACHMENTS: &str = "/api/feedback/attachments";

/// The route to list and create investments.
pub const INVESTMENTS: &str = "/api/investments";
/// The route to delete an investment.
pub const INVESTMENT: &str = "/api/investments/{investment_id}";
/// The route to refresh investment quotes.
pub const INVESTMENTS_REFRESH: &str = "/api/investments/refresh";

/// The route for the emergency fund suggestion report.
pub const EMERGENCY_FUND_REPORT: &str = "/api/reports/emergency_fund";

/// The route prefix for serving uploaded files.
pub const UPLOADS: &str = "/uploads";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/goals/{goal_id}', '{goal_id}' is
/// the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::REGISTER);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::FORGOT_PASSWORD);
        assert_endpoint_is_valid_uri(endpoints::RESET_PASSWORD);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::RECURRING_EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::RECURRING_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::RECURRING_EXPENSES_LAUNCH);
        assert_endpoint_is_valid_uri(endpoints::GOALS);
        assert_endpoint_is_valid_uri(endpoints::GOAL);
        assert_endpoint_is_valid_uri(endpoints::GOAL_CONTRIBUTIONS);
        assert_endpoint_is_valid_uri(endpoints::GOAL_CONTRIBUTION);
        assert_endpoint_is_valid_uri(endpoints::CARDS);
        assert_endpoint_is_valid_uri(endpoints::CARD);
        assert_endpoint_is_valid_uri(endpoints::CARD_INVOICES);
        assert_endpoint_is_valid_uri(endpoints::INVOICE);
        assert_endpoint_is_valid_uri(endpoints::INVOICE_PAYMENT);
        assert_endpoint_is_valid_uri(endpoints::INVOICE_PURCHASES);
        assert_endpoint_is_valid_uri(endpoints::PURCHASES);
        assert_endpoint_is_valid_uri(endpoints::PURCHASE);
        assert_endpoint_is_valid_uri(endpoints::TEMPLATES);
        assert_endpoint_is_valid_uri(endpoints::TEMPLATE);
        assert_endpoint_is_valid_uri(endpoints::TEMPLATE_USE);
        assert_endpoint_is_valid_uri(endpoints::FEEDBACK);
        assert_endpoint_is_valid_uri(endpoints::FEEDBACK_STATUS);
        assert_endpoint_is_valid_uri(endpoints::FEEDBACK_ATTACHMENTS);
        assert_endpoint_is_valid_uri(endpoints::INVESTMENTS);
        assert_endpoint_is_valid_uri(endpoints::INVESTMENT);
        assert_endpoint_is_valid_uri(endpoints::INVESTMENTS_REFRESH);
        assert_endpoint_is_valid_uri(endpoints::EMERGENCY_FUND_REPORT);
        assert_endpoint_is_valid_uri(endpoints::UPLOADS);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
