//! Application router configuration with protected and unprotected route definitions.

use std::path::Path;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::json;
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, post_forgot_password, post_log_in, post_log_out, post_reset_password,
        register_user,
    },
    card::{
        create_card_endpoint, delete_card_endpoint, get_card_endpoint, list_cards_endpoint,
        update_card_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
        update_category_endpoint,
    },
    endpoints,
    feedback::{
        create_feedback_endpoint, list_feedback_endpoint, update_feedback_status_endpoint,
        upload_attachment_endpoint,
    },
    goal::{
        add_contribution_endpoint, create_goal_endpoint, delete_goal_endpoint, get_goal_endpoint,
        list_contributions_endpoint, list_goals_endpoint, remove_contribution_endpoint,
        update_goal_endpoint,
    },
    investment::{
        create_investment_endpoint, delete_investment_endpoint, list_investments_endpoint,
        refresh_quotes_endpoint,
    },
    invoice::{
        get_invoice_endpoint, list_card_invoices_endpoint, list_invoice_purchases_endpoint,
        pay_invoice_endpoint,
    },
    purchase::{create_purchase_endpoint, delete_purchase_endpoint},
    recurring::{
        create_recurring_expense_endpoint, delete_recurring_expense_endpoint,
        launch_recurring_expenses_endpoint, list_recurring_expenses_endpoint,
        update_recurring_expense_endpoint,
    },
    report::get_emergency_fund_endpoint,
    template::{
        create_template_endpoint, delete_template_endpoint, list_templates_endpoint,
        update_template_endpoint, use_template_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// `upload_dir` is the directory feedback attachments are written to; it is
/// served read-only under [endpoints::UPLOADS].
pub fn build_router(state: AppState, upload_dir: &Path) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(endpoints::FORGOT_PASSWORD, post(post_forgot_password))
        .route(endpoints::RESET_PASSWORD, post(post_reset_password))
        // A cron-style job route, not a per-user action.
        .route(endpoints::INVESTMENTS_REFRESH, post(refresh_quotes_endpoint));

    let protected_routes = Router::new()
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::RECURRING_EXPENSES,
            get(list_recurring_expenses_endpoint).post(create_recurring_expense_endpoint),
        )
        .route(
            endpoints::RECURRING_EXPENSES_LAUNCH,
            post(launch_recurring_expenses_endpoint),
        )
        .route(
            endpoints::RECURRING_EXPENSE,
            put(update_recurring_expense_endpoint).delete(delete_recurring_expense_endpoint),
        )
        .route(
            endpoints::GOALS,
            get(list_goals_endpoint).post(create_goal_endpoint),
        )
        .route(
            endpoints::GOAL,
            get(get_goal_endpoint)
                .put(update_goal_endpoint)
                .delete(delete_goal_endpoint),
        )
        .route(
            endpoints::GOAL_CONTRIBUTIONS,
            get(list_contributions_endpoint).post(add_contribution_endpoint),
        )
        .route(
            endpoints::GOAL_CONTRIBUTION,
            delete(remove_contribution_endpoint),
        )
        .route(
            endpoints::CARDS,
            get(list_cards_endpoint).post(create_card_endpoint),
        )
        .route(
            endpoints::CARD,
            get(get_card_endpoint)
                .put(update_card_endpoint)
                .delete(delete_card_endpoint),
        )
        .route(endpoints::CARD_INVOICES, get(list_card_invoices_endpoint))
        .route(endpoints::INVOICE, get(get_invoice_endpoint))
        .route(endpoints::INVOICE_PAYMENT, post(pay_invoice_endpoint))
        .route(
            endpoints::INVOICE_PURCHASES,
            get(list_invoice_purchases_endpoint),
        )
        .route(endpoints::PURCHASES, post(create_purchase_endpoint))
        .route(endpoints::PURCHASE, delete(delete_purchase_endpoint))
        .route(
            endpoints::TEMPLATES,
            get(list_templates_endpoint).post(create_template_endpoint),
        )
        .route(
            endpoints::TEMPLATE,
            put(update_template_endpoint).delete(delete_template_endpoint),
        )
        .route(endpoints::TEMPLATE_USE, post(use_template_endpoint))
        .route(
            endpoints::FEEDBACK,
            get(list_feedback_endpoint).post(create_feedback_endpoint),
        )
        .route(
            endpoints::FEEDBACK_STATUS,
            put(update_feedback_status_endpoint),
        )
        .route(
            endpoints::FEEDBACK_ATTACHMENTS,
            post(upload_attachment_endpoint),
        )
        .route(
            endpoints::INVESTMENTS,
            get(list_investments_endpoint).post(create_investment_endpoint),
        )
        .route(endpoints::INVESTMENT, delete(delete_investment_endpoint))
        .route(
            endpoints::EMERGENCY_FUND_REPORT,
            get(get_emergency_fund_endpoint),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::UPLOADS, ServeDir::new(upload_dir))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The JSON body returned for requests that match no route.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "the requested resource could not be found" })),
    )
        .into_response()
}


#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState, Error, LocalObjectStore, LogMailSender, PaginationConfig, QuoteProvider,
        endpoints::{self, format_endpoint},
    };

    use super::build_router;

    struct NoQuotes;

    impl QuoteProvider for NoQuotes {
        fn quote(&self, _symbol: &str) -> Result<f64, Error> {
            Err(Error::QuoteProvider("offline".to_owned()))
        }
    }

    fn get_test_server() -> TestServer {
        let upload_dir = tempfile::tempdir().unwrap().keep();
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            PaginationConfig::default(),
            Arc::new(LocalObjectStore::new(&upload_dir, "/uploads")),
            Arc::new(LogMailSender),
            Arc::new(NoQuotes),
        )
        .unwrap();

        TestServer::new(build_router(state, &upload_dir))
    }

    #[tokio::test]
    async fn protected_routes_require_a_session() {
        let server = get_test_server();

        let response = server.get(endpoints::GOALS).await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn quote_refresh_does_not_require_a_session() {
        let server = get_test_server();

        let response = server.post(endpoints::INVESTMENTS_REFRESH).await;

        response.assert_status_ok();
        let outcome: Value = response.json();
        assert_eq!(outcome["updated"], 0);
    }

    #[tokio::test]
    async fn register_log_in_and_round_trip_a_goal() {
        let server = get_test_server();
        let credentials = json!({ "email": "foo@bar.baz", "password": "averysafepassword" });

        server
            .post(endpoints::REGISTER)
            .json(&credentials)
            .await
            .assert_status(axum::http::StatusCode::CREATED);
        let log_in_response = server.post(endpoints::LOG_IN).json(&credentials).await;
        log_in_response.assert_status_ok();
        let session_cookies = log_in_response.cookies();

        let create_response = server
            .post(endpoints::GOALS)
            .add_cookies(session_cookies.clone())
            .json(&json!({ "name": "Trip", "category": "Lazer", "target_value": 1000.0 }))
            .await;
        create_response.assert_status(axum::http::StatusCode::CREATED);
        let goal: Value = create_response.json();
        let goal_id = goal["id"].as_i64().unwrap();

        let get_response = server
            .get(&format_endpoint(endpoints::GOAL, goal_id))
            .add_cookies(session_cookies)
            .await;

        get_response.assert_status_ok();
        let fetched: Value = get_response.json();
        assert_eq!(fetched["name"], "Trip");
        assert_eq!(fetched["current_value"], 0.0);
    }
}
