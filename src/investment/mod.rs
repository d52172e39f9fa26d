//! Investment positions and market quote refresh.

mod db;
mod domain;
mod endpoints;
mod quotes;

pub use db::{
    create_investment, create_investment_table, delete_investment, get_investment,
    list_investments, update_investment_price,
};
pub use domain::{Investment, InvestmentData, InvestmentId};
pub use endpoints::{
    create_investment_endpoint, delete_investment_endpoint, list_investments_endpoint,
    refresh_quotes_endpoint,
};
pub use quotes::{QuoteProvider, RefreshOutcome, YahooQuoteProvider, refresh_quotes};
