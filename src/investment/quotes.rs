//! Market quote retrieval and the refresh batch.

use std::{collections::HashMap, sync::Mutex};

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    investment::{InvestmentId, update_investment_price},
};

/// Fetches the latest price for a ticker symbol.
///
/// Implementations are blocking; handlers call them through
/// `tokio::task::spawn_blocking`.
pub trait QuoteProvider: Send + Sync {
    /// Return the symbol's latest market price.
    fn quote(&self, symbol: &str) -> Result<f64, Error>;
}

/// A [QuoteProvider] backed by Yahoo Finance's public quote API.
pub struct YahooQuoteProvider {
    client: reqwest::blocking::Client,
}

impl YahooQuoteProvider {
    const QUOTE_URL: &'static str = "https://query1.finance.yahoo.com/v7/finance/quote";

    /// Create a provider with its own HTTP client.
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for YahooQuoteProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteProvider for YahooQuoteProvider {
    fn quote(&self, symbol: &str) -> Result<f64, Error> {
        let response: serde_json::Value = self
            .client
            .get(Self::QUOTE_URL)
            .query(&[("symbols", symbol)])
            .send()
            .map_err(|error| Error::QuoteProvider(error.to_string()))?
            .error_for_status()
            .map_err(|error| Error::QuoteProvider(error.to_string()))?
            .json()
            .map_err(|error| Error::QuoteProvider(error.to_string()))?;

        response["quoteResponse"]["result"][0]["regularMarketPrice"]
            .as_f64()
            .ok_or_else(|| {
                Error::QuoteProvider(format!("no market price in the response for {symbol}"))
            })
    }
}

/// The result of a refresh batch.
#[derive(Debug, Serialize)]
pub struct RefreshOutcome {
    /// Positions whose price was refreshed.
    pub updated: usize,
    /// Positions the provider could not quote this time.
    pub failed: usize,
}

/// Refresh the stored quote for every position, across all users.
///
/// Refreshing is a caller-initiated job (a cron hitting the route), not a
/// per-user action, so it takes the mutexed connection itself: the lock is
/// held to read the positions and again to write the prices back, never
/// across a provider call. Each distinct symbol is quoted once. A provider
/// failure on one symbol is logged and counted; it does not abort the rest
/// of the batch.
pub fn refresh_quotes(
    provider: &dyn QuoteProvider,
    db_connection: &Mutex<Connection>,
) -> Result<RefreshOutcome, Error> {
    let positions: Vec<(InvestmentId, String)> = {
        let connection = db_connection.lock().map_err(|_| Error::DatabaseLock)?;

        connection
            .prepare("SELECT id, symbol FROM investment")?
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_, rusqlite::Error>>()?
    };

    let mut prices: HashMap<String, Option<f64>> = HashMap::new();

    for (_, symbol) in &positions {
        if prices.contains_key(symbol) {
            continue;
        }

        let price = match provider.quote(symbol) {
            Ok(price) => Some(price),
            Err(error) => {
                tracing::warn!("could not refresh {}: {}", symbol, error);
                None
            }
        };
        prices.insert(symbol.clone(), price);
    }

    let connection = db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let mut outcome = RefreshOutcome {
        updated: 0,
        failed: 0,
    };

    // A position deleted while the provider was running misses its write;
    // the update matches no row.
    for (investment_id, symbol) in positions {
        match prices.get(&symbol).copied().flatten() {
            Some(price) => {
                update_investment_price(investment_id, price, &connection)?;
                outcome.updated += 1;
            }
            None => outcome.failed += 1,
        }
    }

    Ok(outcome)
}
