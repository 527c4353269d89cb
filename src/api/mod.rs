//! Thin HTTP layer over the Twelve Data REST API.
//!
//! Every call goes through [`TwelveDataClient::get`], which appends the API
//! key, checks the HTTP status, and rejects vendor error bodies before any
//! mapping happens. No retries, no caching.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Settings;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("api returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("api error {code}: {message}")]
    Vendor { code: i64, message: String },
    #[error("failed to decode api response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub struct TwelveDataClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TwelveDataClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    /// Perform a GET against one endpoint and return the decoded JSON body.
    pub async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} with {} params", url, params.len());

        let resp = self
            .http
            .get(&url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unable to read body".to_string());
            warn!("API returned error status {} for {}: {}", status, endpoint, body);
            return Err(ApiError::Status { status, body });
        }

        let raw = resp.bytes().await?;
        let value: Value = serde_json::from_slice(&raw).map_err(|e| {
            let preview = String::from_utf8_lossy(&raw[..raw.len().min(500)]);
            warn!("Failed to decode {} response: {}; body preview: {}", endpoint, e, preview);
            e
        })?;

        if let Some(err) = vendor_error(&value) {
            warn!("API reported error for {}: {}", endpoint, err);
            return Err(err);
        }

        Ok(value)
    }

    // --- Quotes and price history ---

    pub async fn quote(&self, symbols: &[String]) -> Result<Value, ApiError> {
        self.get("quote", &[("symbol", symbols.join(","))]).await
    }

    pub async fn time_series(
        &self,
        symbol: &str,
        interval: &str,
        outputsize: u32,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut params = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("outputsize", outputsize.to_string()),
        ];
        if let Some(start) = start_date {
            params.push(("start_date", start.to_string()));
        }
        if let Some(end) = end_date {
            params.push(("end_date", end.to_string()));
        }
        self.get("time_series", &params).await
    }

    /// Daily ranking of the biggest stock moves; `direction` is
    /// `gainers` or `losers`.
    pub async fn market_movers(&self, direction: &str, outputsize: u32) -> Result<Value, ApiError> {
        self.get(
            "market_movers/stocks",
            &[
                ("direction", direction.to_string()),
                ("outputsize", outputsize.to_string()),
            ],
        )
        .await
    }

    pub async fn earliest_timestamp(&self, symbol: &str, interval: &str) -> Result<Value, ApiError> {
        self.get(
            "earliest_timestamp",
            &[("symbol", symbol.to_string()), ("interval", interval.to_string())],
        )
        .await
    }

    // --- Reference data ---

    pub async fn stocks(&self, filters: &ListFilters) -> Result<Value, ApiError> {
        self.get("stocks", &filters.params()).await
    }

    pub async fn symbol_search(&self, query: &str) -> Result<Value, ApiError> {
        self.get("symbol_search", &[("symbol", query.to_string())])
            .await
    }

    pub async fn cross_listings(&self, symbol: &str) -> Result<Value, ApiError> {
        self.get("cross_listings", &[("symbol", symbol.to_string())])
            .await
    }

    pub async fn exchanges(&self, filters: &ListFilters) -> Result<Value, ApiError> {
        self.get("exchanges", &filters.params()).await
    }

    pub async fn exchange_schedule(
        &self,
        exchange: &str,
        date: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut params = vec![("exchange", exchange.to_string())];
        if let Some(date) = date {
            params.push(("date", date.to_string()));
        }
        self.get("exchange_schedule", &params).await
    }

    pub async fn instrument_types(&self) -> Result<Value, ApiError> {
        self.get("instrument_type", &[]).await
    }

    // --- Forex and crypto ---

    pub async fn forex_pairs(&self, filters: &ListFilters) -> Result<Value, ApiError> {
        self.get("forex_pairs", &filters.params()).await
    }

    pub async fn currencies(&self) -> Result<Value, ApiError> {
        self.get("currencies", &[]).await
    }

    pub async fn exchange_rate(&self, symbol: &str) -> Result<Value, ApiError> {
        self.get("exchange_rate", &[("symbol", symbol.to_string())])
            .await
    }

    pub async fn cryptocurrencies(&self, filters: &ListFilters) -> Result<Value, ApiError> {
        self.get("cryptocurrencies", &filters.params()).await
    }

    pub async fn crypto_exchanges(&self) -> Result<Value, ApiError> {
        self.get("cryptocurrency_exchanges", &[]).await
    }

    // --- Funds, bonds, ETFs, commodities ---

    pub async fn funds(&self, filters: &ListFilters) -> Result<Value, ApiError> {
        self.get("funds", &filters.params()).await
    }

    pub async fn mutual_funds(&self, filters: &ListFilters) -> Result<Value, ApiError> {
        self.get("mutual_funds/list", &filters.params()).await
    }

    pub async fn mutual_fund_profile(&self, symbol: &str) -> Result<Value, ApiError> {
        self.get("mutual_funds/world", &[("symbol", symbol.to_string())])
            .await
    }

    pub async fn bonds(&self, filters: &ListFilters) -> Result<Value, ApiError> {
        self.get("bonds", &filters.params()).await
    }

    pub async fn etfs(&self, filters: &ListFilters) -> Result<Value, ApiError> {
        self.get("etfs/list", &filters.params()).await
    }

    pub async fn etf_profile(&self, symbol: &str) -> Result<Value, ApiError> {
        self.get("etfs/world", &[("symbol", symbol.to_string())])
            .await
    }

    pub async fn commodities(&self, filters: &ListFilters) -> Result<Value, ApiError> {
        self.get("commodities", &filters.params()).await
    }

    // --- Corporate actions ---

    pub async fn dividends(
        &self,
        symbol: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut params = vec![("symbol", symbol.to_string())];
        if let Some(start) = start_date {
            params.push(("start_date", start.to_string()));
        }
        if let Some(end) = end_date {
            params.push(("end_date", end.to_string()));
        }
        self.get("dividends", &params).await
    }

    pub async fn dividends_calendar(
        &self,
        start_date: &str,
        end_date: &str,
        exchange: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut params = vec![
            ("start_date", start_date.to_string()),
            ("end_date", end_date.to_string()),
        ];
        if let Some(exchange) = exchange {
            params.push(("exchange", exchange.to_string()));
        }
        self.get("dividends_calendar", &params).await
    }

    pub async fn splits(
        &self,
        symbol: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut params = vec![("symbol", symbol.to_string())];
        if let Some(start) = start_date {
            params.push(("start_date", start.to_string()));
        }
        if let Some(end) = end_date {
            params.push(("end_date", end.to_string()));
        }
        self.get("splits", &params).await
    }

    pub async fn splits_calendar(
        &self,
        start_date: &str,
        end_date: &str,
        exchange: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut params = vec![
            ("start_date", start_date.to_string()),
            ("end_date", end_date.to_string()),
        ];
        if let Some(exchange) = exchange {
            params.push(("exchange", exchange.to_string()));
        }
        self.get("splits_calendar", &params).await
    }

    // --- Fundamentals ---

    pub async fn income_statement(
        &self,
        symbol: &str,
        period: &str,
        outputsize: u32,
    ) -> Result<Value, ApiError> {
        self.statement("income_statement", symbol, period, outputsize)
            .await
    }

    pub async fn balance_sheet(
        &self,
        symbol: &str,
        period: &str,
        outputsize: u32,
    ) -> Result<Value, ApiError> {
        self.statement("balance_sheet", symbol, period, outputsize)
            .await
    }

    pub async fn cash_flow(
        &self,
        symbol: &str,
        period: &str,
        outputsize: u32,
    ) -> Result<Value, ApiError> {
        self.statement("cash_flow", symbol, period, outputsize).await
    }

    async fn statement(
        &self,
        endpoint: &str,
        symbol: &str,
        period: &str,
        outputsize: u32,
    ) -> Result<Value, ApiError> {
        self.get(
            endpoint,
            &[
                ("symbol", symbol.to_string()),
                ("period", period.to_string()),
                ("outputsize", outputsize.to_string()),
            ],
        )
        .await
    }

    // --- Analyst data ---

    pub async fn analyst_estimates(&self, symbol: &str) -> Result<Value, ApiError> {
        self.get("analyst_estimates", &[("symbol", symbol.to_string())])
            .await
    }

    pub async fn recommendations(&self, symbol: &str) -> Result<Value, ApiError> {
        self.get("recommendations", &[("symbol", symbol.to_string())])
            .await
    }

    pub async fn price_target(&self, symbol: &str) -> Result<Value, ApiError> {
        self.get("price_target", &[("symbol", symbol.to_string())])
            .await
    }

    pub async fn eps_revisions(&self, symbol: &str) -> Result<Value, ApiError> {
        self.get("eps_revisions", &[("symbol", symbol.to_string())])
            .await
    }

    pub async fn growth_estimates(&self, symbol: &str) -> Result<Value, ApiError> {
        self.get("growth_estimates", &[("symbol", symbol.to_string())])
            .await
    }

    // --- Company data ---

    pub async fn market_cap(
        &self,
        symbol: &str,
        interval: Option<&str>,
        outputsize: Option<u32>,
    ) -> Result<Value, ApiError> {
        let mut params = vec![("symbol", symbol.to_string())];
        if let Some(interval) = interval {
            params.push(("interval", interval.to_string()));
        }
        if let Some(outputsize) = outputsize {
            params.push(("outputsize", outputsize.to_string()));
        }
        self.get("market_cap", &params).await
    }

    pub async fn profile(&self, symbol: &str) -> Result<Value, ApiError> {
        self.get("profile", &[("symbol", symbol.to_string())]).await
    }

    pub async fn executives(&self, symbol: &str) -> Result<Value, ApiError> {
        self.get("executives", &[("symbol", symbol.to_string())])
            .await
    }
}

/// Common listing filters shared by the reference-data endpoints.
#[derive(Debug, Default, Clone)]
pub struct ListFilters {
    pub symbol: Option<String>,
    pub exchange: Option<String>,
    pub instrument_type: Option<String>,
    pub country: Option<String>,
    pub currency_base: Option<String>,
    pub currency_quote: Option<String>,
}

impl ListFilters {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(v) = &self.symbol {
            params.push(("symbol", v.clone()));
        }
        if let Some(v) = &self.exchange {
            params.push(("exchange", v.clone()));
        }
        if let Some(v) = &self.instrument_type {
            params.push(("type", v.clone()));
        }
        if let Some(v) = &self.country {
            params.push(("country", v.clone()));
        }
        if let Some(v) = &self.currency_base {
            params.push(("currency_base", v.clone()));
        }
        if let Some(v) = &self.currency_quote {
            params.push(("currency_quote", v.clone()));
        }
        params
    }
}

fn vendor_error(value: &Value) -> Option<ApiError> {
    let obj = value.as_object()?;
    if obj.get("status").and_then(Value::as_str) != Some("error") {
        return None;
    }
    Some(ApiError::Vendor {
        code: obj.get("code").and_then(Value::as_i64).unwrap_or(0),
        message: obj
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown api error")
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_vendor_error_body() {
        let body = json!({"status": "error", "code": 401, "message": "Invalid API key"});
        match vendor_error(&body) {
            Some(ApiError::Vendor { code, message }) => {
                assert_eq!(code, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("expected vendor error, got {:?}", other),
        }
    }

    #[test]
    fn accepts_ok_body() {
        assert!(vendor_error(&json!({"status": "ok", "values": []})).is_none());
        assert!(vendor_error(&json!([{"symbol": "AAPL"}])).is_none());
    }

    #[test]
    fn list_filters_emit_only_set_params() {
        let filters = ListFilters {
            exchange: Some("NASDAQ".into()),
            country: Some("United States".into()),
            ..Default::default()
        };
        let params = filters.params();
        assert_eq!(params.len(), 2);
        assert!(params.contains(&("exchange", "NASDAQ".to_string())));
        assert!(params.contains(&("country", "United States".to_string())));
    }
}
