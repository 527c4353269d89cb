//! Typed domain records built from vendor JSON.
//!
//! Every record family exposes a `from_response` constructor that takes a
//! `serde_json::Value` and coerces loosely typed fields (numbers as strings,
//! missing keys, vendor quirks) into a fixed shape. Item-level parse
//! failures fall back to `None`/defaults with a warning; only structurally
//! required fields reject the whole record.

pub mod balance_sheet;
pub mod bond;
pub mod cash_flow;
pub mod commodity;
pub mod company;
pub mod crypto;
pub mod dividend;
pub mod eps_revisions;
pub mod estimates;
pub mod etf;
pub mod executives;
pub mod field;
pub mod forex;
pub mod fund;
pub mod growth;
pub mod income_statement;
pub mod market_cap;
pub mod movers;
pub mod quote;
pub mod recommendations;
pub mod split;
pub mod statement;
pub mod symbol;
pub mod time_series;

pub use balance_sheet::BalanceSheet;
pub use bond::Bond;
pub use cash_flow::CashFlow;
pub use commodity::{CommodityGroup, CommodityPair};
pub use company::CompanyProfile;
pub use crypto::{CryptoExchange, CryptoPair};
pub use dividend::{Dividend, DividendCalendar, DividendCalendarEvent, DividendHistory};
pub use eps_revisions::EpsRevisions;
pub use estimates::{AnalystEstimates, AnalystTarget};
pub use etf::{Etf, EtfSortKey};
pub use executives::{CompensationSummary, Executive, ManagementTeam};
pub use forex::{Currency, ExchangeRate, ForexPair};
pub use fund::{Fund, MutualFundProfile};
pub use growth::GrowthEstimates;
pub use income_statement::IncomeStatement;
pub use market_cap::{MarketCapHistory, MarketCapPoint};
pub use movers::MarketMover;
pub use quote::{Quote, QuoteBatch};
pub use recommendations::{AnalystConsensus, AnalystRecommendations};
pub use split::{SplitCalendarEvent, SplitHistory, SplitsCalendar, StockSplit};
pub use symbol::{Exchange, ExchangeSchedule, InstrumentType, Symbol};
pub use time_series::{EarliestTimestamp, TimeSeries, TimeSeriesBar};

/// Error for response shapes the mappers cannot recover from.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(&'static str),
}
