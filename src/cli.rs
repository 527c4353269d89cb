//! Command-line surface. Every leaf command carries the shared export
//! flags; listing commands share the filter flags.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::export::ExportArgs;
use crate::models::EtfSortKey;

#[derive(Debug, Parser)]
#[command(
    name = "stock-cli",
    version,
    about = "Market data client for the Twelve Data API"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Real-time quotes for one or more symbols
    Quote(QuoteArgs),
    /// Today's top gaining stocks
    Gainers(MoversArgs),
    /// Today's top losing stocks
    Losers(MoversArgs),
    /// Historical OHLCV bars for a symbol
    TimeSeries(TimeSeriesArgs),
    /// First available bar for a symbol and interval
    EarliestData(EarliestDataArgs),
    /// Symbol and exchange reference data
    Symbols {
        #[command(subcommand)]
        command: SymbolsCommand,
    },
    /// Foreign exchange pairs and rates
    Forex {
        #[command(subcommand)]
        command: ForexCommand,
    },
    /// Cryptocurrency pairs and venues
    Crypto {
        #[command(subcommand)]
        command: CryptoCommand,
    },
    /// Fund listings and mutual fund profiles
    Funds {
        #[command(subcommand)]
        command: FundsCommand,
    },
    /// Bond listings
    Bonds {
        #[command(subcommand)]
        command: BondsCommand,
    },
    /// ETF listings and profiles
    Etfs {
        #[command(subcommand)]
        command: EtfsCommand,
    },
    /// Commodity pairs and groups
    Commodities {
        #[command(subcommand)]
        command: CommoditiesCommand,
    },
    /// Dividend history and calendar
    Dividends {
        #[command(subcommand)]
        command: DividendsCommand,
    },
    /// Stock split history and calendar
    Splits {
        #[command(subcommand)]
        command: SplitsCommand,
    },
    /// Financial statements
    Statements {
        #[command(subcommand)]
        command: StatementsCommand,
    },
    /// Analyst estimates, recommendations and revisions
    Analysts {
        #[command(subcommand)]
        command: AnalystsCommand,
    },
    /// Market capitalization history and trends
    MarketCap {
        #[command(subcommand)]
        command: MarketCapCommand,
    },
    /// Company profile for a symbol
    Profile(SymbolArgs),
    /// Company executives and compensation
    Executives {
        #[command(subcommand)]
        command: ExecutivesCommand,
    },
}

#[derive(Debug, Args)]
pub struct MoversArgs {
    /// Keep only stocks on this exchange
    #[arg(short = 'e', long)]
    pub exchange: Option<String>,
    /// Maximum stocks to display
    #[arg(short = 'l', long, default_value_t = 10)]
    pub limit: usize,
    #[command(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Subcommand)]
pub enum MarketCapCommand {
    /// Market capitalization history for a symbol
    History(SymbolArgs),
    /// Short-term vs long-term market cap trends
    Compare {
        /// Ticker symbol
        symbol: String,
        /// Number of daily data points
        #[arg(short = 'd', long, default_value_t = 30)]
        daily_count: u32,
        /// Number of monthly data points
        #[arg(short = 'm', long, default_value_t = 24)]
        monthly_count: u32,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum ExecutivesCommand {
    /// List the executives of a company
    List {
        /// Ticker symbol
        symbol: String,
        /// One key/value block per executive with biographies
        #[arg(short = 'd', long)]
        detailed: bool,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Profile of one executive, picked by name or position
    Profile {
        /// Ticker symbol
        symbol: String,
        /// Executive name to search for (partial match)
        #[arg(long)]
        name: Option<String>,
        /// Position to search for, e.g. CEO
        #[arg(long)]
        position: Option<String>,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Compensation statistics for the management team
    Compensation(SymbolArgs),
}

/// Filters shared by the reference listing commands.
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Filter by exchange
    #[arg(short = 'e', long)]
    pub exchange: Option<String>,
    /// Filter by instrument type
    #[arg(short = 't', long = "type")]
    pub instrument_type: Option<String>,
    /// Filter by country
    #[arg(short = 'c', long)]
    pub country: Option<String>,
    /// Keep only rows whose symbol or name contains this text
    #[arg(short = 's', long)]
    pub search: Option<String>,
    /// Maximum rows to display, 0 shows everything
    #[arg(short = 'l', long, default_value_t = 100)]
    pub limit: usize,
}

/// Base/quote currency filters for pair listings.
#[derive(Debug, Clone, Args)]
pub struct PairFilterArgs {
    /// Filter by base currency
    #[arg(short = 'b', long)]
    pub base: Option<String>,
    /// Filter by quote currency
    #[arg(short = 'q', long)]
    pub quote: Option<String>,
    /// Keep only rows whose symbol contains this text
    #[arg(short = 's', long)]
    pub search: Option<String>,
    /// Maximum rows to display, 0 shows everything
    #[arg(short = 'l', long, default_value_t = 100)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct SymbolArgs {
    /// Ticker symbol
    pub symbol: String,
    #[command(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// One or more ticker symbols
    #[arg(required = true)]
    pub symbols: Vec<String>,
    /// Show the full field set for each symbol
    #[arg(short = 'd', long)]
    pub detailed: bool,
    /// Refresh continuously until Ctrl-C
    #[arg(short = 'r', long)]
    pub refresh: bool,
    /// Refresh interval in seconds
    #[arg(short = 'i', long, default_value_t = 10)]
    pub interval: u64,
    #[command(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Args)]
pub struct TimeSeriesArgs {
    /// Ticker symbol
    pub symbol: String,
    /// Bar interval, e.g. 1min, 1h, 1day, 1week
    #[arg(long, default_value = "1day")]
    pub interval: String,
    /// Number of bars to request
    #[arg(long, default_value_t = 30)]
    pub outputsize: u32,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
    /// Bar ordering in the output
    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,
    /// Maximum bars to display, 0 shows everything
    #[arg(short = 'l', long, default_value_t = 0)]
    pub limit: usize,
    #[command(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Args)]
pub struct EarliestDataArgs {
    /// Ticker symbol
    pub symbol: String,
    /// Bar interval
    #[arg(long, default_value = "1day")]
    pub interval: String,
    #[command(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Subcommand)]
pub enum SymbolsCommand {
    /// List tradable symbols
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Search symbols by ticker or name
    Search {
        /// Search text
        query: String,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// List exchanges
    Exchanges {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Venue details for one exchange
    ExchangeDetails {
        /// Exchange code, e.g. NASDAQ
        exchange: String,
        /// Date to query (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Trading sessions for one exchange
    TradingHours {
        /// Exchange code, e.g. NASDAQ
        exchange: String,
        /// Date to query (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// List instrument types
    InstrumentTypes {
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Other venues where a symbol is listed
    CrossList {
        /// Ticker symbol
        symbol: String,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum ForexCommand {
    /// List forex pairs
    Pairs {
        #[command(flatten)]
        filters: PairFilterArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// List physical currencies
    Currencies {
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Spot rate for one pair
    Rate {
        /// Currency pair, e.g. EUR/USD
        symbol: String,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum CryptoCommand {
    /// List cryptocurrency pairs
    List {
        #[command(flatten)]
        filters: PairFilterArgs,
        /// Keep only pairs traded on this exchange
        #[arg(short = 'e', long)]
        exchange: Option<String>,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// List cryptocurrency exchanges
    Exchanges {
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum FundsCommand {
    /// List funds of all types
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// List mutual funds
    Mutual {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Full profile for one mutual fund
    Profile {
        /// Fund symbol
        symbol: String,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum BondsCommand {
    /// List bonds
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// One key/value block per bond instead of a table
        #[arg(short = 'd', long)]
        detailed: bool,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// List government bonds only
    Government {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// List corporate bonds only
    Corporate {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Distinct bond types with counts
    Types {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum EtfsCommand {
    /// List ETFs
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Sort the listing by this column
        #[arg(long, value_enum)]
        sort_by: Option<EtfSortKey>,
        /// Sort descending instead of ascending
        #[arg(long)]
        descending: bool,
        /// One key/value block per ETF instead of a table
        #[arg(short = 'd', long)]
        detailed: bool,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Full profile for one ETF
    Info {
        /// ETF symbol
        symbol: String,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum CommoditiesCommand {
    /// List commodity pairs
    List {
        /// Keep only pairs in this group
        #[arg(short = 'g', long)]
        group: Option<String>,
        /// Keep only rows whose symbol contains this text
        #[arg(short = 's', long)]
        search: Option<String>,
        /// Maximum rows to display, 0 shows everything
        #[arg(short = 'l', long, default_value_t = 100)]
        limit: usize,
        /// One key/value block per pair instead of a table
        #[arg(short = 'd', long)]
        detailed: bool,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// The known commodity groups
    Groups {
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Precious metals pairs
    PreciousMetals {
        #[arg(short = 'l', long, default_value_t = 100)]
        limit: usize,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Energy pairs
    Energy {
        #[arg(short = 'l', long, default_value_t = 100)]
        limit: usize,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Agriculture pairs
    Agriculture {
        #[arg(short = 'l', long, default_value_t = 100)]
        limit: usize,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum DividendsCommand {
    /// Dividend history for one symbol
    History {
        /// Ticker symbol
        symbol: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Upcoming dividend events
    Calendar {
        /// Start date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD), defaults to 30 days out
        #[arg(long)]
        end: Option<String>,
        /// Keep only events on this exchange
        #[arg(short = 'e', long)]
        exchange: Option<String>,
        /// Keep only events for this symbol
        #[arg(short = 's', long)]
        symbol: Option<String>,
        /// Group the listing by date or by symbol
        #[arg(long, value_enum, default_value_t = CalendarGrouping::Date)]
        group_by: CalendarGrouping,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Compare dividend history across symbols
    Compare {
        /// Two or more ticker symbols
        #[arg(required = true, num_args = 2..)]
        symbols: Vec<String>,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplitDirection {
    Forward,
    Reverse,
}

/// How calendar listings are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CalendarGrouping {
    Date,
    Symbol,
}

#[derive(Debug, Subcommand)]
pub enum SplitsCommand {
    /// Split history for one symbol
    History {
        /// Ticker symbol
        symbol: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Upcoming split events
    Calendar {
        /// Start date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD), defaults to 30 days out
        #[arg(long)]
        end: Option<String>,
        /// Keep only events on this exchange
        #[arg(short = 'e', long)]
        exchange: Option<String>,
        /// Keep only events for this symbol
        #[arg(short = 's', long)]
        symbol: Option<String>,
        /// Keep only forward or only reverse splits
        #[arg(long, value_enum)]
        direction: Option<SplitDirection>,
        /// Group the listing by date or by symbol
        #[arg(long, value_enum, default_value_t = CalendarGrouping::Date)]
        group_by: CalendarGrouping,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Compare split history across symbols
    Compare {
        /// Two or more ticker symbols
        #[arg(required = true, num_args = 2..)]
        symbols: Vec<String>,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatementPeriod {
    Annual,
    Quarterly,
}

impl StatementPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementPeriod::Annual => "annual",
            StatementPeriod::Quarterly => "quarterly",
        }
    }
}

#[derive(Debug, Args)]
pub struct StatementArgs {
    /// Ticker symbol
    pub symbol: String,
    /// Fiscal period to request
    #[arg(long, value_enum, default_value_t = StatementPeriod::Annual)]
    pub period: StatementPeriod,
    #[command(flatten)]
    pub export: ExportArgs,
}

/// Which statement a multi-period comparison covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatementKind {
    Income,
    BalanceSheet,
    CashFlow,
}

#[derive(Debug, Subcommand)]
pub enum StatementsCommand {
    /// Income statement
    Income(StatementArgs),
    /// Balance sheet
    BalanceSheet(StatementArgs),
    /// Cash flow statement
    CashFlow(StatementArgs),
    /// Operating expenses as shares of revenue
    ExpenseBreakdown(StatementArgs),
    /// Key metrics across several fiscal periods
    Compare {
        /// Ticker symbol
        symbol: String,
        /// Which statement to compare
        #[arg(long, value_enum, default_value_t = StatementKind::Income)]
        statement: StatementKind,
        /// Fiscal period to request
        #[arg(long, value_enum, default_value_t = StatementPeriod::Annual)]
        period: StatementPeriod,
        /// Number of periods to compare (2 to 20)
        #[arg(short = 'c', long, default_value_t = 4)]
        count: u32,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum AnalystsCommand {
    /// EPS and revenue estimates with recommendation trend
    Estimates(SymbolArgs),
    /// Firm-level recommendations and consensus
    Recommendations {
        /// Ticker symbol
        symbol: String,
        /// Keep only recommendations from the last N days
        #[arg(long)]
        days: Option<i64>,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// EPS estimate revisions over the last week and month
    EpsRevisions(SymbolArgs),
    /// Growth rate estimates
    Growth(SymbolArgs),
    /// Analyst price targets
    PriceTarget(SymbolArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_quote_with_flags() {
        let cli = Cli::try_parse_from([
            "stock-cli", "quote", "AAPL", "MSFT", "-d", "-r", "-i", "30",
        ])
        .unwrap();
        match cli.command {
            Command::Quote(args) => {
                assert_eq!(args.symbols, vec!["AAPL", "MSFT"]);
                assert!(args.detailed);
                assert!(args.refresh);
                assert_eq!(args.interval, 30);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn quote_requires_a_symbol() {
        assert!(Cli::try_parse_from(["stock-cli", "quote"]).is_err());
    }

    #[test]
    fn listing_filters_default_limit() {
        let cli = Cli::try_parse_from(["stock-cli", "symbols", "list", "-e", "NASDAQ"]).unwrap();
        match cli.command {
            Command::Symbols {
                command: SymbolsCommand::List { filters, .. },
            } => {
                assert_eq!(filters.exchange.as_deref(), Some("NASDAQ"));
                assert_eq!(filters.limit, 100);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn movers_default_limit_and_exchange_filter() {
        let cli = Cli::try_parse_from(["stock-cli", "gainers", "-e", "NYSE"]).unwrap();
        match cli.command {
            Command::Gainers(args) => {
                assert_eq!(args.exchange.as_deref(), Some("NYSE"));
                assert_eq!(args.limit, 10);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["stock-cli", "losers", "-l", "5"]).is_ok());
    }

    #[test]
    fn statements_compare_defaults_to_income_over_four_periods() {
        let cli =
            Cli::try_parse_from(["stock-cli", "statements", "compare", "AAPL"]).unwrap();
        match cli.command {
            Command::Statements {
                command:
                    StatementsCommand::Compare {
                        symbol,
                        statement,
                        count,
                        ..
                    },
            } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(statement, StatementKind::Income);
                assert_eq!(count, 4);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn market_cap_splits_into_history_and_compare() {
        assert!(Cli::try_parse_from(["stock-cli", "market-cap", "history", "AAPL"]).is_ok());
        let cli = Cli::try_parse_from([
            "stock-cli", "market-cap", "compare", "AAPL", "-d", "60", "-m", "36",
        ])
        .unwrap();
        match cli.command {
            Command::MarketCap {
                command:
                    MarketCapCommand::Compare {
                        daily_count,
                        monthly_count,
                        ..
                    },
            } => {
                assert_eq!(daily_count, 60);
                assert_eq!(monthly_count, 36);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn calendars_accept_symbol_filter_and_grouping() {
        let cli = Cli::try_parse_from([
            "stock-cli", "splits", "calendar", "-s", "NVDA", "--group-by", "symbol",
        ])
        .unwrap();
        match cli.command {
            Command::Splits {
                command: SplitsCommand::Calendar { symbol, group_by, .. },
            } => {
                assert_eq!(symbol.as_deref(), Some("NVDA"));
                assert_eq!(group_by, CalendarGrouping::Symbol);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn recommendations_take_a_day_window() {
        let cli = Cli::try_parse_from([
            "stock-cli", "analysts", "recommendations", "AAPL", "--days", "30",
        ])
        .unwrap();
        match cli.command {
            Command::Analysts {
                command: AnalystsCommand::Recommendations { days, .. },
            } => assert_eq!(days, Some(30)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn executives_profile_takes_name_and_position() {
        let cli = Cli::try_parse_from([
            "stock-cli", "executives", "profile", "AAPL", "--position", "CEO",
        ])
        .unwrap();
        match cli.command {
            Command::Executives {
                command: ExecutivesCommand::Profile { name, position, .. },
            } => {
                assert!(name.is_none());
                assert_eq!(position.as_deref(), Some("CEO"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn compare_requires_two_symbols() {
        assert!(Cli::try_parse_from(["stock-cli", "dividends", "compare", "KO"]).is_err());
        assert!(Cli::try_parse_from(["stock-cli", "dividends", "compare", "KO", "PEP"]).is_ok());
    }

    #[test]
    fn export_flags_parse_on_leaves() {
        let cli = Cli::try_parse_from([
            "stock-cli",
            "etfs",
            "list",
            "--sort-by",
            "expense-ratio",
            "--export",
            "both",
            "--output-dir",
            "/tmp/out",
        ])
        .unwrap();
        match cli.command {
            Command::Etfs {
                command: EtfsCommand::List { sort_by, export, .. },
            } => {
                assert!(sort_by.is_some());
                assert!(export.export.is_some());
                assert!(export.output_dir.is_some());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
