// Market data: CSV loading and the in-memory store behind `MarketDataProvider`.
pub mod csv_parser;
pub mod market_data;
