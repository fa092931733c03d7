use crate::model::Item;

/// (ticker, sector, index weight %)
const SAMPLE: &[(&str, &str, f64)] = &[
    ("AAPL", "Technology", 6.9),
    ("MSFT", "Technology", 6.5),
    ("NVDA", "Technology", 6.1),
    ("AVGO", "Technology", 2.3),
    ("ORCL", "Technology", 0.9),
    ("AMZN", "Consumer Cyclical", 3.8),
    ("TSLA", "Consumer Cyclical", 1.9),
    ("HD", "Consumer Cyclical", 0.9),
    ("GOOGL", "Communication", 2.1),
    ("GOOG", "Communication", 1.8),
    ("META", "Communication", 2.6),
    ("NFLX", "Communication", 0.8),
    ("BRK-B", "Financial", 1.7),
    ("JPM", "Financial", 1.4),
    ("V", "Financial", 1.1),
    ("MA", "Financial", 0.9),
    ("LLY", "Healthcare", 1.4),
    ("UNH", "Healthcare", 0.9),
    ("JNJ", "Healthcare", 0.8),
    ("XOM", "Energy", 0.9),
    ("CVX", "Energy", 0.5),
    ("WMT", "Consumer Defensive", 0.8),
    ("PG", "Consumer Defensive", 0.7),
    ("KO", "Consumer Defensive", 0.5),
];

/// A small built-in universe for running without an item file.
pub fn sample_items() -> Vec<Item> {
    SAMPLE
        .iter()
        .map(|&(ticker, sector, weight)| Item::new(ticker, sector, weight))
        .collect()
}
