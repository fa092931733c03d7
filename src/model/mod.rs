pub mod set;

use std::collections::HashMap;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::layout::normalize::sanitize_weight;
use crate::layout::order::layout_order;
use crate::layout::Weighted;

pub use set::{ItemSet, Versions};

/// Sector assigned to items that do not name one.
pub const UNKNOWN_SECTOR: &str = "Unknown";

fn unknown_sector() -> CompactString {
    CompactString::new(UNKNOWN_SECTOR)
}

/// One instrument: identity, grouping, layout weight and a display metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique, stable identifier (e.g. "AAPL")
    pub ticker: CompactString,
    /// Group the item is laid out in
    #[serde(default = "unknown_sector")]
    pub sector: CompactString,
    /// Relative size; zero keeps the item as a sliver
    #[serde(default)]
    pub weight: f64,
    /// Percent change. Carried through untouched, never affects layout.
    #[serde(default)]
    pub change: f64,
}

impl Item {
    pub fn new(ticker: &str, sector: &str, weight: f64) -> Self {
        Self {
            ticker: CompactString::new(ticker),
            sector: CompactString::new(sector),
            weight,
            change: 0.0,
        }
    }

    pub fn with_change(mut self, change: f64) -> Self {
        self.change = change;
        self
    }
}

impl Weighted for Item {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn key(&self) -> &str {
        &self.ticker
    }
}

/// Items sharing a sector name, with their aggregate weight.
#[derive(Debug, Clone)]
pub struct Sector<'a> {
    pub name: &'a str,
    pub weight: f64,
    pub items: Vec<&'a Item>,
}

impl Sector<'_> {
    /// Weight-averaged change over members with a positive weight.
    pub fn weighted_change(&self) -> Option<f64> {
        let (total, sum) = self
            .items
            .iter()
            .filter(|item| sanitize_weight(item.weight) > 0.0)
            .fold((0.0, 0.0), |(total, sum), item| {
                (total + item.weight, sum + item.change * item.weight)
            });
        (total > 0.0).then(|| sum / total)
    }
}

impl Weighted for Sector<'_> {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn key(&self) -> &str {
        self.name
    }
}

/// Group items by sector, keeping sectors in first-seen order.
///
/// Members are stored in layout order and summed in that order, so a sector's
/// weight is bit-for-bit the same however the input was ordered.
pub fn group_by_sector<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<Sector<'a>> {
    let mut sectors: Vec<Sector<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for item in items {
        let slot = *index.entry(item.sector.as_str()).or_insert_with(|| {
            sectors.push(Sector {
                name: item.sector.as_str(),
                weight: 0.0,
                items: Vec::new(),
            });
            sectors.len() - 1
        });
        sectors[slot].items.push(item);
    }

    for sector in &mut sectors {
        sector.items.sort_by(|a, b| layout_order(a, b));
        sector.weight = sector.items.iter().map(|i| sanitize_weight(i.weight)).sum();
    }

    sectors
}

#[cfg(test)]
mod tests {
    use super::{group_by_sector, Item};

    #[test]
    fn sectors_aggregate_member_weights() {
        let items = vec![
            Item::new("AAPL", "Tech", 30.0),
            Item::new("XOM", "Energy", 10.0),
            Item::new("MSFT", "Tech", 25.0),
        ];
        let sectors = group_by_sector(&items);
        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[0].name, "Tech");
        assert_eq!(sectors[0].weight, 55.0);
        assert_eq!(sectors[0].items[0].ticker, "AAPL");
        assert_eq!(sectors[0].items[1].ticker, "MSFT");
        assert_eq!(sectors[1].name, "Energy");
        assert_eq!(sectors[1].weight, 10.0);
    }

    #[test]
    fn weighted_change_ignores_zero_weight_members() {
        let items = vec![
            Item::new("A", "S", 3.0).with_change(2.0),
            Item::new("B", "S", 1.0).with_change(-2.0),
            Item::new("C", "S", 0.0).with_change(50.0),
        ];
        let sectors = group_by_sector(&items);
        let change = sectors[0].weighted_change().unwrap();
        assert!((change - 1.0).abs() < 1e-12);
    }

    #[test]
    fn weighted_change_is_absent_without_weight() {
        let items = vec![Item::new("A", "S", 0.0).with_change(1.0)];
        assert_eq!(group_by_sector(&items)[0].weighted_change(), None);
    }

    #[test]
    fn missing_sector_defaults_to_unknown() {
        let item: Item = serde_json::from_str(r#"{"ticker": "IBM", "weight": 2}"#).unwrap();
        assert_eq!(item.sector, "Unknown");
        assert_eq!(item.change, 0.0);
    }
}
