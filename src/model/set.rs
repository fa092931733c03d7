use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use compact_str::CompactString;

use super::{group_by_sector, Item, Sector};

static STRUCTURE_STAMP: AtomicU64 = AtomicU64::new(1);

/// A structure stamp no other set (or earlier state of this one) has used.
fn next_structure_stamp() -> u64 {
    STRUCTURE_STAMP.fetch_add(1, Ordering::Relaxed)
}

/// Change markers for an [`ItemSet`].
///
/// `structure` is a process-unique stamp, redrawn whenever membership or
/// grouping changes (the only thing that invalidates cached geometry). Two
/// sets only share a stamp when one is a clone of the other and neither has
/// changed structure since. `values` counts weight/change updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Versions {
    pub structure: u64,
    pub values: u64,
}

/// Identity-stable item records keyed by ticker, kept in insertion order.
#[derive(Debug, Clone)]
pub struct ItemSet {
    items: Vec<Item>,
    index: HashMap<CompactString, usize>,
    versions: Versions,
}

impl Default for ItemSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemSet {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            versions: Versions {
                structure: next_structure_stamp(),
                values: 0,
            },
        }
    }

    /// Build from a list; later duplicates of a ticker replace earlier ones.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut set = Self::new();
        for item in items {
            set.insert(item);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn versions(&self) -> Versions {
        self.versions
    }

    pub fn structure_version(&self) -> u64 {
        self.versions.structure
    }

    pub fn get(&self, ticker: &str) -> Option<&Item> {
        self.index.get(ticker).map(|&i| &self.items[i])
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.index.contains_key(ticker)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Sectors in first-seen order.
    pub fn sectors(&self) -> Vec<Sector<'_>> {
        group_by_sector(&self.items)
    }

    /// Insert or replace a record. A new ticker or a sector move is a
    /// structural change; anything else only updates values.
    pub fn insert(&mut self, item: Item) {
        match self.index.get(item.ticker.as_str()) {
            Some(&i) => {
                let existing = &mut self.items[i];
                if existing.sector != item.sector {
                    self.versions.structure = next_structure_stamp();
                }
                if existing.weight != item.weight || existing.change != item.change {
                    self.versions.values += 1;
                }
                *existing = item;
            }
            None => {
                self.index.insert(item.ticker.clone(), self.items.len());
                self.items.push(item);
                self.versions.structure = next_structure_stamp();
            }
        }
    }

    /// Replace the value fields of a known ticker. Returns `false` (and changes
    /// nothing) for tickers not in the set.
    pub fn update_values(&mut self, ticker: &str, weight: Option<f64>, change: Option<f64>) -> bool {
        let Some(&i) = self.index.get(ticker) else {
            tracing::debug!("Ignoring value update for unknown ticker '{}'", ticker);
            return false;
        };
        let item = &mut self.items[i];
        if let Some(weight) = weight {
            item.weight = weight;
        }
        if let Some(change) = change {
            item.change = change;
        }
        self.versions.values += 1;
        true
    }

    /// Move a ticker to another sector. Returns `false` for unknown tickers.
    pub fn reassign(&mut self, ticker: &str, sector: &str) -> bool {
        let Some(&i) = self.index.get(ticker) else {
            return false;
        };
        let item = &mut self.items[i];
        if item.sector != sector {
            item.sector = CompactString::new(sector);
            self.versions.structure = next_structure_stamp();
        }
        true
    }

    pub fn remove(&mut self, ticker: &str) -> Option<Item> {
        let i = self.index.remove(ticker)?;
        let item = self.items.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        self.versions.structure = next_structure_stamp();
        Some(item)
    }

    /// Swap in a refreshed item list. The structure version only moves when
    /// the tickers or their sectors differ from the current set.
    pub fn replace_all(&mut self, items: impl IntoIterator<Item = Item>) {
        let next = Self::from_items(items);
        let same_structure = next.len() == self.len()
            && next
                .items
                .iter()
                .all(|item| self.get(&item.ticker).is_some_and(|old| old.sector == item.sector));
        let same_values = same_structure
            && next.items.iter().all(|item| {
                self.get(&item.ticker)
                    .is_some_and(|old| old.weight == item.weight && old.change == item.change)
            });

        let mut versions = self.versions;
        if !same_structure {
            versions.structure = next_structure_stamp();
        }
        if !same_values {
            versions.values += 1;
        }

        self.items = next.items;
        self.index = next.index;
        self.versions = versions;
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
