//! One side of a symbol's book
//!
//! A BTreeMap keyed by price gives ordered levels; bids iterate in
//! reverse so both sides expose a best-first view. The side is bounded
//! to the subscribed depth, trimming from the worse end after updates.

use std::collections::BTreeMap;

use crate::decimal::DecimalValue;
use crate::wire::PriceLevel;

use super::{Side, CHECKSUM_DEPTH};

#[derive(Debug, Clone)]
pub struct BookSide {
    ordering: Side,
    levels: BTreeMap<DecimalValue, DecimalValue>,
}

impl BookSide {
    pub fn new(ordering: Side) -> Self {
        Self {
            ordering,
            levels: BTreeMap::new(),
        }
    }

    pub fn ordering(&self) -> Side {
        self.ordering
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }

    /// Levels in best-to-worst order: descending prices for bids,
    /// ascending for asks.
    pub fn levels_best_first(
        &self,
    ) -> Box<dyn Iterator<Item = (&DecimalValue, &DecimalValue)> + '_> {
        match self.ordering {
            Side::Bid => Box::new(self.levels.iter().rev()),
            Side::Ask => Box::new(self.levels.iter()),
        }
    }

    pub fn best(&self) -> Option<(&DecimalValue, &DecimalValue)> {
        self.levels_best_first().next()
    }

    /// Replace all entries. Zero quantities are deletion markers and
    /// never stored.
    pub fn apply_snapshot(&mut self, levels: &[PriceLevel], book_depth: usize) {
        self.levels.clear();
        for level in levels {
            if !level.qty.is_zero() {
                self.levels.insert(level.price.clone(), level.qty.clone());
            }
        }
        self.trim(book_depth);
    }

    /// Patch entries in place: zero qty removes, nonzero replaces or
    /// inserts. Afterwards the side is trimmed back to `book_depth`,
    /// keeping the best-ranked prices.
    pub fn apply_update(&mut self, levels: &[PriceLevel], book_depth: usize) {
        for level in levels {
            if level.qty.is_zero() {
                self.levels.remove(&level.price);
            } else {
                self.levels.insert(level.price.clone(), level.qty.clone());
            }
        }
        self.trim(book_depth);
    }

    fn trim(&mut self, book_depth: usize) {
        while self.levels.len() > book_depth {
            match self.ordering {
                Side::Bid => self.levels.pop_first(),
                Side::Ask => self.levels.pop_last(),
            };
        }
    }

    /// Digest the best `CHECKSUM_DEPTH` levels into the running CRC,
    /// price then quantity per level.
    pub fn digest(&self, crc: &mut crc32fast::Hasher, price_precision: u32, qty_precision: u32) {
        for (price, qty) in self.levels_best_first().take(CHECKSUM_DEPTH) {
            price.digest(crc, price_precision);
            qty.digest(crc, qty_precision);
        }
    }
}
