//! Per-symbol book: both sides plus the symbol's render precisions.

use tracing::debug;

use crate::decimal::DecimalValue;
use crate::error::{RecorderError, Result};
use crate::wire::{BookEntry, MessageKind};

use super::{BookSide, Depth, Side};

/// Both sides of one symbol's book.
///
/// The precisions are those of the most recently accepted pair
/// metadata; they drive every fixed-precision render and the checksum
/// digest. A precision change replaces the whole book via
/// [`SymbolBook::with_precisions`] rather than mutating in place.
#[derive(Debug, Clone)]
pub struct SymbolBook {
    symbol: String,
    bids: BookSide,
    asks: BookSide,
    book_depth: Depth,
    price_precision: u32,
    qty_precision: u32,
}

impl SymbolBook {
    pub fn new(symbol: &str, book_depth: Depth, price_precision: u32, qty_precision: u32) -> Self {
        Self {
            symbol: symbol.to_string(),
            bids: BookSide::new(Side::Bid),
            asks: BookSide::new(Side::Ask),
            book_depth,
            price_precision,
            qty_precision,
        }
    }

    /// Replacement book at new precisions, carrying over the existing
    /// side contents. Values are reinterpreted at the new precision on
    /// the next render.
    pub fn with_precisions(self, price_precision: u32, qty_precision: u32) -> Self {
        Self {
            price_precision,
            qty_precision,
            ..self
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn book_depth(&self) -> Depth {
        self.book_depth
    }

    pub fn price_precision(&self) -> u32 {
        self.price_precision
    }

    pub fn qty_precision(&self) -> u32 {
        self.qty_precision
    }

    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    pub fn best_bid(&self) -> Option<&DecimalValue> {
        self.bids.best().map(|(price, _)| price)
    }

    pub fn best_ask(&self) -> Option<&DecimalValue> {
        self.asks.best().map(|(price, _)| price)
    }

    /// Apply one book entry, then verify the venue checksum. On any
    /// failure the sides are left in their last-applied state.
    pub fn accept(&mut self, kind: MessageKind, entry: &BookEntry) -> Result<()> {
        let depth = self.book_depth.as_usize();
        match kind {
            MessageKind::Snapshot => {
                self.bids.apply_snapshot(&entry.bids, depth);
                self.asks.apply_snapshot(&entry.asks, depth);
            }
            MessageKind::Update => {
                self.bids.apply_update(&entry.bids, depth);
                self.asks.apply_update(&entry.asks, depth);
            }
        }
        self.verify_checksum(entry.checksum)
    }

    /// CRC-32 over the digest of the best checksum-depth levels, asks
    /// before bids, sharing one accumulator.
    pub fn checksum(&self) -> u32 {
        let mut crc = crc32fast::Hasher::new();
        self.asks
            .digest(&mut crc, self.price_precision, self.qty_precision);
        self.bids
            .digest(&mut crc, self.price_precision, self.qty_precision);
        crc.finalize()
    }

    fn verify_checksum(&self, expected: u32) -> Result<()> {
        let computed = self.checksum();
        if computed != expected {
            return Err(RecorderError::ChecksumMismatch {
                symbol: self.symbol.clone(),
                expected,
                computed,
            });
        }
        debug!(symbol = %self.symbol, checksum = computed, "book checksum verified");
        Ok(())
    }
}
