//! Symbol → book registry
//!
//! Books are created lazily on first pair sighting and never removed
//! during a session. A book message for a symbol the registry has not
//! seen is a protocol-sequencing violation, not a reason to conjure an
//! empty book.

use std::collections::HashMap;

use tracing::info;

use crate::error::{RecorderError, Result};
use crate::wire::{BookMessage, Pair};

use super::{Depth, SymbolBook};

#[derive(Debug)]
pub struct BookRegistry {
    book_depth: Depth,
    books: HashMap<String, SymbolBook>,
}

impl BookRegistry {
    pub fn new(book_depth: Depth) -> Self {
        Self {
            book_depth,
            books: HashMap::new(),
        }
    }

    pub fn book_depth(&self) -> Depth {
        self.book_depth
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    pub fn book(&self, symbol: &str) -> Result<&SymbolBook> {
        self.books
            .get(symbol)
            .ok_or_else(|| RecorderError::UnknownSymbol(symbol.to_string()))
    }

    /// Accept pair metadata. First sighting creates an empty book at
    /// the pair's precisions; a precision change replaces the book,
    /// carrying over its side contents.
    pub fn accept_pair(&mut self, pair: &Pair) {
        match self.books.remove(&pair.symbol) {
            None => {
                let book = SymbolBook::new(
                    &pair.symbol,
                    self.book_depth,
                    pair.price_precision,
                    pair.qty_precision,
                );
                self.books.insert(pair.symbol.clone(), book);
            }
            Some(existing) => {
                let book = if existing.price_precision() != pair.price_precision
                    || existing.qty_precision() != pair.qty_precision
                {
                    info!(
                        symbol = %pair.symbol,
                        price_precision = pair.price_precision,
                        qty_precision = pair.qty_precision,
                        "pair precisions changed, replacing book"
                    );
                    existing.with_precisions(pair.price_precision, pair.qty_precision)
                } else {
                    existing
                };
                self.books.insert(pair.symbol.clone(), book);
            }
        }
    }

    /// Dispatch a book message to the symbol's book, applying every
    /// data entry in order.
    pub fn accept_book(&mut self, message: &BookMessage) -> Result<()> {
        let kind = message.header.kind.ok_or_else(|| {
            RecorderError::Decode("book message missing snapshot/update type".to_string())
        })?;
        for entry in &message.entries {
            let book = self
                .books
                .get_mut(&entry.symbol)
                .ok_or_else(|| RecorderError::UnknownSymbol(entry.symbol.clone()))?;
            book.accept(kind, entry)?;
        }
        Ok(())
    }
}
