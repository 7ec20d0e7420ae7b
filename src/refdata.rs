//! Reference data cache
//!
//! Latest asset and pair metadata keyed by id/symbol. Written only by
//! instrument messages (last-write-wins), read by the book and trade
//! paths to find the precisions a symbol renders at.

use std::collections::HashMap;

use crate::wire::{Asset, InstrumentMessage, Pair};

/// Render precisions for one trading pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairPrecision {
    pub price_precision: u32,
    pub qty_precision: u32,
}

#[derive(Debug, Default)]
pub struct ReferenceDataCache {
    assets: HashMap<String, Asset>,
    pairs: HashMap<String, Pair>,
}

impl ReferenceDataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert every asset and pair carried by an instrument message.
    pub fn accept(&mut self, message: &InstrumentMessage) {
        for asset in &message.assets {
            self.assets.insert(asset.id.clone(), asset.clone());
        }
        for pair in &message.pairs {
            self.pairs.insert(pair.symbol.clone(), pair.clone());
        }
    }

    pub fn pair(&self, symbol: &str) -> Option<&Pair> {
        self.pairs.get(symbol)
    }

    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.get(id)
    }

    pub fn pair_precision(&self, symbol: &str) -> Option<PairPrecision> {
        self.pairs.get(symbol).map(|pair| PairPrecision {
            price_precision: pair.price_precision,
            qty_precision: pair.qty_precision,
        })
    }

    pub fn num_assets(&self) -> usize {
        self.assets.len()
    }

    pub fn num_pairs(&self) -> usize {
        self.pairs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::Timestamp;
    use crate::wire::{Header, InstrumentData, MessageKind};

    fn instrument_message(raw: &str) -> InstrumentMessage {
        let data: InstrumentData = serde_json::from_str(raw).unwrap();
        InstrumentMessage {
            header: Header::new(
                Timestamp::from_micros(0),
                "instrument",
                Some(MessageKind::Snapshot),
            ),
            assets: data.assets,
            pairs: data.pairs,
        }
    }

    const SNAPSHOT: &str = r#"{
        "assets": [
            {"id": "USD", "status": "enabled", "precision": 4, "precision_display": 2, "borrowable": true, "collateral_value": 1.0, "margin_rate": 0.025}
        ],
        "pairs": [
            {"symbol": "GST/USD", "base": "GST", "quote": "USD", "status": "online",
             "price_precision": 3, "qty_precision": 8, "cost_precision": 5,
             "price_increment": 0.001, "qty_increment": 1E-8,
             "cost_min": 0.5, "qty_min": 200.0, "marginable": false, "has_index": false}
        ]
    }"#;

    #[test]
    fn test_accept_and_lookup() {
        let mut cache = ReferenceDataCache::new();
        cache.accept(&instrument_message(SNAPSHOT));
        assert_eq!(cache.num_assets(), 1);
        assert_eq!(cache.num_pairs(), 1);

        let precision = cache.pair_precision("GST/USD").unwrap();
        assert_eq!(precision.price_precision, 3);
        assert_eq!(precision.qty_precision, 8);
        assert!(cache.pair_precision("BTC/USD").is_none());
    }

    #[test]
    fn test_upsert_is_last_write_wins() {
        let mut cache = ReferenceDataCache::new();
        cache.accept(&instrument_message(SNAPSHOT));

        let updated = SNAPSHOT.replace("\"price_precision\": 3", "\"price_precision\": 4");
        cache.accept(&instrument_message(&updated));

        assert_eq!(cache.num_pairs(), 1);
        assert_eq!(cache.pair_precision("GST/USD").unwrap().price_precision, 4);
    }
}
