//! Full-pipeline checksum verification: raw JSON frames through the
//! wire decoder into the book registry, checked against venue-published
//! checksums.

use kraken_recorder::orderbook::{BookRegistry, Depth};
use kraken_recorder::timestamp::Timestamp;
use kraken_recorder::wire::{MessageKind, WireMessage};

const GST_USD_PAIR: &str = r#"{"channel":"instrument","type":"snapshot","data":{
    "assets": [],
    "pairs": [{
        "symbol": "GST/USD",
        "base": "GST",
        "quote": "USD",
        "status": "online",
        "price_precision": 3,
        "qty_precision": 8,
        "cost_precision": 5,
        "price_increment": 0.001,
        "qty_increment": 1E-8,
        "cost_min": 0.5,
        "qty_min": 200.0,
        "marginable": false,
        "has_index": false
    }]
}}"#;

const GST_USD_SNAPSHOT: &str = r#"{"channel":"book","type":"snapshot","data":[{"symbol":"GST/USD","bids":[{"price":0.016,"qty":255965.95133811},{"price":0.015,"qty":264465.46682136},{"price":0.014,"qty":198234.50375152},{"price":0.013,"qty":263077.71115063},{"price":0.012,"qty":135283.23181445},{"price":0.011,"qty":232726.34707055},{"price":0.010,"qty":211909.56878553},{"price":0.009,"qty":16666.66666666},{"price":0.008,"qty":13600.00000000},{"price":0.007,"qty":1000.00000000}],"asks":[{"price":0.017,"qty":94510.50669693},{"price":0.018,"qty":232489.98702916},{"price":0.019,"qty":244770.01655926},{"price":0.020,"qty":103394.23779803},{"price":0.021,"qty":120226.44704447},{"price":0.022,"qty":122811.44535027},{"price":0.023,"qty":185766.68965043},{"price":0.024,"qty":95339.83830809},{"price":0.025,"qty":32960.86333331},{"price":0.026,"qty":86326.77204454}],"checksum":1931231958}]}"#;

fn registry_with_pairs(raw: &str) -> BookRegistry {
    let mut registry = BookRegistry::new(Depth::Ten);
    match WireMessage::decode(raw, Timestamp::from_micros(0)).unwrap() {
        WireMessage::Instrument(message) => {
            for pair in &message.pairs {
                registry.accept_pair(pair);
            }
        }
        other => panic!("expected instrument message, got {other:?}"),
    }
    registry
}

fn feed_book(registry: &mut BookRegistry, raw: &str) -> kraken_recorder::Result<()> {
    match WireMessage::decode(raw, Timestamp::from_micros(0)).unwrap() {
        WireMessage::Book(message) => registry.accept_book(&message),
        other => panic!("expected book message, got {other:?}"),
    }
}

#[test]
fn test_gst_usd_snapshot_checksum_verifies() {
    let mut registry = registry_with_pairs(GST_USD_PAIR);
    feed_book(&mut registry, GST_USD_SNAPSHOT).unwrap();

    let book = registry.book("GST/USD").unwrap();
    assert_eq!(book.checksum(), 1931231958);
    assert_eq!(book.best_bid().unwrap().to_fixed_string(3), "0.016");
    assert_eq!(book.best_ask().unwrap().to_fixed_string(3), "0.017");
    assert_eq!(book.bids().len(), 10);
    assert_eq!(book.asks().len(), 10);
}

#[test]
fn test_corrupted_snapshot_checksum_fails() {
    let mut registry = registry_with_pairs(GST_USD_PAIR);
    let corrupted = GST_USD_SNAPSHOT.replace("255965.95133811", "255965.95133812");
    let err = feed_book(&mut registry, corrupted.as_str()).unwrap_err();
    assert!(matches!(
        err,
        kraken_recorder::RecorderError::ChecksumMismatch { expected, .. } if expected == 1931231958
    ));
}

#[test]
fn test_update_repatches_to_published_checksum() {
    let mut registry = registry_with_pairs(GST_USD_PAIR);
    feed_book(&mut registry, GST_USD_SNAPSHOT).unwrap();

    // Remove the best bid, then restore it. Each patch carries a
    // checksum computed from the expected post-patch book.
    let drop_best = {
        let mut probe = registry.book("GST/USD").unwrap().clone();
        probe.accept(
            MessageKind::Update,
            &serde_json::from_str(
                r#"{"symbol":"GST/USD","bids":[{"price":0.016,"qty":0.0}],"asks":[],"checksum":0}"#,
            )
            .unwrap(),
        )
        .unwrap_err();
        probe.checksum()
    };
    let raw = format!(
        r#"{{"channel":"book","type":"update","data":[{{"symbol":"GST/USD","bids":[{{"price":0.016,"qty":0.0}}],"asks":[],"checksum":{drop_best}}}]}}"#
    );
    feed_book(&mut registry, &raw).unwrap();
    assert_eq!(
        registry
            .book("GST/USD")
            .unwrap()
            .best_bid()
            .unwrap()
            .to_fixed_string(3),
        "0.015"
    );

    let raw = r#"{"channel":"book","type":"update","data":[{"symbol":"GST/USD","bids":[{"price":0.016,"qty":255965.95133811}],"asks":[],"checksum":1931231958}]}"#;
    feed_book(&mut registry, raw).unwrap();
    assert_eq!(registry.book("GST/USD").unwrap().checksum(), 1931231958);
}

#[test]
fn test_btc_usd_documented_example() {
    const PAIR: &str = r#"{"channel":"instrument","type":"snapshot","data":{
        "assets": [],
        "pairs": [{
            "symbol": "BTC/USD",
            "base": "BTC",
            "quote": "USD",
            "status": "online",
            "price_precision": 1,
            "qty_precision": 8,
            "cost_precision": 5,
            "price_increment": 0.1,
            "qty_increment": 1E-8,
            "cost_min": 0.5,
            "qty_min": 0.0001,
            "marginable": false,
            "has_index": true
        }]
    }}"#;
    const SNAPSHOT: &str = r#"{"channel":"book","type":"snapshot","data":[{"symbol":"BTC/USD","bids":[{"price":45283.5,"qty":0.10000000},{"price":45283.4,"qty":1.54582015},{"price":45282.1,"qty":0.10000000},{"price":45281.0,"qty":0.10000000},{"price":45280.3,"qty":1.54592586},{"price":45279.0,"qty":0.07990000},{"price":45277.6,"qty":0.03310103},{"price":45277.5,"qty":0.30000000},{"price":45277.3,"qty":1.54602737},{"price":45276.6,"qty":0.15445238}],"asks":[{"price":45285.2,"qty":0.00100000},{"price":45286.4,"qty":1.54571953},{"price":45286.6,"qty":1.54571109},{"price":45289.6,"qty":1.54560911},{"price":45290.2,"qty":0.15890660},{"price":45291.8,"qty":1.54553491},{"price":45294.7,"qty":0.04454749},{"price":45296.1,"qty":0.35380000},{"price":45297.5,"qty":0.09945542},{"price":45299.5,"qty":0.18772827}],"checksum":3310070434}]}"#;

    let mut registry = registry_with_pairs(PAIR);
    feed_book(&mut registry, SNAPSHOT).unwrap();
    assert_eq!(registry.book("BTC/USD").unwrap().checksum(), 3310070434);
}
