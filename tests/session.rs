//! Session handshake walked end to end with canned frames, with the
//! decoded objects collected through a channel sink.

use std::sync::Arc;

use tokio::sync::mpsc;

use kraken_recorder::{
    ChannelSink, Config, EngineState, FanoutSink, Metrics, ProtocolEngine, RecordEvent, Timestamp,
};

const INSTRUMENT_SNAPSHOT: &str = r#"{"channel":"instrument","type":"snapshot","data":{
    "assets": [{"id":"USD","status":"enabled","precision":4,"precision_display":2,"borrowable":true,"collateral_value":1.0,"margin_rate":0.025}],
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

const BOOK_SNAPSHOT: &str = r#"{"channel":"book","type":"snapshot","data":[{"symbol":"GST/USD","bids":[{"price":0.016,"qty":255965.95133811},{"price":0.015,"qty":264465.46682136},{"price":0.014,"qty":198234.50375152},{"price":0.013,"qty":263077.71115063},{"price":0.012,"qty":135283.23181445},{"price":0.011,"qty":232726.34707055},{"price":0.010,"qty":211909.56878553},{"price":0.009,"qty":16666.66666666},{"price":0.008,"qty":13600.00000000},{"price":0.007,"qty":1000.00000000}],"asks":[{"price":0.017,"qty":94510.50669693},{"price":0.018,"qty":232489.98702916},{"price":0.019,"qty":244770.01655926},{"price":0.020,"qty":103394.23779803},{"price":0.021,"qty":120226.44704447},{"price":0.022,"qty":122811.44535027},{"price":0.023,"qty":185766.68965043},{"price":0.024,"qty":95339.83830809},{"price":0.025,"qty":32960.86333331},{"price":0.026,"qty":86326.77204454}],"checksum":1931231958}]}"#;

const TRADE: &str = r#"{"channel":"trade","type":"update","data":[{"symbol":"GST/USD","side":"buy","ord_type":"limit","price":0.017,"qty":500.0,"timestamp":"2024-04-13T18:10:04.220677Z","trade_id":42}]}"#;

fn feed(engine: &mut ProtocolEngine, raw: &str) -> Vec<String> {
    engine.on_message(raw, Timestamp::from_micros(0)).unwrap()
}

#[test]
fn test_full_handshake_publishes_every_decoded_object() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sink = FanoutSink::new()
        .with_instrument_sink(Box::new(ChannelSink::new(tx.clone())))
        .with_book_sink(Box::new(ChannelSink::new(tx.clone())))
        .with_trade_sink(Box::new(ChannelSink::new(tx)));

    let metrics = Arc::new(Metrics::new().unwrap());
    let mut engine = ProtocolEngine::new(Arc::new(Config::default()), metrics.clone(), sink);

    let ping = engine.ping_request().unwrap();
    assert!(ping.contains(r#""method":"ping""#));
    assert_eq!(engine.state(), EngineState::Connecting);

    let outbound = feed(&mut engine, r#"{"method":"pong","req_id":1}"#);
    assert_eq!(outbound.len(), 1);
    assert_eq!(engine.state(), EngineState::AwaitingInstrumentSubscription);

    let outbound = feed(&mut engine, INSTRUMENT_SNAPSHOT);
    assert_eq!(outbound.len(), 2);
    assert_eq!(engine.state(), EngineState::Steady);

    feed(
        &mut engine,
        r#"{"method":"subscribe","result":{"channel":"book"},"success":true}"#,
    );
    feed(&mut engine, BOOK_SNAPSHOT);

    feed(&mut engine, r#"{"channel":"heartbeat"}"#);
    feed(&mut engine, TRADE);

    assert!(matches!(rx.try_recv().unwrap(), RecordEvent::Instrument(_)));
    assert!(matches!(rx.try_recv().unwrap(), RecordEvent::Book(_)));
    assert!(matches!(rx.try_recv().unwrap(), RecordEvent::Trades(_)));
    assert!(rx.try_recv().is_err());

    assert_eq!(metrics.book_snapshots_total.get(), 1);
    assert_eq!(metrics.trades_total.get(), 1);
    assert_eq!(metrics.heartbeats_total.get(), 1);
    assert_eq!(metrics.pongs_total.get(), 1);
    assert_eq!(metrics.tracked_symbols.get(), 1);
}

#[test]
fn test_checksum_failure_increments_counter_and_surfaces() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let mut engine = ProtocolEngine::new(
        Arc::new(Config::default()),
        metrics.clone(),
        FanoutSink::new(),
    );

    engine.ping_request().unwrap();
    feed(&mut engine, r#"{"method":"pong","req_id":1}"#);
    feed(&mut engine, INSTRUMENT_SNAPSHOT);

    let corrupted = BOOK_SNAPSHOT.replace("1931231958", "1931231959");
    let err = engine
        .on_message(&corrupted, Timestamp::from_micros(0))
        .unwrap_err();
    assert!(matches!(
        err,
        kraken_recorder::RecorderError::ChecksumMismatch { .. }
    ));
    assert_eq!(metrics.checksum_failures_total.get(), 1);
}
