//! End-to-end pipeline tests over a replayed capture

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use p1_core::{P1Error, P1Result, ReadingSet, Registry};
use p1_reader::driver::{Driver, DriverOptions};
use p1_reader::sink::Sink;
use p1_telegram::crc16;
use p1_transport::ReplayTransport;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Build one well-formed telegram; the tariff 1 counter varies per sequence
/// number so exports can be matched back to their telegram.
fn telegram(seq: usize) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(b"/KFM5KAIFA-METER\r\n\r\n");
    body.extend_from_slice(b"1-3:0.2.8(42)\r\n");
    body.extend_from_slice(b"0-0:1.0.0(250807120000S)\r\n");
    body.extend_from_slice(format!("1-0:1.8.1({:010.3}*kWh)\r\n", 1000.0 + seq as f64).as_bytes());
    body.extend_from_slice(b"1-0:2.8.1(001234.567*kWh)\r\n");
    body.extend_from_slice(b"0-0:96.14.0(0002)\r\n");
    body.extend_from_slice(b"1-0:1.7.0(00.200*kW)\r\n");
    body.push(b'!');
    let crc = crc16::checksum(&body);
    body.extend_from_slice(format!("{crc:04X}\r\n").as_bytes());
    body
}

fn capture_file(telegrams: &[Vec<u8>]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for t in telegrams {
        file.write_all(t).unwrap();
    }
    file.flush().unwrap();
    file
}

/// Sink that records every export
#[derive(Clone, Default)]
struct CollectingSink {
    exports: Arc<Mutex<Vec<(DateTime<Utc>, ReadingSet)>>>,
}

#[async_trait]
impl Sink for CollectingSink {
    async fn export(&self, at: DateTime<Utc>, readings: &ReadingSet) -> P1Result<()> {
        self.exports.lock().unwrap().push((at, readings.clone()));
        Ok(())
    }
}

/// Sink that always fails
#[derive(Clone, Default)]
struct FailingSink {
    attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl Sink for FailingSink {
    async fn export(&self, _at: DateTime<Utc>, _readings: &ReadingSet) -> P1Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(P1Error::Export("influxdb unreachable".to_string()))
    }
}

async fn run_replay(capture: &tempfile::NamedTempFile, sink: impl Sink + 'static) -> P1Result<()> {
    let transport = ReplayTransport::new(capture.path());
    let mut driver = Driver::new(transport, sink, Registry::standard(), DriverOptions::replay());
    driver.run().await
}

#[tokio::test]
async fn test_twenty_telegrams_give_twenty_exports() {
    let telegrams: Vec<Vec<u8>> = (0..20).map(telegram).collect();
    let capture = capture_file(&telegrams);
    let sink = CollectingSink::default();

    run_replay(&capture, sink.clone()).await.unwrap();

    let exports = sink.exports.lock().unwrap();
    assert_eq!(exports.len(), 20);

    for (seq, (at, readings)) in exports.iter().enumerate() {
        // Only registry-known tags may appear; the meter model line, the
        // DSMR version line and the timestamp line never reach the sink.
        for (tag, _) in readings.iter() {
            assert!(
                [
                    "electricity_used_tariff1",
                    "electricity_delivered_tariff1",
                    "active_tariff",
                    "current_electricity_usage",
                ]
                .contains(&tag),
                "unexpected tag {tag}"
            );
        }
        assert_eq!(readings.len(), 4);
        assert_eq!(
            readings.get("electricity_used_tariff1"),
            Some(1000.0 + seq as f64)
        );
        assert_eq!(readings.get("electricity_delivered_tariff1"), Some(1234.567));
        assert_eq!(readings.get("active_tariff"), Some(2.0));
        assert_eq!(readings.get("current_electricity_usage"), Some(0.2));
        // The export instant is truncated to the second.
        assert_eq!(at.timestamp_subsec_nanos(), 0);
    }
}

#[tokio::test]
async fn test_corrupted_telegram_is_skipped() {
    let mut corrupted = telegram(99);
    let i = corrupted.windows(4).position(|w| w == b"0002").unwrap();
    corrupted[i] = b'7'; // body changed, trailer checksum kept

    let capture = capture_file(&[telegram(0), corrupted, telegram(1)]);
    let sink = CollectingSink::default();

    run_replay(&capture, sink.clone()).await.unwrap();

    let exports = sink.exports.lock().unwrap();
    assert_eq!(exports.len(), 2);
    assert_eq!(
        exports[0].1.get("electricity_used_tariff1"),
        Some(1000.0)
    );
    assert_eq!(
        exports[1].1.get("electricity_used_tariff1"),
        Some(1001.0)
    );
}

#[tokio::test]
async fn test_unparseable_reading_discards_whole_telegram() {
    // Valid checksum, but a registered identifier carries a non-numeric
    // value: the telegram must be dropped wholesale, with no partial export.
    let mut body = b"/KFM5KAIFA-METER\r\n\r\n1-0:1.8.1(ABC*kWh)\r\n0-0:96.14.0(0002)\r\n!".to_vec();
    let crc = crc16::checksum(&body);
    body.extend_from_slice(format!("{crc:04X}\r\n").as_bytes());

    let capture = capture_file(&[body, telegram(5)]);
    let sink = CollectingSink::default();

    run_replay(&capture, sink.clone()).await.unwrap();

    let exports = sink.exports.lock().unwrap();
    assert_eq!(exports.len(), 1);
    assert_eq!(
        exports[0].1.get("electricity_used_tariff1"),
        Some(1005.0)
    );
}

#[tokio::test]
async fn test_sink_failure_does_not_stop_pipeline() {
    let capture = capture_file(&[telegram(0), telegram(1), telegram(2)]);
    let sink = FailingSink::default();
    let attempts = sink.attempts.clone();

    run_replay(&capture, sink).await.unwrap();

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_missing_capture_fails_on_first_open() {
    let transport = ReplayTransport::new("/nonexistent/raw.out");
    let sink = CollectingSink::default();
    let mut driver = Driver::new(transport, sink, Registry::standard(), DriverOptions::replay());
    assert!(driver.run().await.is_err());
}
