//! End-to-end tests for the service facade and its background tasks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use bandbrain::competition::{CompetitionLevel, PathStatus};
use bandbrain::model::{Callsign, Grid, LocalDecode, Spot, TargetContext};
use bandbrain::service::{BandBrainService, BrainConfig, BrainError, RefreshDaemon};

fn service() -> Arc<BandBrainService> {
    Arc::new(BandBrainService::new(BrainConfig::new("WU2C").unwrap()).unwrap())
}

fn spot(sender: &str, receiver: &str, grid: Option<&str>, offset_hz: u32, at: Instant) -> Spot {
    Spot {
        sender: Callsign::new(sender),
        receiver: Callsign::new(receiver),
        sender_grid: None,
        receiver_grid: grid.and_then(Grid::parse),
        offset_hz,
        snr_db: -10,
        received_at: at,
    }
}

#[test]
fn full_assessment_for_a_dx_target() {
    let service = service();
    let now = Instant::now();
    service.set_target(TargetContext::new(
        Callsign::new("JA1XYZ"),
        Grid::parse("PM95"),
    ));

    // Two competitors the target itself hears near 1000 Hz, one station
    // it hears well away, a same-square reporter, and a report of us from
    // the target's square.
    service.ingest_spot(spot("K1ABC", "JA1XYZ", Some("PM95"), 1000, now));
    service.ingest_spot(spot("N0DEF", "JA1XYZ", Some("PM95"), 1010, now));
    service.ingest_spot(spot("G4GHI", "JA1XYZ", Some("PM95"), 1850, now));
    service.ingest_spot(spot("VK3AA", "JH1AAA", Some("PM95GH"), 1400, now));
    service.ingest_spot(spot("WU2C", "JH1AAA", Some("PM95GH"), 2200, now));
    service.ingest_local_decode(LocalDecode {
        sender: Callsign::new("JA1XYZ"),
        offset_hz: 1000,
        snr_db: -4,
        directed_to: None,
        received_at: now,
    });

    let assessment = service.assess(now).unwrap();

    assert_eq!(assessment.perspective.direct.len(), 3);
    assert_eq!(assessment.perspective.same_square.len(), 2);
    assert_eq!(assessment.competition.count, 2);
    assert_eq!(assessment.competition.level, CompetitionLevel::Medium);
    assert_eq!(assessment.path, PathStatus::HeardInRegion);
    // Offset tracked from our own decode of the target.
    assert_eq!(assessment.target.offset_hz, Some(1000));
    // Never recommend transmitting on top of the target or a competitor.
    assert!(assessment.recommendation.offset_hz.abs_diff(1000) > 35);
}

#[test]
fn receipt_time_governs_freshness_not_upstream_timestamps() {
    // A feed can deliver a batch minutes after the reports were made.
    // Freshness is measured from local receipt, so a just-received batch
    // is fully usable for a whole tactical window regardless of how long
    // it sat upstream.
    let service = service();
    let receipt = Instant::now();
    service.set_target(TargetContext::new(
        Callsign::new("JA1XYZ"),
        Grid::parse("PM95"),
    ));
    service.ingest_spot(spot("K1ABC", "JA1XYZ", Some("PM95"), 1000, receipt));

    let late_in_window = receipt + Duration::from_secs(40);
    let perspective = service.perspective(late_in_window).unwrap();
    assert_eq!(perspective.direct.len(), 1);

    // Past the tactical window the spot stops informing queries even
    // though the prune daemon has not run.
    let past_window = receipt + Duration::from_secs(46);
    assert!(service.perspective(past_window).unwrap().is_empty());
}

#[test]
fn heard_me_evidence_outlives_tactical_activity() {
    let service = service();
    let receipt = Instant::now();
    service.set_target(TargetContext::new(
        Callsign::new("JA1XYZ"),
        Grid::parse("PM95"),
    ));
    service.ingest_spot(spot("WU2C", "JA1XYZ", Some("PM95"), 1200, receipt));

    // Ten minutes on: the report is useless as band activity but still
    // proves the target heard us.
    let later = receipt + Duration::from_secs(600);
    assert!(service.perspective(later).unwrap().is_empty());
    assert_eq!(service.path_status(later).unwrap(), PathStatus::HeardByTarget);

    // Past the heard-me window even that expires.
    let much_later = receipt + Duration::from_secs(901);
    assert_eq!(
        service.path_status(much_later).unwrap(),
        PathStatus::NotTransmitting
    );
}

#[test]
fn queries_require_a_target() {
    let service = service();
    assert_eq!(
        service.assess(Instant::now()).map(|_| ()),
        Err(BrainError::NoTarget)
    );
}

#[tokio::test]
async fn daemons_run_and_shut_down_cleanly() {
    let config = BrainConfig::new("WU2C")
        .unwrap()
        .with_refresh_interval(Duration::from_millis(20));
    let service = Arc::new(BandBrainService::new(config).unwrap());
    service.set_target(TargetContext::new(
        Callsign::new("JA1XYZ"),
        Grid::parse("PM95"),
    ));
    service.ingest_spot(spot(
        "K1ABC",
        "JA1XYZ",
        Some("PM95"),
        1000,
        Instant::now(),
    ));

    let shutdown = CancellationToken::new();
    let (refresh, mut rx) = RefreshDaemon::new(Arc::clone(&service));
    let prune = service.prune_daemon();

    let refresh_handle = tokio::spawn(refresh.run(shutdown.clone()));
    let prune_handle = tokio::spawn(prune.run(shutdown.clone()));

    // The refresh daemon publishes an assessment within a few intervals.
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|a| a.is_some()))
        .await
        .expect("no assessment published")
        .expect("refresh daemon dropped its channel");

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(1), refresh_handle)
        .await
        .expect("refresh daemon did not stop")
        .unwrap();
    tokio::time::timeout(Duration::from_secs(1), prune_handle)
        .await
        .expect("prune daemon did not stop")
        .unwrap();
}
