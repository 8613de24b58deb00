//! # Import/Export Journey
//!
//! Cards, logs and configuration leave the engine as JSON and come back
//! unchanged; malformed records are refused at the boundary.

use cadence_core::{
    Card, CardStore, DeckStats, FSRSParameters, FSRSScheduler, InMemoryStore, Rating,
    SchedulerError, SessionManager, StoreError, StudyScheduler,
};
use cadence_e2e_tests::{TestDataFactory, TestStoreManager};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 20, 21, 0, 0).unwrap()
}

#[test]
fn test_snapshot_survives_disk_round_trip() {
    let mut db = TestStoreManager::new_temp();
    db.seed_with_learning_states(now());

    let mut session = SessionManager::new(TestDataFactory::scheduler(21), StudyScheduler::new());
    session.start_due(&db.store.all().unwrap(), now()).unwrap();
    db.persist(session.answer_at(Rating::Good, now()).unwrap()).unwrap();

    let before = DeckStats::compute(&db.store.all().unwrap(), now());
    db.take_snapshot();
    db.clear();
    assert!(db.is_empty());

    assert!(db.restore_snapshot());
    let after = DeckStats::compute(&db.store.all().unwrap(), now());
    assert_eq!(after, before);
    assert_eq!(db.store.logs().unwrap().len(), 1);

    // Versions survive, so the stale-write check still applies
    let cards = db.store.all().unwrap();
    let reviewed = cards.iter().find(|c| c.sync_version > 1).expect("reviewed card");
    let mut stale = reviewed.clone();
    stale.sync_version -= 1;
    assert!(matches!(
        db.store.save(stale),
        Err(StoreError::VersionConflict { .. })
    ));
}

#[test]
fn test_corrupt_snapshot_rejected() {
    assert!(matches!(
        InMemoryStore::import_json(r#"{"cards": [{"id": 3}], "logs": []}"#),
        Err(StoreError::Serialization(_))
    ));
}

#[test]
fn test_card_records_validated_on_import() {
    let card = Card::new_at(TestDataFactory::grammar_input("〜ながら", "while doing"), now());
    let json = serde_json::to_string(&card).unwrap();
    assert_eq!(Card::from_json(&json).unwrap(), card);

    let unknown_state = json.replace(r#""state":"new""#, r#""state":"suspended""#);
    assert!(matches!(
        Card::from_json(&unknown_state),
        Err(SchedulerError::InvalidCardState(_))
    ));
}

#[test]
fn test_parameters_from_json() {
    let params = FSRSParameters::from_json(r#"{"requestRetention": 0.85, "enableFuzz": false}"#).unwrap();
    assert_eq!(params.request_retention, 0.85);
    assert!(!params.enable_fuzz);
    assert_eq!(params.maximum_interval, 36500);

    // Lower retention target means longer intervals
    let mut relaxed = FSRSScheduler::with_seed(params, 1).unwrap();
    let mut strict = FSRSScheduler::with_seed(
        FSRSParameters { enable_fuzz: false, ..Default::default() },
        1,
    )
    .unwrap();
    let card = Card::new_at(TestDataFactory::vocab_input("波", "wave"), now());
    let t = now() + Duration::minutes(1);
    let (r, _) = relaxed.review_card(&card, Rating::Easy, t).unwrap();
    let (s, _) = strict.review_card(&card, Rating::Easy, t).unwrap();
    assert!(r.memory.scheduled_days > s.memory.scheduled_days);

    assert!(matches!(
        FSRSParameters::from_json(r#"{"requestRetention": 1.5}"#),
        Err(SchedulerError::InvalidParameters(_))
    ));
}
