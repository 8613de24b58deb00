//! # Legacy Migration Journey
//!
//! A deck scheduled with the old SM-2 fields is migrated onto FSRS, checked
//! record by record, stored, and studied.

use cadence_core::{
    Card, CardStore, LearningState, LegacyCard, LegacyConverter, SchedulerError, SessionManager,
    StudyScheduler,
};
use cadence_e2e_tests::{TestDataFactory, TestStoreManager};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn migration_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 3, 7, 0, 0).unwrap()
}

fn legacy_deck() -> Vec<LegacyCard> {
    let day = migration_day();
    vec![
        TestDataFactory::legacy_card("steady", 6.0, 2.5, 2, day - Duration::days(6)),
        TestDataFactory::legacy_card("fresh-fail", 1.0, 1.3, 0, day - Duration::days(1)),
        TestDataFactory::legacy_card("long-haul", 30.0, 1.8, 5, day - Duration::days(12)),
    ]
}

#[test]
fn test_representative_round_trips() {
    for legacy in legacy_deck() {
        let memory = LegacyConverter::legacy_to_memory(&legacy);
        let back = LegacyConverter::memory_to_legacy(legacy.id.clone(), &memory);

        assert_eq!(back.repetitions, legacy.repetitions, "{}", legacy.id);
        assert!((back.interval - legacy.interval).abs() <= 1.0, "{}", legacy.id);
        assert!(LegacyConverter::validate(&legacy, &memory));
    }
}

#[test]
fn test_inferred_states() {
    let report = LegacyConverter::migrate(&legacy_deck());
    let states: Vec<(&str, LearningState)> = report
        .converted
        .iter()
        .map(|(id, memory)| (id.as_str(), memory.state))
        .collect();

    assert_eq!(
        states,
        vec![
            ("steady", LearningState::Review),
            ("fresh-fail", LearningState::Learning),
            ("long-haul", LearningState::Review),
        ]
    );

    let (_, long_haul) = &report.converted[2];
    assert_eq!(long_haul.lapses, 4);
    assert_eq!(long_haul.stability, 30.0);
    assert_eq!(long_haul.difficulty, LegacyConverter::ease_to_difficulty(1.8));
}

#[test]
fn test_inconsistent_record_is_reported_not_fatal() {
    let mut deck = legacy_deck();
    let mut broken = TestDataFactory::legacy_card("broken", 10.0, 2.2, 3, migration_day() - Duration::days(3));
    broken.next_review = Some(migration_day());
    deck.push(broken.clone());

    let report = LegacyConverter::migrate(&deck);
    assert!(!report.is_clean());
    assert_eq!(report.mismatched, vec!["broken".to_string()]);
    assert_eq!(report.converted.len(), 4);

    assert!(matches!(
        LegacyConverter::convert_checked(&broken),
        Err(SchedulerError::ConversionMismatch(_))
    ));
}

#[test]
fn test_migrated_deck_is_studyable() {
    let mut db = TestStoreManager::new_temp();
    let report = LegacyConverter::migrate(&legacy_deck());
    assert!(report.is_clean());

    for (id, memory) in &report.converted {
        let card = Card::new_at(
            TestDataFactory::vocab_input(id, "migrated"),
            migration_day() - Duration::days(60),
        );
        db.store.save(card.with_memory(memory.clone(), migration_day())).unwrap();
    }

    // steady and fresh-fail are due on migration day; long-haul is not
    let pool = db.store.all().unwrap();
    let counts = StudyScheduler::new().due_counts(&pool, migration_day());
    assert_eq!(counts.learning, 1);
    assert_eq!(counts.review, 1);

    let mut session = SessionManager::new(TestDataFactory::scheduler(9), StudyScheduler::new());
    let started = session.start_due(&pool, migration_day()).unwrap().unwrap();
    assert_eq!(started.total_cards, 2);
    assert_eq!(session.current_card().unwrap().front(), "fresh-fail");
}
