//! Integration tests for the practice workflow.
//!
//! Drives the engine and stopwatches, feeds finished records into the store,
//! and checks that daily tasks and statistics follow.

use breath_core::{
    BreathRecord, BreathStopwatch, BreathType, Event, ExerciseConfig, ExercisePhase,
    ExercisePhaseEngine, RecordStore, StatsAggregator, StopwatchKind,
};
use chrono::{Duration, Local, TimeZone, Utc};

fn finish_session(engine: &mut ExercisePhaseEngine) -> Vec<Event> {
    let mut events = engine.start();
    while engine.phase() != ExercisePhase::Completed {
        events.extend(engine.advance(0.1));
    }
    events
}

#[test]
fn test_full_exercise_workflow() {
    let mut store = RecordStore::open_memory().unwrap();
    let now = Local::now();
    store.ensure_daily_tasks(now.date_naive());
    store
        .save_config(ExerciseConfig::new(4.0, 6.0, 2.0, 2))
        .unwrap();

    let mut engine = ExercisePhaseEngine::new(*store.config());
    let events = finish_session(&mut engine);

    let mut updated = Vec::new();
    for record in events.iter().filter_map(Event::finished_record) {
        updated.push(store.add_record_at(record.clone(), now));
    }

    assert_eq!(store.records().len(), 1);
    assert_eq!(store.records()[0].breath_type, BreathType::Exercise);
    assert_eq!(store.records()[0].duration, 32.0);

    let task = updated[0].as_ref().expect("exercise task advanced");
    assert_eq!(task.title, "task_exercise_2");
    assert_eq!(task.current, 1);

    let today = store.records_today();
    let stats = StatsAggregator::new(today);
    assert_eq!(stats.total_count(), 1);
    assert_eq!(stats.total_duration(), 32.0);
}

#[test]
fn test_stopped_session_changes_nothing() {
    let mut store = RecordStore::open_memory().unwrap();
    store.ensure_daily_tasks(Local::now().date_naive());
    let before = store.snapshot();

    let mut engine = ExercisePhaseEngine::new(*store.config());
    let mut events = engine.start();
    events.extend(engine.advance(4.0));
    events.extend(engine.stop());

    for record in events.iter().filter_map(Event::finished_record) {
        store.add_record(record.clone());
    }
    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_hold_stopwatch_feeds_hold_task_until_complete() {
    let mut store = RecordStore::open_memory().unwrap();
    let now = Local::now();
    store.ensure_daily_tasks(now.date_naive());

    for round in 1..=4 {
        let mut watch = BreathStopwatch::new(StopwatchKind::Hold);
        watch.start();
        watch.advance(15.0);
        let record = watch.stop().unwrap();
        let task = store.add_record_at(record, now);
        if round <= 3 {
            assert_eq!(task.unwrap().current, round);
        } else {
            assert!(task.is_none(), "completed task must not grow");
        }
    }

    let hold = store
        .tasks()
        .iter()
        .find(|t| t.breath_type == Some(BreathType::Hold))
        .unwrap();
    assert!(hold.is_completed());
    assert_eq!(hold.current, 3);
    assert_eq!(store.records().len(), 4);
}

#[test]
fn test_best_and_average_scenario() {
    let mut store = RecordStore::open_memory().unwrap();
    let base = Utc.with_ymd_and_hms(2026, 10, 10, 9, 0, 0).unwrap();
    for (i, duration) in [5.0, 42.0, 18.0].into_iter().enumerate() {
        store.add_record(BreathRecord::new(
            BreathType::Hold,
            duration,
            base + Duration::minutes(i as i64),
        ));
    }

    assert_eq!(store.best_record(BreathType::Hold).unwrap().duration, 42.0);
    let avg = store.average_duration(BreathType::Hold, store.records());
    assert!((avg - 21.666_666_666).abs() < 1e-6);

    assert!(store.best_record(BreathType::Exhale).is_none());
    assert_eq!(store.average_duration(BreathType::Exhale, store.records()), 0.0);
}

#[test]
fn test_tasks_from_previous_day_are_replaced() {
    let mut store = RecordStore::open_memory().unwrap();
    let yesterday = Local.with_ymd_and_hms(2026, 10, 17, 20, 0, 0).unwrap();
    let today = yesterday + Duration::hours(14);

    store.ensure_daily_tasks(yesterday.date_naive());
    store.add_record_at(BreathRecord::now(BreathType::Exhale, 9.0), yesterday);

    assert!(store.ensure_daily_tasks(today.date_naive()));
    assert!(!store.ensure_daily_tasks(today.date_naive()));
    assert_eq!(store.tasks().len(), 3);
    assert!(store.tasks().iter().all(|t| t.current == 0));
    assert!(store
        .tasks()
        .iter()
        .all(|t| t.date == today.date_naive()));
}
