//! The single owner of records, daily tasks and exercise configuration.
//!
//! Persistence is best effort: a document that cannot be read falls back to
//! an empty collection (or the default config), and a failed write is logged
//! while the in-memory state carries on.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Local, Months, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Database, DocumentBackend};
use crate::error::{Result, ValidationError};
use crate::record::{BreathRecord, BreathType};
use crate::stats::{StatsAggregator, Timeframe};
use crate::task::{self, DailyTask};
use crate::timer::ExerciseConfig;

pub const RECORDS_KEY: &str = "breath_records";
pub const TASKS_KEY: &str = "daily_tasks";
pub const CONFIG_KEY: &str = "exercise_config";

/// Full persisted state, used for export and equality checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub records: Vec<BreathRecord>,
    #[serde(default)]
    pub tasks: Vec<DailyTask>,
    #[serde(default)]
    pub config: ExerciseConfig,
}

pub struct RecordStore {
    backend: Box<dyn DocumentBackend>,
    /// Newest first.
    records: Vec<BreathRecord>,
    tasks: Vec<DailyTask>,
    config: ExerciseConfig,
}

impl RecordStore {
    /// Open the store on the default database.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened. Unreadable
    /// documents inside it are not errors.
    pub fn open() -> Result<Self> {
        Ok(Self::load(Box::new(Database::open()?)))
    }

    /// Store backed by an in-memory database.
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_memory() -> Result<Self> {
        Ok(Self::load(Box::new(Database::open_memory()?)))
    }

    /// Load all documents from `backend`, falling back to empty/default state.
    pub fn load(backend: Box<dyn DocumentBackend>) -> Self {
        let records = read_document(backend.as_ref(), RECORDS_KEY).unwrap_or_default();
        let tasks = read_document(backend.as_ref(), TASKS_KEY).unwrap_or_default();
        let config: ExerciseConfig = read_document(backend.as_ref(), CONFIG_KEY)
            .filter(|cfg: &ExerciseConfig| cfg.is_positive())
            .unwrap_or_default();
        Self {
            backend,
            records,
            tasks,
            config,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// All records, newest first.
    pub fn records(&self) -> &[BreathRecord] {
        &self.records
    }

    pub fn tasks(&self) -> &[DailyTask] {
        &self.tasks
    }

    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            records: self.records.clone(),
            tasks: self.tasks.clone(),
            config: self.config,
        }
    }

    pub fn tasks_for(&self, day: NaiveDate) -> Vec<&DailyTask> {
        self.tasks.iter().filter(|t| t.date == day).collect()
    }

    /// Records with `start <= date <= end`.
    pub fn records_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&BreathRecord> {
        self.records
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .collect()
    }

    /// Records on the local calendar day `day`.
    pub fn records_on(&self, day: NaiveDate) -> Vec<&BreathRecord> {
        self.records
            .iter()
            .filter(|r| r.date.with_timezone(&Local).date_naive() == day)
            .collect()
    }

    /// Records with `date >= since`.
    pub fn records_since(&self, since: DateTime<Utc>) -> Vec<&BreathRecord> {
        self.records.iter().filter(|r| r.date >= since).collect()
    }

    pub fn records_today(&self) -> Vec<&BreathRecord> {
        self.records_in(Timeframe::Today, Local::now())
    }

    pub fn records_last_week(&self) -> Vec<&BreathRecord> {
        self.records_in(Timeframe::Week, Local::now())
    }

    pub fn records_last_month(&self) -> Vec<&BreathRecord> {
        self.records_in(Timeframe::Month, Local::now())
    }

    /// Records inside `timeframe` as seen from `now`.
    pub fn records_in(&self, timeframe: Timeframe, now: DateTime<Local>) -> Vec<&BreathRecord> {
        match timeframe {
            Timeframe::Today => self.records_on(now.date_naive()),
            Timeframe::Week => self.records_since((now - Duration::days(7)).with_timezone(&Utc)),
            Timeframe::Month => {
                let since = now
                    .checked_sub_months(Months::new(1))
                    .unwrap_or(now - Duration::days(30));
                self.records_since(since.with_timezone(&Utc))
            }
        }
    }

    /// Longest record of `breath_type` over the whole history.
    pub fn best_record(&self, breath_type: BreathType) -> Option<&BreathRecord> {
        StatsAggregator::new(&self.records).best(breath_type)
    }

    /// Mean duration of `breath_type` records inside `within`; 0 when none.
    pub fn average_duration<'a>(
        &self,
        breath_type: BreathType,
        within: impl IntoIterator<Item = &'a BreathRecord>,
    ) -> f64 {
        StatsAggregator::new(within).average_for(breath_type)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Store `record` as the newest entry and credit today's tasks.
    ///
    /// Returns the task that advanced, if any.
    pub fn add_record(&mut self, record: BreathRecord) -> Option<DailyTask> {
        self.add_record_at(record, Local::now())
    }

    /// [`Self::add_record`] with an explicit "now" for the task day.
    pub fn add_record_at(
        &mut self,
        record: BreathRecord,
        now: DateTime<Local>,
    ) -> Option<DailyTask> {
        let breath_type = record.breath_type;
        info!(id = %record.id, kind = %breath_type, duration = record.duration, "record added");
        self.records.insert(0, record);
        self.persist_records();

        let index = task::apply_record(&mut self.tasks, breath_type, now.date_naive())?;
        self.persist_tasks();
        let updated = self.tasks[index].clone();
        info!(
            task = %updated.title,
            current = updated.current,
            target = updated.target,
            "daily task advanced"
        );
        Some(updated)
    }

    /// Generate the daily template for `today` unless tasks for it exist.
    ///
    /// Tasks from earlier days are replaced. Returns whether new tasks were
    /// generated.
    pub fn ensure_daily_tasks(&mut self, today: NaiveDate) -> bool {
        if self.tasks.iter().any(|t| t.date == today) {
            return false;
        }
        debug!(%today, "generating daily tasks");
        self.tasks = task::daily_template(today);
        self.persist_tasks();
        true
    }

    /// Validate and persist new exercise parameters.
    ///
    /// # Errors
    /// Returns the first out-of-range field; the stored config is unchanged.
    pub fn save_config(&mut self, config: ExerciseConfig) -> Result<(), ValidationError> {
        config.validate()?;
        self.config = config;
        self.persist(CONFIG_KEY, &self.config);
        Ok(())
    }

    /// Delete every record and task. Irreversible.
    pub fn reset_all(&mut self) {
        info!(
            records = self.records.len(),
            tasks = self.tasks.len(),
            "deleting all data"
        );
        self.records.clear();
        self.tasks.clear();
        self.persist_records();
        self.persist_tasks();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn persist_records(&self) {
        self.persist(RECORDS_KEY, &self.records);
    }

    fn persist_tasks(&self) {
        self.persist(TASKS_KEY, &self.tasks);
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "failed to encode document, keeping in-memory state");
                return;
            }
        };
        if let Err(e) = self.backend.write(key, &json) {
            warn!(key, error = %e, "failed to save document, keeping in-memory state");
        }
    }
}

fn read_document<T: DeserializeOwned>(backend: &dyn DocumentBackend, key: &str) -> Option<T> {
    match backend.read(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "unreadable document, using default");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "failed to load document, using default");
            None
        }
    }
}

/// A [`RecordStore`] shared across threads.
///
/// Mutations are serialized by a mutex; reads hand out cloned snapshots.
#[derive(Clone)]
pub struct SharedRecordStore {
    inner: Arc<Mutex<RecordStore>>,
}

impl SharedRecordStore {
    pub fn new(store: RecordStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RecordStore> {
        // Mutations finish in memory before persisting; a poisoned lock
        // still guards a consistent store.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_record(&self, record: BreathRecord) -> Option<DailyTask> {
        self.lock().add_record(record)
    }

    pub fn ensure_daily_tasks(&self, today: NaiveDate) -> bool {
        self.lock().ensure_daily_tasks(today)
    }

    pub fn save_config(&self, config: ExerciseConfig) -> Result<(), ValidationError> {
        self.lock().save_config(config)
    }

    pub fn reset_all(&self) {
        self.lock().reset_all();
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.lock().snapshot()
    }

    /// Run a read-only query against the store.
    pub fn read<R>(&self, f: impl FnOnce(&RecordStore) -> R) -> R {
        f(&self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use chrono::TimeZone;

    struct FailingBackend;

    impl DocumentBackend for FailingBackend {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::QueryFailed("disk unavailable".into()))
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::QueryFailed("disk unavailable".into()))
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).single().unwrap()
    }

    fn record_at(breath_type: BreathType, duration: f64, when: DateTime<Local>) -> BreathRecord {
        BreathRecord::new(breath_type, duration, when.with_timezone(&Utc))
    }

    #[test]
    fn add_record_prepends() {
        let mut store = RecordStore::open_memory().unwrap();
        store.add_record_at(record_at(BreathType::Hold, 10.0, noon()), noon());
        store.add_record_at(record_at(BreathType::Exhale, 20.0, noon()), noon());
        assert_eq!(store.records().len(), 2);
        assert_eq!(store.records()[0].breath_type, BreathType::Exhale);
    }

    #[test]
    fn hold_record_advances_first_incomplete_hold_task() {
        let mut store = RecordStore::open_memory().unwrap();
        store.ensure_daily_tasks(noon().date_naive());

        for expected in 1..=3 {
            let task = store
                .add_record_at(record_at(BreathType::Hold, 8.0, noon()), noon())
                .unwrap();
            assert_eq!(task.title, "task_hold_3");
            assert_eq!(task.current, expected);
        }
        assert!(store
            .add_record_at(record_at(BreathType::Hold, 8.0, noon()), noon())
            .is_none());

        let hold = &store.tasks()[0];
        assert_eq!(hold.current, 3);
        assert!(hold.is_completed());
        assert!(store.tasks()[1..].iter().all(|t| t.current == 0));
    }

    #[test]
    fn records_on_other_day_do_not_credit_stale_tasks() {
        let mut store = RecordStore::open_memory().unwrap();
        let yesterday = noon() - Duration::days(1);
        store.ensure_daily_tasks(yesterday.date_naive());
        assert!(store
            .add_record_at(record_at(BreathType::Exhale, 9.0, noon()), noon())
            .is_none());
    }

    #[test]
    fn ensure_daily_tasks_is_idempotent() {
        let mut store = RecordStore::open_memory().unwrap();
        let today = noon().date_naive();
        assert!(store.ensure_daily_tasks(today));
        assert!(!store.ensure_daily_tasks(today));
        assert_eq!(store.tasks_for(today).len(), 3);
        assert_eq!(store.tasks().len(), 3);
    }

    #[test]
    fn new_day_replaces_old_tasks() {
        let mut store = RecordStore::open_memory().unwrap();
        let today = noon().date_naive();
        store.ensure_daily_tasks(today.pred_opt().unwrap());
        assert!(store.ensure_daily_tasks(today));
        assert_eq!(store.tasks().len(), 3);
        assert!(store.tasks().iter().all(|t| t.date == today));
    }

    #[test]
    fn timeframes_use_rolling_windows() {
        let mut store = RecordStore::open_memory().unwrap();
        let now = noon();
        for days_ago in [0, 3, 8, 20, 40] {
            let when = now - Duration::days(days_ago);
            store.add_record_at(record_at(BreathType::Hold, days_ago as f64, when), now);
        }
        assert_eq!(store.records_in(Timeframe::Today, now).len(), 1);
        assert_eq!(store.records_in(Timeframe::Week, now).len(), 2);
        assert_eq!(store.records_in(Timeframe::Month, now).len(), 4);
    }

    #[test]
    fn records_between_is_inclusive() {
        let mut store = RecordStore::open_memory().unwrap();
        let start = noon().with_timezone(&Utc);
        let end = start + Duration::hours(1);
        store.add_record(BreathRecord::new(BreathType::Hold, 1.0, start));
        store.add_record(BreathRecord::new(BreathType::Hold, 2.0, end));
        store.add_record(BreathRecord::new(BreathType::Hold, 3.0, end + Duration::seconds(1)));
        assert_eq!(store.records_between(start, end).len(), 2);
    }

    #[test]
    fn best_and_average() {
        let mut store = RecordStore::open_memory().unwrap();
        assert!(store.best_record(BreathType::Hold).is_none());
        for d in [5.0, 42.0, 18.0] {
            store.add_record(BreathRecord::now(BreathType::Hold, d));
        }
        assert_eq!(store.best_record(BreathType::Hold).unwrap().duration, 42.0);
        let avg = store.average_duration(BreathType::Hold, store.records());
        assert!((avg - 21.666_666_666).abs() < 1e-6);
        assert_eq!(store.average_duration(BreathType::Exhale, store.records()), 0.0);
        assert_eq!(store.average_duration(BreathType::Hold, Vec::<&BreathRecord>::new()), 0.0);
    }

    #[test]
    fn save_config_rejects_out_of_range() {
        let mut store = RecordStore::open_memory().unwrap();
        let err = store
            .save_config(ExerciseConfig::new(4.0, 6.0, 2.0, 0))
            .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "cycles", .. }));
        assert_eq!(store.config(), &ExerciseConfig::default());

        store.save_config(ExerciseConfig::new(5.0, 8.0, 3.0, 4)).unwrap();
        assert_eq!(store.config().cycles, 4);
    }

    #[test]
    fn reset_all_clears_records_and_tasks() {
        let mut store = RecordStore::open_memory().unwrap();
        store.ensure_daily_tasks(noon().date_naive());
        store.add_record(BreathRecord::now(BreathType::Hold, 3.0));
        store.save_config(ExerciseConfig::new(5.0, 8.0, 3.0, 4)).unwrap();
        store.reset_all();
        assert!(store.records().is_empty());
        assert!(store.tasks().is_empty());
        assert_eq!(store.config().cycles, 4);
    }

    #[test]
    fn failing_backend_falls_back_and_keeps_memory_state() {
        let mut store = RecordStore::load(Box::new(FailingBackend));
        assert!(store.records().is_empty());
        assert_eq!(store.config(), &ExerciseConfig::default());

        store.ensure_daily_tasks(noon().date_naive());
        let task = store.add_record_at(record_at(BreathType::Exercise, 80.0, noon()), noon());
        assert_eq!(task.unwrap().current, 1);
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn corrupt_documents_fall_back_to_defaults() {
        let db = Database::open_memory().unwrap();
        db.kv_set(RECORDS_KEY, "not json").unwrap();
        db.kv_set(CONFIG_KEY, r#"{"hold_duration": -1}"#).unwrap();
        db.kv_set(TASKS_KEY, "[]").unwrap();
        let store = RecordStore::load(Box::new(db));
        assert!(store.records().is_empty());
        assert_eq!(store.config(), &ExerciseConfig::default());
    }

    #[test]
    fn shared_store_serializes_writers() {
        let shared = SharedRecordStore::new(RecordStore::open_memory().unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = shared.clone();
                std::thread::spawn(move || {
                    store.add_record(BreathRecord::now(BreathType::Exhale, i as f64));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(shared.snapshot().records.len(), 4);
        assert_eq!(shared.read(|s| s.records().len()), 4);
    }
}
