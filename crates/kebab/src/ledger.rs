//! The ledger: a row store plus the derived, cached analysis snapshot.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::SnapshotCache;
use crate::config::LedgerConfig;
use crate::error::Result;
use crate::normalize::{Normalization, Normalizer, RecordSet};
use crate::stats::{
    AnovaOutcome, Comparison, GroupBy, IndependenceTest, Summary, group_anova,
    independence_test, pairwise_compare, summary,
};
use crate::store::{Entry, RowStore, WriteOutcome};

/// Everything derived from one read of the store.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub normalization: Normalization,
    /// Sorted preparer keys: the configured seed plus every key in the data.
    pub known_preparers: Vec<String>,
}

impl Snapshot {
    pub fn records(&self) -> &RecordSet {
        &self.normalization.records
    }
}

/// Reads, writes and analyses observations held in a [`RowStore`].
///
/// The snapshot is rebuilt lazily: every write drops it, and a snapshot
/// older than the configured time-to-live is rebuilt on next access.
pub struct Ledger<S: RowStore> {
    store: S,
    config: LedgerConfig,
    normalizer: Normalizer,
    cache: SnapshotCache<Snapshot>,
}

impl<S: RowStore> Ledger<S> {
    pub fn new(store: S, config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = Normalizer::new(config.columns.clone(), config.normalizer.clone());
        let cache = SnapshotCache::new(config.cache_ttl());

        Ok(Self {
            store,
            config,
            normalizer,
            cache,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// The current snapshot, read from the store if the cached one is gone.
    pub fn snapshot(&mut self) -> Result<Arc<Snapshot>> {
        let (store, normalizer) = (&self.store, &self.normalizer);
        self.cache
            .get_or_refresh(|| load_snapshot(store, normalizer))
    }

    /// Drop the cached snapshot.
    pub fn refresh(&mut self) {
        self.cache.invalidate();
    }

    /// Append an entry under the next free id and return that id.
    pub fn add(&mut self, entry: &Entry) -> Result<u64> {
        entry.validate()?;

        let id = self.store.next_id()?;
        let fields = entry.to_fields(id, &self.config.columns, &self.config.normalizer.timestamp);
        self.store.append(&fields)?;
        self.cache.invalidate();

        info!(id, preparer = %entry.stored_preparer(), "Added entry");
        Ok(id)
    }

    /// Replace the row with this id.
    pub fn update(&mut self, id: u64, entry: &Entry) -> Result<WriteOutcome> {
        entry.validate()?;

        let fields = entry.to_fields(id, &self.config.columns, &self.config.normalizer.timestamp);
        let outcome = self.store.update(id, &fields)?;
        self.cache.invalidate();

        debug!(id, ?outcome, "Updated entry");
        Ok(outcome)
    }

    pub fn delete(&mut self, id: u64) -> Result<WriteOutcome> {
        let outcome = self.store.delete(id)?;
        self.cache.invalidate();

        debug!(id, ?outcome, "Deleted entry");
        Ok(outcome)
    }

    /// Welch comparison of two preparers. Labels are matched after alias
    /// resolution, so `og` and `OG1` name the same group.
    pub fn compare(&mut self, preparer_a: &str, preparer_b: &str) -> Result<Comparison> {
        let key_a = self.normalizer.preparer_key(preparer_a);
        let key_b = self.normalizer.preparer_key(preparer_b);
        let snapshot = self.snapshot()?;
        Ok(pairwise_compare(
            snapshot.records(),
            &key_a,
            &key_b,
            &self.config.stats,
        ))
    }

    pub fn anova(&mut self, by: GroupBy) -> Result<AnovaOutcome> {
        let snapshot = self.snapshot()?;
        Ok(group_anova(snapshot.records(), by, &self.config.stats))
    }

    /// Whether preparers favour particular weekdays, leaving out the
    /// configured sentinel labels.
    pub fn schedule(&mut self) -> Result<IndependenceTest> {
        let excluded: Vec<String> = self
            .config
            .stats
            .excluded_labels
            .iter()
            .map(|label| self.normalizer.preparer_key(label))
            .collect();
        let snapshot = self.snapshot()?;
        Ok(independence_test(
            snapshot.records(),
            GroupBy::Weekday,
            GroupBy::Preparer,
            &excluded,
            &self.config.stats,
        ))
    }

    pub fn summary(&mut self) -> Result<Summary> {
        let snapshot = self.snapshot()?;
        Ok(summary(snapshot.records()))
    }
}

fn load_snapshot<S: RowStore>(store: &S, normalizer: &Normalizer) -> Result<Snapshot> {
    let table = store.read_all()?;
    let normalization = normalizer.normalize_table(&table);
    let known_preparers = normalizer.known_preparers(&normalization.records);

    info!(
        store = %store.describe(),
        records = normalization.records.len(),
        issues = normalization.issues.len(),
        fingerprint = %normalization.records.fingerprint(),
        "Refreshed snapshot"
    );

    Ok(Snapshot {
        normalization,
        known_preparers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnNames;
    use crate::input::RawTable;
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, NaiveTime};

    fn entry(day: u32, weight: u32, preparer: &str) -> Entry {
        Entry::new(
            NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            weight,
            preparer,
            2,
        )
    }

    fn ledger() -> Ledger<MemoryStore> {
        Ledger::new(
            MemoryStore::new(&ColumnNames::default()),
            LedgerConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_add_allocates_ids() {
        let mut ledger = ledger();
        assert_eq!(ledger.add(&entry(10, 400, "og1")).unwrap(), 1);
        assert_eq!(ledger.add(&entry(11, 420, "chef")).unwrap(), 2);

        let snapshot = ledger.snapshot().unwrap();
        assert_eq!(snapshot.records().len(), 2);
        assert_eq!(snapshot.records().get(1).unwrap().preparer_key, "OG1");
        assert_eq!(snapshot.records().get(1).unwrap().weekday_label.as_deref(), Some("Mo"));
    }

    #[test]
    fn test_add_rejects_invalid_entry() {
        let mut ledger = ledger();
        assert!(ledger.add(&entry(10, 2000, "OG1")).is_err());
        assert!(ledger.snapshot().unwrap().records().is_empty());
    }

    #[test]
    fn test_writes_invalidate_snapshot() {
        let mut ledger = ledger();
        ledger.add(&entry(10, 400, "OG1")).unwrap();
        assert_eq!(ledger.snapshot().unwrap().records().len(), 1);

        ledger.add(&entry(11, 410, "OG1")).unwrap();
        assert_eq!(ledger.snapshot().unwrap().records().len(), 2);

        assert_eq!(ledger.update(1, &entry(10, 999, "OG2")).unwrap(), WriteOutcome::Applied);
        let snapshot = ledger.snapshot().unwrap();
        assert_eq!(snapshot.records().get(1).unwrap().weight_g, Some(999));

        assert_eq!(ledger.delete(2).unwrap(), WriteOutcome::Applied);
        assert_eq!(ledger.snapshot().unwrap().records().len(), 1);
    }

    #[test]
    fn test_missing_ids_are_reported() {
        let mut ledger = ledger();
        ledger.add(&entry(10, 400, "OG1")).unwrap();
        assert_eq!(ledger.delete(42).unwrap(), WriteOutcome::RowNotFound);
        assert_eq!(
            ledger.update(42, &entry(10, 400, "OG1")).unwrap(),
            WriteOutcome::RowNotFound
        );
        assert_eq!(ledger.snapshot().unwrap().records().len(), 1);
    }

    #[test]
    fn test_compare_resolves_aliases() {
        let mut ledger = ledger();
        for w in [400, 410, 420] {
            ledger.add(&entry(10, w, "OG1")).unwrap();
        }
        for w in [450, 460, 470] {
            ledger.add(&entry(11, w, "M")).unwrap();
        }

        let Comparison::Tested(test) = ledger.compare("og", "chef").unwrap() else {
            panic!("expected a test result");
        };
        assert_eq!(test.heavier, "CHEF");
        assert!(test.significant);
    }

    #[test]
    fn test_schedule_excludes_sentinel() {
        let mut ledger = ledger();
        ledger.add(&entry(10, 400, "OG1")).unwrap();
        ledger.add(&entry(11, 400, "CHEF")).unwrap();
        ledger.add(&entry(15, 400, "idiot")).unwrap();

        let result = ledger.schedule().unwrap();
        assert!(!result.table.columns.iter().any(|c| c == "IDIOT"));
        assert!(!result.table.rows.iter().any(|r| r == "Sa"));
    }

    #[test]
    fn test_known_preparers_include_seed() {
        let table = RawTable::new(
            vec!["id".into(), "zubereitet".into()],
            vec![vec!["1".into(), "neu".into()]],
        );
        let mut ledger = Ledger::new(
            MemoryStore::from_table(table, "id"),
            LedgerConfig::default(),
        )
        .unwrap();

        let snapshot = ledger.snapshot().unwrap();
        assert!(snapshot.known_preparers.contains(&"NEU".to_string()));
        assert!(snapshot.known_preparers.contains(&"ANDERE".to_string()));
    }

    #[test]
    fn test_add_after_float_formatted_id() {
        let table = RawTable::new(
            vec!["id".into(), "gewicht_g".into()],
            vec![vec!["4.0".into(), "400".into()]],
        );
        let mut ledger = Ledger::new(
            MemoryStore::from_table(table, "id"),
            LedgerConfig::default(),
        )
        .unwrap();

        assert_eq!(ledger.add(&entry(10, 410, "OG1")).unwrap(), 5);
        assert_eq!(ledger.add(&entry(11, 420, "CHEF")).unwrap(), 6);

        let snapshot = ledger.snapshot().unwrap();
        let ids: Vec<u64> = snapshot.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 5, 6]);
        assert_eq!(snapshot.records().get(4).unwrap().weight_g, Some(400));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = LedgerConfig::default();
        config.stats.significance = 1.5;
        assert!(Ledger::new(MemoryStore::new(&ColumnNames::default()), config).is_err());
    }
}
