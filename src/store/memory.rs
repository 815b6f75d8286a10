use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use itertools::Itertools;

use super::{jersey_needs_backfill, validate_table, EnrichmentCache, RosterStore, UpsertResult};
use crate::error::StoreError;
use crate::model::{EnrichmentFields, GlobalEnrichmentEntry, RawPlayerRecord, RosterKey, SeasonFilter};

type Table = BTreeMap<RosterKey, RawPlayerRecord>;

/// Process-local store with the same semantics as the Postgres one. Backs `--dry-run` and tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Table>>,
    cache: Mutex<HashMap<String, EnrichmentFields>>,
    /// Names whose writes are rejected, to exercise per-record failure paths.
    reject_names: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(names: &[&str]) -> Self {
        Self {
            reject_names: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn seed(&self, table: &str, records: Vec<RawPlayerRecord>) {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let t = tables.entry(table.to_string()).or_default();
        for r in records {
            t.insert(r.key(), r);
        }
    }

    /// Rows of one table in key order.
    pub fn rows(&self, table: &str) -> Vec<RawPlayerRecord> {
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables
            .get(table)
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn cache_entries(&self) -> HashMap<String, EnrichmentFields> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl RosterStore for MemoryStore {
    async fn upsert(&self, table: &str, records: &[RawPlayerRecord]) -> Result<UpsertResult, StoreError> {
        let table = validate_table(table)?;
        let mut result = UpsertResult::default();
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let t = tables.entry(table.to_string()).or_default();

        for rec in records.iter().unique_by(|r| r.key()) {
            if rec.player_name.trim().is_empty() {
                result.failed.push((rec.key(), "player_name is empty".into()));
                continue;
            }
            if self.reject_names.contains(&rec.player_name) {
                result.failed.push((rec.key(), "rejected by store".into()));
                continue;
            }
            match t.get_mut(&rec.key()) {
                Some(existing) => existing.merge_from(rec),
                None => {
                    t.insert(rec.key(), rec.clone());
                }
            }
            result.written += 1;
        }
        Ok(result)
    }

    async fn names_missing_enrichment(
        &self,
        table: &str,
        seasons: Option<SeasonFilter>,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        let table = validate_table(table)?;
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let Some(t) = tables.get(table) else {
            return Ok(Vec::new());
        };
        Ok(t.values()
            .filter(|r| r.enrichment.phonetic_name.is_none())
            .filter(|r| seasons.map_or(true, |s| s.contains(r.season_year)))
            .map(|r| r.player_name.clone())
            .sorted()
            .dedup()
            .take(limit)
            .collect())
    }

    async fn apply_enrichment(
        &self,
        table: &str,
        player_name: &str,
        fields: &EnrichmentFields,
    ) -> Result<u64, StoreError> {
        let table = validate_table(table)?;
        if self.reject_names.contains(player_name) {
            return Err(StoreError::write(format!("{table}/{player_name}"), "rejected by store"));
        }
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let Some(t) = tables.get_mut(table) else {
            return Ok(0);
        };
        let mut touched = 0;
        for rec in t.values_mut() {
            if rec.player_name == player_name && rec.enrichment.phonetic_name.is_none() {
                rec.enrichment = fields.clone();
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn teams_missing_jerseys(&self, table: &str, season: i32) -> Result<Vec<String>, StoreError> {
        let table = validate_table(table)?;
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        Ok(tables
            .get(table)
            .map(|t| {
                t.values()
                    .filter(|r| r.season_year == season && jersey_needs_backfill(r.jersey_number.as_deref()))
                    .map(|r| r.team_id.clone())
                    .sorted()
                    .dedup()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl EnrichmentCache for MemoryStore {
    async fn lookup_many(&self, names: &[String]) -> Result<HashMap<String, EnrichmentFields>, StoreError> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        Ok(names
            .iter()
            .filter_map(|n| cache.get(n).map(|f| (n.clone(), f.clone())))
            .collect())
    }

    async fn upsert_many(&self, entries: &[GlobalEnrichmentEntry]) -> Result<usize, StoreError> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        for e in entries {
            cache.insert(e.player_name.clone(), e.fields.clone());
        }
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(team: &str, season: i32, name: &str, jersey: Option<&str>) -> RawPlayerRecord {
        let mut r = RawPlayerRecord::new(team, season, name);
        r.jersey_number = jersey.map(str::to_string);
        r
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let store = MemoryStore::new();
        let batch = vec![
            rec("dallas-cowboys", 2022, "Dak Prescott", Some("04")),
            rec("dallas-cowboys", 2022, "CeeDee Lamb", Some("88")),
        ];
        let first = store.upsert("nfl_rosters", &batch).await.unwrap();
        let snapshot = store.rows("nfl_rosters");
        let second = store.upsert("nfl_rosters", &batch).await.unwrap();

        assert_eq!(first.written, 2);
        assert_eq!(second.written, 2);
        assert_eq!(store.rows("nfl_rosters"), snapshot);
        assert_eq!(snapshot.len(), 2);
    }

    #[tokio::test]
    async fn failures_are_reported_per_record() {
        let store = MemoryStore::rejecting(&["Bad Row"]);
        let res = store
            .upsert(
                "nfl_rosters",
                &[rec("t", 2022, "Good Row", None), rec("t", 2022, "Bad Row", None)],
            )
            .await
            .unwrap();
        assert_eq!(res.written, 1);
        assert_eq!(res.failed.len(), 1);
        assert_eq!(res.failed[0].0.player_name, "Bad Row");
    }

    #[tokio::test]
    async fn enrichment_is_fill_once() {
        let store = MemoryStore::new();
        store.seed("nba_rosters", vec![rec("t", 2024, "Luka Doncic", None)]);
        let first = EnrichmentFields {
            phonetic_name: Some("LOO-kah DON-chich".into()),
            ..Default::default()
        };
        let second = EnrichmentFields {
            phonetic_name: Some("other".into()),
            ..Default::default()
        };
        assert_eq!(store.apply_enrichment("nba_rosters", "Luka Doncic", &first).await.unwrap(), 1);
        assert_eq!(store.apply_enrichment("nba_rosters", "Luka Doncic", &second).await.unwrap(), 0);
        assert_eq!(
            store.rows("nba_rosters")[0].enrichment.phonetic_name.as_deref(),
            Some("LOO-kah DON-chich")
        );
        assert!(store
            .names_missing_enrichment("nba_rosters", None, 10)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn missing_names_are_distinct_and_season_filtered() {
        let store = MemoryStore::new();
        store.seed(
            "nba_rosters",
            vec![
                rec("a", 2023, "Zion Williamson", None),
                rec("a", 2024, "Zion Williamson", None),
                rec("b", 2024, "Anthony Edwards", None),
                rec("b", 2019, "Old Timer", None),
            ],
        );
        let all = store.names_missing_enrichment("nba_rosters", None, 10).await.unwrap();
        assert_eq!(all, vec!["Anthony Edwards", "Old Timer", "Zion Williamson"]);
        let recent = store
            .names_missing_enrichment("nba_rosters", Some("2023-2024".parse().unwrap()), 1)
            .await
            .unwrap();
        assert_eq!(recent, vec!["Anthony Edwards"]);
    }

    #[tokio::test]
    async fn jersey_gap_teams() {
        let store = MemoryStore::new();
        store.seed(
            "nfl_rosters",
            vec![
                rec("dallas-cowboys", 2022, "A", None),
                rec("dallas-cowboys", 2022, "B", Some("00")),
                rec("buffalo-bills", 2022, "C", Some("17")),
                rec("buffalo-bills", 2021, "D", None),
            ],
        );
        assert_eq!(
            store.teams_missing_jerseys("nfl_rosters", 2022).await.unwrap(),
            vec!["dallas-cowboys"]
        );
    }
}
