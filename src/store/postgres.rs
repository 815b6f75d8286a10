use std::collections::HashMap;

use async_trait::async_trait;
use itertools::Itertools;
use sqlx::{Postgres, QueryBuilder};
use tracing::{info, instrument, warn};

use super::{validate_table, EnrichmentCache, RosterStore, UpsertResult, GLOBAL_ENRICHMENT_TABLE};
use crate::error::StoreError;
use crate::model::{EnrichmentFields, GlobalEnrichmentEntry, RawPlayerRecord, SeasonFilter};
use crate::util::db::Db;

/// Rows per multi-VALUES statement; keeps bind counts well under the Postgres limit.
const UPSERT_CHUNK: usize = 500;

const ROSTER_COLUMNS: &str = "team_id, season_year, player_name, player_id, jersey_number, position, \
     height, weight, birth_date, college, birthplace, nationality, age, years_pro";

/// Scraped columns refresh only when the incoming value is non-null.
const ROSTER_CONFLICT: &str = " ON CONFLICT (team_id, season_year, player_name) DO UPDATE SET \
     player_id = COALESCE(EXCLUDED.player_id, t.player_id), \
     jersey_number = COALESCE(EXCLUDED.jersey_number, t.jersey_number), \
     position = COALESCE(EXCLUDED.position, t.position), \
     height = COALESCE(EXCLUDED.height, t.height), \
     weight = COALESCE(EXCLUDED.weight, t.weight), \
     birth_date = COALESCE(EXCLUDED.birth_date, t.birth_date), \
     college = COALESCE(EXCLUDED.college, t.college), \
     birthplace = COALESCE(EXCLUDED.birthplace, t.birthplace), \
     nationality = COALESCE(EXCLUDED.nationality, t.nationality), \
     age = COALESCE(EXCLUDED.age, t.age), \
     years_pro = COALESCE(EXCLUDED.years_pro, t.years_pro), \
     updated_at = now()";

#[derive(Clone)]
pub struct PgRosterStore {
    db: Db,
}

impl PgRosterStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    async fn insert_rows(&self, table: &str, rows: &[&RawPlayerRecord]) -> Result<u64, sqlx::Error> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("INSERT INTO {table} AS t ({ROSTER_COLUMNS}) "));
        qb.push_values(rows, |mut b, r| {
            b.push_bind(r.team_id.clone())
                .push_bind(r.season_year)
                .push_bind(r.player_name.clone())
                .push_bind(r.player_id.clone())
                .push_bind(r.jersey_number.clone())
                .push_bind(r.position.clone())
                .push_bind(r.height.clone())
                .push_bind(r.weight.clone())
                .push_bind(r.birth_date_naive())
                .push_bind(r.college.clone())
                .push_bind(r.birthplace.clone())
                .push_bind(r.nationality.clone())
                .push_bind(r.age)
                .push_bind(r.years_pro);
        });
        qb.push(ROSTER_CONFLICT);
        let res = qb.build().persistent(false).execute(&self.db.pool).await?;
        Ok(res.rows_affected())
    }
}

#[async_trait]
impl RosterStore for PgRosterStore {
    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert(&self, table: &str, records: &[RawPlayerRecord]) -> Result<UpsertResult, StoreError> {
        let table = validate_table(table)?;
        let unique: Vec<&RawPlayerRecord> = records.iter().unique_by(|r| r.key()).collect();
        let mut result = UpsertResult::default();

        for chunk in unique.chunks(UPSERT_CHUNK) {
            match self.insert_rows(table, chunk).await {
                Ok(n) => result.written += n as usize,
                Err(e) => {
                    // Retry row by row so one bad record cannot sink its neighbours.
                    warn!(table, error = %e, rows = chunk.len(), "batch upsert failed; retrying per record");
                    for rec in chunk {
                        match self.insert_rows(table, std::slice::from_ref(rec)).await {
                            Ok(n) => result.written += n as usize,
                            Err(e) => {
                                warn!(table, key = %rec.key(), error = %e, "record upsert failed");
                                result.failed.push((rec.key(), e.to_string()));
                            }
                        }
                    }
                }
            }
        }
        info!(table, written = result.written, failed = result.failed.len(), "upsert complete");
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn names_missing_enrichment(
        &self,
        table: &str,
        seasons: Option<SeasonFilter>,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        let table = validate_table(table)?;
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT DISTINCT player_name FROM {table} WHERE phonetic_name IS NULL"
        ));
        match seasons {
            Some(SeasonFilter::Single(y)) => {
                qb.push(" AND season_year = ").push_bind(y);
            }
            Some(SeasonFilter::Range { start, end }) => {
                qb.push(" AND season_year BETWEEN ")
                    .push_bind(start)
                    .push(" AND ")
                    .push_bind(end);
            }
            None => {}
        }
        qb.push(" ORDER BY player_name LIMIT ").push_bind(limit as i64);
        let names: Vec<String> = qb
            .build_query_scalar()
            .persistent(false)
            .fetch_all(&self.db.pool)
            .await?;
        Ok(names)
    }

    #[instrument(skip(self, fields))]
    async fn apply_enrichment(
        &self,
        table: &str,
        player_name: &str,
        fields: &EnrichmentFields,
    ) -> Result<u64, StoreError> {
        let table = validate_table(table)?;
        let sql = format!(
            "UPDATE {table} SET phonetic_name = $1, ipa_name = $2, chinese_name = $3, \
             hardware_safe_name = $4, updated_at = now() \
             WHERE player_name = $5 AND phonetic_name IS NULL"
        );
        let res = sqlx::query(&sql)
            .persistent(false)
            .bind(fields.phonetic_name.as_ref())
            .bind(fields.ipa_name.as_ref())
            .bind(fields.chinese_name.as_ref())
            .bind(fields.hardware_safe_name.as_ref())
            .bind(player_name)
            .execute(&self.db.pool)
            .await
            .map_err(|e| StoreError::write(format!("{table}/{player_name}"), e.to_string()))?;
        Ok(res.rows_affected())
    }

    #[instrument(skip(self))]
    async fn teams_missing_jerseys(&self, table: &str, season: i32) -> Result<Vec<String>, StoreError> {
        let table = validate_table(table)?;
        let sql = format!(
            "SELECT DISTINCT team_id FROM {table} WHERE season_year = $1 \
             AND (jersey_number IS NULL OR btrim(jersey_number) = '' OR jersey_number = '00') \
             ORDER BY team_id"
        );
        let teams: Vec<String> = sqlx::query_scalar(&sql)
            .persistent(false)
            .bind(season)
            .fetch_all(&self.db.pool)
            .await?;
        Ok(teams)
    }
}

#[derive(sqlx::FromRow)]
struct CacheRow {
    player_name: String,
    phonetic_name: Option<String>,
    ipa_name: Option<String>,
    chinese_name: Option<String>,
    hardware_safe_name: Option<String>,
}

#[async_trait]
impl EnrichmentCache for PgRosterStore {
    #[instrument(skip(self, names), fields(count = names.len()))]
    async fn lookup_many(&self, names: &[String]) -> Result<HashMap<String, EnrichmentFields>, StoreError> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }
        let sql = format!(
            "SELECT player_name, phonetic_name, ipa_name, chinese_name, hardware_safe_name \
             FROM {GLOBAL_ENRICHMENT_TABLE} WHERE player_name = ANY($1)"
        );
        let rows: Vec<CacheRow> = sqlx::query_as(&sql)
            .persistent(false)
            .bind(names)
            .fetch_all(&self.db.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.player_name,
                    EnrichmentFields {
                        phonetic_name: r.phonetic_name,
                        ipa_name: r.ipa_name,
                        chinese_name: r.chinese_name,
                        hardware_safe_name: r.hardware_safe_name,
                    },
                )
            })
            .collect())
    }

    #[instrument(skip(self, entries), fields(count = entries.len()))]
    async fn upsert_many(&self, entries: &[GlobalEnrichmentEntry]) -> Result<usize, StoreError> {
        if entries.is_empty() {
            return Ok(0);
        }
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {GLOBAL_ENRICHMENT_TABLE} AS g \
             (player_name, phonetic_name, ipa_name, chinese_name, hardware_safe_name) "
        ));
        qb.push_values(entries.iter().unique_by(|e| &e.player_name), |mut b, e| {
            b.push_bind(e.player_name.clone())
                .push_bind(e.fields.phonetic_name.clone())
                .push_bind(e.fields.ipa_name.clone())
                .push_bind(e.fields.chinese_name.clone())
                .push_bind(e.fields.hardware_safe_name.clone());
        });
        qb.push(
            " ON CONFLICT (player_name) DO UPDATE SET \
               phonetic_name = COALESCE(EXCLUDED.phonetic_name, g.phonetic_name), \
               ipa_name = COALESCE(EXCLUDED.ipa_name, g.ipa_name), \
               chinese_name = COALESCE(EXCLUDED.chinese_name, g.chinese_name), \
               hardware_safe_name = COALESCE(EXCLUDED.hardware_safe_name, g.hardware_safe_name), \
               updated_at = now()",
        );
        let res = qb
            .build()
            .persistent(false)
            .execute(&self.db.pool)
            .await
            .map_err(|e| StoreError::write(GLOBAL_ENRICHMENT_TABLE, e.to_string()))?;
        Ok(res.rows_affected() as usize)
    }
}
