//! Persistence seams: per-league roster tables and the cross-league enrichment cache.
//!
//! Field policy:
//! - scraped columns are refresh-non-null (a new non-null value wins, a null never erases)
//! - enrichment columns are fill-once (only rows whose `phonetic_name IS NULL` are written)

pub mod memory;
pub mod postgres;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{EnrichmentFields, GlobalEnrichmentEntry, RawPlayerRecord, RosterKey, SeasonFilter};

pub const GLOBAL_ENRICHMENT_TABLE: &str = "global_player_enrichment";

/// Outcome of one batched upsert. Failures are reported per record, never dropped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpsertResult {
    pub written: usize,
    pub failed: Vec<(RosterKey, String)>,
}

#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Insert-or-update on exactly (team_id, season_year, player_name).
    async fn upsert(&self, table: &str, records: &[RawPlayerRecord]) -> Result<UpsertResult, StoreError>;

    /// Distinct names with `phonetic_name IS NULL`, name-ordered, at most `limit`.
    async fn names_missing_enrichment(
        &self,
        table: &str,
        seasons: Option<SeasonFilter>,
        limit: usize,
    ) -> Result<Vec<String>, StoreError>;

    /// Write enrichment to every not-yet-enriched row carrying this name. Returns rows touched.
    async fn apply_enrichment(
        &self,
        table: &str,
        player_name: &str,
        fields: &EnrichmentFields,
    ) -> Result<u64, StoreError>;

    /// Teams with at least one row in `season` lacking a usable jersey (NULL, empty or "00").
    async fn teams_missing_jerseys(&self, table: &str, season: i32) -> Result<Vec<String>, StoreError>;
}

#[async_trait]
pub trait EnrichmentCache: Send + Sync {
    /// Hits only; names absent from the cache are absent from the map.
    async fn lookup_many(&self, names: &[String]) -> Result<HashMap<String, EnrichmentFields>, StoreError>;

    async fn upsert_many(&self, entries: &[GlobalEnrichmentEntry]) -> Result<usize, StoreError>;
}

/// Table names are interpolated into SQL, so only `[a-z0-9_]` identifiers are accepted.
pub fn validate_table(name: &str) -> Result<&str, StoreError> {
    let ok = !name.is_empty()
        && name.len() <= 63
        && name.starts_with(|c: char| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if ok {
        Ok(name)
    } else {
        Err(StoreError::InvalidTable(name.to_string()))
    }
}

/// A jersey the backfill should try to replace.
pub fn jersey_needs_backfill(jersey: Option<&str>) -> bool {
    match jersey.map(str::trim) {
        None | Some("") | Some("00") => true,
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_are_restricted() {
        assert!(validate_table("nfl_rosters").is_ok());
        assert!(validate_table("ncaa_basketball_rosters").is_ok());
        assert!(validate_table("nfl_rosters; drop table x").is_err());
        assert!(validate_table("NFL").is_err());
        assert!(validate_table("").is_err());
    }

    #[test]
    fn jersey_gaps() {
        assert!(jersey_needs_backfill(None));
        assert!(jersey_needs_backfill(Some(" ")));
        assert!(jersey_needs_backfill(Some("00")));
        assert!(!jersey_needs_backfill(Some("09")));
    }
}
