//! Drives one league through its adapter, the normalizer and the store.
//!
//! The unit of work is a (team, season) pair. A unit either saves rows, comes back empty, or fails;
//! a failure is logged with its cause and the run moves on to the next unit.

use std::sync::Arc;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::error::SourceError;
use crate::leagues::LeagueConfig;
use crate::model::{SeasonFilter, TeamDescriptor};
use crate::normalization::normalize_batch;
use crate::sources::{adapter_for, PageFetcher, SourceAdapter};
use crate::store::RosterStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Rows written, plus records the store rejected individually.
    Saved { written: usize, rejected: usize },
    Empty,
    Failed,
}

/// Per-team tallies across the seasons of one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UnitCounts {
    pub saved: usize,
    pub empty: usize,
    pub failed: usize,
    pub rows_written: usize,
    pub rows_rejected: usize,
}

impl UnitCounts {
    fn record(&mut self, outcome: UnitOutcome) {
        match outcome {
            UnitOutcome::Saved { written, rejected } => {
                self.saved += 1;
                self.rows_written += written;
                self.rows_rejected += rejected;
            }
            UnitOutcome::Empty => self.empty += 1,
            UnitOutcome::Failed => self.failed += 1,
        }
    }

    fn add(&mut self, other: &UnitCounts) {
        self.saved += other.saved;
        self.empty += other.empty;
        self.failed += other.failed;
        self.rows_written += other.rows_written;
        self.rows_rejected += other.rows_rejected;
    }
}

/// Keyed by `league/team`, in the order teams were visited.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub teams: IndexMap<String, UnitCounts>,
}

impl RunSummary {
    fn record(&mut self, league: &str, team: &str, outcome: UnitOutcome) {
        self.teams
            .entry(format!("{league}/{team}"))
            .or_default()
            .record(outcome);
    }

    pub fn merge(&mut self, other: RunSummary) {
        for (k, v) in other.teams {
            self.teams.entry(k).or_default().add(&v);
        }
    }

    pub fn totals(&self) -> UnitCounts {
        let mut t = UnitCounts::default();
        for c in self.teams.values() {
            t.add(c);
        }
        t
    }

    /// True when at least one unit hard-failed. Drives the CLI exit code.
    pub fn has_failures(&self) -> bool {
        self.teams.values().any(|c| c.failed > 0)
    }

    pub fn log(&self) {
        for (team, c) in &self.teams {
            info!(
                target = "orchestrator",
                team = %team,
                saved = c.saved,
                empty = c.empty,
                failed = c.failed,
                rows = c.rows_written,
                rejected = c.rows_rejected,
                "team summary"
            );
        }
        let t = self.totals();
        info!(
            target = "orchestrator",
            teams = self.teams.len(),
            saved = t.saved,
            empty = t.empty,
            failed = t.failed,
            rows = t.rows_written,
            rejected = t.rows_rejected,
            "run summary"
        );
    }
}

pub struct Orchestrator {
    store: Arc<dyn RosterStore>,
    fetcher: Arc<dyn PageFetcher>,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn RosterStore>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { store, fetcher }
    }

    /// Phase 1: every selected team for every season in `seasons`. Seasons outside a team's
    /// activity window are skipped without a request.
    pub async fn ingest(
        &self,
        league: &LeagueConfig,
        seasons: SeasonFilter,
        team_filter: Option<&str>,
    ) -> RunSummary {
        let adapter = adapter_for(league, self.fetcher.clone());
        let mut summary = RunSummary::default();
        info!(
            target = "orchestrator",
            league = league.key,
            source = adapter.name(),
            table = league.table,
            teams = league.teams.len(),
            seasons = ?seasons,
            "ingest starting"
        );

        if adapter.discovers_teams() {
            for season in seasons.years() {
                let Some(teams) = self.season_teams(adapter.as_ref(), league, season, &mut summary).await else {
                    continue;
                };
                for team in teams.iter().filter(|t| team_filter.map_or(true, |f| t.matches_filter(f))) {
                    let outcome = self.ingest_unit(adapter.as_ref(), league, team, season).await;
                    summary.record(league.key, &team.id, outcome);
                }
            }
            return summary;
        }

        let teams: Vec<&TeamDescriptor> = league.select_teams(team_filter).collect();
        if teams.is_empty() {
            warn!(target = "orchestrator", league = league.key, team = ?team_filter, "no team matches filter");
        }
        for team in teams {
            for season in seasons.years() {
                if !team.active_in(season) {
                    debug!(target = "orchestrator", league = league.key, team = %team.id, season, "team inactive; skipping");
                    continue;
                }
                let outcome = self.ingest_unit(adapter.as_ref(), league, team, season).await;
                summary.record(league.key, &team.id, outcome);
            }
        }
        summary
    }

    /// Discovered teams for one season. A failed discovery is recorded as a failed unit.
    async fn season_teams(
        &self,
        adapter: &dyn SourceAdapter,
        league: &LeagueConfig,
        season: i32,
        summary: &mut RunSummary,
    ) -> Option<Vec<TeamDescriptor>> {
        match adapter.discover_teams(season).await {
            Ok(teams) => {
                info!(target = "orchestrator", league = league.key, season, teams = teams.len(), "teams discovered");
                Some(teams)
            }
            Err(e) => {
                warn!(target = "orchestrator", league = league.key, season, error = %e, "team discovery failed");
                summary.record(league.key, &format!("discovery-{season}"), UnitOutcome::Failed);
                None
            }
        }
    }

    async fn ingest_unit(
        &self,
        adapter: &dyn SourceAdapter,
        league: &LeagueConfig,
        team: &TeamDescriptor,
        season: i32,
    ) -> UnitOutcome {
        let fetched = match adapter.fetch_roster(team, season).await {
            Ok(rows) => rows,
            Err(e) => {
                log_source_error(league, team, season, &e);
                return UnitOutcome::Failed;
            }
        };
        let records = normalize_batch(fetched);
        if records.is_empty() {
            info!(target = "orchestrator", league = league.key, team = %team.id, season, "no roster");
            return UnitOutcome::Empty;
        }

        match self.store.upsert(league.table, &records).await {
            Ok(res) => {
                for (key, reason) in &res.failed {
                    warn!(target = "orchestrator", table = league.table, key = %key, reason = %reason, "record not stored");
                }
                info!(
                    target = "orchestrator",
                    league = league.key,
                    team = %team.id,
                    season,
                    count = res.written,
                    rejected = res.failed.len(),
                    "roster saved"
                );
                if res.written == 0 {
                    UnitOutcome::Failed
                } else {
                    UnitOutcome::Saved {
                        written: res.written,
                        rejected: res.failed.len(),
                    }
                }
            }
            Err(e) => {
                warn!(target = "orchestrator", league = league.key, team = %team.id, season, error = %e, "store write failed");
                UnitOutcome::Failed
            }
        }
    }

    /// Re-ingest only the teams whose rows for `season` lack a usable jersey number.
    pub async fn backfill_jerseys(
        &self,
        league: &LeagueConfig,
        season: i32,
        team_filter: Option<&str>,
    ) -> Result<RunSummary> {
        let gaps = self
            .store
            .teams_missing_jerseys(league.table, season)
            .await
            .with_context(|| format!("listing jersey gaps in {} for {season}", league.table))?;
        info!(target = "orchestrator", league = league.key, season, teams = gaps.len(), "teams with jersey gaps");

        let adapter = adapter_for(league, self.fetcher.clone());
        let mut summary = RunSummary::default();
        if gaps.is_empty() {
            return Ok(summary);
        }
        let discovered;
        let known: &[TeamDescriptor] = if adapter.discovers_teams() {
            discovered = self
                .season_teams(adapter.as_ref(), league, season, &mut summary)
                .await
                .unwrap_or_default();
            &discovered
        } else {
            &league.teams
        };
        for team_id in gaps {
            // tables can be shared between leagues; only this league's teams are ours to refetch
            let Some(team) = known.iter().find(|t| t.id == team_id) else {
                debug!(target = "orchestrator", league = league.key, team = %team_id, "not in this league; skipping");
                continue;
            };
            if team_filter.is_some_and(|f| !team.matches_filter(f)) {
                continue;
            }
            let outcome = self.ingest_unit(adapter.as_ref(), league, team, season).await;
            summary.record(league.key, &team.id, outcome);
        }
        Ok(summary)
    }
}

fn log_source_error(league: &LeagueConfig, team: &TeamDescriptor, season: i32, e: &SourceError) {
    match e {
        SourceError::NotConfigured { .. } => {
            warn!(target = "orchestrator", league = league.key, team = %team.id, season, error = %e, "team not configured for source")
        }
        SourceError::ParseMismatch { url, reason, fragment } => warn!(
            target = "orchestrator",
            league = league.key,
            team = %team.id,
            season,
            %url,
            %reason,
            %fragment,
            "page layout did not match"
        ),
        SourceError::SourceUnavailable { url, reason } => {
            warn!(target = "orchestrator", league = league.key, team = %team.id, season, %url, %reason, "source unavailable")
        }
    }
}
