//! Source adapters: one per upstream site, each owning its own URL scheme and column mapping.
//!
//! Adapters never touch the network directly. They go through a [`PageFetcher`], which the live
//! binary backs with [`http::HttpFetcher`] (throttled per host) and tests back with canned pages.
//! An adapter returns `Ok(vec![])` for "no roster" (404, missing table, zero rows) and reserves
//! errors for unreachable sources and layout changes.

pub mod baseball_cube;
pub mod espn_api;
pub mod espn_html;
pub mod http;
pub mod statmuse;
pub mod throttle;
pub mod wikipedia;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use scraper::ElementRef;

use crate::error::SourceError;
use crate::leagues::{LeagueConfig, SourceKind};
use crate::model::{RawPlayerRecord, TeamDescriptor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Body(String),
    NotFound,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchOutcome, SourceError>;
}

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// URL the adapter will request for this unit; used for logging and dry runs.
    fn roster_url(&self, team: &TeamDescriptor, season: i32) -> Result<String, SourceError>;

    /// Whether teams come from [`SourceAdapter::discover_teams`] instead of the league catalogue.
    fn discovers_teams(&self) -> bool {
        false
    }

    /// Teams that played in `season`, for sources without a static team list.
    async fn discover_teams(&self, _season: i32) -> Result<Vec<TeamDescriptor>, SourceError> {
        Ok(Vec::new())
    }

    async fn fetch_roster(
        &self,
        team: &TeamDescriptor,
        season: i32,
    ) -> Result<Vec<RawPlayerRecord>, SourceError>;
}

/// Build the adapter a league is configured for.
pub fn adapter_for(league: &LeagueConfig, fetcher: Arc<dyn PageFetcher>) -> Box<dyn SourceAdapter> {
    match &league.source {
        SourceKind::Statmuse { path } => Box::new(statmuse::StatmuseAdapter::new(path, fetcher)),
        SourceKind::EspnHtml { sport, league } => {
            Box::new(espn_html::EspnHtmlAdapter::new(sport, league, fetcher))
        }
        SourceKind::EspnApi {
            sport,
            league,
            endpoint,
        } => Box::new(espn_api::EspnApiAdapter::new(sport, league, *endpoint, fetcher)),
        SourceKind::Wikipedia => Box::new(wikipedia::WikipediaAdapter::new(fetcher)),
        SourceKind::BaseballCube { circuits } => {
            Box::new(baseball_cube::BaseballCubeAdapter::new(circuits, fetcher))
        }
    }
}

/// Keep the first row per player name; later duplicates within one fetch are dropped.
pub(crate) fn dedupe_by_name(records: Vec<RawPlayerRecord>) -> Vec<RawPlayerRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.player_name.clone()))
        .collect()
}

/// Whitespace-collapsed text content of an element.
pub(crate) fn cell_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn non_empty(v: String) -> Option<String> {
    let t = v.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}
