use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use tracing::{info, warn};

use super::prompt::build_prompt;
use super::response::{parse_response, ParsedBatch};
use super::LanguageModel;
use crate::error::AiError;
use crate::leagues::LeagueConfig;
use crate::model::{EnrichmentFields, GlobalEnrichmentEntry, SeasonFilter};
use crate::store::{EnrichmentCache, RosterStore};

/// Counters for one enrichment run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichReport {
    pub names_considered: usize,
    pub cache_hits: usize,
    pub enriched: usize,
    pub skipped: usize,
    pub batches: usize,
    pub failed_batches: usize,
    pub rows_updated: u64,
}

pub struct EnrichmentPipeline {
    store: Arc<dyn RosterStore>,
    cache: Arc<dyn EnrichmentCache>,
    model: Arc<dyn LanguageModel>,
    batch_size: usize,
    batch_delay: Duration,
}

impl EnrichmentPipeline {
    pub fn new(
        store: Arc<dyn RosterStore>,
        cache: Arc<dyn EnrichmentCache>,
        model: Arc<dyn LanguageModel>,
        batch_size: usize,
        batch_delay: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            model,
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    /// One model round-trip for at most `batch_size` names.
    pub async fn enrich_batch(&self, names: &[String], context: Option<&str>) -> Result<ParsedBatch, AiError> {
        let prompt = build_prompt(names, context);
        let text = self.model.generate_json(&prompt).await?;
        parse_response(&text, names)
    }

    /// Enrich up to `limit` distinct names missing enrichment across `leagues`.
    pub async fn run(
        &self,
        leagues: &[LeagueConfig],
        seasons: Option<SeasonFilter>,
        limit: usize,
    ) -> Result<EnrichReport> {
        let mut report = EnrichReport::default();

        // several leagues can share a table
        let mut tables: IndexMap<&str, &str> = IndexMap::new();
        for l in leagues {
            tables.entry(l.table).or_insert(l.name);
        }

        // name -> league context of the first table it was found in
        let mut pending: IndexMap<String, &str> = IndexMap::new();
        for (&table, &context) in &tables {
            match self.store.names_missing_enrichment(table, seasons, limit).await {
                Ok(names) => {
                    info!(target = "enrich", table, count = names.len(), "names missing enrichment");
                    for n in names {
                        pending.entry(n).or_insert(context);
                    }
                }
                Err(e) => warn!(target = "enrich", table, error = %e, "could not list names; skipping table"),
            }
        }
        pending.truncate(limit);
        report.names_considered = pending.len();
        if pending.is_empty() {
            info!(target = "enrich", "nothing to enrich");
            return Ok(report);
        }

        let names: Vec<String> = pending.keys().cloned().collect();
        let hits = self
            .cache
            .lookup_many(&names)
            .await
            .context("global enrichment cache lookup")?;
        for (name, fields) in &hits {
            // entries cached without a phonetic form would otherwise stay pending forever
            let fields = fields.clone().with_fallbacks(name);
            report.rows_updated += self.apply_everywhere(&tables, name, &fields).await;
        }
        report.cache_hits = hits.len();
        info!(target = "enrich", hits = hits.len(), misses = names.len() - hits.len(), "cache checked");

        let misses: Vec<String> = names.into_iter().filter(|n| !hits.contains_key(n)).collect();
        for (i, chunk) in misses.chunks(self.batch_size).enumerate() {
            if i > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
            report.batches += 1;
            let context = pending.get(&chunk[0]).copied();
            let parsed = match self.enrich_batch(chunk, context).await {
                Ok(p) => p,
                Err(e) => {
                    warn!(target = "enrich", batch = i + 1, size = chunk.len(), error = %e, "batch failed");
                    report.failed_batches += 1;
                    continue;
                }
            };
            report.skipped += parsed.skipped.len();
            if parsed.enriched.is_empty() {
                continue;
            }

            let entries: Vec<GlobalEnrichmentEntry> = parsed
                .enriched
                .iter()
                .map(|(name, fields)| GlobalEnrichmentEntry {
                    player_name: name.clone(),
                    fields: fields.clone(),
                })
                .collect();
            // league rows are only written once the cache holds the same answer
            if let Err(e) = self.cache.upsert_many(&entries).await {
                warn!(target = "enrich", batch = i + 1, error = %e, "cache write failed; batch left pending");
                report.failed_batches += 1;
                continue;
            }
            for (name, fields) in &parsed.enriched {
                report.rows_updated += self.apply_everywhere(&tables, name, fields).await;
            }
            report.enriched += parsed.enriched.len();
            info!(
                target = "enrich",
                batch = i + 1,
                enriched = parsed.enriched.len(),
                skipped = parsed.skipped.len(),
                "batch stored"
            );
        }

        info!(
            target = "enrich",
            considered = report.names_considered,
            cache_hits = report.cache_hits,
            enriched = report.enriched,
            skipped = report.skipped,
            batches = report.batches,
            failed_batches = report.failed_batches,
            "enrichment run finished"
        );
        Ok(report)
    }

    /// Write to every selected table; failures are logged per table and do not stop the run.
    async fn apply_everywhere(&self, tables: &IndexMap<&str, &str>, name: &str, fields: &EnrichmentFields) -> u64 {
        let mut touched = 0;
        for &table in tables.keys() {
            match self.store.apply_enrichment(table, name, fields).await {
                Ok(n) => touched += n,
                Err(e) => warn!(target = "enrich", table, player = %name, error = %e, "enrichment write failed"),
            }
        }
        touched
    }
}
