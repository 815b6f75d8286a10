use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use roster_pipeline::config::PipelineConfig;
use roster_pipeline::enrich::{EnrichmentPipeline, GeminiClient};
use roster_pipeline::leagues::{all_leagues, league, LeagueConfig, LEAGUE_KEYS};
use roster_pipeline::logging::{init_tracing, level_for_verbosity};
use roster_pipeline::model::SeasonFilter;
use roster_pipeline::orchestrator::{Orchestrator, RunSummary};
use roster_pipeline::sources::http::HttpFetcher;
use roster_pipeline::store::memory::MemoryStore;
use roster_pipeline::store::postgres::PgRosterStore;
use roster_pipeline::store::{EnrichmentCache, RosterStore};
use roster_pipeline::util::db::Db;
use roster_pipeline::util::env::init_env;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "roster", version, about = "Sports roster ingest and name enrichment")]
struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct Selection {
    /// League key (repeatable), e.g. --league nfl --league nba
    #[arg(long = "league")]
    leagues: Vec<String>,
    /// Every configured league
    #[arg(long, default_value_t = false)]
    all: bool,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Scrape rosters for teams x seasons and upsert them into the league tables
    Ingest {
        #[command(flatten)]
        selection: Selection,
        /// Season year or inclusive range (2024, 2020-2025)
        #[arg(long)]
        season: SeasonFilter,
        /// Restrict to one team (id, slug or ESPN id)
        #[arg(long)]
        team: Option<String>,
        /// Fetch and normalize into memory; nothing is written to the database
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Fill phonetic / IPA / Chinese / hardware-safe names for players missing them
    Enrich {
        #[command(flatten)]
        selection: Selection,
        /// Only names from these seasons
        #[arg(long)]
        season: Option<SeasonFilter>,
        /// Maximum distinct names per run
        #[arg(long, default_value_t = 50)]
        limit: usize,
        /// Report pending names and cache hits without calling the model or writing
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Re-ingest teams whose rows for a season lack jersey numbers
    BackfillJerseys {
        #[command(flatten)]
        selection: Selection,
        #[arg(long)]
        season: SeasonFilter,
        #[arg(long)]
        team: Option<String>,
        /// List teams with gaps without fetching anything
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Print the configured leagues
    Leagues,
    /// Apply migrations/*.sql to the configured database
    Migrate {
        #[arg(long, default_value = "migrations")]
        dir: PathBuf,
    },
}

fn resolve_leagues(sel: &Selection) -> Result<Vec<LeagueConfig>> {
    if sel.all {
        return Ok(all_leagues());
    }
    if sel.leagues.is_empty() {
        bail!("pass --league <key> or --all (known: {})", LEAGUE_KEYS.join(", "));
    }
    sel.leagues
        .iter()
        .map(|k| {
            league(k).with_context(|| format!("unknown league {k:?} (known: {})", LEAGUE_KEYS.join(", ")))
        })
        .collect()
}

async fn pg_store(cfg: &PipelineConfig) -> Result<Arc<PgRosterStore>> {
    let url = cfg.require_database()?;
    let db = Db::connect(url, cfg.max_connections).await?;
    Ok(Arc::new(PgRosterStore::new(db)))
}

fn exit_for(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_env();
    let cli = Cli::parse();
    init_tracing(level_for_verbosity(cli.verbose))?;
    let cfg = PipelineConfig::from_env();

    match cli.command {
        Commands::Ingest {
            selection,
            season,
            team,
            dry_run,
        } => {
            let leagues = resolve_leagues(&selection)?;
            cfg.preflight("ingest", !dry_run, false)?;
            let store: Arc<dyn RosterStore> = if dry_run {
                info!("dry run: rows are kept in memory only");
                Arc::new(MemoryStore::new())
            } else {
                pg_store(&cfg).await?
            };
            let fetcher = Arc::new(HttpFetcher::new(&cfg)?);
            let orch = Orchestrator::new(store, fetcher);

            let mut summary = RunSummary::default();
            for l in &leagues {
                summary.merge(orch.ingest(l, season, team.as_deref()).await);
            }
            summary.log();
            Ok(exit_for(summary.has_failures()))
        }
        Commands::Enrich {
            selection,
            season,
            limit,
            dry_run,
        } => {
            let leagues = resolve_leagues(&selection)?;
            cfg.preflight("enrich", true, !dry_run)?;
            let store = pg_store(&cfg).await?;

            if dry_run {
                let mut pending = Vec::new();
                for l in &leagues {
                    for name in store.names_missing_enrichment(l.table, season, limit).await? {
                        if !pending.contains(&name) {
                            pending.push(name);
                        }
                    }
                }
                pending.truncate(limit);
                let hits = store.lookup_many(&pending).await?;
                info!(
                    pending = pending.len(),
                    cache_hits = hits.len(),
                    model_calls = pending.len().saturating_sub(hits.len()).div_ceil(cfg.ai_batch_size),
                    "dry run: nothing written"
                );
                return Ok(ExitCode::SUCCESS);
            }

            let model = Arc::new(GeminiClient::new(&cfg)?);
            let pipeline = EnrichmentPipeline::new(
                store.clone(),
                store,
                model,
                cfg.ai_batch_size,
                cfg.ai_batch_delay,
            );
            let report = pipeline.run(&leagues, season, limit).await?;
            Ok(exit_for(report.failed_batches > 0))
        }
        Commands::BackfillJerseys {
            selection,
            season,
            team,
            dry_run,
        } => {
            let leagues = resolve_leagues(&selection)?;
            cfg.preflight("backfill-jerseys", true, false)?;
            let store = pg_store(&cfg).await?;

            if dry_run {
                for l in &leagues {
                    for year in season.years() {
                        let gaps = store.teams_missing_jerseys(l.table, year).await?;
                        info!(league = l.key, season = year, teams = ?gaps, "dry run: teams with jersey gaps");
                    }
                }
                return Ok(ExitCode::SUCCESS);
            }

            let fetcher = Arc::new(HttpFetcher::new(&cfg)?);
            let orch = Orchestrator::new(store, fetcher);
            let mut summary = RunSummary::default();
            for l in &leagues {
                for year in season.years() {
                    match orch.backfill_jerseys(l, year, team.as_deref()).await {
                        Ok(s) => summary.merge(s),
                        Err(e) => warn!(league = l.key, season = year, error = %e, "backfill skipped"),
                    }
                }
            }
            summary.log();
            Ok(exit_for(summary.has_failures()))
        }
        Commands::Leagues => {
            for l in all_leagues() {
                let teams = if l.teams.is_empty() {
                    "teams discovered per season".to_string()
                } else {
                    format!("{} teams", l.teams.len())
                };
                println!(
                    "{:<22} {:<24} {:<31} {:<13} {teams}",
                    l.key,
                    l.name,
                    l.table,
                    l.source.label(),
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Migrate { dir } => {
            let url = cfg.require_database()?;
            let db = Db::connect(url, 1).await?;
            let applied = db.run_migrations(&dir).await?;
            info!(applied = ?applied, "migrate: done");
            Ok(ExitCode::SUCCESS)
        }
    }
}
