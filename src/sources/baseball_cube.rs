use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{cell_text, dedupe_by_name, non_empty, FetchOutcome, PageFetcher, SourceAdapter};
use crate::error::SourceError;
use crate::model::{RawPlayerRecord, TeamDescriptor};

const BASE: &str = "https://thebaseballcube.com/content";

/// Minor-league rosters from TheBaseballCube. The team list is not static: every season's
/// circuit summary page links the teams that played in it.
pub struct BaseballCubeAdapter {
    circuits: &'static [&'static str],
    fetcher: Arc<dyn PageFetcher>,
}

impl BaseballCubeAdapter {
    pub fn new(circuits: &'static [&'static str], fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { circuits, fetcher }
    }
}

/// Circuit ids gained a `2` suffix with the 2021 minor-league realignment.
pub fn summary_url(circuit: &str, season: i32) -> String {
    let id = if season >= 2021 {
        format!("{circuit}2")
    } else {
        circuit.to_string()
    };
    format!("{BASE}/minor_summary/{season}~{id}/")
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

fn selector(css: &str, url: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::mismatch(url, format!("bad selector {css}: {e}"), ""))
}

/// Teams linked from one circuit summary page for `season`, in page order, once each.
pub fn parse_team_links(html: &str, season: i32, url: &str) -> Result<Vec<TeamDescriptor>, SourceError> {
    let doc = Html::parse_document(html);
    let link_sel = selector(r#"a[href*="/content/stats_minor/"]"#, url)?;
    let href_re = Regex::new(r"stats_minor/(\d+)~(\d+)/").map_err(|e| SourceError::mismatch(url, e.to_string(), ""))?;

    let mut seen = HashSet::new();
    let mut teams = Vec::new();
    for link in doc.select(&link_sel) {
        let Some(caps) = link.value().attr("href").and_then(|h| href_re.captures(h)) else {
            continue;
        };
        let name = cell_text(link);
        if caps[1] != season.to_string() || name.is_empty() || name.contains("Logos") {
            continue;
        }
        let Ok(cube_id) = caps[2].parse::<u32>() else {
            continue;
        };
        let slug = slugify(&name);
        let id = format!("{slug}-{cube_id}");
        if !seen.insert(id.clone()) {
            continue;
        }
        teams.push(TeamDescriptor {
            id,
            name,
            slug,
            statmuse_id: None,
            espn_id: None,
            cube_id: Some(cube_id),
            wiki_names: Vec::new(),
            first_season: Some(season),
            last_season: Some(season),
        });
    }
    Ok(teams)
}

/// Roster table: the first table mentioning both "player" and "pos". Columns are #, player, (age), pos.
pub fn parse_roster(html: &str, team_id: &str, season: i32, url: &str) -> Result<Vec<RawPlayerRecord>, SourceError> {
    let doc = Html::parse_document(html);
    let table_sel = selector("table", url)?;
    let tr_sel = selector("tr", url)?;
    let td_sel = selector("td", url)?;
    let a_sel = selector("a", url)?;

    let Some(table) = doc.select(&table_sel).find(|t| {
        let text = cell_text(*t).to_lowercase();
        text.contains("player") && text.contains("pos")
    }) else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for tr in table.select(&tr_sel) {
        let cells: Vec<ElementRef<'_>> = tr.select(&td_sel).collect();
        if cells.len() < 4 {
            continue;
        }
        let jersey = cell_text(cells[0]);
        let name = cells[1]
            .select(&a_sel)
            .next()
            .map(cell_text)
            .and_then(non_empty)
            .or_else(|| non_empty(cell_text(cells[1])));
        let Some(name) = name else {
            continue;
        };
        if name.eq_ignore_ascii_case("player") || jersey == "#" {
            continue;
        }
        let mut rec = RawPlayerRecord::new(team_id, season, name);
        rec.jersey_number = Some(jersey).filter(|j| j != "-").and_then(non_empty);
        rec.position = non_empty(cell_text(cells[3]));
        out.push(rec);
    }
    Ok(out)
}

#[async_trait]
impl SourceAdapter for BaseballCubeAdapter {
    fn name(&self) -> &'static str {
        "baseball-cube"
    }

    fn roster_url(&self, team: &TeamDescriptor, season: i32) -> Result<String, SourceError> {
        let cube_id = team.cube_id.ok_or_else(|| SourceError::NotConfigured {
            team: team.id.clone(),
            adapter: "baseball-cube",
            field: "cube_id",
        })?;
        Ok(format!("{BASE}/stats_minor/{season}~{cube_id}/"))
    }

    fn discovers_teams(&self) -> bool {
        true
    }

    async fn discover_teams(&self, season: i32) -> Result<Vec<TeamDescriptor>, SourceError> {
        let mut teams = Vec::new();
        for circuit in self.circuits {
            let url = summary_url(circuit, season);
            match self.fetcher.get(&url).await? {
                FetchOutcome::NotFound => {
                    tracing::info!(target = "baseball_cube", circuit, season, "no summary page");
                }
                FetchOutcome::Body(body) => {
                    let found = parse_team_links(&body, season, &url)?;
                    tracing::info!(target = "baseball_cube", circuit, season, count = found.len(), "teams discovered");
                    teams.extend(found);
                }
            }
        }
        Ok(teams)
    }

    async fn fetch_roster(
        &self,
        team: &TeamDescriptor,
        season: i32,
    ) -> Result<Vec<RawPlayerRecord>, SourceError> {
        let url = self.roster_url(team, season)?;
        match self.fetcher.get(&url).await? {
            FetchOutcome::NotFound => Ok(Vec::new()),
            FetchOutcome::Body(body) => parse_roster(&body, &team.id, season, &url).map(dedupe_by_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::StaticFetcher;

    const IL_2023: &str = r#"
<html><body>
<h2>2023 International League</h2>
<a href="/content/stats_minor/2023~7031/"><img src="logo.png"> Logos</a>
<table>
  <tr><td><a href="/content/stats_minor/2023~7031/">Durham Bulls</a></td><td>86-62</td></tr>
  <tr><td><a href="/content/stats_minor/2023~7044/">Norfolk Tides</a></td><td>90-59</td></tr>
  <tr><td><a href="/content/stats_minor/2022~6900/">Durham Bulls</a></td><td>prior year</td></tr>
  <tr><td><a href="/content/stats_minor/2023~7031/">Durham Bulls</a></td><td>again</td></tr>
</table>
</body></html>"#;

    const DURHAM_2023: &str = r#"
<html><body>
<table><tr><td>Team Info</td></tr></table>
<table>
  <tr><th>#</th><th>Player</th><th>Age</th><th>Pos</th></tr>
  <tr><td>#</td><td>Player</td><td>Age</td><td>Pos</td></tr>
  <tr><td>1</td><td><a href="/p/1">Junior Caminero</a> (R)</td><td>19</td><td>3B</td></tr>
  <tr><td>-</td><td>Taj Bradley</td><td>22</td><td>P</td></tr>
  <tr><td>5</td><td></td><td>30</td><td>C</td></tr>
  <tr><td colspan="4">Coaches</td></tr>
</table>
</body></html>"#;

    #[test]
    fn circuit_ids_change_in_2021() {
        assert_eq!(
            summary_url("IL", 2019),
            "https://thebaseballcube.com/content/minor_summary/2019~IL/"
        );
        assert_eq!(
            summary_url("PCL", 2023),
            "https://thebaseballcube.com/content/minor_summary/2023~PCL2/"
        );
    }

    #[test]
    fn team_links_for_the_season_only() {
        let teams = parse_team_links(IL_2023, 2023, "u").unwrap();
        let ids: Vec<&str> = teams.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["durham-bulls-7031", "norfolk-tides-7044"]);
        assert_eq!(teams[0].cube_id, Some(7031));
        assert_eq!(teams[0].name, "Durham Bulls");
        assert!(teams[0].active_in(2023));
    }

    #[test]
    fn roster_rows_from_the_player_table() {
        let rows = parse_roster(DURHAM_2023, "durham-bulls-7031", 2023, "u").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].player_name, "Junior Caminero");
        assert_eq!(rows[0].jersey_number.as_deref(), Some("1"));
        assert_eq!(rows[0].position.as_deref(), Some("3B"));
        assert_eq!(rows[1].player_name, "Taj Bradley");
        assert_eq!(rows[1].jersey_number, None);
    }

    #[test]
    fn page_without_player_table_is_empty() {
        let rows = parse_roster("<table><tr><td>Standings</td></tr></table>", "t", 2023, "u").unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn discovery_walks_every_circuit() {
        let fetcher = Arc::new(
            StaticFetcher::default().with_page(&summary_url("IL", 2023), IL_2023),
        );
        let adapter = BaseballCubeAdapter::new(&["IL", "PCL"], fetcher.clone());
        let teams = adapter.discover_teams(2023).await.unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(
            fetcher.requested(),
            vec![summary_url("IL", 2023), summary_url("PCL", 2023)]
        );
        assert_eq!(
            adapter.roster_url(&teams[1], 2023).unwrap(),
            "https://thebaseballcube.com/content/stats_minor/2023~7044/"
        );
    }
}
