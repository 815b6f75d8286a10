use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use super::{cell_text, dedupe_by_name, FetchOutcome, PageFetcher, SourceAdapter};
use crate::error::SourceError;
use crate::model::{RawPlayerRecord, TeamDescriptor};

/// Historical rosters from `{year}_{Franchise}_season` articles.
pub struct WikipediaAdapter {
    fetcher: Arc<dyn PageFetcher>,
}

impl WikipediaAdapter {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

/// Article stem for a season: first mapping still valid that year, else the last one,
/// else the display name with underscores.
pub fn wiki_name_for(team: &TeamDescriptor, season: i32) -> String {
    team.wiki_names
        .iter()
        .find(|m| m.until_year.map_or(true, |until| season <= until))
        .or_else(|| team.wiki_names.last())
        .map(|m| m.name.clone())
        .unwrap_or_else(|| team.name.replace(' ', "_"))
}

#[async_trait]
impl SourceAdapter for WikipediaAdapter {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    fn roster_url(&self, team: &TeamDescriptor, season: i32) -> Result<String, SourceError> {
        let stem = wiki_name_for(team, season);
        Ok(format!(
            "https://en.wikipedia.org/wiki/{}_{}_season",
            season,
            urlencoding::encode(&stem)
        ))
    }

    async fn fetch_roster(
        &self,
        team: &TeamDescriptor,
        season: i32,
    ) -> Result<Vec<RawPlayerRecord>, SourceError> {
        let url = self.roster_url(team, season)?;
        match self.fetcher.get(&url).await? {
            FetchOutcome::NotFound => Ok(Vec::new()),
            FetchOutcome::Body(body) => parse_season_page(&body, &team.id, season, &url).map(dedupe_by_name),
        }
    }
}

/// Roster template table (`.toccolours`), else the first `wikitable`. Rows need at least five cells;
/// the first anchor with text is the player and a short all-digit cell among the first three is the jersey.
pub fn parse_season_page(
    html: &str,
    team_id: &str,
    season: i32,
    url: &str,
) -> Result<Vec<RawPlayerRecord>, SourceError> {
    let parse = |css: &str| {
        Selector::parse(css).map_err(|e| SourceError::mismatch(url, format!("bad selector {css}: {e}"), ""))
    };
    let doc = Html::parse_document(html);
    let roster_sel = parse(".toccolours")?;
    let wikitable_sel = parse("table.wikitable")?;
    let tr_sel = parse("tr")?;
    let td_sel = parse("td")?;
    let a_sel = parse("a")?;

    let Some(table) = doc
        .select(&roster_sel)
        .next()
        .or_else(|| doc.select(&wikitable_sel).next())
    else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for tr in table.select(&tr_sel) {
        let cells: Vec<ElementRef<'_>> = tr.select(&td_sel).collect();
        if cells.len() < 5 {
            continue;
        }
        let Some(name) = tr
            .select(&a_sel)
            .map(cell_text)
            .find(|t| !t.is_empty())
        else {
            continue;
        };
        let jersey = cells
            .iter()
            .take(3)
            .map(|c| cell_text(*c))
            .find(|t| (1..=2).contains(&t.len()) && t.chars().all(|c| c.is_ascii_digit()));

        let mut rec = RawPlayerRecord::new(team_id, season, name);
        rec.jersey_number = jersey;
        out.push(rec);
    }
    Ok(out)
}
