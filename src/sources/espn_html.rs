use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{cell_text, dedupe_by_name, non_empty, FetchOutcome, PageFetcher, SourceAdapter};
use crate::error::SourceError;
use crate::model::{RawPlayerRecord, TeamDescriptor};
use crate::normalization::clean_optional;

/// ESPN squad pages (soccer). Columns after the name cell: POS, AGE, HT, WT, NAT.
pub struct EspnHtmlAdapter {
    sport: &'static str,
    league: &'static str,
    fetcher: Arc<dyn PageFetcher>,
}

impl EspnHtmlAdapter {
    pub fn new(sport: &'static str, league: &'static str, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            sport,
            league,
            fetcher,
        }
    }
}

#[async_trait]
impl SourceAdapter for EspnHtmlAdapter {
    fn name(&self) -> &'static str {
        "espn-html"
    }

    fn roster_url(&self, team: &TeamDescriptor, season: i32) -> Result<String, SourceError> {
        let espn_id = team.espn_id.as_deref().ok_or_else(|| SourceError::NotConfigured {
            team: team.id.clone(),
            adapter: "espn-html",
            field: "espn_id",
        })?;
        Ok(format!(
            "https://www.espn.com/{}/team/squad/_/id/{}/league/{}/season/{}",
            self.sport, espn_id, self.league, season
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
            FetchOutcome::Body(body) => parse_squad(&body, &team.id, season, &url).map(dedupe_by_name),
        }
    }
}

struct SquadSelectors {
    row: Selector,
    td: Selector,
    anchor: Selector,
    span: Selector,
}

impl SquadSelectors {
    fn new(url: &str) -> Result<Self, SourceError> {
        let parse = |css: &str| {
            Selector::parse(css)
                .map_err(|e| SourceError::mismatch(url, format!("bad selector {css}: {e}"), ""))
        };
        Ok(Self {
            row: parse("table.Table tbody tr.Table__TR")?,
            td: parse("td")?,
            anchor: parse("a.AnchorLink, a")?,
            span: parse("span")?,
        })
    }
}

pub fn parse_squad(
    html: &str,
    team_id: &str,
    season: i32,
    url: &str,
) -> Result<Vec<RawPlayerRecord>, SourceError> {
    let doc = Html::parse_document(html);
    let sel = SquadSelectors::new(url)?;
    let player_id_re = Regex::new(r"/id/(\d+)")
        .map_err(|e| SourceError::mismatch(url, e.to_string(), ""))?;
    let leading_digits = Regex::new(r"^(\d+)")
        .map_err(|e| SourceError::mismatch(url, e.to_string(), ""))?;

    let mut out = Vec::new();
    for row in doc.select(&sel.row) {
        let cells: Vec<ElementRef<'_>> = row.select(&sel.td).collect();
        if cells.len() < 5 {
            continue;
        }
        let name_cell = cells[0];
        let link = name_cell.select(&sel.anchor).next();

        let full_text = cell_text(name_cell);
        let name = link
            .map(cell_text)
            .and_then(non_empty)
            .or_else(|| non_empty(leading_digits.replace(&full_text, "").to_string()));
        let Some(name) = name else {
            continue;
        };
        if name == "Name" {
            continue;
        }

        let jersey = name_cell
            .select(&sel.span)
            .map(cell_text)
            .find(|t| !t.is_empty())
            .or_else(|| leading_digits.captures(&full_text).map(|c| c[1].to_string()));

        let player_id = link
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| player_id_re.captures(href))
            .map(|c| c[1].to_string());

        let text_at = |i: usize| cells.get(i).map(|c| cell_text(*c));

        let mut rec = RawPlayerRecord::new(team_id, season, name);
        rec.player_id = player_id;
        rec.jersey_number = jersey;
        rec.position = clean_optional(text_at(1).as_deref());
        rec.age = text_at(2).and_then(|a| a.trim().parse::<i32>().ok());
        rec.height = clean_optional(text_at(3).as_deref());
        rec.weight = clean_optional(text_at(4).as_deref());
        rec.nationality = clean_optional(text_at(5).as_deref());
        out.push(rec);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::StaticFetcher;

    const MIAMI_SQUAD: &str = r#"
<div class="ResponsiveTable"><table class="Table"><thead><tr class="Table__TR"><th>Name</th><th>POS</th><th>Age</th><th>HT</th><th>WT</th><th>NAT</th></tr></thead>
<tbody class="Table__TBODY">
<tr class="Table__TR"><td><div><a class="AnchorLink" href="https://www.espn.com/soccer/player/_/id/45843/lionel-messi">Lionel Messi</a><span class="pl2">10</span></div></td><td>F</td><td>37</td><td>1.70 m</td><td>72 kg</td><td>Argentina</td></tr>
<tr class="Table__TR"><td><a class="AnchorLink" href="/soccer/player/_/id/11111/drake-callender">Drake Callender</a><span>1</span></td><td>G</td><td>--</td><td>--</td><td>--</td><td>--</td></tr>
<tr class="Table__TR"><td>99 Trialist</td><td>M</td><td>19</td><td>--</td><td>--</td><td>USA</td></tr>
<tr class="Table__TR"><td>only</td><td>two</td></tr>
</tbody></table></div>"#;

    #[test]
    fn parses_squad_rows() {
        let rows = parse_squad(MIAMI_SQUAD, "20232", 2024, "u").unwrap();
        assert_eq!(rows.len(), 3);

        let messi = &rows[0];
        assert_eq!(messi.player_name, "Lionel Messi");
        assert_eq!(messi.player_id.as_deref(), Some("45843"));
        assert_eq!(messi.jersey_number.as_deref(), Some("10"));
        assert_eq!(messi.age, Some(37));
        assert_eq!(messi.nationality.as_deref(), Some("Argentina"));

        let keeper = &rows[1];
        assert_eq!(keeper.height, None);
        assert_eq!(keeper.age, None);
        assert_eq!(keeper.nationality, None);

        let trialist = &rows[2];
        assert_eq!(trialist.player_name, "Trialist");
        assert_eq!(trialist.jersey_number.as_deref(), Some("99"));
        assert_eq!(trialist.player_id, None);
    }

    #[tokio::test]
    async fn builds_league_scoped_url() {
        let url = "https://www.espn.com/soccer/team/squad/_/id/20232/league/USA.1/season/2024";
        let fetcher = Arc::new(StaticFetcher::default().with_page(url, MIAMI_SQUAD));
        let adapter = EspnHtmlAdapter::new("soccer", "USA.1", fetcher);
        let team = TeamDescriptor {
            id: "20232".into(),
            name: "Inter Miami CF".into(),
            slug: "inter-miami-cf".into(),
            statmuse_id: None,
            espn_id: Some("20232".into()),
            cube_id: None,
            wiki_names: vec![],
            first_season: None,
            last_season: None,
        };
        assert_eq!(adapter.fetch_roster(&team, 2024).await.unwrap().len(), 3);
        assert!(adapter.fetch_roster(&team, 1990).await.unwrap().is_empty());
    }
}
