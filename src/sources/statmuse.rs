use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use super::{cell_text, dedupe_by_name, non_empty, FetchOutcome, PageFetcher, SourceAdapter};
use crate::error::SourceError;
use crate::model::{RawPlayerRecord, TeamDescriptor};

/// (league path, team id, first season, slug) for franchises StatMuse re-slugged.
const SLUG_RENAMES: &[(&str, &str, i32, &str)] = &[("nhl", "utah-hockey-club", 2026, "utah-mammoth")];

pub struct StatmuseAdapter {
    league_path: &'static str,
    fetcher: Arc<dyn PageFetcher>,
}

impl StatmuseAdapter {
    pub fn new(league_path: &'static str, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            league_path,
            fetcher,
        }
    }

    fn slug_for<'a>(&self, team: &'a TeamDescriptor, season: i32) -> &'a str {
        SLUG_RENAMES
            .iter()
            .find(|(league, id, from, _)| {
                *league == self.league_path && *id == team.id && season >= *from
            })
            .map_or(team.slug.as_str(), |&(_, _, _, slug)| slug)
    }
}

#[async_trait]
impl SourceAdapter for StatmuseAdapter {
    fn name(&self) -> &'static str {
        "statmuse"
    }

    fn roster_url(&self, team: &TeamDescriptor, season: i32) -> Result<String, SourceError> {
        let id = team.statmuse_id.ok_or_else(|| SourceError::NotConfigured {
            team: team.id.clone(),
            adapter: "statmuse",
            field: "statmuse_id",
        })?;
        Ok(format!(
            "https://www.statmuse.com/{}/team/{}-{}/roster/{}",
            self.league_path,
            self.slug_for(team, season),
            id,
            season
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
            FetchOutcome::Body(body) => parse_roster(&body, &team.id, season, &url).map(dedupe_by_name),
        }
    }
}

/// Column positions inside one StatMuse roster table.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Columns {
    jersey: Option<usize>,
    name: usize,
    position: Option<usize>,
    height: Option<usize>,
    weight: Option<usize>,
    birth_date: Option<usize>,
    college: Option<usize>,
}

impl Columns {
    /// NO, (headshot), NAME, POS, HT, WT, DOB, (exp), COLLEGE
    const POSITIONAL: Columns = Columns {
        jersey: Some(0),
        name: 2,
        position: Some(3),
        height: Some(4),
        weight: Some(5),
        birth_date: Some(6),
        college: Some(8),
    };

    fn from_header(labels: &[String]) -> Option<Columns> {
        let find = |names: &[&str]| {
            labels
                .iter()
                .position(|l| names.contains(&l.to_ascii_uppercase().as_str()))
        };
        Some(Columns {
            jersey: find(&["NO", "NO.", "#", "NUM", "JERSEY"]),
            name: find(&["NAME", "PLAYER"])?,
            position: find(&["POS", "POSITION"]),
            height: find(&["HT", "HEIGHT"]),
            weight: find(&["WT", "WEIGHT"]),
            birth_date: find(&["DOB", "BORN", "BIRTH DATE"]),
            college: find(&["COLLEGE", "SCHOOL"]),
        })
    }
}

fn selector(css: &str, url: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::mismatch(url, format!("bad selector {css}: {e}"), ""))
}

/// Parse the first roster table on a StatMuse page. No table means no roster.
pub fn parse_roster(
    html: &str,
    team_id: &str,
    season: i32,
    url: &str,
) -> Result<Vec<RawPlayerRecord>, SourceError> {
    let doc = Html::parse_document(html);
    let table_sel = selector("table", url)?;
    let tr_sel = selector("tr", url)?;
    let th_sel = selector("th", url)?;
    let td_sel = selector("td", url)?;

    let Some(table) = doc.select(&table_sel).next() else {
        return Ok(Vec::new());
    };

    let header: Vec<String> = table
        .select(&tr_sel)
        .find(|tr| tr.select(&th_sel).next().is_some() && tr.select(&td_sel).next().is_none())
        .map(|tr| tr.select(&th_sel).map(cell_text).collect())
        .unwrap_or_default();

    let columns = if header.iter().all(|l| l.is_empty()) {
        Columns::POSITIONAL
    } else {
        Columns::from_header(&header).ok_or_else(|| {
            SourceError::mismatch(url, "roster header has no NAME column", &table.html())
        })?
    };

    let mut out = Vec::new();
    for tr in table.select(&tr_sel) {
        let cells: Vec<ElementRef<'_>> = tr.select(&td_sel).collect();
        if cells.len() < 5 || cells.len() <= columns.name {
            continue;
        }
        let get = |idx: Option<usize>| idx.and_then(|i| cells.get(i)).map(|c| cell_text(*c)).and_then(non_empty);

        let Some(name) = get(Some(columns.name)) else {
            continue;
        };
        if name.eq_ignore_ascii_case("player") || name.eq_ignore_ascii_case("name") {
            continue;
        }

        let mut rec = RawPlayerRecord::new(team_id, season, name);
        rec.jersey_number = get(columns.jersey);
        rec.position = get(columns.position);
        rec.height = get(columns.height);
        rec.weight = get(columns.weight);
        rec.birth_date = get(columns.birth_date);
        rec.college = get(columns.college);
        out.push(rec);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::StaticFetcher;

    const COWBOYS_2022: &str = r#"
<html><body>
<table>
  <thead><tr>
    <th>NO</th><th></th><th>NAME</th><th>POS</th><th>HT</th><th>WT</th><th>DOB</th><th>EXP</th><th>COLLEGE</th>
  </tr></thead>
  <tbody>
    <tr><td>9</td><td><img src="x.png"></td><td><span>Nahshon Wright</span><span>N. Wright</span></td><td>CB</td><td>6' 4"</td><td>183</td><td>11/28/1998</td><td>2</td><td>Oregon State</td></tr>
    <tr><td>84</td><td></td><td>Sean McKeon</td><td>TE</td><td>6' 5"</td><td>246</td><td>2/5/1998</td><td>3</td><td>Michigan</td></tr>
    <tr><td>84</td><td></td><td>Sean McKeon</td><td>TE</td><td>6' 5"</td><td>246</td><td>2/5/1998</td><td>3</td><td>Michigan</td></tr>
    <tr><td colspan="9">Practice squad</td></tr>
  </tbody>
</table>
</body></html>"#;

    fn cowboys() -> TeamDescriptor {
        TeamDescriptor {
            id: "dallas-cowboys".into(),
            name: "Dallas Cowboys".into(),
            slug: "dallas-cowboys".into(),
            statmuse_id: Some(75),
            espn_id: None,
            cube_id: None,
            wiki_names: vec![],
            first_season: None,
            last_season: None,
        }
    }

    #[test]
    fn header_driven_mapping() {
        let rows = parse_roster(COWBOYS_2022, "dallas-cowboys", 2022, "u").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].player_name, "Nahshon WrightN. Wright");
        assert_eq!(rows[0].jersey_number.as_deref(), Some("9"));
        assert_eq!(rows[0].birth_date.as_deref(), Some("11/28/1998"));
        assert_eq!(rows[1].college.as_deref(), Some("Michigan"));
        assert_eq!(rows[1].position.as_deref(), Some("TE"));
    }

    #[test]
    fn headerless_table_uses_positional_layout() {
        let html = r#"<table><tr><td>23</td><td></td><td>Luka Doncic</td><td>G</td><td>6-7</td><td>230</td><td>2/28/1999</td><td>6</td><td></td></tr></table>"#;
        let rows = parse_roster(html, "dallas-mavericks", 2024, "u").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].weight.as_deref(), Some("230"));
        assert_eq!(rows[0].college, None);
    }

    #[test]
    fn missing_name_column_is_a_parse_mismatch() {
        let html = r#"<table><tr><th>NO</th><th>POS</th></tr><tr><td>1</td><td>G</td><td>a</td><td>b</td><td>c</td></tr></table>"#;
        let err = parse_roster(html, "t", 2024, "https://www.statmuse.com/x").unwrap_err();
        assert!(matches!(err, SourceError::ParseMismatch { .. }));
    }

    #[test]
    fn page_without_table_is_empty() {
        let rows = parse_roster("<html><p>No roster</p></html>", "t", 1950, "u").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn utah_switches_slug_in_2026() {
        let adapter = StatmuseAdapter::new("nhl", Arc::new(StaticFetcher::default()));
        let mut utah = cowboys();
        utah.id = "utah-hockey-club".into();
        utah.slug = "utah-hockey-club".into();
        utah.statmuse_id = Some(40);
        assert_eq!(
            adapter.roster_url(&utah, 2025).unwrap(),
            "https://www.statmuse.com/nhl/team/utah-hockey-club-40/roster/2025"
        );
        assert_eq!(
            adapter.roster_url(&utah, 2026).unwrap(),
            "https://www.statmuse.com/nhl/team/utah-mammoth-40/roster/2026"
        );
    }

    #[tokio::test]
    async fn fetch_dedupes_and_treats_404_as_empty() {
        let url = "https://www.statmuse.com/nfl/team/dallas-cowboys-75/roster/2022";
        let fetcher = Arc::new(StaticFetcher::default().with_page(url, COWBOYS_2022));
        let adapter = StatmuseAdapter::new("nfl", fetcher.clone());

        let rows = adapter.fetch_roster(&cowboys(), 2022).await.unwrap();
        assert_eq!(rows.len(), 2);

        let none = adapter.fetch_roster(&cowboys(), 1921).await.unwrap();
        assert!(none.is_empty());
        assert_eq!(fetcher.requested().len(), 2);
    }

    #[tokio::test]
    async fn missing_statmuse_id_is_not_configured() {
        let adapter = StatmuseAdapter::new("nfl", Arc::new(StaticFetcher::default()));
        let mut team = cowboys();
        team.statmuse_id = None;
        let err = adapter.fetch_roster(&team, 2022).await.unwrap_err();
        assert!(matches!(err, SourceError::NotConfigured { .. }));
    }
}
