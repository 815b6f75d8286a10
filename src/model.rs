//! Record shapes moved through the pipeline.
//!
//! `RawPlayerRecord` is what adapters emit and what league tables store; the natural key is
//! `(team_id, season_year, player_name)`. Enrichment fields are filled by the AI stage only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Natural key of a league roster row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RosterKey {
    pub team_id: String,
    pub season_year: i32,
    pub player_name: String,
}

impl std::fmt::Display for RosterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.team_id, self.season_year, self.player_name)
    }
}

/// Linguistic enrichment attached to a player name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentFields {
    pub phonetic_name: Option<String>,
    pub ipa_name: Option<String>,
    pub chinese_name: Option<String>,
    pub hardware_safe_name: Option<String>,
}

impl EnrichmentFields {
    pub fn is_empty(&self) -> bool {
        self.phonetic_name.is_none()
            && self.ipa_name.is_none()
            && self.chinese_name.is_none()
            && self.hardware_safe_name.is_none()
    }

    /// Fill `phonetic_name` and `hardware_safe_name` from the name itself when missing.
    pub fn with_fallbacks(mut self, player_name: &str) -> Self {
        if self.phonetic_name.is_none() {
            self.phonetic_name = Some(crate::normalization::phonetic_fallback(player_name));
        }
        if self.hardware_safe_name.is_none() {
            self.hardware_safe_name = Some(crate::normalization::hardware_safe_fallback(player_name));
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPlayerRecord {
    pub team_id: String,
    pub season_year: i32,
    pub player_name: String,
    /// Upstream athlete id when the source exposes one. Stored, never used as the key.
    pub player_id: Option<String>,
    /// Kept as text: "00" and "0" are different jerseys.
    pub jersey_number: Option<String>,
    pub position: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    /// ISO 8601 (`YYYY-MM-DD`) once normalized.
    pub birth_date: Option<String>,
    pub college: Option<String>,
    pub birthplace: Option<String>,
    pub nationality: Option<String>,
    pub age: Option<i32>,
    pub years_pro: Option<i32>,
    #[serde(flatten)]
    pub enrichment: EnrichmentFields,
}

impl RawPlayerRecord {
    pub fn new(team_id: impl Into<String>, season_year: i32, player_name: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            season_year,
            player_name: player_name.into(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> RosterKey {
        RosterKey {
            team_id: self.team_id.clone(),
            season_year: self.season_year,
            player_name: self.player_name.clone(),
        }
    }

    pub fn birth_date_naive(&self) -> Option<NaiveDate> {
        self.birth_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    /// Refresh-non-null merge: incoming non-null values win, nulls never erase stored values.
    /// Enrichment is fill-once and only lands where the stored row has no phonetic name yet.
    pub fn merge_from(&mut self, incoming: &RawPlayerRecord) {
        fn take(slot: &mut Option<String>, v: &Option<String>) {
            if v.is_some() {
                slot.clone_from(v);
            }
        }
        take(&mut self.player_id, &incoming.player_id);
        take(&mut self.jersey_number, &incoming.jersey_number);
        take(&mut self.position, &incoming.position);
        take(&mut self.height, &incoming.height);
        take(&mut self.weight, &incoming.weight);
        take(&mut self.birth_date, &incoming.birth_date);
        take(&mut self.college, &incoming.college);
        take(&mut self.birthplace, &incoming.birthplace);
        take(&mut self.nationality, &incoming.nationality);
        if incoming.age.is_some() {
            self.age = incoming.age;
        }
        if incoming.years_pro.is_some() {
            self.years_pro = incoming.years_pro;
        }
        if self.enrichment.phonetic_name.is_none() && !incoming.enrichment.is_empty() {
            self.enrichment = incoming.enrichment.clone();
        }
    }
}

/// Name-keyed cache row shared by every league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalEnrichmentEntry {
    pub player_name: String,
    #[serde(flatten)]
    pub fields: EnrichmentFields,
}

/// Team as the orchestrator knows it: a league-local slug plus whatever ids the adapters need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDescriptor {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub statmuse_id: Option<u32>,
    pub espn_id: Option<String>,
    /// TheBaseballCube team id; minor-league teams are discovered per season.
    pub cube_id: Option<u32>,
    /// Wikipedia article stems, each valid up to and including `until_year` (None = open ended).
    pub wiki_names: Vec<WikiName>,
    pub first_season: Option<i32>,
    pub last_season: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiName {
    pub name: String,
    pub until_year: Option<i32>,
}

impl TeamDescriptor {
    pub fn active_in(&self, season: i32) -> bool {
        self.first_season.map_or(true, |first| season >= first)
            && self.last_season.map_or(true, |last| season <= last)
    }

    /// Matches an operator filter against the id, slug or ESPN id.
    pub fn matches_filter(&self, filter: &str) -> bool {
        let f = filter.trim();
        self.id == f || self.slug == f || self.espn_id.as_deref() == Some(f)
    }
}

/// `--season` argument: one year or an inclusive `YYYY-YYYY` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonFilter {
    Single(i32),
    Range { start: i32, end: i32 },
}

impl SeasonFilter {
    pub fn years(&self) -> Vec<i32> {
        match *self {
            SeasonFilter::Single(y) => vec![y],
            SeasonFilter::Range { start, end } => (start..=end).collect(),
        }
    }

    pub fn contains(&self, season: i32) -> bool {
        match *self {
            SeasonFilter::Single(y) => season == y,
            SeasonFilter::Range { start, end } => (start..=end).contains(&season),
        }
    }
}

impl std::str::FromStr for SeasonFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse_year = |v: &str| -> anyhow::Result<i32> {
            let y: i32 = v
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid season year {v:?}"))?;
            if !(1850..=2200).contains(&y) {
                anyhow::bail!("season year out of range: {y}");
            }
            Ok(y)
        };
        match s.split_once('-') {
            Some((a, b)) => {
                let (start, end) = (parse_year(a)?, parse_year(b)?);
                if start > end {
                    anyhow::bail!("season range {s:?} runs backwards");
                }
                Ok(SeasonFilter::Range { start, end })
            }
            None => Ok(SeasonFilter::Single(parse_year(s)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_stored_values_when_incoming_is_null() {
        let mut stored = RawPlayerRecord::new("dallas-cowboys", 2022, "Dak Prescott");
        stored.position = Some("QB".into());
        stored.college = Some("Mississippi State".into());

        let mut incoming = RawPlayerRecord::new("dallas-cowboys", 2022, "Dak Prescott");
        incoming.jersey_number = Some("04".into());
        incoming.position = Some("QB1".into());

        stored.merge_from(&incoming);
        assert_eq!(stored.jersey_number.as_deref(), Some("04"));
        assert_eq!(stored.position.as_deref(), Some("QB1"));
        assert_eq!(stored.college.as_deref(), Some("Mississippi State"));
    }

    #[test]
    fn merge_never_overwrites_existing_enrichment() {
        let mut stored = RawPlayerRecord::new("t", 2020, "Luis Diaz");
        stored.enrichment.phonetic_name = Some("loo-EES DEE-ahz".into());

        let mut incoming = stored.clone();
        incoming.enrichment.phonetic_name = Some("other".into());
        stored.merge_from(&incoming);
        assert_eq!(
            stored.enrichment.phonetic_name.as_deref(),
            Some("loo-EES DEE-ahz")
        );
    }

    #[test]
    fn team_activity_window() {
        let team = TeamDescriptor {
            id: "houston-comets".into(),
            name: "Houston Comets".into(),
            slug: "houston-comets".into(),
            statmuse_id: None,
            espn_id: Some("31".into()),
            cube_id: None,
            wiki_names: vec![],
            first_season: Some(1997),
            last_season: Some(2008),
        };
        assert!(team.active_in(1997));
        assert!(team.active_in(2008));
        assert!(!team.active_in(2009));
        assert!(team.matches_filter("31"));
        assert!(team.matches_filter("houston-comets"));
    }

    #[test]
    fn season_filter_parses_single_and_range() {
        let single: SeasonFilter = "2022".parse().unwrap();
        assert_eq!(single.years(), vec![2022]);
        let range: SeasonFilter = "2020-2024".parse().unwrap();
        assert_eq!(range.years().len(), 5);
        assert!(range.contains(2024));
        assert!(!range.contains(2019));
        assert!("2024-2020".parse::<SeasonFilter>().is_err());
        assert!("twenty".parse::<SeasonFilter>().is_err());
    }
}
