use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{dedupe_by_name, FetchOutcome, PageFetcher, SourceAdapter};
use crate::error::SourceError;
use crate::leagues::EspnEndpoint;
use crate::model::{RawPlayerRecord, TeamDescriptor};

pub struct EspnApiAdapter {
    sport: &'static str,
    league: &'static str,
    endpoint: EspnEndpoint,
    fetcher: Arc<dyn PageFetcher>,
}

impl EspnApiAdapter {
    pub fn new(
        sport: &'static str,
        league: &'static str,
        endpoint: EspnEndpoint,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            sport,
            league,
            endpoint,
            fetcher,
        }
    }
}

#[async_trait]
impl SourceAdapter for EspnApiAdapter {
    fn name(&self) -> &'static str {
        "espn-api"
    }

    fn roster_url(&self, team: &TeamDescriptor, season: i32) -> Result<String, SourceError> {
        let espn_id = team.espn_id.as_deref().ok_or_else(|| SourceError::NotConfigured {
            team: team.id.clone(),
            adapter: "espn-api",
            field: "espn_id",
        })?;
        let base = match self.endpoint {
            EspnEndpoint::SiteV2 => "https://site.api.espn.com/apis/site/v2/sports",
            EspnEndpoint::CommonV3 => "https://site.api.espn.com/apis/common/v3/sports",
        };
        Ok(format!(
            "{base}/{}/{}/teams/{espn_id}/roster?season={season}",
            self.sport, self.league
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
            FetchOutcome::Body(body) => parse_roster_json(&body, &team.id, season, &url).map(dedupe_by_name),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct EspnAthlete {
    id: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    full_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    display_name: Option<String>,
    jersey: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    position: Option<EspnPosition>,
    #[serde(deserialize_with = "lenient")]
    display_height: Option<String>,
    height: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    display_weight: Option<String>,
    weight: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    date_of_birth: Option<String>,
    age: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    college: Option<EspnNamed>,
    #[serde(deserialize_with = "lenient")]
    birth_place: Option<EspnBirthPlace>,
    #[serde(deserialize_with = "lenient")]
    experience: Option<EspnExperience>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct EspnPosition {
    abbreviation: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct EspnNamed {
    name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct EspnBirthPlace {
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct EspnExperience {
    years: Option<i32>,
}

/// A field of the wrong shape reads as absent instead of failing the whole athlete.
fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let v = Value::deserialize(de)?;
    Ok(serde_json::from_value(v).ok())
}

/// Scalar JSON value as text; ESPN mixes strings and numbers for ids and measurements.
fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn looks_like_athlete(v: &Value) -> bool {
    v.get("fullName").is_some() || v.get("displayName").is_some()
}

/// Flatten the three envelopes ESPN uses: grouped (`athletes[].items[]`), flat (`athletes[]`),
/// and college position groups (`positionGroups[].athletes[]`).
fn collect_athletes(root: &Value) -> Vec<&Value> {
    let mut out = Vec::new();
    for key in ["athletes", "positionGroups"] {
        let Some(entries) = root.get(key).and_then(Value::as_array) else {
            continue;
        };
        for entry in entries {
            if let Some(items) = entry.get("items").and_then(Value::as_array) {
                out.extend(items.iter());
            } else if let Some(items) = entry.get("athletes").and_then(Value::as_array) {
                out.extend(items.iter());
            } else if looks_like_athlete(entry) {
                out.push(entry);
            }
        }
    }
    out
}

pub fn parse_roster_json(
    body: &str,
    team_id: &str,
    season: i32,
    url: &str,
) -> Result<Vec<RawPlayerRecord>, SourceError> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| SourceError::mismatch(url, format!("roster body is not JSON: {e}"), body))?;

    let mut out = Vec::new();
    for raw in collect_athletes(&root) {
        let athlete: EspnAthlete = match serde_json::from_value(raw.clone()) {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!(target = "espn_api", %url, error = %e, "skipping unreadable athlete entry");
                continue;
            }
        };
        let Some(name) = athlete
            .full_name
            .clone()
            .or_else(|| athlete.display_name.clone())
            .filter(|n| !n.trim().is_empty())
        else {
            continue;
        };

        let mut rec = RawPlayerRecord::new(team_id, season, name);
        rec.player_id = athlete.id.as_ref().and_then(scalar_text);
        rec.jersey_number = athlete.jersey.as_ref().and_then(scalar_text);
        rec.position = athlete
            .position
            .as_ref()
            .and_then(|p| p.abbreviation.clone().or_else(|| p.name.clone()));
        rec.height = athlete
            .display_height
            .clone()
            .or_else(|| athlete.height.as_ref().and_then(scalar_text));
        rec.weight = athlete
            .display_weight
            .clone()
            .or_else(|| athlete.weight.as_ref().and_then(scalar_text));
        rec.birth_date = athlete.date_of_birth.clone();
        rec.age = athlete.age.as_ref().and_then(scalar_text).and_then(|a| a.parse().ok());
        rec.college = athlete.college.as_ref().and_then(|c| c.name.clone());
        rec.birthplace = athlete.birth_place.as_ref().and_then(|b| {
            let parts: Vec<&str> = [&b.city, &b.state, &b.country]
                .into_iter()
                .filter_map(|p| p.as_deref())
                .filter(|p| !p.trim().is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        });
        rec.years_pro = athlete.experience.as_ref().and_then(|e| e.years);
        out.push(rec);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_site_v2_payload() {
        let body = r#"{
          "athletes": [
            {"position": "Guards", "items": [
              {"id": "4433403", "fullName": "Caitlin Clark", "jersey": "22",
               "position": {"abbreviation": "G", "name": "Guard"},
               "displayHeight": "6' 0\"", "displayWeight": "152 lbs",
               "dateOfBirth": "2002-01-22T08:00Z",
               "college": {"name": "Iowa"},
               "birthPlace": {"city": "Des Moines", "state": "IA"},
               "experience": {"years": 1}}
            ]},
            {"position": "Centers", "items": [
              {"id": 12345, "displayName": "Aliyah Boston", "height": 77, "weight": 220}
            ]}
          ]
        }"#;
        let rows = parse_roster_json(body, "indiana-fever", 2024, "u").unwrap();
        assert_eq!(rows.len(), 2);
        let clark = &rows[0];
        assert_eq!(clark.player_id.as_deref(), Some("4433403"));
        assert_eq!(clark.position.as_deref(), Some("G"));
        assert_eq!(clark.birthplace.as_deref(), Some("Des Moines, IA"));
        assert_eq!(clark.years_pro, Some(1));
        assert_eq!(clark.birth_date.as_deref(), Some("2002-01-22T08:00Z"));
        let boston = &rows[1];
        assert_eq!(boston.player_id.as_deref(), Some("12345"));
        assert_eq!(boston.height.as_deref(), Some("77"));
    }

    #[test]
    fn flat_and_position_group_payloads() {
        let flat = r#"{"athletes": [{"id": "1", "fullName": "A One"}, {"id": "2", "displayName": "B Two"}]}"#;
        assert_eq!(parse_roster_json(flat, "t", 2000, "u").unwrap().len(), 2);

        let groups = r#"{"positionGroups": [{"athletes": [{"id": "9", "fullName": "Jalen Milroe", "jersey": "4"}]}]}"#;
        let rows = parse_roster_json(groups, "333", 2024, "u").unwrap();
        assert_eq!(rows[0].jersey_number.as_deref(), Some("4"));
    }

    #[test]
    fn mixed_scalar_types_keep_the_athlete() {
        let body = r#"{"athletes": [
            {"fullName": "Numeric Jersey", "jersey": 23, "age": 31},
            {"fullName": "Text Age", "jersey": "5", "age": "24"},
            {"fullName": "Odd Fields", "jersey": ["7"], "age": "n/a", "position": "Guard", "college": "Iowa"},
            {"fullName": "Fine One", "jersey": "1"}
        ]}"#;
        let rows = parse_roster_json(body, "t", 2024, "u").unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, ["Numeric Jersey", "Text Age", "Odd Fields", "Fine One"]);
        assert_eq!(rows[0].jersey_number.as_deref(), Some("23"));
        assert_eq!(rows[0].age, Some(31));
        assert_eq!(rows[1].age, Some(24));
        assert_eq!(rows[2].jersey_number, None);
        assert_eq!(rows[2].age, None);
        assert_eq!(rows[2].position, None);
    }

    #[test]
    fn empty_and_malformed_bodies() {
        assert!(parse_roster_json(r#"{"team": {}}"#, "t", 2000, "u").unwrap().is_empty());
        let err = parse_roster_json("<html>oops</html>", "t", 2000, "u").unwrap_err();
        assert!(matches!(err, SourceError::ParseMismatch { .. }));
    }

    #[test]
    fn endpoint_urls() {
        use crate::sources::testing::StaticFetcher;
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
        let site = EspnApiAdapter::new(
            "basketball",
            "wnba",
            EspnEndpoint::SiteV2,
            Arc::new(StaticFetcher::default()),
        );
        assert_eq!(
            site.roster_url(&team, 1999).unwrap(),
            "https://site.api.espn.com/apis/site/v2/sports/basketball/wnba/teams/31/roster?season=1999"
        );
        let common = EspnApiAdapter::new(
            "football",
            "college-football",
            EspnEndpoint::CommonV3,
            Arc::new(StaticFetcher::default()),
        );
        assert!(common
            .roster_url(&team, 2024)
            .unwrap()
            .starts_with("https://site.api.espn.com/apis/common/v3/sports/football/college-football/"));
    }
}
