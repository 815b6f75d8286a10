//! Static league catalogue: which table a league writes to, which adapter feeds it, and its teams.

use crate::model::{TeamDescriptor, WikiName};

/// ESPN exposes rosters on two JSON endpoints with different envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EspnEndpoint {
    /// `site.api.espn.com/apis/site/v2/...` (pro leagues)
    SiteV2,
    /// `site.api.espn.com/apis/common/v3/...` (college)
    CommonV3,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// StatMuse roster tables; `path` is the league segment of the URL (`nfl`, `nba`, ...).
    Statmuse { path: &'static str },
    EspnHtml {
        sport: &'static str,
        league: &'static str,
    },
    EspnApi {
        sport: &'static str,
        league: &'static str,
        endpoint: EspnEndpoint,
    },
    Wikipedia,
    /// TheBaseballCube minor-league circuits; teams are discovered per season.
    BaseballCube { circuits: &'static [&'static str] },
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Statmuse { .. } => "statmuse",
            SourceKind::EspnHtml { .. } => "espn-html",
            SourceKind::EspnApi { .. } => "espn-api",
            SourceKind::Wikipedia => "wikipedia",
            SourceKind::BaseballCube { .. } => "baseball-cube",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeagueConfig {
    pub key: &'static str,
    pub name: &'static str,
    /// Destination table; several leagues may share one (`wnba`, `wnba-espn`, `wnba-historical`).
    pub table: &'static str,
    pub source: SourceKind,
    pub teams: Vec<TeamDescriptor>,
}

impl LeagueConfig {
    /// Teams matching an optional operator filter (id, slug or ESPN id).
    pub fn select_teams<'a>(&'a self, filter: Option<&'a str>) -> impl Iterator<Item = &'a TeamDescriptor> + 'a {
        self.teams
            .iter()
            .filter(move |t| filter.map_or(true, |f| t.matches_filter(f)))
    }
}

pub const LEAGUE_KEYS: &[&str] = &[
    "nba",
    "nfl",
    "mlb",
    "nhl",
    "wnba",
    "wnba-espn",
    "wnba-historical",
    "mls",
    "nwsl",
    "usl",
    "ncaa-football",
    "ncaa-men-basketball",
    "ncaa-women-basketball",
    "milb-triplea",
];

pub fn league(key: &str) -> Option<LeagueConfig> {
    let key = key.trim().to_ascii_lowercase();
    let cfg = match key.as_str() {
        "nba" => statmuse_league("nba", "NBA", "nba_rosters", NBA_TEAMS),
        "nfl" => statmuse_league("nfl", "NFL", "nfl_rosters", NFL_TEAMS),
        "mlb" => statmuse_league("mlb", "MLB", "mlb_rosters", MLB_TEAMS),
        "nhl" => statmuse_league("nhl", "NHL", "nhl_rosters", NHL_TEAMS),
        "wnba" => statmuse_league("wnba", "WNBA", "wnba_rosters", WNBA_TEAMS),
        "wnba-espn" => LeagueConfig {
            key: "wnba-espn",
            name: "WNBA (ESPN)",
            table: "wnba_rosters",
            source: SourceKind::EspnApi {
                sport: "basketball",
                league: "wnba",
                endpoint: EspnEndpoint::SiteV2,
            },
            teams: WNBA_ESPN_TEAMS
                .iter()
                .map(|&(id, name, espn_id, first, last)| TeamDescriptor {
                    id: id.to_string(),
                    name: name.to_string(),
                    slug: id.to_string(),
                    statmuse_id: None,
                    espn_id: Some(espn_id.to_string()),
                    cube_id: None,
                    wiki_names: Vec::new(),
                    first_season: Some(first),
                    last_season: last,
                })
                .collect(),
        },
        "wnba-historical" => LeagueConfig {
            key: "wnba-historical",
            name: "WNBA Historical",
            table: "wnba_rosters",
            source: SourceKind::Wikipedia,
            teams: wnba_historical_teams(),
        },
        "mls" => espn_html_league("mls", "MLS", "mls_rosters", "USA.1", MLS_TEAMS),
        "nwsl" => espn_html_league("nwsl", "NWSL", "nwsl_rosters", "USA.NWSL", NWSL_TEAMS),
        "usl" => espn_html_league("usl", "USL Championship", "usl_rosters", "USA.USL.1", USL_TEAMS),
        "ncaa-football" => espn_college_league(
            "ncaa-football",
            "NCAA Football",
            "ncaa_football_rosters",
            "football",
            "college-football",
            NCAA_FOOTBALL_TEAMS,
        ),
        "ncaa-men-basketball" => espn_college_league(
            "ncaa-men-basketball",
            "NCAA Men Basketball",
            "ncaa_basketball_rosters",
            "basketball",
            "mens-college-basketball",
            NCAA_MEN_BASKETBALL_TEAMS,
        ),
        "ncaa-women-basketball" => espn_college_league(
            "ncaa-women-basketball",
            "NCAA Women Basketball",
            "ncaa_womens_basketball_rosters",
            "basketball",
            "womens-college-basketball",
            NCAA_WOMEN_BASKETBALL_TEAMS,
        ),
        "milb-triplea" => LeagueConfig {
            key: "milb-triplea",
            name: "MiLB Triple-A",
            table: "milb_rosters",
            source: SourceKind::BaseballCube {
                circuits: &["IL", "PCL"],
            },
            teams: Vec::new(),
        },
        _ => return None,
    };
    Some(cfg)
}

pub fn all_leagues() -> Vec<LeagueConfig> {
    LEAGUE_KEYS.iter().filter_map(|k| league(k)).collect()
}

/// (id, slug, display name, StatMuse id)
type StatmuseRow = (&'static str, &'static str, &'static str, u32);
/// (ESPN id, slug, display name); the ESPN id doubles as `team_id` for these tables.
type EspnRow = (&'static str, &'static str, &'static str);

fn statmuse_league(
    key: &'static str,
    name: &'static str,
    table: &'static str,
    rows: &[StatmuseRow],
) -> LeagueConfig {
    LeagueConfig {
        key,
        name,
        table,
        source: SourceKind::Statmuse { path: key },
        teams: rows
            .iter()
            .map(|&(id, slug, team_name, statmuse_id)| TeamDescriptor {
                id: id.to_string(),
                name: team_name.to_string(),
                slug: slug.to_string(),
                statmuse_id: Some(statmuse_id),
                espn_id: None,
                cube_id: None,
                wiki_names: Vec::new(),
                first_season: None,
                last_season: None,
            })
            .collect(),
    }
}

fn espn_teams(rows: &[EspnRow]) -> Vec<TeamDescriptor> {
    rows.iter()
        .map(|&(espn_id, slug, team_name)| TeamDescriptor {
            id: espn_id.to_string(),
            name: team_name.to_string(),
            slug: slug.to_string(),
            statmuse_id: None,
            espn_id: Some(espn_id.to_string()),
            cube_id: None,
            wiki_names: Vec::new(),
            first_season: None,
            last_season: None,
        })
        .collect()
}

fn espn_html_league(
    key: &'static str,
    name: &'static str,
    table: &'static str,
    espn_league: &'static str,
    rows: &[EspnRow],
) -> LeagueConfig {
    LeagueConfig {
        key,
        name,
        table,
        source: SourceKind::EspnHtml {
            sport: "soccer",
            league: espn_league,
        },
        teams: espn_teams(rows),
    }
}

fn espn_college_league(
    key: &'static str,
    name: &'static str,
    table: &'static str,
    sport: &'static str,
    espn_league: &'static str,
    rows: &[EspnRow],
) -> LeagueConfig {
    LeagueConfig {
        key,
        name,
        table,
        source: SourceKind::EspnApi {
            sport,
            league: espn_league,
            endpoint: EspnEndpoint::CommonV3,
        },
        teams: espn_teams(rows),
    }
}

fn wiki(name: &str, until_year: Option<i32>) -> WikiName {
    WikiName {
        name: name.to_string(),
        until_year,
    }
}

/// Franchises whose Wikipedia season pages moved with relocations.
fn wnba_historical_teams() -> Vec<TeamDescriptor> {
    let team = |id: &str, name: &str, wiki_names: Vec<WikiName>| TeamDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        slug: id.to_string(),
        statmuse_id: None,
        espn_id: None,
        cube_id: None,
        wiki_names,
        first_season: Some(1997),
        last_season: None,
    };
    vec![
        team(
            "las-vegas-aces",
            "Las Vegas Aces",
            vec![
                wiki("Utah_Starzz", Some(2002)),
                wiki("San_Antonio_Silver_Stars", Some(2013)),
                wiki("San_Antonio_Stars", Some(2017)),
                wiki("Las_Vegas_Aces", None),
            ],
        ),
        team(
            "dallas-wings",
            "Dallas Wings",
            vec![
                wiki("Detroit_Shock", Some(2009)),
                wiki("Tulsa_Shock", Some(2015)),
                wiki("Dallas_Wings", None),
            ],
        ),
    ]
}

/// (id, display name, ESPN id, first season, last season)
const WNBA_ESPN_TEAMS: &[(&str, &str, u32, i32, Option<i32>)] = &[
    ("atlanta-dream", "Atlanta Dream", 16, 2008, None),
    ("chicago-sky", "Chicago Sky", 17, 2006, None),
    ("connecticut-sun", "Connecticut Sun", 18, 1999, None),
    ("indiana-fever", "Indiana Fever", 19, 2000, None),
    ("new-york-liberty", "New York Liberty", 20, 1997, None),
    ("washington-mystics", "Washington Mystics", 21, 1998, None),
    ("dallas-wings", "Dallas Wings", 22, 1998, None),
    ("las-vegas-aces", "Las Vegas Aces", 23, 1997, None),
    ("los-angeles-sparks", "LA Sparks", 24, 1997, None),
    ("minnesota-lynx", "Minnesota Lynx", 25, 1999, None),
    ("phoenix-mercury", "Phoenix Mercury", 26, 1997, None),
    ("seattle-storm", "Seattle Storm", 27, 2000, None),
    ("charlotte-sting", "Charlotte Sting", 28, 1997, Some(2006)),
    ("cleveland-rockers", "Cleveland Rockers", 29, 1997, Some(2003)),
    ("detroit-shock", "Detroit Shock", 30, 1998, Some(2009)),
    ("houston-comets", "Houston Comets", 31, 1997, Some(2008)),
    ("miami-sol", "Miami Sol", 32, 2000, Some(2002)),
    ("orlando-miracle", "Orlando Miracle", 33, 1999, Some(2002)),
    ("portland-fire", "Portland Fire", 34, 2000, Some(2002)),
    ("sacramento-monarchs", "Sacramento Monarchs", 35, 1997, Some(2009)),
    ("san-antonio-stars", "San Antonio Stars", 36, 2003, Some(2017)),
    ("tulsa-shock", "Tulsa Shock", 37, 2010, Some(2015)),
    ("utah-starzz", "Utah Starzz", 38, 1997, Some(2002)),
];

const NBA_TEAMS: &[StatmuseRow] = &[
    ("atlanta-hawks", "atlanta-hawks", "Atlanta Hawks", 22),
    ("boston-celtics", "boston-celtics", "Boston Celtics", 1),
    ("brooklyn-nets", "brooklyn-nets", "Brooklyn Nets", 33),
    ("charlotte-hornets", "charlotte-hornets", "Charlotte Hornets", 53),
    ("chicago-bulls", "chicago-bulls", "Chicago Bulls", 25),
    ("cleveland-cavaliers", "cleveland-cavaliers", "Cleveland Cavaliers", 42),
    ("dallas-mavericks", "dallas-mavericks", "Dallas Mavericks", 46),
    ("denver-nuggets", "denver-nuggets", "Denver Nuggets", 28),
    ("detroit-pistons", "detroit-pistons", "Detroit Pistons", 13),
    ("golden-state-warriors", "golden-state-warriors", "Golden State Warriors", 6),
    ("houston-rockets", "houston-rockets", "Houston Rockets", 37),
    ("indiana-pacers", "indiana-pacers", "Indiana Pacers", 30),
    ("los-angeles-clippers", "la-clippers", "LA Clippers", 41),
    ("los-angeles-lakers", "los-angeles-lakers", "LA Lakers", 15),
    ("memphis-grizzlies", "memphis-grizzlies", "Memphis Grizzlies", 52),
    ("miami-heat", "miami-heat", "Miami Heat", 48),
    ("milwaukee-bucks", "milwaukee-bucks", "Milwaukee Bucks", 39),
    ("minnesota-timberwolves", "minnesota-timberwolves", "Minnesota Timberwolves", 49),
    ("new-orleans-pelicans", "new-orleans-pelicans", "New Orleans Pelicans", 47),
    ("new-york-knicks", "new-york-knicks", "New York Knicks", 5),
    ("oklahoma-city-thunder", "oklahoma-city-thunder", "OKC Thunder", 38),
    ("orlando-magic", "orlando-magic", "Orlando Magic", 50),
    ("philadelphia-76ers", "philadelphia-76ers", "Philadelphia 76ers", 21),
    ("phoenix-suns", "phoenix-suns", "Phoenix Suns", 40),
    ("portland-trail-blazers", "portland-trail-blazers", "Portland Trail Blazers", 43),
    ("sacramento-kings", "sacramento-kings", "Sacramento Kings", 16),
    ("san-antonio-spurs", "san-antonio-spurs", "San Antonio Spurs", 27),
    ("toronto-raptors", "toronto-raptors", "Toronto Raptors", 51),
    ("utah-jazz", "utah-jazz", "Utah Jazz", 45),
    ("washington-wizards", "washington-wizards", "Washington Wizards", 24),
];

const NFL_TEAMS: &[StatmuseRow] = &[
    ("baltimore-ravens", "baltimore-ravens", "Baltimore Ravens", 85),
    ("buffalo-bills", "buffalo-bills", "Buffalo Bills", 67),
    ("cincinnati-bengals", "cincinnati-bengals", "Cincinnati Bengals", 80),
    ("cleveland-browns", "cleveland-browns", "Cleveland Browns", 58),
    ("denver-broncos", "denver-broncos", "Denver Broncos", 68),
    ("houston-texans", "houston-texans", "Houston Texans", 86),
    ("indianapolis-colts", "indianapolis-colts", "Indianapolis Colts", 66),
    ("jacksonville-jaguars", "jacksonville-jaguars", "Jacksonville Jaguars", 84),
    ("kansas-city-chiefs", "kansas-city-chiefs", "Kansas City Chiefs", 69),
    ("las-vegas-raiders", "las-vegas-raiders", "Las Vegas Raiders", 73),
    ("los-angeles-chargers", "los-angeles-chargers", "LA Chargers", 74),
    ("miami-dolphins", "miami-dolphins", "Miami Dolphins", 77),
    ("new-england-patriots", "new-england-patriots", "New England Patriots", 70),
    ("new-york-jets", "new-york-jets", "New York Jets", 71),
    ("pittsburgh-steelers", "pittsburgh-steelers", "Pittsburgh Steelers", 50),
    ("tennessee-titans", "tennessee-titans", "Tennessee Titans", 72),
    ("arizona-cardinals", "arizona-cardinals", "Arizona Cardinals", 7),
    ("atlanta-falcons", "atlanta-falcons", "Atlanta Falcons", 78),
    ("carolina-panthers", "carolina-panthers", "Carolina Panthers", 83),
    ("chicago-bears", "chicago-bears", "Chicago Bears", 4),
    ("dallas-cowboys", "dallas-cowboys", "Dallas Cowboys", 75),
    ("detroit-lions", "detroit-lions", "Detroit Lions", 46),
    ("green-bay-packers", "green-bay-packers", "Green Bay Packers", 18),
    ("los-angeles-rams", "los-angeles-rams", "LA Rams", 53),
    ("minnesota-vikings", "minnesota-vikings", "Minnesota Vikings", 76),
    ("new-orleans-saints", "new-orleans-saints", "New Orleans Saints", 79),
    ("new-york-giants", "new-york-giants", "New York Giants", 35),
    ("philadelphia-eagles", "philadelphia-eagles", "Philadelphia Eagles", 49),
    ("san-francisco-49ers", "san-francisco-49ers", "San Francisco 49ers", 63),
    ("seattle-seahawks", "seattle-seahawks", "Seattle Seahawks", 81),
    ("tampa-bay-buccaneers", "tampa-bay-buccaneers", "Tampa Bay Buccaneers", 82),
    ("washington-commanders", "washington-commanders", "Washington Commanders", 48),
];

const MLB_TEAMS: &[StatmuseRow] = &[
    ("arizona-diamondbacks", "arizona-diamondbacks", "Arizona Diamondbacks", 97),
    ("atlanta-braves", "atlanta-braves", "Atlanta Braves", 1),
    ("baltimore-orioles", "baltimore-orioles", "Baltimore Orioles", 73),
    ("boston-red-sox", "boston-red-sox", "Boston Red Sox", 69),
    ("chicago-cubs", "chicago-cubs", "Chicago Cubs", 2),
    ("chicago-white-sox", "chicago-white-sox", "Chicago White Sox", 70),
    ("cincinnati-reds", "cincinnati-reds", "Cincinnati Reds", 19),
    ("cleveland-guardians", "cleveland-guardians", "Cleveland Guardians", 71),
    ("colorado-rockies", "colorado-rockies", "Colorado Rockies", 95),
    ("detroit-tigers", "detroit-tigers", "Detroit Tigers", 72),
    ("houston-astros", "houston-astros", "Houston Astros", 87),
    ("kansas-city-royals", "kansas-city-royals", "Kansas City Royals", 89),
    ("los-angeles-angels", "los-angeles-angels", "LA Angels", 85),
    ("los-angeles-dodgers", "los-angeles-dodgers", "LA Dodgers", 31),
    ("miami-marlins", "miami-marlins", "Miami Marlins", 96),
    ("milwaukee-brewers", "milwaukee-brewers", "Milwaukee Brewers", 92),
    ("minnesota-twins", "minnesota-twins", "Minnesota Twins", 75),
    ("new-york-mets", "new-york-mets", "New York Mets", 88),
    ("new-york-yankees", "new-york-yankees", "New York Yankees", 76),
    ("oakland-athletics", "oakland-athletics", "Oakland Athletics", 74),
    ("philadelphia-phillies", "philadelphia-phillies", "Philadelphia Phillies", 27),
    ("pittsburgh-pirates", "pittsburgh-pirates", "Pittsburgh Pirates", 22),
    ("san-diego-padres", "san-diego-padres", "San Diego Padres", 91),
    ("san-francisco-giants", "san-francisco-giants", "San Francisco Giants", 25),
    ("seattle-mariners", "seattle-mariners", "Seattle Mariners", 93),
    ("st-louis-cardinals", "st-louis-cardinals", "St. Louis Cardinals", 67),
    ("tampa-bay-rays", "tampa-bay-rays", "Tampa Bay Rays", 98),
    ("texas-rangers", "texas-rangers", "Texas Rangers", 86),
    ("toronto-blue-jays", "toronto-blue-jays", "Toronto Blue Jays", 94),
    ("washington-nationals", "washington-nationals", "Washington Nationals", 90),
];

const NHL_TEAMS: &[StatmuseRow] = &[
    ("anaheim-ducks", "anaheim-ducks", "Anaheim Ducks", 32),
    ("boston-bruins", "boston-bruins", "Boston Bruins", 6),
    ("buffalo-sabres", "buffalo-sabres", "Buffalo Sabres", 19),
    ("calgary-flames", "calgary-flames", "Calgary Flames", 21),
    ("carolina-hurricanes", "carolina-hurricanes", "Carolina Hurricanes", 26),
    ("chicago-blackhawks", "chicago-blackhawks", "Chicago Blackhawks", 11),
    ("colorado-avalanche", "colorado-avalanche", "Colorado Avalanche", 27),
    ("columbus-blue-jackets", "columbus-blue-jackets", "Columbus Blue Jackets", 36),
    ("dallas-stars", "dallas-stars", "Dallas Stars", 15),
    ("detroit-red-wings", "detroit-red-wings", "Detroit Red Wings", 12),
    ("edmonton-oilers", "edmonton-oilers", "Edmonton Oilers", 25),
    ("florida-panthers", "florida-panthers", "Florida Panthers", 33),
    ("los-angeles-kings", "los-angeles-kings", "LA Kings", 14),
    ("minnesota-wild", "minnesota-wild", "Minnesota Wild", 37),
    ("montreal-canadiens", "montreal-canadiens", "Montreal Canadiens", 1),
    ("nashville-predators", "nashville-predators", "Nashville Predators", 34),
    ("new-jersey-devils", "new-jersey-devils", "New Jersey Devils", 23),
    ("new-york-islanders", "new-york-islanders", "New York Islanders", 22),
    ("new-york-rangers", "new-york-rangers", "New York Rangers", 10),
    ("ottawa-senators", "ottawa-senators", "Ottawa Senators", 30),
    ("philadelphia-flyers", "philadelphia-flyers", "Philadelphia Flyers", 16),
    ("pittsburgh-penguins", "pittsburgh-penguins", "Pittsburgh Penguins", 17),
    ("san-jose-sharks", "san-jose-sharks", "San Jose Sharks", 29),
    ("seattle-kraken", "seattle-kraken", "Seattle Kraken", 39),
    ("st-louis-blues", "st-louis-blues", "St. Louis Blues", 18),
    ("tampa-bay-lightning", "tampa-bay-lightning", "Tampa Bay Lightning", 31),
    ("toronto-maple-leafs", "toronto-maple-leafs", "Toronto Maple Leafs", 5),
    ("utah-hockey-club", "utah-hockey-club", "Utah HC", 40),
    ("vancouver-canucks", "vancouver-canucks", "Vancouver Canucks", 20),
    ("vegas-golden-knights", "vegas-golden-knights", "Vegas Golden Knights", 38),
    ("washington-capitals", "washington-capitals", "Washington Capitals", 24),
    ("winnipeg-jets", "winnipeg-jets", "Winnipeg Jets", 35),
];

const WNBA_TEAMS: &[StatmuseRow] = &[
    ("new-york-liberty", "new-york-liberty", "New York Liberty", 1),
    ("chicago-sky", "chicago-sky", "Chicago Sky", 2),
    ("washington-mystics", "washington-mystics", "Washington Mystics", 3),
    ("atlanta-dream", "atlanta-dream", "Atlanta Dream", 4),
    ("connecticut-sun", "connecticut-sun", "Connecticut Sun", 5),
    ("indiana-fever", "indiana-fever", "Indiana Fever", 6),
    ("phoenix-mercury", "phoenix-mercury", "Phoenix Mercury", 7),
    ("los-angeles-sparks", "los-angeles-sparks", "LA Sparks", 8),
    ("las-vegas-aces", "las-vegas-aces", "Las Vegas Aces", 9),
    ("golden-state-valkyries", "golden-state-valkyries", "Golden State Valkyries", 10),
    ("dallas-wings", "dallas-wings", "Dallas Wings", 11),
    ("minnesota-lynx", "minnesota-lynx", "Minnesota Lynx", 12),
    ("seattle-storm", "seattle-storm", "Seattle Storm", 13),
    ("charlotte-sting", "charlotte-sting", "Charlotte Sting", 14),
    ("cleveland-rockers", "cleveland-rockers", "Cleveland Rockers", 15),
    ("houston-comets", "houston-comets", "Houston Comets", 16),
    ("miami-sol", "miami-sol", "Miami Sol", 17),
    ("portland-fire", "portland-fire", "Portland Fire", 18),
    ("sacramento-monarchs", "sacramento-monarchs", "Sacramento Monarchs", 19),
    ("utah-starzz", "utah-starzz", "Utah Starzz", 9),
    ("orlando-miracle", "orlando-miracle", "Orlando Miracle", 5),
    ("detroit-shock", "detroit-shock", "Detroit Shock", 11),
];

const MLS_TEAMS: &[EspnRow] = &[
    ("18418", "atlanta-united-fc", "Atlanta United FC"),
    ("20906", "austin-fc", "Austin FC"),
    ("9720", "cf-montreal", "CF Montreal"),
    ("21300", "charlotte-fc", "Charlotte FC"),
    ("182", "chicago-fire-fc", "Chicago Fire FC"),
    ("184", "colorado-rapids", "Colorado Rapids"),
    ("183", "columbus-crew", "Columbus Crew"),
    ("193", "dc-united", "D.C. United"),
    ("18267", "fc-cincinnati", "FC Cincinnati"),
    ("185", "fc-dallas", "FC Dallas"),
    ("6077", "houston-dynamo-fc", "Houston Dynamo FC"),
    ("20232", "inter-miami-cf", "Inter Miami CF"),
    ("187", "la-galaxy", "LA Galaxy"),
    ("18966", "lafc", "LAFC"),
    ("17362", "minnesota-united-fc", "Minnesota United FC"),
    ("18986", "nashville-sc", "Nashville SC"),
    ("189", "new-england-revolution", "New England Revolution"),
    ("17606", "new-york-city-fc", "New York City FC"),
    ("190", "new-york-red-bulls", "New York Red Bulls"),
    ("12011", "orlando-city-sc", "Orlando City SC"),
    ("10739", "philadelphia-union", "Philadelphia Union"),
    ("9723", "portland-timbers", "Portland Timbers"),
    ("4771", "real-salt-lake", "Real Salt Lake"),
    ("191", "san-jose-earthquakes", "San Jose Earthquakes"),
    ("9726", "seattle-sounders-fc", "Seattle Sounders FC"),
    ("186", "sporting-kansas-city", "Sporting Kansas City"),
    ("21812", "st-louis-city-sc", "St. Louis CITY SC"),
    ("7318", "toronto-fc", "Toronto FC"),
    ("9727", "vancouver-whitecaps", "Vancouver Whitecaps"),
    ("22529", "san-diego-fc", "San Diego FC"),
];

const NWSL_TEAMS: &[EspnRow] = &[
    ("21422", "angel-city-fc", "Angel City FC"),
    ("22187", "bay-fc", "Bay FC"),
    ("15360", "chicago-stars-fc", "Chicago Stars FC"),
    ("15364", "gotham-fc", "Gotham FC"),
    ("17346", "houston-dash", "Houston Dash"),
    ("20907", "kansas-city-current", "Kansas City Current"),
    ("15366", "north-carolina-courage", "North Carolina Courage"),
    ("18206", "orlando-city-sc", "Orlando Pride"),
    ("15362", "portland-thorns-fc", "Portland Thorns FC"),
    ("20905", "racing-louisville-fc", "Racing Louisville FC"),
    ("21423", "san-diego-wave-fc", "San Diego Wave FC"),
    ("15363", "usa.reignfc", "Seattle Reign FC"),
    ("19141", "utah-royals-fc", "Utah Royals"),
    ("15365", "washington-spirit", "Washington Spirit"),
];

const USL_TEAMS: &[EspnRow] = &[
    ("19405", "birmingham-legion-fc", "Birmingham Legion FC"),
    ("131579", "brooklyn-fc", "Brooklyn FC"),
    ("9729", "charleston-battery", "Charleston Battery"),
    ("17830", "colorado-springs-switchbacks-fc", "Colorado Springs Switchbacks"),
    ("19179", "detroit-city-fc", "Detroit City FC"),
    ("19407", "el-paso-locomotive-fc", "El Paso Locomotive FC"),
    ("18446", "fc-tulsa", "FC Tulsa"),
    ("19411", "hartford-athletic", "Hartford Athletic"),
    ("17360", "indy-eleven", "Indy Eleven"),
    ("18987", "las-vegas-lights-fc", "Las Vegas Lights FC"),
    ("21822", "lexington-sc", "Lexington SC"),
    ("19410", "loudoun-united-fc", "Loudoun United FC"),
    ("17832", "louisville-city-fc", "Louisville City FC"),
    ("19409", "memphis-901-fc", "Memphis 901 FC"),
    ("18159", "miami-fc", "Miami FC"),
    ("21370", "monterey-bay-fc", "Monterey Bay FC"),
    ("19408", "new-mexico-united", "New Mexico United"),
    ("9725", "north-carolina-fc", "North Carolina FC"),
    ("20687", "oakland-roots-sc", "Oakland Roots SC"),
    ("18455", "orange-county-sc", "Orange County SC"),
    ("17850", "phoenix-rising-fc", "Phoenix Rising FC"),
    ("17827", "pittsburgh-riverhounds-sc", "Pittsburgh Riverhounds"),
    ("22164", "rhode-island-fc", "Rhode Island FC"),
    ("17828", "sacramento-republic-fc", "Sacramento Republic FC"),
    ("18265", "san-antonio-fc", "San Antonio FC"),
    ("17361", "tampa-bay-rowdies", "Tampa Bay Rowdies"),
];

const NCAA_FOOTBALL_TEAMS: &[EspnRow] = &[
    ("333", "alabama-crimson-tide", "Alabama"),
    ("8", "arkansas-razorbacks", "Arkansas"),
    ("2", "auburn-tigers", "Auburn"),
    ("57", "florida-gators", "Florida"),
    ("61", "georgia-bulldogs", "Georgia"),
    ("96", "kentucky-wildcats", "Kentucky"),
    ("99", "lsu-tigers", "LSU"),
    ("344", "mississippi-state-bulldogs", "Mississippi State"),
    ("142", "missouri-tigers", "Missouri"),
    ("201", "oklahoma-sooners", "Oklahoma"),
    ("145", "ole-miss-rebels", "Ole Miss"),
    ("2579", "south-carolina-gamecocks", "South Carolina"),
    ("2633", "tennessee-volunteers", "Tennessee"),
    ("251", "texas-longhorns", "Texas"),
    ("245", "texas-am-aggies", "Texas A&M"),
    ("238", "vanderbilt-commodores", "Vanderbilt"),
    ("130", "michigan-wolverines", "Michigan"),
    ("194", "ohio-state-buckeyes", "Ohio State"),
];

const NCAA_MEN_BASKETBALL_TEAMS: &[EspnRow] = &[
    ("333", "alabama-crimson-tide", "Alabama"),
    ("150", "duke-blue-devils", "Duke"),
    ("153", "north-carolina-tar-heels", "North Carolina"),
    ("2305", "kansas-jayhawks", "Kansas"),
];

const NCAA_WOMEN_BASKETBALL_TEAMS: &[EspnRow] = &[
    ("2579", "south-carolina-gamecocks", "South Carolina"),
    ("41", "uconn-huskies", "UConn"),
    ("2294", "iowa-hawkeyes", "Iowa"),
    ("99", "lsu-tigers", "LSU"),
    ("251", "texas-longhorns", "Texas"),
    ("26", "ucla-bruins", "UCLA"),
    ("87", "notre-dame-fighting-irish", "Notre Dame"),
    ("24", "stanford-cardinal", "Stanford"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_key_resolves() {
        let leagues = all_leagues();
        assert_eq!(leagues.len(), LEAGUE_KEYS.len());
        for l in &leagues {
            let discovered = matches!(l.source, SourceKind::BaseballCube { .. });
            assert_eq!(l.teams.is_empty(), discovered, "{}", l.key);
            assert!(
                l.table.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "{}",
                l.table
            );
        }
        assert!(league("NFL").is_some());
        assert!(league("milb-aaa").is_none());
        assert_eq!(league("milb-triplea").unwrap().table, "milb_rosters");
        assert_eq!(
            league("ncaa-women-basketball").unwrap().table,
            "ncaa_womens_basketball_rosters"
        );
    }

    #[test]
    fn team_ids_are_unique_within_a_league() {
        for l in all_leagues() {
            let ids: HashSet<&str> = l.teams.iter().map(|t| t.id.as_str()).collect();
            assert_eq!(ids.len(), l.teams.len(), "{}", l.key);
        }
    }

    #[test]
    fn filters_by_slug_or_espn_id() {
        let mls = league("mls").unwrap();
        let by_slug: Vec<_> = mls.select_teams(Some("inter-miami-cf")).collect();
        assert_eq!(by_slug.len(), 1);
        assert_eq!(by_slug[0].id, "20232");
        assert_eq!(mls.select_teams(None).count(), mls.teams.len());

        let nfl = league("nfl").unwrap();
        let cowboys = nfl.select_teams(Some("dallas-cowboys")).next().unwrap();
        assert_eq!(cowboys.statmuse_id, Some(75));
    }

    #[test]
    fn defunct_franchises_have_closed_windows() {
        let wnba = league("wnba-espn").unwrap();
        let comets = wnba.select_teams(Some("houston-comets")).next().unwrap();
        assert!(comets.active_in(2000));
        assert!(!comets.active_in(2012));
    }
}
