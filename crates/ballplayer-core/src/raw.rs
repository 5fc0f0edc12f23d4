// Raw source rows as they arrive from the Lahman tables.
//
// Every counting stat is optional: historical data is sparse, and a blank or
// garbled cell must read as zero rather than poison the arithmetic. Column
// names follow the Lahman CSV headers so the loader can deserialize directly.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Who a player is. Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    #[serde(rename = "playerID")]
    pub id: String,
    #[serde(rename = "nameFirst", default)]
    pub first_name: String,
    #[serde(rename = "nameLast", default)]
    pub last_name: String,
    #[serde(rename = "birthYear", default, deserialize_with = "lenient_year")]
    pub birth_year: Option<i32>,
}

impl PlayerIdentity {
    /// "First Last", the name shown when a card is revealed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Player identities keyed by player ID.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    by_id: HashMap<String, PlayerIdentity>,
}

impl PlayerDirectory {
    /// Build the directory. The first row for a duplicated ID wins.
    pub fn from_rows(rows: impl IntoIterator<Item = PlayerIdentity>) -> Self {
        let mut by_id = HashMap::new();
        for row in rows {
            by_id.entry(row.id.clone()).or_insert(row);
        }
        PlayerDirectory { by_id }
    }

    pub fn get(&self, player_id: &str) -> Option<&PlayerIdentity> {
        self.by_id.get(player_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Season rows
// ---------------------------------------------------------------------------

/// One batting stint: player, year, team, league.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawBattingRow {
    #[serde(rename = "playerID")]
    pub player_id: String,
    #[serde(rename = "yearID")]
    pub year: i32,
    #[serde(rename = "teamID", default)]
    pub team: Option<String>,
    #[serde(rename = "lgID", default)]
    pub league: Option<String>,
    #[serde(rename = "G", default, deserialize_with = "lenient_count")]
    pub g: Option<u32>,
    #[serde(rename = "AB", default, deserialize_with = "lenient_count")]
    pub ab: Option<u32>,
    #[serde(rename = "R", default, deserialize_with = "lenient_count")]
    pub r: Option<u32>,
    #[serde(rename = "H", default, deserialize_with = "lenient_count")]
    pub h: Option<u32>,
    #[serde(rename = "2B", default, deserialize_with = "lenient_count")]
    pub doubles: Option<u32>,
    #[serde(rename = "3B", default, deserialize_with = "lenient_count")]
    pub triples: Option<u32>,
    #[serde(rename = "HR", default, deserialize_with = "lenient_count")]
    pub hr: Option<u32>,
    #[serde(rename = "RBI", default, deserialize_with = "lenient_count")]
    pub rbi: Option<u32>,
    #[serde(rename = "SB", default, deserialize_with = "lenient_count")]
    pub sb: Option<u32>,
    #[serde(rename = "CS", default, deserialize_with = "lenient_count")]
    pub cs: Option<u32>,
    #[serde(rename = "BB", default, deserialize_with = "lenient_count")]
    pub bb: Option<u32>,
    #[serde(rename = "SO", default, deserialize_with = "lenient_count")]
    pub so: Option<u32>,
    #[serde(rename = "HBP", default, deserialize_with = "lenient_count")]
    pub hbp: Option<u32>,
    #[serde(rename = "SF", default, deserialize_with = "lenient_count")]
    pub sf: Option<u32>,
}

/// One pitching stint. Innings arrive as outs recorded (`IPouts`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPitchingRow {
    #[serde(rename = "playerID")]
    pub player_id: String,
    #[serde(rename = "yearID")]
    pub year: i32,
    #[serde(rename = "teamID", default)]
    pub team: Option<String>,
    #[serde(rename = "lgID", default)]
    pub league: Option<String>,
    #[serde(rename = "W", default, deserialize_with = "lenient_count")]
    pub w: Option<u32>,
    #[serde(rename = "L", default, deserialize_with = "lenient_count")]
    pub l: Option<u32>,
    #[serde(rename = "G", default, deserialize_with = "lenient_count")]
    pub g: Option<u32>,
    #[serde(rename = "GS", default, deserialize_with = "lenient_count")]
    pub gs: Option<u32>,
    #[serde(rename = "CG", default, deserialize_with = "lenient_count")]
    pub cg: Option<u32>,
    #[serde(rename = "SHO", default, deserialize_with = "lenient_count")]
    pub sho: Option<u32>,
    #[serde(rename = "SV", default, deserialize_with = "lenient_count")]
    pub sv: Option<u32>,
    #[serde(rename = "IPouts", default, deserialize_with = "lenient_count")]
    pub ip_outs: Option<u32>,
    #[serde(rename = "H", default, deserialize_with = "lenient_count")]
    pub h: Option<u32>,
    #[serde(rename = "ER", default, deserialize_with = "lenient_count")]
    pub er: Option<u32>,
    #[serde(rename = "HR", default, deserialize_with = "lenient_count")]
    pub hr: Option<u32>,
    #[serde(rename = "BB", default, deserialize_with = "lenient_count")]
    pub bb: Option<u32>,
    #[serde(rename = "SO", default, deserialize_with = "lenient_count")]
    pub so: Option<u32>,
}

// ---------------------------------------------------------------------------
// Optional side tables
// ---------------------------------------------------------------------------

/// Games played per fielding position for one player/year/team.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppearanceRow {
    #[serde(rename = "playerID")]
    pub player_id: String,
    #[serde(rename = "yearID")]
    pub year: i32,
    #[serde(rename = "teamID", default)]
    pub team: Option<String>,
    #[serde(rename = "G_c", default, deserialize_with = "lenient_count")]
    pub g_c: Option<u32>,
    #[serde(rename = "G_1b", default, deserialize_with = "lenient_count")]
    pub g_1b: Option<u32>,
    #[serde(rename = "G_2b", default, deserialize_with = "lenient_count")]
    pub g_2b: Option<u32>,
    #[serde(rename = "G_3b", default, deserialize_with = "lenient_count")]
    pub g_3b: Option<u32>,
    #[serde(rename = "G_ss", default, deserialize_with = "lenient_count")]
    pub g_ss: Option<u32>,
    #[serde(rename = "G_lf", default, deserialize_with = "lenient_count")]
    pub g_lf: Option<u32>,
    #[serde(rename = "G_cf", default, deserialize_with = "lenient_count")]
    pub g_cf: Option<u32>,
    #[serde(rename = "G_rf", default, deserialize_with = "lenient_count")]
    pub g_rf: Option<u32>,
    #[serde(rename = "G_dh", default, deserialize_with = "lenient_count")]
    pub g_dh: Option<u32>,
    #[serde(rename = "G_p", default, deserialize_with = "lenient_count")]
    pub g_p: Option<u32>,
    #[serde(rename = "G_of", default, deserialize_with = "lenient_count")]
    pub g_of: Option<u32>,
}

/// An all-star game appearance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AllStarRow {
    #[serde(rename = "playerID")]
    pub player_id: String,
    #[serde(rename = "yearID")]
    pub year: i32,
}

/// A winners-only award (Gold Glove, Silver Slugger, ...). No vote data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AwardWinnerRow {
    #[serde(rename = "playerID")]
    pub player_id: String,
    #[serde(rename = "awardID")]
    pub award_id: String,
    #[serde(rename = "yearID")]
    pub year: i32,
}

/// Vote points one player received for one award in one year and league.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AwardVoteRow {
    #[serde(rename = "awardID")]
    pub award_id: String,
    #[serde(rename = "yearID")]
    pub year: i32,
    #[serde(rename = "lgID", default)]
    pub league: Option<String>,
    #[serde(rename = "playerID")]
    pub player_id: String,
    #[serde(rename = "pointsWon", default, deserialize_with = "lenient_points")]
    pub points_won: Option<f64>,
}

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

/// Missing counting stats read as zero.
#[inline]
pub fn count(field: Option<u32>) -> u32 {
    field.unwrap_or(0)
}

/// Parse a counting-stat cell. Integers parse directly; floats such as
/// `"12.0"` (pandas exports) truncate; anything else is `None`.
pub fn parse_count(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(n) = text.parse::<u32>() {
        return Some(n);
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v <= u32::MAX as f64 => Some(v.trunc() as u32),
        _ => None,
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let cell: Option<String> = Option::deserialize(deserializer)?;
    Ok(cell.as_deref().and_then(parse_count))
}

fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let cell: Option<String> = Option::deserialize(deserializer)?;
    Ok(cell.as_deref().and_then(|text| {
        let text = text.trim();
        text.parse::<i32>().ok().or_else(|| {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.trunc() as i32)
        })
    }))
}

fn lenient_points<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let cell: Option<String> = Option::deserialize(deserializer)?;
    Ok(cell
        .as_deref()
        .and_then(|text| text.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn read_rows<T: for<'de> Deserialize<'de>>(data: &str) -> Vec<T> {
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        reader
            .deserialize::<T>()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn parse_count_accepts_integers_and_float_exports() {
        assert_eq!(parse_count("42"), Some(42));
        assert_eq!(parse_count(" 7 "), Some(7));
        assert_eq!(parse_count("12.0"), Some(12));
        assert_eq!(parse_count("3.9"), Some(3));
    }

    #[test]
    fn parse_count_rejects_garbage() {
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("NA"), None);
        assert_eq!(parse_count("-4"), None);
        assert_eq!(parse_count("nan"), None);
    }

    #[test]
    fn batting_row_with_blank_and_missing_columns() {
        // No HBP/SF columns at all, and blank CS/SO cells.
        let data = "\
playerID,yearID,stint,teamID,lgID,G,AB,R,H,2B,3B,HR,RBI,SB,CS,BB,SO
ruthba01,1927,1,NYA,AL,151,540,158,192,29,8,60,165,7,,137,";
        let rows: Vec<RawBattingRow> = read_rows(data);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.player_id, "ruthba01");
        assert_eq!(row.year, 1927);
        assert_eq!(row.team.as_deref(), Some("NYA"));
        assert_eq!(row.hr, Some(60));
        assert_eq!(row.doubles, Some(29));
        assert_eq!(row.cs, None);
        assert_eq!(row.so, None);
        assert_eq!(row.hbp, None);
        assert_eq!(count(row.sf), 0);
    }

    #[test]
    fn pitching_row_reads_outs() {
        let data = "\
playerID,yearID,stint,teamID,lgID,W,L,G,GS,CG,SHO,SV,IPouts,H,ER,HR,BB,SO
koufasa01,1965,1,LAN,NL,26,8,43,41,27,8,2,1008,216,76,26,71,382";
        let rows: Vec<RawPitchingRow> = read_rows(data);
        assert_eq!(rows[0].ip_outs, Some(1008));
        assert_eq!(rows[0].so, Some(382));
    }

    #[test]
    fn identity_with_blank_birth_year() {
        let data = "\
playerID,birthYear,nameFirst,nameLast
ansonca01,,Cap,Anson
aaronha01,1934.0,Hank,Aaron";
        let rows: Vec<PlayerIdentity> = read_rows(data);
        assert_eq!(rows[0].birth_year, None);
        assert_eq!(rows[1].birth_year, Some(1934));
        assert_eq!(rows[1].full_name(), "Hank Aaron");
    }

    #[test]
    fn vote_row_with_blank_points() {
        let data = "\
awardID,yearID,lgID,playerID,pointsWon,pointsMax,votesFirst
MVP,1962,NL,willsma01,209,280,8
MVP,1962,NL,someone01,,280,0";
        let rows: Vec<AwardVoteRow> = read_rows(data);
        assert_eq!(rows[0].points_won, Some(209.0));
        assert_eq!(rows[1].points_won, None);
    }

    #[test]
    fn directory_keeps_first_duplicate() {
        let dir = PlayerDirectory::from_rows(vec![
            PlayerIdentity {
                id: "x".into(),
                first_name: "First".into(),
                last_name: "Row".into(),
                birth_year: None,
            },
            PlayerIdentity {
                id: "x".into(),
                first_name: "Second".into(),
                last_name: "Row".into(),
                birth_year: None,
            },
        ]);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.get("x").unwrap().first_name, "First");
        assert!(dir.get("y").is_none());
    }
}
