// Lahman database loading.
//
// People.csv is required; every other table is optional and contributes
// nothing when absent. Lookup structures (appearance index, award rank
// table, all-star and winner sets) are built once here and only read after.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use ballplayer_core::awards::{AllStarIndex, AwardRankTable, AwardSources, WinnerIndex};
use ballplayer_core::position::AppearanceIndex;
use ballplayer_core::raw::{
    AllStarRow, AppearanceRow, AwardVoteRow, AwardWinnerRow, PlayerDirectory, PlayerIdentity,
    RawBattingRow, RawPitchingRow,
};
use ballplayer_core::season::SeasonSources;

pub const PEOPLE_FILE: &str = "People.csv";
pub const BATTING_FILE: &str = "Batting.csv";
pub const PITCHING_FILE: &str = "Pitching.csv";
pub const APPEARANCES_FILE: &str = "Appearances.csv";
pub const ALLSTAR_FILE: &str = "AllstarFull.csv";
pub const AWARDS_FILE: &str = "AwardsPlayers.csv";
pub const AWARD_SHARES_FILE: &str = "AwardsSharePlayers.csv";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LahmanError {
    #[error("required table missing: {path}")]
    MissingRequired { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Loaded data
// ---------------------------------------------------------------------------

/// Everything the card pipeline reads, grouped per player where it matters.
#[derive(Debug, Default)]
pub struct LahmanData {
    pub directory: PlayerDirectory,
    pub batting: HashMap<String, Vec<RawBattingRow>>,
    pub pitching: HashMap<String, Vec<RawPitchingRow>>,
    pub appearances: Option<AppearanceIndex>,
    pub all_stars: Option<AllStarIndex>,
    pub vote_ranks: Option<AwardRankTable>,
    pub winners: Option<WinnerIndex>,
}

/// Raw tables as read from disk, before indexing.
#[derive(Debug, Default)]
pub struct LahmanTables {
    pub people: Vec<PlayerIdentity>,
    pub batting: Vec<RawBattingRow>,
    pub pitching: Vec<RawPitchingRow>,
    pub appearances: Option<Vec<AppearanceRow>>,
    pub all_stars: Option<Vec<AllStarRow>>,
    pub winners: Option<Vec<AwardWinnerRow>>,
    pub award_votes: Option<Vec<AwardVoteRow>>,
}

fn group_by_player<T>(rows: Vec<T>, player_id: impl Fn(&T) -> &str) -> HashMap<String, Vec<T>> {
    let mut grouped: HashMap<String, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(player_id(&row).to_string()).or_default().push(row);
    }
    grouped
}

impl LahmanData {
    /// Index raw tables.
    pub fn from_tables(tables: LahmanTables) -> Self {
        let directory = PlayerDirectory::from_rows(tables.people);
        let batting = group_by_player(tables.batting, |r| r.player_id.as_str());
        let pitching = group_by_player(tables.pitching, |r| r.player_id.as_str());
        let appearances = tables.appearances.map(AppearanceIndex::from_rows);
        let all_stars = tables.all_stars.map(AllStarIndex::from_rows);
        let winners = tables.winners.map(WinnerIndex::from_rows);
        let vote_ranks = tables.award_votes.map(|rows| AwardRankTable::build(&rows));

        LahmanData {
            directory,
            batting,
            pitching,
            appearances,
            all_stars,
            vote_ranks,
            winners,
        }
    }

    pub fn batting_rows(&self, player_id: &str) -> &[RawBattingRow] {
        self.batting.get(player_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn pitching_rows(&self, player_id: &str) -> &[RawPitchingRow] {
        self.pitching.get(player_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Lookup tables for the season builders. Absent tables stay `None`.
    pub fn sources(&self) -> SeasonSources<'_> {
        SeasonSources {
            appearances: self.appearances.as_ref(),
            awards: AwardSources {
                all_stars: self.all_stars.as_ref(),
                vote_ranks: self.vote_ranks.as_ref(),
                winners: self.winners.as_ref(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Internal reader-based loaders (testable without files)
// ---------------------------------------------------------------------------

fn load_rows_from_reader<T, R>(rdr: R, table: &str) -> Result<Vec<T>, csv::Error>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = csv::Reader::from_reader(rdr);
    // An unreadable header makes every row unusable.
    reader.headers()?;
    let mut rows = Vec::new();
    for result in reader.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!("skipping malformed {} row: {}", table, e);
            }
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load every row of one Lahman table.
pub fn load_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LahmanError> {
    let file = std::fs::File::open(path).map_err(|e| LahmanError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let table = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("table");
    load_rows_from_reader(file, table).map_err(|e| LahmanError::Csv {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a table that may be absent. A missing file logs a warning and
/// yields `None`.
fn load_optional<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Option<Vec<T>>, LahmanError> {
    let path = dir.join(file);
    if !path.is_file() {
        warn!("{} not found in {}; continuing without it", file, dir.display());
        return Ok(None);
    }
    let rows = load_table(&path)?;
    info!("loaded {} rows from {}", rows.len(), file);
    Ok(Some(rows))
}

/// Read the raw tables from a Lahman CSV folder.
pub fn load_tables(dir: &Path) -> Result<LahmanTables, LahmanError> {
    let people_path = dir.join(PEOPLE_FILE);
    if !people_path.is_file() {
        return Err(LahmanError::MissingRequired { path: people_path });
    }
    let people: Vec<PlayerIdentity> = load_table(&people_path)?;
    info!("loaded {} players from {}", people.len(), PEOPLE_FILE);

    Ok(LahmanTables {
        people,
        batting: load_optional(dir, BATTING_FILE)?.unwrap_or_default(),
        pitching: load_optional(dir, PITCHING_FILE)?.unwrap_or_default(),
        appearances: load_optional(dir, APPEARANCES_FILE)?,
        all_stars: load_optional(dir, ALLSTAR_FILE)?,
        winners: load_optional(dir, AWARDS_FILE)?,
        award_votes: load_optional(dir, AWARD_SHARES_FILE)?,
    })
}

/// Load and index a Lahman CSV folder.
pub fn load_all(dir: &Path) -> Result<LahmanData, LahmanError> {
    let data = LahmanData::from_tables(load_tables(dir)?);
    info!(
        "indexed {} players, {} batters, {} pitchers, {} award groups",
        data.directory.len(),
        data.batting.len(),
        data.pitching.len(),
        data.vote_ranks.as_ref().map_or(0, |r| r.group_count())
    );
    Ok(data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batting_rows_parse_with_blanks() {
        let csv = "\
playerID,yearID,stint,teamID,lgID,G,AB,R,H,2B,3B,HR,RBI,SB,CS,BB,SO,IBB,HBP,SH,SF,GIDP
aaronha01,1954,1,ML1,NL,122,468,58,131,27,6,13,69,2,2,28,39,,3,6,4,13
oldguy01,1871,1,BS1,,31,150,40,50,8,2,1,,6,,4,3,,,,,
";
        let rows: Vec<RawBattingRow> = load_rows_from_reader(csv.as_bytes(), "Batting.csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ab, Some(468));
        assert_eq!(rows[0].team.as_deref(), Some("ML1"));
        assert_eq!(rows[1].league, None);
        assert_eq!(rows[1].rbi, None);
        assert_eq!(rows[1].hbp, None);
    }

    #[test]
    fn malformed_rows_skipped() {
        let csv = "\
playerID,yearID,teamID,lgID,W,L,IPouts
good01,1990,BOS,AL,10,5,600
bad01,nineteen,BOS,AL,1,1,3
";
        let rows: Vec<RawPitchingRow> = load_rows_from_reader(csv.as_bytes(), "Pitching.csv").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player_id, "good01");
        assert_eq!(rows[0].ip_outs, Some(600));
    }

    #[test]
    fn unreadable_header_is_an_error() {
        let mut csv = b"playerID,year".to_vec();
        csv.extend_from_slice(&[0xFF, 0xFE]);
        csv.extend_from_slice(b"ID\ngood01,1990\n");
        let result: Result<Vec<AllStarRow>, _> = load_rows_from_reader(csv.as_slice(), "AllstarFull.csv");
        assert!(result.is_err());

        let tmp = std::env::temp_dir().join("ballplayer_lahman_bad_header");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join("AllstarFull.csv");
        std::fs::write(&path, &csv).unwrap();
        assert!(matches!(
            load_table::<AllStarRow>(&path),
            Err(LahmanError::Csv { .. })
        ));
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn empty_table_is_empty_vec() {
        let csv = "playerID,yearID\n";
        let rows: Vec<AllStarRow> = load_rows_from_reader(csv.as_bytes(), "AllstarFull.csv").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn rows_grouped_per_player() {
        let tables = LahmanTables {
            people: vec![PlayerIdentity {
                id: "p1".into(),
                first_name: "Pat".into(),
                last_name: "One".into(),
                birth_year: Some(1980),
            }],
            batting: vec![
                RawBattingRow {
                    player_id: "p1".into(),
                    year: 2001,
                    ..Default::default()
                },
                RawBattingRow {
                    player_id: "p2".into(),
                    year: 2001,
                    ..Default::default()
                },
                RawBattingRow {
                    player_id: "p1".into(),
                    year: 2002,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let data = LahmanData::from_tables(tables);
        assert_eq!(data.batting_rows("p1").len(), 2);
        assert_eq!(data.batting_rows("p2").len(), 1);
        assert!(data.pitching_rows("p1").is_empty());
        let sources = data.sources();
        assert!(sources.appearances.is_none());
        assert!(sources.awards.all_stars.is_none());
    }

    #[test]
    fn missing_people_is_an_error() {
        let tmp = std::env::temp_dir().join("ballplayer_lahman_no_people");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();
        match load_all(&tmp) {
            Err(LahmanError::MissingRequired { path }) => assert!(path.ends_with(PEOPLE_FILE)),
            other => panic!("expected MissingRequired, got {other:?}"),
        }
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn optional_tables_may_be_absent() {
        let tmp = std::env::temp_dir().join("ballplayer_lahman_people_only");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();
        std::fs::write(
            tmp.join(PEOPLE_FILE),
            "playerID,birthYear,nameFirst,nameLast\nsolo01,1950,Solo,Player\n",
        )
        .unwrap();
        let data = load_all(&tmp).unwrap();
        assert_eq!(data.directory.len(), 1);
        assert!(data.batting.is_empty());
        assert!(data.appearances.is_none());
        assert!(data.vote_ranks.is_none());
        assert!(data.winners.is_none());
        let _ = std::fs::remove_dir_all(&tmp);
    }
}
