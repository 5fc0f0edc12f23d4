// Season records: one normalized line per player/year/stint.
//
// Records store counting stats only. Rate stats are computed on demand from
// the record's own fields, so a record can never carry a BA that disagrees
// with its H and AB.

use serde::Serialize;
use tracing::debug;

use crate::awards::{annotate, join_tags, AwardSources};
use crate::error::CoreError;
use crate::position::AppearanceIndex;
use crate::raw::{count, PlayerDirectory, PlayerIdentity, RawBattingRow, RawPitchingRow};
use crate::teams;

/// Which stat table a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatKind {
    Batting,
    Pitching,
}

impl StatKind {
    /// Section label drawn above the column headers.
    pub fn section_label(&self) -> &'static str {
        match self {
            StatKind::Batting => "Standard Batting",
            StatKind::Pitching => "Standard Pitching",
        }
    }
}

// ---------------------------------------------------------------------------
// Rate formulas
// ---------------------------------------------------------------------------

/// `num / den`, or 0 when the denominator is zero.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Total bases: `H + 2B + 2*3B + 3*HR`.
pub fn total_bases(h: u64, doubles: u64, triples: u64, hr: u64) -> u64 {
    h + doubles + 2 * triples + 3 * hr
}

/// Innings pitched from outs recorded.
pub fn innings(outs: u64) -> f64 {
    outs as f64 / 3.0
}

/// Earned runs per nine innings.
pub fn era(er: u64, outs: u64) -> f64 {
    ratio(er as f64 * 9.0, innings(outs))
}

/// Walks plus hits per inning pitched.
pub fn whip(h: u64, bb: u64, outs: u64) -> f64 {
    ratio((h + bb) as f64, innings(outs))
}

// ---------------------------------------------------------------------------
// Batting
// ---------------------------------------------------------------------------

/// One batting season line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattingSeason {
    pub year: i32,
    /// `None` when the birth year is unknown.
    pub age: Option<i32>,
    pub team: String,
    pub league: String,
    pub g: u32,
    pub ab: u32,
    pub r: u32,
    pub h: u32,
    pub doubles: u32,
    pub triples: u32,
    pub hr: u32,
    pub rbi: u32,
    pub sb: u32,
    pub cs: u32,
    pub bb: u32,
    pub so: u32,
    pub hbp: u32,
    pub sf: u32,
    pub position: String,
    pub awards: String,
}

impl BattingSeason {
    pub fn ba(&self) -> f64 {
        ratio(self.h as f64, self.ab as f64)
    }

    /// `(H + BB + HBP) / (AB + BB + HBP + SF)`.
    pub fn obp(&self) -> f64 {
        let (h, ab, bb, hbp, sf) = (
            self.h as f64,
            self.ab as f64,
            self.bb as f64,
            self.hbp as f64,
            self.sf as f64,
        );
        ratio(h + bb + hbp, ab + bb + hbp + sf)
    }

    pub fn total_bases(&self) -> u64 {
        total_bases(
            self.h.into(),
            self.doubles.into(),
            self.triples.into(),
            self.hr.into(),
        )
    }

    pub fn slg(&self) -> f64 {
        ratio(self.total_bases() as f64, self.ab as f64)
    }

    pub fn ops(&self) -> f64 {
        self.obp() + self.slg()
    }
}

// ---------------------------------------------------------------------------
// Pitching
// ---------------------------------------------------------------------------

/// One pitching season line. Innings are kept as outs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchingSeason {
    pub year: i32,
    pub age: Option<i32>,
    pub team: String,
    pub league: String,
    pub w: u32,
    pub l: u32,
    pub g: u32,
    pub gs: u32,
    pub cg: u32,
    pub sho: u32,
    pub sv: u32,
    pub outs: u32,
    pub h: u32,
    pub er: u32,
    pub hr: u32,
    pub bb: u32,
    pub so: u32,
    pub awards: String,
}

impl PitchingSeason {
    pub fn ip(&self) -> f64 {
        innings(self.outs.into())
    }

    pub fn era(&self) -> f64 {
        era(self.er.into(), self.outs.into())
    }

    pub fn whip(&self) -> f64 {
        whip(self.h.into(), self.bb.into(), self.outs.into())
    }
}

// ---------------------------------------------------------------------------
// Tagged season list
// ---------------------------------------------------------------------------

/// A player's seasons for one stat table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "seasons", rename_all = "lowercase")]
pub enum Seasons {
    Batting(Vec<BattingSeason>),
    Pitching(Vec<PitchingSeason>),
}

impl Seasons {
    pub fn kind(&self) -> StatKind {
        match self {
            Seasons::Batting(_) => StatKind::Batting,
            Seasons::Pitching(_) => StatKind::Pitching,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Seasons::Batting(s) => s.len(),
            Seasons::Pitching(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn years(&self) -> Vec<i32> {
        match self {
            Seasons::Batting(s) => s.iter().map(|s| s.year).collect(),
            Seasons::Pitching(s) => s.iter().map(|s| s.year).collect(),
        }
    }

    /// Drop lines with no playing time: batting seasons without an at-bat,
    /// pitching seasons without a recorded out.
    pub fn with_playing_time(self) -> Self {
        match self {
            Seasons::Batting(s) => Seasons::Batting(s.into_iter().filter(|s| s.ab > 0).collect()),
            Seasons::Pitching(s) => {
                Seasons::Pitching(s.into_iter().filter(|s| s.outs > 0).collect())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Optional lookup tables consulted while building seasons.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonSources<'a> {
    pub appearances: Option<&'a AppearanceIndex>,
    pub awards: AwardSources<'a>,
}

fn lookup<'a>(directory: &'a PlayerDirectory, player_id: &str) -> Result<&'a PlayerIdentity, CoreError> {
    directory.get(player_id).ok_or_else(|| CoreError::PlayerNotFound {
        player_id: player_id.to_string(),
    })
}

fn age(identity: &PlayerIdentity, year: i32) -> Option<i32> {
    identity.birth_year.map(|born| year - born)
}

/// Rows in year order; same-year stints keep their input order.
fn sorted_by_year<T, F>(rows: &[T], year: F) -> Vec<&T>
where
    F: Fn(&T) -> i32,
{
    let mut sorted: Vec<&T> = rows.iter().collect();
    sorted.sort_by_key(|r| year(*r));
    sorted
}

/// Build the batting lines for one player.
///
/// `rows` are that player's batting stints in any order. An empty slice
/// yields an empty list; an unknown player ID is an error.
pub fn build_batting(
    player_id: &str,
    rows: &[RawBattingRow],
    directory: &PlayerDirectory,
    sources: &SeasonSources<'_>,
) -> Result<(String, Vec<BattingSeason>), CoreError> {
    let identity = lookup(directory, player_id)?;

    let seasons: Vec<BattingSeason> = sorted_by_year(rows, |r| r.year)
        .into_iter()
        .map(|row| {
            let position = sources
                .appearances
                .map(|index| index.resolve(player_id, row.year, row.team.as_deref()))
                .unwrap_or_default();
            let awards = annotate(player_id, row.year, StatKind::Batting, &sources.awards);
            BattingSeason {
                year: row.year,
                age: age(identity, row.year),
                team: teams::display_code(row.team.as_deref()),
                league: teams::league_code(row.league.as_deref()),
                g: count(row.g),
                ab: count(row.ab),
                r: count(row.r),
                h: count(row.h),
                doubles: count(row.doubles),
                triples: count(row.triples),
                hr: count(row.hr),
                rbi: count(row.rbi),
                sb: count(row.sb),
                cs: count(row.cs),
                bb: count(row.bb),
                so: count(row.so),
                hbp: count(row.hbp),
                sf: count(row.sf),
                position,
                awards: join_tags(&awards),
            }
        })
        .collect();

    debug!("built {} batting seasons for {}", seasons.len(), player_id);
    Ok((identity.full_name(), seasons))
}

/// Build the pitching lines for one player.
pub fn build_pitching(
    player_id: &str,
    rows: &[RawPitchingRow],
    directory: &PlayerDirectory,
    sources: &SeasonSources<'_>,
) -> Result<(String, Vec<PitchingSeason>), CoreError> {
    let identity = lookup(directory, player_id)?;

    let seasons: Vec<PitchingSeason> = sorted_by_year(rows, |r| r.year)
        .into_iter()
        .map(|row| PitchingSeason {
            year: row.year,
            age: age(identity, row.year),
            team: teams::display_code(row.team.as_deref()),
            league: teams::league_code(row.league.as_deref()),
            w: count(row.w),
            l: count(row.l),
            g: count(row.g),
            gs: count(row.gs),
            cg: count(row.cg),
            sho: count(row.sho),
            sv: count(row.sv),
            outs: count(row.ip_outs),
            h: count(row.h),
            er: count(row.er),
            hr: count(row.hr),
            bb: count(row.bb),
            so: count(row.so),
            awards: join_tags(&annotate(
                player_id,
                row.year,
                StatKind::Pitching,
                &sources.awards,
            )),
        })
        .collect();

    debug!("built {} pitching seasons for {}", seasons.len(), player_id);
    Ok((identity.full_name(), seasons))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
