// Award tags for a season: all-star selections, vote-share finishes, and
// winners-only awards.
//
// Vote finishes come from an `AwardRankTable` built once from the full vote
// table. The table is an immutable value handed to `annotate` by reference.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::raw::{AllStarRow, AwardVoteRow, AwardWinnerRow};
use crate::season::StatKind;

/// Rank assigned to vote rows that carry no points.
pub const UNRANKED: u32 = 99;

// ---------------------------------------------------------------------------
// Award families
// ---------------------------------------------------------------------------

/// Award families recognized from free-form Lahman award IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardFamily {
    MostValuable,
    CyYoung,
    RookieOfYear,
    GoldGlove,
    SilverSlugger,
}

impl AwardFamily {
    /// Classify an award ID. MVP matching takes precedence over the others.
    pub fn classify(award_id: &str) -> Option<Self> {
        if award_id.contains("Valuable") || award_id.contains("MVP") {
            Some(AwardFamily::MostValuable)
        } else if award_id.contains("Cy Young") {
            Some(AwardFamily::CyYoung)
        } else if award_id.contains("Rookie") {
            Some(AwardFamily::RookieOfYear)
        } else if award_id.contains("Gold Glove") {
            Some(AwardFamily::GoldGlove)
        } else if award_id.contains("Silver Slugger") {
            Some(AwardFamily::SilverSlugger)
        } else {
            None
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            AwardFamily::MostValuable => "MVP",
            AwardFamily::CyYoung => "CY",
            AwardFamily::RookieOfYear => "ROY",
            AwardFamily::GoldGlove => "GG",
            AwardFamily::SilverSlugger => "SS",
        }
    }

    /// `MVP` for a win, `MVP-4` for a fourth-place finish.
    pub fn ranked_tag(&self, rank: u32) -> String {
        if rank == 1 {
            self.tag().to_string()
        } else {
            format!("{}-{}", self.tag(), rank)
        }
    }
}

// ---------------------------------------------------------------------------
// Rank table
// ---------------------------------------------------------------------------

/// Grouping key for vote rankings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AwardGroupKey {
    pub award_id: String,
    pub year: i32,
    pub league: String,
}

impl AwardGroupKey {
    /// Rows without a league belong to no group and stay unranked.
    fn of(row: &AwardVoteRow) -> Option<Self> {
        let league = row.league.as_deref().filter(|l| !l.is_empty())?;
        Some(AwardGroupKey {
            award_id: row.award_id.clone(),
            year: row.year,
            league: league.to_string(),
        })
    }
}

/// One player's finish within an award/year/league group.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub player_id: String,
    pub points_won: Option<f64>,
    pub rank: u32,
}

/// A finish looked up by player and year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerFinish {
    pub award_id: String,
    pub rank: u32,
}

/// Vote-share rankings grouped by award, year and league.
///
/// Competition ranking: equal points share a rank and the next distinct
/// value resumes at `1 + entries with strictly more points` (1, 1, 3).
#[derive(Debug, Clone, Default)]
pub struct AwardRankTable {
    groups: BTreeMap<AwardGroupKey, Vec<RankedEntry>>,
    by_player_year: HashMap<(String, i32), Vec<PlayerFinish>>,
}

impl AwardRankTable {
    /// Rank every group in the vote table.
    pub fn build(rows: &[AwardVoteRow]) -> Self {
        let mut grouped: BTreeMap<AwardGroupKey, Vec<&AwardVoteRow>> = BTreeMap::new();
        for row in rows {
            if let Some(key) = AwardGroupKey::of(row) {
                grouped.entry(key).or_default().push(row);
            }
        }

        let mut groups = BTreeMap::new();
        let mut ranks: HashMap<(AwardGroupKey, String), u32> = HashMap::new();
        for (key, members) in grouped {
            let entries = rank_group(&members);
            for entry in &entries {
                ranks
                    .entry((key.clone(), entry.player_id.clone()))
                    .or_insert(entry.rank);
            }
            groups.insert(key, entries);
        }

        // Player lookups keep the vote table's row order.
        let mut by_player_year: HashMap<(String, i32), Vec<PlayerFinish>> = HashMap::new();
        for row in rows {
            let rank = AwardGroupKey::of(row)
                .and_then(|key| ranks.get(&(key, row.player_id.clone())).copied())
                .unwrap_or(UNRANKED);
            by_player_year
                .entry((row.player_id.clone(), row.year))
                .or_default()
                .push(PlayerFinish {
                    award_id: row.award_id.clone(),
                    rank,
                });
        }

        debug!("ranked {} award/year/league vote groups", groups.len());
        AwardRankTable {
            groups,
            by_player_year,
        }
    }

    /// Full ranking for one award/year/league, best finish first.
    pub fn ranking(&self, award_id: &str, year: i32, league: &str) -> Option<&[RankedEntry]> {
        let key = AwardGroupKey {
            award_id: award_id.to_string(),
            year,
            league: league.to_string(),
        };
        self.groups.get(&key).map(Vec::as_slice)
    }

    /// Every finish a player recorded in a year, in vote-table order.
    pub fn finishes(&self, player_id: &str, year: i32) -> &[PlayerFinish] {
        self.by_player_year
            .get(&(player_id.to_string(), year))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

fn rank_group(members: &[&AwardVoteRow]) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = members
        .iter()
        .map(|row| {
            let rank = match row.points_won {
                Some(points) => {
                    1 + members
                        .iter()
                        .filter(|other| other.points_won.is_some_and(|p| p > points))
                        .count() as u32
                }
                None => UNRANKED,
            };
            RankedEntry {
                player_id: row.player_id.clone(),
                points_won: row.points_won,
                rank,
            }
        })
        .collect();
    entries.sort_by_key(|e| e.rank);
    entries
}

// ---------------------------------------------------------------------------
// Source indexes
// ---------------------------------------------------------------------------

/// Player/year pairs with at least one all-star appearance.
#[derive(Debug, Clone, Default)]
pub struct AllStarIndex {
    selections: HashSet<(String, i32)>,
}

impl AllStarIndex {
    pub fn from_rows(rows: impl IntoIterator<Item = AllStarRow>) -> Self {
        AllStarIndex {
            selections: rows.into_iter().map(|r| (r.player_id, r.year)).collect(),
        }
    }

    pub fn contains(&self, player_id: &str, year: i32) -> bool {
        self.selections.contains(&(player_id.to_string(), year))
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

/// Winners-only award IDs per player/year.
#[derive(Debug, Clone, Default)]
pub struct WinnerIndex {
    awards: HashMap<(String, i32), Vec<String>>,
}

impl WinnerIndex {
    pub fn from_rows(rows: impl IntoIterator<Item = AwardWinnerRow>) -> Self {
        let mut awards: HashMap<(String, i32), Vec<String>> = HashMap::new();
        for row in rows {
            awards
                .entry((row.player_id, row.year))
                .or_default()
                .push(row.award_id);
        }
        WinnerIndex { awards }
    }

    pub fn awards(&self, player_id: &str, year: i32) -> &[String] {
        self.awards
            .get(&(player_id.to_string(), year))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.awards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.awards.is_empty()
    }
}

/// The three independent award sources. Any of them may be absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwardSources<'a> {
    pub all_stars: Option<&'a AllStarIndex>,
    pub vote_ranks: Option<&'a AwardRankTable>,
    pub winners: Option<&'a WinnerIndex>,
}

// ---------------------------------------------------------------------------
// Annotation
// ---------------------------------------------------------------------------

/// Award tags for one player-season, sorted and de-duplicated.
pub fn annotate(player_id: &str, year: i32, kind: StatKind, sources: &AwardSources<'_>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    if sources
        .all_stars
        .is_some_and(|index| index.contains(player_id, year))
    {
        tags.push("AS".to_string());
    }

    let mut mvp_rank = None;
    let mut cy_rank = None;
    if let Some(table) = sources.vote_ranks {
        for finish in table.finishes(player_id, year) {
            match AwardFamily::classify(&finish.award_id) {
                Some(AwardFamily::RookieOfYear) => {
                    tags.push(AwardFamily::RookieOfYear.ranked_tag(finish.rank));
                }
                Some(AwardFamily::MostValuable) => mvp_rank = Some(finish.rank),
                Some(AwardFamily::CyYoung) => cy_rank = Some(finish.rank),
                _ => {}
            }
        }
    }
    if let Some(rank) = mvp_rank {
        tags.push(AwardFamily::MostValuable.ranked_tag(rank));
    }
    if let Some(rank) = cy_rank {
        tags.push(AwardFamily::CyYoung.ranked_tag(rank));
    }

    if let Some(winners) = sources.winners {
        for award_id in winners.awards(player_id, year) {
            match AwardFamily::classify(award_id) {
                Some(AwardFamily::GoldGlove) => tags.push("GG".to_string()),
                Some(AwardFamily::SilverSlugger) if kind == StatKind::Batting => {
                    tags.push("SS".to_string());
                }
                Some(AwardFamily::RookieOfYear) if !has_family(&tags, "ROY") => {
                    tags.push("ROY".to_string());
                }
                _ => {}
            }
        }
    }

    let unique: BTreeSet<String> = tags.into_iter().collect();
    unique.into_iter().collect()
}

/// Comma-joined form stored on a season record.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}

fn has_family(tags: &[String], family: &str) -> bool {
    tags.iter()
        .any(|t| t.split('-').next() == Some(family))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
