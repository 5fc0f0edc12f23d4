// Position string derivation from per-position appearance counts.
//
// Produces Baseball-Reference style tokens: `*8/DH`, `*6`, `*3/2/OF`. The
// primary position carries a `*`; secondary positions follow by games played.

use std::collections::HashMap;
use std::fmt;

use crate::raw::{count, AppearanceRow};

/// Secondary positions need at least this many games to be listed.
pub const MIN_SECONDARY_GAMES: u32 = 3;

/// At most this many positions appear in one token.
pub const MAX_POSITIONS: usize = 4;

/// Fielding positions in their fixed precedence order. Ties in games played
/// resolve to whichever position comes first in [`FieldPosition::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPosition {
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    LeftField,
    CenterField,
    RightField,
    DesignatedHitter,
    Pitcher,
    /// Lahman's "outfield, unspecified" bucket.
    Outfield,
}

impl FieldPosition {
    pub const ALL: [FieldPosition; 11] = [
        FieldPosition::Catcher,
        FieldPosition::FirstBase,
        FieldPosition::SecondBase,
        FieldPosition::ThirdBase,
        FieldPosition::ShortStop,
        FieldPosition::LeftField,
        FieldPosition::CenterField,
        FieldPosition::RightField,
        FieldPosition::DesignatedHitter,
        FieldPosition::Pitcher,
        FieldPosition::Outfield,
    ];

    /// Scorebook display: the position number, or a two-letter code for the
    /// positions that have none.
    pub fn display_str(&self) -> &'static str {
        match self {
            FieldPosition::Pitcher => "1",
            FieldPosition::Catcher => "2",
            FieldPosition::FirstBase => "3",
            FieldPosition::SecondBase => "4",
            FieldPosition::ThirdBase => "5",
            FieldPosition::ShortStop => "6",
            FieldPosition::LeftField => "7",
            FieldPosition::CenterField => "8",
            FieldPosition::RightField => "9",
            FieldPosition::DesignatedHitter => "DH",
            FieldPosition::Outfield => "OF",
        }
    }

    pub fn is_specific_outfield(&self) -> bool {
        matches!(
            self,
            FieldPosition::LeftField | FieldPosition::CenterField | FieldPosition::RightField
        )
    }

    fn index(&self) -> usize {
        FieldPosition::ALL
            .iter()
            .position(|p| p == self)
            .unwrap_or(FieldPosition::ALL.len() - 1)
    }
}

impl fmt::Display for FieldPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Appearance counts
// ---------------------------------------------------------------------------

/// Games played at each position, summed over one or more appearance rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppearanceCounts {
    games: [u32; 11],
}

impl AppearanceCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, pos: FieldPosition, games: u32) -> Self {
        self.add(pos, games);
        self
    }

    pub fn add(&mut self, pos: FieldPosition, games: u32) {
        let slot = &mut self.games[pos.index()];
        *slot = slot.saturating_add(games);
    }

    pub fn games(&self, pos: FieldPosition) -> u32 {
        self.games[pos.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.games.iter().all(|&g| g == 0)
    }

    /// Accumulate one Appearances row. Blank cells count as zero.
    pub fn add_row(&mut self, row: &AppearanceRow) {
        let cells = [
            (FieldPosition::Catcher, row.g_c),
            (FieldPosition::FirstBase, row.g_1b),
            (FieldPosition::SecondBase, row.g_2b),
            (FieldPosition::ThirdBase, row.g_3b),
            (FieldPosition::ShortStop, row.g_ss),
            (FieldPosition::LeftField, row.g_lf),
            (FieldPosition::CenterField, row.g_cf),
            (FieldPosition::RightField, row.g_rf),
            (FieldPosition::DesignatedHitter, row.g_dh),
            (FieldPosition::Pitcher, row.g_p),
            (FieldPosition::Outfield, row.g_of),
        ];
        for (pos, games) in cells {
            self.add(pos, count(games));
        }
    }

    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a AppearanceRow>) -> Self {
        let mut counts = Self::new();
        for row in rows {
            counts.add_row(row);
        }
        counts
    }
}

/// Render the position token for one set of appearance counts.
///
/// Returns an empty string when no position has any games.
pub fn position_string(counts: &AppearanceCounts) -> String {
    let has_specific_of = FieldPosition::ALL
        .iter()
        .any(|p| p.is_specific_outfield() && counts.games(*p) > 0);

    let mut played: Vec<(FieldPosition, u32)> = FieldPosition::ALL
        .iter()
        .map(|&p| (p, counts.games(p)))
        .filter(|&(p, g)| g > 0 && !(p == FieldPosition::Outfield && has_specific_of))
        .collect();

    // Stable sort: equal counts keep table order.
    played.sort_by(|a, b| b.1.cmp(&a.1));

    let mut parts: Vec<FieldPosition> = Vec::new();
    for (pos, games) in played {
        if !parts.is_empty() && games < MIN_SECONDARY_GAMES {
            continue;
        }
        if parts.len() >= MAX_POSITIONS {
            break;
        }
        parts.push(pos);
    }

    let Some((primary, rest)) = parts.split_first() else {
        return String::new();
    };
    let mut token = format!("*{primary}");
    for pos in rest {
        token.push('/');
        token.push_str(pos.display_str());
    }
    token
}

// ---------------------------------------------------------------------------
// Appearance index
// ---------------------------------------------------------------------------

/// Appearance rows grouped by player and year, built once per data load.
#[derive(Debug, Clone, Default)]
pub struct AppearanceIndex {
    by_player_year: HashMap<(String, i32), Vec<AppearanceRow>>,
}

impl AppearanceIndex {
    pub fn from_rows(rows: impl IntoIterator<Item = AppearanceRow>) -> Self {
        let mut by_player_year: HashMap<(String, i32), Vec<AppearanceRow>> = HashMap::new();
        for row in rows {
            by_player_year
                .entry((row.player_id.clone(), row.year))
                .or_default()
                .push(row);
        }
        AppearanceIndex { by_player_year }
    }

    /// Counts for a player/year, scoped to one team when that team has rows.
    /// Falls back to every team the player appeared for that year.
    pub fn counts(&self, player_id: &str, year: i32, team: Option<&str>) -> Option<AppearanceCounts> {
        let rows = self.by_player_year.get(&(player_id.to_string(), year))?;
        let scoped: Vec<&AppearanceRow> = match team {
            Some(team) => rows
                .iter()
                .filter(|r| r.team.as_deref() == Some(team))
                .collect(),
            None => Vec::new(),
        };
        let counts = if scoped.is_empty() {
            AppearanceCounts::from_rows(rows)
        } else {
            AppearanceCounts::from_rows(scoped)
        };
        Some(counts)
    }

    /// Position token for a player/year/team; empty when nothing is known.
    pub fn resolve(&self, player_id: &str, year: i32, team: Option<&str>) -> String {
        self.counts(player_id, year, team)
            .map(|c| position_string(&c))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_player_year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_player_year.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use FieldPosition::*;

    #[test]
    fn single_position() {
        let counts = AppearanceCounts::new().with(ShortStop, 150);
        assert_eq!(position_string(&counts), "*6");
    }

    #[test]
    fn generic_outfield_kept_without_specific_outfield() {
        let counts = AppearanceCounts::new()
            .with(Catcher, 10)
            .with(FirstBase, 90)
            .with(Outfield, 5);
        assert_eq!(position_string(&counts), "*3/2/OF");
    }

    #[test]
    fn generic_outfield_dropped_when_specific_present() {
        let counts = AppearanceCounts::new()
            .with(CenterField, 140)
            .with(Outfield, 145)
            .with(DesignatedHitter, 12);
        assert_eq!(position_string(&counts), "*8/DH");
    }

    #[test]
    fn secondary_threshold_skips_small_counts() {
        let counts = AppearanceCounts::new()
            .with(RightField, 120)
            .with(FirstBase, 2)
            .with(LeftField, 3);
        assert_eq!(position_string(&counts), "*9/7");
    }

    #[test]
    fn primary_has_no_threshold() {
        let counts = AppearanceCounts::new().with(Pitcher, 1);
        assert_eq!(position_string(&counts), "*1");
    }

    #[test]
    fn capped_at_four_positions() {
        let counts = AppearanceCounts::new()
            .with(SecondBase, 50)
            .with(ThirdBase, 40)
            .with(ShortStop, 30)
            .with(LeftField, 20)
            .with(RightField, 10);
        assert_eq!(position_string(&counts), "*4/5/6/7");
    }

    #[test]
    fn ties_follow_table_order() {
        // Pitcher precedes generic OF, DH precedes pitcher, catcher first.
        let counts = AppearanceCounts::new()
            .with(Outfield, 20)
            .with(Pitcher, 20)
            .with(DesignatedHitter, 20)
            .with(Catcher, 20);
        assert_eq!(position_string(&counts), "*2/DH/1/OF");
    }

    #[test]
    fn empty_counts_yield_empty_string() {
        assert_eq!(position_string(&AppearanceCounts::new()), "");
    }

    #[test]
    fn resolution_is_idempotent() {
        let counts = AppearanceCounts::new()
            .with(ThirdBase, 80)
            .with(FirstBase, 80)
            .with(DesignatedHitter, 4);
        let first = position_string(&counts);
        assert_eq!(first, position_string(&counts));
        assert_eq!(first, "*3/5/DH");
    }

    fn appearance(player: &str, year: i32, team: &str) -> AppearanceRow {
        AppearanceRow {
            player_id: player.into(),
            year,
            team: Some(team.into()),
            ..Default::default()
        }
    }

    #[test]
    fn index_scopes_by_team_then_falls_back() {
        let index = AppearanceIndex::from_rows(vec![
            AppearanceRow {
                g_ss: Some(100),
                ..appearance("p1", 2001, "NYA")
            },
            AppearanceRow {
                g_2b: Some(50),
                ..appearance("p1", 2001, "BOS")
            },
        ]);
        assert_eq!(index.resolve("p1", 2001, Some("BOS")), "*4");
        assert_eq!(index.resolve("p1", 2001, Some("NYA")), "*6");
        // Unknown team: both stints summed.
        assert_eq!(index.resolve("p1", 2001, Some("CHA")), "*6/4");
        assert_eq!(index.resolve("p1", 2001, None), "*6/4");
    }

    #[test]
    fn index_miss_is_empty() {
        let index = AppearanceIndex::from_rows(vec![AppearanceRow {
            g_c: Some(10),
            ..appearance("p1", 2001, "NYA")
        }]);
        assert_eq!(index.resolve("p1", 2002, Some("NYA")), "");
        assert_eq!(index.resolve("p2", 2001, None), "");
    }

    #[test]
    fn blank_cells_count_as_zero() {
        let mut row = appearance("p1", 1950, "BRO");
        row.g_c = None;
        row.g_1b = Some(12);
        let counts = AppearanceCounts::from_rows([&row]);
        assert_eq!(counts.games(Catcher), 0);
        assert_eq!(position_string(&counts), "*3");
    }
}
