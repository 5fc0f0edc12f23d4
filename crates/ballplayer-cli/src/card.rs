// Player card assembly: seasons -> playing-time filter -> totals, then the
// hidden or revealed render.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use ballplayer_core::season::{build_batting, build_pitching, Seasons, StatKind};
use ballplayer_core::table::{self, RenderError, StatsImage, TableLayout, TableSpec};
use ballplayer_core::totals::{aggregate, aggregate_batting, aggregate_pitching, CareerTotals};
use ballplayer_core::CoreError;

use crate::lahman::LahmanData;

/// Which stat table to put on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardKind {
    Batting,
    Pitching,
    /// Batting for position players, pitching for pitchers.
    #[default]
    Auto,
}

impl FromStr for CardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "batting" | "b" => Ok(CardKind::Batting),
            "pitching" | "p" => Ok(CardKind::Pitching),
            "auto" | "both" => Ok(CardKind::Auto),
            other => Err(format!("unknown card kind '{other}' (expected batting, pitching, or auto)")),
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardKind::Batting => "batting",
            CardKind::Pitching => "pitching",
            CardKind::Auto => "auto",
        };
        f.write_str(s)
    }
}

/// Everything needed to draw one player's card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerCard {
    pub player_id: String,
    pub name: String,
    pub seasons: Seasons,
    pub totals: CareerTotals,
}

impl PlayerCard {
    pub fn kind(&self) -> StatKind {
        self.seasons.kind()
    }

    /// Table layout with the name shown (`reveal`) or redacted.
    pub fn layout(&self, reveal: bool) -> TableLayout {
        let spec = TableSpec::for_kind(self.kind());
        let name = reveal.then_some(self.name.as_str());
        table::layout(&self.seasons, &self.totals, &spec, name)
    }
}

/// Choose batting or pitching for `CardKind::Auto`: batting when career at
/// bats are at least career innings and there is a batting line with an at
/// bat, pitching otherwise.
fn auto_kind(batting: &Seasons, pitching: &Seasons) -> StatKind {
    let (Seasons::Batting(b), Seasons::Pitching(p)) = (batting, pitching) else {
        return StatKind::Batting;
    };
    let career_ab = aggregate_batting(b).ab as f64;
    let career_ip = aggregate_pitching(p).ip();
    let has_at_bat = b.iter().any(|s| s.ab > 0);
    if has_at_bat && career_ab >= career_ip {
        StatKind::Batting
    } else {
        StatKind::Pitching
    }
}

/// Build a player's card from loaded data.
///
/// Seasons without playing time (no at bats, no outs recorded) are dropped
/// before totals are summed.
pub fn build_card(data: &LahmanData, player_id: &str, kind: CardKind) -> Result<PlayerCard, CoreError> {
    let sources = data.sources();

    let (name, seasons) = match kind {
        CardKind::Batting => {
            let (name, s) = build_batting(player_id, data.batting_rows(player_id), &data.directory, &sources)?;
            (name, Seasons::Batting(s))
        }
        CardKind::Pitching => {
            let (name, s) = build_pitching(player_id, data.pitching_rows(player_id), &data.directory, &sources)?;
            (name, Seasons::Pitching(s))
        }
        CardKind::Auto => {
            let (name, b) = build_batting(player_id, data.batting_rows(player_id), &data.directory, &sources)?;
            let (_, p) = build_pitching(player_id, data.pitching_rows(player_id), &data.directory, &sources)?;
            let batting = Seasons::Batting(b).with_playing_time();
            let pitching = Seasons::Pitching(p).with_playing_time();
            let chosen = match auto_kind(&batting, &pitching) {
                StatKind::Batting => batting,
                StatKind::Pitching => pitching,
            };
            debug!("auto card for {} resolved to {:?}", player_id, chosen.kind());
            (name, chosen)
        }
    };

    let seasons = seasons.with_playing_time();
    let totals = aggregate(&seasons);
    info!(
        "built {:?} card for {} ({}): {} seasons, {}",
        seasons.kind(),
        player_id,
        name,
        seasons.len(),
        totals.label
    );

    Ok(PlayerCard {
        player_id: player_id.to_string(),
        name,
        seasons,
        totals,
    })
}

/// Draw the card's image; `reveal` shows the player's name in the title.
pub fn render_card(card: &PlayerCard, reveal: bool) -> Result<StatsImage, RenderError> {
    table::rasterize(&card.layout(reveal))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
