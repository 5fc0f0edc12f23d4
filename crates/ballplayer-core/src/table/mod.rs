// Stat table description: columns, cell formatting, and emphasis rules.
//
// The batting and pitching tables share one layout engine. Each table is a
// `TableSpec` (ordered columns plus highlight rules); each row type answers
// `StatRow::cell` for the columns it knows and leaves the rest blank.

pub mod fonts;
pub mod layout;
pub mod render;

use serde::Serialize;

use crate::season::{BattingSeason, PitchingSeason, StatKind};
use crate::totals::{BattingTotals, PitchingTotals};

pub use layout::{layout, Band, BandKind, Rule, TableLayout, TextItem, VAnchor};
pub use render::{rasterize, render, write_png, RenderError, StatsImage};

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub mod palette {
    use super::Rgb;

    pub const CANVAS: Rgb = Rgb(0xf5, 0xf3, 0xed);
    pub const ROW: Rgb = Rgb(0xf7, 0xf7, 0xf0);
    pub const ROW_ALT: Rgb = Rgb(0xff, 0xff, 0xff);
    pub const HEADER: Rgb = Rgb(0xdd, 0xdd, 0xdd);
    pub const BORDER: Rgb = Rgb(0xcc, 0xcc, 0xcc);
    pub const HEAVY_RULE: Rgb = Rgb(0x8c, 0x15, 0x15);
    pub const ROW_RULE: Rgb = Rgb(0xe0, 0xdd, 0xd5);
    pub const TOTALS: Rgb = Rgb(0xe8, 0xe5, 0xd8);
    pub const LINK: Rgb = Rgb(0x00, 0x45, 0x7c);
    pub const AWARD: Rgb = Rgb(0x00, 0x45, 0x7c);
    pub const HIGHLIGHT: Rgb = Rgb(0x8c, 0x15, 0x15);
    pub const TEXT: Rgb = Rgb(0x1a, 0x1a, 0x1a);
    pub const HEADER_TEXT: Rgb = Rgb(0x33, 0x33, 0x33);
    pub const REDACTED: Rgb = Rgb(0x99, 0x99, 0x99);
}

/// Title text shown when the player's name is hidden.
pub const REDACTED_TITLE: &str = "??? ???";

// ---------------------------------------------------------------------------
// Text styling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Weight {
    Normal,
    Bold,
}

/// Font size classes. Sizes are point sizes of the printed card at 150 dpi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TextSize {
    Title,
    Section,
    Header,
    Body,
    Position,
    Award,
}

impl TextSize {
    pub fn points(&self) -> f64 {
        match self {
            TextSize::Title => 16.0,
            TextSize::Section => 9.0,
            TextSize::Header | TextSize::Body => 7.0,
            TextSize::Position => 6.5,
            TextSize::Award => 6.0,
        }
    }

    /// Pixel height at the card's 150 dpi.
    pub fn px(&self) -> f64 {
        self.points() * 150.0 / 72.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellStyle {
    pub color: Rgb,
    pub weight: Weight,
    pub size: TextSize,
}

impl CellStyle {
    pub const fn new(color: Rgb, weight: Weight, size: TextSize) -> Self {
        CellStyle { color, weight, size }
    }
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnId {
    Year,
    Age,
    Team,
    League,
    G,
    AB,
    R,
    H,
    Doubles,
    Triples,
    HR,
    RBI,
    SB,
    CS,
    BB,
    SO,
    BA,
    OBP,
    SLG,
    OPS,
    Pos,
    Awards,
    W,
    L,
    ERA,
    GS,
    CG,
    SHO,
    SV,
    IP,
    ER,
    WHIP,
}

impl ColumnId {
    pub fn header(&self) -> &'static str {
        match self {
            ColumnId::Year => "Year",
            ColumnId::Age => "Age",
            ColumnId::Team => "Tm",
            ColumnId::League => "Lg",
            ColumnId::G => "G",
            ColumnId::AB => "AB",
            ColumnId::R => "R",
            ColumnId::H => "H",
            ColumnId::Doubles => "2B",
            ColumnId::Triples => "3B",
            ColumnId::HR => "HR",
            ColumnId::RBI => "RBI",
            ColumnId::SB => "SB",
            ColumnId::CS => "CS",
            ColumnId::BB => "BB",
            ColumnId::SO => "SO",
            ColumnId::BA => "BA",
            ColumnId::OBP => "OBP",
            ColumnId::SLG => "SLG",
            ColumnId::OPS => "OPS",
            ColumnId::Pos => "Pos",
            ColumnId::Awards => "Awards",
            ColumnId::W => "W",
            ColumnId::L => "L",
            ColumnId::ERA => "ERA",
            ColumnId::GS => "GS",
            ColumnId::CG => "CG",
            ColumnId::SHO => "SHO",
            ColumnId::SV => "SV",
            ColumnId::IP => "IP",
            ColumnId::ER => "ER",
            ColumnId::WHIP => "WHIP",
        }
    }

    /// Style of a season-row cell before any highlight rule applies.
    pub fn base_style(&self) -> CellStyle {
        match self {
            ColumnId::Year => CellStyle::new(palette::LINK, Weight::Bold, TextSize::Body),
            ColumnId::Team | ColumnId::League => {
                CellStyle::new(palette::LINK, Weight::Normal, TextSize::Body)
            }
            ColumnId::BA
            | ColumnId::OBP
            | ColumnId::SLG
            | ColumnId::OPS
            | ColumnId::ERA
            | ColumnId::WHIP => CellStyle::new(palette::TEXT, Weight::Bold, TextSize::Body),
            ColumnId::Awards => CellStyle::new(palette::AWARD, Weight::Normal, TextSize::Award),
            ColumnId::Pos => CellStyle::new(palette::TEXT, Weight::Normal, TextSize::Position),
            _ => CellStyle::new(palette::TEXT, Weight::Normal, TextSize::Body),
        }
    }

    /// Columns left blank on the totals row.
    pub fn blank_on_totals(&self) -> bool {
        matches!(
            self,
            ColumnId::Age | ColumnId::Team | ColumnId::League | ColumnId::Pos | ColumnId::Awards
        )
    }
}

/// One column: what it shows, how wide it is in character units, and how its
/// text is aligned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnSpec {
    pub id: ColumnId,
    pub width: f64,
    pub align: Align,
}

const fn col(id: ColumnId, width: f64, align: Align) -> ColumnSpec {
    ColumnSpec { id, width, align }
}

const BATTING_COLUMNS: [ColumnSpec; 22] = [
    col(ColumnId::Year, 4.5, Align::Left),
    col(ColumnId::Age, 3.0, Align::Right),
    col(ColumnId::Team, 3.5, Align::Left),
    col(ColumnId::League, 2.5, Align::Center),
    col(ColumnId::G, 3.5, Align::Right),
    col(ColumnId::AB, 4.0, Align::Right),
    col(ColumnId::R, 3.5, Align::Right),
    col(ColumnId::H, 3.5, Align::Right),
    col(ColumnId::Doubles, 3.0, Align::Right),
    col(ColumnId::Triples, 3.0, Align::Right),
    col(ColumnId::HR, 3.5, Align::Right),
    col(ColumnId::RBI, 3.5, Align::Right),
    col(ColumnId::SB, 3.0, Align::Right),
    col(ColumnId::CS, 3.0, Align::Right),
    col(ColumnId::BB, 3.5, Align::Right),
    col(ColumnId::SO, 3.5, Align::Right),
    col(ColumnId::BA, 4.5, Align::Right),
    col(ColumnId::OBP, 4.5, Align::Right),
    col(ColumnId::SLG, 4.5, Align::Right),
    col(ColumnId::OPS, 4.5, Align::Right),
    col(ColumnId::Pos, 5.5, Align::Left),
    col(ColumnId::Awards, 7.0, Align::Left),
];

const PITCHING_COLUMNS: [ColumnSpec; 20] = [
    col(ColumnId::Year, 4.5, Align::Left),
    col(ColumnId::Age, 3.0, Align::Right),
    col(ColumnId::Team, 3.5, Align::Left),
    col(ColumnId::League, 2.5, Align::Center),
    col(ColumnId::W, 3.0, Align::Right),
    col(ColumnId::L, 3.0, Align::Right),
    col(ColumnId::ERA, 4.5, Align::Right),
    col(ColumnId::G, 3.5, Align::Right),
    col(ColumnId::GS, 3.5, Align::Right),
    col(ColumnId::CG, 3.0, Align::Right),
    col(ColumnId::SHO, 3.0, Align::Right),
    col(ColumnId::SV, 3.0, Align::Right),
    col(ColumnId::IP, 4.5, Align::Right),
    col(ColumnId::H, 3.5, Align::Right),
    col(ColumnId::ER, 3.5, Align::Right),
    col(ColumnId::HR, 3.0, Align::Right),
    col(ColumnId::BB, 3.5, Align::Right),
    col(ColumnId::SO, 3.5, Align::Right),
    col(ColumnId::WHIP, 4.5, Align::Right),
    col(ColumnId::Awards, 7.0, Align::Left),
];

// ---------------------------------------------------------------------------
// Highlight rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Threshold {
    AtLeast(f64),
    AtMost(f64),
}

impl Threshold {
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Threshold::AtLeast(min) => value >= min,
            Threshold::AtMost(max) => value <= max,
        }
    }
}

/// `(column, predicate, style)`: a season cell whose numeric value passes
/// `threshold` is drawn with `style`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HighlightRule {
    pub column: ColumnId,
    pub threshold: Threshold,
    pub style: CellStyle,
}

const EMPHASIS: CellStyle = CellStyle::new(palette::HIGHLIGHT, Weight::Bold, TextSize::Body);

const fn rule(column: ColumnId, threshold: Threshold) -> HighlightRule {
    HighlightRule {
        column,
        threshold,
        style: EMPHASIS,
    }
}

const BATTING_HIGHLIGHTS: [HighlightRule; 3] = [
    rule(ColumnId::OPS, Threshold::AtLeast(0.900)),
    rule(ColumnId::HR, Threshold::AtLeast(30.0)),
    rule(ColumnId::SB, Threshold::AtLeast(30.0)),
];

const PITCHING_HIGHLIGHTS: [HighlightRule; 3] = [
    rule(ColumnId::ERA, Threshold::AtMost(3.00)),
    rule(ColumnId::W, Threshold::AtLeast(20.0)),
    rule(ColumnId::SO, Threshold::AtLeast(200.0)),
];

// ---------------------------------------------------------------------------
// Table spec
// ---------------------------------------------------------------------------

/// Everything the layout engine needs to know about one table shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSpec {
    pub kind: StatKind,
    pub columns: Vec<ColumnSpec>,
    pub highlights: Vec<HighlightRule>,
}

impl TableSpec {
    pub fn batting() -> Self {
        TableSpec {
            kind: StatKind::Batting,
            columns: BATTING_COLUMNS.to_vec(),
            highlights: BATTING_HIGHLIGHTS.to_vec(),
        }
    }

    pub fn pitching() -> Self {
        TableSpec {
            kind: StatKind::Pitching,
            columns: PITCHING_COLUMNS.to_vec(),
            highlights: PITCHING_HIGHLIGHTS.to_vec(),
        }
    }

    pub fn for_kind(kind: StatKind) -> Self {
        match kind {
            StatKind::Batting => Self::batting(),
            StatKind::Pitching => Self::pitching(),
        }
    }

    /// Sum of the relative column widths, in character units.
    pub fn total_width(&self) -> f64 {
        self.columns.iter().map(|c| c.width).sum()
    }

    /// Final style for a season cell: the column's base style, overridden by
    /// the first matching highlight rule.
    pub fn season_style(&self, column: ColumnId, value: &CellValue) -> CellStyle {
        let base = column.base_style();
        let Some(v) = value.numeric() else {
            return base;
        };
        self.highlights
            .iter()
            .find(|r| r.column == column && r.threshold.matches(v))
            .map(|r| r.style)
            .unwrap_or(base)
    }
}

// ---------------------------------------------------------------------------
// Cell values
// ---------------------------------------------------------------------------

/// A typed cell before formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellValue {
    Blank,
    Count(u64),
    Year(i32),
    Age(Option<i32>),
    /// Batting rate: three decimals, leading zero dropped.
    Rate(f64),
    /// ERA/WHIP: two decimals.
    PerInning(f64),
    /// Innings pitched, stored as outs.
    Innings(u64),
    Text(String),
}

impl CellValue {
    pub fn format(&self) -> String {
        match self {
            CellValue::Blank => String::new(),
            CellValue::Count(n) => n.to_string(),
            CellValue::Year(y) => y.to_string(),
            CellValue::Age(age) => age.map(|a| a.to_string()).unwrap_or_default(),
            CellValue::Rate(v) => format_rate(*v),
            CellValue::PerInning(v) => format!("{v:.2}"),
            CellValue::Innings(outs) => format_innings(*outs),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// Value seen by highlight rules. Text-like cells have none.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            CellValue::Count(n) => Some(*n as f64),
            CellValue::Rate(v) | CellValue::PerInning(v) => Some(*v),
            CellValue::Innings(outs) => Some(*outs as f64 / 3.0),
            _ => None,
        }
    }
}

/// `.300`, `1.035`, and `.000` for zero.
pub fn format_rate(value: f64) -> String {
    let text = format!("{value:.3}");
    match text.strip_prefix('0') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Whole innings plus `.1` / `.2` for extra outs.
pub fn format_innings(outs: u64) -> String {
    let whole = outs / 3;
    match outs % 3 {
        0 => whole.to_string(),
        extra => format!("{whole}.{extra}"),
    }
}

/// A row the layout engine can pull cells from.
pub trait StatRow {
    fn cell(&self, column: ColumnId) -> CellValue;
}

impl StatRow for BattingSeason {
    fn cell(&self, column: ColumnId) -> CellValue {
        match column {
            ColumnId::Year => CellValue::Year(self.year),
            ColumnId::Age => CellValue::Age(self.age),
            ColumnId::Team => CellValue::Text(self.team.clone()),
            ColumnId::League => CellValue::Text(self.league.clone()),
            ColumnId::G => CellValue::Count(self.g.into()),
            ColumnId::AB => CellValue::Count(self.ab.into()),
            ColumnId::R => CellValue::Count(self.r.into()),
            ColumnId::H => CellValue::Count(self.h.into()),
            ColumnId::Doubles => CellValue::Count(self.doubles.into()),
            ColumnId::Triples => CellValue::Count(self.triples.into()),
            ColumnId::HR => CellValue::Count(self.hr.into()),
            ColumnId::RBI => CellValue::Count(self.rbi.into()),
            ColumnId::SB => CellValue::Count(self.sb.into()),
            ColumnId::CS => CellValue::Count(self.cs.into()),
            ColumnId::BB => CellValue::Count(self.bb.into()),
            ColumnId::SO => CellValue::Count(self.so.into()),
            ColumnId::BA => CellValue::Rate(self.ba()),
            ColumnId::OBP => CellValue::Rate(self.obp()),
            ColumnId::SLG => CellValue::Rate(self.slg()),
            ColumnId::OPS => CellValue::Rate(self.ops()),
            ColumnId::Pos => CellValue::Text(self.position.clone()),
            ColumnId::Awards => CellValue::Text(self.awards.clone()),
            _ => CellValue::Blank,
        }
    }
}

impl StatRow for PitchingSeason {
    fn cell(&self, column: ColumnId) -> CellValue {
        match column {
            ColumnId::Year => CellValue::Year(self.year),
            ColumnId::Age => CellValue::Age(self.age),
            ColumnId::Team => CellValue::Text(self.team.clone()),
            ColumnId::League => CellValue::Text(self.league.clone()),
            ColumnId::W => CellValue::Count(self.w.into()),
            ColumnId::L => CellValue::Count(self.l.into()),
            ColumnId::ERA => CellValue::PerInning(self.era()),
            ColumnId::G => CellValue::Count(self.g.into()),
            ColumnId::GS => CellValue::Count(self.gs.into()),
            ColumnId::CG => CellValue::Count(self.cg.into()),
            ColumnId::SHO => CellValue::Count(self.sho.into()),
            ColumnId::SV => CellValue::Count(self.sv.into()),
            ColumnId::IP => CellValue::Innings(self.outs.into()),
            ColumnId::H => CellValue::Count(self.h.into()),
            ColumnId::ER => CellValue::Count(self.er.into()),
            ColumnId::HR => CellValue::Count(self.hr.into()),
            ColumnId::BB => CellValue::Count(self.bb.into()),
            ColumnId::SO => CellValue::Count(self.so.into()),
            ColumnId::WHIP => CellValue::PerInning(self.whip()),
            ColumnId::Awards => CellValue::Text(self.awards.clone()),
            _ => CellValue::Blank,
        }
    }
}

impl StatRow for BattingTotals {
    fn cell(&self, column: ColumnId) -> CellValue {
        match column {
            ColumnId::G => CellValue::Count(self.g.into()),
            ColumnId::AB => CellValue::Count(self.ab.into()),
            ColumnId::R => CellValue::Count(self.r.into()),
            ColumnId::H => CellValue::Count(self.h.into()),
            ColumnId::Doubles => CellValue::Count(self.doubles.into()),
            ColumnId::Triples => CellValue::Count(self.triples.into()),
            ColumnId::HR => CellValue::Count(self.hr.into()),
            ColumnId::RBI => CellValue::Count(self.rbi.into()),
            ColumnId::SB => CellValue::Count(self.sb.into()),
            ColumnId::CS => CellValue::Count(self.cs.into()),
            ColumnId::BB => CellValue::Count(self.bb.into()),
            ColumnId::SO => CellValue::Count(self.so.into()),
            ColumnId::BA => CellValue::Rate(self.ba()),
            ColumnId::OBP => CellValue::Rate(self.obp()),
            ColumnId::SLG => CellValue::Rate(self.slg()),
            ColumnId::OPS => CellValue::Rate(self.ops()),
            _ => CellValue::Blank,
        }
    }
}

impl StatRow for PitchingTotals {
    fn cell(&self, column: ColumnId) -> CellValue {
        match column {
            ColumnId::W => CellValue::Count(self.w.into()),
            ColumnId::L => CellValue::Count(self.l.into()),
            ColumnId::ERA => CellValue::PerInning(self.era()),
            ColumnId::G => CellValue::Count(self.g.into()),
            ColumnId::GS => CellValue::Count(self.gs.into()),
            ColumnId::CG => CellValue::Count(self.cg.into()),
            ColumnId::SHO => CellValue::Count(self.sho.into()),
            ColumnId::SV => CellValue::Count(self.sv.into()),
            ColumnId::IP => CellValue::Innings(self.outs.into()),
            ColumnId::H => CellValue::Count(self.h.into()),
            ColumnId::ER => CellValue::Count(self.er.into()),
            ColumnId::HR => CellValue::Count(self.hr.into()),
            ColumnId::BB => CellValue::Count(self.bb.into()),
            ColumnId::SO => CellValue::Count(self.so.into()),
            ColumnId::WHIP => CellValue::PerInning(self.whip()),
            _ => CellValue::Blank,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
