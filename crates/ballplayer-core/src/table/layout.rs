// Table geometry: bands, rules, and positioned text for one stat card.
//
// Everything here is a pure function of the seasons, the totals, and the
// table spec. The display name only changes the title text; every band,
// rule, and cell is placed the same way with or without it.

use serde::Serialize;

use super::{
    palette, Align, CellStyle, ColumnId, Rgb, StatRow, TableSpec, TextSize, Weight,
    REDACTED_TITLE,
};
use crate::season::Seasons;
use crate::totals::{CareerTotals, TotalsLine};

/// Pixels per character unit of column width.
pub const CHAR_WIDTH: f64 = 17.25;
/// Left edge of the first column.
pub const LEFT_MARGIN: f64 = 45.0;
/// Horizontal space beyond the columns.
pub const WIDTH_PADDING: f64 = 120.0;

pub const TITLE_HEIGHT: u32 = 68;
pub const SECTION_HEIGHT: u32 = 45;
pub const HEADER_HEIGHT: u32 = 82;
pub const ROW_HEIGHT: u32 = 33;
pub const BOTTOM_PADDING: u32 = 45;

const CELL_PAD_LEFT: f64 = 15.0;
const CELL_PAD_RIGHT: f64 = 7.5;
const TITLE_BASELINE_RAISE: i32 = 22;

const HEAVY_RULE_WIDTH: u32 = 3;
const ROW_RULE_WIDTH: u32 = 1;
pub const BORDER_WIDTH: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BandKind {
    Title,
    Section,
    Header,
    /// Zero-based season row.
    Season(usize),
    Totals,
    Padding,
}

/// A full-width horizontal strip of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Band {
    pub kind: BandKind,
    pub top: u32,
    pub height: u32,
    /// `None` leaves the canvas color showing.
    pub fill: Option<Rgb>,
    pub border: Option<Rgb>,
}

impl Band {
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    pub fn middle(&self) -> i32 {
        (self.top + self.height / 2) as i32
    }
}

/// A full-width horizontal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub y: u32,
    pub color: Rgb,
    pub width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VAnchor {
    Middle,
    Bottom,
}

/// One piece of text, anchored at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextItem {
    pub band: BandKind,
    pub column: Option<ColumnId>,
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub align: Align,
    pub anchor: VAnchor,
    pub style: CellStyle,
}

/// The finished card layout, ready for any raster back end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLayout {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    pub bands: Vec<Band>,
    pub rules: Vec<Rule>,
    pub texts: Vec<TextItem>,
}

impl TableLayout {
    pub fn band(&self, kind: BandKind) -> Option<&Band> {
        self.bands.iter().find(|b| b.kind == kind)
    }

    pub fn title(&self) -> Option<&TextItem> {
        self.texts.iter().find(|t| t.band == BandKind::Title)
    }

    pub fn cell(&self, band: BandKind, column: ColumnId) -> Option<&TextItem> {
        self.texts
            .iter()
            .find(|t| t.band == band && t.column == Some(column))
    }

    /// Number of season rows (the totals row excluded).
    pub fn season_rows(&self) -> usize {
        self.bands
            .iter()
            .filter(|b| matches!(b.kind, BandKind::Season(_)))
            .count()
    }
}

/// Canvas width for a table spec.
pub fn canvas_width(spec: &TableSpec) -> u32 {
    (spec.total_width() * CHAR_WIDTH + WIDTH_PADDING).ceil() as u32
}

/// Canvas height for `seasons` season rows plus the totals row.
pub fn canvas_height(seasons: usize) -> u32 {
    TITLE_HEIGHT
        + SECTION_HEIGHT
        + HEADER_HEIGHT
        + ROW_HEIGHT * (seasons as u32 + 1)
        + BOTTOM_PADDING
}

/// Anchor x and alignment for text in a column starting at `left`.
fn text_x(left: f64, width: f64, align: Align) -> i32 {
    let x = match align {
        Align::Left => left + CELL_PAD_LEFT,
        Align::Center => left + width * CHAR_WIDTH / 2.0,
        Align::Right => left + width * CHAR_WIDTH - CELL_PAD_RIGHT,
    };
    x.round() as i32
}

fn season_rows(seasons: &Seasons) -> Vec<&dyn StatRow> {
    match seasons {
        Seasons::Batting(s) => s.iter().map(|s| s as &dyn StatRow).collect(),
        Seasons::Pitching(s) => s.iter().map(|s| s as &dyn StatRow).collect(),
    }
}

fn totals_row(totals: &CareerTotals) -> &dyn StatRow {
    match &totals.line {
        TotalsLine::Batting(t) => t,
        TotalsLine::Pitching(t) => t,
    }
}

struct Builder<'a> {
    spec: &'a TableSpec,
    width: u32,
    cursor: u32,
    bands: Vec<Band>,
    rules: Vec<Rule>,
    texts: Vec<TextItem>,
}

impl<'a> Builder<'a> {
    fn push_band(&mut self, kind: BandKind, height: u32, fill: Option<Rgb>, border: Option<Rgb>) -> Band {
        let band = Band {
            kind,
            top: self.cursor,
            height,
            fill,
            border,
        };
        self.cursor += height;
        self.bands.push(band);
        band
    }

    fn rule(&mut self, y: u32, color: Rgb, width: u32) {
        self.rules.push(Rule { y, color, width });
    }

    /// Lay one text item per column across `band`.
    fn row<F>(&mut self, band: &Band, mut cell: F)
    where
        F: FnMut(ColumnId) -> (String, CellStyle),
    {
        let mut left = LEFT_MARGIN;
        for column in &self.spec.columns {
            let (text, style) = cell(column.id);
            self.texts.push(TextItem {
                band: band.kind,
                column: Some(column.id),
                text,
                x: text_x(left, column.width, column.align),
                y: band.middle(),
                align: column.align,
                anchor: VAnchor::Middle,
                style,
            });
            left += column.width * CHAR_WIDTH;
        }
    }
}

/// Lay out a stat card.
///
/// `display_name` of `None` draws the redaction placeholder in the title
/// band. Season cells are styled by the `TableSpec` highlight rules; the totals
/// row is uniformly bold and never highlighted.
pub fn layout(
    seasons: &Seasons,
    totals: &CareerTotals,
    spec: &TableSpec,
    display_name: Option<&str>,
) -> TableLayout {
    let rows = season_rows(seasons);
    let width = canvas_width(spec);
    let height = canvas_height(rows.len());

    let mut b = Builder {
        spec,
        width,
        cursor: 0,
        bands: Vec::with_capacity(rows.len() + 5),
        rules: Vec::new(),
        texts: Vec::new(),
    };

    // Title
    let title = b.push_band(BandKind::Title, TITLE_HEIGHT, None, None);
    let (title_text, title_color) = match display_name {
        Some(name) => (name.to_string(), palette::LINK),
        None => (REDACTED_TITLE.to_string(), palette::REDACTED),
    };
    b.texts.push(TextItem {
        band: BandKind::Title,
        column: None,
        text: title_text,
        x: LEFT_MARGIN as i32,
        y: title.bottom() as i32 - TITLE_BASELINE_RAISE,
        align: Align::Left,
        anchor: VAnchor::Bottom,
        style: CellStyle::new(title_color, Weight::Bold, TextSize::Title),
    });

    // Section label
    let section = b.push_band(
        BandKind::Section,
        SECTION_HEIGHT,
        Some(palette::HEADER),
        Some(palette::BORDER),
    );
    b.texts.push(TextItem {
        band: BandKind::Section,
        column: None,
        text: spec.kind.section_label().to_string(),
        x: LEFT_MARGIN as i32,
        y: section.middle(),
        align: Align::Left,
        anchor: VAnchor::Middle,
        style: CellStyle::new(palette::TEXT, Weight::Bold, TextSize::Section),
    });

    // Column headers
    let header = b.push_band(
        BandKind::Header,
        HEADER_HEIGHT,
        Some(palette::HEADER),
        Some(palette::BORDER),
    );
    b.rule(header.bottom(), palette::HEAVY_RULE, HEAVY_RULE_WIDTH);
    let header_style = CellStyle::new(palette::HEADER_TEXT, Weight::Bold, TextSize::Header);
    b.row(&header, |id| (id.header().to_string(), header_style));

    // Season rows
    for (idx, row) in rows.iter().enumerate() {
        let shade = if idx % 2 == 0 { palette::ROW } else { palette::ROW_ALT };
        let band = b.push_band(BandKind::Season(idx), ROW_HEIGHT, Some(shade), None);
        b.rule(band.bottom(), palette::ROW_RULE, ROW_RULE_WIDTH);
        b.row(&band, |id| {
            let value = row.cell(id);
            let style = spec.season_style(id, &value);
            (value.format(), style)
        });
    }

    // Totals
    let totals_band = b.push_band(BandKind::Totals, ROW_HEIGHT, Some(palette::TOTALS), None);
    b.rule(totals_band.top, palette::HEAVY_RULE, HEAVY_RULE_WIDTH);
    b.rule(totals_band.bottom(), palette::HEAVY_RULE, HEAVY_RULE_WIDTH);
    let totals_line = totals_row(totals);
    b.row(&totals_band, |id| {
        let text = if id == ColumnId::Year {
            totals.label.clone()
        } else if id.blank_on_totals() {
            String::new()
        } else {
            totals_line.cell(id).format()
        };
        (text, CellStyle::new(palette::TEXT, Weight::Bold, TextSize::Body))
    });

    b.push_band(BandKind::Padding, BOTTOM_PADDING, None, None);

    debug_assert_eq!(b.cursor, height);
    TableLayout {
        width: b.width,
        height,
        background: palette::CANVAS,
        bands: b.bands,
        rules: b.rules,
        texts: b.texts,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
