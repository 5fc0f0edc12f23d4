// Raster back end: draws a `TableLayout` with plotters' bitmap backend.

use std::path::Path;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters_backend::DrawingBackend;
use thiserror::Error;
use tracing::{debug, warn};

use super::fonts::{fonts_ready, FONT_FAMILY};
use super::layout::{layout, TableLayout, VAnchor, BORDER_WIDTH};
use super::{Align, Rgb, TableSpec, Weight};
use crate::season::Seasons;
use crate::totals::CareerTotals;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("font could not be registered: {0}")]
    Font(String),

    #[error("image buffer is {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// An RGB image, three bytes per pixel, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl StatsImage {
    /// Color of the pixel at `(x, y)`, if inside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 3) as usize;
        Some(Rgb(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    /// Encode as PNG at `path`.
    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        let expected = (self.width * self.height * 3) as usize;
        if self.pixels.len() != expected {
            return Err(RenderError::BufferSize {
                expected,
                actual: self.pixels.len(),
            });
        }
        let mut backend = BitMapBackend::new(path, (self.width, self.height));
        backend
            .blit_bitmap((0, 0), (self.width, self.height), &self.pixels)
            .map_err(|e| RenderError::Draw(e.to_string()))?;
        backend
            .present()
            .map_err(|e| RenderError::Draw(e.to_string()))?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

fn color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn draw_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn text_pos(align: Align, anchor: VAnchor) -> Pos {
    let h = match align {
        Align::Left => HPos::Left,
        Align::Center => HPos::Center,
        Align::Right => HPos::Right,
    };
    let v = match anchor {
        VAnchor::Middle => VPos::Center,
        VAnchor::Bottom => VPos::Bottom,
    };
    Pos::new(h, v)
}

fn draw_layout<DB>(root: &DrawingArea<DB, Shift>, table: &TableLayout, with_text: bool) -> Result<(), RenderError>
where
    DB: DrawingBackend,
{
    let right = table.width as i32 - 1;

    root.fill(&color(table.background)).map_err(draw_err)?;

    for band in &table.bands {
        let top = band.top as i32;
        let bottom = band.bottom() as i32 - 1;
        if let Some(fill) = band.fill {
            root.draw(&Rectangle::new([(0, top), (right, bottom)], color(fill).filled()))
                .map_err(draw_err)?;
        }
        if let Some(border) = band.border {
            root.draw(&Rectangle::new(
                [(0, top), (right, bottom)],
                color(border).stroke_width(BORDER_WIDTH),
            ))
            .map_err(draw_err)?;
        }
    }

    for rule in &table.rules {
        let y = rule.y as i32;
        root.draw(&PathElement::new(
            vec![(0, y), (right, y)],
            color(rule.color).stroke_width(rule.width),
        ))
        .map_err(draw_err)?;
    }

    if !with_text {
        return Ok(());
    }
    for item in table.texts.iter().filter(|t| !t.text.is_empty()) {
        let weight = match item.style.weight {
            Weight::Normal => FontStyle::Normal,
            Weight::Bold => FontStyle::Bold,
        };
        let style = FontDesc::new(FontFamily::Name(FONT_FAMILY), item.style.size.px(), weight)
            .color(&color(item.style.color))
            .pos(text_pos(item.align, item.anchor));
        root.draw_text(&item.text, &style, (item.x, item.y))
            .map_err(draw_err)?;
    }
    Ok(())
}

/// Draw a finished layout into a fresh RGB buffer.
pub fn rasterize(table: &TableLayout) -> Result<StatsImage, RenderError> {
    let with_text = fonts_ready();
    if !with_text {
        warn!("no fonts registered, card text will not be drawn");
    }

    let (width, height) = (table.width, table.height);
    let mut pixels = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        draw_layout(&root, table, with_text)?;
        root.present().map_err(draw_err)?;
    }

    Ok(StatsImage {
        width,
        height,
        pixels,
    })
}

/// Lay out and draw a stat card in one step.
pub fn render(
    seasons: &Seasons,
    totals: &CareerTotals,
    spec: &TableSpec,
    display_name: Option<&str>,
) -> Result<StatsImage, RenderError> {
    rasterize(&layout(seasons, totals, spec, display_name))
}

/// Lay out, draw, and write a card as PNG.
pub fn write_png(
    seasons: &Seasons,
    totals: &CareerTotals,
    spec: &TableSpec,
    display_name: Option<&str>,
    path: &Path,
) -> Result<StatsImage, RenderError> {
    let image = render(seasons, totals, spec, display_name)?;
    image.save_png(path)?;
    Ok(image)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::BattingSeason;
    use crate::table::layout::BandKind;
    use crate::table::palette;
    use crate::totals::aggregate;

    // Unit tests never register fonts, so only geometry is drawn.

    fn season(year: i32) -> BattingSeason {
        BattingSeason {
            year,
            age: Some(27),
            team: "BOS".into(),
            league: "AL".into(),
            g: 140,
            ab: 520,
            r: 80,
            h: 160,
            doubles: 35,
            triples: 2,
            hr: 28,
            rbi: 95,
            sb: 4,
            cs: 1,
            bb: 70,
            so: 90,
            hbp: 3,
            sf: 6,
            position: "*7/DH".into(),
            awards: "AS".into(),
        }
    }

    fn card(name: Option<&str>) -> (TableLayout, StatsImage) {
        let seasons = Seasons::Batting(vec![season(2003), season(2004), season(2005)]);
        let totals = aggregate(&seasons);
        let spec = TableSpec::batting();
        let table = layout(&seasons, &totals, &spec, name);
        let image = render(&seasons, &totals, &spec, name).unwrap();
        (table, image)
    }

    fn mid(table: &TableLayout, kind: BandKind) -> u32 {
        table.band(kind).unwrap().middle() as u32
    }

    #[test]
    fn image_matches_layout_size() {
        let (table, image) = card(None);
        assert_eq!(image.width, table.width);
        assert_eq!(image.height, table.height);
        assert_eq!(image.pixels.len(), (image.width * image.height * 3) as usize);
    }

    #[test]
    fn bands_are_filled() {
        let (table, image) = card(None);
        let x = table.width / 2;
        assert_eq!(image.pixel(x, 5), Some(palette::CANVAS));
        assert_eq!(image.pixel(x, mid(&table, BandKind::Section)), Some(palette::HEADER));
        assert_eq!(image.pixel(x, mid(&table, BandKind::Header)), Some(palette::HEADER));
        assert_eq!(image.pixel(x, mid(&table, BandKind::Season(0))), Some(palette::ROW));
        assert_eq!(image.pixel(x, mid(&table, BandKind::Season(1))), Some(palette::ROW_ALT));
        assert_eq!(image.pixel(x, mid(&table, BandKind::Totals)), Some(palette::TOTALS));
        assert_eq!(image.pixel(x, table.height - 5), Some(palette::CANVAS));
        assert_eq!(image.pixel(table.width, 0), None);
    }

    #[test]
    fn rendering_is_deterministic() {
        let (_, first) = card(Some("Manny Example"));
        let (_, second) = card(Some("Manny Example"));
        assert_eq!(first, second);
    }

    #[test]
    fn title_does_not_move_geometry() {
        let (_, hidden) = card(None);
        let (_, revealed) = card(Some("Manny Example"));
        assert_eq!((hidden.width, hidden.height), (revealed.width, revealed.height));
        // Text is skipped without fonts, so the two rasters agree exactly.
        assert_eq!(hidden.pixels, revealed.pixels);
    }

    #[test]
    fn save_png_writes_file() {
        let (_, image) = card(None);
        let path = std::env::temp_dir().join("ballplayer_render_test.png");
        let _ = std::fs::remove_file(&path);
        image.save_png(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn save_png_rejects_short_buffer() {
        let image = StatsImage {
            width: 10,
            height: 10,
            pixels: vec![0; 12],
        };
        let path = std::env::temp_dir().join("ballplayer_render_short.png");
        match image.save_png(&path) {
            Err(RenderError::BufferSize { expected, actual }) => {
                assert_eq!(expected, 300);
                assert_eq!(actual, 12);
            }
            other => panic!("expected BufferSize, got {other:?}"),
        }
    }
}
