// Process-wide font registration for the raster back end.
//
// Fonts are registered once from caller-supplied bytes. Until then the
// renderer draws bands and rules only.

use std::sync::OnceLock;

use plotters::style::{register_font, FontStyle};
use tracing::info;

use super::RenderError;

/// Family name every text item is drawn with.
pub const FONT_FAMILY: &str = "ballplayer";

static READY: OnceLock<()> = OnceLock::new();

/// Register the regular face, and the bold face when given. Without a bold
/// face, bold text falls back to the regular one.
///
/// Registering twice is harmless; the later bytes replace the earlier ones.
pub fn register_fonts(regular: &'static [u8], bold: Option<&'static [u8]>) -> Result<(), RenderError> {
    register_font(FONT_FAMILY, FontStyle::Normal, regular)
        .map_err(|_| RenderError::Font("regular face is not a valid TTF/OTF font".into()))?;
    register_font(FONT_FAMILY, FontStyle::Bold, bold.unwrap_or(regular))
        .map_err(|_| RenderError::Font("bold face is not a valid TTF/OTF font".into()))?;
    let _ = READY.set(());
    info!("registered card fonts (bold face: {})", bold.is_some());
    Ok(())
}

/// Whether text can be drawn.
pub fn fonts_ready() -> bool {
    READY.get().is_some()
}
