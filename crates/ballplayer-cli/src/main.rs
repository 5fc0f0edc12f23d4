// Stat card generator entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Load config (copying defaults on first run)
// 3. Initialize tracing (log to file, not terminal)
// 4. Register fonts
// 5. Load the Lahman tables
// 6. Build the card, write hidden and revealed PNGs plus a JSON summary

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use tracing::{info, warn};

use ballplayer_cli::card::{build_card, render_card, CardKind, PlayerCard};
use ballplayer_cli::config::{self, Config};
use ballplayer_cli::lahman;
use ballplayer_core::table::fonts;

const USAGE: &str = "usage: ballplayer <playerID> [batting|pitching|auto]";

fn main() -> anyhow::Result<()> {
    // 1. Arguments
    let mut args = std::env::args().skip(1);
    let Some(player_id) = args.next() else {
        bail!(USAGE);
    };
    let kind = match args.next() {
        Some(arg) => arg.parse::<CardKind>().map_err(anyhow::Error::msg)?,
        None => CardKind::default(),
    };
    if args.next().is_some() {
        bail!(USAGE);
    }

    // 2. Config
    let config = config::load_config().context("failed to load configuration")?;

    // 3. Tracing
    init_tracing(&config.logging.filter)?;
    info!("ballplayer starting: player={}, kind={}", player_id, kind);

    // 4. Fonts
    register_fonts(&config)?;

    // 5. Data
    let data = lahman::load_all(&config.data.dir)
        .with_context(|| format!("failed to load Lahman data from {}", config.data.dir.display()))?;

    // 6. Card
    let card = build_card(&data, &player_id, kind)
        .with_context(|| format!("failed to build card for {player_id}"))?;
    if card.seasons.is_empty() {
        warn!("{} has no {:?} seasons with playing time", player_id, card.kind());
    }

    std::fs::create_dir_all(&config.output.dir)
        .with_context(|| format!("failed to create {}", config.output.dir.display()))?;
    let hidden = write_card(&card, false, &config.output.dir)?;
    let revealed = write_card(&card, true, &config.output.dir)?;
    write_summary(&card, &config.output.dir)?;

    println!("{}", hidden.display());
    println!("{}", revealed.display());
    info!("ballplayer finished");
    Ok(())
}

fn write_card(card: &PlayerCard, reveal: bool, dir: &Path) -> anyhow::Result<PathBuf> {
    let suffix = if reveal { "revealed" } else { "hidden" };
    let path = dir.join(format!("{}_{}.png", card.player_id, suffix));
    let image = render_card(card, reveal).context("failed to render card")?;
    image
        .save_png(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {} ({}x{})", path.display(), image.width, image.height);
    Ok(path)
}

fn write_summary(card: &PlayerCard, dir: &Path) -> anyhow::Result<()> {
    let path = dir.join(format!("{}.json", card.player_id));
    let json = serde_json::to_string_pretty(card).context("failed to serialize card")?;
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Read the configured font files and hand them to the renderer. The bytes
/// live for the rest of the process.
fn register_fonts(config: &Config) -> anyhow::Result<()> {
    let Some(regular_path) = &config.render.regular_font else {
        warn!("no render.regular_font configured; cards will have no text");
        return Ok(());
    };
    let regular = match std::fs::read(regular_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("cannot read font {}: {}; cards will have no text", regular_path.display(), e);
            return Ok(());
        }
    };
    let bold = match &config.render.bold_font {
        Some(path) => match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("cannot read bold font {}: {}; using regular face", path.display(), e);
                None
            }
        },
        None => None,
    };

    let regular: &'static [u8] = Box::leak(regular.into_boxed_slice());
    let bold: Option<&'static [u8]> = bold.map(|b| &*Box::leak(b.into_boxed_slice()));
    fonts::register_fonts(regular, bold).context("failed to register fonts")?;
    Ok(())
}

fn init_tracing(filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("ballplayer.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
