// Stat-card pipeline: raw Lahman-style season rows in, a Baseball-Reference
// style table image out.
//
// raw rows + identity -> season (positions, awards) -> totals -> table

pub mod awards;
pub mod error;
pub mod position;
pub mod raw;
pub mod season;
pub mod table;
pub mod teams;
pub mod totals;

pub use error::CoreError;
pub use season::{BattingSeason, PitchingSeason, Seasons, StatKind};
pub use totals::CareerTotals;
