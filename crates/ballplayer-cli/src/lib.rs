// Library root: re-exports all modules so integration tests and the binary
// share one API.

pub mod card;
pub mod config;
pub mod lahman;
