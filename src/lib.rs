//! Per-commit and per-contributor statistics from git's formatted output.
//!
//! The parsing core (`classify`, `summary`, `contributors`, `noise`) is pure
//! and works on supplied text; `gitio` and `session` supply that text from a
//! real working copy.

pub mod classify;
pub mod cli;
pub mod contributors;
pub mod error;
pub mod gitio;
pub mod model;
pub mod noise;
pub mod parallel;
pub mod report;
pub mod session;
pub mod summary;
pub mod util;

pub use contributors::aggregate_contributors;
pub use noise::filter_noise;
pub use summary::summarize_commit;
