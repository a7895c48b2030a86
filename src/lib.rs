// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod file;
pub mod merge;
pub mod normalize;
pub mod progress;
pub mod render;
pub mod runner;
pub mod specs;
pub mod store;
pub mod types;

pub use error::{Result, ScrapeError};
pub use types::{NodeRecord, UptimeRank};
