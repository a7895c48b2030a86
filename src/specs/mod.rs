// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! Page-specific knowledge of *where the ground truth lives in the HTML* and
//! *how to pull it out robustly*.
//!
//! ## What lives here
//! - **Pure HTML parsing** of an already-fetched page.
//! - **Table choice & fallback** (class signature first, else the first table).
//! - **Per-row validation** with an explicit accept/skip outcome, so a single
//!   odd row never fails the page.
//!
//! ## What does **not** live here
//! - Networking (`core::net`), normalization (`normalize`), persistence
//!   (`store`), merging (`merge`) or rendering (`render`).
//!
//! ## Typical call chain
//! ```text
//! runner → core::net::Fetcher::fetch → specs::nodes::extract
//!        → normalize → merge(fresh, store::load_prior) → render → file
//! ```
//!
//! Specs are testable offline against inline HTML fixtures.
pub mod nodes;
