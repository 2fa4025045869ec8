//! Output module for scrape results
//!
//! This module handles everything written by a run:
//! - One JSON document per book
//! - Run statistics printed at the end

mod json;
mod stats;

pub use json::{book_filename, persist_book};
pub use stats::{format_statistics, print_statistics, RunStatistics};
