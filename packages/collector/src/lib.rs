//! MagangHub command line.
//!
//! - [`cli`]: argument parsing and the `collect`, `status` and `browse` commands
//! - [`output`]: terminal rendering of listings and status rows

pub mod cli;
pub mod output;
