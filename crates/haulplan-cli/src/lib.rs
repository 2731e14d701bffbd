//! haulplan CLI library.
//!
//! Subcommand handlers, terminal styling and output formatting used by the
//! `haulplan` binary.

pub mod commands;
pub mod output;
pub mod terminal;
