//! Subcommand implementations.
//!
//! Output meant for the user goes to stdout; diagnostics go through
//! `tracing` to stderr.

pub mod account;
pub mod cart;
pub mod orders;
pub mod products;
