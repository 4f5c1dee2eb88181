//! Implements the command line behavior.
pub mod cli;
