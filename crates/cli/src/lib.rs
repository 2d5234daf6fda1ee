//! Command-line shell over the harvest, enrich and send stages.

pub mod cli;
mod commands;
mod progress;
