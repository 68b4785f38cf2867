//! Core building blocks: error taxonomy and harness configuration.

pub mod config;
pub mod errors;
