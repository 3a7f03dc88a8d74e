//! Shared utilities for Kaiwa binaries: logging setup and the config file.

pub mod config;
pub mod logger;
