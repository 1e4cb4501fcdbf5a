//! Application layer for the Budget It client.
//!
//! This crate contains:
//! - Configuration loading and logging initialization
//! - Page controllers (one per route) producing view state
//! - The [`AppContext`] wiring with an explicit init/teardown contract

pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod pages;

pub use config::Config;
pub use context::AppContext;
pub use error::PageError;
