//! Domain layer for the Budget It client.
//!
//! This crate contains:
//! - Domain models (EventRecord, Plan, Expense, Organization, Profile)
//! - The budget view-model (pure balance arithmetic)

pub mod budget;
pub mod models;
