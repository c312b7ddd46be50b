//! Shift tracking, earnings calculation, and achievement engine.
//!
//! This crate is the in-process core behind an hourly-work tracking app:
//! it owns the shift lifecycle (one active shift, started and ended
//! explicitly), prices completed shifts under the configured pay rules,
//! and scores an achievement catalog against the cumulative history.
//! Storage and presentation are external collaborators — the host supplies
//! a [`store::PersistenceGateway`] and reads back records, aggregates, and
//! change events.

#![warn(missing_docs)]

pub mod achievements;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tracker;
