//! Local-first CPN tracker: entity store, metrics aggregation and a
//! loopback JSON API for the presentation layer.

pub mod backend;
pub mod config;
