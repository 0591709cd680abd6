//! # Domain Module
//!
//! Business logic for the tracker: the entity models, the metrics
//! aggregator and the services the REST layer calls into.
//!
//! ## Module Organization
//!
//! - **models**: girls, entries and the metric shapes derived from them
//! - **calculations**: pure folding of entries into rounded metrics
//! - **analytics**: sorting, top performers, recent activity, monthly buckets
//! - **formatting**: currency, duration and rating display helpers
//! - **girl_service / entry_service**: validated CRUD over the stores
//! - **stats_service**: read-only statistics straight from the stores
//! - **data_management_service**: CSV/JSON export and bulk deletion
//!
//! The aggregator functions never touch storage. Services load what they
//! need and hand plain slices to them.

pub mod analytics;
pub mod calculations;
pub mod commands;
pub mod data_management_service;
pub mod entry_service;
pub mod formatting;
pub mod girl_service;
pub mod models;
pub mod stats_service;

pub use data_management_service::DataManagementService;
pub use entry_service::EntryService;
pub use girl_service::GirlService;
pub use stats_service::StatsService;
