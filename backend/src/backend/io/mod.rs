//! # IO Module
//!
//! Adapter layer between the presentation layer and the domain. Exposes the
//! local JSON API and translates between the `shared` DTOs and domain models.

pub mod rest;

pub use rest::*;
