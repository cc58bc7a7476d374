//! Domain layer: the URL record and the store contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Store trait and its error kinds
//!
//! The domain layer has no dependency on HTTP or on any concrete store.

pub mod entities;
pub mod repositories;
