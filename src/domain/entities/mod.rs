//! Core domain entities.
//!
//! - [`UrlRecord`] - A stored short link
//! - [`NewUrlRecord`] - Insert payload; the id is assigned by the store

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord};
