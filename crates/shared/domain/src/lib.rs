//! # Domain Models
//!
//! This crate contains pure domain types with a single dependency (`serde`).
//! Keep it lean: no I/O, crypto, or locking. Just data and simple helpers.

pub mod access;
pub mod config;
pub mod constants;
