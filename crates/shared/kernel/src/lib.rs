//! Kernel utilities shared across slices.
//! Keep this crate lightweight: settings loading, validation, and the live config handle.
//!
//! ## Settings loading
//! ```rust,ignore
//! use lockbox_kernel::config::load_settings;
//! let settings = load_settings(Some("lockbox.toml"))?;
//! ```
//!
//! ## Live config
//! ```rust
//! use lockbox_kernel::config::LiveConfig;
//! use lockbox_kernel::domain::config::ConfigSnapshot;
//!
//! let live = LiveConfig::new(ConfigSnapshot {
//!     database_url: "mem://".to_owned(),
//!     encryption_key: "passphrase".to_owned(),
//!     password_length: 12,
//! })
//! .unwrap();
//!
//! assert!(live.set_password_length(4).is_err());
//! assert_eq!(live.password_length(), 12);
//! ```
pub mod config;

pub use lockbox_domain as domain;
