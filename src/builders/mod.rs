//! # Builders
//!
//! - [`session_builder`] - fluent configuration for a [`Session`](crate::Session)
//!
//! The builder is where configuration handed over by the CLI/config layer
//! (passphrase bytes, loop count, archive salt) is validated before any
//! stretching work starts.

pub mod session_builder;

pub use session_builder::SessionBuilder;
