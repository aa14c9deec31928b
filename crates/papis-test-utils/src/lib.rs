//! Shared test utilities for the papis workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only; it is never published.
//!
//! # Modules
//!
//! - [`home`]: [`ConfigHome`] builder for a throwaway home and config folder

pub mod home;

pub use home::ConfigHome;
