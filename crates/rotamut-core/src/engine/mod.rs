//! # Engine Module
//!
//! Configuration and error types shared by the high-level workflows.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Residue specifiers and the mutation
//!   configuration with its builder
//! - **Error Handling** ([`error`]) - Workflow errors wrapping the library,
//!   residue and configuration failures

pub mod config;
pub mod error;
