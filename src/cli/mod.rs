//! CLI operation mode handlers.
//!
//! This module contains the implementations for different operation modes:
//! - [`migrations`]: Database schema migrations
//! - [`dry_run`]: Fetch and classify, then print a report
//! - [`run_once`]: A single monitoring pass
//! - [`run_forever`]: The scheduler loop
//!
//! Backend construction lives in [`backends`] and report formatting in
//! [`output`].

pub mod backends;
pub mod dry_run;
pub mod error;
pub mod migrations;
pub mod output;
pub mod run_forever;
pub mod run_once;
