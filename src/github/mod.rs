//! Direct GitHub backend for the repository data source.
//!
//! Wraps Octocrab to list open issues and recently resolved pull requests.
//! Octocrab failures are mapped into [`crate::source::DataSourceError`] so
//! the pipeline can report them without exposing Octocrab internals.

mod client;
mod data_source;
mod error_mapping;
pub(crate) mod models;
mod token;

pub use data_source::{DEFAULT_API_BASE, OctocrabDataSource};
pub use token::PersonalAccessToken;
