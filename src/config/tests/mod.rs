//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `operation_mode`: Operation mode determination tests
//! - `field_resolution`: Token, repository, recipient, and backend resolution tests
//! - `cli_loading`: Loading from real argument lists
//! - `validation`: Per-mode validation tests

mod helpers;
mod validation;
