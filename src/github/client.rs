//! Octocrab client construction.

use http::Uri;
use octocrab::Octocrab;

use crate::source::DataSourceError;

use super::error_mapping::map_octocrab_error;
use super::token::PersonalAccessToken;

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `DataSourceError::InvalidSettings` when the base URI cannot be
/// parsed or Octocrab rejects it.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, DataSourceError> {
    let base_uri: Uri =
        api_base
            .parse::<Uri>()
            .map_err(|error| DataSourceError::InvalidSettings {
                message: format!("api_base `{api_base}` is not a valid URI: {error}"),
            })?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| DataSourceError::InvalidSettings {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
