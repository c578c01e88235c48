//! Database migration operations.

use repowatch::RepowatchConfig;
use repowatch::persistence::migrate_database;
use repowatch::telemetry::TracingTelemetrySink;

use super::error::AppError;

/// Runs database migrations and logs the resulting schema version.
///
/// # Errors
///
/// Returns [`AppError::Config`] if the database URL is missing, and
/// [`AppError::Persistence`] if it is blank or migrations fail.
pub fn run(config: &RepowatchConfig) -> Result<(), AppError> {
    let database_url = config.require_database_url()?;

    let schema_version = migrate_database(database_url, &TracingTelemetrySink)?;
    tracing::info!(
        schema_version = schema_version.as_str(),
        "database migrations applied"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use repowatch::persistence::{CURRENT_SCHEMA_VERSION, PersistenceError};
    use repowatch::{ConfigError, RepowatchConfig};
    use rstest::rstest;

    use super::run;
    use crate::cli::error::AppError;

    #[rstest]
    fn missing_database_url_is_a_configuration_error() {
        let config = RepowatchConfig {
            migrate_db: true,
            ..Default::default()
        };

        let result = run(&config);

        assert!(
            matches!(
                result,
                Err(AppError::Config(ConfigError::MissingField { field: "database_url", .. }))
            ),
            "expected missing database_url, got {result:?}"
        );
    }

    #[rstest]
    fn blank_database_url_is_rejected() {
        let config = RepowatchConfig {
            database_url: Some("   ".to_owned()),
            migrate_db: true,
            ..Default::default()
        };

        let result = run(&config);

        assert!(
            matches!(result, Err(AppError::Persistence(PersistenceError::BlankDatabaseUrl))),
            "expected blank URL error, got {result:?}"
        );
    }

    #[rstest]
    fn migrates_a_fresh_database() {
        let temp_dir = tempfile::TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("repowatch.sqlite");
        let config = RepowatchConfig {
            database_url: Some(db_path.to_string_lossy().into_owned()),
            migrate_db: true,
            ..Default::default()
        };

        run(&config).expect("migrations should apply");

        assert!(db_path.exists(), "database file should be created");
        assert_eq!(CURRENT_SCHEMA_VERSION, "20261019000000");
    }
}
