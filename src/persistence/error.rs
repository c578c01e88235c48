//! Error types for local persistence operations.

use thiserror::Error;

/// Errors returned while migrating the `SQLite` database or reading and
/// writing the tracking record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistenceError {
    /// The database URL/path was present but blank.
    #[error("database URL must not be blank")]
    BlankDatabaseUrl,

    /// Establishing a `SQLite` connection failed.
    #[error("failed to connect to SQLite database: {message}")]
    ConnectionFailed {
        /// Error detail from Diesel.
        message: String,
    },

    /// Running pending migrations failed.
    #[error("failed to run database migrations: {message}")]
    MigrationFailed {
        /// Error detail from Diesel migrations.
        message: String,
    },

    /// Reading the schema version from the migration table failed.
    #[error("failed to read schema version after migrations: {message}")]
    SchemaVersionQueryFailed {
        /// Error detail from Diesel query execution.
        message: String,
    },

    /// The migrations completed but no schema version could be found.
    #[error("no schema version recorded after migrations ran")]
    MissingSchemaVersion,

    /// The tracking table does not exist yet.
    #[error("database schema is not initialised (run with --migrate-db first)")]
    SchemaNotInitialised,

    /// Reading the tracking record failed.
    #[error("failed to load tracking record: {message}")]
    QueryFailed {
        /// Error detail from the query.
        message: String,
    },

    /// Writing the tracking record failed.
    #[error("failed to persist tracking record: {message}")]
    WriteFailed {
        /// Error detail from the write.
        message: String,
    },

    /// A stored row could not be decoded.
    #[error("corrupt tracking row: {message}")]
    CorruptRow {
        /// What could not be decoded.
        message: String,
    },
}
