//! Tracking record storage backed by `SQLite`.
//!
//! Each row holds one tracked item of one repository. Persisting a record
//! replaces every row of that repository inside a single transaction, so a
//! failed write leaves the previous record intact.

use chrono::{DateTime, Utc};
use diesel::Connection;
use diesel::QueryableByName;
use diesel::RunQueryDsl;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Bool, Text};
use diesel::sqlite::SqliteConnection;

use crate::source::RepositorySlug;
use crate::tracking::{ItemKind, TrackedEntry, TrackingKey, TrackingRecord, TrackingStore};

use super::PersistenceError;

const TRACKING_TABLE: &str = "notification_tracking";

#[derive(Debug, QueryableByName)]
struct Row {
    #[diesel(sql_type = Text)]
    kind: String,
    #[diesel(sql_type = BigInt)]
    item_number: i64,
    #[diesel(sql_type = Text)]
    state_marker: String,
    #[diesel(sql_type = Text)]
    notified_at: String,
    #[diesel(sql_type = Bool)]
    closed_since_notified: bool,
}

/// SQLite-backed [`TrackingStore`].
///
/// A connection is opened per call; the schema must already exist
/// (see [`super::migrate_database`]).
#[derive(Debug, Clone)]
pub struct SqliteTrackingStore {
    database_url: String,
}

impl SqliteTrackingStore {
    /// Create a store targeting the configured `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::BlankDatabaseUrl`] when the URL is blank.
    pub fn new(database_url: impl Into<String>) -> Result<Self, PersistenceError> {
        let database_url_string = database_url.into();
        if database_url_string.trim().is_empty() {
            return Err(PersistenceError::BlankDatabaseUrl);
        }
        Ok(Self {
            database_url: database_url_string,
        })
    }

    fn establish_connection(&self) -> Result<SqliteConnection, PersistenceError> {
        SqliteConnection::establish(self.database_url.trim()).map_err(|error| {
            PersistenceError::ConnectionFailed {
                message: error.to_string(),
            }
        })
    }

    fn tracking_table_exists(
        connection: &mut SqliteConnection,
    ) -> Result<bool, diesel::result::Error> {
        #[derive(Debug, QueryableByName)]
        struct CountRow {
            #[diesel(sql_type = BigInt)]
            count: i64,
        }

        let row: CountRow = sql_query(
            "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?;",
        )
        .bind::<Text, _>(TRACKING_TABLE)
        .get_result(connection)?;

        Ok(row.count > 0)
    }

    fn map_error_with_schema_check<F>(
        connection: &mut SqliteConnection,
        error: &diesel::result::Error,
        create_error: F,
    ) -> PersistenceError
    where
        F: Fn(String) -> PersistenceError,
    {
        match Self::tracking_table_exists(connection) {
            Ok(false) => PersistenceError::SchemaNotInitialised,
            Ok(true) => create_error(error.to_string()),
            Err(check_error) => create_error(format!(
                "schema presence check failed: {check_error}; original error: {error}"
            )),
        }
    }

    fn decode_row(row: Row) -> Result<(TrackingKey, TrackedEntry), PersistenceError> {
        let kind = row
            .kind
            .parse::<ItemKind>()
            .map_err(|error| PersistenceError::CorruptRow {
                message: error.to_string(),
            })?;
        let number = u64::try_from(row.item_number).map_err(|_| PersistenceError::CorruptRow {
            message: format!("negative item number {}", row.item_number),
        })?;

        Ok((
            TrackingKey { kind, number },
            TrackedEntry {
                state_marker: parse_timestamp("state_marker", &row.state_marker)?,
                notified_at: parse_timestamp("notified_at", &row.notified_at)?,
                closed_since_notified: row.closed_since_notified,
            },
        ))
    }
}

impl TrackingStore for SqliteTrackingStore {
    fn load(&self, repo: &RepositorySlug) -> Result<TrackingRecord, PersistenceError> {
        let mut connection = self.establish_connection()?;

        let rows: Vec<Row> = sql_query(
            "SELECT kind, item_number, state_marker, notified_at, closed_since_notified \
             FROM notification_tracking \
             WHERE repository = ? \
             ORDER BY kind, item_number;",
        )
        .bind::<Text, _>(repo.to_string())
        .load(&mut connection)
        .map_err(|error| {
            Self::map_error_with_schema_check(&mut connection, &error, |message| {
                PersistenceError::QueryFailed { message }
            })
        })?;

        let mut record = TrackingRecord::new();
        for row in rows {
            let (key, entry) = Self::decode_row(row)?;
            record.insert(key, entry);
        }
        Ok(record)
    }

    fn persist(
        &self,
        repo: &RepositorySlug,
        record: &TrackingRecord,
    ) -> Result<(), PersistenceError> {
        let mut connection = self.establish_connection()?;
        let repository = repo.to_string();

        let result = connection.transaction::<_, diesel::result::Error, _>(|conn| {
            sql_query("DELETE FROM notification_tracking WHERE repository = ?;")
                .bind::<Text, _>(&repository)
                .execute(conn)?;

            for (key, entry) in record.iter() {
                sql_query(
                    "INSERT INTO notification_tracking \
                     (repository, kind, item_number, state_marker, notified_at, \
                      closed_since_notified) \
                     VALUES (?, ?, ?, ?, ?, ?);",
                )
                .bind::<Text, _>(&repository)
                .bind::<Text, _>(key.kind.as_str())
                .bind::<BigInt, _>(number_to_i64(key.number))
                .bind::<Text, _>(entry.state_marker.to_rfc3339())
                .bind::<Text, _>(entry.notified_at.to_rfc3339())
                .bind::<Bool, _>(entry.closed_since_notified)
                .execute(conn)?;
            }
            Ok(())
        });

        result.map_err(|error| {
            Self::map_error_with_schema_check(&mut connection, &error, |message| {
                PersistenceError::WriteFailed { message }
            })
        })
    }
}

fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|error| PersistenceError::CorruptRow {
            message: format!("{column} `{raw}` is not RFC 3339: {error}"),
        })
}

fn number_to_i64(number: u64) -> i64 {
    // GitHub numbers fit comfortably; saturate rather than wrap.
    i64::try_from(number).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests;
