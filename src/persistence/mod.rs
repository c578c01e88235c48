//! Local persistence and database migrations.
//!
//! repowatch keeps its tracking record in a local `SQLite` database so a
//! restarted agent does not re-send notifications. The schema is managed
//! with Diesel migrations embedded in the binary.

mod error;
mod migrator;
mod tracking_store;

pub use error::PersistenceError;
pub use migrator::{
    CURRENT_SCHEMA_VERSION, INITIAL_SCHEMA_VERSION, SchemaVersion, migrate_database,
};
pub use tracking_store::SqliteTrackingStore;
