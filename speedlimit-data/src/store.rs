//! SQLite persistence for speed-limit points.
//!
//! Every load replaces the destination tables wholesale inside a single
//! transaction: dropping, recreating and filling them either all commit or
//! all roll back.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, Error as SqliteError, Transaction};
use speedlimit_core::{SpeedLimitPoint, StorageLayout};
use thiserror::Error;

use crate::fs::ensure_parent_dir;

const DROP_TABLES: &str = "
    DROP TABLE IF EXISTS geo_index;
    DROP TABLE IF EXISTS speed_limits;
";

const KEYED_TABLE: &str = "
    CREATE TABLE speed_limits (
        id INTEGER PRIMARY KEY,
        lat REAL NOT NULL,
        lon REAL NOT NULL,
        speed_limit INTEGER NOT NULL
    );
";

const UNKEYED_TABLE: &str = "
    CREATE TABLE speed_limits (
        id INTEGER NOT NULL,
        lat REAL NOT NULL,
        lon REAL NOT NULL,
        speed_limit INTEGER NOT NULL
    );
";

const SPATIAL_INDEX: &str = "
    CREATE VIRTUAL TABLE geo_index USING rtree(id, minLat, maxLat, minLon, maxLon);
";

const COLUMN_INDEXES: &str = "
    CREATE INDEX idx_speed_limits_lat ON speed_limits (lat);
    CREATE INDEX idx_speed_limits_lon ON speed_limits (lon);
";

const INSERT_POINT: &str =
    "INSERT INTO speed_limits (id, lat, lon, speed_limit) VALUES (?1, ?2, ?3, ?4)";
const INSERT_BOX: &str =
    "INSERT INTO geo_index (id, minLat, maxLat, minLon, maxLon) VALUES (?1, ?2, ?2, ?3, ?3)";

/// Errors raised when writing speed-limit points to SQLite.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create the parent directory for the database file.
    #[error("failed to create parent directory for {path:?}")]
    CreateDirectory {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Beginning the load transaction failed.
    #[error("failed to begin load transaction")]
    BeginTransaction {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Dropping or creating the tables failed.
    #[error("failed to recreate schema for {layout:?}")]
    CreateSchema {
        /// Layout being created.
        layout: StorageLayout,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Writing a row failed.
    #[error("failed to persist point for way {way_id}")]
    PersistRow {
        /// Way the point was derived from.
        way_id: i64,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Committing the load transaction failed.
    #[error("failed to commit load transaction")]
    Commit {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Handle on the destination database.
#[derive(Debug)]
pub struct SpeedLimitStore {
    path: Utf8PathBuf,
    connection: Connection,
}

impl SpeedLimitStore {
    /// Open (creating if needed) the database at `path`.
    ///
    /// Missing parent directories are created.
    pub fn open(path: &Utf8Path) -> Result<Self, StoreError> {
        ensure_parent_dir(path).map_err(|source| StoreError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| StoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            connection,
        })
    }

    /// Location of the database file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Start a load: open a transaction and recreate the tables for `layout`.
    ///
    /// Nothing is visible to other connections until
    /// [`LoadSession::commit`]; dropping the session rolls the load back and
    /// leaves the previous tables in place.
    ///
    /// # Examples
    /// ```
    /// use camino::Utf8PathBuf;
    /// use geo::Coord;
    /// use speedlimit_core::{SpeedLimitPoint, StorageLayout};
    /// use speedlimit_data::store::SpeedLimitStore;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let temp = tempfile::tempdir()?;
    /// let path = Utf8PathBuf::from_path_buf(temp.path().join("speed_limits.sqlite"))
    ///     .map_err(|_| "non utf-8 temp dir")?;
    /// let mut store = SpeedLimitStore::open(&path)?;
    /// let mut session = store.begin(StorageLayout::ColumnIndexes)?;
    /// session.insert(&SpeedLimitPoint::new(1, Coord { x: 11.5, y: 48.1 }, 50))?;
    /// assert_eq!(session.commit()?, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn begin(&mut self, layout: StorageLayout) -> Result<LoadSession<'_>, StoreError> {
        let transaction = self
            .connection
            .transaction()
            .map_err(|source| StoreError::BeginTransaction { source })?;
        recreate_schema(&transaction, layout)?;
        Ok(LoadSession {
            transaction,
            layout,
            inserted: 0,
        })
    }
}

/// An open load transaction over freshly recreated tables.
#[derive(Debug)]
pub struct LoadSession<'conn> {
    transaction: Transaction<'conn>,
    layout: StorageLayout,
    inserted: u64,
}

impl LoadSession<'_> {
    /// Insert one point, mirroring it into the spatial index when the layout
    /// has one.
    pub fn insert(&mut self, point: &SpeedLimitPoint) -> Result<(), StoreError> {
        let persist_error = |source| StoreError::PersistRow {
            way_id: point.way_id,
            source,
        };
        self.transaction
            .prepare_cached(INSERT_POINT)
            .and_then(|mut statement| {
                statement.execute((point.way_id, point.lat(), point.lon(), point.speed_limit))
            })
            .map_err(persist_error)?;
        if self.layout.uses_spatial_index() {
            self.transaction
                .prepare_cached(INSERT_BOX)
                .and_then(|mut statement| {
                    statement.execute((point.way_id, point.lat(), point.lon()))
                })
                .map_err(persist_error)?;
        }
        self.inserted += 1;
        Ok(())
    }

    /// Rows inserted so far.
    #[must_use]
    pub const fn inserted(&self) -> u64 {
        self.inserted
    }

    /// Commit the load, returning the number of rows written.
    pub fn commit(self) -> Result<u64, StoreError> {
        self.transaction
            .commit()
            .map_err(|source| StoreError::Commit { source })?;
        Ok(self.inserted)
    }
}

fn recreate_schema(transaction: &Transaction<'_>, layout: StorageLayout) -> Result<(), StoreError> {
    let table = if layout.has_primary_key() {
        KEYED_TABLE
    } else {
        UNKEYED_TABLE
    };
    let index = if layout.uses_spatial_index() {
        SPATIAL_INDEX
    } else {
        COLUMN_INDEXES
    };
    transaction
        .execute_batch(&format!("{DROP_TABLES}{table}{index}"))
        .map_err(|source| StoreError::CreateSchema { layout, source })
}
