// crates/background-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Durable Store
// Description: Durable session store backed by SQLite.
// Purpose: Persist session metadata and per-room records as JSON payloads.
// Dependencies: background-store-core, rusqlite, serde, serde_json, thiserror, tokio
// ============================================================================

//! ## Overview
//! This module implements [`DurableStore`] using `SQLite`. Every row is keyed
//! by the owning session's user identifier, so one database file can hold
//! several sessions while each store instance only sees its own.
//!
//! Session metadata (sync cursor, filter id, account data) lives in a single
//! row and follows the durable contract: it is read into the instance by
//! [`DurableStore::load_metadata`] and served from memory afterwards. Users and
//! room records are read on demand. Async reads run on the blocking pool.
//!
//! Database contents are untrusted: payload sizes are bounded by
//! [`MAX_RECORD_BYTES`] and undecodable payloads fail as corruption.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use background_store_core::AccountData;
use background_store_core::DurableStore;
use background_store_core::FilterId;
use background_store_core::RoomAccountData;
use background_store_core::RoomId;
use background_store_core::RoomSummary;
use background_store_core::SessionIdentity;
use background_store_core::SessionUser;
use background_store_core::StateEvent;
use background_store_core::StoreError;
use background_store_core::SyncCursor;
use background_store_core::UserId;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum size of a single stored record payload.
pub const MAX_RECORD_BYTES: usize = 8 * 1024 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode; lets a reader process run beside the writer.
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode.
    #[default]
    Full,
    /// Normal synchronous mode.
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` durable store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds and must be non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a configuration with default pragmas for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding raw record payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored payload could not be decoded.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid configuration or input.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Record payload exceeded the size limit.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "record payload exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Tables holding keyed JSON record payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordTable {
    /// User records keyed by user identifier.
    Users,
    /// Room state event lists keyed by room identifier.
    RoomState,
    /// Room summaries keyed by room identifier.
    RoomSummaries,
    /// Room account data keyed by room identifier.
    RoomAccountData,
}

impl RecordTable {
    /// Returns the table name.
    const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::RoomState => "room_state",
            Self::RoomSummaries => "room_summaries",
            Self::RoomAccountData => "room_account_data",
        }
    }
}

/// Columns of the session metadata row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetadataColumn {
    /// Sync cursor text.
    SyncCursor,
    /// Sync filter identifier text.
    SyncFilterId,
    /// Account data JSON.
    AccountData,
}

impl MetadataColumn {
    /// Returns the column name.
    const fn name(self) -> &'static str {
        match self {
            Self::SyncCursor => "sync_cursor",
            Self::SyncFilterId => "sync_filter_id",
            Self::AccountData => "account_data_json",
        }
    }
}

/// Session metadata held in memory after `load_metadata`.
#[derive(Debug, Clone, Default, PartialEq)]
struct SessionMetadata {
    /// Sync cursor.
    sync_cursor: Option<SyncCursor>,
    /// Sync filter identifier.
    sync_filter_id: Option<FilterId>,
    /// Session account data.
    account_data: Option<AccountData>,
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed durable store bound to one session user.
///
/// # Invariants
/// - Every query is scoped to `owner`.
/// - `SQLite` connection access is serialized through a mutex.
/// - Metadata getters return `None` until `load_metadata` succeeds.
#[derive(Clone)]
pub struct SqliteDurableStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Session user owning the rows this instance sees.
    owner: UserId,
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
    /// Metadata snapshot taken by `load_metadata`.
    metadata: Option<SessionMetadata>,
}

impl SqliteDurableStore {
    /// Opens the store and binds it to the identity's user.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Invalid`] when the identity has no user
    /// identifier or the configuration is unusable, and other variants when the
    /// database cannot be opened or initialized.
    pub fn for_identity(
        config: SqliteStoreConfig,
        identity: &SessionIdentity,
    ) -> Result<Self, SqliteStoreError> {
        let owner = identity.user_id().cloned().ok_or_else(|| {
            SqliteStoreError::Invalid("session identity has no user identifier".to_string())
        })?;
        validate_store_path(&config.path)?;
        if config.busy_timeout_ms == 0 {
            return Err(SqliteStoreError::Invalid(
                "busy_timeout_ms must be greater than zero".to_string(),
            ));
        }
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            owner,
            connection: Arc::new(Mutex::new(connection)),
            metadata: None,
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Returns the session user this store is bound to.
    #[must_use]
    pub const fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns true once `load_metadata` has succeeded on this instance.
    #[must_use]
    pub const fn is_metadata_loaded(&self) -> bool {
        self.metadata.is_some()
    }

    /// Persists the sync cursor.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the write fails.
    pub fn save_sync_cursor(&self, cursor: Option<&SyncCursor>) -> Result<(), SqliteStoreError> {
        self.save_metadata_column(MetadataColumn::SyncCursor, cursor.map(ToString::to_string))
    }

    /// Persists the sync filter identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the write fails.
    pub fn save_sync_filter_id(
        &self,
        filter_id: Option<&FilterId>,
    ) -> Result<(), SqliteStoreError> {
        self.save_metadata_column(MetadataColumn::SyncFilterId, filter_id.map(ToString::to_string))
    }

    /// Persists the session account data.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the payload is too large or the write
    /// fails.
    pub fn save_account_data(
        &self,
        account_data: Option<&AccountData>,
    ) -> Result<(), SqliteStoreError> {
        let json = match account_data {
            Some(account_data) => {
                let json = serde_json::to_string(account_data)
                    .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
                ensure_within_limit(json.len())?;
                Some(json)
            }
            None => None,
        };
        self.save_metadata_column(MetadataColumn::AccountData, json)
    }

    /// Persists a user record.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the payload is too large or the write
    /// fails.
    pub fn save_user(&self, user: &SessionUser) -> Result<(), SqliteStoreError> {
        self.save_record(RecordTable::Users, user.user_id.as_str(), user)
    }

    /// Persists the state events of a room, replacing any earlier list.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the payload is too large or the write
    /// fails.
    pub fn save_room_state(
        &self,
        room_id: &RoomId,
        events: &[StateEvent],
    ) -> Result<(), SqliteStoreError> {
        self.save_record(RecordTable::RoomState, room_id.as_str(), events)
    }

    /// Persists a room summary.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the payload is too large or the write
    /// fails.
    pub fn save_room_summary(&self, summary: &RoomSummary) -> Result<(), SqliteStoreError> {
        self.save_record(RecordTable::RoomSummaries, summary.room_id.as_str(), summary)
    }

    /// Persists the account data of a room.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the payload is too large or the write
    /// fails.
    pub fn save_room_account_data(
        &self,
        room_id: &RoomId,
        account_data: &RoomAccountData,
    ) -> Result<(), SqliteStoreError> {
        self.save_record(RecordTable::RoomAccountData, room_id.as_str(), account_data)
    }

    /// Upserts one column of the owner's metadata row.
    fn save_metadata_column(
        &self,
        column: MetadataColumn,
        value: Option<String>,
    ) -> Result<(), SqliteStoreError> {
        let sql = format!(
            "INSERT INTO session_metadata (owner_id, {column}, updated_at) VALUES (?1, ?2, ?3) ON \
             CONFLICT(owner_id) DO UPDATE SET {column} = excluded.{column}, updated_at = \
             excluded.updated_at",
            column = column.name()
        );
        let guard = lock_connection(&self.connection)?;
        guard
            .execute(&sql, params![self.owner.as_str(), value, unix_millis()])
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(())
    }

    /// Upserts a keyed record payload for the owner.
    fn save_record<T: Serialize + ?Sized>(
        &self,
        table: RecordTable,
        record_id: &str,
        record: &T,
    ) -> Result<(), SqliteStoreError> {
        let payload = serde_json::to_vec(record)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        ensure_within_limit(payload.len())?;
        let sql = format!(
            "INSERT INTO {table} (owner_id, record_id, payload, saved_at) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(owner_id, record_id) DO UPDATE SET payload = excluded.payload, saved_at \
             = excluded.saved_at",
            table = table.name()
        );
        let guard = lock_connection(&self.connection)?;
        guard
            .execute(&sql, params![self.owner.as_str(), record_id, payload, unix_millis()])
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(())
    }

    /// Reads the owner's metadata row; a missing row yields empty metadata.
    fn fetch_metadata(&self) -> Result<SessionMetadata, SqliteStoreError> {
        let guard = lock_connection(&self.connection)?;
        let row: Option<(Option<String>, Option<String>, Option<String>)> = guard
            .query_row(
                "SELECT sync_cursor, sync_filter_id, account_data_json FROM session_metadata \
                 WHERE owner_id = ?1",
                params![self.owner.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        let Some((sync_cursor, sync_filter_id, account_data)) = row else {
            return Ok(SessionMetadata::default());
        };
        let account_data = match account_data {
            Some(json) => Some(decode_account_data(&json)?),
            None => None,
        };
        Ok(SessionMetadata {
            sync_cursor: sync_cursor.map(SyncCursor::new),
            sync_filter_id: sync_filter_id.map(FilterId::new),
            account_data,
        })
    }
}

#[async_trait]
impl DurableStore for SqliteDurableStore {
    fn load_metadata(&mut self) -> Result<(), StoreError> {
        let metadata = self.fetch_metadata()?;
        self.metadata = Some(metadata);
        Ok(())
    }

    async fn lookup_users(&self, user_ids: &[UserId]) -> Result<Vec<SessionUser>, StoreError> {
        let connection = Arc::clone(&self.connection);
        let owner = self.owner.clone();
        let user_ids = user_ids.to_vec();
        let users = run_blocking(move || {
            let mut users = Vec::with_capacity(user_ids.len());
            for user_id in &user_ids {
                let record = fetch_record::<SessionUser>(
                    &connection,
                    RecordTable::Users,
                    &owner,
                    user_id.as_str(),
                )?;
                if let Some(user) = record {
                    users.push(user);
                }
            }
            Ok(users)
        })
        .await?;
        Ok(users)
    }

    async fn room_state(&self, room_id: &RoomId) -> Result<Vec<StateEvent>, StoreError> {
        let connection = Arc::clone(&self.connection);
        let owner = self.owner.clone();
        let room_id = room_id.clone();
        let events = run_blocking(move || {
            fetch_record::<Vec<StateEvent>>(
                &connection,
                RecordTable::RoomState,
                &owner,
                room_id.as_str(),
            )
        })
        .await?;
        Ok(events.unwrap_or_default())
    }

    fn summary(&self, room_id: &RoomId) -> Result<Option<RoomSummary>, StoreError> {
        fetch_record(&self.connection, RecordTable::RoomSummaries, &self.owner, room_id.as_str())
            .map_err(StoreError::from)
    }

    fn room_account_data(&self, room_id: &RoomId) -> Result<Option<RoomAccountData>, StoreError> {
        fetch_record(&self.connection, RecordTable::RoomAccountData, &self.owner, room_id.as_str())
            .map_err(StoreError::from)
    }

    fn sync_cursor(&self) -> Option<SyncCursor> {
        self.metadata.as_ref().and_then(|metadata| metadata.sync_cursor.clone())
    }

    fn account_data(&self) -> Option<AccountData> {
        self.metadata.as_ref().and_then(|metadata| metadata.account_data.clone())
    }

    fn sync_filter_id(&self) -> Option<FilterId> {
        self.metadata.as_ref().and_then(|metadata| metadata.sync_filter_id.clone())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs a blocking store read on the runtime's blocking pool.
async fn run_blocking<T, F>(task: F) -> Result<T, SqliteStoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SqliteStoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| SqliteStoreError::Io(format!("sqlite read task failed: {err}")))?
}

/// Locks the shared connection.
fn lock_connection(
    connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
    connection.lock().map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))
}

/// Fetches and decodes one keyed record payload for the owner.
fn fetch_record<T: DeserializeOwned>(
    connection: &Mutex<Connection>,
    table: RecordTable,
    owner: &UserId,
    record_id: &str,
) -> Result<Option<T>, SqliteStoreError> {
    let guard = lock_connection(connection)?;
    let length: Option<i64> = guard
        .query_row(
            &format!(
                "SELECT length(payload) FROM {} WHERE owner_id = ?1 AND record_id = ?2",
                table.name()
            ),
            params![owner.as_str(), record_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let Some(length) = length else {
        return Ok(None);
    };
    let length = usize::try_from(length).map_err(|_| {
        SqliteStoreError::Corrupt(format!("negative payload length in {}", table.name()))
    })?;
    ensure_within_limit(length)?;
    let bytes: Vec<u8> = guard
        .query_row(
            &format!(
                "SELECT payload FROM {} WHERE owner_id = ?1 AND record_id = ?2",
                table.name()
            ),
            params![owner.as_str(), record_id],
            |row| row.get(0),
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    drop(guard);
    serde_json::from_slice(&bytes).map(Some).map_err(|err| {
        SqliteStoreError::Corrupt(format!(
            "invalid {} payload for {record_id}: {err}",
            table.name()
        ))
    })
}

/// Decodes the stored account data JSON.
fn decode_account_data(json: &str) -> Result<AccountData, SqliteStoreError> {
    ensure_within_limit(json.len())?;
    serde_json::from_str(json)
        .map_err(|err| SqliteStoreError::Corrupt(format!("invalid account data payload: {err}")))
}

/// Rejects payloads above [`MAX_RECORD_BYTES`].
fn ensure_within_limit(actual_bytes: usize) -> Result<(), SqliteStoreError> {
    if actual_bytes > MAX_RECORD_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_RECORD_BYTES,
            actual_bytes,
        });
    }
    Ok(())
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path.display().to_string().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with the configured pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies journal, sync, and busy-timeout pragmas.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS session_metadata (
                    owner_id TEXT NOT NULL PRIMARY KEY,
                    sync_cursor TEXT,
                    sync_filter_id TEXT,
                    account_data_json TEXT,
                    updated_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS users (
                    owner_id TEXT NOT NULL,
                    record_id TEXT NOT NULL,
                    payload BLOB NOT NULL,
                    saved_at INTEGER NOT NULL,
                    PRIMARY KEY (owner_id, record_id)
                );
                CREATE TABLE IF NOT EXISTS room_state (
                    owner_id TEXT NOT NULL,
                    record_id TEXT NOT NULL,
                    payload BLOB NOT NULL,
                    saved_at INTEGER NOT NULL,
                    PRIMARY KEY (owner_id, record_id)
                );
                CREATE TABLE IF NOT EXISTS room_summaries (
                    owner_id TEXT NOT NULL,
                    record_id TEXT NOT NULL,
                    payload BLOB NOT NULL,
                    saved_at INTEGER NOT NULL,
                    PRIMARY KEY (owner_id, record_id)
                );
                CREATE TABLE IF NOT EXISTS room_account_data (
                    owner_id TEXT NOT NULL,
                    record_id TEXT NOT NULL,
                    payload BLOB NOT NULL,
                    saved_at INTEGER NOT NULL,
                    PRIMARY KEY (owner_id, record_id)
                );",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
