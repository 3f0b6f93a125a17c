//! Persistence abstraction shared by all modules.
//!
//! Provides the [`EntityStore`] contract (generic CRUD per entity type), the
//! [`StoreError`] classification, and a pooled SeaORM connection helper.

pub mod errors;

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

pub use errors::StoreError;

/// Connection pool options, applied on top of the DSN.
#[derive(Debug, Clone)]
pub struct ConnectOpts {
    /// Maximum number of pooled connections.
    pub max_conns: Option<u32>,
    /// How long to wait for a free connection before failing the operation.
    pub acquire_timeout: Option<Duration>,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            acquire_timeout: Some(Duration::from_secs(5)),
        }
    }
}

/// Connect to the database behind `dsn` (sqlite or postgres).
pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<DatabaseConnection, StoreError> {
    let mut options = ConnectOptions::new(dsn.to_owned());
    if let Some(max) = opts.max_conns {
        options.max_connections(max);
    }
    if let Some(timeout) = opts.acquire_timeout {
        options.acquire_timeout(timeout);
    }
    options.sqlx_logging(false);

    tracing::info!(dsn, "connecting to database");
    let db = Database::connect(options).await?;
    Ok(db)
}

/// A pagination window result: the window's rows plus the total count
/// ignoring the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub count: u64,
}

/// Generic CRUD contract, implemented once per entity type.
///
/// `Create` and `Update` carry validated client input; `Extra` is the typed
/// merge point for server-computed or privileged fields (owner id, hashed
/// password). Privileged fields can only enter a record through `Extra`, so a
/// client payload can never smuggle them in.
///
/// `Update` follows exclude-unset semantics: a field absent from the patch is
/// left untouched, and for nullable columns an explicit null is a true
/// overwrite (modelled as `Option<Option<T>>` on the patch type).
#[async_trait]
pub trait EntityStore: Send + Sync {
    type Entity: Send + Sync;
    type Create: Send;
    type Update: Send;
    type Extra: Default + Send;

    /// Single lookup; a miss is `Ok(None)`, never an error.
    async fn get(&self, id: Uuid) -> Result<Option<Self::Entity>, StoreError>;

    /// Paginated list in store-defined order. An out-of-range `skip` yields
    /// an empty vec.
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Self::Entity>, StoreError>;

    /// Total entity count, independent of any pagination window.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Insert a new record from validated input merged with `extra`.
    async fn create(
        &self,
        input: Self::Create,
        extra: Self::Extra,
    ) -> Result<Self::Entity, StoreError>;

    /// Partial update of `existing`; `extra` is applied after the patch and
    /// may override computed fields.
    async fn update(
        &self,
        existing: &Self::Entity,
        input: Self::Update,
        extra: Self::Extra,
    ) -> Result<Self::Entity, StoreError>;

    /// Remove a loaded record.
    async fn delete(&self, existing: Self::Entity) -> Result<(), StoreError>;

    /// Remove by id; `false` when nothing matched.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError>;
}
