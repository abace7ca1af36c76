use thiserror::Error;

/// Errors raised by storage engines and surfaced unchanged by repositories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A modify or delete targeted a row that is not in the store.
    #[error(
        "attempted to update or delete an entity that does not exist in the store ({table}:{id})"
    )]
    Concurrency { table: &'static str, id: i64 },

    /// An add targeted a key that is already stored.
    #[error("an entity with key {table}:{id} already exists in the store")]
    DuplicateKey { table: &'static str, id: i64 },

    /// An add targeted a key the session is already tracking.
    #[error("an entity with key {table}:{id} is already tracked by this session")]
    AlreadyTracked { table: &'static str, id: i64 },

    /// Every key of the table has been handed out.
    #[error("no keys left to generate for table {table}")]
    KeySpaceExhausted { table: &'static str },

    /// An include path named a navigation the entity does not expose.
    #[error("entity table {table} has no navigation named {navigation:?}")]
    UnknownNavigation {
        table: &'static str,
        navigation: String,
    },

    /// An include path is not a well-formed dotted path.
    #[error("invalid include path {path:?}")]
    InvalidIncludePath { path: String },

    /// Engine configuration was rejected.
    #[error("invalid storage configuration: {0}")]
    InvalidConfig(String),

    /// Row snapshot could not be (de)serialized.
    #[error("entity serialization error: {0}")]
    Serde(String),

    #[error("storage lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

impl RepositoryError {
    /// True for the "row not found at commit time" failure.
    pub fn is_concurrency(&self) -> bool {
        matches!(self, RepositoryError::Concurrency { .. })
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serde(err.to_string())
    }
}
