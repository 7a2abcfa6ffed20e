use relstore_index::CatalogError;
use thiserror::Error;

/// Recoverable failures of the checked store API.
///
/// The unchecked operations treat these conditions as caller bugs and panic;
/// the `try_` variants report them for input that has not been validated yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("expected a tuple of arity {expected}, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("equivalence relations are binary, got arity {arity}")]
    NotBinary { arity: usize },

    #[error("unknown relation tag '{0}'")]
    UnknownTag(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
