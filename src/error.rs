use std::time::Duration;

use bb8_postgres::bb8::RunError;
use bb8_postgres::tokio_postgres;
use thiserror::Error;

/// Failure of a whole search. Any of these aborts the request.
#[derive(Debug, Error)]
pub enum SearchError {
    /// No connection could be taken from the pool.
    #[error("failed to acquire a postgres connection: {0}")]
    Pool(#[from] RunError<tokio_postgres::Error>),
    /// The query itself failed on the server.
    #[error("restaurant query failed: {0}")]
    Query(#[from] tokio_postgres::Error),
    /// Backend other than postgres could not serve the query.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("restaurant query did not finish within {0:?}")]
    Timeout(Duration),
}

/// Failure to project a single storage row. The row is dropped, the search
/// carries on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("column `{0}` is missing")]
    MissingColumn(&'static str),
    #[error("column `{column}` holds {value:?}, which is not a finite number")]
    InvalidNumber { column: &'static str, value: String },
}
