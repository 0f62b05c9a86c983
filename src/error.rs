use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("page size must be at least 1 (got {0})")]
    InvalidPageSize(usize),

    #[error("batch source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;
