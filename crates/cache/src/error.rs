use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to access the snapshot storage: {0}")]
    Storage(#[from] std::io::Error),
}
