use thiserror::Error;

pub mod model;
pub mod response;
pub mod store;

// Re-export commonly used types
pub use model::{ModelError, ModelResult};
pub use store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    BadInput(String),

    #[error("Account store error: {0}")]
    Store(#[from] StoreError),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;
