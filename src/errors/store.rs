use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Username already exists")]
    DuplicateUser,

    #[error("User not found")]
    UnknownUser,

    #[error("Incorrect password")]
    WrongPassword,

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("User database is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Could not replace user database: {0}")]
    Persist(String),
}

impl StoreError {
    /// Validation failures are the user's problem; the rest are ours.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            StoreError::MissingCredentials
                | StoreError::PasswordMismatch
                | StoreError::PasswordTooShort(_)
                | StoreError::DuplicateUser
                | StoreError::UnknownUser
                | StoreError::WrongPassword
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
