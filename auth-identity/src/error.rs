use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already in use")]
    EmailAlreadyInUse,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password too weak")]
    WeakPassword,

    #[error("Referenced record does not exist")]
    InvalidReference,

    #[error("Hashing error")]
    HashingError,

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, IdentityError>;
